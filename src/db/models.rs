//! Diesel model structs for the emission store tables.
//!
//! Emission values are computed at logging time (quantity x carbon factor)
//! and never recomputed afterwards; the analytics engine treats them as
//! immutable inputs.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema;

// Transport modes share their names with `activity_categories` rows so the
// per-km carbon factor can be looked up from the reference data.
pub mod transport_mode {
    pub const CAR_PETROL: &str = "Car Petrol";
    pub const CAR_DIESEL: &str = "Car Diesel";
    pub const PUBLIC_TRANSPORT: &str = "Public Transport";
}

pub mod fuel_type {
    pub const PETROL: &str = "Petrol";
    pub const DIESEL: &str = "Diesel";
    pub const ELECTRIC: &str = "Electric";
}

#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::users)]
#[diesel(primary_key(user_id))]
pub struct User {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub household_size: Option<i32>,
    pub location: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub household_size: Option<i32>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::activity_categories)]
#[diesel(primary_key(category_id))]
pub struct ActivityCategory {
    pub category_id: i32,
    pub category_name: String,
    pub unit: String,
    pub carbon_factor: f64,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::activity_categories)]
pub struct NewActivityCategory {
    pub category_name: String,
    pub unit: String,
    pub carbon_factor: f64,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::daily_activities)]
#[diesel(primary_key(activity_id))]
#[diesel(belongs_to(User))]
#[diesel(belongs_to(ActivityCategory, foreign_key = category_id))]
pub struct DailyActivity {
    pub activity_id: i32,
    pub user_id: i32,
    pub category_id: i32,
    pub activity_date: NaiveDate,
    pub quantity: f64,
    pub carbon_emissions: f64,
    pub logged_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::daily_activities)]
pub struct NewDailyActivity {
    pub user_id: i32,
    pub category_id: i32,
    pub activity_date: NaiveDate,
    pub quantity: f64,
    pub carbon_emissions: f64,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::transportation)]
#[diesel(primary_key(transport_id))]
#[diesel(belongs_to(User))]
pub struct TransportationRecord {
    pub transport_id: i32,
    pub user_id: i32,
    pub transport_mode: String,
    pub distance: f64,
    pub fuel_type: Option<String>,
    pub carbon_emissions: f64,
    pub activity_date: NaiveDate,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::transportation)]
pub struct NewTransportationRecord {
    pub user_id: i32,
    pub transport_mode: String,
    pub distance: f64,
    pub fuel_type: Option<String>,
    pub carbon_emissions: f64,
    pub activity_date: NaiveDate,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::home_energy)]
#[diesel(primary_key(energy_id))]
#[diesel(belongs_to(User))]
pub struct HomeEnergyRecord {
    pub energy_id: i32,
    pub user_id: i32,
    pub electricity_usage: f64,
    pub gas_usage: f64,
    pub water_usage: f64,
    pub heating_usage: f64,
    pub carbon_emissions: f64,
    pub consumption_date: NaiveDate,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::home_energy)]
pub struct NewHomeEnergyRecord {
    pub user_id: i32,
    pub electricity_usage: f64,
    pub gas_usage: f64,
    pub water_usage: f64,
    pub heating_usage: f64,
    pub carbon_emissions: f64,
    pub consumption_date: NaiveDate,
}
