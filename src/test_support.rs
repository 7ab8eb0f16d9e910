//! Shared fixtures for the unit tests: an in-memory store with the schema
//! applied, plus row insert helpers with sensible fixed defaults.

use crate::db::models::{
    fuel_type, transport_mode, NewActivityCategory, NewDailyActivity, NewHomeEnergyRecord,
    NewTransportationRecord, NewUser,
};
use crate::schema;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::{Connection, SqliteConnection};
use diesel_migrations::MigrationHarness;

const FLOAT_EPSILON: f64 = 1e-6;

pub fn approx_eq(lhs: f64, rhs: f64) -> bool {
    (lhs - rhs).abs() <= FLOAT_EPSILON
}

/// Applies the embedded migrations, including the reference category rows.
pub fn provision(conn: &mut SqliteConnection) {
    conn.run_pending_migrations(crate::MIGRATIONS)
        .expect("apply migrations");
}

/// A fresh in-memory store with the full schema. Each call is an isolated
/// database; dropping the connection discards it.
pub fn store() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").expect("open in-memory store");
    provision(&mut conn);
    conn
}

pub fn insert_user(conn: &mut SqliteConnection, name: &str, email: &str) -> i32 {
    use schema::users::dsl as U;

    diesel::insert_into(U::users)
        .values(&NewUser {
            name: name.to_string(),
            email: email.to_string(),
            household_size: Some(2),
            location: Some("London, UK".to_string()),
        })
        .execute(conn)
        .expect("insert user");

    U::users
        .filter(U::email.eq(email))
        .select(U::user_id)
        .first(conn)
        .expect("fetch user id")
}

/// One home-energy day with the given electricity draw and total emissions;
/// the other meters use fixed values (gas 12 kWh, water 180 L, heating 6 kWh).
pub fn insert_home_energy(
    conn: &mut SqliteConnection,
    user_id: i32,
    date: NaiveDate,
    electricity: f64,
    emissions: f64,
) {
    use schema::home_energy::dsl as H;

    diesel::insert_into(H::home_energy)
        .values(&NewHomeEnergyRecord {
            user_id,
            electricity_usage: electricity,
            gas_usage: 12.0,
            water_usage: 180.0,
            heating_usage: 6.0,
            carbon_emissions: emissions,
            consumption_date: date,
        })
        .execute(conn)
        .expect("insert home energy");
}

pub fn insert_transport(conn: &mut SqliteConnection, user_id: i32, date: NaiveDate, emissions: f64) {
    use schema::transportation::dsl as T;

    diesel::insert_into(T::transportation)
        .values(&NewTransportationRecord {
            user_id,
            transport_mode: transport_mode::CAR_PETROL.to_string(),
            distance: 10.0,
            fuel_type: Some(fuel_type::PETROL.to_string()),
            carbon_emissions: emissions,
            activity_date: date,
        })
        .execute(conn)
        .expect("insert transportation");
}

pub fn insert_category(conn: &mut SqliteConnection, name: &str, unit: &str, factor: f64) -> i32 {
    use schema::activity_categories::dsl as AC;

    diesel::insert_into(AC::activity_categories)
        .values(&NewActivityCategory {
            category_name: name.to_string(),
            unit: unit.to_string(),
            carbon_factor: factor,
        })
        .execute(conn)
        .expect("insert category");

    AC::activity_categories
        .filter(AC::category_name.eq(name))
        .select(AC::category_id)
        .first(conn)
        .expect("fetch category id")
}

pub fn insert_activity(
    conn: &mut SqliteConnection,
    user_id: i32,
    category_id: i32,
    date: NaiveDate,
    quantity: f64,
    emissions: f64,
) {
    use schema::daily_activities::dsl as DA;

    diesel::insert_into(DA::daily_activities)
        .values(&NewDailyActivity {
            user_id,
            category_id,
            activity_date: date,
            quantity,
            carbon_emissions: emissions,
        })
        .execute(conn)
        .expect("insert activity");
}
