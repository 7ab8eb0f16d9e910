use crate::db::models::HomeEnergyRecord;
use crate::schema;
use chrono::{Datelike, NaiveDate};
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPattern {
    pub consumption_date: NaiveDate,
    pub electricity_usage: f64,
    pub gas_usage: f64,
    pub water_usage: f64,
    pub heating_usage: f64,
    pub home_emissions: f64,
    pub transport_emissions: f64,
    pub total_emissions: f64,
    /// Monday = 0 .. Sunday = 6.
    pub day_of_week: u32,
    pub month: u32,
    /// ISO week number; the first days of January can belong to week 52/53
    /// of the previous ISO year.
    pub week_of_year: u32,
}

/// Sum transportation emissions per date for one user. A day may hold any
/// number of trips; days without trips are absent from the map.
pub fn transport_daily_totals(conn: &mut SqliteConnection, user_id: i32) -> Result<BTreeMap<NaiveDate, f64>, String> {
    use schema::transportation::dsl as T;

    let rows: Vec<(NaiveDate, Option<f64>)> = T::transportation
        .filter(T::user_id.eq(user_id))
        .group_by(T::activity_date)
        .select((T::activity_date, sum(T::carbon_emissions)))
        .load(conn)
        .map_err(|e| format!("aggregate transportation emissions failed: {}", e))?;

    Ok(rows
        .into_iter()
        .map(|(date, total)| (date, total.unwrap_or(0.0)))
        .collect())
}

/// Combined per-day emission patterns over the user's full history, oldest
/// first. Home energy anchors the join: a day without a home-energy row does
/// not appear in the output even when trips were logged for it.
pub fn analyze(conn: &mut SqliteConnection, user_id: i32) -> Result<Vec<DailyPattern>, String> {
    use schema::home_energy::dsl as H;

    let transport = transport_daily_totals(conn, user_id)?;

    let home_rows: Vec<HomeEnergyRecord> = H::home_energy
        .filter(H::user_id.eq(user_id))
        .order(H::consumption_date.asc())
        .select(HomeEnergyRecord::as_select())
        .load(conn)
        .map_err(|e| format!("query home energy history failed: {}", e))?;

    Ok(home_rows
        .into_iter()
        .map(|row| {
            let date = row.consumption_date;
            let transport_emissions = transport.get(&date).copied().unwrap_or(0.0);
            DailyPattern {
                consumption_date: date,
                electricity_usage: row.electricity_usage,
                gas_usage: row.gas_usage,
                water_usage: row.water_usage,
                heating_usage: row.heating_usage,
                home_emissions: row.carbon_emissions,
                transport_emissions,
                total_emissions: row.carbon_emissions + transport_emissions,
                day_of_week: date.weekday().num_days_from_monday(),
                month: date.month(),
                week_of_year: date.iso_week().week(),
            }
        })
        .collect())
}
