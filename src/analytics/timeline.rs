use crate::schema;
use chrono::{Duration, NaiveDate, Utc};
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCarbon {
    pub consumption_date: NaiveDate,
    pub daily_carbon: f64,
}

/// Daily home-energy emission totals for one user over the trailing window,
/// oldest first. A user with no rows in range yields an empty series.
pub fn daily_totals(conn: &mut SqliteConnection, user_id: i32, window_days: u32) -> Result<Vec<DailyCarbon>, String> {
    daily_totals_as_of(conn, user_id, window_days, Utc::now().date_naive())
}

fn daily_totals_as_of(
    conn: &mut SqliteConnection,
    user_id: i32,
    window_days: u32,
    today: NaiveDate,
) -> Result<Vec<DailyCarbon>, String> {
    use schema::home_energy::dsl as H;

    let start = today - Duration::days(i64::from(window_days));

    // The store keeps one row per (user, date); summing per date still guards
    // against duplicates slipping in through an out-of-band write.
    let rows: Vec<(NaiveDate, Option<f64>)> = H::home_energy
        .filter(H::user_id.eq(user_id))
        .filter(H::consumption_date.ge(start))
        .filter(H::consumption_date.le(today))
        .group_by(H::consumption_date)
        .select((H::consumption_date, sum(H::carbon_emissions)))
        .order(H::consumption_date.asc())
        .load(conn)
        .map_err(|e| format!("query carbon timeline failed: {}", e))?;

    Ok(rows
        .into_iter()
        .map(|(consumption_date, total)| DailyCarbon {
            consumption_date,
            daily_carbon: total.unwrap_or(0.0),
        })
        .collect())
}
