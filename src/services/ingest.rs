use crate::db::models::{NewDailyActivity, NewHomeEnergyRecord, NewTransportationRecord};
use crate::schema;
use diesel::prelude::*;
use diesel::SqliteConnection;

pub fn insert_daily_activities(
    conn: &mut SqliteConnection,
    rows: &[NewDailyActivity],
) -> Result<usize, String> {
    if rows.is_empty() {
        return Ok(0);
    }

    use schema::daily_activities::dsl as DA;

    diesel::insert_into(DA::daily_activities)
        .values(rows)
        .execute(conn)
        .map_err(|e| format!("insert daily activities failed: {}", e))
}

pub fn insert_transportation_records(
    conn: &mut SqliteConnection,
    rows: &[NewTransportationRecord],
) -> Result<usize, String> {
    if rows.is_empty() {
        return Ok(0);
    }

    use schema::transportation::dsl as T;

    diesel::insert_into(T::transportation)
        .values(rows)
        .execute(conn)
        .map_err(|e| format!("insert transportation rows failed: {}", e))
}

/// Home energy is keyed by (user, date); an already-recorded day is left
/// untouched so a re-run of the seeding path cannot duplicate history.
/// INSERT OR IGNORE leans on the UNIQUE (user_id, consumption_date) index.
pub fn insert_home_energy_records(
    conn: &mut SqliteConnection,
    rows: &[NewHomeEnergyRecord],
) -> Result<usize, String> {
    if rows.is_empty() {
        return Ok(0);
    }

    use schema::home_energy::dsl as H;

    diesel::insert_or_ignore_into(H::home_energy)
        .values(rows)
        .execute(conn)
        .map_err(|e| format!("insert home energy rows failed: {}", e))
}
