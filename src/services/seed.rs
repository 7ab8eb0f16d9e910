use crate::config::CarbonFactors;
use crate::db::models::{
    fuel_type, transport_mode, ActivityCategory, NewDailyActivity, NewHomeEnergyRecord,
    NewTransportationRecord, NewUser,
};
use crate::schema;
use crate::services::ingest::{
    insert_daily_activities, insert_home_energy_records, insert_transportation_records,
};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

const RNG_SEED: u64 = 0x0C02_E000_DEAD_BEEFu64;
const TRANSPORT_PROBABILITY: f64 = 0.7;

struct SampleUser {
    name: &'static str,
    email: &'static str,
    household_size: i32,
    location: &'static str,
}

const SAMPLE_USERS: [SampleUser; 3] = [
    SampleUser {
        name: "John Doe",
        email: "john.doe@example.com",
        household_size: 4,
        location: "London, UK",
    },
    SampleUser {
        name: "Jane Smith",
        email: "jane.smith@example.com",
        household_size: 2,
        location: "Manchester, UK",
    },
    SampleUser {
        name: "Alice Brown",
        email: "alice.brown@example.com",
        household_size: 1,
        location: "Birmingham, UK",
    },
];

// Daily quantity ranges for the metered activity categories. Names must match
// the reference rows loaded by the schema migration.
const METERED_CATEGORIES: [(&str, f64, f64); 3] = [
    ("Electricity", 15.0, 45.0),
    ("Natural Gas", 10.0, 30.0),
    ("Water Usage", 150.0, 400.0),
];

const TRANSPORT_MODES: [&str; 3] = [
    transport_mode::CAR_PETROL,
    transport_mode::CAR_DIESEL,
    transport_mode::PUBLIC_TRANSPORT,
];

/// Populates an empty store with sample users and a trailing window of daily
/// history ending yesterday. A store that already holds users is left alone,
/// so startup seeding stays idempotent. The RNG is seeded from a constant:
/// reruns against a fresh store produce identical data.
pub fn run(conn: &mut SqliteConnection, days: u32, factors: &CarbonFactors) -> Result<(), String> {
    use schema::users::dsl as U;

    let existing: i64 = U::users
        .count()
        .get_result(conn)
        .map_err(|e| format!("count users failed: {}", e))?;
    if existing > 0 {
        info!(
            "Seed: store already holds {} user(s); leaving existing history untouched",
            existing
        );
        return Ok(());
    }
    if days == 0 {
        return Err("Seeding requires at least one day of history".to_string());
    }

    let user_ids = create_sample_users(conn)?;
    let categories = load_category_factors(conn)?;
    let mut rng = SmallRng::seed_from_u64(RNG_SEED);

    let today = Utc::now().date_naive();
    info!(
        "Seed: generating {} day(s) of history for {} user(s), {} to {}",
        days,
        user_ids.len(),
        today - Duration::days(i64::from(days)),
        today - Duration::days(1)
    );

    let mut inserted_activities: usize = 0;
    let mut inserted_trips: usize = 0;
    let mut inserted_energy: usize = 0;

    for &user_id in &user_ids {
        let mut activity_batch = Vec::with_capacity(days as usize * METERED_CATEGORIES.len());
        let mut transport_batch = Vec::with_capacity(days as usize);
        let mut energy_batch = Vec::with_capacity(days as usize);

        for offset in (1..=i64::from(days)).rev() {
            let date = today - Duration::days(offset);

            for (name, low, high) in METERED_CATEGORIES {
                let (category_id, factor) = lookup(&categories, name)?;
                let quantity = rng.random_range(low..=high);
                activity_batch.push(NewDailyActivity {
                    user_id,
                    category_id,
                    activity_date: date,
                    quantity,
                    carbon_emissions: quantity * factor,
                });
            }

            if rng.random_bool(TRANSPORT_PROBABILITY) {
                let mode = TRANSPORT_MODES[rng.random_range(0..TRANSPORT_MODES.len())];
                let (_, factor) = lookup(&categories, mode)?;
                let distance = rng.random_range(5.0..=50.0);
                transport_batch.push(NewTransportationRecord {
                    user_id,
                    transport_mode: mode.to_string(),
                    distance,
                    fuel_type: fuel_for_mode(mode).map(str::to_string),
                    carbon_emissions: distance * factor,
                    activity_date: date,
                });
            }

            let electricity = rng.random_range(15.0..=45.0);
            let gas = rng.random_range(10.0..=30.0);
            let water = rng.random_range(150.0..=400.0);
            let heating = rng.random_range(5.0..=25.0);
            energy_batch.push(NewHomeEnergyRecord {
                user_id,
                electricity_usage: electricity,
                gas_usage: gas,
                water_usage: water,
                heating_usage: heating,
                carbon_emissions: electricity * factors.electricity_kg_per_kwh
                    + gas * factors.gas_kg_per_kwh
                    + water * factors.water_kg_per_litre
                    + heating * factors.heating_kg_per_kwh,
                consumption_date: date,
            });
        }

        inserted_activities += insert_daily_activities(conn, &activity_batch)?;
        inserted_trips += insert_transportation_records(conn, &transport_batch)?;
        inserted_energy += insert_home_energy_records(conn, &energy_batch)?;
    }

    info!(
        "Seed: complete (users={}, activities={}, trips={}, energy_days={})",
        user_ids.len(),
        inserted_activities,
        inserted_trips,
        inserted_energy
    );

    Ok(())
}

fn create_sample_users(conn: &mut SqliteConnection) -> Result<Vec<i32>, String> {
    use schema::users::dsl as U;

    let rows: Vec<NewUser> = SAMPLE_USERS
        .iter()
        .map(|sample| NewUser {
            name: sample.name.to_string(),
            email: sample.email.to_string(),
            household_size: Some(sample.household_size),
            location: Some(sample.location.to_string()),
        })
        .collect();

    diesel::insert_into(U::users)
        .values(&rows)
        .execute(conn)
        .map_err(|e| format!("insert sample users failed: {}", e))?;

    U::users
        .order(U::user_id.asc())
        .select(U::user_id)
        .load(conn)
        .map_err(|e| format!("fetch sample user ids failed: {}", e))
}

/// Reference categories keyed by name, carrying (id, carbon factor).
fn load_category_factors(
    conn: &mut SqliteConnection,
) -> Result<BTreeMap<String, (i32, f64)>, String> {
    use schema::activity_categories::dsl as AC;

    let rows: Vec<ActivityCategory> = AC::activity_categories
        .select(ActivityCategory::as_select())
        .load(conn)
        .map_err(|e| format!("fetch activity categories failed: {}", e))?;

    Ok(rows
        .into_iter()
        .map(|category| {
            (
                category.category_name,
                (category.category_id, category.carbon_factor),
            )
        })
        .collect())
}

fn lookup(categories: &BTreeMap<String, (i32, f64)>, name: &str) -> Result<(i32, f64), String> {
    categories
        .get(name)
        .copied()
        .ok_or_else(|| format!("reference category {} missing from the store", name))
}

fn fuel_for_mode(mode: &str) -> Option<&'static str> {
    match mode {
        transport_mode::CAR_PETROL => Some(fuel_type::PETROL),
        transport_mode::CAR_DIESEL => Some(fuel_type::DIESEL),
        transport_mode::PUBLIC_TRANSPORT => Some(fuel_type::ELECTRIC),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{approx_eq, store};
    use chrono::NaiveDate;

    fn count_users(conn: &mut SqliteConnection) -> i64 {
        use schema::users::dsl as U;
        U::users.count().get_result(conn).expect("count users")
    }

    #[test]
    fn seeding_a_populated_store_is_a_no_op() {
        let mut conn = store();
        let factors = CarbonFactors::default();

        run(&mut conn, 5, &factors).expect("first seed");
        assert_eq!(count_users(&mut conn), 3);

        run(&mut conn, 5, &factors).expect("second seed");
        assert_eq!(count_users(&mut conn), 3);

        use schema::home_energy::dsl as H;
        let energy_days: i64 = H::home_energy.count().get_result(&mut conn).expect("count");
        assert_eq!(energy_days, 15);
    }

    #[test]
    fn history_covers_the_requested_days_and_honours_reference_factors() {
        let mut conn = store();
        run(&mut conn, 5, &CarbonFactors::default()).expect("seed");

        let today = Utc::now().date_naive();

        use schema::activity_categories::dsl as AC;
        use schema::daily_activities::dsl as DA;
        let activities: Vec<(NaiveDate, f64, f64, f64)> = DA::daily_activities
            .inner_join(AC::activity_categories)
            .select((
                DA::activity_date,
                DA::quantity,
                DA::carbon_emissions,
                AC::carbon_factor,
            ))
            .load(&mut conn)
            .expect("load activities");

        // 3 users x 5 days x 3 metered categories.
        assert_eq!(activities.len(), 45);
        for (date, quantity, emissions, factor) in activities {
            assert!(date < today && date >= today - Duration::days(5));
            assert!(approx_eq(emissions, quantity * factor));
        }
    }

    #[test]
    fn fresh_stores_seed_identically() {
        let mut first = store();
        let mut second = store();
        run(&mut first, 7, &CarbonFactors::default()).expect("seed first");
        run(&mut second, 7, &CarbonFactors::default()).expect("seed second");

        use schema::home_energy::dsl as H;
        let series = |conn: &mut SqliteConnection| -> Vec<(NaiveDate, f64)> {
            H::home_energy
                .order((H::user_id.asc(), H::consumption_date.asc()))
                .select((H::consumption_date, H::carbon_emissions))
                .load(conn)
                .expect("load energy")
        };
        assert_eq!(series(&mut first), series(&mut second));
    }

    #[test]
    fn zero_days_is_rejected() {
        let mut conn = store();
        let err = run(&mut conn, 0, &CarbonFactors::default()).unwrap_err();
        assert!(err.contains("at least one day"), "unexpected error: {}", err);
    }
}
