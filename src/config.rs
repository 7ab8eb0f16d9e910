//! Minimal runtime configuration helpers.
//! Defaults align with a local file-backed SQLite store and one year of
//! seeded sample history.

use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "carbon_footprint_tracker.db";
pub const DEFAULT_TIMELINE_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_TREND_PERIOD_DAYS: u32 = 30;
pub const DEFAULT_TOP_ACTIVITIES: usize = 5;
pub const DEFAULT_SEED_DAYS: u32 = 365;

/// Day-count settings are subtracted from today; cap them so the result
/// stays a representable date.
pub const MAX_HISTORY_DAYS: u32 = 3650;

pub const DEFAULT_FACTOR_ELECTRICITY: f64 = 0.233;
pub const DEFAULT_FACTOR_GAS: f64 = 0.184;
pub const DEFAULT_FACTOR_WATER: f64 = 0.0003;
pub const DEFAULT_FACTOR_HEATING: f64 = 0.2;

/// Carbon intensity of the four home meters, in kg CO2 per kWh (water: per
/// litre). Used when seeding home-energy rows; logged activity rows carry
/// factors from the `activity_categories` reference data instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarbonFactors {
    pub electricity_kg_per_kwh: f64,
    pub gas_kg_per_kwh: f64,
    pub water_kg_per_litre: f64,
    pub heating_kg_per_kwh: f64,
}

impl Default for CarbonFactors {
    fn default() -> Self {
        CarbonFactors {
            electricity_kg_per_kwh: DEFAULT_FACTOR_ELECTRICITY,
            gas_kg_per_kwh: DEFAULT_FACTOR_GAS,
            water_kg_per_litre: DEFAULT_FACTOR_WATER,
            heating_kg_per_kwh: DEFAULT_FACTOR_HEATING,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Emission store location: a SQLite database path.
    pub database_url: String,
    /// Default window for the daily carbon timeline.
    pub timeline_window_days: u32,
    /// Default period for trend detection; the fetched window is twice this.
    pub trend_period_days: u32,
    /// Default number of categories reported by the activity ranking.
    pub top_activities: usize,
    /// Populate an empty store with sample users and history on startup.
    pub seed_enabled: bool,
    pub seed_days: u32,
    pub carbon_factors: CarbonFactors,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let timeline_window_days = window_in_range(
            "TIMELINE_WINDOW_DAYS",
            parse_env("TIMELINE_WINDOW_DAYS", DEFAULT_TIMELINE_WINDOW_DAYS)?,
        )?;
        let trend_period_days = window_in_range(
            "TREND_PERIOD_DAYS",
            parse_env("TREND_PERIOD_DAYS", DEFAULT_TREND_PERIOD_DAYS)?,
        )?;

        let top_activities = parse_env("TOP_ACTIVITIES", DEFAULT_TOP_ACTIVITIES)?;

        let seed_enabled = std::env::var("SEED_ENABLED")
            .ok()
            .map(|s| matches!(s.as_str(), "1" | "true" | "TRUE"))
            .unwrap_or(true);
        // Zero is allowed here; the seeder rejects it when seeding is enabled.
        let seed_days = parse_env("SEED_DAYS", DEFAULT_SEED_DAYS)?;
        if seed_days > MAX_HISTORY_DAYS {
            return Err(format!("SEED_DAYS must be at most {}", MAX_HISTORY_DAYS));
        }

        let carbon_factors = CarbonFactors {
            electricity_kg_per_kwh: parse_env("CARBON_FACTOR_ELECTRICITY", DEFAULT_FACTOR_ELECTRICITY)?,
            gas_kg_per_kwh: parse_env("CARBON_FACTOR_GAS", DEFAULT_FACTOR_GAS)?,
            water_kg_per_litre: parse_env("CARBON_FACTOR_WATER", DEFAULT_FACTOR_WATER)?,
            heating_kg_per_kwh: parse_env("CARBON_FACTOR_HEATING", DEFAULT_FACTOR_HEATING)?,
        };

        Ok(Config {
            database_url,
            timeline_window_days,
            trend_period_days,
            top_activities,
            seed_enabled,
            seed_days,
            carbon_factors,
        })
    }
}

/// Parse an optional environment variable; missing or blank values fall back
/// to the default, while malformed explicit values are configuration errors.
fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T, String> {
    match std::env::var(name) {
        Ok(s) if !s.trim().is_empty() => s
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a number", name)),
        _ => Ok(default),
    }
}

fn window_in_range(name: &str, days: u32) -> Result<u32, String> {
    if (1..=MAX_HISTORY_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(format!("{} must be between 1 and {}", name, MAX_HISTORY_DAYS))
    }
}
