pub mod analytics {
    pub mod activities;
    pub mod engine;
    pub mod patterns;
    pub mod suggestions;
    pub mod timeline;
    pub mod trends;
}
pub mod config;
pub mod db {
    pub mod models;
}
pub mod schema;
pub mod services {
    pub mod ingest;
    pub mod seed;
}
pub mod utils;

#[cfg(test)]
mod test_support;

use crate::analytics::engine::CarbonAnalytics;
use crate::analytics::trends::TrendOutcome;
use crate::config::Config;
use crate::db::models::User;
use crate::services::seed;
use diesel::prelude::*;
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{error, info};
use std::path::{Path, PathBuf};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

fn apply_store_migrations(conn: &mut SqliteConnection) -> Result<(), String> {
    match conn.run_pending_migrations(MIGRATIONS) {
        Ok(applied) => {
            if applied.is_empty() {
                info!("Store schema is up to date; no migrations were applied");
            } else {
                let names = applied.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
                info!("Applied {} store migration(s): {}", applied.len(), names);
            }
            Ok(())
        }
        Err(e) => Err(format!("Applying store migrations failed: {}", e)),
    }
}

fn demo_user(conn: &mut SqliteConnection) -> Result<Option<User>, String> {
    use schema::users::dsl as U;

    U::users
        .order(U::user_id.asc())
        .select(User::as_select())
        .first(conn)
        .optional()
        .map_err(|e| format!("fetch demo user failed: {}", e))
}

pub fn run() -> Result<(), String> {
    // 1) Load config
    let cfg = Config::from_env()?;
    info!(
        "Config loaded (database_url={}, timeline_window={}d, trend_period={}d, top_activities={}, seed_enabled={}, seed_days={})",
        cfg.database_url,
        cfg.timeline_window_days,
        cfg.trend_period_days,
        cfg.top_activities,
        cfg.seed_enabled,
        cfg.seed_days
    );

    // 2) Connect to the emission store
    let mut conn = SqliteConnection::establish(&cfg.database_url)
        .map_err(|e| format!("emission store connection failed: {}", e))?;
    info!("Connected to emission store at {}", cfg.database_url);

    // 3) Apply pending store migrations
    apply_store_migrations(&mut conn)?;

    // 4) Seed sample data
    if cfg.seed_enabled {
        seed::run(&mut conn, cfg.seed_days, &cfg.carbon_factors)?;
    } else {
        info!("Seeding disabled via SEED_ENABLED={}", cfg.seed_enabled);
    }

    // 5) Pick the demo user
    let Some(user) = demo_user(&mut conn)? else {
        info!("Store holds no users; nothing to analyze");
        return Ok(());
    };
    let user_id = user.user_id;
    // Engine operations open their own connections.
    drop(conn);

    // 6) Exercise every analytics operation
    let engine = CarbonAnalytics::new(&cfg);
    info!("Running analytics for {} (user {})", user.name, user_id);

    let series = engine.carbon_timeline(user_id, None)?;
    let window_total: f64 = series.iter().map(|day| day.daily_carbon).sum();
    info!(
        "Timeline: {} day(s) within the {}-day window, {:.2} kg CO2e total",
        series.len(),
        cfg.timeline_window_days,
        window_total
    );

    let patterns = engine.carbon_patterns(user_id)?;
    info!("Patterns: {} day(s) of combined history", patterns.len());
    if let Some(latest) = patterns.last() {
        info!(
            "Latest day {}: home {:.2} + transport {:.2} = {:.2} kg CO2e (dow={}, iso_week={})",
            latest.consumption_date,
            latest.home_emissions,
            latest.transport_emissions,
            latest.total_emissions,
            latest.day_of_week,
            latest.week_of_year
        );
    }

    let ranked = engine.eco_heavy_activities(user_id, None)?;
    info!("Heaviest activity categories (top {}):", ranked.len());
    for (position, summary) in ranked.iter().enumerate() {
        info!(
            "  {}. {}: {:.2} kg CO2e total over {} log(s), avg {:.2} per log",
            position + 1,
            summary.category_name,
            summary.total_carbon,
            summary.frequency,
            summary.avg_carbon
        );
    }

    match engine.carbon_trends(user_id, None)? {
        TrendOutcome::Trend(report) => info!(
            "Trend over 2x{} day(s): {} ({:+.2}%, previous avg {:.2}, recent avg {:.2})",
            cfg.trend_period_days,
            report.trend,
            report.change_percent,
            report.previous_avg,
            report.recent_avg
        ),
        TrendOutcome::InsufficientData { available, required } => info!(
            "Trend: insufficient data ({} of {} required day(s) on record)",
            available, required
        ),
        TrendOutcome::UndefinedBaseline => {
            info!("Trend: undefined (previous period mean is zero)")
        }
    }

    let suggestions = engine.optimization_suggestions(user_id)?;
    let rendered = serde_json::to_string_pretty(&suggestions)
        .map_err(|e| format!("serialize suggestions failed: {}", e))?;
    info!("Suggestions ({}):\n{}", suggestions.len(), rendered);

    Ok(())
}

fn load_default_env_file() -> Result<Option<PathBuf>, String> {
    let cwd = std::env::current_dir().map_err(|e| format!("unable to read current directory: {}", e))?;
    let path = cwd.join(".env");
    if !path.is_file() {
        return Ok(None);
    }
    load_env_file(&path)?;
    Ok(Some(path))
}

fn load_env_file(path: &Path) -> Result<(), String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

    for (index, line) in contents.lines().enumerate() {
        match parse_env_assignment(line) {
            Ok(Some((key, value))) => {
                // Preserve any value that was already supplied via the process environment.
                if std::env::var_os(&key).is_none() {
                    // Updating process-level environment variables is unsafe on some targets.
                    unsafe {
                        std::env::set_var(key, value);
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                return Err(format!("{}:{}: {}", path.display(), index + 1, e));
            }
        }
    }

    Ok(())
}

/// Parses one `KEY=value` line; blank lines and `#` comments yield `None`.
/// Values may be wrapped in single or double quotes; unquoted values are cut
/// at the first `#`.
fn parse_env_assignment(line: &str) -> Result<Option<(String, String)>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let without_export = trimmed
        .strip_prefix("export ")
        .map(str::trim_start)
        .unwrap_or(trimmed);
    let (key, raw_value) = without_export
        .split_once('=')
        .ok_or_else(|| "missing '=' in assignment".to_string())?;

    let key = key.trim();
    if key.is_empty() {
        return Err("environment variable name cannot be empty".to_string());
    }
    if key.chars().any(|c| c.is_whitespace()) {
        return Err(format!("environment variable name contains whitespace: {}", key));
    }

    let value = raw_value.trim();
    let value = if let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        inner.to_string()
    } else if let Some(inner) = value
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        inner.to_string()
    } else {
        value.split('#').next().unwrap_or_default().trim_end().to_string()
    };

    Ok(Some((key.to_string(), value)))
}

fn main() {
    let loaded_env = match load_default_env_file() {
        Ok(path) => path,
        Err(err) => {
            eprintln!("fatal: {}", err);
            std::process::exit(1);
        }
    };

    // Init logging after environment so RUST_LOG from .env is respected.
    let default_filter = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_secs()
        .init();

    if let Some(path) = loaded_env.as_ref() {
        info!("Environment loaded from .env file: {}", path.display());
    }

    info!(
        "carbon-tracker {} (git {}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );
    if let Err(e) = run() {
        error!("fatal: {}", e);
        std::process::exit(1);
    }
}
