use crate::analytics::activities::{self, ActivitySummary};
use crate::analytics::patterns::{self, DailyPattern};
use crate::analytics::suggestions::{self, Suggestion};
use crate::analytics::timeline::{self, DailyCarbon};
use crate::analytics::trends::{self, TrendOutcome};
use crate::config::Config;
use diesel::{Connection, SqliteConnection};

/// Facade over the analytics queries. Every operation opens its own
/// short-lived connection, so one instance can be shared freely and a
/// failing query never poisons the next call.
pub struct CarbonAnalytics {
    database_url: String,
    timeline_window_days: u32,
    trend_period_days: u32,
    top_activities: usize,
}

impl CarbonAnalytics {
    pub fn new(config: &Config) -> Self {
        CarbonAnalytics {
            database_url: config.database_url.clone(),
            timeline_window_days: config.timeline_window_days,
            trend_period_days: config.trend_period_days,
            top_activities: config.top_activities,
        }
    }

    fn connect(&self) -> Result<SqliteConnection, String> {
        SqliteConnection::establish(&self.database_url)
            .map_err(|e| format!("emission store connection failed: {}", e))
    }

    /// Daily emission totals over the trailing window, oldest first.
    pub fn carbon_timeline(
        &self,
        user_id: i32,
        window_days: Option<u32>,
    ) -> Result<Vec<DailyCarbon>, String> {
        let mut conn = self.connect()?;
        let window = window_days.unwrap_or(self.timeline_window_days);
        timeline::daily_totals(&mut conn, user_id, window)
    }

    /// Per-day usage patterns with calendar features, over the full history.
    pub fn carbon_patterns(&self, user_id: i32) -> Result<Vec<DailyPattern>, String> {
        let mut conn = self.connect()?;
        patterns::analyze(&mut conn, user_id)
    }

    /// Activity categories ranked by total emissions, heaviest first.
    pub fn eco_heavy_activities(
        &self,
        user_id: i32,
        top_n: Option<usize>,
    ) -> Result<Vec<ActivitySummary>, String> {
        let mut conn = self.connect()?;
        let top = top_n.unwrap_or(self.top_activities);
        activities::top_by_emissions(&mut conn, user_id, top)
    }

    /// Half-over-half emission trend across the trailing `2 x period` window.
    pub fn carbon_trends(
        &self,
        user_id: i32,
        period_days: Option<u32>,
    ) -> Result<TrendOutcome, String> {
        let mut conn = self.connect()?;
        let period = period_days.unwrap_or(self.trend_period_days);
        trends::detect(&mut conn, user_id, period)
    }

    /// Rule-based optimization suggestions for the user's history.
    pub fn optimization_suggestions(&self, user_id: i32) -> Result<Vec<Suggestion>, String> {
        let mut conn = self.connect()?;
        suggestions::generate(&mut conn, user_id, self.top_activities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::trends::TrendDirection;
    use crate::config::CarbonFactors;
    use crate::test_support::{
        insert_activity, insert_category, insert_home_energy, insert_transport, insert_user,
        provision,
    };
    use chrono::{Duration, Utc};

    fn file_backed_config(dir: &tempfile::TempDir) -> Config {
        Config {
            database_url: dir
                .path()
                .join("engine_test.db")
                .to_string_lossy()
                .into_owned(),
            timeline_window_days: 30,
            trend_period_days: 30,
            top_activities: 5,
            seed_enabled: false,
            seed_days: 0,
            carbon_factors: CarbonFactors::default(),
        }
    }

    #[test]
    fn every_operation_runs_against_the_same_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = file_backed_config(&dir);

        let mut conn = SqliteConnection::establish(&config.database_url).expect("open store");
        provision(&mut conn);
        let user = insert_user(&mut conn, "Ada", "ada@example.com");
        let today = Utc::now().date_naive();
        insert_home_energy(&mut conn, user, today - Duration::days(2), 35.0, 12.0);
        insert_home_energy(&mut conn, user, today - Duration::days(1), 35.0, 10.0);
        insert_transport(&mut conn, user, today - Duration::days(1), 3.0);
        let dryer = insert_category(&mut conn, "Tumble Dryer", "kWh", 0.7);
        insert_activity(&mut conn, user, dryer, today - Duration::days(1), 2.0, 4.0);
        drop(conn);

        let engine = CarbonAnalytics::new(&config);

        let series = engine.carbon_timeline(user, None).expect("timeline");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].consumption_date, today - Duration::days(2));

        let patterns = engine.carbon_patterns(user).expect("patterns");
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[1].total_emissions, 13.0);

        let ranked = engine.eco_heavy_activities(user, None).expect("activities");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].category_name, "Tumble Dryer");

        let outcome = engine.carbon_trends(user, Some(1)).expect("trends");
        match outcome {
            TrendOutcome::Trend(report) => assert_eq!(report.trend, TrendDirection::Increasing),
            other => panic!("expected a trend report, got {:?}", other),
        }

        let suggestions = engine.optimization_suggestions(user).expect("suggestions");
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn explicit_parameters_override_the_configured_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = file_backed_config(&dir);

        let mut conn = SqliteConnection::establish(&config.database_url).expect("open store");
        provision(&mut conn);
        let user = insert_user(&mut conn, "Ada", "ada@example.com");
        let today = Utc::now().date_naive();
        let dryer = insert_category(&mut conn, "Tumble Dryer", "kWh", 0.7);
        let heater = insert_category(&mut conn, "Patio Heater", "kWh", 3.4);
        insert_activity(&mut conn, user, dryer, today - Duration::days(1), 2.0, 4.0);
        insert_activity(&mut conn, user, heater, today - Duration::days(1), 2.0, 9.0);
        drop(conn);

        let engine = CarbonAnalytics::new(&config);
        let ranked = engine.eco_heavy_activities(user, Some(1)).expect("activities");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].category_name, "Patio Heater");
    }

    #[test]
    fn unreachable_store_paths_surface_as_connection_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = file_backed_config(&dir);
        config.database_url = dir
            .path()
            .join("missing/nested/engine_test.db")
            .to_string_lossy()
            .into_owned();

        let engine = CarbonAnalytics::new(&config);
        let err = engine.carbon_timeline(1, None).unwrap_err();
        assert!(err.contains("connection failed"), "unexpected error: {}", err);
    }
}
