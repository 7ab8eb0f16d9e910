use crate::analytics::patterns::transport_daily_totals;
use crate::schema;
use crate::utils::{mean, round2};
use chrono::{Duration, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub recent_avg: f64,
    pub previous_avg: f64,
    pub change_percent: f64,
    pub trend: TrendDirection,
}

/// Outcome of comparing the two halves of the trailing `2 x period` window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrendOutcome {
    Trend(TrendReport),
    /// Fewer combined-emission days on record than the requested period.
    InsufficientData { available: usize, required: usize },
    /// The previous-half mean is zero, so a percentage change is undefined.
    UndefinedBaseline,
}

pub fn detect(
    conn: &mut SqliteConnection,
    user_id: i32,
    period_days: u32,
) -> Result<TrendOutcome, String> {
    detect_as_of(conn, user_id, period_days, Utc::now().date_naive())
}

fn detect_as_of(
    conn: &mut SqliteConnection,
    user_id: i32,
    period_days: u32,
    today: NaiveDate,
) -> Result<TrendOutcome, String> {
    use schema::home_energy::dsl as H;

    let start = today - Duration::days(i64::from(period_days) * 2);
    let transport = transport_daily_totals(conn, user_id)?;
    let home_rows: Vec<(NaiveDate, f64)> = H::home_energy
        .filter(H::user_id.eq(user_id))
        .filter(H::consumption_date.ge(start))
        .filter(H::consumption_date.le(today))
        .order(H::consumption_date.asc())
        .select((H::consumption_date, H::carbon_emissions))
        .load(conn)
        .map_err(|e| format!("query emission window failed: {}", e))?;

    let combined: Vec<f64> = home_rows
        .into_iter()
        .map(|(date, home)| home + transport.get(&date).copied().unwrap_or(0.0))
        .collect();

    let required = period_days as usize;
    if combined.len() < required {
        return Ok(TrendOutcome::InsufficientData {
            available: combined.len(),
            required,
        });
    }

    // Positional split: halves are sized by row count, not by calendar
    // midpoint, and an odd row lands in the recent half.
    let midpoint = combined.len() / 2;
    let (previous, recent) = combined.split_at(midpoint);
    let (previous_avg, recent_avg) = match (mean(previous), mean(recent)) {
        (Some(p), Some(r)) if p != 0.0 => (p, r),
        _ => return Ok(TrendOutcome::UndefinedBaseline),
    };

    let change_percent = (recent_avg - previous_avg) / previous_avg * 100.0;
    // Classified before rounding so a sub-0.005% drift is not reported flat.
    let trend = if change_percent > 0.0 {
        TrendDirection::Increasing
    } else if change_percent < 0.0 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    Ok(TrendOutcome::Trend(TrendReport {
        recent_avg: round2(recent_avg),
        previous_avg: round2(previous_avg),
        change_percent: round2(change_percent),
        trend,
    }))
}
