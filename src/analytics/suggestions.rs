use crate::analytics::activities;
use crate::analytics::patterns::{self, DailyPattern};
use crate::utils::{mean, round2};
use diesel::SqliteConnection;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Mean daily electricity draw (kWh) above which the electricity rule fires.
pub const ELECTRICITY_DAILY_KWH_THRESHOLD: f64 = 30.0;
/// Mean daily transport emissions (kg CO2e) above which the transport rule fires.
pub const TRANSPORT_DAILY_KG_THRESHOLD: f64 = 2.0;
/// How many peak months the seasonal suggestion names.
pub const PEAK_MONTH_COUNT: usize = 3;

const ELECTRICITY_ADVICE: &str =
    "Consider switching to LED bulbs and unplugging devices when not in use";
const TRANSPORT_ADVICE: &str = "Try using public transport or cycling for short trips";
const SEASONAL_ADVICE: &str = "Focus on energy efficiency during high-consumption months";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionCategory {
    Electricity,
    Transportation,
    #[serde(rename = "Seasonal Optimization")]
    SeasonalOptimization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: SuggestionCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_months: Option<Vec<u32>>,
    pub suggestion: String,
    pub potential_reduction: String,
}

/// Rule-based optimization hints derived from the user's full usage history.
/// The electricity and transportation rules are threshold-gated; the seasonal
/// one is emitted whenever any history exists. `top_n` sets how deep the
/// activity ranking consulted alongside the patterns goes.
pub fn generate(
    conn: &mut SqliteConnection,
    user_id: i32,
    top_n: usize,
) -> Result<Vec<Suggestion>, String> {
    let patterns = patterns::analyze(conn, user_id)?;
    if patterns.is_empty() {
        info!(
            "Suggestions: user {} has no usage history yet, nothing to recommend",
            user_id
        );
        return Ok(Vec::new());
    }
    let heavy = activities::top_by_emissions(conn, user_id, top_n)?;
    debug!(
        "Suggestions: evaluating {} day(s) of patterns and {} ranked categories for user {}",
        patterns.len(),
        heavy.len(),
        user_id
    );

    let mut suggestions = Vec::new();

    let electricity: Vec<f64> = patterns.iter().map(|p| p.electricity_usage).collect();
    if let Some(avg) = mean(&electricity)
        && avg > ELECTRICITY_DAILY_KWH_THRESHOLD
    {
        suggestions.push(Suggestion {
            category: SuggestionCategory::Electricity,
            current_avg: Some(round2(avg)),
            peak_months: None,
            suggestion: ELECTRICITY_ADVICE.to_string(),
            potential_reduction: "15-20%".to_string(),
        });
    }

    let transport: Vec<f64> = patterns.iter().map(|p| p.transport_emissions).collect();
    if let Some(avg) = mean(&transport)
        && avg > TRANSPORT_DAILY_KG_THRESHOLD
    {
        suggestions.push(Suggestion {
            category: SuggestionCategory::Transportation,
            current_avg: Some(round2(avg)),
            peak_months: None,
            suggestion: TRANSPORT_ADVICE.to_string(),
            potential_reduction: "30-40%".to_string(),
        });
    }

    suggestions.push(Suggestion {
        category: SuggestionCategory::SeasonalOptimization,
        current_avg: None,
        peak_months: Some(peak_months(&patterns)),
        suggestion: SEASONAL_ADVICE.to_string(),
        potential_reduction: "10-15%".to_string(),
    });

    Ok(suggestions)
}

/// The months with the highest mean daily total emissions, highest first.
/// The map iterates month-ascending and the sort is stable, so equal means
/// fall back to calendar order.
fn peak_months(patterns: &[DailyPattern]) -> Vec<u32> {
    let mut monthly: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for pattern in patterns {
        let entry = monthly.entry(pattern.month).or_insert((0.0, 0));
        entry.0 += pattern.total_emissions;
        entry.1 += 1;
    }

    let mut means: Vec<(u32, f64)> = monthly
        .into_iter()
        .map(|(month, (total, count))| (month, total / count as f64))
        .collect();
    means.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    means
        .into_iter()
        .take(PEAK_MONTH_COUNT)
        .map(|(month, _)| month)
        .collect()
}
