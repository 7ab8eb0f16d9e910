use crate::schema;
use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub category_name: String,
    pub avg_quantity: f64,
    pub avg_carbon: f64,
    pub total_carbon: f64,
    pub frequency: usize,
}

struct CategoryAccumulator {
    quantity_sum: f64,
    carbon_sum: f64,
    count: usize,
}

/// Rank activity categories by total emission contribution across the user's
/// full history, heaviest first, truncated to `top_n`. The fold runs in log
/// order and the sort is stable, so equal totals keep first-logged order.
pub fn top_by_emissions(
    conn: &mut SqliteConnection,
    user_id: i32,
    top_n: usize,
) -> Result<Vec<ActivitySummary>, String> {
    use schema::activity_categories::dsl as AC;
    use schema::daily_activities::dsl as DA;

    let rows: Vec<(String, f64, f64)> = DA::daily_activities
        .inner_join(AC::activity_categories)
        .filter(DA::user_id.eq(user_id))
        .order(DA::activity_id.asc())
        .select((AC::category_name, DA::quantity, DA::carbon_emissions))
        .load(conn)
        .map_err(|e| format!("query daily activities failed: {}", e))?;

    let mut positions: BTreeMap<String, usize> = BTreeMap::new();
    let mut groups: Vec<(String, CategoryAccumulator)> = Vec::new();
    for (name, quantity, carbon) in rows {
        match positions.get(&name) {
            Some(&at) => {
                let acc = &mut groups[at].1;
                acc.quantity_sum += quantity;
                acc.carbon_sum += carbon;
                acc.count += 1;
            }
            None => {
                positions.insert(name.clone(), groups.len());
                groups.push((
                    name,
                    CategoryAccumulator {
                        quantity_sum: quantity,
                        carbon_sum: carbon,
                        count: 1,
                    },
                ));
            }
        }
    }

    let mut summaries: Vec<ActivitySummary> = groups
        .into_iter()
        .map(|(category_name, acc)| ActivitySummary {
            category_name,
            avg_quantity: acc.quantity_sum / acc.count as f64,
            avg_carbon: acc.carbon_sum / acc.count as f64,
            total_carbon: acc.carbon_sum,
            frequency: acc.count,
        })
        .collect();

    summaries.sort_by(|a, b| b.total_carbon.partial_cmp(&a.total_carbon).unwrap_or(Ordering::Equal));
    summaries.truncate(top_n);
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{approx_eq, insert_activity, insert_category, insert_user, store};
    use chrono::NaiveDate;

    #[test]
    fn ranking_orders_by_total_and_truncates() {
        let mut conn = store();
        let user = insert_user(&mut conn, "Ada", "ada@example.com");
        let day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let light = insert_category(&mut conn, "Garden Compost", "kg", 0.05);
        let heavy = insert_category(&mut conn, "Patio Heater", "kWh", 3.4);
        let middling = insert_category(&mut conn, "Tumble Dryer", "kWh", 0.7);

        insert_activity(&mut conn, user, light, day, 2.0, 10.0);
        insert_activity(&mut conn, user, heavy, day, 2.0, 50.0);
        insert_activity(&mut conn, user, middling, day, 2.0, 30.0);

        let ranked = top_by_emissions(&mut conn, user, 2).expect("ranking");
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].category_name, "Patio Heater");
        assert!(approx_eq(ranked[0].total_carbon, 50.0));
        assert_eq!(ranked[1].category_name, "Tumble Dryer");
        assert!(approx_eq(ranked[1].total_carbon, 30.0));
    }

    #[test]
    fn averages_and_frequency_are_per_category() {
        let mut conn = store();
        let user = insert_user(&mut conn, "Ada", "ada@example.com");
        let day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let dryer = insert_category(&mut conn, "Tumble Dryer", "kWh", 0.7);

        insert_activity(&mut conn, user, dryer, day, 2.0, 1.0);
        insert_activity(&mut conn, user, dryer, day, 4.0, 3.0);

        let ranked = top_by_emissions(&mut conn, user, 5).expect("ranking");
        assert_eq!(ranked.len(), 1);
        assert!(approx_eq(ranked[0].avg_quantity, 3.0));
        assert!(approx_eq(ranked[0].avg_carbon, 2.0));
        assert!(approx_eq(ranked[0].total_carbon, 4.0));
        assert_eq!(ranked[0].frequency, 2);
    }

    #[test]
    fn equal_totals_keep_first_logged_order() {
        let mut conn = store();
        let user = insert_user(&mut conn, "Ada", "ada@example.com");
        let day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let zeta = insert_category(&mut conn, "Zeta Boiler", "kWh", 1.0);
        let alpha = insert_category(&mut conn, "Alpha Boiler", "kWh", 1.0);

        // Same totals; "Zeta Boiler" is logged first and must stay first.
        insert_activity(&mut conn, user, zeta, day, 1.0, 12.0);
        insert_activity(&mut conn, user, alpha, day, 1.0, 12.0);

        let ranked = top_by_emissions(&mut conn, user, 5).expect("ranking");
        assert_eq!(ranked[0].category_name, "Zeta Boiler");
        assert_eq!(ranked[1].category_name, "Alpha Boiler");
    }

    #[test]
    fn other_users_do_not_leak_into_the_ranking() {
        let mut conn = store();
        let user = insert_user(&mut conn, "Ada", "ada@example.com");
        let neighbour = insert_user(&mut conn, "Bob", "bob@example.com");
        let day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let dryer = insert_category(&mut conn, "Tumble Dryer", "kWh", 0.7);

        insert_activity(&mut conn, neighbour, dryer, day, 4.0, 40.0);

        let ranked = top_by_emissions(&mut conn, user, 5).expect("ranking");
        assert!(ranked.is_empty());
    }
}
