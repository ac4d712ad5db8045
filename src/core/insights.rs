//! Rule-based recommendations derived from aggregation output
//!
//! Advisory only: the deriver reads an `AggregationResult` and never feeds
//! anything back into totals.

use crate::core::value_parser::format_minor_units;
use crate::types::{AggregationResult, Recommendation, RecommendationLevel};

/// Maximum number of recommendations returned
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Outflow share above which the largest category is flagged
pub const CONCENTRATION_THRESHOLD_PCT: f64 = 40.0;

/// Month-over-month outflow growth above which a warning is raised
pub const GROWTH_THRESHOLD_PCT: f64 = 15.0;

/// Month-over-month outflow change below which a reduction is praised
pub const REDUCTION_THRESHOLD_PCT: f64 = -10.0;

/// Derive up to three recommendations, in rule order:
/// 1. concentration warning for the largest outflow category
/// 2. surplus note or deficit alert
/// 3. month-over-month outflow trend
pub fn derive(result: &AggregationResult) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = [
        concentration(result),
        Some(balance(result)),
        trend(result),
    ]
    .into_iter()
    .flatten()
    .collect();

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

fn concentration(result: &AggregationResult) -> Option<Recommendation> {
    let top = result.top_outflow_categories.first()?;
    if top.percentage <= CONCENTRATION_THRESHOLD_PCT {
        return None;
    }

    Some(Recommendation {
        level: RecommendationLevel::Warning,
        title: "Gastos concentrados".to_string(),
        message: format!(
            "A categoria '{}' representa {:.1}% das saídas ({}).",
            top.key,
            top.percentage,
            format_minor_units(top.total_minor_units as i64)
        ),
    })
}

fn balance(result: &AggregationResult) -> Recommendation {
    if result.balance_minor_units > 0 {
        Recommendation {
            level: RecommendationLevel::Opportunity,
            title: "Sobra para investir".to_string(),
            message: format!(
                "Sobraram {} no período. Considere investir esse valor.",
                format_minor_units(result.balance_minor_units)
            ),
        }
    } else {
        Recommendation {
            level: RecommendationLevel::Alert,
            title: "Déficit no período".to_string(),
            message: format!(
                "As saídas superaram as entradas em {}.",
                format_minor_units(result.balance_minor_units.saturating_abs())
            ),
        }
    }
}

/// Compare the two most recent months
///
/// Skipped when the earlier month had no outflow: there is no meaningful
/// percentage change from zero.
fn trend(result: &AggregationResult) -> Option<Recommendation> {
    let [.., previous, current] = result.monthly_aggregates.as_slice() else {
        return None;
    };

    if previous.outflow_minor_units == 0 {
        return None;
    }

    let previous_outflow = previous.outflow_minor_units as f64;
    let change = (current.outflow_minor_units as f64 - previous_outflow) / previous_outflow * 100.0;

    if change > GROWTH_THRESHOLD_PCT {
        Some(Recommendation {
            level: RecommendationLevel::Warning,
            title: "Gastos em alta".to_string(),
            message: format!(
                "As saídas de {} cresceram {:.1}% em relação a {}.",
                current.month, change, previous.month
            ),
        })
    } else if change < REDUCTION_THRESHOLD_PCT {
        Some(Recommendation {
            level: RecommendationLevel::Praise,
            title: "Gastos em queda".to_string(),
            message: format!(
                "As saídas de {} caíram {:.1}% em relação a {}. Bom trabalho!",
                current.month,
                change.abs(),
                previous.month
            ),
        })
    } else {
        None
    }
}
