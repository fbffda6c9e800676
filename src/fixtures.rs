//! Literal illustrative series shown alongside the historical views.
//!
//! These are fixed planning figures, not projections computed from the feed.

use crate::types::{ForecastPoint, InvestmentPoint};

/// Reference damage total that mitigation scenarios are measured against.
/// Matches the 2027 predicted damage in [`FORECAST`].
pub const BASELINE_PROJECTION: f64 = 24_500_000.0;

pub const FORECAST: [ForecastPoint; 5] = [
    ForecastPoint { year: 2025, predicted_damage: 18_000_000.0, lower_bound: 16_000_000.0, upper_bound: 19_500_000.0 },
    ForecastPoint { year: 2026, predicted_damage: 21_000_000.0, lower_bound: 18_500_000.0, upper_bound: 24_000_000.0 },
    ForecastPoint { year: 2027, predicted_damage: 24_500_000.0, lower_bound: 21_500_000.0, upper_bound: 28_000_000.0 },
    ForecastPoint { year: 2028, predicted_damage: 28_000_000.0, lower_bound: 24_000_000.0, upper_bound: 32_000_000.0 },
    ForecastPoint { year: 2029, predicted_damage: 32_500_000.0, lower_bound: 27_500_000.0, upper_bound: 37_000_000.0 },
];

/// Annual mitigation investment against cumulative savings.
pub const INVESTMENT_PLAN: [InvestmentPoint; 5] = [
    InvestmentPoint { year: 2025, investment: 4_500_000.0, savings: 2_700_000.0 },
    InvestmentPoint { year: 2026, investment: 4_500_000.0, savings: 6_300_000.0 },
    InvestmentPoint { year: 2027, investment: 4_500_000.0, savings: 8_100_000.0 },
    InvestmentPoint { year: 2028, investment: 4_500_000.0, savings: 9_900_000.0 },
    InvestmentPoint { year: 2029, investment: 4_500_000.0, savings: 11_700_000.0 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_matches_forecast() {
        let y2027 = FORECAST.iter().find(|p| p.year == 2027).unwrap();
        assert_eq!(y2027.predicted_damage, BASELINE_PROJECTION);
    }

    #[test]
    fn test_forecast_bounds_bracket_prediction() {
        for p in &FORECAST {
            assert!(p.lower_bound <= p.predicted_damage && p.predicted_damage <= p.upper_bound);
        }
    }

    #[test]
    fn test_investment_plan_total() {
        let total: f64 = INVESTMENT_PLAN.iter().map(|p| p.investment).sum();
        assert_eq!(total, 22_500_000.0);
    }
}
