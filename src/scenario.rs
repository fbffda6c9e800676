//! Mitigation scenario modelling.
//!
//! A scenario is a set of strategy ids. The combined reduction has
//! diminishing returns and is capped at 75%; afterwards a minimum-savings
//! guarantee forces residual damage plus implementation cost to come in at
//! least 10% under the baseline. The guarantee is applied unclamped, so the
//! projected damage can go negative when strategies are expensive relative to
//! the baseline. A scenario with no resolvable strategy is the baseline.

use crate::types::{MitigationStrategy, ScenarioResult, Taxonomy};
use std::collections::HashSet;

const REDUCTION_BOOST: f64 = 1.2;
const MAX_EFFECTIVE_REDUCTION: f64 = 0.75;
const MIN_SAVINGS_FRACTION: f64 = 0.1;

pub const CATALOG: [MitigationStrategy; 4] = [
    MitigationStrategy {
        id: "scenario1",
        name: "Enhanced stormwater infrastructure",
        reduction_fraction: 0.25,
        implementation_cost: 2_000_000.0,
        annual_savings: 3_500_000.0,
        payback_years: 0.6,
        target: Taxonomy::Flooding,
        description: "Upgrades to drainage systems and flood barriers",
    },
    MitigationStrategy {
        id: "scenario2",
        name: "Wind-resistant building upgrades",
        reduction_fraction: 0.40,
        implementation_cost: 3_500_000.0,
        annual_savings: 5_200_000.0,
        payback_years: 0.7,
        target: Taxonomy::HurricaneTropicalStorm,
        description: "Reinforced roofing and structural improvements",
    },
    MitigationStrategy {
        id: "scenario3",
        name: "Wildfire prevention measures",
        reduction_fraction: 0.30,
        implementation_cost: 1_500_000.0,
        annual_savings: 2_800_000.0,
        payback_years: 0.5,
        target: Taxonomy::Fire,
        description: "Firebreaks and vegetation management",
    },
    MitigationStrategy {
        id: "scenario4",
        name: "Winter weather preparedness",
        reduction_fraction: 0.20,
        implementation_cost: 1_000_000.0,
        annual_savings: 1_800_000.0,
        payback_years: 0.6,
        target: Taxonomy::WinterStorm,
        description: "Insulation and heating system upgrades",
    },
];

/// Project damage for the selected strategies against `baseline`.
///
/// Duplicate ids count once and ids missing from `catalog` are ignored.
pub fn simulate<S: AsRef<str>>(
    selected_ids: &[S],
    catalog: &[MitigationStrategy],
    baseline: f64,
) -> ScenarioResult {
    let wanted: HashSet<&str> = selected_ids.iter().map(|s| s.as_ref()).collect();
    let chosen: Vec<&MitigationStrategy> = catalog
        .iter()
        .filter(|s| wanted.contains(s.id))
        .collect();

    let total_reduction: f64 = chosen.iter().map(|s| s.reduction_fraction).sum();
    let total_cost: f64 = chosen.iter().map(|s| s.implementation_cost).sum();

    let effective_reduction = if chosen.is_empty() {
        0.0
    } else {
        (total_reduction * REDUCTION_BOOST / chosen.len() as f64).min(MAX_EFFECTIVE_REDUCTION)
    };

    let mut reduced_damage = baseline * (1.0 - effective_reduction);
    let total_with_mitigation = reduced_damage + total_cost;

    // An empty scenario is the baseline itself; the guarantee only covers
    // scenarios that actually spend on mitigation.
    let correction_applied = !chosen.is_empty()
        && total_with_mitigation >= baseline * (1.0 - MIN_SAVINGS_FRACTION);
    if correction_applied {
        let required_reduction = baseline * MIN_SAVINGS_FRACTION;
        let additional_reduction = required_reduction - (baseline - total_with_mitigation);
        reduced_damage -= additional_reduction;
    }

    ScenarioResult {
        baseline_projection: baseline,
        projected_with_mitigation: reduced_damage,
        savings: baseline - reduced_damage,
        total_implementation_cost: total_cost,
        effective_reduction,
        correction_applied,
    }
}

/// Select every strategy in the catalog. No search is involved.
pub fn apply_optimal(catalog: &[MitigationStrategy], baseline: f64) -> ScenarioResult {
    let all: Vec<&str> = catalog.iter().map(|s| s.id).collect();
    simulate(&all, catalog, baseline)
}

/// First-year ROI in percent, `None` when nothing was spent.
pub fn first_year_roi(result: &ScenarioResult) -> Option<f64> {
    if result.total_implementation_cost == 0.0 {
        return None;
    }
    Some(result.savings / result.total_implementation_cost * 100.0)
}

/// Combined annual savings over combined cost for the whole catalog, in percent.
pub fn catalog_first_year_roi(catalog: &[MitigationStrategy]) -> Option<f64> {
    let cost: f64 = catalog.iter().map(|s| s.implementation_cost).sum();
    if cost == 0.0 {
        return None;
    }
    let savings: f64 = catalog.iter().map(|s| s.annual_savings).sum();
    Some(savings / cost * 100.0)
}
