//! Free-text weather event classification.
//!
//! Rules are evaluated top to bottom and the first rule with a matching
//! keyword wins, so the order of `RULES` is part of the contract: a
//! "Severe Winter Storm" is a winter storm, not a severe storm.

use crate::types::Taxonomy;

/// Ordered (category, keywords) rule chain. Keywords are lowercase substrings.
pub const RULES: &[(Taxonomy, &[&str])] = &[
    (
        Taxonomy::HurricaneTropicalStorm,
        &["hurricane", "tropical", "cyclone", "mawar"],
    ),
    (Taxonomy::WinterStorm, &["winter", "snow", "arctic", "ice"]),
    (
        Taxonomy::SevereStorm,
        &["storm", "wind", "nor'easter", "atmospheric river"],
    ),
    (Taxonomy::Flooding, &["flood", "water", "rain"]),
    // "torando" is a recurring misspelling in the source data.
    (Taxonomy::Tornado, &["tornado", "torando"]),
    (Taxonomy::Hail, &["hail"]),
    (Taxonomy::Fire, &["fire"]),
    (Taxonomy::Earthquake, &["earthquake"]),
    (Taxonomy::Wave, &["wave"]),
];

/// Map a raw event type to its category. Missing or blank input is `Other`.
pub fn normalize(raw_type: Option<&str>) -> Taxonomy {
    let lower = match raw_type {
        Some(s) if !s.trim().is_empty() => s.trim().to_lowercase(),
        _ => return Taxonomy::Other,
    };
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Taxonomy::Other)
}
