use crate::util::{display_date, display_money, display_percent, display_ratio};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// One row of the damage feed exactly as the CSV reader hands it over.
///
/// Every column is kept as an optional string; typing happens in the cleaner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Installation")]
    pub installation: Option<String>,
    #[serde(rename = "Weather Event")]
    pub weather_event: Option<String>,
    #[serde(rename = "Named Storm")]
    pub named_storm: Option<String>,
    #[serde(rename = "Cost")]
    pub cost: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Date of Weather Event")]
    pub date_serial: Option<String>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<String>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<String>,
}

/// Closed set of damage-event categories used for every rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Taxonomy {
    #[serde(rename = "Hurricane/Tropical Storm")]
    HurricaneTropicalStorm,
    #[serde(rename = "Winter Storm")]
    WinterStorm,
    #[serde(rename = "Severe Storm")]
    SevereStorm,
    Flooding,
    Tornado,
    Hail,
    Fire,
    Earthquake,
    Wave,
    Other,
}

impl Taxonomy {
    pub const ALL: [Taxonomy; 10] = [
        Taxonomy::HurricaneTropicalStorm,
        Taxonomy::WinterStorm,
        Taxonomy::SevereStorm,
        Taxonomy::Flooding,
        Taxonomy::Tornado,
        Taxonomy::Hail,
        Taxonomy::Fire,
        Taxonomy::Earthquake,
        Taxonomy::Wave,
        Taxonomy::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Taxonomy::HurricaneTropicalStorm => "Hurricane/Tropical Storm",
            Taxonomy::WinterStorm => "Winter Storm",
            Taxonomy::SevereStorm => "Severe Storm",
            Taxonomy::Flooding => "Flooding",
            Taxonomy::Tornado => "Tornado",
            Taxonomy::Hail => "Hail",
            Taxonomy::Fire => "Fire",
            Taxonomy::Earthquake => "Earthquake",
            Taxonomy::Wave => "Wave",
            Taxonomy::Other => "Other",
        }
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Taxonomy {
    type Err = UnknownCategory;

    /// Parses a display label (case-insensitive), e.g. `"severe storm"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Taxonomy::ALL
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(wanted.to_string()))
    }
}

/// A cleaned, immutable damage event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub installation: String,
    pub event_type_raw: String,
    pub category: Taxonomy,
    pub cost: f64,
    /// `None` when the Year cell is blank or not a number.
    pub year: Option<i32>,
    pub named_storm: Option<String>,
    pub event_label: String,
    pub occurred_on: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct EventCostRow {
    #[serde(rename = "WeatherEvent")]
    #[tabled(rename = "WeatherEvent")]
    pub name: String,
    #[serde(rename = "TotalCost")]
    #[tabled(rename = "TotalCost", display_with = "display_money")]
    pub total_cost: f64,
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: Taxonomy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct CategoryShareRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub name: Taxonomy,
    #[serde(rename = "TotalCost")]
    #[tabled(rename = "TotalCost", display_with = "display_money")]
    pub total_cost: f64,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    /// `None` when the filtered set sums to zero.
    #[serde(rename = "Percentage")]
    #[tabled(rename = "Percentage", display_with = "display_percent")]
    pub percentage: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct InstallationCostRow {
    #[serde(rename = "Installation")]
    #[tabled(rename = "Installation")]
    pub name: String,
    #[serde(rename = "TotalCost")]
    #[tabled(rename = "TotalCost", display_with = "display_money")]
    pub total_cost: f64,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct YearTrendRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "TotalCost")]
    #[tabled(rename = "TotalCost", display_with = "display_money")]
    pub total_cost: f64,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
}

/// A single map marker for the geographic view.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct GeoPoint {
    #[serde(rename = "Installation")]
    #[tabled(rename = "Installation")]
    pub installation: String,
    #[serde(rename = "WeatherEvent")]
    #[tabled(rename = "WeatherEvent")]
    pub event_label: String,
    #[serde(rename = "Date")]
    #[tabled(rename = "Date", display_with = "display_date")]
    pub occurred_on: Option<NaiveDate>,
    #[serde(rename = "Cost")]
    #[tabled(rename = "Cost", display_with = "display_money")]
    pub cost: f64,
    #[serde(rename = "Latitude")]
    #[tabled(rename = "Latitude")]
    pub lat: f64,
    #[serde(rename = "Longitude")]
    #[tabled(rename = "Longitude")]
    pub lng: f64,
    /// In `(0.2, 0.8]`, scaled against the most expensive event in the set.
    #[serde(rename = "Intensity")]
    #[tabled(rename = "Intensity", display_with = "display_ratio")]
    pub intensity: f64,
    #[serde(rename = "Radius")]
    #[tabled(rename = "Radius", display_with = "display_ratio")]
    pub radius: f64,
}

/// Catalog entry for one mitigation strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct MitigationStrategy {
    #[tabled(rename = "Id")]
    pub id: &'static str,
    #[tabled(rename = "Strategy")]
    pub name: &'static str,
    #[tabled(rename = "Reduction", display_with = "display_ratio")]
    pub reduction_fraction: f64,
    #[tabled(rename = "Cost", display_with = "display_money")]
    pub implementation_cost: f64,
    #[tabled(rename = "AnnualSavings", display_with = "display_money")]
    pub annual_savings: f64,
    #[tabled(rename = "PaybackYears")]
    pub payback_years: f64,
    #[tabled(rename = "Targets")]
    pub target: Taxonomy,
    #[tabled(skip)]
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub baseline_projection: f64,
    pub projected_with_mitigation: f64,
    pub savings: f64,
    pub total_implementation_cost: f64,
    pub effective_reduction: f64,
    /// Whether the minimum-savings guarantee had to adjust the projection.
    pub correction_applied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ForecastPoint {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "PredictedDamage")]
    #[tabled(rename = "PredictedDamage", display_with = "display_money")]
    pub predicted_damage: f64,
    #[serde(rename = "LowerBound")]
    #[tabled(rename = "LowerBound", display_with = "display_money")]
    pub lower_bound: f64,
    #[serde(rename = "UpperBound")]
    #[tabled(rename = "UpperBound", display_with = "display_money")]
    pub upper_bound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct InvestmentPoint {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Investment")]
    #[tabled(rename = "Investment", display_with = "display_money")]
    pub investment: f64,
    #[serde(rename = "CumulativeSavings")]
    #[tabled(rename = "CumulativeSavings", display_with = "display_money")]
    pub savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub categories: Vec<Taxonomy>,
}

/// Every derived view for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    pub by_event: Vec<EventCostRow>,
    pub by_category: Vec<CategoryShareRow>,
    pub by_installation: Vec<InstallationCostRow>,
    pub by_year: Vec<YearTrendRow>,
    pub geo: Vec<GeoPoint>,
    pub total_cost: f64,
    pub count: usize,
    pub avg_cost_per_event: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    Rising,
    Varying,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendInsight {
    pub first_year: i32,
    pub last_year: i32,
    pub direction: TrendDirection,
    pub busiest_year: i32,
    pub busiest_year_events: usize,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub year_filter: String,
    pub category_filter: String,
    pub total_events: usize,
    pub total_cost: f64,
    pub avg_cost_per_event: Option<f64>,
    pub top3_installation_share: Option<i64>,
    pub leading_categories: Vec<Taxonomy>,
    pub leading_categories_share: Option<i64>,
    pub trend: Option<TrendInsight>,
    pub catalog_first_year_roi: Option<f64>,
}
