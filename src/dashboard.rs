//! Query interface used by the presentation layer.
//!
//! A `Dashboard` owns the cleaned records for the session. Every query
//! filters and aggregates from scratch; nothing about the previous filter
//! or scenario selection is remembered.

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::filter::{filter_records, CategoryFilter, YearFilter};
use crate::loader::{load_and_clean, LoadReport};
use crate::reports::{build_views, leading_categories, top_installation_share, trend_insight};
use crate::scenario::{apply_optimal, catalog_first_year_roi, simulate, CATALOG};
use crate::types::{
    DashboardViews, EventRecord, FilterOptions, MitigationStrategy, ScenarioResult, SummaryStats,
    Taxonomy,
};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Dashboard {
    records: Vec<EventRecord>,
    load_report: LoadReport,
    catalog: Vec<MitigationStrategy>,
    baseline: f64,
    top_installations: usize,
}

impl Dashboard {
    pub fn load(config: &DashboardConfig) -> Result<Self> {
        let (records, report) = load_and_clean(&config.data_path)?;
        Ok(Self::from_records(records, report, config))
    }

    pub fn from_records(
        records: Vec<EventRecord>,
        load_report: LoadReport,
        config: &DashboardConfig,
    ) -> Self {
        Self {
            records,
            load_report,
            catalog: CATALOG.to_vec(),
            baseline: config.baseline_projection,
            top_installations: config.top_installations,
        }
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Distinct years ascending and distinct categories by label.
    pub fn filters(&self) -> FilterOptions {
        let mut years: Vec<i32> = self.records.iter().filter_map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();

        let mut categories: Vec<Taxonomy> = Vec::new();
        for r in &self.records {
            if !categories.contains(&r.category) {
                categories.push(r.category);
            }
        }
        categories.sort_by_key(|c| c.label());

        FilterOptions { years, categories }
    }

    pub fn filtered_views(&self, year: YearFilter, category: CategoryFilter) -> DashboardViews {
        let filtered = filter_records(&self.records, year, category);
        debug!(%year, %category, matched = filtered.len(), "building views");
        build_views(&filtered, self.top_installations)
    }

    pub fn scenario_catalog(&self) -> &[MitigationStrategy] {
        &self.catalog
    }

    pub fn run_scenario<S: AsRef<str>>(&self, selected_ids: &[S]) -> ScenarioResult {
        simulate(selected_ids, &self.catalog, self.baseline)
    }

    pub fn apply_optimal_scenario(&self) -> ScenarioResult {
        apply_optimal(&self.catalog, self.baseline)
    }

    /// Headline numbers and insights for one filter selection.
    pub fn summary(&self, year: YearFilter, category: CategoryFilter) -> SummaryStats {
        let views = self.filtered_views(year, category);
        let (leaders, leaders_share) = leading_categories(&views.by_category, 2);
        SummaryStats {
            year_filter: year.to_string(),
            category_filter: category.to_string(),
            total_events: views.count,
            total_cost: views.total_cost,
            avg_cost_per_event: views.avg_cost_per_event,
            top3_installation_share: top_installation_share(
                &views.by_installation,
                views.total_cost,
                3,
            ),
            leading_categories: leaders,
            leading_categories_share: leaders_share,
            trend: trend_insight(&self.filters().years, &views.by_year),
            catalog_first_year_roi: catalog_first_year_roi(&self.catalog),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Selection;
    use crate::loader::clean;
    use crate::types::RawRow;

    fn row(installation: &str, event: &str, cost: &str, year: &str) -> RawRow {
        RawRow {
            installation: Some(installation.to_string()),
            weather_event: Some(event.to_string()),
            cost: Some(cost.to_string()),
            year: Some(year.to_string()),
            ..Default::default()
        }
    }

    fn dashboard() -> Dashboard {
        let (records, report) = clean(vec![
            row("Fort Hood", "Tornado", "400", "2022"),
            row("Fort Bragg", "Hurricane (Typhoon)", "900", "2021"),
            row("Fort Drum", "Snow", "100", "2022"),
            row("Fort Hood", "Hail", "bad", "2023"),
        ]);
        Dashboard::from_records(records, report, &DashboardConfig::default())
    }

    #[test]
    fn test_filters_are_sorted_and_distinct() {
        let d = dashboard();
        let f = d.filters();
        assert_eq!(f.years, vec![2021, 2022]);
        assert_eq!(
            f.categories,
            vec![Taxonomy::HurricaneTropicalStorm, Taxonomy::Tornado, Taxonomy::WinterStorm]
        );
    }

    #[test]
    fn test_views_follow_filters() {
        let d = dashboard();
        let all = d.filtered_views(Selection::All, Selection::All);
        assert_eq!(all.count, 3);
        assert_eq!(all.total_cost, 1400.0);

        let y2022 = d.filtered_views(Selection::Only(2022), Selection::All);
        assert_eq!(y2022.count, 2);
        assert_eq!(y2022.by_installation[0].name, "Fort Hood");

        // Re-querying with the original filters gives the original answer.
        assert_eq!(d.filtered_views(Selection::All, Selection::All), all);

        let none = d.filtered_views(Selection::Only(1999), Selection::All);
        assert_eq!(none.count, 0);
        assert_eq!(none.avg_cost_per_event, None);
    }

    #[test]
    fn test_scenarios_use_configured_baseline() {
        let d = dashboard();
        assert_eq!(d.scenario_catalog().len(), 4);
        let r = d.run_scenario(&["scenario3"]);
        assert_eq!(r.baseline_projection, d.baseline());
        assert_eq!(d.apply_optimal_scenario().total_implementation_cost, 8_000_000.0);
    }

    #[test]
    fn test_summary() {
        let d = dashboard();
        let s = d.summary(Selection::All, Selection::All);
        assert_eq!(s.total_events, 3);
        assert_eq!(s.year_filter, "all");
        assert_eq!(s.top3_installation_share, Some(100));
        assert_eq!(
            s.leading_categories,
            vec![Taxonomy::HurricaneTropicalStorm, Taxonomy::Tornado]
        );
        // 900/1400 -> 64, 400/1400 -> 29
        assert_eq!(s.leading_categories_share, Some(93));
        assert_eq!(d.load_report().invalid_cost, 1);
    }

    #[test]
    fn test_summary_span_ignores_year_filter() {
        let d = dashboard();
        let s = d.summary(Selection::Only(2022), Selection::All);
        let trend = s.trend.unwrap();
        assert_eq!((trend.first_year, trend.last_year), (2021, 2022));
        assert_eq!(trend.busiest_year, 2022);
    }

    #[test]
    fn test_row_without_year_still_counts() {
        let (records, report) = clean(vec![
            row("Fort Hood", "Hail", "5000", "2022"),
            row("Fort Drum", "Flood", "7000", ""),
        ]);
        assert_eq!(report.kept_rows, 2);
        let d = Dashboard::from_records(records, report, &DashboardConfig::default());

        assert_eq!(d.filters().years, vec![2022]);
        let all = d.filtered_views(Selection::All, Selection::All);
        assert_eq!(all.total_cost, 12_000.0);
        assert_eq!(all.count, 2);
        assert_eq!(all.by_installation[0].name, "Fort Drum");
        assert_eq!(all.by_year.len(), 1);
        assert_eq!(all.by_year[0].total_cost, 5000.0);

        let y2022 = d.filtered_views(Selection::Only(2022), Selection::All);
        assert_eq!(y2022.total_cost, 5000.0);
    }
}
