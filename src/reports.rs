use crate::types::{
    CategoryShareRow, DashboardViews, EventCostRow, EventRecord, GeoPoint, InstallationCostRow,
    Taxonomy, TrendDirection, TrendInsight, YearTrendRow,
};
use crate::util::round_half_up;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

pub const DEFAULT_TOP_INSTALLATIONS: usize = 10;

/// Group records by `key`, keeping groups in first-seen order so that a
/// later stable sort leaves ties in encounter order.
fn group_ordered<'a, K, F>(records: &[&'a EventRecord], key: F) -> Vec<(K, Vec<&'a EventRecord>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&EventRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a EventRecord>)> = Vec::new();
    for &r in records {
        let k = key(r);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(r),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![r]));
            }
        }
    }
    groups
}

fn sum_cost(records: &[&EventRecord]) -> f64 {
    records.iter().map(|r| r.cost).sum()
}

fn by_cost_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

pub fn total_cost(records: &[&EventRecord]) -> f64 {
    sum_cost(records)
}

/// Mean cost per event, `None` for an empty set.
pub fn avg_cost_per_event(records: &[&EventRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    Some(sum_cost(records) / records.len() as f64)
}

/// Cost per display label, most expensive first. Each row takes the category
/// of the first record seen under that label.
pub fn by_event(records: &[&EventRecord]) -> Vec<EventCostRow> {
    let mut rows: Vec<EventCostRow> = group_ordered(records, |r| r.event_label.clone())
        .into_iter()
        .map(|(name, items)| EventCostRow {
            category: items[0].category,
            total_cost: sum_cost(&items),
            name,
        })
        .collect();
    rows.sort_by(|a, b| by_cost_desc(a.total_cost, b.total_cost));
    rows
}

/// Cost per category with its rounded share of the set total.
pub fn by_category(records: &[&EventRecord]) -> Vec<CategoryShareRow> {
    let grand_total = sum_cost(records);
    let mut rows: Vec<CategoryShareRow> = group_ordered(records, |r| r.category)
        .into_iter()
        .map(|(name, items)| {
            let total = sum_cost(&items);
            let percentage = if grand_total == 0.0 {
                None
            } else {
                Some(round_half_up(total / grand_total * 100.0))
            };
            CategoryShareRow {
                name,
                total_cost: total,
                count: items.len(),
                percentage,
            }
        })
        .collect();
    rows.sort_by(|a, b| by_cost_desc(a.total_cost, b.total_cost));
    rows
}

pub fn by_installation(records: &[&EventRecord], top_n: usize) -> Vec<InstallationCostRow> {
    let mut rows: Vec<InstallationCostRow> = group_ordered(records, |r| r.installation.clone())
        .into_iter()
        .map(|(name, items)| InstallationCostRow {
            total_cost: sum_cost(&items),
            count: items.len(),
            name,
        })
        .collect();
    rows.sort_by(|a, b| by_cost_desc(a.total_cost, b.total_cost));
    rows.truncate(top_n);
    rows
}

/// Yearly totals in chronological order. Records without a year are left
/// out of this view only.
pub fn by_year(records: &[&EventRecord]) -> Vec<YearTrendRow> {
    let mut rows: Vec<YearTrendRow> = group_ordered(records, |r| r.year)
        .into_iter()
        .filter_map(|(year, items)| {
            Some(YearTrendRow {
                year: year?,
                total_cost: sum_cost(&items),
                count: items.len(),
            })
        })
        .collect();
    rows.sort_by_key(|r| r.year);
    rows
}

/// Map markers for every record with coordinates and a positive cost.
///
/// Intensity is scaled against the most expensive record in the whole set,
/// including records that end up without a marker.
pub fn geo_weight(records: &[&EventRecord]) -> Vec<GeoPoint> {
    let max_cost = records
        .iter()
        .map(|r| r.cost)
        .fold(f64::NEG_INFINITY, f64::max);

    records
        .iter()
        .filter(|r| r.cost > 0.0)
        .filter_map(|r| {
            let (lat, lng) = (r.latitude?, r.longitude?);
            Some(GeoPoint {
                installation: r.installation.clone(),
                event_label: r.event_label.clone(),
                occurred_on: r.occurred_on,
                cost: r.cost,
                lat,
                lng,
                intensity: 0.2 + (r.cost / max_cost) * 0.6,
                radius: r.cost.log10() * 3.0,
            })
        })
        .collect()
}

/// Every view for an already filtered set. Nothing is cached.
pub fn build_views(records: &[&EventRecord], top_installations: usize) -> DashboardViews {
    DashboardViews {
        by_event: by_event(records),
        by_category: by_category(records),
        by_installation: by_installation(records, top_installations),
        by_year: by_year(records),
        geo: geo_weight(records),
        total_cost: total_cost(records),
        count: records.len(),
        avg_cost_per_event: avg_cost_per_event(records),
    }
}

/// Direction and busiest year of a chronological `by_year` view.
///
/// `all_years` is the sorted year list of the whole dataset; the reported
/// span comes from it, so a year filter narrows the trend but not the span.
/// Falls back to the view's own first and last year when it is empty.
pub fn trend_insight(all_years: &[i32], by_year: &[YearTrendRow]) -> Option<TrendInsight> {
    let first = by_year.first()?;
    let last = by_year.last()?;
    let mut busiest = first;
    for row in by_year {
        if row.count > busiest.count {
            busiest = row;
        }
    }
    let direction = if last.total_cost > first.total_cost {
        TrendDirection::Rising
    } else {
        TrendDirection::Varying
    };
    Some(TrendInsight {
        first_year: all_years.first().copied().unwrap_or(first.year),
        last_year: all_years.last().copied().unwrap_or(last.year),
        direction,
        busiest_year: busiest.year,
        busiest_year_events: busiest.count,
    })
}

/// Rounded share of `total_cost` held by the first `n` installations.
pub fn top_installation_share(
    by_installation: &[InstallationCostRow],
    total_cost: f64,
    n: usize,
) -> Option<i64> {
    if total_cost == 0.0 {
        return None;
    }
    let top: f64 = by_installation.iter().take(n).map(|r| r.total_cost).sum();
    Some(round_half_up(top / total_cost * 100.0))
}

/// The `n` costliest categories and their combined (already rounded) share.
pub fn leading_categories(
    by_category: &[CategoryShareRow],
    n: usize,
) -> (Vec<Taxonomy>, Option<i64>) {
    let leaders = &by_category[..n.min(by_category.len())];
    let names = leaders.iter().map(|r| r.name).collect();
    let share = leaders.iter().map(|r| r.percentage).sum::<Option<i64>>();
    (names, share)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(installation: &str, label: &str, category: Taxonomy, cost: f64, year: i32) -> EventRecord {
        EventRecord {
            installation: installation.to_string(),
            event_type_raw: label.to_string(),
            category,
            cost,
            year: Some(year),
            named_storm: None,
            event_label: label.to_string(),
            occurred_on: None,
            latitude: Some(30.0),
            longitude: Some(-90.0),
        }
    }

    fn sample() -> Vec<EventRecord> {
        vec![
            record("Fort Polk", "Flood", Taxonomy::Flooding, 300.0, 2022),
            record("Fort Bragg", "Hurricane (Alex)", Taxonomy::HurricaneTropicalStorm, 1000.0, 2021),
            record("Fort Polk", "Hail", Taxonomy::Hail, 200.0, 2023),
            record("Fort Drum", "Winter Storm", Taxonomy::WinterStorm, 500.0, 2021),
            record("Fort Bragg", "Flood", Taxonomy::Flooding, 400.0, 2023),
        ]
    }

    fn refs(records: &[EventRecord]) -> Vec<&EventRecord> {
        records.iter().collect()
    }

    #[test]
    fn test_by_event_groups_and_ranks() {
        let data = sample();
        let rows = by_event(&refs(&data));
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Hurricane (Alex)", "Flood", "Winter Storm", "Hail"]);
        assert_eq!(rows[1].total_cost, 700.0);
        assert_eq!(rows[1].category, Taxonomy::Flooding);
    }

    #[test]
    fn test_by_event_ties_keep_encounter_order() {
        let data = vec![
            record("A", "Second", Taxonomy::Hail, 100.0, 2020),
            record("A", "First", Taxonomy::Fire, 100.0, 2020),
        ];
        let rows = by_event(&refs(&data));
        assert_eq!(rows[0].name, "Second");
        assert_eq!(rows[1].name, "First");
    }

    #[test]
    fn test_by_category_percentages() {
        let data = sample();
        let rows = by_category(&refs(&data));
        assert_eq!(rows[0].name, Taxonomy::HurricaneTropicalStorm);
        assert_eq!(rows[0].percentage, Some(42)); // 1000 / 2400
        assert_eq!(rows[1].name, Taxonomy::Flooding);
        assert_eq!(rows[1].count, 2);
        let sum: i64 = rows.iter().filter_map(|r| r.percentage).sum();
        assert!((99..=101).contains(&sum), "sum was {}", sum);
    }

    #[test]
    fn test_by_category_is_idempotent() {
        let data = sample();
        let set = refs(&data);
        assert_eq!(by_category(&set), by_category(&set));
    }

    #[test]
    fn test_by_category_zero_total_has_no_percentage() {
        let data = vec![record("A", "Hail", Taxonomy::Hail, 0.0, 2020)];
        let rows = by_category(&refs(&data));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].percentage, None);
    }

    #[test]
    fn test_by_installation_truncates_and_keeps_tie_order() {
        let data: Vec<EventRecord> = (0..12)
            .map(|i| record(&format!("Site {}", i), "Hail", Taxonomy::Hail, if i < 2 { 50.0 } else { 10.0 }, 2020))
            .collect();
        let rows = by_installation(&refs(&data), DEFAULT_TOP_INSTALLATIONS);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].name, "Site 0");
        assert_eq!(rows[1].name, "Site 1");
        assert_eq!(rows[2].name, "Site 2");
        assert_eq!(rows[9].name, "Site 9");
    }

    #[test]
    fn test_by_year_is_chronological() {
        let data = sample();
        let rows = by_year(&refs(&data));
        let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2021, 2022, 2023]);
        assert_eq!(rows[0].total_cost, 1500.0);
        assert_eq!(rows[0].count, 2);
    }

    #[test]
    fn test_by_year_skips_missing_year_only() {
        let mut data = sample();
        data[0].year = None;
        let set = refs(&data);
        let years: Vec<i32> = by_year(&set).iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2021, 2023]);
        assert_eq!(total_cost(&set), 2400.0);
        assert_eq!(by_event(&set)[1].total_cost, 700.0);
    }

    #[test]
    fn test_trend_span_comes_from_all_years() {
        let data = sample();
        let only_2023: Vec<&EventRecord> = data.iter().filter(|r| r.year == Some(2023)).collect();
        let trend = trend_insight(&[2021, 2022, 2023], &by_year(&only_2023)).unwrap();
        assert_eq!(trend.first_year, 2021);
        assert_eq!(trend.last_year, 2023);
        assert_eq!(trend.busiest_year, 2023);
        assert_eq!(trend.direction, TrendDirection::Varying);

        let fallback = trend_insight(&[], &by_year(&only_2023)).unwrap();
        assert_eq!((fallback.first_year, fallback.last_year), (2023, 2023));
    }

    #[test]
    fn test_geo_weight_filters_and_scales() {
        let mut data = sample();
        data[2].latitude = None;
        data.push(record("Fort Zero", "Hail", Taxonomy::Hail, 0.0, 2023));
        let points = geo_weight(&refs(&data));
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.intensity > 0.2 && p.intensity <= 0.8));
        let top = points.iter().find(|p| p.installation == "Fort Bragg" && p.cost == 1000.0).unwrap();
        assert!((top.intensity - 0.8).abs() < 1e-12);
        assert!((top.radius - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_geo_weight_max_uses_whole_set() {
        let mut data = sample();
        // The most expensive record has no coordinates but still sets the scale.
        data[1].longitude = None;
        let points = geo_weight(&refs(&data));
        let drum = points.iter().find(|p| p.installation == "Fort Drum").unwrap();
        assert!((drum.intensity - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_set() {
        let views = build_views(&[], DEFAULT_TOP_INSTALLATIONS);
        assert!(views.by_event.is_empty());
        assert!(views.by_category.is_empty());
        assert!(views.by_installation.is_empty());
        assert!(views.by_year.is_empty());
        assert!(views.geo.is_empty());
        assert_eq!(views.count, 0);
        assert_eq!(views.total_cost, 0.0);
        assert_eq!(views.avg_cost_per_event, None);
        assert_eq!(trend_insight(&[2020, 2021], &views.by_year), None);
        assert_eq!(top_installation_share(&views.by_installation, 0.0, 3), None);
    }

    #[test]
    fn test_insights() {
        let data = sample();
        let set = refs(&data);
        let views = build_views(&set, DEFAULT_TOP_INSTALLATIONS);
        assert_eq!(views.avg_cost_per_event, Some(480.0));

        let trend = trend_insight(&[2021, 2022, 2023], &views.by_year).unwrap();
        assert_eq!(trend.first_year, 2021);
        assert_eq!(trend.last_year, 2023);
        assert_eq!(trend.direction, TrendDirection::Varying);
        assert_eq!(trend.busiest_year, 2021);
        assert_eq!(trend.busiest_year_events, 2);

        // Fort Bragg 1400 + Fort Drum 500 + Fort Polk 500 = everything.
        assert_eq!(top_installation_share(&views.by_installation, views.total_cost, 3), Some(100));

        let (names, share) = leading_categories(&views.by_category, 2);
        assert_eq!(names, vec![Taxonomy::HurricaneTropicalStorm, Taxonomy::Flooding]);
        assert_eq!(share, Some(42 + 29));
    }
}
