use crate::types::{EventRecord, Taxonomy};
use std::fmt;
use std::str::FromStr;

/// A single filter dimension: everything, or one specific value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

pub type YearFilter = Selection<i32>;
pub type CategoryFilter = Selection<Taxonomy>;

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => v == value,
        }
    }

    /// Like [`Selection::matches`], but a missing value only passes `All`.
    pub fn matches_opt(&self, value: Option<&T>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => value == Some(v),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(v) => write!(f, "{}", v),
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    /// `"all"` (any case) or blank selects everything.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Selection::All);
        }
        s.parse().map(Selection::Only)
    }
}

/// Records matching both filters, borrowed and in their original order.
pub fn filter_records<'a>(
    records: &'a [EventRecord],
    year: YearFilter,
    category: CategoryFilter,
) -> Vec<&'a EventRecord> {
    records
        .iter()
        .filter(|r| year.matches_opt(r.year.as_ref()) && category.matches(&r.category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: impl Into<Option<i32>>, category: Taxonomy, label: &str) -> EventRecord {
        EventRecord {
            installation: "Fort Drum".to_string(),
            event_type_raw: label.to_string(),
            category,
            cost: 1.0,
            year: year.into(),
            named_storm: None,
            event_label: label.to_string(),
            occurred_on: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn test_all_is_identity() {
        let records = vec![
            record(2021, Taxonomy::Hail, "a"),
            record(2022, Taxonomy::Fire, "b"),
        ];
        let out = filter_records(&records, Selection::All, Selection::All);
        assert_eq!(out.len(), 2);
        assert!(std::ptr::eq(out[0], &records[0]));
    }

    #[test]
    fn test_combined_filters_preserve_order() {
        let records = vec![
            record(2021, Taxonomy::Hail, "a"),
            record(2022, Taxonomy::Hail, "b"),
            record(2022, Taxonomy::Fire, "c"),
            record(2022, Taxonomy::Hail, "d"),
        ];
        let out = filter_records(&records, Selection::Only(2022), Selection::Only(Taxonomy::Hail));
        let labels: Vec<&str> = out.iter().map(|r| r.event_label.as_str()).collect();
        assert_eq!(labels, vec!["b", "d"]);
    }

    #[test]
    fn test_missing_year_only_passes_all() {
        let records = vec![
            record(2022, Taxonomy::Hail, "a"),
            record(None, Taxonomy::Hail, "b"),
        ];
        assert_eq!(filter_records(&records, Selection::All, Selection::All).len(), 2);
        let only = filter_records(&records, Selection::Only(2022), Selection::All);
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].event_label, "a");
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!("all".parse::<YearFilter>(), Ok(Selection::All));
        assert_eq!("2023".parse::<YearFilter>(), Ok(Selection::Only(2023)));
        assert_eq!(
            "winter storm".parse::<CategoryFilter>(),
            Ok(Selection::Only(Taxonomy::WinterStorm))
        );
        assert!("blizzard".parse::<CategoryFilter>().is_err());
    }
}
