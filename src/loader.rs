use crate::error::Result;
use crate::normalize::normalize;
use crate::types::{EventRecord, RawRow};
use crate::util::{parse_f64_safe, parse_i32_safe, parse_serial_date};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    /// Lines the CSV reader could not turn into a row at all.
    pub parse_errors: usize,
    pub invalid_cost: usize,
}

/// Read the damage feed from a CSV file and clean it.
pub fn load_and_clean<P: AsRef<Path>>(path: P) -> Result<(Vec<EventRecord>, LoadReport)> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading weather damage feed");
    let rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let (records, report) = clean_csv(rdr)?;
    info!(
        total = report.total_rows,
        kept = report.kept_rows,
        invalid_cost = report.invalid_cost,
        "feed cleaned"
    );
    Ok((records, report))
}

/// Same as [`load_and_clean`] but over any reader, e.g. an in-memory buffer.
pub fn load_from_reader<R: Read>(reader: R) -> Result<(Vec<EventRecord>, LoadReport)> {
    let rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    clean_csv(rdr)
}

fn clean_csv<R: Read>(mut rdr: csv::Reader<R>) -> Result<(Vec<EventRecord>, LoadReport)> {
    // A missing or unreadable header is fatal; bad rows after it are not.
    rdr.headers()?;
    let mut rows = Vec::new();
    let mut parse_errors = 0usize;
    for result in rdr.deserialize::<RawRow>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                debug!(error = %e, "skipping unreadable row");
                parse_errors += 1;
            }
        }
    }
    let (records, mut report) = clean(rows);
    report.total_rows += parse_errors;
    report.parse_errors = parse_errors;
    Ok((records, report))
}

/// Turn raw rows into event records, silently dropping the ones whose cost
/// does not coerce to a number. Every other field is best effort; a blank or
/// unparseable year leaves `year = None`.
pub fn clean<I>(rows: I) -> (Vec<EventRecord>, LoadReport)
where
    I: IntoIterator<Item = RawRow>,
{
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for row in rows {
        report.total_rows += 1;

        let cost = match parse_f64_safe(row.cost.as_deref()) {
            Some(c) => c,
            None => {
                report.invalid_cost += 1;
                continue;
            }
        };
        let year = parse_i32_safe(row.year.as_deref());
        if year.is_none() {
            debug!(year = ?row.year, "keeping row without a usable year");
        }

        let event_type_raw = row.weather_event.unwrap_or_default();
        // Categorize before the display label is altered.
        let category = normalize(Some(&event_type_raw));
        let named_storm = row.named_storm.filter(|s| !s.is_empty());
        let event_label = build_event_label(&event_type_raw, named_storm.as_deref());

        let installation = row
            .installation
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        records.push(EventRecord {
            installation,
            category,
            cost,
            year,
            event_label,
            occurred_on: parse_serial_date(row.date_serial.as_deref()),
            latitude: parse_f64_safe(row.latitude.as_deref()),
            longitude: parse_f64_safe(row.longitude.as_deref()),
            named_storm,
            event_type_raw,
        });
    }

    report.kept_rows = records.len();
    (records, report)
}

/// Display name: the first "(Typhoon)" marker is removed, then the named
/// storm, if any, is appended in parentheses.
pub fn build_event_label(event_type_raw: &str, named_storm: Option<&str>) -> String {
    let base = event_type_raw.replacen("(Typhoon)", "", 1);
    let base = base.trim();
    match named_storm {
        Some(storm) if !storm.is_empty() => format!("{} ({})", base, storm),
        _ => base.to_string(),
    }
}
