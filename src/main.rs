// Entry point and high-level CLI flow.
//
// - Option [1] loads and cleans the damage feed, printing diagnostics.
// - Option [2] exports every view for the active filters and prints previews.
// - Option [3] changes the year/category filters.
// - Option [4] runs mitigation scenarios against the baseline projection.
use once_cell::sync::Lazy;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wx_damage_report::config::DashboardConfig;
use wx_damage_report::filter::{CategoryFilter, Selection, YearFilter};
use wx_damage_report::fixtures::{FORECAST, INVESTMENT_PLAN};
use wx_damage_report::scenario::first_year_roi;
use wx_damage_report::types::{ScenarioResult, SummaryStats};
use wx_damage_report::util::{format_currency, format_int, format_number};
use wx_damage_report::{output, Dashboard};

enum LoadState {
    NotLoaded,
    Ready(Dashboard),
    Failed(String),
}

// The dashboard is loaded once and queried many times in a single run.
// Filters and the scenario selection live here, never inside the engine.
struct AppState {
    config: DashboardConfig,
    load: LoadState,
    year: YearFilter,
    category: CategoryFilter,
    selected: Vec<String>,
}

static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        config: DashboardConfig::default(),
        load: LoadState::NotLoaded,
        year: Selection::All,
        category: Selection::All,
        selected: Vec::new(),
    })
});

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn prompt(label: &str) -> String {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_choice() -> String {
    prompt("Enter choice: ")
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match prompt("Back to Report Selection (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load() {
    let mut st = state();
    match Dashboard::load(&st.config) {
        Ok(dashboard) => {
            let report = dashboard.load_report();
            println!(
                "Processing dataset... ({} rows read, {} weather events kept)",
                format_int(report.total_rows),
                format_int(report.kept_rows)
            );
            let skipped = report.invalid_cost + report.parse_errors;
            if skipped > 0 {
                println!(
                    "Note: {} rows skipped ({} without a numeric cost).",
                    format_int(skipped),
                    format_int(report.invalid_cost)
                );
            }
            println!();
            st.load = LoadState::Ready(dashboard);
        }
        Err(e) => {
            error!(error = %e, "failed to load damage feed");
            st.load = LoadState::Failed(format!("Error loading weather damage data: {}", e));
        }
    }
    if let LoadState::Failed(msg) = &st.load {
        eprintln!("{}\n", msg);
    }
}

/// Borrow the loaded dashboard or explain why there is none.
fn ready(st: &AppState) -> Option<&Dashboard> {
    match &st.load {
        LoadState::Ready(d) => Some(d),
        LoadState::NotLoaded => {
            println!("Error: No data loaded. Please load the file first (option 1).\n");
            None
        }
        LoadState::Failed(msg) => {
            println!("{}\n", msg);
            None
        }
    }
}

fn handle_generate_reports() {
    let st = state();
    let Some(dashboard) = ready(&st) else {
        return;
    };
    let views = dashboard.filtered_views(st.year, st.category);
    let summary = dashboard.summary(st.year, st.category);
    let out_dir = &st.config.output_dir;
    let preview = st.config.preview_rows;

    println!("Generating reports...");
    println!("Filters: year = {}, category = {}\n", st.year, st.category);
    print_headline(&summary);

    export_csv(out_dir, "report_by_event.csv", &views.by_event);
    export_csv(out_dir, "report_by_category.csv", &views.by_category);
    export_csv(out_dir, "report_by_installation.csv", &views.by_installation);
    export_csv(out_dir, "report_by_year.csv", &views.by_year);
    export_csv(out_dir, "report_geo_points.csv", &views.geo);
    export_csv(out_dir, "forecast.csv", &FORECAST);
    export_csv(out_dir, "investment_plan.csv", &INVESTMENT_PLAN);

    output::preview_table("Damage Cost by Weather Event", Some("Ranked by total cost"), &views.by_event, preview);
    output::preview_table("Damage Cost by Event Type", None, &views.by_category, views.by_category.len());
    output::preview_table(
        "Top Impacted Installations",
        Some(format!("Top {} by total cost", st.config.top_installations).as_str()),
        &views.by_installation,
        preview,
    );
    output::preview_table("Historical Yearly Trends", None, &views.by_year, views.by_year.len());
    output::preview_table("Geographic Distribution", Some("Map markers, in feed order"), &views.geo, preview);
    output::preview_table("Five-Year Damage Forecast", Some("Illustrative planning figures"), &FORECAST, FORECAST.len());
    output::preview_table("Mitigation Investment vs. Savings", None, &INVESTMENT_PLAN, INVESTMENT_PLAN.len());

    if let Err(e) = output::write_json(&out_dir.join("summary.json"), &summary) {
        eprintln!("Write error: {}", e);
    }
    println!("(Full tables exported to {})\n", out_dir.display());
}

fn export_csv<T: Serialize>(dir: &Path, name: &str, rows: &[T]) {
    if let Err(e) = output::write_csv(&dir.join(name), rows) {
        warn!(file = name, error = %e, "export failed");
        eprintln!("Write error ({}): {}", name, e);
    }
}

fn print_headline(summary: &SummaryStats) {
    println!("Total Damage Cost:  {}", format_currency(summary.total_cost));
    println!("Weather Events:     {}", format_int(summary.total_events));
    println!(
        "Avg Cost Per Event: {}",
        summary
            .avg_cost_per_event
            .map(format_currency)
            .unwrap_or_else(|| "n/a".to_string())
    );
    if let Some(trend) = &summary.trend {
        println!(
            "Trend {}-{}: {:?}; busiest year {} ({} events)",
            trend.first_year, trend.last_year, trend.direction, trend.busiest_year, trend.busiest_year_events
        );
    }
    if let Some(share) = summary.top3_installation_share {
        println!("Top 3 installations account for {}% of damages", share);
    }
    if let Some(share) = summary.leading_categories_share {
        let names: Vec<String> = summary.leading_categories.iter().map(|c| c.to_string()).collect();
        println!("{} account for {}% of damages", names.join(" and "), share);
    }
    println!();
}

fn handle_filters() {
    let mut st = state();
    let Some(options) = ready(&st).map(|d| d.filters()) else {
        return;
    };
    let years: Vec<String> = options.years.iter().map(|y| y.to_string()).collect();
    let categories: Vec<String> = options.categories.iter().map(|c| c.to_string()).collect();
    println!("Years: all, {}", years.join(", "));
    match prompt("Year filter: ").parse::<YearFilter>() {
        Ok(y) => st.year = y,
        Err(_) => println!("Invalid year; keeping {}.", st.year),
    }
    println!("Categories: all, {}", categories.join(", "));
    match prompt("Category filter: ").parse::<CategoryFilter>() {
        Ok(c) => st.category = c,
        Err(e) => println!("{}; keeping {}.", e, st.category),
    }
    info!(year = %st.year, category = %st.category, "filters updated");
    println!();
}

fn print_scenario(result: &ScenarioResult) {
    println!("Current Projection:  {}", format_currency(result.baseline_projection));
    println!("With Mitigation:     {}", format_currency(result.projected_with_mitigation));
    println!("Annual Savings:      {}", format_currency(result.savings));
    println!("Implementation Cost: {}", format_currency(result.total_implementation_cost));
    match first_year_roi(result) {
        Some(roi) => println!("ROI (First Year):    {}%", format_number(roi, 1)),
        None => println!("ROI (First Year):    n/a"),
    }
    println!();
}

fn handle_scenarios() {
    let mut st = state();
    let Some(dashboard) = ready(&st).cloned() else {
        return;
    };
    output::preview_table(
        "Mitigation Strategies",
        None,
        dashboard.scenario_catalog(),
        dashboard.scenario_catalog().len(),
    );
    loop {
        println!("Selected: [{}]", st.selected.join(", "));
        let input = prompt("Strategy id to toggle, 'optimal', 'clear', or blank to return: ");
        let result = match input.as_str() {
            "" => break,
            "optimal" => {
                st.selected = dashboard.scenario_catalog().iter().map(|s| s.id.to_string()).collect();
                dashboard.apply_optimal_scenario()
            }
            "clear" => {
                st.selected.clear();
                dashboard.run_scenario(&st.selected)
            }
            id => {
                if let Some(pos) = st.selected.iter().position(|s| s == id) {
                    st.selected.remove(pos);
                } else {
                    st.selected.push(id.to_string());
                }
                dashboard.run_scenario(&st.selected)
            }
        };
        info!(selected = ?st.selected, savings = result.savings, "scenario evaluated");
        print_scenario(&result);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match DashboardConfig::load() {
        Ok(config) => state().config = config,
        Err(e) => warn!(error = %e, "using default config"),
    }

    loop {
        println!("Weather Damage Dashboard");
        println!("[1] Load the file");
        println!("[2] Generate Reports");
        println!("[3] Set Filters");
        println!("[4] Scenario Modeling");
        println!("[5] Exit\n");
        match read_choice().as_str() {
            "1" => handle_load(),
            "2" => {
                println!();
                handle_generate_reports();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => handle_filters(),
            "4" => handle_scenarios(),
            "5" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1-5.\n"),
        }
    }
}
