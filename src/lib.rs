//! Weather damage analytics: cleans a flat feed of damage events, rolls it up
//! into ranked and percentage-weighted views, and projects the effect of
//! mitigation strategy scenarios.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod fixtures;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod reports;
pub mod scenario;
pub mod types;
pub mod util;

pub use dashboard::Dashboard;
pub use error::{DashboardError, Result};
