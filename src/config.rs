use crate::error::{DashboardError, Result};
use crate::fixtures::BASELINE_PROJECTION;
use crate::reports::DEFAULT_TOP_INSTALLATIONS;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_ENV: &str = "WX_DASHBOARD_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub top_installations: usize,
    pub baseline_projection: f64,
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("ag3_data_v9.csv"),
            output_dir: PathBuf::from("."),
            top_installations: DEFAULT_TOP_INSTALLATIONS,
            baseline_projection: BASELINE_PROJECTION,
            preview_rows: 5,
        }
    }
}

impl DashboardConfig {
    /// Resolve the config file from `WX_DASHBOARD_CONFIG`, then
    /// `dashboard.json`; fall back to defaults when neither exists.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text).map_err(|source| DashboardError::Config {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "loaded dashboard config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
