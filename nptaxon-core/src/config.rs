use crate::error::TaxonomyResult;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_specialty_column() -> String {
    "NP_Type".to_string()
}

fn default_credentials_column() -> String {
    "Credentials".to_string()
}

fn default_output_column() -> String {
    "NP_Type_filled".to_string()
}

fn default_blank_markers() -> Vec<String> {
    vec![
        "nan".to_string(),
        "null".to_string(),
        "none".to_string(),
        "na".to_string(),
        "n/a".to_string(),
    ]
}

fn default_top_changes() -> usize {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    #[serde(default)]
    pub columns: ColumnConfig,
    /// Cell values read as blank (case-insensitive, after trimming)
    #[serde(default = "default_blank_markers")]
    pub blank_markers: Vec<String>,
    /// Run the fill pass on the rayon pool
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Run the canonical mapper over the output column after filling
    #[serde(default)]
    pub canonicalize_output: bool,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Existing specialty column (read, never modified by fill)
    #[serde(default = "default_specialty_column")]
    pub specialty: String,
    /// Raw credentials column
    #[serde(default = "default_credentials_column")]
    pub credentials: String,
    /// Column the fill result is written to
    #[serde(default = "default_output_column")]
    pub output: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            specialty: default_specialty_column(),
            credentials: default_credentials_column(),
            output: default_output_column(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Prefix written CSV with a UTF-8 BOM (spreadsheet tools need it for punctuation)
    #[serde(default)]
    pub write_bom: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// How many (original → canonical) pairs the change report lists
    #[serde(default = "default_top_changes")]
    pub top_changes: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_changes: default_top_changes(),
        }
    }
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            columns: ColumnConfig::default(),
            blank_markers: default_blank_markers(),
            parallel: true,
            canonicalize_output: false,
            output: OutputConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl TaxonomyConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed reading config {path}"))?;
        Self::from_yaml(&content).with_context(|| format!("Failed parsing config {path}"))
    }

    pub fn from_yaml(content: &str) -> TaxonomyResult<Self> {
        let config: TaxonomyConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                warn!("⚠️  Failed to load config from {p}, using defaults: {e:#}");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// True when a trimmed cell matches one of the configured blank markers.
    pub fn is_blank_marker(&self, cell: &str) -> bool {
        let cell = cell.trim();
        self.blank_markers
            .iter()
            .any(|marker| marker.eq_ignore_ascii_case(cell))
    }
}
