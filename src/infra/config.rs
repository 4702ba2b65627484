//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. HIE_GEO_CONFIG environment variable
//! 3. Default: config/default.toml

use crate::domain::rules::{BoundingBox, RegionRuleSet, HIE_BOUNDING_BOX};
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "HIE_GEO_CONFIG";

/// Config file used when neither flag nor environment names one
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Rounding precision for map grouping (4 places ≈ 11 m)
pub const DEFAULT_GROUPING_PRECISION: u32 = 4;

/// Largest precision accepted; beyond this f64 scaling loses meaning
pub const MAX_GROUPING_PRECISION: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct RegionConfig {
    /// Name of the postcode rule table ("hie-wide" or "hie-narrow")
    #[serde(default = "default_rule_set")]
    pub rule_set: String,
    /// Coordinate fallback rectangle
    #[serde(default)]
    pub bounding_box: BoundingBox,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self { rule_set: default_rule_set(), bounding_box: HIE_BOUNDING_BOX }
    }
}

fn default_rule_set() -> String {
    RegionRuleSet::default().name.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupingConfig {
    /// Decimal places kept when rounding coordinates
    #[serde(default = "default_grouping_precision")]
    pub precision: u32,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self { precision: default_grouping_precision() }
    }
}

fn default_grouping_precision() -> u32 {
    DEFAULT_GROUPING_PRECISION
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Log a metrics summary when the CLI exits
    #[serde(default = "default_report_on_exit")]
    pub report_on_exit: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { report_on_exit: default_report_on_exit() }
    }
}

fn default_report_on_exit() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub region: RegionConfig,
    #[serde(default)]
    pub grouping: GroupingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    rule_set: &'static RegionRuleSet,
    bounding_box: BoundingBox,
    grouping_precision: u32,
    report_metrics_on_exit: bool,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rule_set: &RegionRuleSet::ALL[0],
            bounding_box: HIE_BOUNDING_BOX,
            grouping_precision: DEFAULT_GROUPING_PRECISION,
            report_metrics_on_exit: true,
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Determine config file path from an explicit flag or the environment
    pub fn resolve_config_path(cli_path: Option<&str>) -> String {
        if let Some(path) = cli_path {
            return path.to_string();
        }

        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return path;
        }

        DEFAULT_CONFIG_PATH.to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
            .map(|config| Self { config_file: path.display().to_string(), ..config })
    }

    /// Build configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let toml_config: TomlConfig = toml::from_str(content)?;

        let rule_set = RegionRuleSet::by_name(&toml_config.region.rule_set).ok_or_else(|| {
            let known: Vec<&str> = RegionRuleSet::ALL.iter().map(|set| set.name).collect();
            anyhow!(
                "unknown rule_set '{}' (expected one of: {})",
                toml_config.region.rule_set,
                known.join(", ")
            )
        })?;

        let bbox = toml_config.region.bounding_box;
        if !(bbox.min_lat <= bbox.max_lat && bbox.min_lng <= bbox.max_lng) {
            return Err(anyhow!(
                "bounding_box is inverted (lat {}..{}, lng {}..{})",
                bbox.min_lat,
                bbox.max_lat,
                bbox.min_lng,
                bbox.max_lng
            ));
        }

        let mut grouping_precision = toml_config.grouping.precision;
        if grouping_precision > MAX_GROUPING_PRECISION {
            warn!(
                precision = %grouping_precision,
                max = %MAX_GROUPING_PRECISION,
                "grouping_precision_clamped"
            );
            grouping_precision = MAX_GROUPING_PRECISION;
        }

        Ok(Self {
            rule_set,
            bounding_box: bbox,
            grouping_precision,
            report_metrics_on_exit: toml_config.metrics.report_on_exit,
            config_file: "inline".to_string(),
        })
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    config_file = %path,
                    error = %format!("{:#}", e),
                    "config_load_failed_using_defaults"
                );
                Self::default()
            }
        }
    }

    // Getters for all config fields
    pub fn rule_set(&self) -> &'static RegionRuleSet {
        self.rule_set
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub fn grouping_precision(&self) -> u32 {
        self.grouping_precision
    }

    pub fn report_metrics_on_exit(&self) -> bool {
        self.report_metrics_on_exit
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method for tests to pick a rule table
    #[cfg(test)]
    pub fn with_rule_set(mut self, rule_set: &'static RegionRuleSet) -> Self {
        self.rule_set = rule_set;
        self
    }
}
