//! Optional YAML configuration
//!
//! ```yaml
//! metrics_pattern: "*/*/test/samples/metrics.json"
//! baseline_label: full
//! candidate_label: compressed
//! histogram_bins: 30
//! side_by_side:
//!   examples: 10
//!   wrap_width: 80
//! ```
//!
//! Every key is optional. Command line flags take precedence over the file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{CotError, CotResult};
use crate::metrics::DEFAULT_METRICS_PATTERN;

/// Settings shared by all cotctl subcommands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CotConfig {
    /// Glob, relative to a run root, that locates `metrics.json`
    pub metrics_pattern: String,

    /// Label of the full-CoT run in summaries and reports
    pub baseline_label: String,

    /// Label of the compressed-CoT run
    pub candidate_label: String,

    /// Bin count of the CoT length histogram
    pub histogram_bins: usize,

    pub side_by_side: SideBySideConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SideBySideConfig {
    /// Number of examples to sample
    pub examples: usize,

    /// Column at which outputs are wrapped
    pub wrap_width: usize,
}

impl Default for CotConfig {
    fn default() -> Self {
        Self {
            metrics_pattern: DEFAULT_METRICS_PATTERN.to_string(),
            baseline_label: "full".to_string(),
            candidate_label: "compressed".to_string(),
            histogram_bins: 30,
            side_by_side: SideBySideConfig::default(),
        }
    }
}

impl Default for SideBySideConfig {
    fn default() -> Self {
        Self {
            examples: 10,
            wrap_width: 80,
        }
    }
}

impl CotConfig {
    /// Load and validate a YAML config file
    pub fn load(path: impl AsRef<Path>) -> CotResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CotError::io(path, e))?;
        let config = Self::from_yaml(&content).map_err(|e| match e {
            CotError::Config(msg) => CotError::config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse and validate YAML content. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> CotResult<Self> {
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| CotError::config(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CotResult<()> {
        if self.metrics_pattern.trim().is_empty() {
            return Err(CotError::config("metrics_pattern must not be empty"));
        }
        if self.baseline_label.trim().is_empty() || self.candidate_label.trim().is_empty() {
            return Err(CotError::config("run labels must not be empty"));
        }
        if self.baseline_label == self.candidate_label {
            return Err(CotError::config(format!(
                "baseline and candidate labels must differ (both '{}')",
                self.baseline_label
            )));
        }
        if self.histogram_bins == 0 {
            return Err(CotError::config("histogram_bins must be at least 1"));
        }
        if self.side_by_side.wrap_width < 10 {
            return Err(CotError::config("side_by_side.wrap_width must be at least 10"));
        }
        Ok(())
    }
}
