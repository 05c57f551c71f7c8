//! Data model shared by the loaders, the aggregator and the comparator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one evaluation example.
///
/// Upstream producers emit either integers or strings. Integers order
/// before strings so mixed runs still sort deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExampleId {
    Int(i64),
    Text(String),
}

impl ExampleId {
    /// Convert a JSON value into an id. `null` means "no id".
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Number(n) => Some(match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Text(n.to_string()),
            }),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            other => Some(Self::Text(other.to_string())),
        }
    }

    /// Parse a CSV cell, preferring the integer form
    pub fn parse_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        match trimmed.parse::<i64>() {
            Ok(i) => Self::Int(i),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for ExampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ExampleId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ExampleId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Aggregate statistics of one evaluation run, as read from `metrics.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Number of evaluated samples
    pub sample_count: u64,

    /// Accuracy in percent (0-100)
    pub accuracy_percent: f64,

    /// Mean chain-of-thought length
    pub avg_cot_length: f64,

    /// Mean per-sample latency in seconds, when the producer recorded it
    pub sample_latency_seconds: Option<f64>,

    /// File the metrics were loaded from
    pub source_path: String,
}

impl RunMetrics {
    /// Derive a summary row for this run.
    ///
    /// The sample count carries over unchanged. Truncation is unknown at this
    /// level, so `pct_truncated` stays empty.
    pub fn to_summary(&self, label: impl Into<String>) -> RunSummary {
        RunSummary {
            run: label.into(),
            example_count: self.sample_count,
            accuracy: self.accuracy_percent / 100.0,
            avg_cot_length: self.avg_cot_length,
            pct_truncated: None,
        }
    }
}

/// One per-example prediction with its derived flags
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub example_id: ExampleId,
    pub model_output: String,
    pub prediction: Option<serde_json::Value>,
    pub is_correct: bool,
    pub cot_length: u64,
    pub is_truncated: bool,
}

/// Per-run aggregation of prediction records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run label (e.g. `full`, `compressed`)
    pub run: String,

    #[serde(rename = "n_examples")]
    pub example_count: u64,

    /// Mean of `is_correct`, as a fraction
    pub accuracy: f64,

    pub avg_cot_length: f64,

    /// Mean of `is_truncated`, as a fraction
    pub pct_truncated: Option<f64>,
}
