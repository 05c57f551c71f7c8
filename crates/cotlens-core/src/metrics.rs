//! Run-level metrics loading
//!
//! A finished evaluation run leaves a `metrics.json` a fixed number of
//! directories below its output root:
//!
//! ```text
//! <root>/<model>/<variant>/test/samples/metrics.json
//! ```
//!
//! Producers disagree on which keys they write, so loading is permissive:
//! a missing or null key falls back to zero (or "absent" for latency).

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{CotError, CotResult};
use crate::types::RunMetrics;

/// Glob, relative to a search root, that locates a run's metrics file
pub const DEFAULT_METRICS_PATTERN: &str = "*/*/test/samples/metrics.json";

/// Locate the metrics file of a run under `root`.
///
/// Matches are sorted and the first one wins. Several matches usually mean
/// the root holds more than one run, so they are all logged.
pub fn find_metrics(root: impl AsRef<Path>, pattern: &str) -> CotResult<PathBuf> {
    let root = root.as_ref();
    let full_pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&root.to_string_lossy()),
        pattern
    );

    debug!(pattern = %full_pattern, "Searching for metrics file");

    let mut matches: Vec<PathBuf> = glob::glob(&full_pattern)
        .map_err(|e| CotError::config(format!("Invalid metrics pattern '{}': {}", pattern, e)))?
        .filter_map(|r| r.ok())
        .collect();
    matches.sort();

    match matches.len() {
        0 => Err(CotError::MetricsNotFound {
            root: root.to_path_buf(),
            pattern: pattern.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        n => {
            warn!(
                root = %root.display(),
                count = n,
                candidates = ?matches,
                "Multiple metrics files matched; using the first in sorted order"
            );
            Ok(matches.remove(0))
        }
    }
}

/// Load run metrics from a JSON object file
pub fn load_metrics(path: impl AsRef<Path>) -> CotResult<RunMetrics> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| CotError::io(path, e))?;
    let value: Value =
        serde_json::from_str(&content).map_err(|e| CotError::parse(path, None, e))?;
    let obj = value
        .as_object()
        .ok_or_else(|| CotError::parse(path, None, "expected a JSON object"))?;

    let metrics = metrics_from_object(obj, path);
    debug!(
        path = %path.display(),
        samples = metrics.sample_count,
        accuracy = metrics.accuracy_percent,
        "Loaded run metrics"
    );
    Ok(metrics)
}

fn metrics_from_object(obj: &Map<String, Value>, path: &Path) -> RunMetrics {
    let sample_count = obj.get("n_samples").and_then(lenient_count).unwrap_or(0);

    RunMetrics {
        sample_count,
        accuracy_percent: obj.get("accuracy").and_then(lenient_number).unwrap_or(0.0) * 100.0,
        avg_cot_length: obj
            .get("avg_cot_length")
            .and_then(lenient_number)
            .unwrap_or(0.0),
        sample_latency_seconds: obj.get("sample_latency").and_then(lenient_number),
        source_path: path.display().to_string(),
    }
}

/// Non-negative count. Integers are taken exactly; floats and numeric
/// strings are rounded, negatives clamp to 0.
pub(crate) fn lenient_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    if let Some(n) = value.as_str().and_then(|s| s.trim().parse::<u64>().ok()) {
        return Some(n);
    }
    lenient_number(value).map(|n| if n > 0.0 { n.round() as u64 } else { 0 })
}

/// Numbers, or strings holding numbers. Anything else reads as absent.
pub(crate) fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
