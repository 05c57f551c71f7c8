//! Baseline vs. candidate comparison
//!
//! Works on anything that exposes run-level statistics, so the same
//! comparison serves both `metrics.json` files and aggregated prediction
//! tables.

use serde::{Deserialize, Serialize};

use crate::types::{RunMetrics, RunSummary};

/// Run-level statistics a comparison needs
pub trait RunStats {
    /// Label shown in reports
    fn label(&self) -> &str;

    fn sample_count(&self) -> u64;

    /// Accuracy in percent (0-100)
    fn accuracy_percent(&self) -> f64;

    fn avg_cot_length(&self) -> f64;

    /// Mean per-sample latency in seconds, if known
    fn latency_seconds(&self) -> Option<f64> {
        None
    }

    /// Fraction of truncated outputs, if known
    fn truncated_fraction(&self) -> Option<f64> {
        None
    }
}

impl RunStats for RunMetrics {
    fn label(&self) -> &str {
        &self.source_path
    }

    fn sample_count(&self) -> u64 {
        self.sample_count
    }

    fn accuracy_percent(&self) -> f64 {
        self.accuracy_percent
    }

    fn avg_cot_length(&self) -> f64 {
        self.avg_cot_length
    }

    fn latency_seconds(&self) -> Option<f64> {
        self.sample_latency_seconds
    }
}

impl RunStats for RunSummary {
    fn label(&self) -> &str {
        &self.run
    }

    fn sample_count(&self) -> u64 {
        self.example_count
    }

    fn accuracy_percent(&self) -> f64 {
        self.accuracy * 100.0
    }

    fn avg_cot_length(&self) -> f64 {
        self.avg_cot_length
    }

    fn truncated_fraction(&self) -> Option<f64> {
        self.pct_truncated
    }
}

/// The statistics of one side, as they went into the comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub label: String,
    pub sample_count: u64,
    pub accuracy_percent: f64,
    pub avg_cot_length: f64,
    pub latency_seconds: Option<f64>,
    pub truncated_fraction: Option<f64>,
}

impl RunSnapshot {
    pub fn of(stats: &impl RunStats) -> Self {
        Self {
            label: stats.label().to_string(),
            sample_count: stats.sample_count(),
            accuracy_percent: stats.accuracy_percent(),
            avg_cot_length: stats.avg_cot_length(),
            latency_seconds: stats.latency_seconds(),
            truncated_fraction: stats.truncated_fraction(),
        }
    }
}

/// Deltas between a baseline and a candidate run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub baseline: RunSnapshot,
    pub candidate: RunSnapshot,

    /// Candidate minus baseline, in percentage points
    pub accuracy_delta: f64,

    /// Candidate minus baseline
    pub cot_length_delta: f64,

    /// Positive when the candidate is shorter
    pub cot_length_reduction_percent: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_delta: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_change_percent: Option<f64>,

    /// Candidate minus baseline truncated fraction, in percentage points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated_delta: Option<f64>,
}

/// `100 * delta / base`, or 0 when the base is 0
pub fn percent_change(delta: f64, base: f64) -> f64 {
    if base != 0.0 {
        100.0 * delta / base
    } else {
        0.0
    }
}

/// Compare a candidate run against a baseline
pub fn compare(baseline: &impl RunStats, candidate: &impl RunStats) -> ComparisonResult {
    let baseline = RunSnapshot::of(baseline);
    let candidate = RunSnapshot::of(candidate);

    let accuracy_delta = candidate.accuracy_percent - baseline.accuracy_percent;
    let cot_length_delta = candidate.avg_cot_length - baseline.avg_cot_length;
    let cot_length_reduction_percent = percent_change(-cot_length_delta, baseline.avg_cot_length);

    let (latency_delta, latency_change_percent) =
        match (baseline.latency_seconds, candidate.latency_seconds) {
            (Some(base), Some(cand)) => {
                let delta = cand - base;
                (Some(delta), Some(percent_change(delta, base)))
            }
            _ => (None, None),
        };

    let truncated_delta = match (baseline.truncated_fraction, candidate.truncated_fraction) {
        (Some(base), Some(cand)) => Some((cand - base) * 100.0),
        _ => None,
    };

    ComparisonResult {
        baseline,
        candidate,
        accuracy_delta,
        cot_length_delta,
        cot_length_reduction_percent,
        latency_delta,
        latency_change_percent,
        truncated_delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(acc: f64, cot: f64, latency: Option<f64>) -> RunMetrics {
        RunMetrics {
            sample_count: 100,
            accuracy_percent: acc,
            avg_cot_length: cot,
            sample_latency_seconds: latency,
            source_path: "metrics.json".to_string(),
        }
    }

    #[test]
    fn test_accuracy_delta_is_exact_difference() {
        for (a_b, a_c) in [(61.3, 58.9), (0.0, 100.0), (33.33, 33.34), (12.5, 12.5)] {
            let result = compare(&metrics(a_b, 10.0, None), &metrics(a_c, 10.0, None));
            assert_eq!(result.accuracy_delta, a_c - a_b);
        }
    }

    #[test]
    fn test_reduction_percent() {
        let result = compare(&metrics(50.0, 200.0, None), &metrics(50.0, 150.0, None));
        assert_eq!(result.cot_length_delta, -50.0);
        assert_eq!(result.cot_length_reduction_percent, 25.0);
    }

    #[test]
    fn test_reduction_zero_when_baseline_length_zero() {
        for cand in [0.0, 5.0, 1e6] {
            let result = compare(&metrics(50.0, 0.0, None), &metrics(50.0, cand, None));
            assert_eq!(result.cot_length_reduction_percent, 0.0);
        }
    }

    #[test]
    fn test_latency_only_when_both_sides_report() {
        let result = compare(&metrics(50.0, 10.0, Some(2.0)), &metrics(50.0, 10.0, None));
        assert!(result.latency_delta.is_none());
        assert!(result.latency_change_percent.is_none());

        let result = compare(&metrics(50.0, 10.0, Some(2.0)), &metrics(50.0, 10.0, Some(1.5)));
        assert_eq!(result.latency_delta, Some(-0.5));
        assert_eq!(result.latency_change_percent, Some(-25.0));
    }

    #[test]
    fn test_summaries_compare_with_truncation() {
        let base = RunSummary {
            run: "full".to_string(),
            example_count: 4,
            accuracy: 0.75,
            avg_cot_length: 120.0,
            pct_truncated: Some(0.25),
        };
        let cand = RunSummary {
            run: "compressed".to_string(),
            example_count: 4,
            accuracy: 0.5,
            avg_cot_length: 60.0,
            pct_truncated: Some(0.5),
        };

        let result = compare(&base, &cand);
        assert_eq!(result.baseline.label, "full");
        assert_eq!(result.candidate.label, "compressed");
        assert_eq!(result.accuracy_delta, -25.0);
        assert_eq!(result.cot_length_reduction_percent, 50.0);
        assert_eq!(result.truncated_delta, Some(25.0));
        assert!(result.latency_delta.is_none());
    }

    #[test]
    fn test_percent_change_guard() {
        assert_eq!(percent_change(5.0, 0.0), 0.0);
        assert_eq!(percent_change(5.0, 20.0), 25.0);
    }
}
