//! Group-wise aggregation of prediction records by run label

use std::collections::BTreeMap;

use crate::types::{PredictionRecord, RunSummary};

/// A prediction record tagged with the run it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRecord {
    pub run: String,
    pub record: PredictionRecord,
}

/// Rows of several runs, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct RunTable {
    rows: Vec<LabeledRecord>,
}

#[derive(Default)]
struct Accumulator {
    count: u64,
    correct: u64,
    cot_total: f64,
    truncated: u64,
}

impl RunTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every record of one run under `label`
    pub fn push_run(&mut self, label: &str, records: impl IntoIterator<Item = PredictionRecord>) {
        self.rows.extend(records.into_iter().map(|record| LabeledRecord {
            run: label.to_string(),
            record,
        }));
    }

    /// One summary per run label, sorted by label.
    ///
    /// Each field is a plain mean over the run's rows, so a run where every
    /// record is correct has an accuracy of exactly 1.0.
    pub fn summarize(&self) -> Vec<RunSummary> {
        let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();

        for row in &self.rows {
            let acc = groups.entry(row.run.as_str()).or_default();
            acc.count += 1;
            acc.correct += u64::from(row.record.is_correct);
            acc.cot_total += row.record.cot_length as f64;
            acc.truncated += u64::from(row.record.is_truncated);
        }

        groups
            .into_iter()
            .map(|(run, acc)| {
                let n = acc.count as f64;
                RunSummary {
                    run: run.to_string(),
                    example_count: acc.count,
                    accuracy: acc.correct as f64 / n,
                    avg_cot_length: acc.cot_total / n,
                    pct_truncated: Some(acc.truncated as f64 / n),
                }
            })
            .collect()
    }

    /// Summary of a single run, if it has any rows
    pub fn summary_for(&self, label: &str) -> Option<RunSummary> {
        self.summarize().into_iter().find(|s| s.run == label)
    }

    /// CoT lengths grouped by run label
    pub fn lengths_by_run(&self) -> BTreeMap<String, Vec<f64>> {
        let mut out: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for row in &self.rows {
            out.entry(row.run.clone())
                .or_default()
                .push(row.record.cot_length as f64);
        }
        out
    }

    /// CoT lengths grouped by (run label, correctness)
    pub fn lengths_by_run_and_correctness(&self) -> BTreeMap<(String, bool), Vec<f64>> {
        let mut out: BTreeMap<(String, bool), Vec<f64>> = BTreeMap::new();
        for row in &self.rows {
            out.entry((row.run.clone(), row.record.is_correct))
                .or_default()
                .push(row.record.cot_length as f64);
        }
        out
    }
}
