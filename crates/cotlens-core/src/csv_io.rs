//! CSV files exchanged between the instrument and report steps
//!
//! Instrumentation CSV (one row per example):
//! `example_id,cot_length,correct,prediction,truncated`
//!
//! Summary CSV (one row per run):
//! `run,n_examples,accuracy,avg_cot_length,pct_truncated`

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::error::{CotError, CotResult};
use crate::types::{ExampleId, PredictionRecord, RunSummary};

#[derive(Debug, Serialize)]
struct InstrumentationRow {
    example_id: String,
    cot_length: u64,
    correct: bool,
    prediction: String,
    truncated: bool,
}

/// Cells are read as text so that files written by other tools
/// (`True`/`False`, `12.0`) load as well.
#[derive(Debug, Deserialize)]
struct RawInstrumentationRow {
    example_id: String,
    #[serde(default)]
    cot_length: String,
    #[serde(default)]
    correct: String,
    #[serde(default)]
    prediction: String,
    #[serde(default)]
    truncated: String,
}

const INSTRUMENTATION_HEADER: [&str; 5] =
    ["example_id", "cot_length", "correct", "prediction", "truncated"];

const SUMMARY_HEADER: [&str; 5] = ["run", "n_examples", "accuracy", "avg_cot_length", "pct_truncated"];

/// Writer with the header already written, so files without rows still
/// carry their columns
fn writer_with_header(path: &Path, header: &[&str]) -> CotResult<csv::Writer<std::fs::File>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| CotError::csv(path, e))?;
    writer.write_record(header).map_err(|e| CotError::csv(path, e))?;
    Ok(writer)
}

/// Write per-example rows of one run
pub fn write_instrumentation(path: impl AsRef<Path>, records: &[PredictionRecord]) -> CotResult<()> {
    let path = path.as_ref();
    let mut writer = writer_with_header(path, &INSTRUMENTATION_HEADER)?;

    for record in records {
        writer
            .serialize(InstrumentationRow {
                example_id: record.example_id.to_string(),
                cot_length: record.cot_length,
                correct: record.is_correct,
                prediction: prediction_cell(record.prediction.as_ref()),
                truncated: record.is_truncated,
            })
            .map_err(|e| CotError::csv(path, e))?;
    }

    writer.flush().map_err(|e| CotError::io(path, e))?;
    debug!(path = %path.display(), rows = records.len(), "Wrote instrumentation CSV");
    Ok(())
}

/// Read per-example rows back.
///
/// Model outputs are not part of the CSV, so the returned records carry an
/// empty `model_output` and the truncation flag stored in the file.
pub fn read_instrumentation(path: impl AsRef<Path>) -> CotResult<Vec<PredictionRecord>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| CotError::csv(path, e))?;

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<RawInstrumentationRow>().enumerate() {
        // Header is line 1
        let line = i + 2;
        let row = row.map_err(|e| CotError::csv(path, format!("line {}: {}", line, e)))?;

        let cot_length = if row.cot_length.trim().is_empty() {
            0
        } else {
            row.cot_length
                .trim()
                .parse::<f64>()
                .map(|n| if n > 0.0 { n.round() as u64 } else { 0 })
                .map_err(|_| {
                    CotError::csv(path, format!("line {}: invalid cot_length '{}'", line, row.cot_length))
                })?
        };

        records.push(PredictionRecord {
            example_id: ExampleId::parse_cell(&row.example_id),
            model_output: String::new(),
            prediction: (!row.prediction.is_empty()).then(|| Value::String(row.prediction)),
            is_correct: parse_flag(&row.correct),
            cot_length,
            is_truncated: parse_flag(&row.truncated),
        });
    }

    debug!(path = %path.display(), rows = records.len(), "Read instrumentation CSV");
    Ok(records)
}

/// Write one summary row per run
pub fn write_summary(path: impl AsRef<Path>, summaries: &[RunSummary]) -> CotResult<()> {
    let path = path.as_ref();
    let mut writer = writer_with_header(path, &SUMMARY_HEADER)?;
    for summary in summaries {
        writer.serialize(summary).map_err(|e| CotError::csv(path, e))?;
    }
    writer.flush().map_err(|e| CotError::io(path, e))?;
    Ok(())
}

/// Strings are written bare, other values as JSON, null as an empty cell
fn prediction_cell(prediction: Option<&Value>) -> String {
    match prediction {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn parse_flag(cell: &str) -> bool {
    matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "1.0" | "yes"
    )
}
