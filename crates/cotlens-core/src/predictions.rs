//! Per-example prediction loading
//!
//! Each run directory holds a `predictions.jsonl` (or, for older runs, a
//! `predictions.json` with the same line-oriented content). Every record is
//! turned into a [`PredictionRecord`] with its length and truncation flags
//! derived on the way in.

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{CotError, CotResult};
use crate::metrics::lenient_count;
use crate::types::{ExampleId, PredictionRecord};

const PREDICTION_FILES: [&str; 2] = ["predictions.jsonl", "predictions.json"];

/// Find the predictions file of a run.
///
/// `run_dir` may also point straight at a file.
pub fn locate_predictions(run_dir: impl AsRef<Path>) -> CotResult<PathBuf> {
    let run_dir = run_dir.as_ref();
    if run_dir.is_file() {
        return Ok(run_dir.to_path_buf());
    }

    PREDICTION_FILES
        .iter()
        .map(|name| run_dir.join(name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| CotError::PredictionsNotFound(run_dir.to_path_buf()))
}

/// Truncation heuristic for model outputs.
///
/// An output counts as complete when, after trimming whitespace, it ends
/// with `}` or anywhere contains the `\boxed` answer marker. Everything else
/// is flagged as truncated. This matches the answer format of the GSM8K
/// prompts used in the experiment and is not a general truncation detector:
/// an output can close a brace mid-thought and still be cut off.
///
/// The information separators U+001C..U+001F are trimmed as whitespace.
pub fn detect_truncation(output: &str) -> bool {
    !output.trim_matches(is_token_separator).ends_with('}') && !output.contains("\\boxed")
}

/// Number of whitespace-separated tokens
pub fn word_count(text: &str) -> u64 {
    text.split(is_token_separator)
        .filter(|token| !token.is_empty())
        .count() as u64
}

/// Unicode whitespace plus the information separators U+001C..U+001F
fn is_token_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Load all prediction records of a file.
///
/// Lines are JSON objects; blank lines are ignored. A `.json` file holding a
/// single JSON array is accepted as well. Records without an id are skipped.
pub fn load_predictions(path: impl AsRef<Path>) -> CotResult<Vec<PredictionRecord>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| CotError::io(path, e))?;

    let raw = if is_json_array(path, &content) {
        let values: Vec<Value> =
            serde_json::from_str(&content).map_err(|e| CotError::parse(path, None, e))?;
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i + 1, v))
            .collect::<Vec<_>>()
    } else {
        parse_json_lines(path, &content)?
    };

    let mut records = Vec::with_capacity(raw.len());
    let mut seen = HashSet::new();
    let mut skipped = 0usize;

    for (line, value) in raw {
        let obj = value
            .as_object()
            .ok_or_else(|| CotError::parse(path, Some(line), "expected a JSON object"))?;

        match record_from_object(obj) {
            Some(record) => {
                if !seen.insert(record.example_id.clone()) {
                    warn!(
                        path = %path.display(),
                        example_id = %record.example_id,
                        "Duplicate example id"
                    );
                }
                records.push(record);
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "Skipped records without an id");
    }
    debug!(path = %path.display(), records = records.len(), "Loaded predictions");

    Ok(records)
}

/// Parse newline-delimited JSON, keeping 1-based line numbers
pub(crate) fn parse_json_lines(path: &Path, content: &str) -> CotResult<Vec<(usize, Value)>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<Value>(line)
                .map(|v| (i + 1, v))
                .map_err(|e| CotError::parse(path, Some(i + 1), e))
        })
        .collect()
}

fn is_json_array(path: &Path, content: &str) -> bool {
    path.extension().map_or(false, |e| e == "json") && content.trim_start().starts_with('[')
}

/// `id`, falling back to `example_id`
pub(crate) fn record_id(obj: &Map<String, Value>) -> Option<ExampleId> {
    obj.get("id")
        .and_then(ExampleId::from_json)
        .or_else(|| obj.get("example_id").and_then(ExampleId::from_json))
}

/// `model_output`, falling back to `generated_text`
pub(crate) fn record_output(obj: &Map<String, Value>) -> String {
    obj.get("model_output")
        .and_then(Value::as_str)
        .or_else(|| obj.get("generated_text").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

fn record_from_object(obj: &Map<String, Value>) -> Option<PredictionRecord> {
    let example_id = record_id(obj)?;
    let model_output = record_output(obj);

    let cot_length = obj
        .get("cot_length")
        .and_then(lenient_count)
        .unwrap_or_else(|| word_count(&model_output));

    let prediction = obj.get("prediction").filter(|v| !v.is_null()).cloned();
    let is_correct = obj.get("accuracy").map_or(false, truthy);
    let is_truncated = detect_truncation(&model_output);

    Some(PredictionRecord {
        example_id,
        model_output,
        prediction,
        is_correct,
        cot_length,
        is_truncated,
    })
}

/// Truthiness of a JSON value: zero, empty and null are false
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_boxed_answer_is_not_truncated() {
        assert!(!detect_truncation("the answer is \\boxed{42}"));
        assert!(!detect_truncation("\\boxed{42} because of the above reasoning"));
    }

    #[test]
    fn test_trailing_brace_is_not_truncated() {
        assert!(!detect_truncation("{\"answer\": 42}   \n"));
    }

    #[test]
    fn test_incomplete_output_is_truncated() {
        assert!(detect_truncation("incomplete reasoning..."));
        assert!(detect_truncation(""));
        assert!(detect_truncation("} and then"));
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("  one two\tthree\nfour  "), 4);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_information_separators_are_whitespace() {
        assert!(!detect_truncation("x }\u{1c}"));
        assert!(!detect_truncation("\u{1f}{\"answer\": 1}\u{1d} "));
        assert_eq!(word_count("a\u{1c}b"), 2);
        assert_eq!(word_count("\u{1e}a \u{a0}b\u{1f}"), 2);
    }

    #[test]
    fn test_large_cot_length_is_exact() {
        let obj = json!({"id": 1, "cot_length": 9_007_199_254_740_993u64});
        let record = record_from_object(obj.as_object().unwrap()).unwrap();
        assert_eq!(record.cot_length, 9_007_199_254_740_993);

        let obj = json!({"id": 2, "cot_length": "41"});
        assert_eq!(record_from_object(obj.as_object().unwrap()).unwrap().cot_length, 41);

        let obj = json!({"id": 3, "cot_length": 12.6});
        assert_eq!(record_from_object(obj.as_object().unwrap()).unwrap().cot_length, 13);
    }

    #[test]
    fn test_truthy() {
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!(1.0)));
        assert!(truthy(&json!("yes")));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!(0.0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!(null)));
    }

    #[test]
    fn test_record_derivation() {
        let obj = json!({
            "id": 3,
            "model_output": "two plus two is \\boxed{4}",
            "prediction": "4",
            "accuracy": 1.0
        });
        let record = record_from_object(obj.as_object().unwrap()).unwrap();
        assert_eq!(record.example_id, ExampleId::Int(3));
        assert_eq!(record.cot_length, 5);
        assert!(record.is_correct);
        assert!(!record.is_truncated);
        assert_eq!(record.prediction, Some(json!("4")));
    }

    #[test]
    fn test_explicit_cot_length_wins() {
        let obj = json!({"example_id": "q1", "model_output": "a b c", "cot_length": 128});
        let record = record_from_object(obj.as_object().unwrap()).unwrap();
        assert_eq!(record.example_id, ExampleId::from("q1"));
        assert_eq!(record.cot_length, 128);
        assert!(!record.is_correct);
    }

    #[test]
    fn test_record_without_id_is_skipped() {
        let obj = json!({"model_output": "text"});
        assert!(record_from_object(obj.as_object().unwrap()).is_none());
    }

    #[test]
    fn test_load_jsonl_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("predictions.jsonl");
        std::fs::write(
            &path,
            "{\"id\": 1, \"model_output\": \"x \\\\boxed{1}\", \"accuracy\": true}\n\n{\"id\": 2, \"model_output\": \"cut off\"}\n{\"model_output\": \"no id\"}\n",
        )
        .unwrap();

        let records = load_predictions(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].is_correct);
        assert!(!records[0].is_truncated);
        assert!(records[1].is_truncated);
    }

    #[test]
    fn test_load_json_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("predictions.json");
        std::fs::write(&path, r#"[{"id": "a", "model_output": "one two"}, {"id": "b"}]"#).unwrap();

        let records = load_predictions(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].cot_length, 2);
        assert_eq!(records[1].model_output, "");
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("predictions.jsonl");
        std::fs::write(&path, "{\"id\": 1}\n{not json\n").unwrap();

        let err = load_predictions(&path).unwrap_err();
        match err {
            CotError::Parse { line, .. } => assert_eq!(line, Some(2)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_locate_predictions_prefers_jsonl() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("predictions.json"), "").unwrap();
        std::fs::write(dir.path().join("predictions.jsonl"), "").unwrap();

        let found = locate_predictions(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("predictions.jsonl"));
    }

    #[test]
    fn test_locate_predictions_falls_back_to_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("predictions.json"), "").unwrap();

        let found = locate_predictions(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("predictions.json"));
    }

    #[test]
    fn test_locate_predictions_missing() {
        let dir = TempDir::new().unwrap();
        let err = locate_predictions(dir.path()).unwrap_err();
        assert!(matches!(err, CotError::PredictionsNotFound(_)));
    }
}
