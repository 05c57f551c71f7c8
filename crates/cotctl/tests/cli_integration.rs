//! End-to-end tests for the cotctl binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cotctl() -> Command {
    let mut cmd = Command::cargo_bin("cotctl").expect("cotctl binary");
    cmd.env_remove("COTCTL_CONFIG").env_remove("COTCTL_LOG");
    cmd
}

/// Lay out `<root>/model/variant/test/samples/metrics.json`
fn write_metrics(root: &Path, json: &str) {
    let samples = root.join("qwen").join("full_cot").join("test").join("samples");
    fs::create_dir_all(&samples).unwrap();
    fs::write(samples.join("metrics.json"), json).unwrap();
}

fn write_instrumentation(path: &Path, rows: &[&str]) {
    let mut content = String::from("example_id,cot_length,correct,prediction,truncated\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_help_lists_subcommands() {
    cotctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("instrument"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("side-by-side"));
}

#[test]
fn test_compare_prints_deltas() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("base");
    let comp = dir.path().join("comp");
    write_metrics(&base, r#"{"n_samples": 100, "accuracy": 0.8, "avg_cot_length": 200.0, "sample_latency": 2.0}"#);
    write_metrics(&comp, r#"{"n_samples": 100, "accuracy": 0.75, "avg_cot_length": 100.0, "sample_latency": 1.0}"#);

    cotctl()
        .args(["compare"])
        .arg(&base)
        .arg(&comp)
        .assert()
        .success()
        .stdout(predicate::str::contains("=== CoT Comparison ==="))
        .stdout(predicate::str::contains("80.00"))
        .stdout(predicate::str::contains("-5.00"))
        .stdout(predicate::str::contains("50.0%"))
        .stdout(predicate::str::contains("Sample latency(s)"));
}

#[test]
fn test_compare_json_output() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("base");
    let comp = dir.path().join("comp");
    write_metrics(&base, r#"{"n_samples": 10, "accuracy": 0.5, "avg_cot_length": 0}"#);
    write_metrics(&comp, r#"{"n_samples": 10, "accuracy": 0.6, "avg_cot_length": 40}"#);

    let output = cotctl()
        .args(["compare", "-o", "json"])
        .arg(&base)
        .arg(&comp)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["cot_length_reduction_percent"], 0.0);
    assert_eq!(json["baseline"]["sample_count"], 10);
    assert!(json.get("latency_delta").is_none());
}

#[test]
fn test_compare_missing_metrics_fails() {
    let dir = TempDir::new().unwrap();
    write_metrics(&dir.path().join("base"), r#"{"accuracy": 0.5}"#);

    cotctl()
        .arg("compare")
        .arg(dir.path().join("base"))
        .arg(dir.path().join("empty"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("metrics.json not found under"));
}

#[test]
fn test_instrument_writes_csv() {
    let dir = TempDir::new().unwrap();
    let samples = dir.path().join("samples");
    fs::create_dir_all(&samples).unwrap();
    fs::write(
        samples.join("predictions.jsonl"),
        concat!(
            "{\"id\": 1, \"model_output\": \"so the answer is \\\\boxed{42}\", \"prediction\": \"42\", \"accuracy\": 1}\n",
            "{\"id\": 2, \"model_output\": \"incomplete reasoning...\", \"accuracy\": 0}\n",
        ),
    )
    .unwrap();
    let out = dir.path().join("csv").join("run.csv");

    cotctl()
        .args(["instrument", "--run-dir"])
        .arg(&samples)
        .arg("--out-csv")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote instrumentation CSV"));

    let csv = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "example_id,cot_length,correct,prediction,truncated");
    assert_eq!(lines[1], "1,5,true,42,false");
    assert_eq!(lines[2], "2,2,false,,true");
}

#[test]
fn test_instrument_without_predictions_fails() {
    let dir = TempDir::new().unwrap();

    cotctl()
        .args(["instrument", "--run-dir"])
        .arg(dir.path())
        .arg("--out-csv")
        .arg(dir.path().join("out.csv"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No predictions file found"));
}

#[test]
fn test_report_writes_summary_and_charts() {
    let dir = TempDir::new().unwrap();
    let full = dir.path().join("full.csv");
    let comp = dir.path().join("comp.csv");
    write_instrumentation(&full, &["1,200,true,4,false", "2,300,false,5,true"]);
    write_instrumentation(&comp, &["1,90,True,4,False", "2,110,True,5,False"]);
    let prefix = dir.path().join("reports").join("gsm8k");

    cotctl()
        .args(["report", "--full-csv"])
        .arg(&full)
        .arg("--comp-csv")
        .arg(&comp)
        .arg("--output-prefix")
        .arg(&prefix)
        .args(["--bins", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary:"))
        .stdout(predicate::str::contains("compressed"))
        .stdout(predicate::str::contains("Plots and summary saved with prefix"));

    let reports = dir.path().join("reports");
    let summary = fs::read_to_string(reports.join("gsm8k_summary.csv")).unwrap();
    assert!(summary.starts_with("run,n_examples,accuracy,avg_cot_length,pct_truncated"));
    assert!(summary.contains("compressed,2,1.0,100.0,0.0"));
    assert!(summary.contains("full,2,0.5,250.0,0.5"));
    assert!(reports.join("gsm8k_cot_length_hist.svg").exists());
    assert!(reports.join("gsm8k_cot_length_vs_correctness.svg").exists());
}

#[test]
fn test_report_uses_config_labels() {
    let dir = TempDir::new().unwrap();
    let full = dir.path().join("full.csv");
    let comp = dir.path().join("comp.csv");
    write_instrumentation(&full, &["1,20,true,,false"]);
    write_instrumentation(&comp, &["1,10,true,,false"]);
    let config = dir.path().join("cotlens.yaml");
    fs::write(&config, "baseline_label: long\ncandidate_label: short\n").unwrap();

    cotctl()
        .arg("--config")
        .arg(&config)
        .args(["report", "--full-csv"])
        .arg(&full)
        .arg("--comp-csv")
        .arg(&comp)
        .arg("--output-prefix")
        .arg(dir.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("short vs long"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.yaml");
    fs::write(&config, "histogram_bins: 0\n").unwrap();

    cotctl()
        .arg("--config")
        .arg(&config)
        .args(["completion", "bash"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("histogram_bins"));
}

#[test]
fn test_side_by_side_is_seeded() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("base");
    let comp = dir.path().join("comp");
    fs::create_dir_all(&base).unwrap();
    fs::create_dir_all(&comp).unwrap();

    let mut base_lines = String::new();
    let mut comp_lines = String::new();
    for i in 0..20 {
        base_lines.push_str(&format!("{{\"id\": {}, \"model_output\": \"long reasoning for {}\"}}\n", i, i));
        comp_lines.push_str(&format!("{{\"id\": {}, \"generated_text\": \"short {}\"}}\n", i, i));
    }
    fs::write(base.join("predictions.jsonl"), base_lines).unwrap();
    fs::write(comp.join("predictions.jsonl"), comp_lines).unwrap();

    let run = || {
        cotctl()
            .args(["side-by-side", "--baseline-dir"])
            .arg(&base)
            .arg("--compressed-dir")
            .arg(&comp)
            .args(["-n", "3", "--seed", "11"])
            .output()
            .unwrap()
    };
    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let stdout = String::from_utf8(first.stdout).unwrap();
    assert_eq!(stdout.matches("=== Example ID:").count(), 3);
    assert!(stdout.contains("long reasoning for"));
    assert!(stdout.contains("short"));
}

#[test]
fn test_side_by_side_not_enough_examples() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("base");
    let comp = dir.path().join("comp");
    fs::create_dir_all(&base).unwrap();
    fs::create_dir_all(&comp).unwrap();
    fs::write(base.join("a.jsonl"), "{\"id\": 1, \"model_output\": \"x\"}\n").unwrap();
    fs::write(comp.join("a.jsonl"), "{\"id\": 1, \"model_output\": \"y\"}\n").unwrap();

    cotctl()
        .args(["side-by-side", "--baseline-dir"])
        .arg(&base)
        .arg("--compressed-dir")
        .arg(&comp)
        .args(["-n", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Not enough common examples"));
}

#[test]
fn test_completion_bash() {
    cotctl()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cotctl"));
}
