//! Terminal rendering of summaries and comparisons

use anyhow::Result;
use clap::ValueEnum;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use cotlens_core::{ComparisonResult, RunSummary};
use serde::Serialize;

/// Output format shared by the reporting subcommands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable tables
    Text,
    /// Pretty printed JSON
    Json,
    /// YAML
    Yaml,
}

/// Print `value` as JSON or YAML. Does nothing for [`OutputFormat::Text`].
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Text => {}
    }
    Ok(())
}

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header.iter().map(|h| Cell::new(*h)).collect::<Vec<_>>());
    table
}

/// Metric table: baseline, candidate, delta and percent change columns
pub fn comparison_table(result: &ComparisonResult) -> Table {
    let base = &result.baseline;
    let cand = &result.candidate;
    let mut table = new_table(&["Metric", "Baseline", "Compressed", "Δ (Comp - Base)", "Change %"]);

    table.add_row(vec![
        Cell::new("Accuracy (%)"),
        right(format!("{:.2}", base.accuracy_percent)),
        right(format!("{:.2}", cand.accuracy_percent)),
        right(format!("{:.2}", result.accuracy_delta)),
        right(String::new()),
    ]);
    table.add_row(vec![
        Cell::new("Avg CoT length"),
        right(format!("{:.1}", base.avg_cot_length)),
        right(format!("{:.1}", cand.avg_cot_length)),
        right(format!("{:.1}", result.cot_length_delta)),
        right(format!("{:.1}%", result.cot_length_reduction_percent)),
    ]);

    if let (Some(b), Some(c), Some(delta), Some(pct)) = (
        base.latency_seconds,
        cand.latency_seconds,
        result.latency_delta,
        result.latency_change_percent,
    ) {
        table.add_row(vec![
            Cell::new("Sample latency(s)"),
            right(format!("{:.3}", b)),
            right(format!("{:.3}", c)),
            right(format!("{:.3}", delta)),
            right(format!("{:.1}%", pct)),
        ]);
    }

    if let (Some(b), Some(c), Some(delta)) = (
        base.truncated_fraction,
        cand.truncated_fraction,
        result.truncated_delta,
    ) {
        table.add_row(vec![
            Cell::new("Truncated (%)"),
            right(format!("{:.2}", b * 100.0)),
            right(format!("{:.2}", c * 100.0)),
            right(format!("{:.2}", delta)),
            right(String::new()),
        ]);
    }

    table.add_row(vec![
        Cell::new("N samples"),
        right(base.sample_count.to_string()),
        right(cand.sample_count.to_string()),
        right(String::new()),
        right(String::new()),
    ]);

    table
}

/// One row per run, mirroring the summary CSV columns
pub fn summary_table(summaries: &[RunSummary]) -> Table {
    let mut table = new_table(&["run", "n_examples", "accuracy", "avg_cot_length", "pct_truncated"]);
    for s in summaries {
        table.add_row(vec![
            Cell::new(&s.run),
            right(s.example_count.to_string()),
            right(format!("{:.4}", s.accuracy)),
            right(format!("{:.2}", s.avg_cot_length)),
            right(s.pct_truncated.map(|p| format!("{:.4}", p)).unwrap_or_default()),
        ]);
    }
    table
}
