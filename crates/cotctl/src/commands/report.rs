//! `cotctl report`: summary CSV and charts from two instrumentation CSVs

use anyhow::{Context, Result};
use cotlens_core::{compare, read_instrumentation, write_summary, ComparisonResult, CotConfig, RunSummary, RunTable};
use cotlens_viz::{render_length_boxplot, render_length_histogram, ChartConfig};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::output::{comparison_table, print_structured, summary_table, OutputFormat};

#[derive(Debug, Serialize)]
struct Report<'a> {
    summary: &'a [RunSummary],
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<&'a ComparisonResult>,
    files: Vec<String>,
}

/// `prefix` with `suffix` appended to its last component
fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

pub fn execute(
    full_csv: &Path,
    comp_csv: &Path,
    output_prefix: &Path,
    bins: Option<usize>,
    format: OutputFormat,
    config: &CotConfig,
) -> Result<()> {
    let bins = bins.unwrap_or(config.histogram_bins);
    if bins == 0 {
        anyhow::bail!("--bins must be at least 1");
    }

    let summary_path = with_suffix(output_prefix, "_summary.csv");
    let hist_path = with_suffix(output_prefix, "_cot_length_hist.svg");
    let box_path = with_suffix(output_prefix, "_cot_length_vs_correctness.svg");

    if let Some(parent) = summary_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    let mut table = RunTable::new();
    table.push_run(&config.baseline_label, read_instrumentation(full_csv)?);
    table.push_run(&config.candidate_label, read_instrumentation(comp_csv)?);

    let summaries = table.summarize();
    write_summary(&summary_path, &summaries)?;

    let chart = ChartConfig::default();
    render_length_histogram(&hist_path, &table.lengths_by_run(), bins, &chart)
        .with_context(|| format!("Failed to render {}", hist_path.display()))?;
    render_length_boxplot(&box_path, &table.lengths_by_run_and_correctness(), &chart)
        .with_context(|| format!("Failed to render {}", box_path.display()))?;

    let comparison = match (
        table.summary_for(&config.baseline_label),
        table.summary_for(&config.candidate_label),
    ) {
        (Some(base), Some(cand)) => Some(compare(&base, &cand)),
        _ => {
            warn!("One of the runs has no rows, skipping comparison");
            None
        }
    };

    if format != OutputFormat::Text {
        let report = Report {
            summary: &summaries,
            comparison: comparison.as_ref(),
            files: [&summary_path, &hist_path, &box_path]
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        };
        return print_structured(&report, format);
    }

    println!("Summary:");
    println!("{}", summary_table(&summaries));
    if let Some(result) = &comparison {
        println!("\n{} vs {}:", config.candidate_label, config.baseline_label);
        println!("{}", comparison_table(result));
    }
    println!("Plots and summary saved with prefix: {}", output_prefix.display());
    Ok(())
}
