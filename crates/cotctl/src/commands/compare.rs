//! `cotctl compare`: metrics.json of two runs side by side

use anyhow::{Context, Result};
use cotlens_core::{compare, find_metrics, load_metrics};
use std::path::Path;
use tracing::info;

use crate::output::{comparison_table, print_structured, OutputFormat};

pub fn execute(
    baseline_dir: &Path,
    compressed_dir: &Path,
    pattern: &str,
    format: OutputFormat,
) -> Result<()> {
    let baseline_path = find_metrics(baseline_dir, pattern)
        .with_context(|| format!("Baseline run: {}", baseline_dir.display()))?;
    let compressed_path = find_metrics(compressed_dir, pattern)
        .with_context(|| format!("Compressed run: {}", compressed_dir.display()))?;

    let baseline = load_metrics(&baseline_path)?;
    let compressed = load_metrics(&compressed_path)?;
    info!(
        baseline = %baseline_path.display(),
        compressed = %compressed_path.display(),
        "Comparing runs"
    );

    let result = compare(&baseline, &compressed);

    if format != OutputFormat::Text {
        return print_structured(&result, format);
    }

    println!("\n=== CoT Comparison ===");
    println!("Baseline metrics.json  : {}", baseline.source_path);
    println!("Compressed metrics.json: {}\n", compressed.source_path);
    println!("{}", comparison_table(&result));
    Ok(())
}
