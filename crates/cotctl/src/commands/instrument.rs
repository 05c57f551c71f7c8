//! `cotctl instrument`: predictions file to per-example CSV

use anyhow::{Context, Result};
use cotlens_core::{load_predictions, locate_predictions, write_instrumentation};
use std::fs;
use std::path::Path;

pub fn execute(run_dir: &Path, out_csv: &Path) -> Result<()> {
    let predictions = locate_predictions(run_dir)?;
    let records = load_predictions(&predictions)
        .with_context(|| format!("Failed to load predictions for {}", run_dir.display()))?;

    if let Some(parent) = out_csv.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    write_instrumentation(out_csv, &records)?;

    let truncated = records.iter().filter(|r| r.is_truncated).count();
    tracing::info!(records = records.len(), truncated, "Instrumented run");
    println!("Wrote instrumentation CSV to {}", out_csv.display());
    Ok(())
}
