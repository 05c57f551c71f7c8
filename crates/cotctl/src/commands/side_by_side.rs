//! `cotctl side-by-side`: eyeball sampled outputs of both runs

use anyhow::{Context, Result};
use cotlens_core::{load_run_outputs, sample_common, CotConfig};
use cotlens_viz::wrap_text;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

const RULE_WIDTH: usize = 53;

fn heading(title: &str) -> String {
    let head = format!("- {} ", title);
    let fill = RULE_WIDTH.saturating_sub(head.chars().count());
    format!("{}{}", head, "-".repeat(fill))
}

pub fn execute(
    baseline_dir: &Path,
    compressed_dir: &Path,
    examples: Option<usize>,
    seed: Option<u64>,
    width: Option<usize>,
    config: &CotConfig,
) -> Result<()> {
    let n = examples.unwrap_or(config.side_by_side.examples);
    let width = width.unwrap_or(config.side_by_side.wrap_width);

    let baseline = load_run_outputs(baseline_dir)
        .with_context(|| format!("Failed to load baseline outputs from {}", baseline_dir.display()))?;
    let compressed = load_run_outputs(compressed_dir).with_context(|| {
        format!("Failed to load compressed outputs from {}", compressed_dir.display())
    })?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let ids = sample_common(&baseline, &compressed, n, &mut rng)?;

    for id in ids {
        let base_out = baseline.get(&id).map(String::as_str).unwrap_or_default();
        let comp_out = compressed.get(&id).map(String::as_str).unwrap_or_default();

        println!("\n=== Example ID: {} ===", id);
        println!("{}", heading(&format!("Baseline ({})", config.baseline_label)));
        println!("{}", wrap_text(base_out, width).join("\n"));
        println!("\n{}", heading(&format!("Compressed ({})", config.candidate_label)));
        println!("{}", wrap_text(comp_out, width).join("\n"));
        println!("{}\n", "-".repeat(RULE_WIDTH));
    }
    Ok(())
}
