//! Pairing of model outputs across two runs for manual inspection

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{CotError, CotResult};
use crate::predictions::{parse_json_lines, record_id, record_output};
use crate::types::ExampleId;

/// Collect the model output of every example found in `dir`.
///
/// `.jsonl` files contribute one record per line and skip records without
/// an id. A `.json` file is a single record whose id falls back to the file
/// name. When an id appears twice, the file read last wins; files are read
/// in name order.
pub fn load_run_outputs(dir: impl AsRef<Path>) -> CotResult<BTreeMap<ExampleId, String>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(CotError::DirectoryNotFound(dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| CotError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()));
    let files = sorted_files(dir, entries)?;

    let mut outputs = BTreeMap::new();

    for path in files {
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };

        if file_name.ends_with(".jsonl") {
            let content = std::fs::read_to_string(&path).map_err(|e| CotError::io(&path, e))?;
            for (line, value) in parse_json_lines(&path, &content)? {
                let obj = value
                    .as_object()
                    .ok_or_else(|| CotError::parse(&path, Some(line), "expected a JSON object"))?;
                if let Some(id) = record_id(obj) {
                    outputs.insert(id, record_output(obj));
                }
            }
        } else if file_name.ends_with(".json") {
            let content = std::fs::read_to_string(&path).map_err(|e| CotError::io(&path, e))?;
            let value: Value =
                serde_json::from_str(&content).map_err(|e| CotError::parse(&path, None, e))?;
            let obj = value
                .as_object()
                .ok_or_else(|| CotError::parse(&path, None, "expected a JSON object"))?;
            let id = record_id(obj).unwrap_or_else(|| ExampleId::Text(file_name.clone()));
            outputs.insert(id, record_output(obj));
        }
    }

    debug!(dir = %dir.display(), examples = outputs.len(), "Loaded run outputs");
    Ok(outputs)
}

/// Regular files among `entries`, sorted. An unreadable entry fails the
/// whole listing.
fn sorted_files(
    dir: &Path,
    entries: impl IntoIterator<Item = std::io::Result<PathBuf>>,
) -> CotResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CotError::io(dir, e))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Randomly pick `n` ids present in both runs, returned sorted
pub fn sample_common<R: Rng + ?Sized>(
    baseline: &BTreeMap<ExampleId, String>,
    candidate: &BTreeMap<ExampleId, String>,
    n: usize,
    rng: &mut R,
) -> CotResult<Vec<ExampleId>> {
    let common: Vec<&ExampleId> = baseline
        .keys()
        .filter(|id| candidate.contains_key(*id))
        .collect();

    if common.len() < n {
        warn!(found = common.len(), needed = n, "Too few examples shared by both runs");
        return Err(CotError::NotEnoughExamples {
            found: common.len(),
            needed: n,
        });
    }

    let mut picked: Vec<ExampleId> = common
        .choose_multiple(rng, n)
        .map(|id| (*id).clone())
        .collect();
    picked.sort();
    Ok(picked)
}
