//! Turning command-line inputs into the file list of a batch.

use anyhow::{Context, Result};
use docbatch_common::{paths, Operation};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolve `inputs` into the files a batch of `operation` will convert.
///
/// Files are taken as given and must match the operation's extensions; any
/// mismatch rejects the whole selection. Directories contribute the matching
/// files they contain (their whole tree when `recursive`), sorted by path.
/// Paths are made absolute and duplicates dropped, keeping first occurrence.
pub fn collect_inputs(
    operation: Operation,
    inputs: &[PathBuf],
    recursive: bool,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            files.extend(scan_dir(operation, input, recursive));
        } else if input.is_file() {
            if !operation.accepts(input) {
                anyhow::bail!(
                    "{:?} is not a valid input for {} (expected {})",
                    input,
                    operation.display_name(),
                    extension_filter(operation)
                );
            }
            files.push(input.clone());
        } else {
            anyhow::bail!("Input does not exist: {:?}", input);
        }
    }

    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(files.len());
    for file in files {
        let absolute = std::path::absolute(&file)
            .with_context(|| format!("Failed to resolve path: {:?}", file))?;
        if seen.insert(absolute.clone()) {
            unique.push(absolute);
        }
    }

    for (stem, clashing) in stem_collisions(&unique) {
        tracing::warn!(
            "{} selected files share the output name {:?} and will overwrite each other: {:?}",
            clashing.len(),
            stem,
            clashing
        );
    }

    Ok(unique)
}

/// Files whose outputs land on the same path, grouped by file stem.
///
/// Both operations name their output after the input's stem, so `a/x.pdf`
/// and `b/x.pdf` both render into `x/`, and `x.doc` and `x.docx` both
/// export to `x.pdf`.
pub fn stem_collisions(files: &[PathBuf]) -> Vec<(String, Vec<PathBuf>)> {
    let mut by_stem: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        if let Some(stem) = paths::file_stem(file) {
            by_stem.entry(stem).or_default().push(file.clone());
        }
    }

    by_stem
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .collect()
}

fn scan_dir(operation: Operation, dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {:?}: {}", dir, e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| operation.accepts(path))
        .collect();

    found.sort();
    tracing::debug!("Found {} matching file(s) in {:?}", found.len(), dir);
    found
}

/// File dialog style filter for an operation, e.g. `*.doc;*.docx`.
pub fn extension_filter(operation: Operation) -> String {
    operation
        .extensions()
        .iter()
        .map(|ext| format!("*.{}", ext))
        .collect::<Vec<_>>()
        .join(";")
}
