use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One row of a pairs file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PairRecord {
    pub prediction: String,
    pub reference: String,
}

/// Reads a CSV file with `prediction` and `reference` header columns.
///
/// Other columns are ignored and leading/trailing whitespace is trimmed.
pub fn read_pairs(path: &Path) -> Result<Vec<PairRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    reader.deserialize().collect()
}

/// Resolves a path from a pairs file against the directory that holds it.
pub fn resolve(pairs_file: &Path, entry: &str) -> PathBuf {
    let entry = Path::new(entry);
    if entry.is_absolute() {
        return entry.to_path_buf();
    }
    pairs_file
        .parent()
        .map(|dir| dir.join(entry))
        .unwrap_or_else(|| entry.to_path_buf())
}
