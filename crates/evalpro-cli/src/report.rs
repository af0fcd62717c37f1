use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct RecoveryRow<'a> {
    pub index: usize,
    pub prediction: &'a str,
    pub reference: &'a str,
    pub seq_recovery_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct SimilarityRow<'a> {
    pub index: usize,
    pub prediction: &'a str,
    pub reference: &'a str,
    pub rmsd: f64,
    pub tm_score: f64,
    pub aligned_length: usize,
}

#[derive(Debug, Serialize)]
pub struct DockingRow<'a> {
    pub index: usize,
    pub prediction: &'a str,
    pub reference: &'a str,
    pub dockq_avg: f64,
    pub dockq_max: f64,
    pub dockq_min: f64,
    pub interfaces: usize,
}

/// Writes one CSV row per pair, with a header derived from the row type.
pub fn write_report<R: Serialize>(path: &Path, rows: &[R]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
