use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: sequence data before the first '>' header")]
    SequenceBeforeHeader { line: usize },
    #[error("line {line}: header has no record id")]
    EmptyHeader { line: usize },
    #[error("record '{id}' has no sequence")]
    EmptySequence { id: String },
    #[error("file contains no records")]
    NoRecords,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// First whitespace-delimited token of the header line.
    pub id: String,
    pub sequence: String,
}

pub fn read_fasta(path: &Path) -> Result<Vec<FastaRecord>, FastaError> {
    parse_fasta(&fs::read_to_string(path)?)
}

/// Parses FASTA text, keeping records in file order.
///
/// Sequence lines are concatenated with all whitespace removed; a trailing `*`
/// stop marker is dropped.
pub fn parse_fasta(content: &str) -> Result<Vec<FastaRecord>, FastaError> {
    let mut records: Vec<FastaRecord> = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            finish(records.last_mut())?;
            let id = header
                .split_whitespace()
                .next()
                .ok_or(FastaError::EmptyHeader { line: index + 1 })?;
            records.push(FastaRecord {
                id: id.to_string(),
                sequence: String::new(),
            });
        } else {
            let record = records
                .last_mut()
                .ok_or(FastaError::SequenceBeforeHeader { line: index + 1 })?;
            record
                .sequence
                .extend(line.chars().filter(|c| !c.is_whitespace()));
        }
    }

    finish(records.last_mut())?;
    if records.is_empty() {
        return Err(FastaError::NoRecords);
    }
    Ok(records)
}

fn finish(record: Option<&mut FastaRecord>) -> Result<(), FastaError> {
    let Some(record) = record else {
        return Ok(());
    };
    if record.sequence.ends_with('*') {
        record.sequence.pop();
    }
    if record.sequence.is_empty() {
        return Err(FastaError::EmptySequence {
            id: record.id.clone(),
        });
    }
    Ok(())
}
