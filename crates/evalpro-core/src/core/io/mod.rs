//! Provides input/output functionality for structure file formats.
//!
//! This module contains the reader and writer for PDB coordinate files, the format
//! predicted and reference structures are exchanged in. A trait-based interface keeps
//! the door open for additional formats without touching the metrics.

pub mod pdb;
pub mod traits;
