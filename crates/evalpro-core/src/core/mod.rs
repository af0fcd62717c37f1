//! # Core Module
//!
//! This module provides the structural building blocks that every metric and
//! predictor in evalpro works with.
//!
//! ## Overview
//!
//! The core module contains no evaluation state. It describes what a structure is,
//! how it is read from and written to disk, and how two structures or sequences are
//! compared geometrically. The engine layer composes these pieces into metrics.
//!
//! ## Architecture
//!
//! - **Structure Representation** ([`models`]) - Atoms, residues, chains and whole structures
//! - **File I/O** ([`io`]) - Reading and writing PDB coordinate files
//! - **Utilities** ([`utils`]) - Residue code tables, superposition and sequence alignment
//! - **Scoring** ([`scoring`]) - Structural alignment (TM-score) and interface scoring (DockQ)
//!
//! ## Scientific Foundation
//!
//! - **Kabsch superposition** for optimal rigid-body alignment of coordinate sets
//! - **TM-score** (Zhang and Skolnick, 2004) for length-normalized fold similarity
//! - **DockQ** (Basu and Wallner, 2016) for per-interface docking quality
//! - **Needleman-Wunsch** global alignment for residue correspondence

pub mod io;
pub mod models;
pub mod scoring;
pub mod utils;
