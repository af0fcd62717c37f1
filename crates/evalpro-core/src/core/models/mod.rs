//! # Core Models Module
//!
//! This module contains the data structures used to represent parsed biomolecular
//! structures in evalpro.
//!
//! ## Overview
//!
//! A [`Structure`](structure::Structure) is an ordered collection of chains, each chain
//! an ordered collection of residues, each residue an ordered collection of atoms.
//! Order is preserved exactly as read from the source file, because positional chain
//! mapping and residue correspondence both depend on it.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom with coordinates and identity
//! - [`residue`] - Residue (amino acid, nucleotide or hetero group) with its atoms
//! - [`chain`] - Labeled chain with its residues, sequence and trace coordinates
//! - [`structure`] - Complete model with chain lookup helpers
//! - [`builder`] - Incremental construction used by file readers
//!
//! ## Usage
//!
//! ```ignore
//! use evalpro::core::models::builder::StructureBuilder;
//! use nalgebra::Point3;
//!
//! let mut builder = StructureBuilder::new();
//! builder.start_chain('A');
//! builder.start_residue(1, None, "GLY", false);
//! builder.add_atom(1, "CA", "C", Point3::new(0.0, 0.0, 0.0));
//! let structure = builder.build();
//! ```

pub mod atom;
pub mod builder;
pub mod chain;
pub mod residue;
pub mod structure;
