pub mod alignment;
pub mod geometry;
pub mod residues;
