use super::residue::Residue;
use nalgebra::Point3;

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: char,                     // Chain identifier (e.g., 'A', 'B')
    pub(crate) residues: Vec<Residue>, // Residues in file order
}

impl Chain {
    pub(crate) fn new(id: char) -> Self {
        Self {
            id,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    /// Residues that form the polymer trace (waters and unnamed hetero groups excluded).
    pub fn polymer_residues(&self) -> impl Iterator<Item = &Residue> {
        self.residues
            .iter()
            .filter(|residue| residue.is_polymer() || (!residue.hetero && !residue.is_water()))
    }

    /// One-letter sequence of the polymer residues that have a representative atom.
    ///
    /// The sequence and [`Chain::trace_coords`] always have the same length, so the
    /// pair can be handed directly to a structural aligner.
    pub fn sequence(&self) -> String {
        self.polymer_residues()
            .filter(|residue| residue.representative_atom().is_some())
            .map(Residue::one_letter_code)
            .collect()
    }

    /// Coordinates of each polymer residue's representative atom (CA for proteins).
    pub fn trace_coords(&self) -> Vec<Point3<f64>> {
        self.polymer_residues()
            .filter_map(|residue| residue.representative_atom())
            .map(|atom| atom.position)
            .collect()
    }
}
