use super::atom::Atom;
use crate::core::utils::residues;

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub number: isize,                 // Residue sequence number from source file
    pub insertion_code: Option<char>,  // PDB insertion code, if any
    pub name: String,                  // Residue name (e.g., "ALA", "DG", "HOH")
    pub hetero: bool,                  // Whether the residue came from HETATM records
    pub(crate) atoms: Vec<Atom>,       // Atoms in file order
}

impl Residue {
    pub(crate) fn new(number: isize, insertion_code: Option<char>, name: &str, hetero: bool) -> Self {
        Self {
            number,
            insertion_code,
            name: name.to_string(),
            hetero,
            atoms: Vec::new(),
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|atom| atom.name == name)
    }

    pub fn heavy_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter().filter(|atom| atom.is_heavy())
    }

    pub fn backbone_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms
            .iter()
            .filter(|atom| residues::is_backbone_atom(&atom.name))
    }

    pub fn one_letter_code(&self) -> char {
        residues::one_letter_code(&self.name)
    }

    pub fn is_water(&self) -> bool {
        residues::is_water(&self.name)
    }

    pub fn is_polymer(&self) -> bool {
        residues::amino_acid_code(&self.name).is_some()
            || residues::nucleotide_code(&self.name).is_some()
    }

    /// The atom that stands in for the whole residue in a coordinate trace.
    ///
    /// CA for amino acids, C4' (falling back to P) for nucleotides, and the first
    /// atom for anything else.
    pub fn representative_atom(&self) -> Option<&Atom> {
        if residues::amino_acid_code(&self.name).is_some() {
            return self.atom("CA");
        }
        if residues::nucleotide_code(&self.name).is_some() {
            return self.atom("C4'").or_else(|| self.atom("P"));
        }
        self.atoms.first()
    }

    /// Minimum heavy-atom distance between two residues, or `None` if either has no heavy atoms.
    pub fn min_heavy_distance(&self, other: &Residue) -> Option<f64> {
        self.heavy_atoms()
            .flat_map(|a| other.heavy_atoms().map(move |b| a.distance_to(b)))
            .min_by(|a, b| a.total_cmp(b))
    }
}
