use super::atom::Atom;
use super::chain::Chain;
use super::residue::Residue;

/// A parsed structural model: an ordered collection of named chains.
///
/// Chain order is the order of first appearance in the source file. Positional
/// chain mapping between a prediction and its reference relies on this order, so
/// it is never sorted or otherwise rearranged after parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    /// Chains in order of first appearance.
    pub(crate) chains: Vec<Chain>,
}

impl Structure {
    /// Creates a new, empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the chains in file order.
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// Retrieves a chain by its identifier.
    ///
    /// # Arguments
    ///
    /// * `id` - The single-character chain identifier.
    ///
    /// # Return
    ///
    /// Returns `Some(&Chain)` if the chain exists, otherwise `None`.
    pub fn chain(&self, id: char) -> Option<&Chain> {
        self.chains.iter().find(|chain| chain.id == id)
    }

    /// Returns the chain identifiers in file order.
    pub fn chain_ids(&self) -> Vec<char> {
        self.chains.iter().map(|chain| chain.id).collect()
    }

    /// Returns the number of chains.
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Returns an iterator over every residue of every chain.
    pub fn residues(&self) -> impl Iterator<Item = &Residue> {
        self.chains.iter().flat_map(|chain| chain.residues.iter())
    }

    /// Returns an iterator over every atom, in file order.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.residues().flat_map(|residue| residue.atoms.iter())
    }

    /// Returns the total number of atoms.
    pub fn atom_count(&self) -> usize {
        self.atoms().count()
    }

    /// Returns `true` if the structure contains no atoms.
    pub fn is_empty(&self) -> bool {
        self.atoms().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::StructureBuilder;
    use nalgebra::Point3;

    fn two_chain_structure() -> Structure {
        let mut builder = StructureBuilder::new();
        builder.start_chain('B');
        builder.start_residue(1, None, "ALA", false);
        builder.add_atom(1, "CA", "C", Point3::origin());
        builder.start_chain('A');
        builder.start_residue(1, None, "GLY", false);
        builder.add_atom(2, "N", "N", Point3::origin());
        builder.add_atom(3, "CA", "C", Point3::origin());
        builder.build()
    }

    #[test]
    fn new_structure_is_empty() {
        let structure = Structure::new();
        assert!(structure.is_empty());
        assert_eq!(structure.chain_count(), 0);
    }

    #[test]
    fn chain_ids_preserve_file_order() {
        let structure = two_chain_structure();
        assert_eq!(structure.chain_ids(), vec!['B', 'A']);
    }

    #[test]
    fn chain_lookup_by_id_works() {
        let structure = two_chain_structure();
        assert_eq!(structure.chain('A').unwrap().residues().len(), 1);
        assert!(structure.chain('Z').is_none());
    }

    #[test]
    fn atoms_iterates_all_chains_in_order() {
        let structure = two_chain_structure();
        let serials: Vec<usize> = structure.atoms().map(|a| a.serial).collect();
        assert_eq!(serials, vec![1, 2, 3]);
        assert_eq!(structure.atom_count(), 3);
    }
}
