use super::atom::Atom;
use super::chain::Chain;
use super::residue::Residue;
use super::structure::Structure;
use nalgebra::Point3;
use std::collections::HashMap;

/// Incrementally assembles a [`Structure`] from a stream of records.
///
/// Re-starting a chain that was already seen continues that chain rather than
/// creating a duplicate, so chains split by other records in a file still end up
/// as a single chain at their first-seen position. Adding an atom before a chain
/// and residue have been started opens an implicit chain `'A'` and residue `0`.
pub struct StructureBuilder {
    structure: Structure,

    // --- Builder-specific state for efficient construction ---
    chain_index_map: HashMap<char, usize>,
    current_chain_idx: Option<usize>,
    current_residue_idx: Option<usize>,
}

impl Default for StructureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self {
            structure: Structure::new(),
            chain_index_map: HashMap::new(),
            current_chain_idx: None,
            current_residue_idx: None,
        }
    }

    pub fn start_chain(&mut self, id: char) -> &mut Self {
        let idx = self.chain_index(id);
        self.current_chain_idx = Some(idx);
        self.current_residue_idx = None;
        self
    }

    pub fn start_residue(
        &mut self,
        number: isize,
        insertion_code: Option<char>,
        name: &str,
        hetero: bool,
    ) -> &mut Self {
        let chain_idx = self.ensure_chain();
        let res_idx = self.open_residue(chain_idx, Residue::new(number, insertion_code, name, hetero));
        self.current_residue_idx = Some(res_idx);
        self
    }

    pub fn add_atom(
        &mut self,
        serial: usize,
        name: &str,
        element: &str,
        position: Point3<f64>,
    ) -> &mut Self {
        self.push_atom(Atom::new(serial, name, element, position))
    }

    pub fn push_atom(&mut self, atom: Atom) -> &mut Self {
        let chain_idx = self.ensure_chain();
        let res_idx = match self.current_residue_idx {
            Some(idx) => idx,
            None => {
                let idx = self.open_residue(chain_idx, Residue::new(0, None, "UNK", false));
                self.current_residue_idx = Some(idx);
                idx
            }
        };
        self.structure.chains[chain_idx].residues[res_idx]
            .atoms
            .push(atom);
        self
    }

    pub fn build(self) -> Structure {
        self.structure
    }

    fn ensure_chain(&mut self) -> usize {
        if let Some(idx) = self.current_chain_idx {
            return idx;
        }
        let idx = self.chain_index('A');
        self.current_chain_idx = Some(idx);
        idx
    }

    fn chain_index(&mut self, id: char) -> usize {
        *self.chain_index_map.entry(id).or_insert_with(|| {
            let index = self.structure.chains.len();
            self.structure.chains.push(Chain::new(id));
            index
        })
    }

    fn open_residue(&mut self, chain_idx: usize, residue: Residue) -> usize {
        let residues = &mut self.structure.chains[chain_idx].residues;
        residues.push(residue);
        residues.len() - 1
    }
}
