use phf::{Map, Set, phf_map, phf_set};

static AMINO_ACID_CODES: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    // Protonation-state and force-field variants
    "HSE" => 'H', "HSD" => 'H', "HSP" => 'H', "HIE" => 'H', "HID" => 'H', "HIP" => 'H',
    "CYX" => 'C', "CYM" => 'C', "ASH" => 'D', "GLH" => 'E', "LYN" => 'K',
    // Common modified residues
    "MSE" => 'M', "SEC" => 'U', "PYL" => 'O', "SEP" => 'S', "TPO" => 'T', "PTR" => 'Y',
};

static NUCLEOTIDE_CODES: Map<&'static str, char> = phf_map! {
    "DA" => 'A', "DC" => 'C', "DG" => 'G', "DT" => 'T', "DU" => 'U',
    "A" => 'A', "C" => 'C', "G" => 'G', "U" => 'U', "T" => 'T',
};

static WATER_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "H2O", "DOD", "TIP", "TIP3", "SOL",
};

static BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    "N", "CA", "C", "O",
    "P", "OP1", "OP2", "O5'", "C5'", "C4'", "C3'", "O3'",
};

pub fn amino_acid_code(residue_name: &str) -> Option<char> {
    AMINO_ACID_CODES.get(residue_name.trim()).copied()
}

pub fn nucleotide_code(residue_name: &str) -> Option<char> {
    NUCLEOTIDE_CODES.get(residue_name.trim()).copied()
}

/// Maps a residue name to its one-letter code, or `'X'` when the name is unknown.
pub fn one_letter_code(residue_name: &str) -> char {
    amino_acid_code(residue_name)
        .or_else(|| nucleotide_code(residue_name))
        .unwrap_or('X')
}

pub fn is_water(residue_name: &str) -> bool {
    WATER_NAMES.contains(residue_name.trim())
}

/// Backbone atoms used for interface and ligand RMSD (protein and nucleic acid).
pub fn is_backbone_atom(atom_name: &str) -> bool {
    BACKBONE_ATOM_NAMES.contains(atom_name.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_letter_code_maps_standard_amino_acids() {
        assert_eq!(one_letter_code("ALA"), 'A');
        assert_eq!(one_letter_code("TRP"), 'W');
        assert_eq!(one_letter_code("GLN"), 'Q');
    }

    #[test]
    fn one_letter_code_maps_variants_and_modified_residues() {
        assert_eq!(one_letter_code("HSE"), 'H');
        assert_eq!(one_letter_code("MSE"), 'M');
        assert_eq!(one_letter_code("SEC"), 'U');
    }

    #[test]
    fn one_letter_code_maps_nucleotides() {
        assert_eq!(one_letter_code("DA"), 'A');
        assert_eq!(one_letter_code("U"), 'U');
    }

    #[test]
    fn one_letter_code_returns_x_for_unknown_names() {
        assert_eq!(one_letter_code("LIG"), 'X');
        assert_eq!(one_letter_code(""), 'X');
    }

    #[test]
    fn lookups_trim_whitespace_and_are_case_sensitive() {
        assert_eq!(amino_acid_code(" GLY "), Some('G'));
        assert_eq!(amino_acid_code("gly"), None);
        assert!(is_water(" HOH"));
        assert!(is_backbone_atom(" CA "));
    }

    #[test]
    fn is_backbone_atom_rejects_sidechain_atoms() {
        assert!(!is_backbone_atom("CB"));
        assert!(!is_backbone_atom("SG"));
        assert!(!is_backbone_atom(""));
    }
}
