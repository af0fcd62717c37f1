use nalgebra::Point3;

/// A single atom of a parsed structure.
///
/// Atoms carry only the information the metrics need: identity, element and
/// position. Occupancy and B-factor are kept so that structures survive a
/// read/write cycle without losing columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The serial number from the source file.
    pub serial: usize,
    /// The atom name (e.g., "CA", "N", "O5'").
    pub name: String,
    /// The element symbol, possibly empty if the source file omitted it.
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The crystallographic occupancy.
    pub occupancy: f64,
    /// The temperature factor (or per-residue confidence for predicted models).
    pub b_factor: f64,
}

impl Atom {
    /// Creates a new `Atom` with full occupancy and a zero B-factor.
    ///
    /// # Arguments
    ///
    /// * `serial` - The serial number of the atom.
    /// * `name` - The name of the atom.
    /// * `element` - The element symbol.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(serial: usize, name: &str, element: &str, position: Point3<f64>) -> Self {
        Self {
            serial,
            name: name.to_string(),
            element: element.to_string(),
            position,
            occupancy: 1.0,
            b_factor: 0.0,
        }
    }

    /// Returns `true` unless the atom is a hydrogen or deuterium.
    ///
    /// The element column is used when present; otherwise the first letter of the
    /// atom name decides.
    pub fn is_heavy(&self) -> bool {
        let element = self.element.trim();
        if !element.is_empty() {
            return !element.eq_ignore_ascii_case("H") && !element.eq_ignore_ascii_case("D");
        }
        !matches!(
            self.name.trim().chars().next().map(|c| c.to_ascii_uppercase()),
            Some('H') | Some('D')
        )
    }

    pub fn distance_to(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }
}
