use super::error::ValidationError;
use crate::core::models::structure::Structure;
use serde::{Deserialize, Serialize};

/// How reference chains are matched to prediction chains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainMapping {
    /// The i-th reference chain maps to the i-th prediction chain, in file order.
    #[default]
    Positional,
    /// Each reference chain maps to the prediction chain with the same identifier.
    ByName,
}

/// A 1:1 correspondence from reference chain identifiers to prediction chain identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainMap {
    pairs: Vec<(char, char)>,
}

impl ChainMap {
    /// Resolves the chain correspondence between two structures.
    ///
    /// Chain counts must match exactly under either strategy; the count check runs
    /// before anything else so that a cardinality mismatch is always reported as such.
    pub fn resolve(
        reference: &Structure,
        prediction: &Structure,
        strategy: ChainMapping,
    ) -> Result<Self, ValidationError> {
        if reference.chain_count() != prediction.chain_count() {
            return Err(ValidationError::ChainCountMismatch {
                prediction: prediction.chain_count(),
                reference: reference.chain_count(),
            });
        }

        let pairs = match strategy {
            ChainMapping::Positional => reference
                .chain_ids()
                .into_iter()
                .zip(prediction.chain_ids())
                .collect(),
            ChainMapping::ByName => reference
                .chain_ids()
                .into_iter()
                .map(|id| match prediction.chain(id) {
                    Some(_) => Ok((id, id)),
                    None => Err(ValidationError::MissingChain(id)),
                })
                .collect::<Result<_, _>>()?,
        };
        Ok(Self { pairs })
    }

    /// `(reference, prediction)` chain identifier pairs in reference chain order.
    pub fn pairs(&self) -> &[(char, char)] {
        &self.pairs
    }

    pub fn prediction_chain(&self, reference: char) -> Option<char> {
        self.pairs
            .iter()
            .find(|(r, _)| *r == reference)
            .map(|&(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::StructureBuilder;
    use nalgebra::Point3;

    fn structure(chain_ids: &[char]) -> Structure {
        let mut builder = StructureBuilder::new();
        for (i, &id) in chain_ids.iter().enumerate() {
            builder.start_chain(id);
            builder.start_residue(1, None, "ALA", false);
            builder.add_atom(i + 1, "CA", "C", Point3::origin());
        }
        builder.build()
    }

    #[test]
    fn positional_mapping_pairs_chains_in_file_order() {
        let map = ChainMap::resolve(
            &structure(&['A', 'B']),
            &structure(&['H', 'L']),
            ChainMapping::Positional,
        )
        .unwrap();
        assert_eq!(map.pairs(), &[('A', 'H'), ('B', 'L')]);
        assert_eq!(map.prediction_chain('B'), Some('L'));
        assert_eq!(map.prediction_chain('Z'), None);
    }

    #[test]
    fn positional_mapping_follows_order_not_names() {
        let map = ChainMap::resolve(
            &structure(&['A', 'B']),
            &structure(&['B', 'A']),
            ChainMapping::Positional,
        )
        .unwrap();
        assert_eq!(map.pairs(), &[('A', 'B'), ('B', 'A')]);
    }

    #[test]
    fn by_name_mapping_matches_identifiers() {
        let map = ChainMap::resolve(
            &structure(&['A', 'B']),
            &structure(&['B', 'A']),
            ChainMapping::ByName,
        )
        .unwrap();
        assert_eq!(map.pairs(), &[('A', 'A'), ('B', 'B')]);
    }

    #[test]
    fn by_name_mapping_reports_missing_chain() {
        let result = ChainMap::resolve(
            &structure(&['A', 'B']),
            &structure(&['A', 'C']),
            ChainMapping::ByName,
        );
        assert_eq!(result, Err(ValidationError::MissingChain('B')));
    }

    #[test]
    fn chain_count_mismatch_names_both_counts() {
        let result = ChainMap::resolve(
            &structure(&['A', 'B', 'C']),
            &structure(&['A', 'B']),
            ChainMapping::ByName,
        );
        assert_eq!(
            result,
            Err(ValidationError::ChainCountMismatch {
                prediction: 2,
                reference: 3
            })
        );
    }
}
