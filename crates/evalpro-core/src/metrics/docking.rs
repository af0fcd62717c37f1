use crate::core::models::structure::Structure;
use crate::core::scoring::ScoringError;
use crate::core::scoring::dockq::{DockQScorer, InterfaceScorer, InterfaceScores};
use crate::engine::cache::StructureCache;
use crate::engine::chain_map::{ChainMap, ChainMapping};
use crate::engine::error::PairError;
use crate::engine::metric::{NamedStatistics, PairMetric};
use crate::engine::stats::Statistics;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// DockQ docking quality of predicted multi-chain structures.
///
/// Pairs are structure file paths. Both files are loaded through a shared
/// [`StructureCache`] and their chains matched with a [`ChainMap`] when the pair is
/// accumulated, so unreadable files and chain-count mismatches are reported before
/// any interface is scored.
pub struct DockingQuality {
    cache: Arc<StructureCache>,
    scorer: Box<dyn InterfaceScorer>,
    chain_mapping: ChainMapping,
}

impl Default for DockingQuality {
    fn default() -> Self {
        Self::new()
    }
}

impl DockingQuality {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(StructureCache::new()),
            scorer: Box::new(DockQScorer::new()),
            chain_mapping: ChainMapping::default(),
        }
    }

    pub fn with_cache(mut self, cache: Arc<StructureCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn InterfaceScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_chain_mapping(mut self, chain_mapping: ChainMapping) -> Self {
        self.chain_mapping = chain_mapping;
        self
    }

    pub fn cache(&self) -> &Arc<StructureCache> {
        &self.cache
    }
}

/// A loaded, chain-mapped docking pair.
pub struct DockingPair {
    pub prediction: Arc<Structure>,
    pub reference: Arc<Structure>,
    pub chain_map: ChainMap,
}

/// DockQ of one prediction: the per-interface scores and their mean, max and min.
#[derive(Debug, Clone, PartialEq)]
pub struct DockingScore {
    pub dockq: Statistics,
    pub detail: InterfaceScores,
}

/// Statistics over the per-pair mean DockQ, plus every pair's interface detail.
#[derive(Debug, Clone, PartialEq)]
pub struct DockingSummary {
    pub dockq: Statistics,
    pub details: Vec<InterfaceScores>,
}

impl NamedStatistics for DockingSummary {
    fn to_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("dockq_avg".to_string(), self.dockq.mean),
            ("dockq_max".to_string(), self.dockq.max),
            ("dockq_min".to_string(), self.dockq.min),
        ])
    }
}

impl PairMetric for DockingQuality {
    type Prediction = PathBuf;
    type Reference = PathBuf;
    type Pair = DockingPair;
    type Score = DockingScore;
    type Summary = DockingSummary;

    fn name(&self) -> &'static str {
        "docking_quality"
    }

    fn validate(&self, prediction: PathBuf, reference: PathBuf) -> Result<DockingPair, PairError> {
        let prediction = self.cache.load(&prediction)?;
        let reference = self.cache.load(&reference)?;
        let chain_map = ChainMap::resolve(&reference, &prediction, self.chain_mapping)?;
        Ok(DockingPair {
            prediction,
            reference,
            chain_map,
        })
    }

    fn score(&self, pair: &DockingPair) -> Result<DockingScore, PairError> {
        let detail = self
            .scorer
            .score(&pair.prediction, &pair.reference, pair.chain_map.pairs())?;
        let values: Vec<f64> = detail.interfaces.values().map(|i| i.dockq).collect();
        let mut dockq = Statistics::from_values(&values).ok_or(ScoringError::NoInterfaces)?;
        dockq.mean = detail.mean().ok_or(ScoringError::NoInterfaces)?;
        Ok(DockingScore { dockq, detail })
    }

    fn reduce(&self, scores: &[DockingScore]) -> DockingSummary {
        let means: Vec<f64> = scores.iter().map(|s| s.dockq.mean).collect();
        DockingSummary {
            dockq: Statistics::from_values(&means).unwrap_or(Statistics {
                mean: f64::NAN,
                max: f64::NAN,
                min: f64::NAN,
            }),
            details: scores.iter().map(|s| s.detail.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::pdb::PdbFile;
    use crate::core::io::traits::MolecularFile;
    use crate::core::models::builder::StructureBuilder;
    use crate::core::scoring::dockq::InterfaceScore;
    use crate::engine::error::{MetricError, ValidationError};
    use crate::engine::metric::MetricModule;
    use nalgebra::{Point3, Vector3};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn complex(chain_ids: &[char], offsets: &[Vector3<f64>]) -> Structure {
        let mut builder = StructureBuilder::new();
        let mut serial = 0;
        for (&id, offset) in chain_ids.iter().zip(offsets) {
            builder.start_chain(id);
            for (i, name) in ["ALA", "GLY", "SER", "LEU", "LYS"].iter().enumerate() {
                let x = i as f64 * 3.8;
                builder.start_residue(i as isize + 1, None, name, false);
                for (atom, element, pos) in [
                    ("N", "N", Vector3::new(x, 0.0, 0.0)),
                    ("CA", "C", Vector3::new(x + 1.2, 0.8, 0.3)),
                    ("C", "C", Vector3::new(x + 2.4, 0.0, 0.6)),
                    ("O", "O", Vector3::new(x + 2.4, -1.2, 0.9)),
                ] {
                    serial += 1;
                    builder.add_atom(serial, atom, element, Point3::from(pos + offset));
                }
            }
        }
        builder.build()
    }

    fn dimer(ligand_shift: Vector3<f64>) -> Structure {
        complex(
            &['A', 'B'],
            &[Vector3::zeros(), Vector3::new(0.0, 4.5, 0.2) + ligand_shift],
        )
    }

    fn write(dir: &Path, name: &str, structure: &Structure) -> PathBuf {
        let path = dir.join(name);
        PdbFile::write_structure_to_path(structure, &path).unwrap();
        path
    }

    /// Counts invocations and reports two interfaces with fixed scores.
    struct CountingScorer {
        calls: Arc<AtomicUsize>,
        values: (f64, f64),
    }

    fn fixed_score(dockq: f64) -> InterfaceScore {
        InterfaceScore {
            dockq,
            fnat: dockq,
            fnonnat: 0.0,
            irmsd: 0.0,
            lrmsd: 0.0,
            native_contacts: 1,
            model_contacts: 1,
            shared_contacts: 1,
        }
    }

    impl InterfaceScorer for CountingScorer {
        fn score(
            &self,
            _prediction: &Structure,
            _reference: &Structure,
            _chain_map: &[(char, char)],
        ) -> Result<InterfaceScores, ScoringError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut scores = InterfaceScores::default();
            scores.interfaces.insert(('A', 'B'), fixed_score(self.values.0));
            scores.interfaces.insert(('A', 'C'), fixed_score(self.values.1));
            scores.total = self.values.0 + self.values.1;
            Ok(scores)
        }
    }

    #[test]
    fn identical_structures_score_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "ref.pdb", &dimer(Vector3::zeros()));

        let mut module = MetricModule::new(DockingQuality::new());
        module.accumulate(path.clone(), path).unwrap();
        let summary = module.compute().unwrap();

        assert!((summary.dockq.mean - 1.0).abs() < 1e-6);
        assert_eq!(summary.details.len(), 1);
        assert!(summary.details[0].interfaces.contains_key(&('A', 'B')));
    }

    #[test]
    fn chain_count_mismatch_fails_before_scoring() {
        let dir = tempfile::tempdir().unwrap();
        let reference = write(dir.path(), "ref.pdb", &dimer(Vector3::zeros()));
        let monomer = write(dir.path(), "pred.pdb", &complex(&['A'], &[Vector3::zeros()]));
        let calls = Arc::new(AtomicUsize::new(0));
        let metric = DockingQuality::new().with_scorer(Box::new(CountingScorer {
            calls: Arc::clone(&calls),
            values: (1.0, 1.0),
        }));

        let mut module = MetricModule::new(metric);
        let err = module.accumulate(monomer, reference).unwrap_err();

        assert!(matches!(
            err,
            MetricError::Pair {
                source: PairError::Validation(ValidationError::ChainCountMismatch {
                    prediction: 1,
                    reference: 2
                }),
                ..
            }
        ));
        assert!(module.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn max_and_min_are_taken_over_per_pair_means() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "ref.pdb", &dimer(Vector3::zeros()));
        let calls = Arc::new(AtomicUsize::new(0));
        let metric = DockingQuality::new().with_scorer(Box::new(CountingScorer {
            calls: Arc::clone(&calls),
            values: (0.2, 0.8),
        }));

        let mut module = MetricModule::new(metric);
        module.accumulate(path.clone(), path.clone()).unwrap();
        module.accumulate(path.clone(), path).unwrap();
        let result = module.compute_detailed().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!((result.summary.dockq.max - 0.5).abs() < 1e-12);
        assert!((result.summary.dockq.min - 0.5).abs() < 1e-12);
        assert!((result.scores[0].dockq.max - 0.8).abs() < 1e-12);
        assert!((result.scores[0].dockq.min - 0.2).abs() < 1e-12);
    }

    #[test]
    fn displaced_prediction_lowers_the_mean() {
        let dir = tempfile::tempdir().unwrap();
        let reference = write(dir.path(), "ref.pdb", &dimer(Vector3::zeros()));
        let good = write(dir.path(), "good.pdb", &dimer(Vector3::zeros()));
        let bad = write(dir.path(), "bad.pdb", &dimer(Vector3::new(0.0, 0.0, 6.0)));

        let mut module = MetricModule::new(DockingQuality::new());
        let summary = module
            .compute_with(vec![good, bad], vec![reference.clone(), reference])
            .unwrap();

        assert!((summary.dockq.max - 1.0).abs() < 1e-6);
        assert!(summary.dockq.min < summary.dockq.max);
        assert!(summary.dockq.mean < 1.0);
        assert_eq!(summary.to_map().len(), 3);
    }

    #[test]
    fn reference_files_are_parsed_once_across_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let reference = write(dir.path(), "ref.pdb", &dimer(Vector3::zeros()));
        let model = write(dir.path(), "model.pdb", &dimer(Vector3::zeros()));
        let cache = Arc::new(StructureCache::new());

        let mut module = MetricModule::new(DockingQuality::new().with_cache(Arc::clone(&cache)));
        module.accumulate(model.clone(), reference.clone()).unwrap();
        module.accumulate(model, reference).unwrap();

        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let mut module = MetricModule::new(DockingQuality::new());
        let err = module
            .accumulate(PathBuf::from("missing-a.pdb"), PathBuf::from("missing-b.pdb"))
            .unwrap_err();
        assert!(matches!(
            err,
            MetricError::Pair {
                source: PairError::Load(_),
                ..
            }
        ));
    }

    #[test]
    fn by_name_mapping_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let reference = write(dir.path(), "ref.pdb", &dimer(Vector3::zeros()));
        let renamed = write(
            dir.path(),
            "renamed.pdb",
            &complex(&['A', 'X'], &[Vector3::zeros(), Vector3::new(0.0, 4.5, 0.2)]),
        );

        let mut module =
            MetricModule::new(DockingQuality::new().with_chain_mapping(ChainMapping::ByName));
        let err = module.accumulate(renamed, reference).unwrap_err();
        assert!(matches!(
            err,
            MetricError::Pair {
                source: PairError::Validation(ValidationError::MissingChain('B')),
                ..
            }
        ));
    }
}
