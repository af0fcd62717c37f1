use super::ScoringError;
use crate::core::models::chain::Chain;
use crate::core::models::residue::Residue;
use crate::core::models::structure::Structure;
use crate::core::utils::alignment::residue_correspondence;
use crate::core::utils::geometry::{calculate_rmsd, superpose};
use itertools::Itertools;
use nalgebra::Point3;
use std::collections::{BTreeMap, HashMap, HashSet};

const CONTACT_CUTOFF: f64 = 5.0;
const INTERFACE_CUTOFF: f64 = 10.0;
const IRMSD_SCALE: f64 = 1.5;
const LRMSD_SCALE: f64 = 8.5;

/// Docking quality of a single native interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterfaceScore {
    pub dockq: f64,
    pub fnat: f64,
    pub fnonnat: f64,
    pub irmsd: f64,
    pub lrmsd: f64,
    pub native_contacts: usize,
    pub model_contacts: usize,
    pub shared_contacts: usize,
}

/// Per-interface scores of one model, keyed by reference chain pair, plus their sum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceScores {
    pub interfaces: BTreeMap<(char, char), InterfaceScore>,
    pub total: f64,
}

impl InterfaceScores {
    /// Mean DockQ over the interfaces, or `None` when there are none.
    pub fn mean(&self) -> Option<f64> {
        if self.interfaces.is_empty() {
            None
        } else {
            Some(self.total / self.interfaces.len() as f64)
        }
    }
}

/// A routine scoring every native interface of a multi-chain model.
///
/// `chain_map` lists `(reference_chain, prediction_chain)` pairs; interfaces are
/// reported under the reference chain identifiers.
pub trait InterfaceScorer: Send + Sync {
    fn score(
        &self,
        prediction: &Structure,
        reference: &Structure,
        chain_map: &[(char, char)],
    ) -> Result<InterfaceScores, ScoringError>;
}

/// DockQ interface scorer.
///
/// A native interface is a pair of reference chains with at least one heavy-atom
/// contact under 5 Å. For each one the model is judged on the fraction of native
/// residue contacts it reproduces (fnat), the backbone RMSD of the interface
/// residues (iRMSD) and the backbone RMSD of the smaller chain after superposing
/// on the larger one (LRMSD).
#[derive(Debug, Clone, Copy, Default)]
pub struct DockQScorer;

impl DockQScorer {
    pub fn new() -> Self {
        Self
    }
}

pub fn dockq_formula(fnat: f64, irmsd: f64, lrmsd: f64) -> f64 {
    let irmsd_score = 1.0 / (1.0 + (irmsd / IRMSD_SCALE).powi(2));
    let lrmsd_score = 1.0 / (1.0 + (lrmsd / LRMSD_SCALE).powi(2));
    (fnat + irmsd_score + lrmsd_score) / 3.0
}

/// Polymer residues of a reference chain paired with the matching prediction residues.
struct MatchedChain<'a> {
    reference: Vec<&'a Residue>,
    prediction: Vec<&'a Residue>,
    // reference index -> prediction index
    forward: HashMap<usize, usize>,
    // prediction index -> reference index
    backward: HashMap<usize, usize>,
}

impl<'a> MatchedChain<'a> {
    fn new(reference: &'a Chain, prediction: &'a Chain) -> Self {
        let reference = trace_residues(reference);
        let prediction = trace_residues(prediction);
        let pairs = residue_correspondence(&sequence_of(&reference), &sequence_of(&prediction));
        Self {
            reference,
            prediction,
            forward: pairs.iter().copied().collect(),
            backward: pairs.iter().map(|&(r, p)| (p, r)).collect(),
        }
    }

    /// Backbone atom pairs `(prediction, reference)` for the given reference residues.
    fn backbone_pairs(
        &self,
        residues: impl IntoIterator<Item = usize>,
    ) -> (Vec<Point3<f64>>, Vec<Point3<f64>>) {
        let mut mobile = Vec::new();
        let mut target = Vec::new();
        for ref_idx in residues {
            let Some(&pred_idx) = self.forward.get(&ref_idx) else {
                continue;
            };
            let predicted = self.prediction[pred_idx];
            for atom in self.reference[ref_idx].backbone_atoms() {
                if let Some(model_atom) = predicted.atom(&atom.name) {
                    mobile.push(model_atom.position);
                    target.push(atom.position);
                }
            }
        }
        (mobile, target)
    }
}

fn trace_residues(chain: &Chain) -> Vec<&Residue> {
    chain
        .polymer_residues()
        .filter(|residue| residue.representative_atom().is_some())
        .collect()
}

fn sequence_of(residues: &[&Residue]) -> String {
    residues.iter().map(|residue| residue.one_letter_code()).collect()
}

fn residue_pairs_within(
    first: &[&Residue],
    second: &[&Residue],
    cutoff: f64,
) -> HashSet<(usize, usize)> {
    let mut pairs = HashSet::new();
    for (i, a) in first.iter().enumerate() {
        for (j, b) in second.iter().enumerate() {
            if a.min_heavy_distance(b).is_some_and(|d| d < cutoff) {
                pairs.insert((i, j));
            }
        }
    }
    pairs
}

fn lookup<'a>(structure: &'a Structure, id: char, side: &'static str) -> Result<&'a Chain, ScoringError> {
    structure
        .chain(id)
        .ok_or(ScoringError::MissingChain { chain: id, side })
}

impl DockQScorer {
    fn score_interface(
        &self,
        first: &MatchedChain,
        second: &MatchedChain,
        native: &HashSet<(usize, usize)>,
        ids: (char, char),
    ) -> Result<InterfaceScore, ScoringError> {
        let model_contacts: HashSet<(usize, usize)> =
            residue_pairs_within(&first.prediction, &second.prediction, CONTACT_CUTOFF)
                .into_iter()
                .filter_map(|(i, j)| Some((*first.backward.get(&i)?, *second.backward.get(&j)?)))
                .collect();
        let shared = model_contacts.intersection(native).count();
        let fnat = shared as f64 / native.len() as f64;
        let fnonnat = if model_contacts.is_empty() {
            0.0
        } else {
            (model_contacts.len() - shared) as f64 / model_contacts.len() as f64
        };

        let interface = residue_pairs_within(&first.reference, &second.reference, INTERFACE_CUTOFF);
        let first_interface: Vec<usize> = interface.iter().map(|&(i, _)| i).sorted().dedup().collect();
        let second_interface: Vec<usize> = interface.iter().map(|&(_, j)| j).sorted().dedup().collect();
        let (mut mobile, mut target) = first.backbone_pairs(first_interface);
        let (second_mobile, second_target) = second.backbone_pairs(second_interface);
        mobile.extend(second_mobile);
        target.extend(second_target);
        let irmsd = superposed_rmsd_or_empty(&mobile, &target, ids)?;

        let (receptor, ligand) = if first.reference.len() >= second.reference.len() {
            (first, second)
        } else {
            (second, first)
        };
        let (receptor_mobile, receptor_target) = receptor.backbone_pairs(0..receptor.reference.len());
        let (ligand_mobile, ligand_target) = ligand.backbone_pairs(0..ligand.reference.len());
        if receptor_mobile.is_empty() || ligand_mobile.is_empty() {
            return Err(ScoringError::EmptyAtomSelection {
                first: ids.0,
                second: ids.1,
            });
        }
        let transform =
            superpose(&receptor_mobile, &receptor_target).ok_or(ScoringError::SuperpositionFailed)?;
        let lrmsd = calculate_rmsd(&transform.apply_all(&ligand_mobile), &ligand_target)
            .ok_or(ScoringError::SuperpositionFailed)?;

        Ok(InterfaceScore {
            dockq: dockq_formula(fnat, irmsd, lrmsd),
            fnat,
            fnonnat,
            irmsd,
            lrmsd,
            native_contacts: native.len(),
            model_contacts: model_contacts.len(),
            shared_contacts: shared,
        })
    }
}

fn superposed_rmsd_or_empty(
    mobile: &[Point3<f64>],
    target: &[Point3<f64>],
    ids: (char, char),
) -> Result<f64, ScoringError> {
    if mobile.is_empty() {
        return Err(ScoringError::EmptyAtomSelection {
            first: ids.0,
            second: ids.1,
        });
    }
    let transform = superpose(mobile, target).ok_or(ScoringError::SuperpositionFailed)?;
    calculate_rmsd(&transform.apply_all(mobile), target).ok_or(ScoringError::SuperpositionFailed)
}

impl InterfaceScorer for DockQScorer {
    fn score(
        &self,
        prediction: &Structure,
        reference: &Structure,
        chain_map: &[(char, char)],
    ) -> Result<InterfaceScores, ScoringError> {
        let matched: Vec<(char, MatchedChain)> = chain_map
            .iter()
            .map(|&(ref_id, pred_id)| {
                let ref_chain = lookup(reference, ref_id, "reference")?;
                let pred_chain = lookup(prediction, pred_id, "prediction")?;
                Ok((ref_id, MatchedChain::new(ref_chain, pred_chain)))
            })
            .collect::<Result<_, ScoringError>>()?;

        let mut scores = InterfaceScores::default();
        for ((first_id, first), (second_id, second)) in matched.iter().tuple_combinations() {
            let native = residue_pairs_within(&first.reference, &second.reference, CONTACT_CUTOFF);
            if native.is_empty() {
                continue;
            }
            let score = self.score_interface(first, second, &native, (*first_id, *second_id))?;
            scores.total += score.dockq;
            scores.interfaces.insert((*first_id, *second_id), score);
        }

        if scores.interfaces.is_empty() {
            return Err(ScoringError::NoInterfaces);
        }
        Ok(scores)
    }
}
