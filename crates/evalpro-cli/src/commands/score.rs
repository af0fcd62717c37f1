use crate::cli::{ScoreArgs, ScoreMetric};
use crate::config::{PartialConfig, ScoreSettings};
use crate::error::{CliError, Result};
use crate::report::{self, DockingRow, RecoveryRow, SimilarityRow};
use crate::utils::pairs::{self, PairRecord};
use evalpro::engine::cache::StructureCache;
use evalpro::engine::metric::{MetricModule, NamedStatistics};
use evalpro::metrics::docking::DockingQuality;
use evalpro::metrics::recovery::SequenceRecovery;
use evalpro::metrics::similarity::{AlignedSimilarity, SimilarityInput};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: ScoreArgs) -> Result<()> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    let settings = partial_config.merge_score(&args);

    info!("Reading pairs from {:?}", &args.pairs);
    let records = pairs::read_pairs(&args.pairs).map_err(|e| CliError::FileParsing {
        path: args.pairs.clone(),
        source: e.into(),
    })?;

    let statistics = score(args.metric, &args.pairs, &records, &settings, args.report.as_deref())?;

    println!("Scored {} pair(s):", records.len());
    for (name, value) in &statistics {
        println!("  {:<20} {:.4}", name, value);
    }
    if let Some(path) = &args.report {
        println!("Per-pair report written to: {}", path.display());
    }
    Ok(())
}

/// Scores every record with `metric`, writing a per-pair report if requested.
fn score(
    metric: ScoreMetric,
    pairs_file: &Path,
    records: &[PairRecord],
    settings: &ScoreSettings,
    report: Option<&Path>,
) -> Result<BTreeMap<String, f64>> {
    match metric {
        ScoreMetric::Recovery => score_recovery(records, report),
        ScoreMetric::TmScore => score_similarity(pairs_file, records, report),
        ScoreMetric::Dockq => score_docking(pairs_file, records, settings, report),
    }
}

fn score_recovery(records: &[PairRecord], report: Option<&Path>) -> Result<BTreeMap<String, f64>> {
    let mut module = MetricModule::new(SequenceRecovery);
    module.accumulate_batch(
        records.iter().map(|r| r.prediction.clone()).collect(),
        records.iter().map(|r| r.reference.clone()).collect(),
    )?;
    let result = module.compute_detailed()?;

    if let Some(path) = report {
        let rows: Vec<RecoveryRow> = records
            .iter()
            .zip(&result.scores)
            .enumerate()
            .map(|(index, (record, &rate))| RecoveryRow {
                index,
                prediction: &record.prediction,
                reference: &record.reference,
                seq_recovery_rate: rate,
            })
            .collect();
        report::write_report(path, &rows)?;
    }
    Ok(result.summary.to_map())
}

fn score_similarity(
    pairs_file: &Path,
    records: &[PairRecord],
    report: Option<&Path>,
) -> Result<BTreeMap<String, f64>> {
    let cache = StructureCache::new();
    let mut predictions = Vec::with_capacity(records.len());
    let mut references = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let load = |entry: &String| {
            first_chain_trace(&cache, &pairs::resolve(pairs_file, entry)).map_err(|e| {
                CliError::PairInput {
                    index,
                    source: Box::new(e),
                }
            })
        };
        predictions.push(load(&record.prediction)?);
        references.push(load(&record.reference)?);
    }

    let mut module = MetricModule::new(AlignedSimilarity::new());
    module.accumulate_batch(predictions, references)?;
    let result = module.compute_detailed()?;

    if let Some(path) = report {
        let rows: Vec<SimilarityRow> = records
            .iter()
            .zip(&result.scores)
            .enumerate()
            .map(|(index, (record, score))| SimilarityRow {
                index,
                prediction: &record.prediction,
                reference: &record.reference,
                rmsd: score.rmsd,
                tm_score: score.tm_score,
                aligned_length: score.aligned_length,
            })
            .collect();
        report::write_report(path, &rows)?;
    }
    Ok(result.summary.to_map())
}

fn first_chain_trace(cache: &StructureCache, path: &Path) -> Result<SimilarityInput> {
    let structure = cache.load(path)?;
    let chain = structure.chains().first().ok_or_else(|| CliError::FileParsing {
        path: path.to_path_buf(),
        source: anyhow::anyhow!("structure contains no chains"),
    })?;
    Ok(SimilarityInput::from_chain(chain))
}

fn score_docking(
    pairs_file: &Path,
    records: &[PairRecord],
    settings: &ScoreSettings,
    report: Option<&Path>,
) -> Result<BTreeMap<String, f64>> {
    let resolve = |entry: &String| -> PathBuf { pairs::resolve(pairs_file, entry) };

    let mut module =
        MetricModule::new(DockingQuality::new().with_chain_mapping(settings.chain_mapping));
    module.accumulate_batch(
        records.iter().map(|r| resolve(&r.prediction)).collect(),
        records.iter().map(|r| resolve(&r.reference)).collect(),
    )?;
    let result = module.compute_detailed()?;

    if let Some(path) = report {
        let rows: Vec<DockingRow> = records
            .iter()
            .zip(&result.scores)
            .enumerate()
            .map(|(index, (record, score))| DockingRow {
                index,
                prediction: &record.prediction,
                reference: &record.reference,
                dockq_avg: score.dockq.mean,
                dockq_max: score.dockq.max,
                dockq_min: score.dockq.min,
                interfaces: score.detail.interfaces.len(),
            })
            .collect();
        report::write_report(path, &rows)?;
    }
    Ok(result.summary.to_map())
}
