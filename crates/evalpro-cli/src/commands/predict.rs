use crate::cli::PredictArgs;
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use crate::utils::fasta;
use crate::utils::progress::CliProgressHandler;
use evalpro::engine::driver::{BatchReport, Sample};
use evalpro::engine::progress::ProgressReporter;
use evalpro::workflows::predict::{self, CommandOptions, CommandPredictor};
use tracing::{info, warn};

pub fn run(args: PredictArgs) -> Result<()> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_predict(&args)?;

    info!("Reading samples from {:?}", &args.fasta);
    let records = fasta::read_fasta(&args.fasta).map_err(|e| CliError::FileParsing {
        path: args.fasta.clone(),
        source: e.into(),
    })?;
    let samples: Vec<Sample<String>> = records
        .into_iter()
        .map(|record| Sample::new(record.id, record.sequence))
        .collect();

    let predictor = CommandPredictor::new(settings.program, settings.args);
    let options = CommandOptions {
        extra_args: Vec::new(),
        env: settings.env,
    };

    let progress_handler = CliProgressHandler::new();
    let reporter = if args.progress {
        ProgressReporter::with_callback(progress_handler.get_callback())
    } else {
        ProgressReporter::new()
    };

    println!(
        "Predicting {} sample(s) with '{}' ({} job(s))...",
        samples.len(),
        predictor.program(),
        settings.driver.n_jobs
    );
    let report = predict::run(
        &predictor,
        &samples,
        &args.output_dir,
        &options,
        &settings.driver,
        &reporter,
    )?;

    summarize(&report)
}

fn summarize(report: &BatchReport) -> Result<()> {
    println!(
        "Completed: {}  Failed: {}",
        report.completed.len(),
        report.failed.len()
    );
    for failure in &report.failed {
        warn!(sample = %failure.sample_id, "Prediction failed: {}", failure.error);
        eprintln!("  ✗ {}: {}", failure.sample_id, failure.error);
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::BatchFailed {
            failed: report.failed.len(),
            total: report.total(),
        })
    }
}
