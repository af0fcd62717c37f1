use super::config::{ConfigError, DriverConfig, FailurePolicy};
use super::error::DriverError;
use super::progress::{Progress, ProgressReporter};
use rayon::ThreadPoolBuilder;
use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use tracing::{info, instrument, warn};

/// A single-sample prediction operation that writes its result to a file.
pub trait Predictor: Sync {
    type Input: Sync;
    /// Pass-through options forwarded unchanged to every call.
    type Options: Sync;
    type Error: Error + Send + Sync + 'static;

    fn name(&self) -> &str;

    fn predict(
        &self,
        input: &Self::Input,
        output_path: &Path,
        options: &Self::Options,
    ) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample<I> {
    pub id: String,
    pub input: I,
}

impl<I> Sample<I> {
    pub fn new(id: impl Into<String>, input: I) -> Self {
        Self {
            id: id.into(),
            input,
        }
    }
}

#[derive(Debug)]
pub struct SampleFailure {
    pub sample_id: String,
    pub error: Box<dyn Error + Send + Sync>,
}

/// Outcome of a batch run.
///
/// Ids appear in completion order, which in parallel mode differs from run to run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub completed: Vec<String>,
    pub failed: Vec<SampleFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len()
    }
}

/// Runs a [`Predictor`] once per sample, writing `<output_dir>/<sample_id>.<extension>`.
///
/// With `n_jobs == 1` samples run in order on the calling thread and the first
/// failure ends the batch. With `n_jobs > 1` samples run on a pool of `n_jobs`
/// worker threads and results are consumed as they complete; a failure is handled
/// according to the configured [`FailurePolicy`].
pub struct BatchPredictionDriver {
    config: DriverConfig,
}

enum Outcome<E> {
    Finished(Result<(), E>),
    Skipped,
}

impl BatchPredictionDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn output_path(&self, output_dir: &Path, sample_id: &str) -> PathBuf {
        output_dir.join(format!("{}.{}", sample_id, self.config.extension))
    }

    #[instrument(skip_all, name = "batch_prediction", fields(predictor = predictor.name(), samples = samples.len(), n_jobs = self.config.n_jobs))]
    pub fn run<P: Predictor>(
        &self,
        predictor: &P,
        samples: &[Sample<P::Input>],
        output_dir: &Path,
        options: &P::Options,
        reporter: &ProgressReporter,
    ) -> Result<BatchReport, DriverError> {
        if self.config.n_jobs < 1 {
            return Err(DriverError::Config(ConfigError::InvalidParameter {
                name: "n_jobs",
                reason: "at least one worker is required".to_string(),
            }));
        }
        validate_sample_ids(samples)?;
        fs::create_dir_all(output_dir).map_err(|source| DriverError::OutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        info!("Starting batch prediction.");
        reporter.report(Progress::PhaseStart {
            name: "Batch Prediction",
        });
        reporter.report(Progress::TaskStart {
            total_steps: samples.len() as u64,
        });

        let result = if self.config.n_jobs == 1 {
            self.run_sequential(predictor, samples, output_dir, options, reporter)
        } else {
            self.run_parallel(predictor, samples, output_dir, options, reporter)
        };

        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);

        if let Ok(report) = &result {
            info!(
                completed = report.completed.len(),
                failed = report.failed.len(),
                "Batch prediction finished."
            );
        }
        result
    }

    fn run_sequential<P: Predictor>(
        &self,
        predictor: &P,
        samples: &[Sample<P::Input>],
        output_dir: &Path,
        options: &P::Options,
        reporter: &ProgressReporter,
    ) -> Result<BatchReport, DriverError> {
        let mut report = BatchReport::default();
        for sample in samples {
            let path = self.output_path(output_dir, &sample.id);
            predictor
                .predict(&sample.input, &path, options)
                .map_err(|source| DriverError::Task {
                    sample_id: sample.id.clone(),
                    source: Box::new(source),
                })?;
            report.completed.push(sample.id.clone());
            reporter.report(Progress::TaskIncrement);
        }
        Ok(report)
    }

    fn run_parallel<P: Predictor>(
        &self,
        predictor: &P,
        samples: &[Sample<P::Input>],
        output_dir: &Path,
        options: &P::Options,
        reporter: &ProgressReporter,
    ) -> Result<BatchReport, DriverError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.n_jobs)
            .thread_name(|i| format!("evalpro-predict-{}", i))
            .build()?;
        let fail_fast = self.config.failure_policy == FailurePolicy::FailFast;
        let abort = AtomicBool::new(false);

        let mut report = BatchReport::default();
        let mut first_failure: Option<SampleFailure> = None;

        pool.in_place_scope(|scope| {
            let (tx, rx) = mpsc::channel::<(usize, Outcome<P::Error>)>();
            for (index, sample) in samples.iter().enumerate() {
                let tx = tx.clone();
                let abort = &abort;
                let path = self.output_path(output_dir, &sample.id);
                scope.spawn(move |_| {
                    let outcome = if abort.load(Ordering::SeqCst) {
                        Outcome::Skipped
                    } else {
                        let result = predictor.predict(&sample.input, &path, options);
                        if result.is_err() && fail_fast {
                            abort.store(true, Ordering::SeqCst);
                        }
                        Outcome::Finished(result)
                    };
                    // The receiver outlives every task; a send error is unreachable.
                    let _ = tx.send((index, outcome));
                });
            }
            drop(tx);

            for (index, outcome) in rx {
                let sample_id = &samples[index].id;
                match outcome {
                    Outcome::Finished(Ok(())) => {
                        report.completed.push(sample_id.clone());
                        reporter.report(Progress::TaskIncrement);
                    }
                    Outcome::Finished(Err(error)) => {
                        warn!(sample_id = %sample_id, error = %error, "Prediction failed.");
                        reporter.report(Progress::SampleFailed {
                            sample_id: sample_id.clone(),
                        });
                        reporter.report(Progress::TaskIncrement);
                        let failure = SampleFailure {
                            sample_id: sample_id.clone(),
                            error: Box::new(error),
                        };
                        if fail_fast && first_failure.is_none() {
                            first_failure = Some(failure);
                        } else {
                            report.failed.push(failure);
                        }
                    }
                    Outcome::Skipped => {}
                }
            }
        });

        match first_failure {
            Some(failure) => Err(DriverError::Task {
                sample_id: failure.sample_id,
                source: failure.error,
            }),
            None => Ok(report),
        }
    }
}

fn validate_sample_ids<I>(samples: &[Sample<I>]) -> Result<(), DriverError> {
    let mut seen = HashSet::with_capacity(samples.len());
    for sample in samples {
        let id = sample.id.as_str();
        let reason = if id.is_empty() {
            Some("must not be empty")
        } else if id == "." || id == ".." {
            Some("must not be a relative directory name")
        } else if id.contains(['/', '\\']) {
            Some("must not contain path separators")
        } else if id.contains('\0') {
            Some("must not contain NUL bytes")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(DriverError::InvalidSampleId {
                id: id.to_string(),
                reason,
            });
        }
        if !seen.insert(id) {
            return Err(DriverError::DuplicateSample(id.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::DriverConfigBuilder;
    use rand::Rng;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::thread;
    use std::time::Duration;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("refusing to predict '{0}'")]
    struct Refused(String);

    /// Writes the input sequence to the output path after an optional random delay.
    /// Inputs listed in `fail_on` are refused immediately.
    #[derive(Default)]
    struct EchoPredictor {
        fail_on: HashSet<String>,
        max_delay_ms: u64,
        calls: AtomicUsize,
    }

    impl Predictor for EchoPredictor {
        type Input = String;
        type Options = String;
        type Error = Refused;

        fn name(&self) -> &str {
            "echo"
        }

        fn predict(&self, input: &String, output_path: &Path, suffix: &String) -> Result<(), Refused> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.contains(input) {
                return Err(Refused(input.clone()));
            }
            if self.max_delay_ms > 0 {
                let delay = rand::thread_rng().gen_range(1..=self.max_delay_ms);
                thread::sleep(Duration::from_millis(delay));
            }
            fs::write(output_path, format!("{}{}", input, suffix)).map_err(|_| Refused(input.clone()))
        }
    }

    fn samples(n: usize) -> Vec<Sample<String>> {
        (0..n).map(|i| Sample::new(format!("s{}", i), format!("SEQ{}", i))).collect()
    }

    fn driver(n_jobs: usize, policy: FailurePolicy) -> BatchPredictionDriver {
        BatchPredictionDriver::new(
            DriverConfigBuilder::new()
                .n_jobs(n_jobs)
                .failure_policy(policy)
                .build()
                .unwrap(),
        )
    }

    fn assert_all_outputs(dir: &Path, samples: &[Sample<String>], suffix: &str) {
        for sample in samples {
            let content = fs::read_to_string(dir.join(format!("{}.pdb", sample.id))).unwrap();
            assert_eq!(content, format!("{}{}", sample.input, suffix));
        }
        assert_eq!(fs::read_dir(dir).unwrap().count(), samples.len());
    }

    #[test]
    fn sequential_run_writes_one_output_per_sample_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let samples = samples(5);
        let report = driver(1, FailurePolicy::FailFast)
            .run(&EchoPredictor::default(), &samples, dir.path(), &"!".to_string(), &ProgressReporter::new())
            .unwrap();

        assert_eq!(report.completed, vec!["s0", "s1", "s2", "s3", "s4"]);
        assert!(report.is_success());
        assert_all_outputs(dir.path(), &samples, "!");
    }

    #[test]
    fn parallel_run_with_random_delays_writes_every_output() {
        let dir = tempfile::tempdir().unwrap();
        let samples = samples(24);
        let predictor = EchoPredictor {
            max_delay_ms: 15,
            ..Default::default()
        };

        let report = driver(4, FailurePolicy::FailFast)
            .run(&predictor, &samples, dir.path(), &String::new(), &ProgressReporter::new())
            .unwrap();

        let completed: HashSet<_> = report.completed.iter().cloned().collect();
        let expected: HashSet<_> = samples.iter().map(|s| s.id.clone()).collect();
        assert_eq!(report.completed.len(), samples.len());
        assert_eq!(completed, expected);
        assert_all_outputs(dir.path(), &samples, "");
    }

    #[test]
    fn output_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        driver(2, FailurePolicy::FailFast)
            .run(&EchoPredictor::default(), &samples(3), &nested, &String::new(), &ProgressReporter::new())
            .unwrap();
        assert!(nested.join("s2.pdb").exists());
    }

    #[test]
    fn sequential_failure_halts_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = EchoPredictor {
            fail_on: ["SEQ1".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let err = driver(1, FailurePolicy::Isolate)
            .run(&predictor, &samples(4), dir.path(), &String::new(), &ProgressReporter::new())
            .unwrap_err();

        assert_eq!(err.sample_id(), Some("s1"));
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 2);
        assert!(!dir.path().join("s2.pdb").exists());
    }

    #[test]
    fn parallel_fail_fast_returns_the_failing_sample() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = EchoPredictor {
            fail_on: ["SEQ0".to_string()].into_iter().collect(),
            max_delay_ms: 5,
            ..Default::default()
        };
        let samples = samples(40);
        let err = driver(2, FailurePolicy::FailFast)
            .run(&predictor, &samples, dir.path(), &String::new(), &ProgressReporter::new())
            .unwrap_err();

        assert!(matches!(err, DriverError::Task { .. }));
        assert_eq!(err.sample_id(), Some("s0"));

        let calls = predictor.calls.load(Ordering::SeqCst);
        assert!(calls < samples.len(), "{} of {} samples were attempted", calls, samples.len());
        let written = fs::read_dir(dir.path()).unwrap().count();
        assert!(written < calls);
        assert!(!dir.path().join("s0.pdb").exists());
        assert!(!dir.path().join("s39.pdb").exists());
    }

    #[test]
    fn parallel_isolate_reports_completed_and_failed_separately() {
        let dir = tempfile::tempdir().unwrap();
        let samples = samples(10);
        let predictor = EchoPredictor {
            fail_on: ["SEQ3".to_string(), "SEQ7".to_string()].into_iter().collect(),
            max_delay_ms: 5,
            ..Default::default()
        };
        let report = driver(3, FailurePolicy::Isolate)
            .run(&predictor, &samples, dir.path(), &String::new(), &ProgressReporter::new())
            .unwrap();

        let mut failed: Vec<_> = report.failed.iter().map(|f| f.sample_id.as_str()).collect();
        failed.sort();
        assert_eq!(failed, vec!["s3", "s7"]);
        assert_eq!(report.completed.len(), 8);
        assert_eq!(report.total(), 10);
        assert!(!report.is_success());
        assert!(!dir.path().join("s3.pdb").exists());
        assert!(dir.path().join("s4.pdb").exists());
    }

    #[test]
    fn progress_counts_every_sample() {
        let dir = tempfile::tempdir().unwrap();
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
            events.lock().unwrap().push(event);
        }));

        driver(3, FailurePolicy::FailFast)
            .run(&EchoPredictor::default(), &samples(6), dir.path(), &String::new(), &reporter)
            .unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        let increments = events.iter().filter(|e| **e == Progress::TaskIncrement).count();
        assert_eq!(increments, 6);
        assert_eq!(events[1], Progress::TaskStart { total_steps: 6 });
        assert_eq!(events.last(), Some(&Progress::PhaseFinish));
    }

    #[test]
    fn duplicate_and_malformed_ids_are_rejected_before_any_work() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = EchoPredictor::default();
        let run = |samples: Vec<Sample<String>>| {
            driver(2, FailurePolicy::FailFast).run(
                &predictor,
                &samples,
                dir.path(),
                &String::new(),
                &ProgressReporter::new(),
            )
        };

        let duplicate = run(vec![Sample::new("a", "X".into()), Sample::new("a", "Y".into())]);
        assert!(matches!(duplicate, Err(DriverError::DuplicateSample(id)) if id == "a"));

        for bad in ["", "..", "x/y", "x\\y"] {
            let result = run(vec![Sample::new(bad, "X".into())]);
            assert!(matches!(result, Err(DriverError::InvalidSampleId { .. })), "id {:?}", bad);
        }
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_batch_succeeds_with_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = driver(2, FailurePolicy::FailFast)
            .run(&EchoPredictor::default(), &[], dir.path(), &String::new(), &ProgressReporter::new())
            .unwrap();
        assert_eq!(report.total(), 0);
    }
}
