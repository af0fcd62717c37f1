use crate::engine::config::DriverConfig;
use crate::engine::driver::{BatchPredictionDriver, BatchReport, Predictor, Sample};
use crate::engine::error::DriverError;
use crate::engine::progress::ProgressReporter;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, instrument};

const OUTPUT_PLACEHOLDER: &str = "{output}";
const SEQUENCE_PLACEHOLDER: &str = "{sequence}";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O error while running '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("'{program}' finished but did not write '{}'", .path.display())]
    MissingOutput { program: String, path: PathBuf },
}

/// Extra arguments and environment forwarded to every invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOptions {
    pub extra_args: Vec<String>,
    pub env: Vec<(String, String)>,
}

/// Runs an external structure-prediction program once per sample.
///
/// In every argument, `{output}` is replaced by the output file path and
/// `{sequence}` by the input sequence. The sequence is also written to the
/// program's standard input. The program must exit successfully and leave a file
/// at the output path.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandPredictor {
    program: String,
    args: Vec<String>,
}

impl CommandPredictor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn expand(&self, arg: &str, sequence: &str, output_path: &Path) -> String {
        arg.replace(OUTPUT_PLACEHOLDER, &output_path.to_string_lossy())
            .replace(SEQUENCE_PLACEHOLDER, sequence)
    }

    fn io_error(&self, source: io::Error) -> CommandError {
        CommandError::Io {
            program: self.program.clone(),
            source,
        }
    }
}

impl Predictor for CommandPredictor {
    type Input = String;
    type Options = CommandOptions;
    type Error = CommandError;

    fn name(&self) -> &str {
        &self.program
    }

    fn predict(
        &self,
        sequence: &String,
        output_path: &Path,
        options: &CommandOptions,
    ) -> Result<(), CommandError> {
        match fs::remove_file(output_path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(self.io_error(e)),
        }

        let args: Vec<String> = self
            .args
            .iter()
            .chain(&options.extra_args)
            .map(|arg| self.expand(arg, sequence, output_path))
            .collect();
        debug!(program = %self.program, ?args, "Launching predictor.");

        let mut child = Command::new(&self.program)
            .args(&args)
            .envs(options.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(sequence.as_bytes()) {
                Ok(()) => {}
                // The program may exit without reading its input.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(self.io_error(e)),
            }
        }

        let output = child.wait_with_output().map_err(|e| self.io_error(e))?;
        if !output.status.success() {
            return Err(CommandError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if !output_path.is_file() {
            return Err(CommandError::MissingOutput {
                program: self.program.clone(),
                path: output_path.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Runs `predictor` over `samples` with a driver built from `config`.
#[instrument(skip_all, name = "predict_workflow")]
pub fn run<P: Predictor>(
    predictor: &P,
    samples: &[Sample<P::Input>],
    output_dir: &Path,
    options: &P::Options,
    config: &DriverConfig,
    reporter: &ProgressReporter,
) -> Result<BatchReport, DriverError> {
    BatchPredictionDriver::new(config.clone()).run(predictor, samples, output_dir, options, reporter)
}
