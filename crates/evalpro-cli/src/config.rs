use crate::cli::{PredictArgs, ScoreArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use evalpro::engine::chain_map::ChainMapping;
use evalpro::engine::config::{DriverConfig, DriverConfigBuilder, FailurePolicy};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

const DEFAULT_PROGRAM_ARGS: &[&str] = &["{output}"];

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialPredictConfig {
    n_jobs: Option<usize>,
    failure_policy: Option<FailurePolicy>,
    extension: Option<String>,
    program: Option<String>,
    args: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialScoreConfig {
    chain_mapping: Option<ChainMapping>,
}

/// The optional configuration file, every field optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    #[serde(default)]
    predict: PartialPredictConfig,
    #[serde(default)]
    score: PartialScoreConfig,
}

/// Fully resolved settings for the `predict` command.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictSettings {
    pub driver: DriverConfig,
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

/// Fully resolved settings for the `score` command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSettings {
    pub chain_mapping: ChainMapping,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads `path` if given, otherwise an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                debug!("Loading configuration from {:?}", path);
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolves predict settings: command-line flag, then file value, then default.
    pub fn merge_predict(&self, args: &PredictArgs) -> Result<PredictSettings> {
        let file = &self.predict;

        let mut builder = DriverConfigBuilder::new();
        if let Some(n_jobs) = args.jobs.or(file.n_jobs) {
            builder = builder.n_jobs(n_jobs);
        }
        if let Some(policy) = args.failure_policy.map(Into::into).or(file.failure_policy) {
            builder = builder.failure_policy(policy);
        }
        if let Some(extension) = args.extension.clone().or_else(|| file.extension.clone()) {
            builder = builder.extension(extension);
        }
        let driver = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let program = args
            .program
            .clone()
            .or_else(|| file.program.clone())
            .ok_or_else(|| {
                CliError::Config(
                    "no prediction program given; pass --program or set predict.program".to_string(),
                )
            })?;

        let program_args = if !args.args.is_empty() {
            args.args.clone()
        } else if let Some(file_args) = &file.args {
            file_args.clone()
        } else {
            DEFAULT_PROGRAM_ARGS.iter().map(|s| s.to_string()).collect()
        };

        let env = args
            .env
            .iter()
            .map(|s| parser::parse_key_value(s))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| CliError::Argument(e.to_string()))?;

        Ok(PredictSettings {
            driver,
            program,
            args: program_args,
            env,
        })
    }

    /// Resolves score settings: command-line flag, then file value, then default.
    pub fn merge_score(&self, args: &ScoreArgs) -> ScoreSettings {
        ScoreSettings {
            chain_mapping: args
                .chain_mapping
                .map(Into::into)
                .or(self.score.chain_mapping)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;

    fn predict_args(extra: &[&str]) -> PredictArgs {
        let mut argv = vec!["evalpro", "predict", "--fasta", "in.fa", "-o", "out"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Predict(args) => args,
            _ => unreachable!(),
        }
    }

    fn score_args(extra: &[&str]) -> ScoreArgs {
        let mut argv = vec!["evalpro", "score", "dockq", "--pairs", "p.csv"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Score(args) => args,
            _ => unreachable!(),
        }
    }

    const FULL_CONFIG: &str = r#"
        [predict]
        n-jobs = 4
        failure-policy = "isolate"
        extension = "cif"
        program = "fold-tool"
        args = ["--out", "{output}"]

        [score]
        chain-mapping = "by-name"
    "#;

    #[test]
    fn parses_full_file() {
        let config = PartialConfig::from_toml(FULL_CONFIG).unwrap();
        assert_eq!(config.predict.n_jobs, Some(4));
        assert_eq!(config.predict.failure_policy, Some(FailurePolicy::Isolate));
        assert_eq!(config.score.chain_mapping, Some(ChainMapping::ByName));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(PartialConfig::from_toml("[predict]\njobs = 2\n").is_err());
        assert!(PartialConfig::from_toml("[unknown]\n").is_err());
    }

    #[test]
    fn file_values_apply_when_flags_are_absent() {
        let config = PartialConfig::from_toml(FULL_CONFIG).unwrap();
        let settings = config.merge_predict(&predict_args(&[])).unwrap();

        assert_eq!(settings.driver.n_jobs, 4);
        assert_eq!(settings.driver.failure_policy, FailurePolicy::Isolate);
        assert_eq!(settings.driver.extension, "cif");
        assert_eq!(settings.program, "fold-tool");
        assert_eq!(settings.args, vec!["--out", "{output}"]);
    }

    #[test]
    fn flags_override_file_values() {
        let config = PartialConfig::from_toml(FULL_CONFIG).unwrap();
        let settings = config
            .merge_predict(&predict_args(&[
                "-j", "2", "--failure-policy", "fail-fast", "-p", "other", "--arg", "{sequence}",
                "-e", "SEED=1",
            ]))
            .unwrap();

        assert_eq!(settings.driver.n_jobs, 2);
        assert_eq!(settings.driver.failure_policy, FailurePolicy::FailFast);
        assert_eq!(settings.driver.extension, "cif");
        assert_eq!(settings.program, "other");
        assert_eq!(settings.args, vec!["{sequence}"]);
        assert_eq!(settings.env, vec![("SEED".to_string(), "1".to_string())]);
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let settings = PartialConfig::default()
            .merge_predict(&predict_args(&["--program", "fold-tool"]))
            .unwrap();
        assert_eq!(settings.driver, DriverConfig::default());
        assert_eq!(settings.args, vec!["{output}"]);
    }

    #[test]
    fn missing_program_and_invalid_values_are_config_errors() {
        let config = PartialConfig::default();
        assert!(matches!(
            config.merge_predict(&predict_args(&[])),
            Err(CliError::Config(_))
        ));
        assert!(matches!(
            config.merge_predict(&predict_args(&["-p", "x", "-j", "0"])),
            Err(CliError::Config(_))
        ));
        assert!(matches!(
            config.merge_predict(&predict_args(&["-p", "x", "-e", "BROKEN"])),
            Err(CliError::Argument(_))
        ));
    }

    #[test]
    fn chain_mapping_precedence() {
        let config = PartialConfig::from_toml(FULL_CONFIG).unwrap();
        assert_eq!(config.merge_score(&score_args(&[])).chain_mapping, ChainMapping::ByName);
        assert_eq!(
            config
                .merge_score(&score_args(&["--chain-mapping", "positional"]))
                .chain_mapping,
            ChainMapping::Positional
        );
        assert_eq!(
            PartialConfig::default().merge_score(&score_args(&[])).chain_mapping,
            ChainMapping::Positional
        );
    }

    #[test]
    fn load_reads_files_and_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        let bad = dir.path().join("bad.toml");
        fs::write(&good, FULL_CONFIG).unwrap();
        fs::write(&bad, "[predict\n").unwrap();

        assert_eq!(
            PartialConfig::load(Some(good.as_path())).unwrap().predict.program.as_deref(),
            Some("fold-tool")
        );
        assert_eq!(PartialConfig::load(None).unwrap(), PartialConfig::default());
        assert!(matches!(
            PartialConfig::load(Some(bad.as_path())),
            Err(CliError::FileParsing { .. })
        ));
    }
}
