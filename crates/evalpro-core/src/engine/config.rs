use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// What the parallel driver does when one sample's prediction fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop dispatching new samples, let in-flight ones finish, return the first failure.
    #[default]
    FailFast,
    /// Run every sample and report completed and failed ids separately.
    Isolate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    pub n_jobs: usize,
    pub failure_policy: FailurePolicy,
    pub extension: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            n_jobs: 1,
            failure_policy: FailurePolicy::default(),
            extension: "pdb".to_string(),
        }
    }
}

#[derive(Default)]
pub struct DriverConfigBuilder {
    n_jobs: Option<usize>,
    failure_policy: Option<FailurePolicy>,
    extension: Option<String>,
}

impl DriverConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = Some(n_jobs);
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn build(self) -> Result<DriverConfig, ConfigError> {
        let defaults = DriverConfig::default();

        let n_jobs = self.n_jobs.unwrap_or(defaults.n_jobs);
        if n_jobs < 1 {
            return Err(ConfigError::InvalidParameter {
                name: "n_jobs",
                reason: "at least one worker is required".to_string(),
            });
        }

        let extension = self.extension.unwrap_or(defaults.extension);
        if extension.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "extension",
                reason: "must not be empty".to_string(),
            });
        }
        if extension.starts_with('.') || extension.contains(['/', '\\']) {
            return Err(ConfigError::InvalidParameter {
                name: "extension",
                reason: format!("'{}' must be a bare file extension", extension),
            });
        }

        Ok(DriverConfig {
            n_jobs,
            failure_policy: self.failure_policy.unwrap_or(defaults.failure_policy),
            extension,
        })
    }
}
