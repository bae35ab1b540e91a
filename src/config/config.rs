use super::{CommitSource, RetryPolicy};
use anyhow::{Context, Result, bail};
use core::time::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The default configuration YAML content, embedded from `default_config.yaml`
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../../default_config.yaml");

/// Largest page size the hosting API honors.
const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the REST API
    pub api_url: String,

    /// Endpoint of the GraphQL API
    pub graphql_url: String,

    /// Items requested per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Upper bound on the items accumulated for one collection
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Pause between consecutive page requests of one collection
    #[serde(default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,

    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on the whole retrieval phase of one report
    #[serde(default = "default_report_timeout_secs")]
    pub report_timeout_secs: u64,

    /// Repositories processed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// API used for commit history
    #[serde(default)]
    pub commit_source: CommitSource,

    #[serde(default)]
    pub retry: RetryPolicy,
}

const fn default_per_page() -> u32 {
    MAX_PER_PAGE
}

const fn default_max_items() -> usize {
    10_000
}

const fn default_pacing_delay_ms() -> u64 {
    300
}

const fn default_request_timeout_secs() -> u64 {
    10
}

const fn default_report_timeout_secs() -> u64 {
    600
}

const fn default_concurrency() -> usize {
    4
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if it holds invalid values
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let Some(path) = config_path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path).with_context(|| format!("reading configuration file '{}'", path.display()))?;
        let config: Self = serde_yaml::from_str(&text).with_context(|| format!("parsing configuration file '{}'", path.display()))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_YAML).with_context(|| format!("writing default configuration to '{}'", output_path.display()))
    }

    #[must_use]
    pub const fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn report_timeout(&self) -> Duration {
        Duration::from_secs(self.report_timeout_secs)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range or inconsistent
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            bail!("api_url must not be empty");
        }

        if self.graphql_url.is_empty() {
            bail!("graphql_url must not be empty");
        }

        if !(1..=MAX_PER_PAGE).contains(&self.per_page) {
            bail!("per_page must be between 1 and {MAX_PER_PAGE}, got {}", self.per_page);
        }

        if self.max_items == 0 {
            bail!("max_items must be greater than 0");
        }

        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than 0");
        }

        if self.report_timeout_secs == 0 {
            bail!("report_timeout_secs must be greater than 0");
        }

        if self.concurrency == 0 {
            bail!("concurrency must be greater than 0");
        }

        if self.retry.max_attempts == 0 {
            bail!("retry.max_attempts must be greater than 0");
        }

        if self.retry.max_delay_ms < self.retry.base_delay_ms {
            bail!(
                "retry.max_delay_ms ({}) must not be less than retry.base_delay_ms ({})",
                self.retry.max_delay_ms,
                self.retry.base_delay_ms
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        serde_yaml::from_str(DEFAULT_CONFIG_YAML).expect("default_config.yaml should be valid YAML that deserializes to Config")
    }
}
