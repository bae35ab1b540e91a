mod commit_source;
#[expect(clippy::module_inception, reason = "I like it this way")]
mod config;
mod retry_policy;

pub use commit_source::CommitSource;
pub use config::{Config, DEFAULT_CONFIG_YAML};
pub use retry_policy::RetryPolicy;
