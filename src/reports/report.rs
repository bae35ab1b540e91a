use crate::config::Config;
use crate::facts::hosting::{HostingClient, Identity, Provider};
use crate::facts::{ProgressReporter, RequestTracker, Snapshot};
use crate::pipeline::Pipeline;
use crate::reports::{ReportContext, Schema};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use core::time::Duration;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

const LOG_TARGET: &str = "reports";

/// How long retrieval runs before the progress bar appears.
const PROGRESS_DELAY: Duration = Duration::from_secs(2);

/// The projected aggregates of one year together with the context derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub full: Value,
    pub new_repos: Value,
    pub context: ReportContext,
}

impl Report {
    /// Runs both pipelines over `snapshot`, projects their results and derives the context.
    pub fn from_snapshot(snapshot: Snapshot, year: i32, now: DateTime<Utc>) -> Result<Self> {
        let full = project(&Pipeline::full_report(year)?, snapshot.clone(), &Schema::full_report()?)
            .context("projecting the full-year aggregate")?;
        let new_repos = project(&Pipeline::new_repos_report(year)?, snapshot, &Schema::new_repos_report()?)
            .context("projecting the new-repositories aggregate")?;

        let context = ReportContext::build(year, &full, &new_repos, now)?;

        Ok(Self { full, new_repos, context })
    }

    /// Fetches everything a report for `year` draws on from `identity`'s account.
    ///
    /// Gives up once the configured report timeout elapses; in-flight requests are dropped and
    /// nothing partial is returned.
    pub async fn fetch_snapshot(config: &Config, identity: Identity, year: i32, show_progress: bool) -> Result<Snapshot> {
        let start_time = Instant::now();
        let username = identity.username.clone();

        let progress = if show_progress {
            ProgressReporter::new(PROGRESS_DELAY)
        } else {
            ProgressReporter::hidden()
        };

        let tracker = RequestTracker::new(progress.clone());
        let client = HostingClient::new(config, identity, tracker)?;
        let provider = Provider::new(client);

        let snapshot = {
            let _guard = progress.start_visibility_checking();
            let result = tokio::time::timeout(config.report_timeout(), provider.get_snapshot(year)).await;
            progress.finish_and_clear();
            result
                .with_context(|| format!("timed out after {}s collecting activity for '{username}'", config.report_timeout_secs))?
                .with_context(|| format!("collecting activity for '{username}'"))?
        };

        log::info!(
            target: LOG_TARGET,
            "Collected the {year} activity of '{username}' in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );

        Ok(snapshot)
    }
}

fn project(pipeline: &Pipeline, snapshot: Snapshot, schema: &Schema) -> Result<Value> {
    let aggregate = pipeline.run(snapshot);
    log::debug!(
        target: LOG_TARGET,
        "Aggregate holds {} repositories, {} issues, {} pull requests and {} stars",
        aggregate.repos_details.len(),
        aggregate.issues_details.len(),
        aggregate.prs_details.len(),
        aggregate.stars_details.len()
    );
    let value = serde_json::to_value(&aggregate).context("serializing aggregate")?;
    Ok(schema.project(&value)?)
}
