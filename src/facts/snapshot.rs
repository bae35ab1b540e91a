use crate::facts::{AccountInfo, IssueData, PullRequestData, RepoData, StarData};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const LOG_TARGET: &str = "snapshot";

/// Everything fetched for one report, taken at a single point in time.
///
/// Timestamps are stored already moved into the report timezone, so a saved snapshot
/// rebuilds the same report without fetching again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub account_info: AccountInfo,
    pub repos: Vec<RepoData>,
    pub issues: Vec<IssueData>,
    pub prs: Vec<PullRequestData>,
    pub stars: Vec<StarData>,
}

impl Snapshot {
    /// Reads a snapshot previously written by [`Snapshot::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading snapshot '{}'", path.display()))?;
        let snapshot: Self = serde_json::from_str(&text).with_context(|| format!("parsing snapshot '{}'", path.display()))?;

        log::info!(
            target: LOG_TARGET,
            "Loaded the snapshot of '{}' from '{}'",
            snapshot.account_info.username,
            path.display()
        );

        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing snapshot")?;
        fs::write(path, json).with_context(|| format!("writing snapshot '{}'", path.display()))?;

        log::info!(target: LOG_TARGET, "Saved the snapshot of '{}' to '{}'", self.account_info.username, path.display());
        Ok(())
    }
}
