use super::error::Result;
use super::rest::RepoListing;
use super::{HostingClient, graphql, rest};
use crate::config::CommitSource;
use crate::facts::{RepoData, Snapshot};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::time::Instant;

const LOG_TARGET: &str = "provider";

/// Gathers everything a report needs from the hosting service.
#[derive(Debug)]
pub struct Provider {
    client: HostingClient,
}

impl Provider {
    #[must_use]
    pub const fn new(client: HostingClient) -> Self {
        Self { client }
    }

    /// Fetches a snapshot of the user's activity, trimmed early to `year` where the API allows.
    ///
    /// Independent collections are fetched concurrently and repositories are expanded with
    /// bounded concurrency. Any failing collection fails the whole snapshot.
    pub async fn get_snapshot(&self, year: i32) -> Result<Snapshot> {
        let start_time = Instant::now();
        let client = &self.client;

        log::info!(target: LOG_TARGET, "Collecting {year} activity for '{}'", client.username());

        let (account_info, issues, prs, listings, stars) = tokio::try_join!(
            rest::fetch_account(client),
            rest::fetch_issues(client, year),
            rest::fetch_pull_requests(client, year),
            rest::fetch_repos(client),
            rest::fetch_stars(client, year),
        )?;

        let author_id = match client.commit_source() {
            CommitSource::Graphql => Some(graphql::fetch_user_id(client).await?),
            CommitSource::Rest => None,
        };

        log::info!(target: LOG_TARGET, "Expanding {} repositories", listings.len());

        let repos: Vec<RepoData> = stream::iter(listings)
            .map(|listing| self.expand_repo(listing, year, author_id.as_deref()))
            .buffered(client.concurrency())
            .try_collect()
            .await?;

        log::debug!(
            target: LOG_TARGET,
            "Collected {} repos, {} issues, {} pull requests and {} stars in {:.3}s",
            repos.len(),
            issues.len(),
            prs.len(),
            stars.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(Snapshot {
            account_info,
            repos,
            issues,
            prs,
            stars,
        })
    }

    async fn expand_repo(&self, listing: RepoListing, year: i32, author_id: Option<&str>) -> Result<RepoData> {
        let client = &self.client;

        let commits = async {
            match author_id {
                Some(id) => graphql::fetch_commits(client, &listing, id, year).await,
                None => rest::fetch_commits(client, &listing, year).await,
            }
        };

        let (languages, commits) = tokio::try_join!(rest::fetch_languages(client, &listing), commits)?;

        let mut record = listing.record;
        record.languages_num = languages;
        record.commits_details = commits;
        Ok(record)
    }
}
