//! Deterministic newest-first ordering.

use crate::pipeline::{Aggregate, SortKey};

/// Stable descending sort of one collection.
///
/// Sorting repositories by stargazers after sorting them by time leaves time as the tie-break.
#[must_use]
pub fn apply(mut aggregate: Aggregate, key: SortKey) -> Aggregate {
    match key {
        SortKey::CommitsByTime => {
            for repo in &mut aggregate.repos_details {
                repo.repo.commits_details.sort_by(|a, b| b.created_time.cmp(&a.created_time));
            }
        }
        SortKey::ReposByTime => aggregate.repos_details.sort_by(|a, b| b.repo.created_time.cmp(&a.repo.created_time)),
        SortKey::ReposByStargazers => aggregate.repos_details.sort_by(|a, b| b.repo.stargazers_num.cmp(&a.repo.stargazers_num)),
        SortKey::IssuesByTime => aggregate.issues_details.sort_by(|a, b| b.created_time.cmp(&a.created_time)),
        SortKey::PullRequestsByTime => aggregate.prs_details.sort_by(|a, b| b.created_time.cmp(&a.created_time)),
        SortKey::StarsByTime => aggregate.stars_details.sort_by(|a, b| b.created_time.cmp(&a.created_time)),
    }

    aggregate
}
