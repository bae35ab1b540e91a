//! Year-bounded inclusion.

use crate::pipeline::{Aggregate, FilterTarget};
use chrono::{DateTime, Datelike, FixedOffset};

const LOG_TARGET: &str = "filter";

fn in_year(time: &DateTime<FixedOffset>, year: i32) -> bool {
    time.year() == year
}

/// Keeps the items of `target` created in `year`.
///
/// Filtering commits also drops repositories left without commits. Filtering repositories
/// looks only at their creation time and leaves their commits alone.
#[must_use]
pub fn apply(mut aggregate: Aggregate, target: FilterTarget, year: i32) -> Aggregate {
    match target {
        FilterTarget::Commits => {
            for repo in &mut aggregate.repos_details {
                repo.repo.commits_details.retain(|commit| in_year(&commit.created_time, year));
            }

            let before = aggregate.repos_details.len();
            aggregate.repos_details.retain(|repo| !repo.repo.commits_details.is_empty());
            log::debug!(
                target: LOG_TARGET,
                "Dropped {} repositories without commits in {year}",
                before - aggregate.repos_details.len()
            );
        }
        FilterTarget::Issues => aggregate.issues_details.retain(|issue| in_year(&issue.created_time, year)),
        FilterTarget::PullRequests => aggregate.prs_details.retain(|pr| in_year(&pr.created_time, year)),
        FilterTarget::Stars => aggregate.stars_details.retain(|star| in_year(&star.created_time, year)),
        FilterTarget::Repos => aggregate.repos_details.retain(|repo| in_year(&repo.repo.created_time, year)),
    }

    aggregate
}
