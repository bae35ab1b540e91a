use crate::facts::{AccountInfo, CommitData, IssueData, PullRequestData, RepoData, Snapshot, StarData};
use crate::misc::Tally;
use crate::pipeline::calendar::DailyCalendar;
use serde::Serialize;

/// Statistics derived from a list of commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitStats {
    pub commits_num: u64,

    /// Commits per conventional type, in order of first appearance
    pub commits_types_num: Tally,

    /// 12 buckets, January first
    pub commits_monthly_num: Vec<u64>,

    /// 7 buckets, Monday first
    pub commits_weekdaily_num: Vec<u64>,

    pub commits_daily_num: DailyCalendar,

    /// 24 buckets in the report timezone
    pub commits_hourly_num: Vec<u64>,
}

impl Default for CommitStats {
    fn default() -> Self {
        Self {
            commits_num: 0,
            commits_types_num: Tally::new(),
            commits_monthly_num: vec![0; 12],
            commits_weekdaily_num: vec![0; 7],
            commits_daily_num: DailyCalendar::new(),
            commits_hourly_num: vec![0; 24],
        }
    }
}

/// Totals across all collections of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityStats {
    #[serde(flatten)]
    pub commits: CommitStats,

    pub repos_num: u64,

    /// Bytes of code per language, largest first
    pub languages_num: Tally,

    /// Repositories using each language, most used first
    pub repos_languages_num: Tally,

    pub stargazers_num: u64,
    pub forks_num: u64,
    pub prs_num: u64,
    pub prs_merged_num: u64,
    pub issues_num: u64,
    pub stars_num: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoAggregate {
    #[serde(flatten)]
    pub repo: RepoData,

    #[serde(flatten)]
    pub stats: CommitStats,
}

impl RepoAggregate {
    #[must_use]
    pub fn commits(&self) -> &[CommitData] {
        &self.repo.commits_details
    }
}

/// A snapshot with derived statistics layered on top.
///
/// This is the value threaded through the pipeline stages. Its JSON form is what
/// projection schemas select from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub account_info: AccountInfo,
    pub repos_details: Vec<RepoAggregate>,
    pub issues_details: Vec<IssueData>,
    pub prs_details: Vec<PullRequestData>,
    pub stars_details: Vec<StarData>,

    #[serde(flatten)]
    pub stats: ActivityStats,
}

impl Aggregate {
    /// All commits across repositories, in repository order.
    pub fn commits(&self) -> impl Iterator<Item = &CommitData> {
        self.repos_details.iter().flat_map(RepoAggregate::commits)
    }
}

impl From<Snapshot> for Aggregate {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            account_info: snapshot.account_info,
            repos_details: snapshot
                .repos
                .into_iter()
                .map(|repo| RepoAggregate {
                    repo,
                    stats: CommitStats::default(),
                })
                .collect(),
            issues_details: snapshot.issues,
            prs_details: snapshot.prs,
            stars_details: snapshot.stars,
            stats: ActivityStats::default(),
        }
    }
}
