use crate::pipeline::{Aggregate, count, filter, sort};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A collection restricted by the filter phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterTarget {
    /// Commits by their time; repositories left empty are dropped
    Commits,
    Issues,
    PullRequests,
    Stars,

    /// Repositories by their creation time
    Repos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortKey {
    CommitsByTime,
    ReposByTime,
    ReposByStargazers,
    IssuesByTime,
    PullRequestsByTime,
    StarsByTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CountKind {
    Commits,
    CommitTypes,
    CommitsMonthly,
    CommitsWeekdaily,
    CommitsDaily,
    CommitsHourly,
    Repos,
    Languages,
    Stargazers,
    Forks,
    PullRequests,
    MergedPullRequests,
    Issues,
    Stars,
}

/// Stages must appear in this order within a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Filter,
    Sort,
    Count,
}

/// One pure transformation of an [`Aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Filter { target: FilterTarget, year: i32 },
    Sort(SortKey),
    Count(CountKind),
}

impl Stage {
    #[must_use]
    pub const fn phase(self) -> Phase {
        match self {
            Self::Filter { .. } => Phase::Filter,
            Self::Sort(_) => Phase::Sort,
            Self::Count(_) => Phase::Count,
        }
    }

    #[must_use]
    pub fn apply(self, aggregate: Aggregate) -> Aggregate {
        match self {
            Self::Filter { target, year } => filter::apply(aggregate, target, year),
            Self::Sort(key) => sort::apply(aggregate, key),
            Self::Count(kind) => count::apply(aggregate, kind),
        }
    }
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Filter { target, year } => write!(f, "filter {target} to {year}"),
            Self::Sort(key) => write!(f, "sort {key}"),
            Self::Count(kind) => write!(f, "count {kind}"),
        }
    }
}
