use crate::facts::CommitData;
use crate::misc::Tally;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoData {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub created_time: DateTime<FixedOffset>,
    pub stargazers_num: u64,
    pub forks_num: u64,

    /// Bytes of code per language
    pub languages_num: Tally,

    /// The user's commits in this repository
    pub commits_details: Vec<CommitData>,
}
