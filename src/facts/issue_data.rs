use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueData {
    pub url: String,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub created_time: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestData {
    pub url: String,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub created_time: DateTime<FixedOffset>,
    pub merged: bool,
    pub merged_time: Option<DateTime<FixedOffset>>,
}
