use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Profile of the account a report is built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub url: String,
    pub name: String,
    pub username: String,
    pub avatar: String,
    pub bio: Option<String>,
    pub followers_num: u64,
    pub following_num: u64,
    pub created_time: DateTime<FixedOffset>,
}
