use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A repository the user starred, with the time it was starred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarData {
    pub name: String,
    pub url: String,
    pub created_time: DateTime<FixedOffset>,
}
