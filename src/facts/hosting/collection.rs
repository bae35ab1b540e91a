use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The kinds of data fetched from the hosting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Collection {
    Account,
    Issues,
    PullRequests,
    Repos,
    Languages,
    Commits,
    Stars,
}
