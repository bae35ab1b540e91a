use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The API used to walk a repository's commit history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CommitSource {
    /// The REST `commits` endpoint, paged through `Link` headers.
    #[default]
    Rest,

    /// The default branch history from the GraphQL API, paged through `endCursor`.
    Graphql,
}
