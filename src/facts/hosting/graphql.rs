//! Commit history through the GraphQL API.

use super::error::{HostingError, Result};
use super::paginator::{Continuation, Page, paginate};
use super::rest::RepoListing;
use super::{Collection, HostingClient};
use crate::facts::CommitData;
use crate::facts::timestamp::parse_timestamp;
use crate::misc::ReportTimezone;
use serde::Deserialize;
use serde_json::{Value, json};

const USER_ID_QUERY: &str = "query($login: String!) { user(login: $login) { id } }";

const HISTORY_QUERY: &str = r"
query($owner: String!, $name: String!, $author: ID!, $since: GitTimestamp!, $until: GitTimestamp!, $first: Int!, $after: String) {
  repository(owner: $owner, name: $name) {
    defaultBranchRef {
      target {
        ... on Commit {
          history(first: $first, after: $after, since: $since, until: $until, author: { id: $author }) {
            pageInfo { hasNextPage endCursor }
            nodes { message committedDate }
          }
        }
      }
    }
  }
}";

#[derive(Debug, Deserialize)]
struct UserIdData {
    user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
struct UserNode {
    id: String,
}

#[derive(Debug, Deserialize)]
struct HistoryData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    default_branch_ref: Option<BranchRef>,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    target: HistoryTarget,
}

#[derive(Debug, Deserialize)]
struct HistoryTarget {
    history: History,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct History {
    page_info: PageInfo,
    nodes: Vec<HistoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryNode {
    message: String,
    committed_date: String,
}

/// The node id the GraphQL API uses to identify the user as a commit author.
pub async fn fetch_user_id(client: &HostingClient) -> Result<String> {
    let data = client
        .graphql(Collection::Account, USER_ID_QUERY, json!({ "login": client.username() }))
        .await?;

    let parsed: UserIdData = serde_json::from_value(data).map_err(|e| HostingError::structure(Collection::Account, e.to_string()))?;
    parsed
        .user
        .map(|user| user.id)
        .ok_or_else(|| HostingError::structure(Collection::Account, format!("no user named '{}'", client.username())))
}

/// The user's commits on a repository's default branch around `year`.
///
/// The query window is padded by a day on each side so that every timezone's view of
/// the year is covered; the filter stage trims the rest.
pub async fn fetch_commits(client: &HostingClient, repo: &RepoListing, author_id: &str, year: i32) -> Result<Vec<CommitData>> {
    let timezone = client.timezone();
    let variables = json!({
        "owner": repo.owner,
        "name": repo.record.name,
        "author": author_id,
        "since": format!("{}-12-31T00:00:00Z", year - 1),
        "until": format!("{}-01-02T00:00:00Z", year + 1),
        "first": client.per_page(),
    });

    paginate(Collection::Commits, None, client.limits(), move |after: Option<String>| {
        let mut variables = variables.clone();
        variables["after"] = after.map_or(Value::Null, Value::String);

        async move {
            let data = client.graphql(Collection::Commits, HISTORY_QUERY, variables).await?;
            parse_history(data, timezone)
        }
    })
    .await
}

fn parse_history(data: Value, timezone: &ReportTimezone) -> Result<Page<CommitData, Option<String>>> {
    let parsed: HistoryData = serde_json::from_value(data).map_err(|e| HostingError::structure(Collection::Commits, e.to_string()))?;

    // No repository means it is not visible to us; no default branch means it is empty
    let Some(history) = parsed
        .repository
        .and_then(|repo| repo.default_branch_ref)
        .map(|branch| branch.target.history)
    else {
        return Ok(Page::empty());
    };

    let items = history
        .nodes
        .into_iter()
        .map(|node| CommitData {
            created_time: parse_timestamp(&node.committed_date, timezone),
            message: node.message,
        })
        .collect();

    let continuation = match history.page_info.end_cursor {
        Some(cursor) if history.page_info.has_next_page => Continuation::Next(Some(cursor)),
        _ => Continuation::Exhausted,
    };

    Ok(Page { items, continuation })
}
