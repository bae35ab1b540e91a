//! Collections served by the REST API.

use super::client::{HostingClient, REST_MEDIA_TYPE, Response, STAR_MEDIA_TYPE};
use super::error::{HostingError, Result};
use super::paginator::{cut_at_year, paginate};
use super::Collection;
use crate::facts::timestamp::parse_timestamp;
use crate::facts::{AccountInfo, CommitData, IssueData, PullRequestData, RepoData, StarData};
use crate::misc::{ReportTimezone, Tally};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
    html_url: String,
    name: Option<String>,
    avatar_url: String,
    bio: Option<String>,
    followers: u64,
    following: u64,
    created_at: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct IssueItem {
    html_url: String,
    title: String,
    body: Option<String>,
    state: String,
    created_at: String,
    pull_request: Option<PullRequestLinks>,
}

#[derive(Debug, Deserialize)]
struct PullRequestLinks {
    merged_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoItem {
    name: String,
    html_url: String,
    description: Option<String>,
    created_at: String,
    stargazers_count: u64,
    forks_count: u64,
    languages_url: String,
    commits_url: String,
    owner: OwnerItem,
}

#[derive(Debug, Deserialize)]
struct OwnerItem {
    login: String,
}

#[derive(Debug, Deserialize)]
struct CommitItem {
    commit: CommitDetail,
    committer: Option<OwnerItem>,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
    committer: GitSignature,
}

#[derive(Debug, Deserialize)]
struct GitSignature {
    name: Option<String>,
    date: String,
}

#[derive(Debug, Deserialize)]
struct StarItem {
    starred_at: String,
    repo: StarredRepo,
}

#[derive(Debug, Deserialize)]
struct StarredRepo {
    full_name: String,
    html_url: String,
}

/// A repository as listed, before its languages and commits are fetched.
#[derive(Debug, Clone)]
pub struct RepoListing {
    pub record: RepoData,
    pub owner: String,
    pub languages_url: String,
    pub commits_url: String,
}

fn decode<T: DeserializeOwned>(collection: Collection, body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| HostingError::structure(collection, e.to_string()))
}

pub async fn fetch_account(client: &HostingClient) -> Result<AccountInfo> {
    let url = client.rest_url(&format!("/users/{}", client.username()))?;
    let body = match client.get(Collection::Account, &url, REST_MEDIA_TYPE).await? {
        Response::Json { body, .. } => body,
        Response::Empty => return Err(HostingError::structure(Collection::Account, "account lookup returned no content")),
    };

    Ok(parse_account(decode(Collection::Account, body)?, client.timezone()))
}

fn parse_account(user: UserResponse, timezone: &ReportTimezone) -> AccountInfo {
    AccountInfo {
        url: user.html_url,
        name: user.name.unwrap_or_else(|| user.login.clone()),
        username: user.login,
        avatar: user.avatar_url,
        bio: user.bio,
        followers_num: user.followers,
        following_num: user.following,
        created_time: parse_timestamp(&user.created_at, timezone),
    }
}

/// Issues authored by the user, newest first, down to the start of `year`.
pub async fn fetch_issues(client: &HostingClient, year: i32) -> Result<Vec<IssueData>> {
    let url = search_url(client, "issue")?;
    let timezone = client.timezone();

    paginate(Collection::Issues, url, client.limits(), move |url| {
        client.get_page(Collection::Issues, url, REST_MEDIA_TYPE, move |body| {
            let response: SearchResponse<IssueItem> = decode(Collection::Issues, body)?;
            let issues = response.items.into_iter().map(|item| parse_issue(item, timezone)).collect();
            Ok(cut_at_year(issues, year, |issue: &IssueData| issue.created_time))
        })
    })
    .await
}

/// Pull requests authored by the user, newest first, down to the start of `year`.
pub async fn fetch_pull_requests(client: &HostingClient, year: i32) -> Result<Vec<PullRequestData>> {
    let url = search_url(client, "pr")?;
    let timezone = client.timezone();

    paginate(Collection::PullRequests, url, client.limits(), move |url| {
        client.get_page(Collection::PullRequests, url, REST_MEDIA_TYPE, move |body| {
            let response: SearchResponse<IssueItem> = decode(Collection::PullRequests, body)?;
            let prs = response.items.into_iter().map(|item| parse_pull_request(item, timezone)).collect();
            Ok(cut_at_year(prs, year, |pr: &PullRequestData| pr.created_time))
        })
    })
    .await
}

fn search_url(client: &HostingClient, kind: &str) -> Result<Url> {
    let mut url = client.rest_url("/search/issues")?;
    let _ = url
        .query_pairs_mut()
        .append_pair("q", &format!("author:{} type:{kind}", client.username()))
        .append_pair("sort", "created")
        .append_pair("order", "desc");
    Ok(client.with_page_size(url))
}

fn parse_issue(item: IssueItem, timezone: &ReportTimezone) -> IssueData {
    IssueData {
        url: item.html_url,
        title: item.title,
        body: item.body,
        state: item.state,
        created_time: parse_timestamp(&item.created_at, timezone),
    }
}

fn parse_pull_request(item: IssueItem, timezone: &ReportTimezone) -> PullRequestData {
    let merged_time = item
        .pull_request
        .as_ref()
        .and_then(|links| links.merged_at.as_deref())
        .map(|merged_at| parse_timestamp(merged_at, timezone));

    PullRequestData {
        url: item.html_url,
        title: item.title,
        body: item.body,
        state: item.state,
        created_time: parse_timestamp(&item.created_at, timezone),
        merged: merged_time.is_some(),
        merged_time,
    }
}

/// Every repository the user can access. Languages and commits are left empty.
pub async fn fetch_repos(client: &HostingClient) -> Result<Vec<RepoListing>> {
    let url = client.with_page_size(client.rest_url("/user/repos")?);
    let timezone = client.timezone();

    paginate(Collection::Repos, url, client.limits(), move |url| {
        client.get_page(Collection::Repos, url, REST_MEDIA_TYPE, move |body| {
            let repos: Vec<RepoItem> = decode(Collection::Repos, body)?;
            Ok((repos.into_iter().map(|item| parse_repo(item, timezone)).collect(), false))
        })
    })
    .await
}

fn parse_repo(item: RepoItem, timezone: &ReportTimezone) -> RepoListing {
    RepoListing {
        record: RepoData {
            name: item.name,
            url: item.html_url,
            description: item.description,
            created_time: parse_timestamp(&item.created_at, timezone),
            stargazers_num: item.stargazers_count,
            forks_num: item.forks_count,
            languages_num: Tally::new(),
            commits_details: Vec::new(),
        },
        owner: item.owner.login,
        languages_url: item.languages_url,
        // The listing hands out a URI template such as `.../commits{/sha}`
        commits_url: item.commits_url.split('{').next().unwrap_or_default().to_string(),
    }
}

/// Bytes of code per language, in the order the API reports them.
pub async fn fetch_languages(client: &HostingClient, repo: &RepoListing) -> Result<Tally> {
    let url = Url::parse(&repo.languages_url).map_err(|source| HostingError::InvalidUrl {
        url: repo.languages_url.clone(),
        source,
    })?;

    match client.get(Collection::Languages, &url, REST_MEDIA_TYPE).await? {
        Response::Json { body, .. } => decode(Collection::Languages, body),
        Response::Empty => Ok(Tally::new()),
    }
}

/// The user's commits in one repository, newest first, down to the start of `year`.
pub async fn fetch_commits(client: &HostingClient, repo: &RepoListing, year: i32) -> Result<Vec<CommitData>> {
    let url = Url::parse(&repo.commits_url).map_err(|source| HostingError::InvalidUrl {
        url: repo.commits_url.clone(),
        source,
    })?;
    let url = client.with_page_size(url);
    let username = client.username();
    let timezone = client.timezone();

    paginate(Collection::Commits, url, client.limits(), move |url| {
        client.get_page(Collection::Commits, url, REST_MEDIA_TYPE, move |body| {
            let items: Vec<CommitItem> = decode(Collection::Commits, body)?;
            Ok(parse_commits(items, username, year, timezone))
        })
    })
    .await
}

/// Keeps the commits committed by `username`, stopping at the first of them older than `year`.
fn parse_commits(items: Vec<CommitItem>, username: &str, year: i32, timezone: &ReportTimezone) -> (Vec<CommitData>, bool) {
    let commits = items
        .into_iter()
        .filter(|item| committer_of(item) == Some(username))
        .map(|item| CommitData {
            created_time: parse_timestamp(&item.commit.committer.date, timezone),
            message: item.commit.message,
        })
        .collect();

    cut_at_year(commits, year, |commit: &CommitData| commit.created_time)
}

/// The account that committed, or the raw committer name when it maps to no account.
fn committer_of(item: &CommitItem) -> Option<&str> {
    item.committer
        .as_ref()
        .map(|account| account.login.as_str())
        .or(item.commit.committer.name.as_deref())
}

/// Repositories the user starred, most recent first, down to the start of `year`.
pub async fn fetch_stars(client: &HostingClient, year: i32) -> Result<Vec<StarData>> {
    let url = client.with_page_size(client.rest_url(&format!("/users/{}/starred", client.username()))?);
    let timezone = client.timezone();

    paginate(Collection::Stars, url, client.limits(), move |url| {
        client.get_page(Collection::Stars, url, STAR_MEDIA_TYPE, move |body| {
            let items: Vec<StarItem> = decode(Collection::Stars, body)?;
            let stars = items
                .into_iter()
                .map(|item| StarData {
                    name: item.repo.full_name,
                    url: item.repo.html_url,
                    created_time: parse_timestamp(&item.starred_at, timezone),
                })
                .collect();
            Ok(cut_at_year(stars, year, |star: &StarData| star.created_time))
        })
    })
    .await
}
