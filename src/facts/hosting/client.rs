use super::error::{HostingError, Result};
use super::link_header::next_link;
use super::paginator::{Continuation, Page, PageLimits};
use super::Collection;
use crate::config::{CommitSource, Config, RetryPolicy};
use crate::facts::RequestTracker;
use crate::misc::ReportTimezone;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK, USER_AGENT};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Instant;
use url::Url;

const LOG_TARGET: &str = "hosting";

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Media type of the REST v3 API.
pub const REST_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Media type that adds `starred_at` to starred-repository listings.
pub const STAR_MEDIA_TYPE: &str = "application/vnd.github.v3.star+json";

/// Who a report is built for and how their activity is placed in time.
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
    pub token: String,
    pub timezone: ReportTimezone,
}

/// A parsed, successful response.
#[derive(Debug)]
pub enum Response {
    Json { body: Value, next: Option<Url> },

    /// Nothing to list: HTTP 409 for an empty repository, or a rate-limit response.
    Empty,
}

/// Why a single attempt failed.
#[derive(Debug)]
enum Failure {
    Transport(reqwest::Error),
    Status { status: StatusCode, message: String },
    Decode(String),
}

impl Failure {
    fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            Self::Status { status, .. } => status.is_server_error(),
            Self::Decode(_) => false,
        }
    }

    fn into_error(self, collection: Collection, url: &Url, attempts: u32) -> HostingError {
        match self {
            Self::Transport(source) => HostingError::Transport {
                url: url.to_string(),
                attempts,
                source,
            },
            Self::Status { status, message } => HostingError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                attempts,
                message,
            },
            Self::Decode(message) => HostingError::structure(collection, message),
        }
    }
}

/// Authenticated access to the hosting service for one report request.
///
/// Holds everything a fetch needs so no state is shared between reports.
#[derive(Debug, Clone)]
pub struct HostingClient {
    http: reqwest::Client,
    identity: Identity,
    api_url: String,
    graphql_url: Url,
    per_page: u32,
    concurrency: usize,
    commit_source: CommitSource,
    limits: PageLimits,
    retry: RetryPolicy,
    tracker: RequestTracker,
}

impl HostingClient {
    pub fn new(config: &Config, identity: Identity, tracker: RequestTracker) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static(REST_MEDIA_TYPE));
        let _ = headers.insert(USER_AGENT, HeaderValue::from_static(concat!("git-recap/", env!("CARGO_PKG_VERSION"))));
        let _ = headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));

        if !identity.token.is_empty() {
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", identity.token))
                .map_err(|e| HostingError::InvalidToken(e.to_string()))?;
            auth.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(HostingError::Client)?;

        let graphql_url = Url::parse(&config.graphql_url).map_err(|source| HostingError::InvalidUrl {
            url: config.graphql_url.clone(),
            source,
        })?;

        Ok(Self {
            http,
            identity,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            graphql_url,
            per_page: config.per_page,
            concurrency: config.concurrency,
            commit_source: config.commit_source,
            limits: PageLimits {
                max_items: config.max_items,
                pacing_delay: config.pacing_delay(),
            },
            retry: config.retry.clone(),
            tracker,
        })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.identity.username
    }

    #[must_use]
    pub const fn timezone(&self) -> &ReportTimezone {
        &self.identity.timezone
    }

    #[must_use]
    pub const fn limits(&self) -> PageLimits {
        self.limits
    }

    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[must_use]
    pub const fn commit_source(&self) -> CommitSource {
        self.commit_source
    }

    #[must_use]
    pub const fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Builds a URL under the REST API root, e.g. `rest_url("/users/octocat")`.
    pub fn rest_url(&self, path_and_query: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.api_url, path_and_query.trim_start_matches('/'));
        parse_url(&raw)
    }

    /// Sets the page size on a REST URL, replacing any size already present.
    #[must_use]
    pub fn with_page_size(&self, mut url: Url) -> Url {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "per_page")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let _ = url
            .query_pairs_mut()
            .clear()
            .extend_pairs(pairs)
            .append_pair("per_page", &self.per_page.to_string());
        url
    }

    /// GETs a REST resource, following the retry policy.
    pub async fn get(&self, collection: Collection, url: &Url, accept: &'static str) -> Result<Response> {
        self.execute(collection, url, || self.http.get(url.clone()).header(ACCEPT, accept)).await
    }

    /// GETs one page of a REST listing and turns it into a [`Page`].
    ///
    /// `parse` returns the items and whether it met an item older than the target year.
    pub async fn get_page<T>(
        &self,
        collection: Collection,
        url: Url,
        accept: &'static str,
        parse: impl FnOnce(Value) -> Result<(Vec<T>, bool)>,
    ) -> Result<Page<T, Url>> {
        match self.get(collection, &url, accept).await? {
            Response::Empty => {
                log::debug!(target: LOG_TARGET, "{url} has no content, treating {collection} as empty");
                Ok(Page::empty())
            }
            Response::Json { body, next } => {
                let (items, reached_older) = parse(body)?;
                let continuation = if reached_older {
                    Continuation::Stop
                } else {
                    next.map_or(Continuation::Exhausted, Continuation::Next)
                };
                Ok(Page { items, continuation })
            }
        }
    }

    /// POSTs a GraphQL query and returns its `data` member.
    pub async fn graphql(&self, collection: Collection, query: &str, variables: Value) -> Result<Value> {
        let payload = serde_json::json!({ "query": query, "variables": variables });
        let url = &self.graphql_url;

        let response = self.execute(collection, url, || self.http.post(url.clone()).json(&payload)).await?;
        let Response::Json { mut body, .. } = response else {
            return Err(HostingError::structure(collection, "GraphQL endpoint returned no content"));
        };

        if let Some(errors) = body.get("errors").and_then(Value::as_array)
            && !errors.is_empty()
        {
            let messages = errors
                .iter()
                .map(|e| e.get("message").and_then(Value::as_str).unwrap_or("unknown error").to_string())
                .collect();
            return Err(HostingError::GraphQl { collection, messages });
        }

        match body.get_mut("data").map(Value::take) {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(HostingError::structure(collection, "missing key 'data'")),
        }
    }

    async fn execute(&self, collection: Collection, url: &Url, build: impl Fn() -> RequestBuilder) -> Result<Response> {
        let mut attempt = 1;
        loop {
            log::info!(target: LOG_TARGET, "Fetching {collection} from {url}");
            let start_time = Instant::now();

            self.tracker.add_request(collection);
            let outcome = attempt_request(build()).await;
            self.tracker.complete_request(collection);

            match outcome {
                Ok(response) => {
                    log::debug!(
                        target: LOG_TARGET,
                        "Fetched {collection} from {url} in {:.3}s",
                        start_time.elapsed().as_secs_f64()
                    );
                    return Ok(response);
                }
                Err(failure) if failure.is_transient() && self.retry.should_retry(attempt) => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    log::warn!(
                        target: LOG_TARGET,
                        "Attempt {attempt} for {url} failed ({failure:?}), retrying in {:.1}s",
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure.into_error(collection, url, attempt)),
            }
        }
    }
}

async fn attempt_request(request: RequestBuilder) -> Result<Response, Failure> {
    let response = request.send().await.map_err(Failure::Transport)?;
    let status = response.status();

    if status == StatusCode::CONFLICT {
        return Ok(Response::Empty);
    }

    if is_rate_limited(status, response.headers()) {
        log::warn!(target: LOG_TARGET, "Rate limit reached at {}, treating it as empty", response.url());
        return Ok(Response::Empty);
    }

    let next = response
        .headers()
        .get(LINK)
        .and_then(|value| value.to_str().ok())
        .and_then(next_link)
        .map(parse_url)
        .transpose()
        .map_err(|e| Failure::Decode(e.to_string()))?;

    let text = response.text().await.map_err(Failure::Transport)?;

    if !status.is_success() {
        return Err(Failure::Status {
            status,
            message: error_message(&text),
        });
    }

    let body = serde_json::from_str(&text).map_err(|e| Failure::Decode(format!("response is not valid JSON: {e}")))?;
    Ok(Response::Json { body, next })
}

/// HTTP 429, or the 403 GitHub answers with once the request quota is spent.
fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN
            && headers
                .get(RATE_LIMIT_REMAINING)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|remaining| remaining.trim() == "0"))
}

/// Pulls the `message` out of an API error body, falling back to the raw text.
fn error_message(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| text.chars().take(200).collect())
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|source| HostingError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}
