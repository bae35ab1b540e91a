use crate::facts::hosting::Collection;
use thiserror::Error;

/// Failures while retrieving data from the hosting service.
#[derive(Error, Debug)]
pub enum HostingError {
    #[error("request to {url} failed after {attempts} attempt(s): {source}")]
    Transport {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed after {attempts} attempt(s) with HTTP {status}: {message}")]
    Status {
        url: String,
        status: u16,
        attempts: u32,
        message: String,
    },

    #[error("unexpected {collection} response shape: {message}")]
    Structure { collection: Collection, message: String },

    #[error("GraphQL query for {collection} failed: {}", messages.join("; "))]
    GraphQl { collection: Collection, messages: Vec<String> },

    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid access token: {0}")]
    InvalidToken(String),

    #[error("could not build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl HostingError {
    pub(crate) fn structure(collection: Collection, message: impl Into<String>) -> Self {
        Self::Structure {
            collection,
            message: message.into(),
        }
    }
}

pub type Result<T, E = HostingError> = core::result::Result<T, E>;
