mod client;
mod collection;
mod error;
mod graphql;
mod link_header;
mod paginator;
mod provider;
mod rest;

pub use client::{HostingClient, Identity, Response};
pub use collection::Collection;
pub use error::HostingError;
pub use paginator::{Continuation, Page, PageLimits, cut_at_year, paginate};
pub use provider::Provider;
