mod aggregate;
pub mod calendar;
mod commit_type;
mod count;
mod filter;
#[cfg(test)]
pub(crate) mod fixtures;
#[expect(clippy::module_inception, reason = "I like it this way")]
mod pipeline;
mod sort;
mod stage;

pub use aggregate::{ActivityStats, Aggregate, CommitStats, RepoAggregate};
pub use commit_type::CommitType;
pub use pipeline::Pipeline;
pub use stage::{CountKind, FilterTarget, Phase, SortKey, Stage};
