mod account_info;
mod commit_data;
pub mod hosting;
mod issue_data;
mod progress_reporter;
mod repo_data;
mod request_tracker;
mod snapshot;
mod star_data;
pub mod timestamp;

pub use account_info::AccountInfo;
pub use commit_data::CommitData;
pub use issue_data::{IssueData, PullRequestData};
pub use progress_reporter::{ProgressReporter, VisibilityTaskGuard};
pub use repo_data::RepoData;
pub use request_tracker::RequestTracker;
pub use snapshot::Snapshot;
pub use star_data::StarData;
