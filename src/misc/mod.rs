mod report_timezone;
mod tally;

pub use report_timezone::ReportTimezone;
pub use tally::Tally;
