mod context;
mod report;
mod schema;

pub use context::{Ranked, ReportContext};
pub use report::Report;
pub use schema::{FieldType, ProjectionError, Schema, SchemaNode};
