//! af-records: project/design records from paginated listing endpoints.

pub mod dedupe;
pub mod listing;
pub mod record;

pub use dedupe::{RecordSet, dedupe, dedupe_designs, flatten_projects};
pub use listing::{parse_listing, parse_listing_page};
pub use record::{DesignRecord, ProjectCounts, ProjectKind, ProjectRecord, parse_timestamp};

pub type RecordsResult<T> = Result<T, RecordsError>;

#[derive(thiserror::Error, Debug)]
pub enum RecordsError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid listing page: {what}")]
    InvalidListing { what: String },
}
