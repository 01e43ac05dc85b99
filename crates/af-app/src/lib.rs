//! Shared application service layer for AquaFlow reports.
//!
//! Fetches stage results and project listings from a backend, runs them
//! through normalization, assembly and page flow, and hands finished
//! documents to the CLI.

pub mod config;
pub mod error;
pub mod http;
pub mod listing_service;
pub mod report_service;
pub mod source;

pub use config::{HttpConfig, ReportConfig, load_config};
pub use error::{AppError, AppResult, FetchError, StageFailure};
pub use http::HttpStageSource;
pub use listing_service::{Listing, collect_listing, load_records};
pub use report_service::{ReportBuild, build_report, fetch_stages, normalize_file};
pub use source::{
    CredentialProvider, DirectoryListingSource, DirectoryStageSource, EnvCredentials,
    ListingSource, StageSource, StaticCredentials,
};
