//! Error types for the af-app service layer.

use std::fmt;
use std::path::PathBuf;

use af_core::StageName;

/// Failure to retrieve one stage payload or listing page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// One required stage that could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: StageName,
    pub reason: String,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage, self.reason)
    }
}

fn join_failures(failures: &[StageFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Application error type shared by the CLI and any other frontend.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(
        "could not load calculations for project {project_id} ({})",
        join_failures(.failures)
    )]
    MissingRequiredStage {
        project_id: String,
        failures: Vec<StageFailure>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Records error: {0}")]
    Records(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to access {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for af-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<af_records::RecordsError> for AppError {
    fn from(err: af_records::RecordsError) -> Self {
        AppError::Records(err.to_string())
    }
}

impl From<af_core::CoreError> for AppError {
    fn from(err: af_core::CoreError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_stage_message_lists_every_failure() {
        let err = AppError::MissingRequiredStage {
            project_id: "p-1".into(),
            failures: vec![
                StageFailure {
                    stage: StageName::Basic,
                    reason: "Not found: basic".into(),
                },
                StageFailure {
                    stage: StageName::Stage6,
                    reason: "malformed payload".into(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "could not load calculations for project p-1 (basic: Not found: basic; stage6: malformed payload)"
        );
    }
}
