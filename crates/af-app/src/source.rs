//! Where stage payloads and listing pages come from.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use af_core::StageName;
use serde_json::Value;

use crate::error::FetchError;

/// Raw stage results for one project.
///
/// Implementations are shared across the parallel stage fetch.
pub trait StageSource: Send + Sync {
    fn fetch_stage(&self, project_id: &str, stage: StageName) -> Result<Value, FetchError>;
}

/// Paginated project listing. Pages are 1-based; `Ok(None)` ends the listing.
pub trait ListingSource {
    fn fetch_page(&self, page: usize) -> Result<Option<Value>, FetchError>;
}

/// Read-only access to the bearer token used for backend calls.
pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token, or none.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    token: Option<String>,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl CredentialProvider for StaticCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Token read from an environment variable at call time.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredentials {
    fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

fn read_json(path: &Path) -> Result<Value, FetchError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => FetchError::NotFound {
            what: path.display().to_string(),
        },
        _ => FetchError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Project ids become path components; refuse anything that could escape.
fn path_component(project_id: &str) -> Result<&str, FetchError> {
    let id = project_id.trim();
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
        return Err(FetchError::NotFound {
            what: format!("project id {project_id:?}"),
        });
    }
    Ok(id)
}

/// Stage payloads stored as `<root>/<project_id>/<stage>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryStageSource {
    root: PathBuf,
}

impl DirectoryStageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn stage_path(&self, project_id: &str, stage: StageName) -> Result<PathBuf, FetchError> {
        Ok(self
            .root
            .join(path_component(project_id)?)
            .join(format!("{}.json", stage.as_str())))
    }
}

impl StageSource for DirectoryStageSource {
    fn fetch_stage(&self, project_id: &str, stage: StageName) -> Result<Value, FetchError> {
        read_json(&self.stage_path(project_id, stage)?)
    }
}

/// Listing pages stored as `<root>/page-<n>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryListingSource {
    root: PathBuf,
}

impl DirectoryListingSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ListingSource for DirectoryListingSource {
    fn fetch_page(&self, page: usize) -> Result<Option<Value>, FetchError> {
        match read_json(&self.root.join(format!("page-{page}.json"))) {
            Ok(value) => Ok(Some(value)),
            Err(FetchError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
