//! Report configuration loaded from YAML. Every field has a default, so an
//! empty file (or no file) is a valid configuration.

use std::collections::BTreeMap;
use std::path::Path;

use af_core::StageName;
use af_layout::LayoutConfig;
use af_layout::flow::DEFAULT_ATTRIBUTION;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A4 portrait height in points.
pub const DEFAULT_PAGE_HEIGHT: f64 = 842.0;
pub const DEFAULT_MARGIN: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
    pub attribution: String,
    pub page_height: f64,
    pub margin: f64,
    pub layout: LayoutConfig,
    pub http: HttpConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "AquaFlow System Design Report".to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
            page_height: DEFAULT_PAGE_HEIGHT,
            margin: DEFAULT_MARGIN,
            layout: LayoutConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

/// Backend endpoints. Templates expand `{base}`, `{project_id}` and `{page}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub base_url: Option<String>,
    /// Per-stage overrides of the default endpoint templates.
    pub stage_endpoints: BTreeMap<StageName, String>,
    pub listing_endpoint: String,
    pub timeout_ms: u64,
    pub listing_page_cap: usize,
    /// Environment variable holding the bearer token.
    pub credential_env: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            stage_endpoints: BTreeMap::new(),
            listing_endpoint: "{base}/designs?page={page}".to_string(),
            timeout_ms: 30_000,
            listing_page_cap: 50,
            credential_env: "AQUAFLOW_TOKEN".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn default_endpoint(stage: StageName) -> &'static str {
        match stage {
            StageName::Basic => "{base}/projects/{project_id}/calculations/basic",
            StageName::Stage3 => "{base}/projects/{project_id}/calculations/stage3",
            StageName::Stage4 => "{base}/projects/{project_id}/calculations/stage4",
            StageName::Stage6 => "{base}/projects/{project_id}/calculations/stage6",
            StageName::Stage7 => "{base}/projects/{project_id}/calculations/stage7",
            StageName::Stage8 => "{base}/projects/{project_id}/calculations/stage8",
        }
    }

    pub fn endpoint(&self, stage: StageName) -> &str {
        self.stage_endpoints
            .get(&stage)
            .map_or(Self::default_endpoint(stage), String::as_str)
    }
}

impl ReportConfig {
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        // An empty document deserializes as unit, not as an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ReportConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if !self.page_height.is_finite() || !self.margin.is_finite() {
            return Err(AppError::Config(
                "page_height and margin must be finite".to_string(),
            ));
        }
        if self.margin < 0.0 || self.page_height <= 2.0 * self.margin {
            return Err(AppError::Config(format!(
                "page_height ({}) must exceed twice the margin ({})",
                self.page_height, self.margin
            )));
        }
        if self.http.timeout_ms == 0 {
            return Err(AppError::Config("http.timeout_ms must be > 0".to_string()));
        }
        if self.http.listing_page_cap == 0 {
            return Err(AppError::Config(
                "http.listing_page_cap must be > 0".to_string(),
            ));
        }
        self.layout
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))
    }
}

/// Load report configuration from a YAML file.
pub fn load_config(path: &Path) -> AppResult<ReportConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    ReportConfig::from_yaml_str(&content)
}
