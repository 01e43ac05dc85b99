//! Blocking HTTP backend for stage results and project listings.

use std::time::Duration;

use af_core::StageName;
use serde_json::Value;

use crate::config::HttpConfig;
use crate::error::FetchError;
use crate::source::{CredentialProvider, ListingSource, StageSource};

pub struct HttpStageSource {
    agent: ureq::Agent,
    base_url: String,
    config: HttpConfig,
    credentials: Box<dyn CredentialProvider>,
}

impl std::fmt::Debug for HttpStageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStageSource")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpStageSource {
    pub fn new(
        base_url: impl Into<String>,
        config: &HttpConfig,
        credentials: Box<dyn CredentialProvider>,
    ) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms.max(100));
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            config: config.clone(),
            credentials,
        }
    }

    pub fn stage_url(&self, project_id: &str, stage: StageName) -> String {
        expand_url(self.config.endpoint(stage), &self.base_url, project_id.trim(), None)
    }

    pub fn listing_url(&self, page: usize) -> String {
        expand_url(&self.config.listing_endpoint, &self.base_url, "", Some(page))
    }

    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let mut request = self.agent.get(url).set("Accept", "application/json");
        if let Some(token) = self.credentials.bearer_token() {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        tracing::debug!(url, "GET");
        let response = request.call().map_err(|e| fetch_error_from_ureq(url, e))?;
        Ok(serde_json::from_reader(response.into_reader())?)
    }
}

fn expand_url(template: &str, base: &str, project_id: &str, page: Option<usize>) -> String {
    let url = template
        .replace("{base}", base)
        .replace("{project_id}", project_id);
    match page {
        Some(page) => url.replace("{page}", &page.to_string()),
        None => url,
    }
}

fn fetch_error_from_ureq(url: &str, err: ureq::Error) -> FetchError {
    match err {
        ureq::Error::Status(404, _) => FetchError::NotFound {
            what: url.to_string(),
        },
        ureq::Error::Status(status, _) => FetchError::Status {
            status,
            url: url.to_string(),
        },
        ureq::Error::Transport(transport) => FetchError::Transport(transport.to_string()),
    }
}

impl StageSource for HttpStageSource {
    fn fetch_stage(&self, project_id: &str, stage: StageName) -> Result<Value, FetchError> {
        self.get_json(&self.stage_url(project_id, stage))
    }
}

impl ListingSource for HttpStageSource {
    fn fetch_page(&self, page: usize) -> Result<Option<Value>, FetchError> {
        match self.get_json(&self.listing_url(page)) {
            Ok(Value::Null) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(FetchError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticCredentials;

    fn source(config: &HttpConfig) -> HttpStageSource {
        HttpStageSource::new(
            "https://api.example.test/",
            config,
            Box::new(StaticCredentials::anonymous()),
        )
    }

    #[test]
    fn stage_urls_expand_templates() {
        let s = source(&HttpConfig::default());
        assert_eq!(
            s.stage_url(" p-42 ", StageName::Stage6),
            "https://api.example.test/projects/p-42/calculations/stage6"
        );
        assert_eq!(s.listing_url(3), "https://api.example.test/designs?page=3");
    }

    #[test]
    fn stage_override_is_used() {
        let mut config = HttpConfig::default();
        config
            .stage_endpoints
            .insert(StageName::Basic, "{base}/mass-balance/{project_id}".to_string());
        let s = source(&config);
        assert_eq!(
            s.stage_url("7", StageName::Basic),
            "https://api.example.test/mass-balance/7"
        );
    }
}
