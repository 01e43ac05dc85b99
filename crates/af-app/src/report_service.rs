//! Report build service: fetch, normalize, assemble, lay out.

use std::path::Path;

use af_core::StageName;
use af_layout::{Document, PageFlowEngine, Section};
use af_normalize::{NormalizedSubReport, normalize};
use af_report::{NormalizedReport, assemble, build_sections};
use rayon::prelude::*;
use serde_json::Value;

use crate::config::ReportConfig;
use crate::error::{AppError, AppResult, FetchError, StageFailure};
use crate::source::StageSource;

/// Everything produced for one project.
#[derive(Debug, Clone)]
pub struct ReportBuild {
    pub report: NormalizedReport,
    pub sections: Vec<Section>,
    pub document: Document,
}

/// Fetch every stage in parallel. Results come back in `StageName::ALL` order.
pub fn fetch_stages(
    source: &dyn StageSource,
    project_id: &str,
) -> Vec<(StageName, Result<Value, FetchError>)> {
    StageName::ALL
        .par_iter()
        .map(|&stage| (stage, source.fetch_stage(project_id, stage)))
        .collect()
}

/// Build the paginated report for `project_id`.
///
/// Fails with [`AppError::MissingRequiredStage`] when a required stage could
/// not be fetched or was malformed. Optional stages that fail are left out.
pub fn build_report(
    project_id: &str,
    source: &dyn StageSource,
    config: &ReportConfig,
    generated_at: Option<String>,
) -> AppResult<ReportBuild> {
    let project_id = project_id.trim();
    if project_id.is_empty() {
        return Err(AppError::InvalidInput("project id is empty".to_string()));
    }

    let mut failures = Vec::new();
    let mut subreports = Vec::with_capacity(StageName::ALL.len());
    for (stage, fetched) in fetch_stages(source, project_id) {
        match fetched {
            Ok(raw) => {
                let sub = normalize(stage, &raw);
                if sub.malformed && stage.is_required() {
                    failures.push(StageFailure {
                        stage,
                        reason: "malformed payload".to_string(),
                    });
                }
                subreports.push(sub);
            }
            Err(err) if stage.is_required() => {
                tracing::warn!(project_id, stage = %stage, %err, "required stage unavailable");
                failures.push(StageFailure {
                    stage,
                    reason: err.to_string(),
                });
            }
            Err(err) => {
                tracing::debug!(project_id, stage = %stage, %err, "optional stage unavailable");
            }
        }
    }
    if !failures.is_empty() {
        return Err(AppError::MissingRequiredStage {
            project_id: project_id.to_string(),
            failures,
        });
    }

    let report = assemble(subreports);
    let sections = build_sections(&report);

    let mut engine = PageFlowEngine::new(config.layout.clone())
        .with_title(config.title.as_str())
        .with_attribution(config.attribution.as_str());
    if let Some(stamp) = generated_at {
        engine = engine.with_generated_at(stamp);
    }
    let document = engine.layout(&sections, config.page_height, config.margin);

    tracing::info!(
        project_id,
        stages = report.stage_results.len() + usize::from(report.mass_balance.is_some()),
        pages = document.page_count(),
        "built report"
    );

    Ok(ReportBuild {
        report,
        sections,
        document,
    })
}

/// Normalize a single stage payload read from `path`.
pub fn normalize_file(stage: StageName, path: &Path) -> AppResult<NormalizedSubReport> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let raw: Value = serde_json::from_str(&content)?;
    Ok(normalize(stage, &raw))
}
