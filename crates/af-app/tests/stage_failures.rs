//! Required-stage failure aggregation over arbitrary fetch outcomes.

use std::collections::HashMap;

use af_app::{AppError, FetchError, ReportConfig, StageSource, build_report};
use af_core::StageName;
use proptest::prelude::*;
use serde_json::{Value, json};

struct Outcomes(HashMap<StageName, Value>);

impl StageSource for Outcomes {
    fn fetch_stage(&self, project_id: &str, stage: StageName) -> Result<Value, FetchError> {
        self.0.get(&stage).cloned().ok_or(FetchError::NotFound {
            what: format!("{project_id}/{stage}"),
        })
    }
}

proptest! {
    /// The build fails exactly when a required stage is missing, and names
    /// every missing required stage in stage order whatever the optional
    /// stages did.
    #[test]
    fn failures_name_exactly_the_missing_required_stages(
        present in proptest::collection::vec(any::<bool>(), StageName::ALL.len()),
    ) {
        let stages: HashMap<StageName, Value> = StageName::ALL
            .into_iter()
            .zip(&present)
            .filter(|(_, up)| **up)
            .map(|(stage, _)| (stage, json!({})))
            .collect();
        let missing: Vec<StageName> = StageName::ALL
            .into_iter()
            .filter(|s| s.is_required() && !stages.contains_key(s))
            .collect();

        let result = build_report("p-1", &Outcomes(stages), &ReportConfig::default(), None);
        match result {
            Ok(_) => prop_assert!(missing.is_empty()),
            Err(AppError::MissingRequiredStage { failures, .. }) => {
                let named: Vec<StageName> = failures.iter().map(|f| f.stage).collect();
                prop_assert_eq!(named, missing);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
