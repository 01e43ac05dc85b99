//! Stage merge and dependency checks.

use std::collections::BTreeMap;
use std::fmt;

use af_core::{CanonicalMetric, StageName};
use af_normalize::{MassBalance, NormalizedSubReport, Stage6Result, Stage7Result, Stage8Result, StageBody};
use serde::{Deserialize, Serialize};

/// Something the assembler noticed and corrected while merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// `dropped` was discarded because `missing` was not supplied.
    DependencyViolation { dropped: StageName, missing: StageName },
    /// The stage payload was not an object; its metrics are all null.
    MalformedPayload { stage: StageName },
    /// A second sub-report for an already filled stage was ignored.
    DuplicateStage { stage: StageName },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DependencyViolation { dropped, missing } => {
                write!(f, "{dropped} results dropped: {missing} results are missing")
            }
            Diagnostic::MalformedPayload { stage } => {
                write!(f, "{stage} payload was malformed; values are unavailable")
            }
            Diagnostic::DuplicateStage { stage } => {
                write!(f, "duplicate {stage} results ignored")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedReport {
    pub mass_balance: Option<MassBalance>,
    /// Advanced stages that were supplied. Holds `stage8` only with `stage7`.
    pub stage_results: BTreeMap<StageName, StageBody>,
    pub diagnostics: Vec<Diagnostic>,
}

impl NormalizedReport {
    pub fn has_stage(&self, stage: StageName) -> bool {
        match stage {
            StageName::Basic => self.mass_balance.is_some(),
            _ => self.stage_results.contains_key(&stage),
        }
    }

    pub fn stage(&self, stage: StageName) -> Option<&StageBody> {
        self.stage_results.get(&stage)
    }

    pub fn stage6(&self) -> Option<&Stage6Result> {
        match self.stage(StageName::Stage6) {
            Some(StageBody::Stage6(s)) => Some(s),
            _ => None,
        }
    }

    pub fn stage7(&self) -> Option<&Stage7Result> {
        match self.stage(StageName::Stage7) {
            Some(StageBody::Stage7(s)) => Some(s),
            _ => None,
        }
    }

    pub fn stage8(&self) -> Option<&Stage8Result> {
        match self.stage(StageName::Stage8) {
            Some(StageBody::Stage8(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up a canonical metric by its key in any supplied stage.
    pub fn metric(&self, stage: StageName, key: &str) -> Option<&CanonicalMetric> {
        match stage {
            StageName::Basic => self.mass_balance.as_ref()?.metric(key),
            _ => self.stage(stage)?.metric(key),
        }
    }
}

struct Slot {
    malformed: bool,
    body: StageBody,
}

/// Merge sub-reports keyed by stage.
///
/// The first well-formed sub-report of a stage is kept. A malformed one only
/// fills an empty slot and is replaced by a later well-formed one. Stages
/// whose dependency is absent are dropped.
pub fn assemble(subreports: impl IntoIterator<Item = NormalizedSubReport>) -> NormalizedReport {
    let mut slots: BTreeMap<StageName, Slot> = BTreeMap::new();
    let mut diagnostics = Vec::new();

    for sub in subreports {
        let stage = sub.stage;
        if sub.malformed {
            diagnostics.push(Diagnostic::MalformedPayload { stage });
        }
        match slots.get_mut(&stage) {
            None => {
                slots.insert(
                    stage,
                    Slot {
                        malformed: sub.malformed,
                        body: sub.body,
                    },
                );
            }
            Some(slot) if slot.malformed && !sub.malformed => {
                slot.malformed = false;
                slot.body = sub.body;
            }
            Some(_) => {
                tracing::debug!(stage = %stage, "ignoring duplicate sub-report");
                diagnostics.push(Diagnostic::DuplicateStage { stage });
            }
        }
    }

    for stage in StageName::ALL {
        let Some(missing) = stage.depends_on() else {
            continue;
        };
        if slots.contains_key(&stage) && !slots.contains_key(&missing) {
            tracing::warn!(dropped = %stage, missing = %missing, "dropping stage without its dependency");
            slots.remove(&stage);
            diagnostics.push(Diagnostic::DependencyViolation { dropped: stage, missing });
        }
    }

    let mut report = NormalizedReport {
        diagnostics,
        ..NormalizedReport::default()
    };
    for (stage, slot) in slots {
        match slot.body {
            StageBody::Basic(mass_balance) => report.mass_balance = Some(mass_balance),
            body => {
                report.stage_results.insert(stage, body);
            }
        }
    }
    report
}
