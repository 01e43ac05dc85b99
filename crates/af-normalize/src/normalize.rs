//! Stage payload normalization.

use af_core::{CanonicalMetric, LifeStage, Parameter, StageName};
use serde_json::{Map, Value};

use crate::fields::{self, BalanceSpec, FieldDefault, FieldSpec};
use crate::model::{
    LifeStageFlows, LifeStageSet, LimitingFactor, MassBalance, MetricSet, NamedMetric,
    NormalizedSubReport, ParameterBalance, Stage6Result, Stage7Result, Stage8Result, StageBody,
};
use crate::payload::{coerce_number, coerce_text, expand, lookup};

/// Map one stage's raw payload onto its canonical field set.
///
/// Never fails: a payload that is not a JSON object yields an all-null
/// sub-report flagged `malformed`. Whether a missing or malformed stage is
/// fatal is the caller's decision.
pub fn normalize(stage: StageName, raw: &Value) -> NormalizedSubReport {
    let resolver = Resolver {
        root: raw.as_object(),
    };
    if resolver.root.is_none() {
        tracing::warn!(stage = %stage, kind = json_kind(raw), "malformed stage payload");
    }

    let body = match stage {
        StageName::Basic => StageBody::Basic(resolver.mass_balance()),
        StageName::Stage3 => StageBody::Stage3(resolver.set(fields::stage3::TARGETS, None)),
        StageName::Stage4 => StageBody::Stage4(resolver.set(fields::stage4::PLAN, None)),
        StageName::Stage6 => StageBody::Stage6(resolver.stage6()),
        StageName::Stage7 => StageBody::Stage7(resolver.stage7()),
        StageName::Stage8 => StageBody::Stage8(resolver.stage8()),
    };

    NormalizedSubReport {
        stage,
        malformed: resolver.root.is_none(),
        body,
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

struct Resolver<'a> {
    /// `None` for a malformed payload: every field resolves to null.
    root: Option<&'a Map<String, Value>>,
}

impl Resolver<'_> {
    fn lookup_number(&self, aliases: &[&str], life: Option<LifeStage>) -> Option<f64> {
        let root = self.root?;
        aliases
            .iter()
            .find_map(|alias| lookup(root, &expand(alias, life)).and_then(coerce_number))
    }

    fn lookup_text(&self, aliases: &[&str], life: Option<LifeStage>) -> Option<String> {
        let root = self.root?;
        aliases
            .iter()
            .find_map(|alias| lookup(root, &expand(alias, life)).and_then(coerce_text))
    }

    fn metric(&self, spec: &FieldSpec, life: Option<LifeStage>) -> CanonicalMetric {
        if self.root.is_none() {
            return CanonicalMetric::null(spec.unit);
        }
        match (self.lookup_number(spec.aliases, life), spec.default) {
            (Some(v), _) => CanonicalMetric::new(v, spec.unit),
            (None, FieldDefault::Value(d)) => CanonicalMetric::new(d, spec.unit),
            (None, FieldDefault::Null) => CanonicalMetric::null(spec.unit),
        }
    }

    /// Resolve `specs` in order, each followed by its derived companion.
    fn set(&self, specs: &[FieldSpec], life: Option<LifeStage>) -> MetricSet {
        let mut entries = Vec::with_capacity(specs.len() + 1);
        for spec in specs {
            let metric = self.metric(spec, life);
            entries.push(NamedMetric {
                key: expand(spec.key, life).into_owned(),
                label: spec.label.to_string(),
                metric,
            });
            if let Some(derived) = spec.derived {
                entries.push(NamedMetric {
                    key: expand(derived.key, life).into_owned(),
                    label: derived.label.to_string(),
                    metric: metric.derive(derived.unit, derived.convert),
                });
            }
        }
        MetricSet { entries }
    }

    fn balance(&self, spec: &BalanceSpec) -> ParameterBalance {
        let production_mg_day = self.metric(&spec.production, None);
        let production_kg_day = match spec.production.derived {
            Some(derived) => production_mg_day.derive(derived.unit, derived.convert),
            None => CanonicalMetric::null(af_core::Unit::KgPerDay),
        };
        ParameterBalance {
            parameter: spec.parameter,
            saturation: self.metric(&spec.saturation, None),
            effluent: self.metric(&spec.effluent, None),
            production_mg_day,
            production_kg_day,
            threshold: self.metric(&spec.threshold, None),
        }
    }

    fn mass_balance(&self) -> MassBalance {
        MassBalance {
            inputs: self.set(fields::basic::INPUTS, None),
            oxygen: self.balance(&fields::basic::OXYGEN),
            tss: self.balance(&fields::basic::TSS),
            co2: self.balance(&fields::basic::CO2),
            tan: self.balance(&fields::basic::TAN),
        }
    }

    fn stage6(&self) -> Stage6Result {
        let life_stages = LifeStage::ALL
            .into_iter()
            .map(|life| {
                let flows = self.set(fields::stage6::FLOWS, Some(life));
                let limiting = self.limiting_factor(life, &flows);
                LifeStageFlows {
                    life_stage: life,
                    flows,
                    limiting,
                }
            })
            .collect();
        Stage6Result { life_stages }
    }

    /// A reported limiting parameter wins; otherwise the parameter with the
    /// largest required flow governs (ties go to the earlier parameter).
    fn limiting_factor(&self, life: LifeStage, flows: &MetricSet) -> LimitingFactor {
        let spec = &fields::stage6::LIMITING_FLOW;
        let flow_of = |parameter: Parameter| {
            flows
                .get(&expand(fields::stage6::flow_key(parameter), Some(life)))
                .and_then(|m| m.value)
        };

        let reported = self
            .lookup_text(fields::stage6::LIMITING_FACTOR_ALIASES, Some(life))
            .and_then(|text| match text.parse::<Parameter>() {
                Ok(p) => Some(p),
                Err(err) => {
                    tracing::debug!(life_stage = %life, %err, "ignoring limiting factor");
                    None
                }
            });

        let governing = Parameter::ALL
            .into_iter()
            .filter_map(|p| flow_of(p).map(|flow| (p, flow)))
            .fold(None, |best: Option<(Parameter, f64)>, (p, flow)| match best {
                Some((_, best_flow)) if best_flow >= flow => best,
                _ => Some((p, flow)),
            });

        let (parameter, derived) = match (reported, governing) {
            (Some(p), _) => (Some(p), false),
            (None, Some((p, _))) => (Some(p), true),
            (None, None) => (None, false),
        };

        let flow_value = self
            .lookup_number(spec.aliases, Some(life))
            .or_else(|| parameter.and_then(flow_of));
        let flow_m3_hr = match flow_value {
            Some(v) => CanonicalMetric::new(v, spec.unit),
            None => CanonicalMetric::null(spec.unit),
        };
        let flow_l_min = match spec.derived {
            Some(d) => flow_m3_hr.derive(d.unit, d.convert),
            None => CanonicalMetric::null(af_core::Unit::LPerMin),
        };

        LimitingFactor {
            parameter,
            derived,
            flow_m3_hr,
            flow_l_min,
        }
    }

    fn per_life_stage(&self, specs: &[FieldSpec]) -> Vec<LifeStageSet> {
        LifeStage::ALL
            .into_iter()
            .map(|life| LifeStageSet {
                life_stage: life,
                metrics: self.set(specs, Some(life)),
            })
            .collect()
    }

    fn stage7(&self) -> Stage7Result {
        Stage7Result {
            biofilter: self.set(fields::stage7::BIOFILTER, None),
            overview: self.set(fields::stage7::OVERVIEW, None),
            vessels: self.per_life_stage(fields::stage7::VESSEL),
        }
    }

    fn stage8(&self) -> Stage8Result {
        Stage8Result {
            pumps: self.per_life_stage(fields::stage8::PUMP),
        }
    }
}
