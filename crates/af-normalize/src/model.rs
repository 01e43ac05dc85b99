//! Canonical per-stage result model.

use af_core::{CanonicalMetric, LifeStage, Parameter, StageName};
use serde::{Deserialize, Serialize};

/// A canonical metric together with its stable key and printable label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedMetric {
    pub key: String,
    pub label: String,
    pub metric: CanonicalMetric,
}

/// Ordered list of named metrics; order is the print order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub entries: Vec<NamedMetric>,
}

impl MetricSet {
    pub fn get(&self, key: &str) -> Option<&CanonicalMetric> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedMetric> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterBalance {
    pub parameter: Parameter,
    pub saturation: CanonicalMetric,
    pub effluent: CanonicalMetric,
    pub production_mg_day: CanonicalMetric,
    pub production_kg_day: CanonicalMetric,
    pub threshold: CanonicalMetric,
}

impl ParameterBalance {
    fn get(&self, field: &str) -> Option<&CanonicalMetric> {
        match field {
            "saturation" => Some(&self.saturation),
            "effluent" => Some(&self.effluent),
            "production_mg_day" => Some(&self.production_mg_day),
            "production_kg_day" => Some(&self.production_kg_day),
            "threshold" => Some(&self.threshold),
            _ => None,
        }
    }

    fn entries(&self) -> [(&'static str, &CanonicalMetric); 5] {
        [
            ("saturation", &self.saturation),
            ("effluent", &self.effluent),
            ("production_mg_day", &self.production_mg_day),
            ("production_kg_day", &self.production_kg_day),
            ("threshold", &self.threshold),
        ]
    }
}

/// Basic-stage mass balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassBalance {
    pub inputs: MetricSet,
    pub oxygen: ParameterBalance,
    pub tss: ParameterBalance,
    pub co2: ParameterBalance,
    pub tan: ParameterBalance,
}

impl MassBalance {
    pub fn balances(&self) -> [&ParameterBalance; 4] {
        [&self.oxygen, &self.tss, &self.co2, &self.tan]
    }

    pub fn balance(&self, parameter: Parameter) -> &ParameterBalance {
        match parameter {
            Parameter::Oxygen => &self.oxygen,
            Parameter::Tss => &self.tss,
            Parameter::Co2 => &self.co2,
            Parameter::Tan => &self.tan,
        }
    }
}

/// Governing constraint of one life stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitingFactor {
    pub parameter: Option<Parameter>,
    /// True when the parameter was picked from the flows rather than reported.
    pub derived: bool,
    pub flow_m3_hr: CanonicalMetric,
    pub flow_l_min: CanonicalMetric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeStageFlows {
    pub life_stage: LifeStage,
    pub flows: MetricSet,
    pub limiting: LimitingFactor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage6Result {
    pub life_stages: Vec<LifeStageFlows>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeStageSet {
    pub life_stage: LifeStage,
    pub metrics: MetricSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage7Result {
    pub biofilter: MetricSet,
    pub overview: MetricSet,
    pub vessels: Vec<LifeStageSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage8Result {
    pub pumps: Vec<LifeStageSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "data", rename_all = "lowercase")]
pub enum StageBody {
    Basic(MassBalance),
    Stage3(MetricSet),
    Stage4(MetricSet),
    Stage6(Stage6Result),
    Stage7(Stage7Result),
    Stage8(Stage8Result),
}

impl StageBody {
    pub fn stage(&self) -> StageName {
        match self {
            StageBody::Basic(_) => StageName::Basic,
            StageBody::Stage3(_) => StageName::Stage3,
            StageBody::Stage4(_) => StageName::Stage4,
            StageBody::Stage6(_) => StageName::Stage6,
            StageBody::Stage7(_) => StageName::Stage7,
            StageBody::Stage8(_) => StageName::Stage8,
        }
    }

    /// Look up any canonical field by its (expanded) key.
    pub fn metric(&self, key: &str) -> Option<&CanonicalMetric> {
        self.metrics()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, m)| m)
    }

    /// Every canonical field with its key, in print order.
    pub fn metrics(&self) -> Vec<(String, &CanonicalMetric)> {
        let mut out = Vec::new();
        match self {
            StageBody::Basic(mb) => {
                extend_set(&mut out, &mb.inputs);
                for balance in mb.balances() {
                    for (field, metric) in balance.entries() {
                        out.push((format!("{}.{field}", balance.parameter.as_str()), metric));
                    }
                }
            }
            StageBody::Stage3(set) | StageBody::Stage4(set) => extend_set(&mut out, set),
            StageBody::Stage6(s6) => {
                for ls in &s6.life_stages {
                    extend_set(&mut out, &ls.flows);
                    let prefix = ls.life_stage.as_str();
                    out.push((format!("{prefix}.limiting_flow"), &ls.limiting.flow_m3_hr));
                    out.push((format!("{prefix}.limiting_flow_lpm"), &ls.limiting.flow_l_min));
                }
            }
            StageBody::Stage7(s7) => {
                extend_set(&mut out, &s7.biofilter);
                extend_set(&mut out, &s7.overview);
                for vessel in &s7.vessels {
                    extend_set(&mut out, &vessel.metrics);
                }
            }
            StageBody::Stage8(s8) => {
                for pump in &s8.pumps {
                    extend_set(&mut out, &pump.metrics);
                }
            }
        }
        out
    }
}

fn extend_set<'a>(out: &mut Vec<(String, &'a CanonicalMetric)>, set: &'a MetricSet) {
    out.extend(set.iter().map(|e| (e.key.clone(), &e.metric)));
}

impl MassBalance {
    /// Look up `inputs.*` or `<parameter>.<field>`.
    pub fn metric(&self, key: &str) -> Option<&CanonicalMetric> {
        if let Some(m) = self.inputs.get(key) {
            return Some(m);
        }
        let (param, field) = key.split_once('.')?;
        let parameter = param.parse::<Parameter>().ok()?;
        self.balance(parameter).get(field)
    }
}

/// Output of normalizing one stage payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSubReport {
    pub stage: StageName,
    /// The payload was not a JSON object; every metric is null.
    pub malformed: bool,
    pub body: StageBody,
}

impl NormalizedSubReport {
    pub fn metric(&self, key: &str) -> Option<&CanonicalMetric> {
        self.body.metric(key)
    }

    pub fn metrics(&self) -> Vec<(String, &CanonicalMetric)> {
        self.body.metrics()
    }
}
