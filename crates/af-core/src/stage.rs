//! Computation stages, fish life stages and limiting-factor parameters.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// One backend computation pass producing its own result payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageName {
    Basic,
    Stage3,
    Stage4,
    Stage6,
    Stage7,
    Stage8,
}

impl StageName {
    /// Every stage, in fetch order.
    pub const ALL: [StageName; 6] = [
        StageName::Basic,
        StageName::Stage3,
        StageName::Stage4,
        StageName::Stage6,
        StageName::Stage7,
        StageName::Stage8,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StageName::Basic => "basic",
            StageName::Stage3 => "stage3",
            StageName::Stage4 => "stage4",
            StageName::Stage6 => "stage6",
            StageName::Stage7 => "stage7",
            StageName::Stage8 => "stage8",
        }
    }

    /// A report cannot be built without the required stages.
    pub fn is_required(self) -> bool {
        matches!(self, StageName::Basic | StageName::Stage6)
    }

    /// The stage whose output this stage consumes, if any.
    pub fn depends_on(self) -> Option<StageName> {
        match self {
            StageName::Stage8 => Some(StageName::Stage7),
            _ => None,
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        StageName::ALL
            .into_iter()
            .find(|stage| stage.as_str() == lower)
            .ok_or(CoreError::UnknownStage {
                name: s.to_string(),
            })
    }
}

/// Life-cycle stage of the stock; stage numbers are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifeStage {
    Juvenile,
    Fingerling,
    Growout,
}

impl LifeStage {
    pub const ALL: [LifeStage; 3] = [LifeStage::Juvenile, LifeStage::Fingerling, LifeStage::Growout];

    pub fn as_str(self) -> &'static str {
        match self {
            LifeStage::Juvenile => "juvenile",
            LifeStage::Fingerling => "fingerling",
            LifeStage::Growout => "growout",
        }
    }

    pub fn number(self) -> u8 {
        match self {
            LifeStage::Juvenile => 1,
            LifeStage::Fingerling => 2,
            LifeStage::Growout => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            LifeStage::Juvenile => "Juvenile",
            LifeStage::Fingerling => "Fingerling",
            LifeStage::Growout => "Grow-out",
        }
    }
}

impl fmt::Display for LifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Water-quality constraint that can govern the required flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Oxygen,
    Tss,
    Co2,
    Tan,
}

impl Parameter {
    pub const ALL: [Parameter; 4] = [Parameter::Oxygen, Parameter::Tss, Parameter::Co2, Parameter::Tan];

    pub fn as_str(self) -> &'static str {
        match self {
            Parameter::Oxygen => "oxygen",
            Parameter::Tss => "tss",
            Parameter::Co2 => "co2",
            Parameter::Tan => "tan",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Parameter::Oxygen => "Oxygen",
            Parameter::Tss => "TSS",
            Parameter::Co2 => "CO2",
            Parameter::Tan => "TAN",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Parameter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oxygen" | "o2" | "do" | "dissolved oxygen" => Ok(Parameter::Oxygen),
            "tss" | "solids" => Ok(Parameter::Tss),
            "co2" | "carbon dioxide" => Ok(Parameter::Co2),
            "tan" | "ammonia" => Ok(Parameter::Tan),
            _ => Err(CoreError::UnknownParameter {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_round_trip_through_strings() {
        for stage in StageName::ALL {
            assert_eq!(stage.as_str().parse::<StageName>().unwrap(), stage);
        }
        assert!("stage5".parse::<StageName>().is_err());
    }

    #[test]
    fn only_basic_and_stage6_are_required() {
        let required: Vec<_> = StageName::ALL
            .into_iter()
            .filter(|s| s.is_required())
            .collect();
        assert_eq!(required, vec![StageName::Basic, StageName::Stage6]);
    }

    #[test]
    fn stage_serializes_lowercase() {
        let json = serde_json::to_string(&StageName::Stage7).unwrap();
        assert_eq!(json, "\"stage7\"");
    }

    #[test]
    fn parameter_parses_common_spellings() {
        assert_eq!("O2".parse::<Parameter>().unwrap(), Parameter::Oxygen);
        assert_eq!(" TAN ".parse::<Parameter>().unwrap(), Parameter::Tan);
        assert!("nitrate".parse::<Parameter>().is_err());
    }
}
