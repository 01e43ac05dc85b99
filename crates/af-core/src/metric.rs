//! Canonical `{value, unit}` metric.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Unit label attached to every canonical metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "mg/L")]
    MgPerL,
    #[serde(rename = "mg/day")]
    MgPerDay,
    #[serde(rename = "kg/day")]
    KgPerDay,
    #[serde(rename = "g/day")]
    GPerDay,
    #[serde(rename = "g/m³/day")]
    GPerM3Day,
    #[serde(rename = "m²/m³")]
    M2PerM3,
    #[serde(rename = "m³/hr")]
    M3PerHr,
    #[serde(rename = "L/min")]
    LPerMin,
    #[serde(rename = "m³")]
    M3,
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "°C")]
    Celsius,
    #[serde(rename = "ppt")]
    Ppt,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "kg")]
    Kg,
    #[serde(rename = "kg/m³")]
    KgPerM3,
    #[serde(rename = "kW")]
    Kilowatt,
    #[serde(rename = "count")]
    Count,
    #[serde(rename = "ratio")]
    Ratio,
}

impl Unit {
    pub fn label(self) -> &'static str {
        match self {
            Unit::MgPerL => "mg/L",
            Unit::MgPerDay => "mg/day",
            Unit::KgPerDay => "kg/day",
            Unit::GPerDay => "g/day",
            Unit::GPerM3Day => "g/m³/day",
            Unit::M2PerM3 => "m²/m³",
            Unit::M3PerHr => "m³/hr",
            Unit::LPerMin => "L/min",
            Unit::M3 => "m³",
            Unit::Meter => "m",
            Unit::Celsius => "°C",
            Unit::Ppt => "ppt",
            Unit::Percent => "%",
            Unit::Kg => "kg",
            Unit::KgPerM3 => "kg/m³",
            Unit::Kilowatt => "kW",
            Unit::Count => "count",
            Unit::Ratio => "ratio",
        }
    }

    /// Decimal places used when a value in this unit is printed.
    pub fn decimals(self) -> usize {
        match self {
            Unit::MgPerDay | Unit::Count | Unit::GPerDay => 0,
            Unit::LPerMin | Unit::Celsius | Unit::Percent | Unit::Ppt | Unit::Kg => 1,
            Unit::KgPerDay => 3,
            _ => 2,
        }
    }

    /// Dimensionless units print without a suffix.
    fn suffix(self) -> Option<&'static str> {
        match self {
            Unit::Count | Unit::Ratio => None,
            Unit::Percent => Some("%"),
            other => Some(other.label()),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized physical quantity. `value == None` means "not available".
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMetric {
    pub value: Option<f64>,
    pub unit: Unit,
}

impl CanonicalMetric {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self {
            value: Some(value),
            unit,
        }
    }

    pub fn null(unit: Unit) -> Self {
        Self { value: None, unit }
    }

    /// Derive a metric in `unit` by applying `f` to this metric's value.
    pub fn derive(&self, unit: Unit, f: impl FnOnce(f64) -> f64) -> Self {
        Self {
            value: self.value.map(f),
            unit,
        }
    }

    /// Printable form, `-` when unavailable.
    pub fn display(&self) -> String {
        match self.value {
            None => "-".to_string(),
            Some(v) => {
                let number = format!("{:.*}", self.unit.decimals(), v);
                match self.unit.suffix() {
                    Some("%") => format!("{number}%"),
                    Some(suffix) => format!("{number} {suffix}"),
                    None => number,
                }
            }
        }
    }
}

impl fmt::Display for CanonicalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
