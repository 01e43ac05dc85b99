//! Declarative alias tables: one entry per canonical field, grouped by stage.
//!
//! Aliases are tried in order; the first one that resolves to a finite number
//! wins. Keys and aliases of per-life-stage fields are templates over `{ls}`
//! (life-stage name) and `{n}` (1-based stage number).

use af_core::units::defaults;
use af_core::{Parameter, StageName, Unit, m3_per_hr_to_l_per_min, mg_per_day_to_kg_per_day};

/// What a field resolves to when no alias matches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Null,
    Value(f64),
}

/// A field computed from the field it is attached to, never looked up.
#[derive(Debug, Clone, Copy)]
pub struct Derived {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: Unit,
    pub convert: fn(f64) -> f64,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: Unit,
    pub aliases: &'static [&'static str],
    pub default: FieldDefault,
    pub derived: Option<Derived>,
}

impl FieldSpec {
    const fn null(
        key: &'static str,
        label: &'static str,
        unit: Unit,
        aliases: &'static [&'static str],
    ) -> Self {
        Self {
            key,
            label,
            unit,
            aliases,
            default: FieldDefault::Null,
            derived: None,
        }
    }

    const fn or(mut self, default: f64) -> Self {
        self.default = FieldDefault::Value(default);
        self
    }

    const fn with(mut self, derived: Derived) -> Self {
        self.derived = Some(derived);
        self
    }

    pub fn is_per_life_stage(&self) -> bool {
        self.key.contains("{ls}")
    }
}

/// Canonical fields of one mass-balance parameter group.
#[derive(Debug, Clone, Copy)]
pub struct BalanceSpec {
    pub parameter: Parameter,
    pub saturation: FieldSpec,
    pub effluent: FieldSpec,
    pub production: FieldSpec,
    pub threshold: FieldSpec,
}

impl BalanceSpec {
    pub fn fields(&self) -> [&FieldSpec; 4] {
        [&self.saturation, &self.effluent, &self.production, &self.threshold]
    }
}

const fn kg_per_day(key: &'static str) -> Derived {
    Derived {
        key,
        label: "Production (kg/day)",
        unit: Unit::KgPerDay,
        convert: mg_per_day_to_kg_per_day,
    }
}

const fn l_per_min(key: &'static str, label: &'static str) -> Derived {
    Derived {
        key,
        label,
        unit: Unit::LPerMin,
        convert: m3_per_hr_to_l_per_min,
    }
}

pub mod basic {
    use super::*;

    pub const INPUTS: &[FieldSpec] = &[
        FieldSpec::null(
            "inputs.water_temperature",
            "Water Temperature",
            Unit::Celsius,
            &["water_temperature_c", "temperature_c", "inputs.water_temperature", "water_temp"],
        )
        .or(defaults::WATER_TEMPERATURE_C),
        FieldSpec::null(
            "inputs.salinity",
            "Salinity",
            Unit::Ppt,
            &["salinity_ppt", "inputs.salinity", "salinity"],
        )
        .or(defaults::SALINITY_PPT),
        FieldSpec::null(
            "inputs.elevation",
            "Site Elevation",
            Unit::Meter,
            &["elevation_m", "inputs.elevation", "site_elevation"],
        )
        .or(defaults::ELEVATION_M),
    ];

    pub const OXYGEN: BalanceSpec = BalanceSpec {
        parameter: Parameter::Oxygen,
        saturation: FieldSpec::null(
            "oxygen.saturation",
            "Saturation (adjusted)",
            Unit::MgPerL,
            &[
                "o2_saturation_adjusted_mg_l",
                "oxygen.saturation_adjusted",
                "o2_sat_adjusted",
                "oxygen_saturation_adjusted",
            ],
        ),
        effluent: FieldSpec::null(
            "oxygen.effluent",
            "Effluent Concentration",
            Unit::MgPerL,
            &["o2_effluent_mg_l", "min_do_mg_l", "oxygen.effluent_concentration", "oxygen.effluent"],
        ),
        production: FieldSpec::null(
            "oxygen.production_mg_day",
            "Consumption (mg/day)",
            Unit::MgPerDay,
            &[
                "o2_production_mg",
                "oxygen.production_mg_day",
                "oxygen_consumption_mg_day",
                "o2_consumption_mg",
            ],
        )
        .with(kg_per_day("oxygen.production_kg_day")),
        threshold: FieldSpec::null(
            "oxygen.threshold",
            "Minimum Use Threshold",
            Unit::MgPerL,
            &["o2_min_use_mg_l", "oxygen.min_threshold", "min_do_use"],
        ),
    };

    pub const TSS: BalanceSpec = BalanceSpec {
        parameter: Parameter::Tss,
        saturation: FieldSpec::null("tss.saturation", "Saturation", Unit::MgPerL, &[]),
        effluent: FieldSpec::null(
            "tss.effluent",
            "Effluent Concentration",
            Unit::MgPerL,
            &["tss_effluent_mg_l", "tss.effluent_concentration", "tss_effluent"],
        ),
        production: FieldSpec::null(
            "tss.production_mg_day",
            "Production (mg/day)",
            Unit::MgPerDay,
            &["tss_production_mg", "tss.production_mg_day", "tss_mg_day"],
        )
        .with(kg_per_day("tss.production_kg_day")),
        threshold: FieldSpec::null(
            "tss.threshold",
            "Maximum Allowed",
            Unit::MgPerL,
            &["tss_max_mg_l", "tss.max_threshold", "max_tss"],
        ),
    };

    pub const CO2: BalanceSpec = BalanceSpec {
        parameter: Parameter::Co2,
        saturation: FieldSpec::null(
            "co2.saturation",
            "Saturation",
            Unit::MgPerL,
            &["co2_saturation_mg_l", "co2.saturation", "co2_sat"],
        ),
        effluent: FieldSpec::null(
            "co2.effluent",
            "Effluent Concentration",
            Unit::MgPerL,
            &["co2_effluent_mg_l", "co2.effluent_concentration", "co2_effluent"],
        ),
        production: FieldSpec::null(
            "co2.production_mg_day",
            "Production (mg/day)",
            Unit::MgPerDay,
            &["co2_production_mg", "co2.production_mg_day", "co2_mg_day"],
        )
        .with(kg_per_day("co2.production_kg_day")),
        threshold: FieldSpec::null(
            "co2.threshold",
            "Maximum Allowed",
            Unit::MgPerL,
            &["co2_max_mg_l", "co2.max_threshold", "max_co2"],
        ),
    };

    pub const TAN: BalanceSpec = BalanceSpec {
        parameter: Parameter::Tan,
        saturation: FieldSpec::null("tan.saturation", "Saturation", Unit::MgPerL, &[]),
        effluent: FieldSpec::null(
            "tan.effluent",
            "Effluent Concentration",
            Unit::MgPerL,
            &["tan_effluent_mg_l", "tan.effluent_concentration", "tan_effluent"],
        ),
        production: FieldSpec::null(
            "tan.production_mg_day",
            "Production (mg/day)",
            Unit::MgPerDay,
            &["tan_production_mg", "tan.production_mg_day", "tan_mg_day"],
        )
        .with(kg_per_day("tan.production_kg_day")),
        threshold: FieldSpec::null(
            "tan.threshold",
            "Maximum Allowed",
            Unit::MgPerL,
            &["tan_max_mg_l", "tan.max_threshold", "max_tan"],
        ),
    };

    pub const BALANCES: &[&BalanceSpec] = &[&OXYGEN, &TSS, &CO2, &TAN];
}

pub mod stage3 {
    use super::*;

    pub const TARGETS: &[FieldSpec] = &[
        FieldSpec::null(
            "targets.dissolved_oxygen",
            "Dissolved Oxygen Target",
            Unit::MgPerL,
            &["do_target_mg_l", "targets.dissolved_oxygen", "target_do"],
        ),
        FieldSpec::null(
            "targets.temperature",
            "Water Temperature",
            Unit::Celsius,
            &["temperature_c", "targets.temperature", "water_temperature_c"],
        )
        .or(defaults::WATER_TEMPERATURE_C),
        FieldSpec::null("targets.ph", "pH", Unit::Ratio, &["ph", "targets.ph", "target_ph"]),
        FieldSpec::null(
            "targets.alkalinity",
            "Alkalinity (as CaCO3)",
            Unit::MgPerL,
            &["alkalinity_mg_l", "targets.alkalinity", "alkalinity"],
        ),
        FieldSpec::null(
            "targets.salinity",
            "Salinity",
            Unit::Ppt,
            &["salinity_ppt", "targets.salinity", "salinity"],
        )
        .or(defaults::SALINITY_PPT),
    ];
}

pub mod stage4 {
    use super::*;

    pub const PLAN: &[FieldSpec] = &[
        FieldSpec::null(
            "plan.biomass",
            "Target Biomass",
            Unit::Kg,
            &["biomass_kg", "plan.biomass", "target_biomass_kg"],
        ),
        FieldSpec::null(
            "plan.feed_rate",
            "Feed Rate",
            Unit::KgPerDay,
            &["feed_rate_kg_day", "plan.feed_rate", "daily_feed_kg"],
        ),
        FieldSpec::null("plan.fcr", "Feed Conversion Ratio", Unit::Ratio, &["fcr", "plan.fcr"]),
        FieldSpec::null(
            "plan.stocking_density",
            "Stocking Density",
            Unit::KgPerM3,
            &["stocking_density_kg_m3", "plan.stocking_density", "density_kg_m3"],
        ),
        FieldSpec::null(
            "plan.feed_protein",
            "Feed Protein",
            Unit::Percent,
            &["feed_protein_pct", "plan.feed_protein", "protein_pct"],
        ),
    ];
}

pub mod stage6 {
    use super::*;

    pub const FLOWS: &[FieldSpec] = &[
        FieldSpec::null(
            "{ls}.oxygen_flow",
            "Oxygen Flow Requirement",
            Unit::M3PerHr,
            &["{ls}.oxygen.flow_m3_hr", "{ls}_o2_flow_m3_hr", "stage{n}_oxygen_flow", "stage{n}.o2_flow"],
        ),
        FieldSpec::null(
            "{ls}.tss_flow",
            "TSS Flow Requirement",
            Unit::M3PerHr,
            &["{ls}.tss.flow_m3_hr", "{ls}_tss_flow_m3_hr", "stage{n}_tss_flow", "stage{n}.tss_flow"],
        ),
        FieldSpec::null(
            "{ls}.co2_flow",
            "CO2 Flow Requirement",
            Unit::M3PerHr,
            &["{ls}.co2.flow_m3_hr", "{ls}_co2_flow_m3_hr", "stage{n}_co2_flow", "stage{n}.co2_flow"],
        ),
        FieldSpec::null(
            "{ls}.tan_flow",
            "TAN Flow Requirement",
            Unit::M3PerHr,
            &["{ls}.tan.flow_m3_hr", "{ls}_tan_flow_m3_hr", "stage{n}_tan_flow", "stage{n}.tan_flow"],
        ),
        FieldSpec::null(
            "{ls}.biomass",
            "Biomass",
            Unit::Kg,
            &["{ls}.biomass_kg", "{ls}_biomass_kg", "stage{n}_biomass_kg"],
        ),
    ];

    pub static LIMITING_FLOW: FieldSpec = FieldSpec::null(
        "{ls}.limiting_flow",
        "Governing Flow",
        Unit::M3PerHr,
        &["{ls}.limiting_flow_m3_hr", "{ls}.required_flow", "stage{n}_limiting_flow"],
    )
    .with(l_per_min("{ls}.limiting_flow_lpm", "Governing Flow (L/min)"));

    pub const LIMITING_FACTOR_ALIASES: &[&str] =
        &["{ls}.limiting_factor", "stage{n}_limiting_factor", "{ls}_limiting"];

    /// Key of the required-flow field for `parameter`.
    pub fn flow_key(parameter: Parameter) -> &'static str {
        match parameter {
            Parameter::Oxygen => "{ls}.oxygen_flow",
            Parameter::Tss => "{ls}.tss_flow",
            Parameter::Co2 => "{ls}.co2_flow",
            Parameter::Tan => "{ls}.tan_flow",
        }
    }
}

pub mod stage7 {
    use super::*;

    pub const BIOFILTER: &[FieldSpec] = &[
        FieldSpec::null(
            "biofilter.media_volume",
            "Media Volume",
            Unit::M3,
            &["biofilter.media_volume_m3", "media_volume_m3", "bio_media_volume"],
        ),
        FieldSpec::null(
            "biofilter.vtr",
            "Volumetric TAN Removal",
            Unit::GPerM3Day,
            &["biofilter.vtr", "vtr_g_m3_day", "volumetric_tan_removal"],
        ),
        FieldSpec::null(
            "biofilter.specific_surface_area",
            "Specific Surface Area",
            Unit::M2PerM3,
            &["biofilter.specific_surface_area", "ssa_m2_m3", "media_ssa"],
        ),
        FieldSpec::null(
            "biofilter.tan_removal",
            "TAN Removed",
            Unit::GPerDay,
            &["biofilter.tan_removal_g_day", "tan_removed_g_day", "tan_removal_g_day"],
        ),
        FieldSpec::null(
            "biofilter.removal_efficiency",
            "Removal Efficiency",
            Unit::Percent,
            &["biofilter.removal_efficiency", "tan_removal_efficiency_pct"],
        ),
    ];

    pub const OVERVIEW: &[FieldSpec] = &[
        FieldSpec::null(
            "overview.total_flow",
            "Total System Flow",
            Unit::M3PerHr,
            &["system.total_flow_m3_hr", "total_flow_m3_hr", "overview.total_flow"],
        )
        .with(l_per_min("overview.total_flow_lpm", "Total System Flow (L/min)")),
        FieldSpec::null(
            "overview.system_volume",
            "Total System Volume",
            Unit::M3,
            &["system.total_volume_m3", "total_system_volume_m3", "overview.system_volume"],
        ),
        FieldSpec::null(
            "overview.tank_count",
            "Total Tanks",
            Unit::Count,
            &["system.tank_count", "total_tanks", "overview.tanks"],
        ),
        FieldSpec::null(
            "overview.makeup_water",
            "Make-up Water",
            Unit::Percent,
            &["system.makeup_water_pct", "makeup_water_pct", "overview.makeup_water"],
        ),
    ];

    pub const VESSEL: &[FieldSpec] = &[
        FieldSpec::null(
            "{ls}.tank_volume",
            "Tank Volume",
            Unit::M3,
            &["{ls}.tank_volume_m3", "stage{n}_tank_volume", "{ls}.vessel.volume_m3"],
        ),
        FieldSpec::null(
            "{ls}.tank_count",
            "Number of Tanks",
            Unit::Count,
            &["{ls}.tank_count", "stage{n}_tank_count", "{ls}.vessel.count"],
        ),
        FieldSpec::null(
            "{ls}.tank_diameter",
            "Tank Diameter",
            Unit::Meter,
            &["{ls}.tank_diameter_m", "stage{n}_tank_diameter", "{ls}.vessel.diameter_m"],
        ),
        FieldSpec::null(
            "{ls}.tank_depth",
            "Tank Depth",
            Unit::Meter,
            &["{ls}.tank_depth_m", "stage{n}_tank_depth", "{ls}.vessel.depth_m"],
        ),
        FieldSpec::null(
            "{ls}.sump_volume",
            "Sump Volume",
            Unit::M3,
            &["{ls}.sump_volume_m3", "stage{n}_sump_volume", "{ls}.sump.volume_m3"],
        ),
    ];
}

pub mod stage8 {
    use super::*;

    pub const PUMP: &[FieldSpec] = &[
        FieldSpec::null(
            "{ls}.pump_flow",
            "Pump Flow",
            Unit::M3PerHr,
            &["{ls}.pump.flow_m3_hr", "stage{n}_pump_flow_m3_hr", "{ls}_pump_flow"],
        )
        .with(l_per_min("{ls}.pump_flow_lpm", "Pump Flow (L/min)")),
        FieldSpec::null(
            "{ls}.pump_head",
            "Total Dynamic Head",
            Unit::Meter,
            &["{ls}.pump.total_dynamic_head_m", "stage{n}_tdh_m", "{ls}.pump.head_m"],
        ),
        FieldSpec::null(
            "{ls}.pump_power",
            "Pump Power",
            Unit::Kilowatt,
            &["{ls}.pump.power_kw", "stage{n}_pump_power_kw", "{ls}.pump.motor_kw"],
        ),
        FieldSpec::null(
            "{ls}.pump_efficiency",
            "Pump Efficiency",
            Unit::Percent,
            &["{ls}.pump.efficiency_pct", "stage{n}_pump_efficiency"],
        ),
        FieldSpec::null(
            "{ls}.pump_count",
            "Number of Pumps",
            Unit::Count,
            &["{ls}.pump.count", "stage{n}_pump_count"],
        ),
    ];
}

/// Every looked-up (non-derived) field of `stage`.
pub fn alias_table(stage: StageName) -> Vec<&'static FieldSpec> {
    match stage {
        StageName::Basic => basic::INPUTS
            .iter()
            .chain(basic::BALANCES.iter().flat_map(|b| b.fields()))
            .collect(),
        StageName::Stage3 => stage3::TARGETS.iter().collect(),
        StageName::Stage4 => stage4::PLAN.iter().collect(),
        StageName::Stage6 => stage6::FLOWS
            .iter()
            .chain(std::iter::once(&stage6::LIMITING_FLOW))
            .collect(),
        StageName::Stage7 => stage7::BIOFILTER
            .iter()
            .chain(stage7::OVERVIEW)
            .chain(stage7::VESSEL)
            .collect(),
        StageName::Stage8 => stage8::PUMP.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique_within_each_stage() {
        for stage in StageName::ALL {
            let mut seen = HashSet::new();
            for spec in alias_table(stage) {
                assert!(seen.insert(spec.key), "duplicate key {} in {stage}", spec.key);
                if let Some(derived) = spec.derived {
                    assert!(seen.insert(derived.key), "duplicate key {}", derived.key);
                }
            }
        }
    }

    #[test]
    fn thresholds_never_carry_a_default() {
        for balance in basic::BALANCES {
            assert_eq!(balance.threshold.default, FieldDefault::Null);
        }
    }

    #[test]
    fn every_production_field_derives_kg_per_day() {
        for balance in basic::BALANCES {
            let derived = balance.production.derived.expect("kg/day companion");
            assert_eq!(derived.unit, Unit::KgPerDay);
            assert_eq!((derived.convert)(1_000_000.0), 1.0);
        }
    }
}
