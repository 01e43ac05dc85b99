//! Report → section tree, in the fixed print order.

use af_core::{CanonicalMetric, LifeStage};
use af_layout::{Row, Section};
use af_normalize::fields::basic::BALANCES;
use af_normalize::{LifeStageSet, MassBalance, MetricSet, ParameterBalance, Stage6Result, Stage7Result, Stage8Result};

use crate::assemble::NormalizedReport;

pub const MASS_BALANCE_TITLE: &str = "Mass Balance";
pub const FLOW_TITLE: &str = "Flow Requirements";
pub const SYSTEM_TITLE: &str = "Bio-filter & System Design";
pub const PUMP_TITLE: &str = "Pump Selection";

/// Sections of every printed stage present in `report`.
///
/// Stage 3 and stage 4 results stay in the report model but are not printed.
pub fn build_sections(report: &NormalizedReport) -> Vec<Section> {
    let mut sections = Vec::new();
    if let Some(mb) = &report.mass_balance {
        sections.push(mass_balance_section(mb));
    }
    if let Some(s6) = report.stage6() {
        sections.push(flow_section(s6));
    }
    if let Some(s7) = report.stage7() {
        sections.push(system_section(s7));
    }
    if let Some(s8) = report.stage8() {
        sections.push(pump_section(s8));
    }
    sections
}

fn row(label: &str, metric: &CanonicalMetric) -> Row {
    Row::new(label, metric.display())
}

fn set_rows(set: &MetricSet) -> Vec<Row> {
    set.iter().map(|e| row(&e.label, &e.metric)).collect()
}

fn stage_title(life: LifeStage) -> String {
    format!("Stage {} ({})", life.number(), life.title())
}

fn mass_balance_section(mb: &MassBalance) -> Section {
    let section = Section::new(MASS_BALANCE_TITLE).with_table("Design Inputs", set_rows(&mb.inputs));
    BALANCES.iter().fold(section, |section, spec| {
        let balance = mb.balance(spec.parameter);
        section.with_table(spec.parameter.title(), balance_rows(spec, balance))
    })
}

fn balance_rows(spec: &af_normalize::fields::BalanceSpec, balance: &ParameterBalance) -> Vec<Row> {
    let mut rows = Vec::with_capacity(5);
    // Saturation is only reported for dissolved gases.
    if !spec.saturation.aliases.is_empty() {
        rows.push(row(spec.saturation.label, &balance.saturation));
    }
    rows.push(row(spec.effluent.label, &balance.effluent));
    rows.push(row(spec.production.label, &balance.production_mg_day));
    if let Some(derived) = spec.production.derived {
        rows.push(row(derived.label, &balance.production_kg_day));
    }
    rows.push(row(spec.threshold.label, &balance.threshold));
    rows
}

fn flow_section(s6: &Stage6Result) -> Section {
    let mut section = Section::new(FLOW_TITLE);
    for ls in &s6.life_stages {
        section = section.with_table(stage_title(ls.life_stage), set_rows(&ls.flows));
    }

    let mut limiting = Vec::with_capacity(s6.life_stages.len() * 3);
    for ls in &s6.life_stages {
        let n = ls.life_stage.number();
        let parameter = ls.limiting.parameter.map_or("-", |p| p.title());
        limiting.push(Row::new(format!("Stage {n} Limiting Parameter"), parameter));
        limiting.push(row(&format!("Stage {n} Governing Flow"), &ls.limiting.flow_m3_hr));
        limiting.push(row(&format!("Stage {n} Governing Flow (L/min)"), &ls.limiting.flow_l_min));
    }
    section.with_table("Limiting Factor", limiting)
}

fn per_stage<'a>(
    section: Section,
    sets: &'a [LifeStageSet],
    title: impl Fn(&'a LifeStageSet) -> String,
) -> Section {
    sets.iter()
        .fold(section, |section, set| section.with_table(title(set), set_rows(&set.metrics)))
}

fn system_section(s7: &Stage7Result) -> Section {
    let section = Section::new(SYSTEM_TITLE)
        .with_table("Bio-filter Parameters", set_rows(&s7.biofilter))
        .with_table("System Overview", set_rows(&s7.overview));
    per_stage(section, &s7.vessels, |set| {
        format!("Stage {} Vessel & Sump", set.life_stage.number())
    })
}

fn pump_section(s8: &Stage8Result) -> Section {
    per_stage(Section::new(PUMP_TITLE), &s8.pumps, |set| {
        format!("Stage {} Pump", set.life_stage.number())
    })
}
