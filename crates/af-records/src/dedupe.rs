//! Duplicate collapsing for records pulled from overlapping listing pages.
//!
//! Identity is the usable id; records without one fall back to a secondary
//! identity (`(name, species)` for projects, `(design system, project name)`
//! for designs). Records are ordered by descending `created_at` before the
//! first-wins pass, so the latest record survives a collision.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{DesignRecord, ProjectCounts, ProjectRecord, usable};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Identity {
    Id(String),
    Secondary(String, Vec<String>),
    /// Nothing to match on; never collides.
    Unique(usize),
}

fn project_identity(record: &ProjectRecord, position: usize) -> Identity {
    if let Some(id) = record.usable_id() {
        return Identity::Id(id.to_string());
    }
    let name = record.name.trim();
    if name.is_empty() {
        return Identity::Unique(position);
    }
    let species = record
        .species_names
        .iter()
        .map(|s| s.trim().to_string())
        .collect();
    Identity::Secondary(name.to_string(), species)
}

fn design_identity(record: &DesignRecord, position: usize) -> Identity {
    if let Some(id) = record.usable_id() {
        return Identity::Id(id.to_string());
    }
    match (
        usable(record.design_system_name.as_deref()),
        usable(record.project_name.as_deref()),
    ) {
        (Some(system), project) => Identity::Secondary(
            system.to_string(),
            project.map(str::to_string).into_iter().collect(),
        ),
        (None, _) => Identity::Unique(position),
    }
}

/// Stable sort, latest first; records without a timestamp go last.
fn sort_latest_first<T>(records: &mut [T], created_at: impl Fn(&T) -> Option<DateTime<Utc>>) {
    records.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

/// Collapse duplicate projects, latest `created_at` first.
pub fn dedupe(records: impl IntoIterator<Item = ProjectRecord>) -> Vec<ProjectRecord> {
    let mut records: Vec<ProjectRecord> = records.into_iter().collect();
    sort_latest_first(&mut records, |r| r.created_at);

    let before = records.len();
    let mut seen = HashSet::with_capacity(before);
    let kept: Vec<ProjectRecord> = records
        .into_iter()
        .enumerate()
        .filter(|(position, record)| seen.insert(project_identity(record, *position)))
        .map(|(_, record)| record)
        .collect();

    if kept.len() < before {
        tracing::debug!(dropped = before - kept.len(), kept = kept.len(), "collapsed duplicate projects");
    }
    kept
}

/// Collapse duplicate designs. Projects of a dropped duplicate are folded into
/// the design that survives, then deduplicated there.
pub fn dedupe_designs(designs: impl IntoIterator<Item = DesignRecord>) -> Vec<DesignRecord> {
    let mut designs: Vec<DesignRecord> = designs.into_iter().collect();
    sort_latest_first(&mut designs, |d| d.created_at);

    let mut kept: Vec<DesignRecord> = Vec::with_capacity(designs.len());
    let mut identities: Vec<Identity> = Vec::with_capacity(designs.len());
    for (position, design) in designs.into_iter().enumerate() {
        let identity = design_identity(&design, position);
        match identities.iter().position(|known| *known == identity) {
            Some(index) => kept[index].projects.extend(design.projects),
            None => {
                identities.push(identity);
                kept.push(design);
            }
        }
    }

    for design in &mut kept {
        let projects = std::mem::take(&mut design.projects);
        design.projects = dedupe(projects);
    }
    kept
}

/// Lift every project out of its design, inheriting the design system name
/// and creation time where the project lacks them.
pub fn flatten_projects(designs: &[DesignRecord]) -> Vec<ProjectRecord> {
    designs
        .iter()
        .flat_map(|design| {
            design.projects.iter().map(move |project| {
                let mut project = project.clone();
                if project.design_system_name.is_none() {
                    project.design_system_name = design.design_system_name.clone();
                }
                if project.created_at.is_none() {
                    project.created_at = design.created_at;
                }
                project
            })
        })
        .collect()
}

/// Deduplicated designs and projects of a whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub designs: Vec<DesignRecord>,
    pub projects: Vec<ProjectRecord>,
    pub counts: ProjectCounts,
}

impl RecordSet {
    pub fn from_designs(designs: impl IntoIterator<Item = DesignRecord>) -> Self {
        let designs = dedupe_designs(designs);
        let projects = dedupe(flatten_projects(&designs));
        let counts = ProjectCounts::tally(&projects);
        Self {
            designs,
            projects,
            counts,
        }
    }

    /// Project ids to fetch stage results for, in listing order.
    pub fn project_ids(&self) -> Vec<&str> {
        self.projects.iter().filter_map(|p| p.usable_id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ProjectKind, parse_timestamp};

    fn project(id: Option<&str>, name: &str, species: &[&str], created: Option<&str>) -> ProjectRecord {
        ProjectRecord {
            id: id.map(str::to_string),
            name: name.to_string(),
            species_names: species.iter().map(|s| s.to_string()).collect(),
            kind: ProjectKind::Basic,
            design_system_name: None,
            created_at: created.and_then(parse_timestamp),
        }
    }

    #[test]
    fn latest_record_wins_on_shared_id() {
        let older = project(Some("p1"), "Old name", &["Tilapia"], Some("2024-01-01"));
        let newer = project(Some("p1"), "New name", &["Tilapia"], Some("2024-06-01"));
        let out = dedupe(vec![older, newer]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "New name");
    }

    #[test]
    fn idless_records_match_on_name_and_species() {
        let a = project(None, "Pond 4", &["Carp"], Some("2024-02-01"));
        let b = project(Some(""), " Pond 4 ", &["Carp "], Some("2024-03-01"));
        let c = project(None, "Pond 4", &["Catfish"], Some("2024-01-01"));
        let out = dedupe(vec![a, b, c]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].species_names, vec!["Carp ".to_string()]);
        assert_eq!(out[1].species_names, vec!["Catfish".to_string()]);
    }

    #[test]
    fn id_and_idless_records_stay_distinct() {
        let with_id = project(Some("p1"), "Pond", &["Carp"], None);
        let without = project(None, "Pond", &["Carp"], None);
        assert_eq!(dedupe(vec![with_id, without]).len(), 2);
    }

    #[test]
    fn nameless_idless_records_never_merge() {
        let a = project(None, "", &[], None);
        let b = project(None, "", &[], None);
        assert_eq!(dedupe(vec![a, b]).len(), 2);
    }

    #[test]
    fn output_is_latest_first_with_undated_last() {
        let out = dedupe(vec![
            project(Some("a"), "A", &[], None),
            project(Some("b"), "B", &[], Some("2023-01-01")),
            project(Some("c"), "C", &[], Some("2025-01-01")),
        ]);
        let ids: Vec<_> = out.iter().map(|p| p.id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn duplicate_designs_fold_their_projects() {
        let d1 = DesignRecord {
            design_id: Some("d1".into()),
            design_system_name: Some("RAS".into()),
            project_name: None,
            created_at: parse_timestamp("2024-05-01"),
            projects: vec![project(Some("p1"), "A", &[], None)],
        };
        let mut d1_again = d1.clone();
        d1_again.created_at = parse_timestamp("2024-01-01");
        d1_again.projects = vec![
            project(Some("p1"), "A", &[], None),
            project(Some("p2"), "B", &[], None),
        ];

        let designs = dedupe_designs(vec![d1_again, d1]);
        assert_eq!(designs.len(), 1);
        assert_eq!(designs[0].created_at, parse_timestamp("2024-05-01"));
        assert_eq!(designs[0].projects.len(), 2);
    }

    #[test]
    fn designs_without_id_match_on_system_and_project_name() {
        let a = DesignRecord {
            design_id: None,
            design_system_name: Some("Hatchery".into()),
            project_name: Some("Salmon smolt".into()),
            created_at: None,
            projects: Vec::new(),
        };
        let mut b = a.clone();
        b.project_name = Some("Trout".into());
        let designs = dedupe_designs(vec![a.clone(), a, b]);
        assert_eq!(designs.len(), 2);
    }

    #[test]
    fn record_set_inherits_design_metadata_and_counts() {
        let mut advanced = project(Some("p2"), "B", &[], None);
        advanced.kind = ProjectKind::Advanced;
        let design = DesignRecord {
            design_id: Some("d1".into()),
            design_system_name: Some("RAS North".into()),
            project_name: None,
            created_at: parse_timestamp("2024-05-01"),
            projects: vec![project(Some("p1"), "A", &[], None), advanced],
        };
        let set = RecordSet::from_designs(vec![design]);
        assert_eq!(set.projects.len(), 2);
        assert!(set.projects.iter().all(|p| p.design_system_name.as_deref() == Some("RAS North")));
        assert_eq!(set.counts, ProjectCounts { basic: 1, advanced: 1 });
        assert_eq!(set.counts.total(), 2);
        assert_eq!(set.project_ids(), vec!["p1", "p2"]);
    }
}
