//! Lenient parsing of design/project listing pages.
//!
//! Listing endpoints have returned designs as a bare array or wrapped in an
//! envelope, with camelCase or snake_case keys, numeric or string ids, and
//! species as a list or a comma-separated string.

use serde_json::{Map, Value};

use crate::record::{DesignRecord, ProjectKind, ProjectRecord, parse_timestamp};
use crate::{RecordsError, RecordsResult};

const ENVELOPE_KEYS: &[&str] = &["results", "designs", "data", "items"];

const DESIGN_ID: &[&str] = &["design_id", "designId", "id"];
const DESIGN_SYSTEM_NAME: &[&str] = &["design_system_name", "designSystemName", "system_name", "name"];
const DESIGN_PROJECT_NAME: &[&str] = &["project_name", "projectName"];
const DESIGN_PROJECTS: &[&str] = &["projects", "project_list"];

const PROJECT_ID: &[&str] = &["id", "project_id", "projectId"];
const PROJECT_NAME: &[&str] = &["name", "project_name", "projectName", "title"];
const PROJECT_SPECIES: &[&str] = &["species_names", "speciesNames", "species", "species_name"];
const PROJECT_TYPE: &[&str] = &["type", "project_type", "projectType"];
const PROJECT_SYSTEM_NAME: &[&str] = &["design_system_name", "designSystemName", "system_name"];
const CREATED_AT: &[&str] = &["created_at", "createdAt", "created", "created_on"];

fn first<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}

fn text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match map.get(*k)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// The first string value, exactly as sent.
fn raw_text<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| map.get(*k)?.as_str())
}

fn species(map: &Map<String, Value>) -> Vec<String> {
    let names: Vec<String> = match first(map, PROJECT_SPECIES) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => text(obj, &["name", "common_name", "species_name"]),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

fn created_at(map: &Map<String, Value>) -> Option<chrono::DateTime<chrono::Utc>> {
    text(map, CREATED_AT).and_then(|raw| parse_timestamp(&raw))
}

pub(crate) fn parse_project(map: &Map<String, Value>) -> ProjectRecord {
    ProjectRecord {
        id: text(map, PROJECT_ID),
        name: text(map, PROJECT_NAME).unwrap_or_default(),
        species_names: species(map),
        kind: ProjectKind::classify(raw_text(map, PROJECT_TYPE)),
        design_system_name: text(map, PROJECT_SYSTEM_NAME),
        created_at: created_at(map),
    }
}

fn parse_design(map: &Map<String, Value>) -> DesignRecord {
    let projects = match first(map, DESIGN_PROJECTS) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item.as_object() {
                Some(obj) => Some(parse_project(obj)),
                None => {
                    tracing::warn!("skipping non-object project entry");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    };
    DesignRecord {
        design_id: text(map, DESIGN_ID),
        design_system_name: text(map, DESIGN_SYSTEM_NAME),
        project_name: text(map, DESIGN_PROJECT_NAME),
        created_at: created_at(map),
        projects,
    }
}

/// A bare project entry (no `projects` array) becomes a design of one.
fn parse_entry(map: &Map<String, Value>) -> DesignRecord {
    if first(map, DESIGN_PROJECTS).is_some() {
        return parse_design(map);
    }
    let project = parse_project(map);
    DesignRecord {
        design_id: None,
        design_system_name: project.design_system_name.clone(),
        project_name: Some(project.name.clone()).filter(|n| !n.is_empty()),
        created_at: project.created_at,
        projects: vec![project],
    }
}

/// Parse one listing page into design records, in page order.
pub fn parse_listing_page(page: &Value) -> RecordsResult<Vec<DesignRecord>> {
    let entries = match page {
        Value::Array(items) => items,
        Value::Object(map) => ENVELOPE_KEYS
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_array))
            .ok_or_else(|| RecordsError::InvalidListing {
                what: format!(
                    "object page without any of the {} envelope keys",
                    ENVELOPE_KEYS.join("/")
                ),
            })?,
        other => {
            return Err(RecordsError::InvalidListing {
                what: format!("expected an array or object page, got {other}"),
            });
        }
    };

    let mut designs = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.as_object() {
            Some(map) => designs.push(parse_entry(map)),
            None => tracing::warn!("skipping non-object listing entry"),
        }
    }
    Ok(designs)
}

/// Parse a listing page from raw JSON text.
pub fn parse_listing(json: &str) -> RecordsResult<Vec<DesignRecord>> {
    let page: Value = serde_json::from_str(json)?;
    parse_listing_page(&page)
}
