//! Canonical project and design records.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed two-way project classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Basic,
    Advanced,
}

impl ProjectKind {
    /// Exactly `"advanced"` is advanced; anything else, including no type, is basic.
    pub fn classify(raw_type: Option<&str>) -> Self {
        match raw_type {
            Some("advanced") => ProjectKind::Advanced,
            _ => ProjectKind::Basic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectKind::Basic => "basic",
            ProjectKind::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: Option<String>,
    pub name: String,
    pub species_names: Vec<String>,
    pub kind: ProjectKind,
    pub design_system_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ProjectRecord {
    /// The id, if it is non-blank.
    pub fn usable_id(&self) -> Option<&str> {
        usable(self.id.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignRecord {
    pub design_id: Option<String>,
    pub design_system_name: Option<String>,
    pub project_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub projects: Vec<ProjectRecord>,
}

impl DesignRecord {
    pub fn usable_id(&self) -> Option<&str> {
        usable(self.design_id.as_deref())
    }
}

/// Category tally of a project list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCounts {
    pub basic: usize,
    pub advanced: usize,
}

impl ProjectCounts {
    pub fn tally<'a>(projects: impl IntoIterator<Item = &'a ProjectRecord>) -> Self {
        projects
            .into_iter()
            .fold(Self::default(), |mut counts, p| {
                match p.kind {
                    ProjectKind::Basic => counts.basic += 1,
                    ProjectKind::Advanced => counts.advanced += 1,
                }
                counts
            })
    }

    pub fn total(&self) -> usize {
        self.basic + self.advanced
    }
}

pub(crate) fn usable(id: Option<&str>) -> Option<&str> {
    id.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse the timestamp formats seen on listing endpoints.
///
/// RFC 3339 first, then naive date-times (taken as UTC), then bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn classification_is_exact_match_on_advanced() {
        assert_eq!(ProjectKind::classify(Some("advanced")), ProjectKind::Advanced);
        assert_eq!(ProjectKind::classify(Some("Advanced")), ProjectKind::Basic);
        assert_eq!(ProjectKind::classify(Some("premium")), ProjectKind::Basic);
        assert_eq!(ProjectKind::classify(None), ProjectKind::Basic);
    }

    #[test]
    fn timestamps_in_several_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T14:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T12:30:00.000"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01 12:30:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn blank_ids_are_not_usable() {
        assert_eq!(usable(Some("  ")), None);
        assert_eq!(usable(Some(" 42 ")), Some("42"));
        assert_eq!(usable(None), None);
    }
}
