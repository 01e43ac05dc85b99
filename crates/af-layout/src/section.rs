//! Section/table tree consumed by the page flow.

use serde::{Deserialize, Serialize};

/// One `Parameter | Value` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub parameter: String,
    pub value: String,
}

impl Row {
    pub fn new(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.into(),
        }
    }
}

/// Two-column table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: [String; 2],
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            columns: ["Parameter".to_string(), "Value".to_string()],
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsection {
    /// Untitled subsections place their table directly under the section header.
    pub title: Option<String>,
    pub table: Table,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub subsections: Vec<Subsection>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subsections: Vec::new(),
        }
    }

    pub fn with_table(mut self, title: impl Into<String>, rows: Vec<Row>) -> Self {
        self.subsections.push(Subsection {
            title: Some(title.into()),
            table: Table::new(rows),
        });
        self
    }

    pub fn with_untitled_table(mut self, rows: Vec<Row>) -> Self {
        self.subsections.push(Subsection {
            title: None,
            table: Table::new(rows),
        });
        self
    }
}
