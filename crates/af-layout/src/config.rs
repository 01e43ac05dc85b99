//! Height estimates driving the page flow. All lengths are in points.

use serde::{Deserialize, Serialize};

use crate::section::{Row, Table};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("layout.{field} must be a finite, non-negative length (got {value})")]
    InvalidLength { field: &'static str, value: f64 },

    #[error("layout.row_height must be > 0 (got {value})")]
    ZeroRowHeight { value: f64 },

    #[error("layout.{field} must be > 0")]
    ZeroLineWidth { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Title and timestamp block at the top of the first page.
    pub title_block_height: f64,
    pub section_header_height: f64,
    pub subsection_header_height: f64,
    /// Column header row; repeated at the top of every continuation page.
    pub table_header_height: f64,
    /// Height of one wrapped line of a body row.
    pub row_height: f64,
    /// Characters per line in the `Parameter` column before wrapping.
    pub parameter_chars_per_line: usize,
    /// Characters per line in the `Value` column before wrapping.
    pub value_chars_per_line: usize,
    /// Vertical space after every table.
    pub table_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            title_block_height: 64.0,
            section_header_height: 26.0,
            subsection_header_height: 20.0,
            table_header_height: 18.0,
            row_height: 15.0,
            parameter_chars_per_line: 44,
            value_chars_per_line: 30,
            table_gap: 10.0,
        }
    }
}

impl LayoutConfig {
    fn lines(text: &str, chars_per_line: usize) -> usize {
        let chars = text.chars().count();
        chars.div_ceil(chars_per_line.max(1)).max(1)
    }

    pub fn row_height(&self, row: &Row) -> f64 {
        let lines = Self::lines(&row.parameter, self.parameter_chars_per_line)
            .max(Self::lines(&row.value, self.value_chars_per_line));
        lines as f64 * self.row_height
    }

    /// Body rows only; the part of a table that can spill onto later pages.
    pub fn body_height(&self, table: &Table) -> f64 {
        table.rows.iter().map(|r| self.row_height(r)).sum()
    }

    pub fn table_height(&self, table: &Table) -> f64 {
        self.table_header_height + self.body_height(table)
    }

    /// Header row plus first body row: the part of a table that must start
    /// on the same page.
    pub fn table_start_height(&self, table: &Table) -> f64 {
        self.table_header_height + table.rows.first().map_or(0.0, |r| self.row_height(r))
    }

    /// Every length finite and non-negative, rows and line widths non-zero.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let lengths = [
            ("title_block_height", self.title_block_height),
            ("section_header_height", self.section_header_height),
            ("subsection_header_height", self.subsection_header_height),
            ("table_header_height", self.table_header_height),
            ("row_height", self.row_height),
            ("table_gap", self.table_gap),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidLength { field, value });
            }
        }
        if self.row_height <= 0.0 {
            return Err(LayoutError::ZeroRowHeight {
                value: self.row_height,
            });
        }
        if self.parameter_chars_per_line == 0 {
            return Err(LayoutError::ZeroLineWidth {
                field: "parameter_chars_per_line",
            });
        }
        if self.value_chars_per_line == 0 {
            return Err(LayoutError::ZeroLineWidth {
                field: "value_chars_per_line",
            });
        }
        Ok(())
    }
}
