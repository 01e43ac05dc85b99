//! Finished, paginated document.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::section::Table;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    SectionHeader { title: String },
    SubsectionHeader { title: String },
    Table { table: Table },
}

impl BlockKind {
    pub fn is_header(&self) -> bool {
        matches!(
            self,
            BlockKind::SectionHeader { .. } | BlockKind::SubsectionHeader { .. }
        )
    }
}

/// A block placed on a page at vertical offset `y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    /// Index of the section this block came from.
    pub section: usize,
    pub y: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footer {
    pub page_number: usize,
    pub total_pages: usize,
    pub text: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    /// Height at the top of the page taken by a table spilled from the
    /// previous page (repeated header row included).
    pub carried_over: f64,
    pub blocks: Vec<Block>,
    pub footer: Footer,
}

impl Page {
    pub fn last_block(&self) -> Option<&Block> {
        self.blocks.last()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    /// Export timestamp; metadata only, never part of the spatial layout.
    pub generated_at: Option<String>,
    pub page_height: f64,
    pub margin: f64,
    /// Some block could not fit on an empty page and was placed anyway.
    pub overflowed: bool,
    pub pages: Vec<Page>,
}

/// Everything that determines the spatial layout.
#[derive(Serialize)]
struct LayoutFingerprint<'a> {
    title: &'a str,
    page_height: f64,
    margin: f64,
    overflowed: bool,
    pages: &'a [Page],
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn blocks(&self) -> impl Iterator<Item = (&Page, &Block)> {
        self.pages
            .iter()
            .flat_map(|page| page.blocks.iter().map(move |block| (page, block)))
    }

    /// SHA-256 over the layout, excluding `generated_at`.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let view = LayoutFingerprint {
            title: &self.title,
            page_height: self.page_height,
            margin: self.margin,
            overflowed: self.overflowed,
            pages: &self.pages,
        };
        let json = serde_json::to_string(&view)?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}
