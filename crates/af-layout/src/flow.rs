//! Greedy page flow over a single vertical cursor.
//!
//! Pass one walks the flattened block stream and cuts draft pages; pass two
//! stamps footers once the final page count is known.

use crate::config::LayoutConfig;
use crate::document::{Block, BlockKind, Document, Footer, Page};
use crate::section::Section;

pub const DEFAULT_ATTRIBUTION: &str = "Generated by AquaFlow System Design";

/// A block waiting for placement, with its estimated heights.
#[derive(Debug, Clone)]
struct Pending {
    kind: BlockKind,
    section: usize,
    height: f64,
    /// Minimum height that must start on the same page.
    start_height: f64,
    /// Height of table body rows; zero for headers.
    body_height: f64,
}

impl Pending {
    fn is_header(&self) -> bool {
        self.kind.is_header()
    }
}

#[derive(Debug, Default)]
struct DraftPage {
    carried_over: f64,
    blocks: Vec<Block>,
}

impl DraftPage {
    fn continuation(carried_over: f64) -> Self {
        Self {
            carried_over,
            blocks: Vec::new(),
        }
    }

    /// Nothing placed and the cursor at the top margin: breaking here would
    /// only produce another empty page. Page 1 below its title block is not
    /// fresh.
    fn is_fresh(&self, y: f64, frame: Frame) -> bool {
        self.blocks.is_empty() && self.carried_over == 0.0 && y <= frame.margin
    }

    fn ends_with_header(&self) -> bool {
        self.blocks.last().is_some_and(|b| b.kind.is_header())
    }
}

/// Page geometry resolved for one layout call.
#[derive(Debug, Clone, Copy)]
struct Frame {
    margin: f64,
    usable: f64,
    bottom: f64,
}

impl Frame {
    fn new(page_height: f64, margin: f64) -> Self {
        let usable = (page_height - 2.0 * margin).max(1.0);
        Self {
            margin,
            usable,
            bottom: margin + usable,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageFlowEngine {
    config: LayoutConfig,
    title: String,
    attribution: String,
    generated_at: Option<String>,
}

impl Default for PageFlowEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl PageFlowEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            title: String::new(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
            generated_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }

    pub fn with_generated_at(mut self, generated_at: impl Into<String>) -> Self {
        self.generated_at = Some(generated_at.into());
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay `sections` out on pages of `page_height` with `margin` top and bottom.
    pub fn layout(&self, sections: &[Section], page_height: f64, margin: f64) -> Document {
        let frame = Frame::new(page_height, margin);
        let pending = self.flatten(sections);
        let (drafts, overflowed) = self.flow(&pending, frame);
        let pages = stamp_footers(drafts, &self.attribution);

        tracing::debug!(
            sections = sections.len(),
            blocks = pending.len(),
            pages = pages.len(),
            overflowed,
            "laid out document"
        );

        Document {
            title: self.title.clone(),
            generated_at: self.generated_at.clone(),
            page_height,
            margin,
            overflowed,
            pages,
        }
    }

    fn flatten(&self, sections: &[Section]) -> Vec<Pending> {
        let cfg = &self.config;
        let mut out = Vec::new();
        for (index, section) in sections.iter().enumerate() {
            out.push(Pending {
                kind: BlockKind::SectionHeader {
                    title: section.title.clone(),
                },
                section: index,
                height: cfg.section_header_height,
                start_height: cfg.section_header_height,
                body_height: 0.0,
            });
            for sub in &section.subsections {
                if let Some(title) = &sub.title {
                    out.push(Pending {
                        kind: BlockKind::SubsectionHeader {
                            title: title.clone(),
                        },
                        section: index,
                        height: cfg.subsection_header_height,
                        start_height: cfg.subsection_header_height,
                        body_height: 0.0,
                    });
                }
                out.push(Pending {
                    kind: BlockKind::Table {
                        table: sub.table.clone(),
                    },
                    section: index,
                    height: cfg.table_height(&sub.table),
                    start_height: cfg.table_start_height(&sub.table),
                    body_height: cfg.body_height(&sub.table),
                });
            }
        }
        out
    }

    /// Index of the first non-header block at or after `from`.
    fn next_body(pending: &[Pending], from: usize) -> Option<usize> {
        (from..pending.len()).find(|&j| !pending[j].is_header())
    }

    /// Space that must remain on the page before block `i` may start there.
    ///
    /// A header reserves itself, every header chained after it and the
    /// following table: the whole table when that unit fits on an empty page,
    /// otherwise the table's header row plus first body row.
    fn reserved_height(pending: &[Pending], i: usize, usable: f64) -> f64 {
        let block = &pending[i];
        if !block.is_header() {
            return block.start_height;
        }
        let body = Self::next_body(pending, i);
        let headers: f64 = pending[i..body.unwrap_or(pending.len())]
            .iter()
            .map(|b| b.height)
            .sum();
        match body.map(|j| &pending[j]) {
            Some(table) if headers + table.height <= usable => headers + table.height,
            Some(table) => headers + table.start_height,
            None => headers,
        }
    }

    /// True when block `i` (with its header chain) cannot fit on an empty page.
    fn exceeds_page(pending: &[Pending], i: usize, usable: f64) -> bool {
        let body_too_tall = Self::next_body(pending, i).is_some_and(|j| pending[j].height > usable);
        body_too_tall || Self::reserved_height(pending, i, usable) > usable
    }

    fn flow(&self, pending: &[Pending], frame: Frame) -> (Vec<DraftPage>, bool) {
        let mut drafts = Vec::new();
        let mut page = DraftPage::default();
        let mut y = (frame.margin + self.config.title_block_height).min(frame.bottom);
        let mut overflowed = false;

        for (i, block) in pending.iter().enumerate() {
            // A block following a header on the same page is bound to it.
            if !page.ends_with_header() {
                if Self::exceeds_page(pending, i, frame.usable) {
                    overflowed = true;
                    tracing::warn!(
                        section = block.section,
                        height = block.height,
                        usable = frame.usable,
                        "block taller than an empty page; placing at top of a fresh page"
                    );
                    if !page.is_fresh(y, frame) {
                        drafts.push(std::mem::take(&mut page));
                        y = frame.margin;
                    }
                } else {
                    let remaining = frame.bottom - y;
                    let needed = Self::reserved_height(pending, i, frame.usable);
                    if remaining < needed && !page.is_fresh(y, frame) {
                        drafts.push(std::mem::take(&mut page));
                        y = frame.margin;
                    }
                }
            }

            page.blocks.push(Block {
                kind: block.kind.clone(),
                section: block.section,
                y,
                height: block.height,
            });
            y += block.height;

            if !block.is_header() {
                if y > frame.bottom {
                    // Only body rows carry over; the header row is repeated.
                    let overflow = (y - frame.bottom).min(block.body_height);
                    y = self.spill(overflow, frame, &mut drafts, &mut page);
                }
                y = (y + self.config.table_gap).min(frame.bottom);
            }
        }

        drafts.push(page);
        (drafts, overflowed)
    }

    /// Continue a table that ran `overflow` past the bottom of the page onto
    /// continuation pages. Returns the cursor below the spilled rows.
    fn spill(
        &self,
        overflow: f64,
        frame: Frame,
        drafts: &mut Vec<DraftPage>,
        page: &mut DraftPage,
    ) -> f64 {
        let repeat = self.config.table_header_height.min(frame.usable);
        let capacity = (frame.usable - repeat).max(self.config.row_height).max(1.0);
        let mut remaining = overflow;

        drafts.push(std::mem::take(page));
        while remaining > capacity {
            drafts.push(DraftPage::continuation(frame.usable));
            remaining -= capacity;
        }
        let carried = (repeat + remaining).min(frame.usable);
        *page = DraftPage::continuation(carried);
        frame.margin + carried
    }
}

/// Second pass: number pages now that the total is fixed.
fn stamp_footers(drafts: Vec<DraftPage>, attribution: &str) -> Vec<Page> {
    let total_pages = drafts.len();
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            let page_number = index + 1;
            Page {
                number: page_number,
                carried_over: draft.carried_over,
                blocks: draft.blocks,
                footer: Footer {
                    page_number,
                    total_pages,
                    text: format!("Page {page_number} of {total_pages}"),
                    attribution: attribution.to_string(),
                },
            }
        })
        .collect()
}

/// Lay out with default estimates, no title and the default attribution.
pub fn layout(sections: &[Section], page_height: f64, margin: f64) -> Document {
    PageFlowEngine::default().layout(sections, page_height, margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{Row, Section};

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|i| Row::new(format!("p{i}"), "1")).collect()
    }

    fn tight_config() -> LayoutConfig {
        LayoutConfig {
            title_block_height: 0.0,
            section_header_height: 20.0,
            subsection_header_height: 10.0,
            table_header_height: 20.0,
            row_height: 20.0,
            table_gap: 0.0,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn empty_input_yields_one_page() {
        let doc = layout(&[], 842.0, 40.0);
        assert_eq!(doc.page_count(), 1);
        assert!(doc.pages[0].blocks.is_empty());
        assert_eq!(doc.pages[0].footer.text, "Page 1 of 1");
        assert!(!doc.overflowed);
    }

    #[test]
    fn header_moves_with_its_table() {
        // usable = 200; first section takes 140, second needs 20 + 80.
        let engine = PageFlowEngine::new(tight_config());
        let sections = vec![
            Section::new("A").with_untitled_table(rows(5)),
            Section::new("B").with_untitled_table(rows(3)),
        ];
        let doc = engine.layout(&sections, 240.0, 20.0);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[1].blocks[0].kind, BlockKind::SectionHeader { title: "B".into() });
        assert_eq!(doc.pages[1].blocks[0].y, 20.0);
    }

    #[test]
    fn long_table_spills_onto_continuation_page() {
        // usable = 200: header 20 + table (20 + 12 * 20 = 260) does not fit
        // anywhere whole, so the table starts under its header and spills.
        let engine = PageFlowEngine::new(tight_config());
        let sections = vec![Section::new("A").with_untitled_table(rows(12))];
        let doc = engine.layout(&sections, 240.0, 20.0);
        assert!(doc.overflowed);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[0].blocks.len(), 2);
        // 20 + 260 = 280 used, 200 available: 80 spills plus a repeated header row.
        assert_eq!(doc.pages[1].carried_over, 100.0);
        assert!(doc.pages[1].blocks.is_empty());
    }

    #[test]
    fn oversized_unit_starts_on_fresh_page() {
        let engine = PageFlowEngine::new(tight_config());
        let sections = vec![
            Section::new("A").with_untitled_table(rows(1)),
            Section::new("B").with_untitled_table(rows(30)),
        ];
        let doc = engine.layout(&sections, 240.0, 20.0);
        assert!(doc.overflowed);
        let second = &doc.pages[1];
        assert_eq!(second.blocks[0].kind, BlockKind::SectionHeader { title: "B".into() });
        assert_eq!(second.blocks[0].y, 20.0);
        assert!(matches!(second.blocks[1].kind, BlockKind::Table { .. }));
    }

    #[test]
    fn footers_carry_final_total() {
        let engine = PageFlowEngine::new(tight_config()).with_attribution("ACME");
        let sections: Vec<_> = (0..5)
            .map(|i| Section::new(format!("S{i}")).with_untitled_table(rows(6)))
            .collect();
        let doc = engine.layout(&sections, 240.0, 20.0);
        let total = doc.page_count();
        for (i, page) in doc.pages.iter().enumerate() {
            assert_eq!(page.number, i + 1);
            assert_eq!(page.footer.total_pages, total);
            assert_eq!(page.footer.text, format!("Page {} of {total}", i + 1));
            assert_eq!(page.footer.attribution, "ACME");
        }
    }

    #[test]
    fn title_block_offsets_first_page_only() {
        let config = LayoutConfig {
            title_block_height: 50.0,
            ..tight_config()
        };
        let engine = PageFlowEngine::new(config);
        let sections: Vec<_> = (0..4)
            .map(|i| Section::new(format!("S{i}")).with_untitled_table(rows(2)))
            .collect();
        let doc = engine.layout(&sections, 240.0, 20.0);
        assert_eq!(doc.pages[0].blocks[0].y, 70.0);
        assert_eq!(doc.pages[1].blocks[0].y, 20.0);
    }

    #[test]
    fn degenerate_page_still_terminates() {
        let sections: Vec<_> = (0..3)
            .map(|i| Section::new(format!("S{i}")).with_untitled_table(rows(4)))
            .collect();
        let doc = layout(&sections, 50.0, 40.0);
        assert!(doc.overflowed);
        assert!(doc.page_count() >= 3);
    }

    #[test]
    fn first_page_under_title_is_not_fresh() {
        // usable = 110, title leaves 46 on page 1; header 26 + table 63 fits
        // whole on page 2 and must move there together.
        let engine = PageFlowEngine::new(LayoutConfig::default());
        let sections = vec![Section::new("A").with_untitled_table(rows(3))];
        let doc = engine.layout(&sections, 150.0, 20.0);

        assert!(!doc.overflowed);
        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[0].blocks.is_empty());
        let second = &doc.pages[1];
        assert_eq!(second.blocks[0].kind, BlockKind::SectionHeader { title: "A".into() });
        assert_eq!(second.blocks[0].y, 20.0);
        let table = &second.blocks[1];
        assert!(matches!(table.kind, BlockKind::Table { .. }));
        assert!(table.y + table.height <= 130.0);
    }

    #[test]
    fn huge_table_header_spills_only_body_rows() {
        for header in [f64::INFINITY, 1.0e300] {
            let engine = PageFlowEngine::new(LayoutConfig {
                table_header_height: header,
                ..tight_config()
            });
            let sections = vec![Section::new("A").with_untitled_table(rows(3))];
            let doc = engine.layout(&sections, 240.0, 20.0);
            assert!(doc.overflowed);
            assert!(doc.page_count() <= 4, "{header}: {} pages", doc.page_count());
        }
    }
}
