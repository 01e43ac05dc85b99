//! Page flow behaviour over whole documents.

use af_layout::{BlockKind, Document, LayoutConfig, PageFlowEngine, Row, Section};
use proptest::prelude::*;

fn rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| Row::new(format!("Parameter {i}"), format!("{i}.00 mg/L")))
        .collect()
}

fn uniform_config() -> LayoutConfig {
    LayoutConfig {
        title_block_height: 0.0,
        section_header_height: 20.0,
        subsection_header_height: 20.0,
        table_header_height: 20.0,
        row_height: 20.0,
        table_gap: 12.0,
        ..LayoutConfig::default()
    }
}

fn pages_of_section(doc: &Document, section: usize) -> Vec<usize> {
    let mut pages: Vec<usize> = doc
        .blocks()
        .filter(|(_, block)| block.section == section)
        .map(|(page, _)| page.number)
        .collect();
    pages.dedup();
    pages
}

#[test]
fn forty_small_sections_never_split() {
    // Each section is a header plus a 3-row table: 100 of 400 usable points.
    let sections: Vec<Section> = (0..40)
        .map(|i| Section::new(format!("Section {i}")).with_untitled_table(rows(3)))
        .collect();
    let engine = PageFlowEngine::new(uniform_config()).with_title("Scenario");
    let doc = engine.layout(&sections, 440.0, 20.0);

    assert!(!doc.overflowed);
    assert_eq!(doc.page_count(), 14);
    for section in 0..sections.len() {
        assert_eq!(pages_of_section(&doc, section).len(), 1, "section {section} split");
    }
    assert_eq!(doc.pages.last().map(|p| p.footer.text.as_str()), Some("Page 14 of 14"));
}

#[test]
fn subsection_headers_stay_with_their_tables() {
    // Second subsection header would fit, its table would not.
    let sections = vec![
        Section::new("Mass Balance")
            .with_table("Oxygen", rows(8))
            .with_table("TSS", rows(8)),
    ];
    let doc = PageFlowEngine::new(uniform_config()).layout(&sections, 440.0, 20.0);

    assert!(!doc.overflowed);
    assert_eq!(doc.page_count(), 2);
    let second = &doc.pages[1];
    assert_eq!(
        second.blocks[0].kind,
        BlockKind::SubsectionHeader { title: "TSS".into() }
    );
    assert!(matches!(second.blocks[1].kind, BlockKind::Table { .. }));
}

#[test]
fn generated_at_does_not_change_fingerprint() {
    let sections = vec![Section::new("A").with_untitled_table(rows(4))];
    let a = PageFlowEngine::default()
        .with_generated_at("2026-01-01 00:00:00")
        .layout(&sections, 842.0, 40.0);
    let b = PageFlowEngine::default()
        .with_generated_at("2026-06-30 12:00:00")
        .layout(&sections, 842.0, 40.0);
    assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    assert_ne!(a, b);
}

#[test]
fn fingerprint_is_a_hex_digest_of_the_layout() {
    let engine = PageFlowEngine::default();
    let short = engine.layout(&[Section::new("A").with_untitled_table(rows(4))], 842.0, 40.0);
    let long = engine.layout(&[Section::new("A").with_untitled_table(rows(5))], 842.0, 40.0);
    let digest = short.fingerprint().unwrap();
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(digest, long.fingerprint().unwrap());
}

fn arb_section() -> impl Strategy<Value = Section> {
    (
        "[A-Z][a-z]{0,12}",
        prop::collection::vec((prop::option::of("[a-z ]{1,20}"), 0usize..25), 1..4),
    )
        .prop_map(|(title, subs)| {
            subs.into_iter()
                .fold(Section::new(title), |section, (sub_title, n)| match sub_title {
                    Some(t) => section.with_table(t, rows(n)),
                    None => section.with_untitled_table(rows(n)),
                })
        })
}

proptest! {
    #[test]
    fn no_page_ends_with_a_header(
        sections in prop::collection::vec(arb_section(), 0..20),
        page_height in 200.0f64..1200.0,
    ) {
        let doc = af_layout::layout(&sections, page_height, 30.0);
        for page in &doc.pages {
            if let Some(last) = page.last_block() {
                prop_assert!(!last.kind.is_header(), "page {} ends with a header", page.number);
            }
        }
    }

    #[test]
    fn layout_is_deterministic(
        sections in prop::collection::vec(arb_section(), 0..12),
        page_height in 100.0f64..1000.0,
        margin in 0.0f64..60.0,
    ) {
        let engine = PageFlowEngine::default().with_title("Report");
        let a = engine.layout(&sections, page_height, margin);
        let b = engine.layout(&sections, page_height, margin);
        prop_assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn every_block_is_placed_once_in_order(
        sections in prop::collection::vec(arb_section(), 0..12),
        page_height in 60.0f64..900.0,
    ) {
        let doc = af_layout::layout(&sections, page_height, 20.0);
        let expected: usize = sections
            .iter()
            .map(|s| 1 + s.subsections.iter().map(|sub| 1 + usize::from(sub.title.is_some())).sum::<usize>())
            .sum();
        let placed: Vec<usize> = doc.blocks().map(|(_, b)| b.section).collect();
        prop_assert_eq!(placed.len(), expected);
        prop_assert!(placed.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(doc.page_count() >= 1);
        for (i, page) in doc.pages.iter().enumerate() {
            prop_assert_eq!(page.number, i + 1);
            prop_assert_eq!(page.footer.total_pages, doc.page_count());
        }
    }

    #[test]
    fn fitting_documents_start_every_block_on_the_page(
        sections in prop::collection::vec(arb_section(), 0..12),
    ) {
        let doc = af_layout::layout(&sections, 842.0, 40.0);
        if !doc.overflowed {
            let bottom = doc.page_height - doc.margin;
            for (_, block) in doc.blocks() {
                prop_assert!(block.y >= doc.margin && block.y <= bottom);
            }
        }
    }
}
