//! Plain-text rendering of a laid-out document.

use std::fmt;

use af_layout::{BlockKind, Document, Page, Table};

const RULE_WIDTH: usize = 72;

/// Displays a document page by page, footers included.
pub struct Preview<'a>(pub &'a Document);

impl fmt::Display for Preview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = self.0;
        for page in &doc.pages {
            if page.number == 1 {
                write_title(f, doc)?;
            }
            write_page(f, page)?;
        }
        Ok(())
    }
}

fn write_title(f: &mut fmt::Formatter<'_>, doc: &Document) -> fmt::Result {
    writeln!(f, "{}", doc.title)?;
    if let Some(stamp) = &doc.generated_at {
        writeln!(f, "Generated: {stamp}")?;
    }
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))
}

fn write_table(f: &mut fmt::Formatter<'_>, table: &Table) -> fmt::Result {
    let width = table
        .rows
        .iter()
        .map(|r| r.parameter.chars().count())
        .chain(std::iter::once(table.columns[0].chars().count()))
        .max()
        .unwrap_or(0);
    writeln!(f, "    {:<width$}  {}", table.columns[0], table.columns[1])?;
    for row in &table.rows {
        writeln!(f, "    {:<width$}  {}", row.parameter, row.value)?;
    }
    Ok(())
}

fn write_page(f: &mut fmt::Formatter<'_>, page: &Page) -> fmt::Result {
    if page.carried_over > 0.0 {
        writeln!(f, "(table continued from previous page)")?;
    }
    for block in &page.blocks {
        match &block.kind {
            BlockKind::SectionHeader { title } => {
                writeln!(f, "\n{title}")?;
                writeln!(f, "{}", "-".repeat(title.chars().count()))?;
            }
            BlockKind::SubsectionHeader { title } => writeln!(f, "\n  {title}")?,
            BlockKind::Table { table } => write_table(f, table)?,
        }
    }
    let footer = &page.footer;
    writeln!(f, "\n{}", "-".repeat(RULE_WIDTH))?;
    writeln!(f, "{}    {}", footer.text, footer.attribution)?;
    writeln!(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_layout::{Row, Section, layout};

    #[test]
    fn preview_shows_sections_rows_and_footer() {
        let sections = vec![
            Section::new("Mass Balance").with_table("Oxygen", vec![Row::new("Saturation", "8.50 mg/L")]),
        ];
        let text = Preview(&layout(&sections, 842.0, 40.0)).to_string();
        assert!(text.contains("Mass Balance"));
        assert!(text.contains("  Oxygen"));
        assert!(text.contains("Saturation  8.50 mg/L"));
        assert!(text.contains("Page 1 of 1"));
    }

    #[test]
    fn every_page_ends_with_its_footer() {
        let sections: Vec<_> = (0..40)
            .map(|i| Section::new(format!("S{i}")).with_untitled_table(vec![Row::new("p", "1")]))
            .collect();
        let doc = layout(&sections, 300.0, 20.0);
        let text = Preview(&doc).to_string();
        let total = doc.page_count();
        assert!(total > 1);
        for n in 1..=total {
            assert!(text.contains(&format!("Page {n} of {total}")));
        }
        assert_eq!(text.matches(&"=".repeat(RULE_WIDTH)).count(), 1);
    }
}
