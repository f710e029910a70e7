//! TOC page rendering.
//!
//! Draws the planned entries into one content stream per TOC page:
//! title in blue, a dashed leader line filling the gap, and the
//! right-aligned destination page number. While drawing, the renderer
//! records the rectangle each entry occupies; those rectangles are the
//! clickable regions the link binder attaches afterwards.
//!
//! Fonts are referenced as `F1` (Helvetica) and `F2` (Helvetica-Bold);
//! the assembler installs the matching resources on every TOC page.

use lopdf::Object;
use lopdf::content::{Content, Operation};

use crate::error::{BookbindError, Result};
use crate::toc::fit::{approx_text_width, fit_title};
use crate::toc::layout::LayoutPlan;
use crate::toc::{LinkRect, TocGeometry};

/// Title color of TOC entries (#1a73e8).
const ENTRY_COLOR: (f32, f32, f32) = (0.102, 0.451, 0.910);

/// Gap between the fitted title and the start of the leader line.
const LEADER_GAP: f32 = 5.0;

/// Default header when no book title is given.
const DEFAULT_HEADER: &str = "Table of Contents";

/// Result of rendering the TOC.
#[derive(Debug)]
pub struct RenderedToc {
    /// One content stream per TOC page, in order.
    pub pages: Vec<Content>,

    /// Clickable rectangle per entry, parallel to the plan's entries.
    pub rects: Vec<LinkRect>,
}

/// Renders the planned TOC entries into page content streams.
#[derive(Debug)]
pub struct TocRenderer {
    geometry: TocGeometry,
    header: String,
}

impl TocRenderer {
    /// Create a renderer with the default geometry.
    ///
    /// The header is the book title when one is given, otherwise a
    /// generic heading.
    pub fn new(header: Option<&str>) -> Self {
        Self {
            geometry: TocGeometry::default(),
            header: header.unwrap_or(DEFAULT_HEADER).to_string(),
        }
    }

    /// Create a renderer with custom geometry.
    pub fn with_geometry(header: Option<&str>, geometry: TocGeometry) -> Self {
        Self {
            geometry,
            header: header.unwrap_or(DEFAULT_HEADER).to_string(),
        }
    }

    /// Render all TOC pages for a layout plan.
    ///
    /// # Errors
    ///
    /// Returns [`BookbindError::LayoutInconsistency`] if the number of
    /// rendered pages differs from the plan's `toc_page_count` - the
    /// postcondition guarding every destination number downstream.
    pub fn render(&self, plan: &LayoutPlan) -> Result<RenderedToc> {
        if plan.entries.is_empty() {
            return Err(BookbindError::render_failed("layout plan has no entries"));
        }

        let mut pages: Vec<Content> = Vec::with_capacity(plan.toc_page_count);
        let mut rects: Vec<LinkRect> = Vec::with_capacity(plan.entries.len());

        let mut operations: Vec<Operation> = Vec::new();
        self.draw_header(&mut operations);

        let mut current_page = 0;
        for entry in &plan.entries {
            while entry.toc_page_index > current_page {
                pages.push(Content {
                    operations: std::mem::take(&mut operations),
                });
                current_page += 1;
            }

            let y = self.geometry.baseline_y(entry.toc_page_index, entry.line_index);
            self.draw_entry(&mut operations, &entry.title, entry.destination_page, y);
            rects.push(self.geometry.entry_rect(y));
        }
        pages.push(Content { operations });

        if pages.len() != plan.toc_page_count {
            return Err(BookbindError::LayoutInconsistency {
                expected: plan.toc_page_count,
                actual: pages.len(),
            });
        }

        Ok(RenderedToc { pages, rects })
    }

    /// Draw the bold header on the first TOC page.
    fn draw_header(&self, operations: &mut Vec<Operation>) {
        let g = &self.geometry;

        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec!["F2".into(), g.header_font_size.into()],
        ));
        operations.push(Operation::new(
            "rg",
            vec![0.0f32.into(), 0.0f32.into(), 0.0f32.into()],
        ));
        operations.push(Operation::new(
            "Td",
            vec![g.margin.into(), g.header_baseline.into()],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(self.header.as_str())],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    /// Draw one entry: fitted title, dashed leader, page number.
    fn draw_entry(
        &self,
        operations: &mut Vec<Operation>,
        title: &str,
        destination_page: usize,
        y: f32,
    ) {
        let g = &self.geometry;
        let size = g.entry_font_size;

        let fitted = fit_title(title, g.max_title_width(), size);
        let title_width = approx_text_width(&fitted, size);

        // Title, in blue.
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), size.into()]));
        operations.push(Operation::new(
            "rg",
            vec![
                ENTRY_COLOR.0.into(),
                ENTRY_COLOR.1.into(),
                ENTRY_COLOR.2.into(),
            ],
        ));
        operations.push(Operation::new("Td", vec![g.margin.into(), y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(fitted.as_str())],
        ));
        operations.push(Operation::new("ET", vec![]));

        // Dashed leader from the title's end to the number gutter.
        let leader_start = g.margin + title_width + LEADER_GAP;
        let leader_end = g.leader_end_x();
        if leader_start < leader_end {
            let line_y = y + 3.0;
            operations.push(Operation::new(
                "RG",
                vec![0.0f32.into(), 0.0f32.into(), 0.0f32.into()],
            ));
            operations.push(Operation::new(
                "d",
                vec![
                    Object::Array(vec![1.into(), 2.into()]),
                    0.into(),
                ],
            ));
            operations.push(Operation::new(
                "m",
                vec![leader_start.into(), line_y.into()],
            ));
            operations.push(Operation::new("l", vec![leader_end.into(), line_y.into()]));
            operations.push(Operation::new("S", vec![]));
            operations.push(Operation::new(
                "d",
                vec![Object::Array(vec![]), 0.into()],
            ));
        }

        // Right-aligned page number, back in black.
        let number = destination_page.to_string();
        let number_x = g.number_right_x() - approx_text_width(&number, size);
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), size.into()]));
        operations.push(Operation::new(
            "rg",
            vec![0.0f32.into(), 0.0f32.into(), 0.0f32.into()],
        ));
        operations.push(Operation::new("Td", vec![number_x.into(), y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(number.as_str())],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::layout::{ChapterExtent, TocCapacity, plan};

    fn chapters(count: usize) -> Vec<ChapterExtent> {
        (0..count)
            .map(|i| ChapterExtent::new(format!("Chapter {}", i + 1), 1))
            .collect()
    }

    fn rendered_text(content: &Content) -> Vec<String> {
        content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => {
                    Some(String::from_utf8_lossy(bytes).into_owned())
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_renders_one_page_for_a_short_toc() {
        let plan = plan(&chapters(3), TocCapacity::default(), 0).unwrap();
        let rendered = TocRenderer::new(None).render(&plan).unwrap();

        assert_eq!(rendered.pages.len(), 1);
        assert_eq!(rendered.rects.len(), 3);
    }

    #[test]
    fn test_renders_two_pages_for_an_overflowing_toc() {
        let plan = plan(&chapters(35), TocCapacity::default(), 0).unwrap();
        let rendered = TocRenderer::new(None).render(&plan).unwrap();

        assert_eq!(rendered.pages.len(), 2);
        assert_eq!(rendered.rects.len(), 35);

        // 30 entries + header on the first page, 5 on the second.
        let first_page_text = rendered_text(&rendered.pages[0]);
        let second_page_text = rendered_text(&rendered.pages[1]);
        assert!(first_page_text.contains(&"Chapter 30".to_string()));
        assert!(second_page_text.contains(&"Chapter 31".to_string()));
        assert!(!second_page_text.iter().any(|t| t == "Table of Contents"));
    }

    #[test]
    fn test_header_uses_book_title_when_given() {
        let plan = plan(&chapters(2), TocCapacity::default(), 0).unwrap();
        let rendered = TocRenderer::new(Some("My Book")).render(&plan).unwrap();

        let text = rendered_text(&rendered.pages[0]);
        assert!(text.contains(&"My Book".to_string()));
    }

    #[test]
    fn test_page_numbers_are_rendered() {
        let source = vec![
            ChapterExtent::new("a", 5),
            ChapterExtent::new("b", 3),
            ChapterExtent::new("c", 7),
        ];
        let plan = plan(&source, TocCapacity::default(), 0).unwrap();
        let rendered = TocRenderer::new(None).render(&plan).unwrap();

        let text = rendered_text(&rendered.pages[0]);
        for number in ["2", "7", "10"] {
            assert!(text.contains(&number.to_string()), "missing {number}");
        }
    }

    #[test]
    fn test_rects_descend_within_a_page() {
        let plan = plan(&chapters(10), TocCapacity::default(), 0).unwrap();
        let rendered = TocRenderer::new(None).render(&plan).unwrap();

        for pair in rendered.rects.windows(2) {
            assert!(pair[0].bottom > pair[1].top);
        }
    }

    #[test]
    fn test_rects_reset_to_the_top_on_a_new_page() {
        let plan = plan(&chapters(31), TocCapacity::default(), 0).unwrap();
        let rendered = TocRenderer::new(None).render(&plan).unwrap();

        // Entry 30 is the first line of TOC page 1, higher up than the
        // last line of page 0.
        assert!(rendered.rects[30].top > rendered.rects[29].top);
    }

    #[test]
    fn test_long_titles_are_fitted_before_drawing() {
        let long_title = "An unreasonably long chapter title that would run \
                          straight through the page number column if drawn as is";
        let source = vec![ChapterExtent::new(long_title, 2)];
        let plan = plan(&source, TocCapacity::default(), 0).unwrap();
        let rendered = TocRenderer::new(None).render(&plan).unwrap();

        let text = rendered_text(&rendered.pages[0]);
        let drawn_title = text
            .iter()
            .find(|t| t.starts_with("An unreasonably"))
            .expect("title not drawn");
        assert!(drawn_title.ends_with("..."));
        assert!(drawn_title.len() < long_title.len());
    }

    #[test]
    fn test_rendered_page_count_matches_plan_postcondition() {
        // Tampering with the plan's page count must be caught, not
        // silently rendered.
        let mut plan = plan(&chapters(3), TocCapacity::default(), 0).unwrap();
        plan.toc_page_count = 2;

        let result = TocRenderer::new(None).render(&plan);
        assert!(matches!(
            result,
            Err(BookbindError::LayoutInconsistency {
                expected: 2,
                actual: 1
            })
        ));
    }
}
