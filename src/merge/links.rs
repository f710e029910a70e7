//! Link binding for the assembled book.
//!
//! Post-processes the assembled document: every TOC entry gets a link
//! annotation on its TOC page whose activation jumps the viewer to the
//! entry's destination page. Actions and annotations are built through
//! typed constructors rather than ad-hoc dictionaries, so the object
//! shapes live in exactly one place.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::path::Path;

use crate::error::{BookbindError, Result};
use crate::toc::LinkRect;
use crate::toc::layout::LayoutPlan;

/// How the viewer should display the destination page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewIntent {
    /// Fit the whole page into the window.
    #[default]
    FitPage,
}

impl ViewIntent {
    fn to_object(self) -> Object {
        match self {
            Self::FitPage => Object::Name(b"Fit".to_vec()),
        }
    }
}

/// A go-to action navigating to an absolute page of the same document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoToAction {
    /// 0-based index of the destination page.
    pub destination_page_index: usize,

    /// View intent applied on arrival.
    pub view: ViewIntent,
}

impl GoToAction {
    /// Create a fit-page action for the given 0-based page index.
    pub fn new(destination_page_index: usize) -> Self {
        Self {
            destination_page_index,
            view: ViewIntent::FitPage,
        }
    }

    /// Build the action dictionary, given the resolved page reference.
    fn to_dictionary(self, destination_page: ObjectId) -> Dictionary {
        dictionary! {
            "S" => Object::Name(b"GoTo".to_vec()),
            "D" => vec![Object::Reference(destination_page), self.view.to_object()],
        }
    }
}

/// A borderless rectangular link annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkAnnotation {
    /// Clickable region on the page.
    pub rect: LinkRect,

    /// Action fired when the region is activated.
    pub action: GoToAction,
}

impl LinkAnnotation {
    /// Create a link annotation.
    pub fn new(rect: LinkRect, action: GoToAction) -> Self {
        Self { rect, action }
    }

    /// Build the annotation dictionary, referencing an action object.
    fn to_dictionary(self, action_id: ObjectId) -> Dictionary {
        dictionary! {
            "Type" => Object::Name(b"Annot".to_vec()),
            "Subtype" => Object::Name(b"Link".to_vec()),
            "Rect" => vec![
                self.rect.left.into(),
                self.rect.bottom.into(),
                self.rect.right.into(),
                self.rect.top.into(),
            ],
            "Border" => vec![0.into(), 0.into(), 0.into()],
            "A" => Object::Reference(action_id),
        }
    }
}

/// Statistics about a link-binding pass.
#[derive(Debug, Clone, Default)]
pub struct LinkStatistics {
    /// Number of link annotations attached.
    pub links_added: usize,

    /// Entries whose destination lies past the end of the document
    /// (trailing zero-page chapter); no annotation is written for them.
    pub links_skipped: usize,

    /// Pairs of clickable rectangles that overlap on the same TOC page.
    /// Tolerated, but reported - a nonzero count indicates a renderer
    /// geometry bug.
    pub overlapping_rects: usize,
}

/// Attaches TOC link annotations to an assembled document.
#[derive(Debug, Default)]
pub struct LinkBinder;

impl LinkBinder {
    /// Create a new link binder.
    pub fn new() -> Self {
        Self
    }

    /// Open a saved document for editing, bind all links, and return
    /// the edited document ready to be saved to its final path.
    pub async fn bind_file(
        &self,
        path: &Path,
        plan: &LayoutPlan,
        rects: &[LinkRect],
    ) -> Result<(Document, LinkStatistics)> {
        let mut doc = Document::load(path).await.map_err(|e| {
            BookbindError::link_bind_failed(format!(
                "failed to reopen {}: {e}",
                path.display()
            ))
        })?;

        let stats = self.bind(&mut doc, plan, rects)?;
        Ok((doc, stats))
    }

    /// Bind one link annotation per TOC entry.
    ///
    /// Entry `i`'s rectangle goes onto absolute page `cover_offset +
    /// toc_page_index(i)`, and its action targets `destination_page - 1`
    /// (converted to 0-based) with a fit-page view.
    ///
    /// # Errors
    ///
    /// Fails when the rect list does not match the plan, or when a TOC
    /// page is missing from the document.
    pub fn bind(
        &self,
        doc: &mut Document,
        plan: &LayoutPlan,
        rects: &[LinkRect],
    ) -> Result<LinkStatistics> {
        if rects.len() != plan.entries.len() {
            return Err(BookbindError::link_bind_failed(format!(
                "{} rectangles for {} entries",
                rects.len(),
                plan.entries.len()
            )));
        }

        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let mut stats = LinkStatistics::default();

        for (entry, rect) in plan.entries.iter().zip(rects.iter()) {
            let toc_absolute_index = plan.cover_offset + entry.toc_page_index;
            let toc_page_id = *pages.get(toc_absolute_index).ok_or_else(|| {
                BookbindError::link_bind_failed(format!(
                    "TOC page {toc_absolute_index} not present in document"
                ))
            })?;

            let destination_index = entry.destination_page - 1;
            let Some(&destination_id) = pages.get(destination_index) else {
                // Trailing zero-page chapter: destination past the end.
                stats.links_skipped += 1;
                continue;
            };

            let action = GoToAction::new(destination_index);
            let action_id = doc.add_object(action.to_dictionary(destination_id));

            let annotation = LinkAnnotation::new(*rect, action);
            let link_id = doc.add_object(annotation.to_dictionary(action_id));

            attach_annotation(doc, toc_page_id, link_id)?;
            stats.links_added += 1;
        }

        stats.overlapping_rects = count_overlaps(plan, rects);

        Ok(stats)
    }
}

/// Append a link to a page's Annots list, creating it when absent.
///
/// Annots may be missing, a direct array, or a reference to an array;
/// all three shapes occur in real documents.
fn attach_annotation(doc: &mut Document, page_id: ObjectId, link_id: ObjectId) -> Result<()> {
    let annots_ref = doc
        .get_dictionary(page_id)
        .ok()
        .and_then(|page| match page.get(b"Annots") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        });

    if let Some(ref_id) = annots_ref {
        let target = doc
            .get_object_mut(ref_id)
            .map_err(|e| BookbindError::link_bind_failed(e.to_string()))?;
        if let Object::Array(array) = target {
            array.push(Object::Reference(link_id));
            return Ok(());
        }
        return Err(BookbindError::link_bind_failed(
            "page Annots reference is not an array",
        ));
    }

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| BookbindError::link_bind_failed(e.to_string()))?;

    if page.has(b"Annots") {
        match page.get_mut(b"Annots") {
            Ok(Object::Array(array)) => array.push(Object::Reference(link_id)),
            _ => {
                return Err(BookbindError::link_bind_failed(
                    "page Annots is neither array nor reference",
                ));
            }
        }
    } else {
        page.set(
            "Annots",
            Object::Array(vec![Object::Reference(link_id)]),
        );
    }

    Ok(())
}

/// Count overlapping rect pairs per TOC page.
fn count_overlaps(plan: &LayoutPlan, rects: &[LinkRect]) -> usize {
    let mut overlaps = 0;
    for (i, (entry_a, rect_a)) in plan.entries.iter().zip(rects.iter()).enumerate() {
        for (entry_b, rect_b) in plan.entries.iter().zip(rects.iter()).skip(i + 1) {
            if entry_a.toc_page_index == entry_b.toc_page_index && rect_a.overlaps(rect_b) {
                overlaps += 1;
            }
        }
    }
    overlaps
}
