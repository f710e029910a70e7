//! Bookmark (outline) management for the assembled book.
//!
//! Every non-empty chapter gets one outline entry at its first page, so
//! PDF viewers show the chapter list in their sidebar. Outline entries
//! are distinct from the TOC's clickable links: they live in the
//! document catalog, not on any page.

use crate::error::{BookbindError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Manager for PDF bookmarks (outlines).
pub struct BookmarkManager;

impl BookmarkManager {
    /// Create a new bookmark manager.
    pub fn new() -> Self {
        Self
    }

    /// Add a flat outline with one entry per chapter.
    ///
    /// Each item is a chapter title and the object id of the chapter's
    /// first page in the assembled document. An empty item list is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the document catalog is missing.
    pub fn add_outline(&self, doc: &mut Document, items: &[(String, ObjectId)]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let outline_id = doc.new_object_id();

        // Create outline items
        let mut item_ids = Vec::new();
        for (title, page_id) in items {
            let item_id = doc.new_object_id();
            item_ids.push(item_id);

            // Destination array [page /XYZ null null null]
            let dest = vec![
                Object::Reference(*page_id),
                Object::Name(b"XYZ".to_vec()),
                Object::Null,
                Object::Null,
                Object::Null,
            ];

            let mut item_dict = Dictionary::new();
            item_dict.set(
                "Title",
                Object::String(title.as_bytes().to_vec(), lopdf::StringFormat::Literal),
            );
            item_dict.set("Parent", Object::Reference(outline_id));
            item_dict.set("Dest", Object::Array(dest));

            doc.objects.insert(item_id, Object::Dictionary(item_dict));
        }

        // Link items together (Prev/Next)
        for i in 0..item_ids.len() {
            if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(item_ids[i]) {
                if i > 0 {
                    dict.set("Prev", Object::Reference(item_ids[i - 1]));
                }
                if i < item_ids.len() - 1 {
                    dict.set("Next", Object::Reference(item_ids[i + 1]));
                }
            }
        }

        // Root outline dictionary
        let mut outline_dict = Dictionary::new();
        outline_dict.set("Type", Object::Name(b"Outlines".to_vec()));
        outline_dict.set("Count", Object::Integer(item_ids.len() as i64));
        outline_dict.set("First", Object::Reference(item_ids[0]));
        outline_dict.set("Last", Object::Reference(*item_ids.last().unwrap()));

        doc.objects
            .insert(outline_id, Object::Dictionary(outline_dict));

        if let Ok(catalog) = doc.catalog_mut() {
            catalog.set("Outlines", Object::Reference(outline_id));
        } else {
            return Err(BookbindError::bookmark_failed(
                "document has no catalog to attach the outline to",
            ));
        }

        Ok(())
    }

    /// Check if a document has bookmarks.
    pub fn has_bookmarks(&self, doc: &Document) -> bool {
        if let Ok(catalog) = doc.catalog() {
            catalog.has(b"Outlines")
        } else {
            false
        }
    }

    /// Number of outline entries, if an outline is present.
    pub fn outline_count(&self, doc: &Document) -> usize {
        let Ok(catalog) = doc.catalog() else {
            return 0;
        };
        let Ok(outline_ref) = catalog.get(b"Outlines").and_then(|o| o.as_reference()) else {
            return 0;
        };
        doc.get_object(outline_ref)
            .ok()
            .and_then(|o| o.as_dict().ok())
            .and_then(|d| d.get(b"Count").ok())
            .and_then(|c| c.as_i64().ok())
            .map(|c| c.unsigned_abs() as usize)
            .unwrap_or(0)
    }
}

impl Default for BookmarkManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn create_test_document_with_pages(page_count: usize) -> (Document, Vec<ObjectId>) {
        let mut doc = Document::with_version("1.5");

        let pages_id = doc.new_object_id();

        let mut page_ids = Vec::new();
        for _ in 0..page_count {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            page_ids.push(page_id);
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
                "Count" => page_count as i64,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        (doc, page_ids)
    }

    #[test]
    fn test_add_outline_empty_is_a_noop() {
        let (mut doc, _) = create_test_document_with_pages(5);
        let manager = BookmarkManager::new();

        manager.add_outline(&mut doc, &[]).unwrap();
        assert!(!manager.has_bookmarks(&doc));
    }

    #[test]
    fn test_add_outline_single_chapter() {
        let (mut doc, page_ids) = create_test_document_with_pages(5);
        let manager = BookmarkManager::new();

        let items = vec![("Chapter 1".to_string(), page_ids[0])];
        manager.add_outline(&mut doc, &items).unwrap();

        assert!(manager.has_bookmarks(&doc));
        assert_eq!(manager.outline_count(&doc), 1);
    }

    #[test]
    fn test_add_outline_links_items_in_order() {
        let (mut doc, page_ids) = create_test_document_with_pages(9);
        let manager = BookmarkManager::new();

        let items = vec![
            ("Chapter 1".to_string(), page_ids[0]),
            ("Chapter 2".to_string(), page_ids[3]),
            ("Chapter 3".to_string(), page_ids[6]),
        ];
        manager.add_outline(&mut doc, &items).unwrap();

        assert_eq!(manager.outline_count(&doc), 3);

        // Walk the First/Next chain and collect titles.
        let catalog = doc.catalog().unwrap();
        let outline_ref = catalog.get(b"Outlines").unwrap().as_reference().unwrap();
        let outline = doc.get_dictionary(outline_ref).unwrap();

        let mut titles = Vec::new();
        let mut next = outline.get(b"First").ok().cloned();
        while let Some(Object::Reference(item_id)) = next {
            let item = doc.get_dictionary(item_id).unwrap();
            if let Ok(Object::String(bytes, _)) = item.get(b"Title") {
                titles.push(String::from_utf8_lossy(bytes).into_owned());
            }
            next = item.get(b"Next").ok().cloned();
        }

        assert_eq!(titles, vec!["Chapter 1", "Chapter 2", "Chapter 3"]);
    }

    #[test]
    fn test_outline_without_catalog_fails() {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.add_object(dictionary! { "Type" => "Page" });
        let manager = BookmarkManager::new();

        let result = manager.add_outline(&mut doc, &[("x".to_string(), page_id)]);
        assert!(matches!(result, Err(BookbindError::BookmarkFailed { .. })));
    }
}
