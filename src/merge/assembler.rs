//! Document assembly.
//!
//! Concatenates, in fixed order: optional cover page, rendered TOC
//! pages, then every chapter's pages in reading order. Chapter object
//! graphs are renumbered into the target document's id space before
//! their pages are hung onto the book's page tree. Non-empty chapters
//! get an outline entry at their first page, and the Info dictionary is
//! filled in.
//!
//! The assembler verifies that the page sequence it built matches the
//! layout plan's accounting; any drift here would invalidate every
//! destination number the TOC already shows.

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use std::path::Path;

use crate::error::{BookbindError, Result};
use crate::io::LoadedChapter;
use crate::merge::bookmarks::BookmarkManager;
use crate::toc::layout::LayoutPlan;
use crate::toc::{PAGE_HEIGHT, PAGE_WIDTH};

/// Result of assembling the book.
pub struct AssembledBook {
    /// The assembled document, not yet link-bound.
    pub document: Document,

    /// Total number of pages in the document.
    pub total_pages: usize,

    /// Number of outline entries created.
    pub bookmarks_added: usize,
}

/// Assembles cover, TOC pages, and chapters into one document.
pub struct DocumentAssembler {
    /// Bookmark manager for outline handling.
    bookmark_manager: BookmarkManager,
}

impl DocumentAssembler {
    /// Create a new assembler.
    pub fn new() -> Self {
        Self {
            bookmark_manager: BookmarkManager::new(),
        }
    }

    /// Assemble the book.
    ///
    /// # Arguments
    ///
    /// * `chapters` - loaded chapters in reading order (consumed)
    /// * `plan` - the layout plan the TOC was rendered from
    /// * `toc_pages` - rendered TOC content streams
    /// * `cover` - optional cover image path
    /// * `title` - optional book title for the Info dictionary
    ///
    /// # Errors
    ///
    /// Fails when the rendered TOC page count disagrees with the plan,
    /// when the cover image cannot be embedded, or when the assembled
    /// page count drifts from the plan's accounting.
    pub fn assemble(
        &self,
        chapters: Vec<LoadedChapter>,
        plan: &LayoutPlan,
        toc_pages: &[Content],
        cover: Option<&Path>,
        title: Option<&str>,
    ) -> Result<AssembledBook> {
        if toc_pages.len() != plan.toc_page_count {
            return Err(BookbindError::LayoutInconsistency {
                expected: plan.toc_page_count,
                actual: toc_pages.len(),
            });
        }
        if cover.is_some() != (plan.cover_offset == 1) {
            return Err(BookbindError::assembly_failed(
                "cover presence disagrees with the plan's cover offset",
            ));
        }

        let mut doc = Document::with_version("1.5");
        let pages_root_id = doc.new_object_id();
        let mut page_ids: Vec<ObjectId> = Vec::new();

        if let Some(cover_path) = cover {
            page_ids.push(self.add_cover_page(&mut doc, pages_root_id, cover_path)?);
        }

        self.add_toc_pages(&mut doc, pages_root_id, toc_pages, &mut page_ids)?;

        let bookmark_items =
            self.add_chapter_pages(&mut doc, pages_root_id, chapters, &mut page_ids)?;

        // Page tree and catalog
        doc.objects.insert(
            pages_root_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
                "Count" => page_ids.len() as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_root_id,
        });
        doc.trailer.set("Root", catalog_id);

        // The plan already accounts for every page (cover + TOC +
        // non-empty chapters); a drift here means wrong destinations.
        if page_ids.len() != plan.total_pages() {
            return Err(BookbindError::assembly_failed(format!(
                "assembled {} pages but the layout plan accounts for {}",
                page_ids.len(),
                plan.total_pages()
            )));
        }

        set_info_dictionary(&mut doc, title);

        let bookmarks_added = bookmark_items.len();
        self.bookmark_manager.add_outline(&mut doc, &bookmark_items)?;

        // Chapter catalogs and page trees came along with the copied
        // object graphs; they are unreachable from the new Root now.
        doc.prune_objects();

        Ok(AssembledBook {
            total_pages: page_ids.len(),
            bookmarks_added,
            document: doc,
        })
    }

    /// Create the cover page with the image placed full-bleed.
    fn add_cover_page(
        &self,
        doc: &mut Document,
        pages_root_id: ObjectId,
        cover_path: &Path,
    ) -> Result<ObjectId> {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_root_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Resources" => dictionary! {},
        });

        let image = lopdf::xobject::image(cover_path).map_err(|e| {
            BookbindError::cover_failed(cover_path.to_path_buf(), e.to_string())
        })?;

        doc.insert_image(page_id, image, (0.0, 0.0), (PAGE_WIDTH, PAGE_HEIGHT))
            .map_err(|e| BookbindError::cover_failed(cover_path.to_path_buf(), e.to_string()))?;

        Ok(page_id)
    }

    /// Add one page per rendered TOC content stream.
    fn add_toc_pages(
        &self,
        doc: &mut Document,
        pages_root_id: ObjectId,
        toc_pages: &[Content],
        page_ids: &mut Vec<ObjectId>,
    ) -> Result<()> {
        // Fonts referenced by the renderer as F1/F2.
        let helvetica = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let helvetica_bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });

        for content in toc_pages {
            let encoded = content
                .encode()
                .map_err(|e| BookbindError::render_failed(e.to_string()))?;
            let stream_id = doc.add_object(Stream::new(dictionary! {}, encoded));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_root_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
                "Resources" => dictionary! {
                    "Font" => dictionary! {
                        "F1" => Object::Reference(helvetica),
                        "F2" => Object::Reference(helvetica_bold),
                    },
                },
                "Contents" => Object::Reference(stream_id),
            });
            page_ids.push(page_id);
        }

        Ok(())
    }

    /// Merge every non-empty chapter's object graph and pages.
    ///
    /// Returns the outline items (title, first page) per chapter.
    fn add_chapter_pages(
        &self,
        doc: &mut Document,
        pages_root_id: ObjectId,
        chapters: Vec<LoadedChapter>,
        page_ids: &mut Vec<ObjectId>,
    ) -> Result<Vec<(String, ObjectId)>> {
        let mut bookmark_items = Vec::new();

        for chapter in chapters {
            // Zero-page chapters reserved a destination slot in the
            // plan but contribute no pages and no bookmark.
            if chapter.page_count == 0 {
                continue;
            }
            let Some(mut chapter_doc) = chapter.document else {
                continue;
            };

            // Move the chapter's objects into the book's id space.
            chapter_doc.renumber_objects_with(doc.max_id + 1);
            doc.max_id = chapter_doc.max_id;

            let chapter_pages: Vec<ObjectId> =
                chapter_doc.get_pages().into_values().collect();
            doc.objects.extend(chapter_doc.objects);

            let mut first_page = None;
            for page_id in chapter_pages {
                let page = doc
                    .get_object_mut(page_id)
                    .and_then(Object::as_dict_mut)
                    .map_err(|e| {
                        BookbindError::assembly_failed(format!(
                            "chapter page {page_id:?} is not a dictionary: {e}"
                        ))
                    })?;
                page.set("Parent", Object::Reference(pages_root_id));

                page_ids.push(page_id);
                first_page.get_or_insert(page_id);
            }

            if let Some(first) = first_page {
                bookmark_items.push((chapter.title, first));
            }
        }

        Ok(bookmark_items)
    }
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill in the Info dictionary (title and producer).
fn set_info_dictionary(doc: &mut Document, title: Option<&str>) {
    let mut info = lopdf::Dictionary::new();
    if let Some(title) = title {
        info.set(
            "Title",
            Object::String(title.as_bytes().to_vec(), lopdf::StringFormat::Literal),
        );
    }
    info.set(
        "Creator",
        Object::String(b"bookbind".to_vec(), lopdf::StringFormat::Literal),
    );
    info.set(
        "Producer",
        Object::String(b"bookbind".to_vec(), lopdf::StringFormat::Literal),
    );

    let info_id = doc.add_object(Object::Dictionary(info));
    doc.trailer.set("Info", Object::Reference(info_id));
}
