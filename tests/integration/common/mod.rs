//! Integration test helpers for bookbind.
//!
//! The tests exercise the full pipeline against chapter PDFs generated
//! on the fly, so no binary fixtures are needed.

use bookbind::config::{Config, OverwriteMode};
use lopdf::{Document, Object, ObjectId, dictionary};
use std::path::{Path, PathBuf};

/// Write a minimal chapter PDF with the given number of pages.
pub fn create_chapter_pdf(dir: &Path, name: &str, pages: usize) -> PathBuf {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for _ in 0..pages {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

/// Write a small PNG usable as a cover image.
pub fn create_cover_png(dir: &Path) -> PathBuf {
    let path = dir.join("cover.png");
    let image = image::RgbImage::from_pixel(4, 4, image::Rgb([180, 40, 40]));
    image.save(&path).unwrap();
    path
}

/// A quiet, force-overwrite config writing next to the chapter folder.
pub fn test_config(input_dir: &Path) -> Config {
    Config {
        input_dir: input_dir.to_path_buf(),
        output: Config::default_output_for(input_dir),
        title: None,
        cover: None,
        dry_run: false,
        verbose: false,
        quiet: true,
        overwrite_mode: OverwriteMode::Force,
        strict: false,
        jobs: None,
    }
}

/// Load a saved PDF.
pub async fn load_pdf(path: &Path) -> Document {
    Document::load(path).await.unwrap()
}

/// Object ids of the document's pages, in page order.
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Link annotations attached to the page at `page_index` (0-based).
pub fn annotations_on_page(doc: &Document, page_index: usize) -> Vec<ObjectId> {
    let pages = page_ids(doc);
    let page = doc.get_dictionary(pages[page_index]).unwrap();
    match page.get(b"Annots") {
        Ok(Object::Array(array)) => array
            .iter()
            .filter_map(|o| o.as_reference().ok())
            .collect(),
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(array)) => array
                .iter()
                .filter_map(|o| o.as_reference().ok())
                .collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// 0-based page index a link annotation navigates to.
pub fn link_destination_index(doc: &Document, link_id: ObjectId) -> usize {
    let link = doc.get_dictionary(link_id).unwrap();
    let action_id = link.get(b"A").unwrap().as_reference().unwrap();
    let action = doc.get_dictionary(action_id).unwrap();

    let Ok(Object::Array(dest)) = action.get(b"D") else {
        panic!("link action has no destination array");
    };
    let target = dest[0].as_reference().unwrap();

    page_ids(doc)
        .iter()
        .position(|&id| id == target)
        .expect("destination page not found in document")
}
