//! End-to-end build tests covering the layout scenarios.

use crate::common::*;
use bookbind::merge::build_book;
use tempfile::TempDir;

/// Three chapters with page counts [5, 3, 7], no cover: one TOC page,
/// destinations [2, 7, 10].
#[tokio::test]
async fn test_build_three_chapters_without_cover() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();

    create_chapter_pdf(&chapters, "ch1.pdf", 5);
    create_chapter_pdf(&chapters, "ch2.pdf", 3);
    create_chapter_pdf(&chapters, "ch3.pdf", 7);

    let config = test_config(&chapters);
    let result = build_book(&config).await.unwrap();

    assert_eq!(result.statistics.toc_pages, 1);
    assert_eq!(result.statistics.total_pages, 16);
    assert_eq!(result.statistics.links_added, 3);
    assert_eq!(result.statistics.bookmarks_added, 3);

    let destinations: Vec<usize> = result
        .plan
        .entries
        .iter()
        .map(|e| e.destination_page)
        .collect();
    assert_eq!(destinations, vec![2, 7, 10]);

    // Inspect the written file: 16 pages, 3 links on the TOC page,
    // each navigating to its chapter's first page.
    let doc = load_pdf(&result.output).await;
    assert_eq!(doc.get_pages().len(), 16);

    let links = annotations_on_page(&doc, 0);
    assert_eq!(links.len(), 3);
    let targets: Vec<usize> = links
        .iter()
        .map(|&l| link_destination_index(&doc, l))
        .collect();
    assert_eq!(targets, vec![1, 6, 9]);
}

/// Same book with a cover: every destination shifts by one and the
/// first page is the cover.
#[tokio::test]
async fn test_build_with_cover_shifts_destinations() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();

    create_chapter_pdf(&chapters, "ch1.pdf", 5);
    create_chapter_pdf(&chapters, "ch2.pdf", 3);
    create_chapter_pdf(&chapters, "ch3.pdf", 7);
    let cover = create_cover_png(temp_dir.path());

    let mut config = test_config(&chapters);
    config.cover = Some(cover);
    let result = build_book(&config).await.unwrap();

    assert_eq!(result.plan.cover_offset, 1);
    assert_eq!(result.statistics.total_pages, 17);

    let destinations: Vec<usize> = result
        .plan
        .entries
        .iter()
        .map(|e| e.destination_page)
        .collect();
    assert_eq!(destinations, vec![3, 8, 11]);

    let doc = load_pdf(&result.output).await;
    assert_eq!(doc.get_pages().len(), 17);

    // The cover page carries no links; the TOC is page 1.
    assert!(annotations_on_page(&doc, 0).is_empty());
    let links = annotations_on_page(&doc, 1);
    assert_eq!(links.len(), 3);
    assert_eq!(link_destination_index(&doc, links[0]), 2);
}

/// 35 one-page chapters overflow onto a second TOC page: entries 0-29
/// on TOC page 0, entries 30-34 on TOC page 1.
#[tokio::test]
async fn test_build_overflowing_toc() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();

    for i in 1..=35 {
        create_chapter_pdf(&chapters, &format!("ch{i}.pdf"), 1);
    }

    let config = test_config(&chapters);
    let result = build_book(&config).await.unwrap();

    assert_eq!(result.statistics.toc_pages, 2);
    // 2 TOC pages + 35 chapter pages.
    assert_eq!(result.statistics.total_pages, 37);

    let doc = load_pdf(&result.output).await;
    assert_eq!(annotations_on_page(&doc, 0).len(), 30);
    let second_page_links = annotations_on_page(&doc, 1);
    assert_eq!(second_page_links.len(), 5);

    // Entry 30 (the first on TOC page 1) starts at 1-based page 33.
    assert_eq!(result.plan.entries[30].destination_page, 33);
    assert_eq!(link_destination_index(&doc, second_page_links[0]), 32);
}

/// An unreadable chapter is demoted to zero pages: it keeps its TOC
/// entry, whose link lands on the following chapter's first page.
#[tokio::test]
async fn test_build_with_unreadable_chapter() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();

    create_chapter_pdf(&chapters, "ch1.pdf", 4);
    std::fs::write(chapters.join("ch2.pdf"), b"this is not a pdf").unwrap();
    create_chapter_pdf(&chapters, "ch3.pdf", 6);

    let config = test_config(&chapters);
    let result = build_book(&config).await.unwrap();

    assert_eq!(result.statistics.chapters_merged, 2);
    assert_eq!(result.statistics.chapters_skipped, 1);
    // 1 TOC page + 4 + 6 chapter pages.
    assert_eq!(result.statistics.total_pages, 11);
    assert_eq!(result.statistics.bookmarks_added, 2);
    assert_eq!(result.summary.chapters_unreadable, 1);

    // ch2 and ch3 share a destination.
    let destinations: Vec<usize> = result
        .plan
        .entries
        .iter()
        .map(|e| e.destination_page)
        .collect();
    assert_eq!(destinations, vec![2, 6, 6]);

    let doc = load_pdf(&result.output).await;
    let links = annotations_on_page(&doc, 0);
    assert_eq!(links.len(), 3);
    assert_eq!(link_destination_index(&doc, links[1]), 5);
    assert_eq!(link_destination_index(&doc, links[2]), 5);
}

/// A trailing unreadable chapter gets no link (its destination is past
/// the end of the book), but the build still succeeds.
#[tokio::test]
async fn test_build_with_trailing_unreadable_chapter() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();

    create_chapter_pdf(&chapters, "ch1.pdf", 4);
    std::fs::write(chapters.join("ch2.pdf"), b"garbage").unwrap();

    let config = test_config(&chapters);
    let result = build_book(&config).await.unwrap();

    assert_eq!(result.statistics.total_pages, 5);
    assert_eq!(result.statistics.links_added, 1);
    assert_eq!(result.statistics.links_skipped, 1);
}

/// The intermediate artifact never survives a successful run.
#[tokio::test]
async fn test_build_cleans_up_intermediate_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();

    create_chapter_pdf(&chapters, "ch1.pdf", 2);

    let config = test_config(&chapters);
    let result = build_book(&config).await.unwrap();

    assert!(result.output.exists());

    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            name.ends_with(".tmp") || name.ends_with(".book.tmp")
        })
        .collect();
    assert!(leftovers.is_empty(), "intermediate artifacts left behind");
}

/// Chapters are merged in natural order, not lexical order.
#[tokio::test]
async fn test_build_orders_chapters_naturally() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();

    create_chapter_pdf(&chapters, "ch10.pdf", 1);
    create_chapter_pdf(&chapters, "ch2.pdf", 1);
    create_chapter_pdf(&chapters, "ch1.pdf", 1);

    let config = test_config(&chapters);
    let result = build_book(&config).await.unwrap();

    let titles: Vec<&str> = result
        .plan
        .entries
        .iter()
        .map(|e| e.title.as_str())
        .collect();
    assert_eq!(titles, vec!["ch1", "ch2", "ch10"]);
}

/// The book title shows up in the Info dictionary of the output.
#[tokio::test]
async fn test_build_sets_title_metadata() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();

    create_chapter_pdf(&chapters, "ch1.pdf", 1);

    let mut config = test_config(&chapters);
    config.title = Some("Collected Works".to_string());
    let result = build_book(&config).await.unwrap();

    let doc = load_pdf(&result.output).await;
    let info_ref = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_dictionary(info_ref).unwrap();
    let Ok(lopdf::Object::String(bytes, _)) = info.get(b"Title") else {
        panic!("missing Title in Info dictionary");
    };
    assert_eq!(bytes, b"Collected Works");
}
