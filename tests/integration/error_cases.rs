//! Error-path behavior of the pipeline.

use crate::common::*;
use bookbind::error::BookbindError;
use bookbind::merge::{build_book, plan_book};
use tempfile::TempDir;

#[tokio::test]
async fn test_empty_folder_aborts_with_a_user_facing_error() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();
    std::fs::write(chapters.join("notes.txt"), b"not a chapter").unwrap();

    let config = test_config(&chapters);
    let result = build_book(&config).await;

    assert!(matches!(
        result,
        Err(BookbindError::NoChaptersFound { .. })
    ));
    assert!(!config.output.exists());
}

#[tokio::test]
async fn test_strict_mode_aborts_on_unreadable_chapter() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();

    create_chapter_pdf(&chapters, "ch1.pdf", 2);
    std::fs::write(chapters.join("ch2.pdf"), b"broken").unwrap();

    let mut config = test_config(&chapters);
    config.strict = true;

    let result = plan_book(&config).await;
    assert!(matches!(
        result,
        Err(BookbindError::FailedToLoadPdf { .. })
    ));
}

#[tokio::test]
async fn test_lenient_mode_survives_what_strict_mode_rejects() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();

    create_chapter_pdf(&chapters, "ch1.pdf", 2);
    std::fs::write(chapters.join("ch2.pdf"), b"broken").unwrap();

    let config = test_config(&chapters);
    let book_plan = plan_book(&config).await.unwrap();

    // The broken chapter is still planned, as a zero-page entry.
    assert_eq!(book_plan.plan.entries.len(), 2);
    assert_eq!(book_plan.plan.entries[1].page_count, 0);
}

#[tokio::test]
async fn test_all_chapters_unreadable_still_builds_a_toc_only_book() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();

    std::fs::write(chapters.join("ch1.pdf"), b"broken").unwrap();
    std::fs::write(chapters.join("ch2.pdf"), b"also broken").unwrap();

    let config = test_config(&chapters);
    let result = build_book(&config).await.unwrap();

    // One TOC page, no chapter pages, no bookmarks, no bindable links.
    assert_eq!(result.statistics.total_pages, 1);
    assert_eq!(result.statistics.bookmarks_added, 0);
    assert_eq!(result.statistics.links_added, 0);
    assert_eq!(result.statistics.links_skipped, 2);

    let doc = load_pdf(&result.output).await;
    assert_eq!(doc.get_pages().len(), 1);
}

#[tokio::test]
async fn test_missing_cover_fails_validation() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();
    create_chapter_pdf(&chapters, "ch1.pdf", 1);

    let mut config = test_config(&chapters);
    config.cover = Some(temp_dir.path().join("missing.png"));

    assert!(config.validate().is_err());
}
