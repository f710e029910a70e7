//! Dry-run behavior: planning without writing.

use crate::common::*;
use bookbind::merge::plan_book;
use tempfile::TempDir;

#[tokio::test]
async fn test_plan_book_produces_layout_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();

    create_chapter_pdf(&chapters, "ch1.pdf", 5);
    create_chapter_pdf(&chapters, "ch2.pdf", 3);
    create_chapter_pdf(&chapters, "ch3.pdf", 7);

    let mut config = test_config(&chapters);
    config.dry_run = true;

    let book_plan = plan_book(&config).await.unwrap();

    assert_eq!(book_plan.plan.toc_page_count, 1);
    let destinations: Vec<usize> = book_plan
        .plan
        .entries
        .iter()
        .map(|e| e.destination_page)
        .collect();
    assert_eq!(destinations, vec![2, 7, 10]);

    // Nothing is written during planning.
    assert!(!config.output.exists());
}

#[tokio::test]
async fn test_plan_book_summary_reports_missing_chapter_numbers() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();

    create_chapter_pdf(&chapters, "Chapter 1.pdf", 1);
    create_chapter_pdf(&chapters, "Chapter 2.pdf", 1);
    create_chapter_pdf(&chapters, "Chapter 4.pdf", 1);

    let config = test_config(&chapters);
    let book_plan = plan_book(&config).await.unwrap();

    assert_eq!(book_plan.summary.missing_numbers, vec![3]);
    assert_eq!(book_plan.summary.total_pages, 3);
}

#[tokio::test]
async fn test_plan_summary_serializes_to_json() {
    let temp_dir = TempDir::new().unwrap();
    let chapters = temp_dir.path().join("book");
    std::fs::create_dir(&chapters).unwrap();

    create_chapter_pdf(&chapters, "ch1.pdf", 2);

    let config = test_config(&chapters);
    let book_plan = plan_book(&config).await.unwrap();

    let json = serde_json::to_string_pretty(&book_plan.summary).unwrap();
    assert!(json.contains("\"totalPages\": 2"));
    assert!(json.contains("ch1"));
}
