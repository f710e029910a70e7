//! Chapter loading and page counting.
//!
//! This module is the page-count oracle for the layout planner: it opens
//! each chapter PDF once, reads its page count, and keeps the parsed
//! document around for assembly. Loading supports:
//! - Sequential and parallel loading
//! - Order preservation (chapters stay in reading order)
//! - Detailed load statistics
//!
//! A chapter that fails to parse is reported as an error here; whether
//! that aborts the run or demotes the chapter to zero pages is the
//! pipeline's decision (`--strict`).

use lopdf::Document;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::error::{BookbindError, Result};
use crate::inputs::SourceDocument;

/// A loaded chapter with its page count.
#[derive(Debug)]
pub struct LoadedChapter {
    /// Path to the source file.
    pub path: PathBuf,

    /// Chapter title shown in the TOC.
    pub title: String,

    /// Number of pages in the chapter.
    pub page_count: usize,

    /// The parsed document; None for chapters normalized to zero pages.
    pub document: Option<Document>,

    /// Time taken to load the document.
    pub load_time: Duration,
}

impl LoadedChapter {
    /// Create a placeholder for a chapter that could not be read.
    ///
    /// The chapter keeps its TOC slot and destination-page number but
    /// contributes no pages and no bookmark.
    pub fn empty(source: &SourceDocument) -> Self {
        Self {
            path: source.path.clone(),
            title: source.title.clone(),
            page_count: 0,
            document: None,
            load_time: Duration::ZERO,
        }
    }
}

/// Result of loading one chapter.
pub type LoadResult = Result<LoadedChapter>;

/// Statistics for a batch load operation.
#[derive(Debug, Clone)]
pub struct LoadStatistics {
    /// Number of chapters successfully loaded.
    pub success_count: usize,

    /// Number of chapters that failed to load.
    pub failure_count: usize,

    /// Total time taken for all loads.
    pub total_time: Duration,

    /// Total number of pages across loaded chapters.
    pub total_pages: usize,
}

impl LoadStatistics {
    /// Create statistics from load results.
    fn from_results(results: &[LoadResult], total_time: Duration) -> Self {
        let mut success_count = 0;
        let mut failure_count = 0;
        let mut total_pages = 0;

        for result in results {
            match result {
                Ok(loaded) => {
                    success_count += 1;
                    total_pages += loaded.page_count;
                }
                Err(_) => {
                    failure_count += 1;
                }
            }
        }

        Self {
            success_count,
            failure_count,
            total_time,
            total_pages,
        }
    }
}

/// Chapter reader with configurable loading behavior.
#[derive(Debug, Clone, Default)]
pub struct ChapterReader;

impl ChapterReader {
    /// Create a new chapter reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single chapter document and read its page count.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// PDF. A valid PDF with zero pages is not an error; the oracle
    /// reports its count as 0.
    pub async fn load(&self, source: &SourceDocument) -> Result<LoadedChapter> {
        let start = Instant::now();

        let document = Document::load(&source.path).await.map_err(|e| {
            BookbindError::failed_to_load_pdf(source.path.clone(), e.to_string())
        })?;

        let page_count = document.get_pages().len();
        let load_time = start.elapsed();

        Ok(LoadedChapter {
            path: source.path.clone(),
            title: source.title.clone(),
            page_count,
            document: Some(document),
            load_time,
        })
    }

    /// Load chapters one at a time in reading order.
    pub async fn load_sequential(&self, sources: &[SourceDocument]) -> Vec<LoadResult> {
        let mut results = Vec::with_capacity(sources.len());

        for source in sources {
            results.push(self.load(source).await);
        }

        results
    }

    /// Load chapters concurrently with a bounded number of workers.
    ///
    /// Results are restored to input order, so chapter indices stay
    /// aligned with the scanned sources regardless of completion order.
    pub async fn load_parallel(
        &self,
        sources: &[SourceDocument],
        workers: usize,
    ) -> Vec<LoadResult> {
        use futures::stream::{self, StreamExt};

        let workers = workers.max(1);

        let tasks = sources.iter().enumerate().map(|(idx, source)| {
            let source = source.clone();
            let reader = self.clone();
            async move {
                let result = reader.load(&source).await;
                (idx, result)
            }
        });

        let mut indexed_results: Vec<(usize, LoadResult)> = stream::iter(tasks)
            .buffer_unordered(workers)
            .collect::<Vec<_>>()
            .await;

        indexed_results.sort_by_key(|(idx, _)| *idx);
        indexed_results.into_iter().map(|(_, r)| r).collect()
    }

    /// Load all chapters with automatic parallelization.
    ///
    /// Sequential loading is used for small batches to reduce overhead.
    ///
    /// # Returns
    ///
    /// A tuple of (results, statistics) where results contains the load
    /// outcome for each chapter in input order.
    pub async fn load_all(
        &self,
        sources: &[SourceDocument],
        max_workers: usize,
    ) -> (Vec<LoadResult>, LoadStatistics) {
        let start = Instant::now();

        let results = if sources.len() <= 3 {
            self.load_sequential(sources).await
        } else {
            self.load_parallel(sources, max_workers).await
        };

        let total_time = start.elapsed();
        let stats = LoadStatistics::from_results(&results, total_time);

        (results, stats)
    }
}
