//! Book building pipeline.
//!
//! Sequencing of a full run: enumerate and naturally sort the chapter
//! files, read page counts, plan the TOC layout (dry run first, then
//! destinations and placement), render the TOC, assemble cover + TOC +
//! chapters, save to an intermediate artifact, bind the clickable links
//! on it, and save the final output. The intermediate artifact is
//! removed on every exit path.
//!
//! # Examples
//!
//! ```no_run
//! use bookbind::config::{Config, OverwriteMode};
//! use bookbind::merge::build_book;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let input_dir = PathBuf::from("chapters");
//! let config = Config {
//!     output: Config::default_output_for(&input_dir),
//!     input_dir,
//!     title: Some("My Book".to_string()),
//!     cover: None,
//!     dry_run: false,
//!     verbose: false,
//!     quiet: false,
//!     overwrite_mode: OverwriteMode::Prompt,
//!     strict: false,
//!     jobs: None,
//! };
//!
//! let result = build_book(&config).await?;
//! println!("Created {} page book", result.statistics.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod bookmarks;
pub mod links;

pub use assembler::{AssembledBook, DocumentAssembler};
pub use bookmarks::BookmarkManager;
pub use links::{GoToAction, LinkAnnotation, LinkBinder, LinkStatistics, ViewIntent};

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::Result;
use crate::inputs::{self, ChapterRecord, ScanSummary};
use crate::io::{ChapterReader, LoadedChapter, PdfWriter, TempArtifact};
use crate::toc::layout::{self, ChapterExtent, LayoutPlan, TocCapacity};
use crate::toc::render::TocRenderer;

/// Statistics about a completed build.
#[derive(Debug, Clone)]
pub struct BuildStatistics {
    /// Chapters that contributed pages to the book.
    pub chapters_merged: usize,

    /// Chapters normalized to zero pages (unreadable or empty).
    pub chapters_skipped: usize,

    /// Total number of pages in the output document.
    pub total_pages: usize,

    /// Number of TOC pages.
    pub toc_pages: usize,

    /// Number of outline entries created.
    pub bookmarks_added: usize,

    /// Number of TOC link annotations attached.
    pub links_added: usize,

    /// TOC entries whose destination lay past the end of the document.
    pub links_skipped: usize,

    /// Overlapping clickable rectangles detected during binding.
    pub overlapping_rects: usize,

    /// Time spent loading chapter PDFs.
    pub load_time: Duration,

    /// Total wall-clock time of the build.
    pub build_time: Duration,
}

/// Result of a completed build.
pub struct BuildResult {
    /// Path of the written book.
    pub output: PathBuf,

    /// The layout plan the book was built from.
    pub plan: LayoutPlan,

    /// Scan summary of the input folder.
    pub summary: ScanSummary,

    /// Statistics about the build.
    pub statistics: BuildStatistics,
}

/// Scanned, counted, and planned inputs - everything a dry run shows.
pub struct BookPlan {
    /// Loaded chapters in reading order.
    pub chapters: Vec<LoadedChapter>,

    /// The computed layout plan.
    pub plan: LayoutPlan,

    /// Scan summary of the input folder.
    pub summary: ScanSummary,

    /// Time spent loading chapter PDFs.
    pub load_time: Duration,
}

/// Scan the input folder, read page counts, and plan the layout.
///
/// In the default (lenient) mode an unreadable chapter is demoted to a
/// zero-page placeholder with a warning; with `--strict` it aborts the
/// run.
///
/// # Errors
///
/// Returns an error when the folder holds no PDFs, when a chapter fails
/// to load in strict mode, or when layout planning fails.
pub async fn plan_book(config: &Config) -> Result<BookPlan> {
    let sources = inputs::scan_folder(&config.input_dir)?;
    let missing_numbers = inputs::missing_chapter_numbers(&sources);

    let reader = ChapterReader::new();
    let (results, load_stats) = reader.load_all(&sources, config.effective_jobs()).await;

    let mut chapters = Vec::with_capacity(sources.len());
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(loaded) => chapters.push(loaded),
            Err(e) if !config.strict => {
                eprintln!("Warning: treating chapter as empty: {e}");
                chapters.push(LoadedChapter::empty(source));
            }
            Err(e) => return Err(e),
        }
    }

    let extents: Vec<ChapterExtent> = chapters
        .iter()
        .map(|c| ChapterExtent::new(c.title.clone(), c.page_count))
        .collect();
    let cover_offset = usize::from(config.cover.is_some());

    let plan = layout::plan(&extents, TocCapacity::default(), cover_offset)?;

    let records: Vec<ChapterRecord> = chapters
        .iter()
        .map(|c| ChapterRecord {
            path: c.path.clone(),
            title: c.title.clone(),
            page_count: c.page_count,
        })
        .collect();
    let summary = ScanSummary::new(config.input_dir.clone(), records, missing_numbers);

    Ok(BookPlan {
        chapters,
        plan,
        summary,
        load_time: load_stats.total_time,
    })
}

/// Build the complete book and write it to the configured output path.
///
/// # Errors
///
/// Any failing stage aborts the run; the intermediate artifact is
/// removed on the way out.
pub async fn build_book(config: &Config) -> Result<BuildResult> {
    let build_start = Instant::now();

    let book_plan = plan_book(config).await?;
    let BookPlan {
        chapters,
        plan,
        summary,
        load_time,
    } = book_plan;

    let chapters_merged = chapters.iter().filter(|c| c.page_count > 0).count();
    let chapters_skipped = chapters.len() - chapters_merged;

    let renderer = TocRenderer::new(config.title.as_deref());
    let toc = renderer.render(&plan)?;

    let assembler = DocumentAssembler::new();
    let assembled = assembler.assemble(
        chapters,
        &plan,
        &toc.pages,
        config.cover.as_deref(),
        config.title.as_deref(),
    )?;

    let writer = PdfWriter::new();

    // The assembled-but-unlinked book lives in a guarded temp file; the
    // guard removes it even when binding or the final save fails.
    let temp = TempArtifact::new(intermediate_path(&config.output));
    writer.save(&assembled.document, temp.path()).await?;

    let binder = LinkBinder::new();
    let (bound, link_stats) = binder.bind_file(temp.path(), &plan, &toc.rects).await?;

    writer.save(&bound, &config.output).await?;
    drop(temp);

    let statistics = BuildStatistics {
        chapters_merged,
        chapters_skipped,
        total_pages: assembled.total_pages,
        toc_pages: plan.toc_page_count,
        bookmarks_added: assembled.bookmarks_added,
        links_added: link_stats.links_added,
        links_skipped: link_stats.links_skipped,
        overlapping_rects: link_stats.overlapping_rects,
        load_time,
        build_time: build_start.elapsed(),
    };

    Ok(BuildResult {
        output: config.output.clone(),
        plan,
        summary,
        statistics,
    })
}

/// Path of the intermediate assembled document, next to the output.
fn intermediate_path(output: &Path) -> PathBuf {
    output.with_extension("book.tmp")
}
