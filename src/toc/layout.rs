//! TOC layout planning.
//!
//! The planner resolves the self-referential part of the build: the TOC
//! occupies pages of its own, and every chapter's destination page number
//! shifts by however many pages the TOC adds — but the TOC's page count
//! is only a function of the entry count and the per-page capacities, so
//! it can be computed by a structural dry run before anything is drawn.
//!
//! The flow is two-pass:
//!
//! 1. **Dry run** - simulate placing one entry per line and count the
//!    TOC pages this produces. No text measurement is needed.
//! 2. **Real run** - with the TOC page count now fixed, assign each
//!    chapter its absolute destination page and each entry its TOC page
//!    and line.
//!
//! The dry-run simulation and the closed-form placement formula are two
//!    different computations of the same partition; the planner checks
//! that they agree and aborts on mismatch rather than letting every
//! destination after the boundary silently drift.

use crate::error::{BookbindError, Result};

/// Number of TOC entries that fit on the first vs. subsequent pages.
///
/// The first page holds fewer entries because the header occupies the
/// top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocCapacity {
    /// Entries on the first TOC page.
    pub first_page: usize,

    /// Entries on every TOC page after the first.
    pub other_pages: usize,
}

impl Default for TocCapacity {
    fn default() -> Self {
        Self {
            first_page: 30,
            other_pages: 32,
        }
    }
}

/// Title and page count of one chapter, as seen by the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterExtent {
    /// Chapter title shown in the TOC.
    pub title: String,

    /// Number of pages the chapter contributes (0 for unreadable or
    /// empty chapters; they still reserve a TOC slot).
    pub page_count: usize,
}

impl ChapterExtent {
    /// Convenience constructor.
    pub fn new(title: impl Into<String>, page_count: usize) -> Self {
        Self {
            title: title.into(),
            page_count,
        }
    }
}

/// A fully planned TOC entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    /// Index of the chapter in the scanned input order.
    pub source_index: usize,

    /// Chapter title shown in the TOC.
    pub title: String,

    /// Number of pages the chapter contributes.
    pub page_count: usize,

    /// 1-based page number printed in the TOC and targeted by the link.
    pub destination_page: usize,

    /// TOC page (0-based, counted among TOC pages only) carrying this
    /// entry.
    pub toc_page_index: usize,

    /// Line on that TOC page (0-based from the top).
    pub line_index: usize,
}

/// The complete layout plan for one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    /// Number of TOC pages, as established by the dry run.
    pub toc_page_count: usize,

    /// 1 when a cover page precedes the TOC, else 0.
    pub cover_offset: usize,

    /// One entry per chapter, in reading order.
    pub entries: Vec<PlannedEntry>,
}

impl LayoutPlan {
    /// Total pages the final document will contain.
    pub fn total_pages(&self) -> usize {
        self.cover_offset
            + self.toc_page_count
            + self.entries.iter().map(|e| e.page_count).sum::<usize>()
    }
}

/// Compute the layout plan for an ordered list of chapters.
///
/// # Arguments
///
/// * `chapters` - titles and page counts, in reading order
/// * `capacity` - per-page TOC entry capacities
/// * `cover_offset` - 1 when a cover page precedes the TOC, else 0
///
/// # Errors
///
/// Returns [`BookbindError::NothingToLayOut`] for an empty chapter list
/// and [`BookbindError::LayoutInconsistency`] if the dry run and the
/// placement formula disagree about the TOC page count.
pub fn plan(
    chapters: &[ChapterExtent],
    capacity: TocCapacity,
    cover_offset: usize,
) -> Result<LayoutPlan> {
    if chapters.is_empty() {
        return Err(BookbindError::NothingToLayOut);
    }

    // Pass 1: dry run. Only the entry count matters here.
    let toc_page_count = simulate_toc_pages(chapters.len(), capacity);

    // The placement formula must reproduce the dry run's partition
    // exactly; check before committing any destination number.
    let highest_index = toc_page_index(chapters.len() - 1, capacity);
    if toc_page_count != highest_index + 1 {
        return Err(BookbindError::LayoutInconsistency {
            expected: toc_page_count,
            actual: highest_index + 1,
        });
    }

    // Pass 2: destinations and per-entry placement. The running page
    // counter is an explicit accumulator, never shared state.
    let mut current_absolute_page = toc_page_count + cover_offset;
    let mut entries = Vec::with_capacity(chapters.len());

    for (source_index, chapter) in chapters.iter().enumerate() {
        let destination_page = current_absolute_page + 1;
        if chapter.page_count > 0 {
            current_absolute_page += chapter.page_count;
        }
        // A zero-page chapter keeps this destination; its link will
        // land on the next chapter's first page.

        entries.push(PlannedEntry {
            source_index,
            title: chapter.title.clone(),
            page_count: chapter.page_count,
            destination_page,
            toc_page_index: toc_page_index(source_index, capacity),
            line_index: line_index(source_index, capacity),
        });
    }

    Ok(LayoutPlan {
        toc_page_count,
        cover_offset,
        entries,
    })
}

/// Dry run: count the TOC pages needed for `entry_count` entries.
///
/// Simulates placing one entry per line, starting a new page whenever
/// the current one is full. Deliberately written as a simulation rather
/// than arithmetic so it is an independent check on the closed-form
/// placement below.
fn simulate_toc_pages(entry_count: usize, capacity: TocCapacity) -> usize {
    debug_assert!(capacity.first_page > 0 && capacity.other_pages > 0);

    let mut pages = 1;
    let mut lines_on_page = 0;
    let mut page_capacity = capacity.first_page;

    for _ in 0..entry_count {
        if lines_on_page == page_capacity {
            pages += 1;
            lines_on_page = 0;
            page_capacity = capacity.other_pages;
        }
        lines_on_page += 1;
    }

    pages
}

/// TOC page carrying entry `index` (0-based).
fn toc_page_index(index: usize, capacity: TocCapacity) -> usize {
    if index < capacity.first_page {
        0
    } else {
        1 + (index - capacity.first_page) / capacity.other_pages
    }
}

/// Line of entry `index` on its TOC page (0-based from the top).
fn line_index(index: usize, capacity: TocCapacity) -> usize {
    if index < capacity.first_page {
        index
    } else {
        (index - capacity.first_page) % capacity.other_pages
    }
}
