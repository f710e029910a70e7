//! Input enumeration for bookbind.
//!
//! This module finds the chapter PDFs inside the input folder, derives
//! their titles from the filenames, and puts them in reading order using
//! the natural-order comparator. It also spots gaps in numbered chapter
//! sequences (`Chapter 6`, `Chapter 8` with no `Chapter 7`) so the user
//! hears about a missing file before the book is built without it.

pub mod natural;

pub use natural::natural_cmp;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BookbindError, Result};

/// A chapter source discovered in the input folder.
///
/// The page count is not known yet at this stage; it is read later by
/// the chapter reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Path to the chapter PDF.
    pub path: PathBuf,

    /// Chapter title, derived from the filename without extension.
    pub title: String,
}

/// Enumerate the chapter PDFs in a folder, in natural order.
///
/// Matches files with a `.pdf` extension (case-insensitive), derives
/// each title from the file stem, and sorts by filename so embedded
/// chapter numbers come out in reading order.
///
/// # Errors
///
/// Returns [`BookbindError::NoChaptersFound`] if the folder contains no
/// PDF files, and propagates glob/filesystem errors.
pub fn scan_folder(dir: &Path) -> Result<Vec<SourceDocument>> {
    let pattern = format!("{}/*", dir.display());

    let entries = glob::glob(&pattern).map_err(|err| BookbindError::Other {
        message: err.to_string(),
    })?;

    let mut documents = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| BookbindError::Other {
            message: err.to_string(),
        })?;

        if !is_pdf_file(&path) {
            continue;
        }

        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Untitled")
            .to_string();

        documents.push(SourceDocument { path, title });
    }

    if documents.is_empty() {
        return Err(BookbindError::no_chapters_found(dir.to_path_buf()));
    }

    documents.sort_by(|a, b| {
        let name_a = a.path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let name_b = b.path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        natural_cmp(name_a, name_b)
    });

    Ok(documents)
}

/// Check whether a path looks like a PDF file.
fn is_pdf_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Detect gaps in numbered chapter sequences.
///
/// Titles ending in a digit run are grouped by their textual prefix
/// (case-insensitive, surrounding whitespace ignored). For every group
/// with at least two members, the numbers absent between the smallest
/// and largest present are reported. Detection only - a gap never stops
/// the run.
pub fn missing_chapter_numbers(documents: &[SourceDocument]) -> Vec<u64> {
    use std::collections::BTreeMap;

    let mut groups: BTreeMap<String, Vec<u64>> = BTreeMap::new();

    for doc in documents {
        if let Some((prefix, number)) = split_trailing_number(&doc.title) {
            groups
                .entry(prefix.trim().to_lowercase())
                .or_default()
                .push(number);
        }
    }

    let mut missing = Vec::new();
    for numbers in groups.values_mut() {
        if numbers.len() < 2 {
            continue;
        }
        numbers.sort_unstable();
        numbers.dedup();

        let mut expected = numbers[0];
        for &n in numbers.iter() {
            while expected < n {
                missing.push(expected);
                expected += 1;
            }
            expected = n + 1;
        }
    }

    missing.sort_unstable();
    missing.dedup();
    missing
}

/// Split a title into its textual prefix and a trailing chapter number.
///
/// Returns None when the title does not end in digits or the digit run
/// does not fit a u64.
fn split_trailing_number(title: &str) -> Option<(&str, u64)> {
    let trimmed = title.trim_end();
    let prefix = trimmed.trim_end_matches(|c: char| c.is_ascii_digit());
    if prefix.len() == trimmed.len() {
        return None;
    }
    let number = trimmed[prefix.len()..].parse::<u64>().ok()?;
    Some((prefix, number))
}

/// Per-chapter record in a scan summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRecord {
    /// Path to the chapter PDF.
    pub path: PathBuf,

    /// Chapter title shown in the TOC.
    pub title: String,

    /// Number of pages the chapter contributes (0 if unreadable).
    pub page_count: usize,
}

/// Summary of an input scan, suitable for display or JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    /// Folder that was scanned.
    pub folder: PathBuf,

    /// Chapters in reading order.
    pub chapters: Vec<ChapterRecord>,

    /// Total pages across all readable chapters.
    pub total_pages: usize,

    /// Number of chapters normalized to zero pages.
    pub chapters_unreadable: usize,

    /// Chapter numbers absent from an otherwise contiguous sequence.
    pub missing_numbers: Vec<u64>,
}

impl ScanSummary {
    /// Build a summary from per-chapter records.
    pub fn new(folder: PathBuf, chapters: Vec<ChapterRecord>, missing_numbers: Vec<u64>) -> Self {
        let total_pages = chapters.iter().map(|c| c.page_count).sum();
        let chapters_unreadable = chapters.iter().filter(|c| c.page_count == 0).count();

        Self {
            folder,
            chapters,
            total_pages,
            chapters_unreadable,
            missing_numbers,
        }
    }
}
