//! Output formatting and display for bookbind.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Scan summary display
//! - Error and warning display
//! - Quiet and verbose modes

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::inputs::ScanSummary;

/// Display a scan summary to the user.
///
/// Unreadable chapters and missing chapter numbers are surfaced as
/// warnings; the page total is informational.
pub fn display_scan_summary(formatter: &OutputFormatter, summary: &ScanSummary) {
    if summary.chapters_unreadable > 0 {
        formatter.warning(&format!(
            "Warning: {} chapter(s) contribute no pages",
            summary.chapters_unreadable
        ));
    }

    if !summary.missing_numbers.is_empty() {
        let numbers: Vec<String> = summary
            .missing_numbers
            .iter()
            .map(|n| n.to_string())
            .collect();
        formatter.warning(&format!(
            "Warning: chapter number(s) missing from the folder: {}",
            numbers.join(", ")
        ));
    }

    formatter.info(&format!(
        "Found {} chapter(s): {} pages",
        summary.chapters.len(),
        summary.total_pages
    ));
}
