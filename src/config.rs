//! Configuration module for bookbind.
//!
//! This module transforms CLI arguments (or interactive answers) into a
//! validated, normalized configuration that drives the book build. It
//! handles:
//! - Validation of argument combinations
//! - Resolution of conflicting options
//! - Application of defaults
//! - Derivation of the output path from the input folder

use anyhow::{Result, bail};

use std::path::{Path, PathBuf};

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for a book build.
///
/// This structure contains all settings needed to build the merged book,
/// derived and validated from CLI arguments or interactive prompts.
#[derive(Debug, Clone)]
pub struct Config {
    /// Folder containing the chapter PDFs.
    pub input_dir: PathBuf,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Book title, drawn as the TOC header and set as document metadata.
    pub title: Option<String>,

    /// Optional cover image placed as the first page.
    pub cover: Option<PathBuf>,

    /// Dry run mode - plan the layout without creating output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Abort the whole run when a chapter fails to load, instead of
    /// treating it as a zero-page chapter.
    pub strict: bool,

    /// Number of parallel jobs for loading chapters (None = auto-detect).
    pub jobs: Option<usize>,
}

impl Config {
    /// Derive the default output path for an input folder.
    ///
    /// The merged book is named `<folderName>_merged.pdf` and written
    /// adjacent to the input folder.
    pub fn default_output_for(input_dir: &Path) -> PathBuf {
        let name = input_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("book");

        match input_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                parent.join(format!("{name}_merged.pdf"))
            }
            _ => PathBuf::from(format!("{name}_merged.pdf")),
        }
    }

    /// Validate the configuration.
    ///
    /// Checks for logical inconsistencies and invalid combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input folder does not exist or is not a directory
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - The cover image does not exist
    /// - The output path points into nothing writable
    pub fn validate(&self) -> Result<()> {
        if !self.input_dir.is_dir() {
            bail!(
                "Input folder does not exist or is not a directory: {}",
                self.input_dir.display()
            );
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        if let Some(ref cover) = self.cover
            && !cover.is_file()
        {
            bail!("Cover image not found: {}", cover.display());
        }

        // The output must not land inside the input folder, or a rerun
        // would try to merge the previous output into itself.
        if self.output.parent() == Some(self.input_dir.as_path()) {
            bail!(
                "Output file cannot be placed inside the input folder: {}",
                self.output.display()
            );
        }

        Ok(())
    }

    /// Get the effective number of parallel jobs.
    ///
    /// Returns the configured job count, or the number of CPU cores if
    /// auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
