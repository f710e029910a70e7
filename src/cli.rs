//! CLI argument parsing for bookbind.
//!
//! This module defines the command-line interface structure using
//! `clap`. When the chapter folder is not given on the command line,
//! the missing pieces (folder, book title, cover image) are asked for
//! interactively, matching the prompt-driven workflow the tool grew out
//! of.

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::{Config, OverwriteMode};
use crate::error::{BookbindError, Result};

/// Merge a folder of chapter PDFs into one book with a linked TOC.
///
/// bookbind reads every PDF in the folder in natural order, prepends a
/// paginated table of contents whose entries jump to the right page,
/// adds one bookmark per chapter, and writes `<folder>_merged.pdf`
/// next to the input folder.
#[derive(Parser, Debug)]
#[command(name = "bookbind")]
#[command(version)]
#[command(about = "Merge chapter PDFs into a single book with a linked table of contents", long_about = None)]
#[command(author)]
pub struct Cli {
    /// Folder containing the chapter PDFs
    ///
    /// Files are matched by their .pdf extension (case-insensitive) and
    /// merged in natural order, so "ch2.pdf" comes before "ch10.pdf".
    /// When omitted, bookbind asks for the folder interactively.
    #[arg(value_name = "FOLDER")]
    pub folder: Option<PathBuf>,

    /// Output PDF file path
    ///
    /// Defaults to `<folderName>_merged.pdf` written adjacent to the
    /// input folder.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Book title
    ///
    /// Drawn as the heading of the table of contents and set as the
    /// document's Title metadata. Defaults to a generic heading.
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Cover image placed as the first page
    ///
    /// The image is stretched to fill an A4 page ahead of the table of
    /// contents; every destination page shifts by one accordingly.
    #[arg(long, value_name = "IMAGE")]
    pub cover: Option<PathBuf>,

    /// Dry run - plan the layout without creating output
    ///
    /// Shows the chapters in merge order, their destination pages, and
    /// the number of TOC pages, then exits without writing anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show detailed information about the build
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    ///
    /// Only errors and warnings will be printed.
    /// Useful for scripts and automation.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    ///
    /// If the output file already exists, exit with an error instead of
    /// prompting or overwriting.
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Abort when a chapter fails to load
    ///
    /// By default an unreadable chapter is kept as a zero-page entry:
    /// it still appears in the TOC but contributes no pages. With this
    /// flag the whole run fails instead.
    #[arg(long)]
    pub strict: bool,

    /// Number of parallel jobs for loading chapters
    ///
    /// Controls how many chapter PDFs are loaded concurrently.
    /// Default is the number of CPU cores.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// Prompts interactively for the folder (and, in that case, for the
    /// optional title and cover) when it was not given as an argument.
    ///
    /// # Errors
    ///
    /// Returns an error if the interactive input cannot be read or the
    /// resulting configuration fails validation.
    pub fn into_config(self) -> Result<Config> {
        let (folder, title, cover) = match self.folder {
            Some(folder) => (folder, self.title, self.cover),
            None => {
                let folder = prompt("Enter the chapter folder path: ")?;
                if folder.is_empty() {
                    return Err(BookbindError::invalid_config(
                        "no input folder given",
                    ));
                }

                let title = self.title.or_else(|| {
                    prompt("Book title (optional): ")
                        .ok()
                        .filter(|t| !t.is_empty())
                });
                let cover = self.cover.or_else(|| {
                    prompt("Cover image path (optional): ")
                        .ok()
                        .filter(|c| !c.is_empty())
                        .map(PathBuf::from)
                });

                (PathBuf::from(folder), title, cover)
            }
        };

        let output = self
            .output
            .unwrap_or_else(|| Config::default_output_for(&folder));

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            input_dir: folder,
            output,
            title,
            cover,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            overwrite_mode,
            strict: self.strict,
            jobs: self.jobs,
        };

        config
            .validate()
            .map_err(|e| BookbindError::invalid_config(e.to_string()))?;

        Ok(config)
    }
}

/// Ask a question on stdout and read one trimmed line from stdin.
fn prompt(question: &str) -> Result<String> {
    print!("{question}");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .map_err(|err| BookbindError::other(format!("Failed to read input: {err}")))?;

    Ok(response.trim().to_string())
}
