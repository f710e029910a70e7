//! Error types for bookbind.
//!
//! This module defines all error types that can occur while building a
//! book from chapter PDFs. Errors are designed to be informative and
//! actionable, providing clear context about what went wrong.
//!
//! # Error Categories
//!
//! - **Input errors**: empty folder, unreadable chapter, bad cover image
//! - **Layout errors**: nothing to lay out, dry-run/real-run mismatch
//! - **Assembly errors**: page tree, bookmark, or link-binding failures
//! - **I/O errors**: output creation and write failures

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for bookbind operations.
pub type Result<T> = std::result::Result<T, BookbindError>;

/// Main error type for bookbind operations.
#[derive(Debug)]
pub enum BookbindError {
    /// Input folder contains no PDF documents.
    NoChaptersFound {
        /// Folder that was scanned.
        dir: PathBuf,
    },

    /// A chapter PDF failed to open or parse.
    FailedToLoadPdf {
        /// Path to the chapter file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// The cover image could not be loaded or embedded.
    CoverFailed {
        /// Path to the cover image.
        path: PathBuf,
        /// Details about the failure.
        reason: String,
    },

    /// The layout planner was given an empty entry list.
    NothingToLayOut,

    /// The dry-run TOC page count disagrees with the real-run placement.
    ///
    /// Proceeding would silently corrupt every destination page number
    /// after the mismatch point, so the run is aborted instead.
    LayoutInconsistency {
        /// Page count produced by the dry-run simulation.
        expected: usize,
        /// Page count implied by the real-run placement.
        actual: usize,
    },

    /// TOC rendering failed.
    RenderFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Document assembly failed.
    AssemblyFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Bookmark (outline) creation failed.
    BookmarkFailed {
        /// Details about the failure.
        reason: String,
    },

    /// Attaching link annotations failed.
    LinkBindFailed {
        /// Details about the failure.
        reason: String,
    },

    /// Output file already exists and overwrite is not allowed.
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create the output file.
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to the output file.
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    Cancelled,

    /// Generic I/O error.
    Io {
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Generic error with a custom message.
    Other {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for BookbindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoChaptersFound { dir } => {
                write!(f, "No PDF files found in folder: {}", dir.display())
            }
            Self::FailedToLoadPdf { path, reason } => {
                write!(
                    f,
                    "Failed to load PDF: {}\n  Reason: {}",
                    path.display(),
                    reason
                )
            }
            Self::CoverFailed { path, reason } => {
                write!(
                    f,
                    "Failed to add cover image: {}\n  Reason: {}",
                    path.display(),
                    reason
                )
            }
            Self::NothingToLayOut => {
                write!(f, "No entries to lay out in the table of contents")
            }
            Self::LayoutInconsistency { expected, actual } => {
                write!(
                    f,
                    "TOC layout inconsistency: dry run planned {expected} page(s) \
                     but placement produced {actual}\n  \
                     Destination page numbers would be wrong; aborting"
                )
            }
            Self::RenderFailed { reason } => {
                write!(f, "Failed to render table of contents: {reason}")
            }
            Self::AssemblyFailed { reason } => {
                write!(f, "Document assembly failed: {reason}")
            }
            Self::BookmarkFailed { reason } => {
                write!(f, "Failed to create bookmarks: {reason}")
            }
            Self::LinkBindFailed { reason } => {
                write!(f, "Failed to attach TOC links: {reason}")
            }
            Self::OutputExists { path } => {
                write!(
                    f,
                    "Output file already exists: {}\n  \
                     Use --force to overwrite or choose a different output path",
                    path.display()
                )
            }
            Self::FailedToCreateOutput { path, source } => {
                write!(
                    f,
                    "Failed to create output file: {}\n  Reason: {}",
                    path.display(),
                    source
                )
            }
            Self::FailedToWrite { path, source } => {
                write!(
                    f,
                    "Failed to write to output file: {}\n  Reason: {}",
                    path.display(),
                    source
                )
            }
            Self::InvalidConfig { message } => {
                write!(f, "Invalid configuration: {message}")
            }
            Self::Cancelled => {
                write!(f, "Operation cancelled by user")
            }
            Self::Io { source } => {
                write!(f, "I/O error: {source}")
            }
            Self::Other { message } => {
                write!(f, "{message}")
            }
        }
    }
}

impl std::error::Error for BookbindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FailedToCreateOutput { source, .. } => Some(source),
            Self::FailedToWrite { source, .. } => Some(source),
            Self::Io { source } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for BookbindError {
    fn from(err: io::Error) -> Self {
        Self::Io { source: err }
    }
}

impl From<lopdf::Error> for BookbindError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for BookbindError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl BookbindError {
    /// Create a NoChaptersFound error.
    pub fn no_chapters_found(dir: PathBuf) -> Self {
        Self::NoChaptersFound { dir }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create a CoverFailed error.
    pub fn cover_failed(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::CoverFailed {
            path,
            reason: reason.into(),
        }
    }

    /// Create a RenderFailed error.
    pub fn render_failed(reason: impl Into<String>) -> Self {
        Self::RenderFailed {
            reason: reason.into(),
        }
    }

    /// Create an AssemblyFailed error.
    pub fn assembly_failed(reason: impl Into<String>) -> Self {
        Self::AssemblyFailed {
            reason: reason.into(),
        }
    }

    /// Create a BookmarkFailed error.
    pub fn bookmark_failed(reason: impl Into<String>) -> Self {
        Self::BookmarkFailed {
            reason: reason.into(),
        }
    }

    /// Create a LinkBindFailed error.
    pub fn link_bind_failed(reason: impl Into<String>) -> Self {
        Self::LinkBindFailed {
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable (run can continue).
    ///
    /// Returns true for errors that are downgraded to warnings in the
    /// default (non-strict) mode.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FailedToLoadPdf { .. } | Self::BookmarkFailed { .. }
        )
    }

    /// Check if this error should stop all processing immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NoChaptersFound { .. }
                | Self::NothingToLayOut
                | Self::LayoutInconsistency { .. }
                | Self::FailedToCreateOutput { .. }
                | Self::FailedToWrite { .. }
                | Self::Cancelled
        )
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoChaptersFound { .. } => 1,
            Self::FailedToLoadPdf { .. } => 3,
            Self::CoverFailed { .. } => 3,
            Self::NothingToLayOut => 1,
            Self::LayoutInconsistency { .. } => 6,
            Self::RenderFailed { .. } => 6,
            Self::AssemblyFailed { .. } => 6,
            Self::BookmarkFailed { .. } => 6,
            Self::LinkBindFailed { .. } => 6,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
