//! PDF writing and intermediate-artifact handling.
//!
//! This module provides safe and efficient PDF writing with:
//! - Atomic writes (write to temp file, then rename)
//! - Compression support
//! - Overwrite protection helpers
//!
//! It also owns [`TempArtifact`], the scope guard for the intermediate
//! assembled document that exists between assembly and link binding.
//! The artifact is removed on every exit path, including error paths.

use lopdf::Document;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::{BookbindError, Result};

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Compress the PDF before writing.
    pub compress: bool,

    /// Renumber objects for a tidy cross-reference table.
    pub optimize: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            optimize: true,
            buffer_size: 8192,
        }
    }
}

/// PDF writer with configurable behavior.
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self {
            options: WriteOptions::default(),
        }
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer without compression (faster but larger files).
    pub fn without_compression() -> Self {
        Self {
            options: WriteOptions {
                compress: false,
                ..Default::default()
            },
        }
    }

    /// Save a PDF document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output directory doesn't exist
    /// - Insufficient permissions
    /// - Write operation fails
    pub async fn save(&self, doc: &Document, path: &Path) -> Result<()> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();

        // Clone the document for processing in a blocking task
        let mut doc_clone = doc.clone();

        task::spawn_blocking(move || {
            if options.compress {
                doc_clone.compress();
            }

            if options.optimize {
                doc_clone.renumber_objects();
            }

            let write_path = if options.atomic {
                path_buf.with_extension("tmp")
            } else {
                path_buf.clone()
            };

            let file = std::fs::File::create(&write_path).map_err(|e| {
                BookbindError::FailedToCreateOutput {
                    path: write_path.clone(),
                    source: e,
                }
            })?;

            let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, file);

            doc_clone
                .save_to(&mut writer)
                .map_err(|e| BookbindError::FailedToWrite {
                    path: write_path.clone(),
                    source: std::io::Error::other(e),
                })?;

            writer.flush().map_err(|e| BookbindError::FailedToWrite {
                path: write_path.clone(),
                source: e,
            })?;

            if options.atomic {
                std::fs::rename(&write_path, &path_buf).map_err(|e| {
                    BookbindError::FailedToWrite {
                        path: path_buf.clone(),
                        source: e,
                    }
                })?;
            }

            Ok::<_, BookbindError>(())
        })
        .await
        .map_err(|e| BookbindError::other(format!("Write task failed: {e}")))??;

        Ok(())
    }

    /// Check if a file can be written to the given path.
    ///
    /// Performs pre-flight checks without actually writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory doesn't exist or is not
    /// writable.
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            if !parent.exists() {
                return Err(BookbindError::invalid_config(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )));
            }

            let metadata = tokio::fs::metadata(parent).await.map_err(|e| {
                BookbindError::Io { source: e }
            })?;

            if metadata.permissions().readonly() {
                return Err(BookbindError::invalid_config(format!(
                    "Output directory is not writable: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Scope guard for the intermediate assembled document.
///
/// The assembled-but-unlinked book is written to this path, consumed by
/// the link binder, and must never survive the run. Dropping the guard
/// removes the file, so error paths clean up automatically.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    /// Create a guard for the given path.
    ///
    /// The file does not need to exist yet; removal on drop is a no-op
    /// if nothing was written.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the guarded artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if self.path.exists() {
            // Best effort; a leftover temp file must not mask the
            // original error.
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
