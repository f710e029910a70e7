//! bookbind - Merge chapter PDFs into a single book with a linked TOC.
//!
//! This library merges a folder of per-chapter PDF documents into one
//! book-length PDF, prepending an auto-generated, paginated table of
//! contents whose entries are clickable links jumping to the correct
//! destination page. It supports:
//!
//! - Natural-order chapter sorting ("ch2.pdf" before "ch10.pdf")
//! - Two-pass TOC layout (the TOC's own size shifts every destination)
//! - Multi-page TOCs with a header page and overflow pages
//! - Clickable TOC entries and per-chapter bookmarks
//! - An optional cover page
//! - Lenient handling of unreadable chapters
//!
//! # Examples
//!
//! ## Building a book
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
//!     overwrite_mode: OverwriteMode::Force,
//!     strict: false,
//!     jobs: None,
//! };
//!
//! let result = build_book(&config).await?;
//! println!("Created {} page book", result.statistics.total_pages);
//! # Ok(())
//! # }
//! ```
//!
//! ## Using individual components
//!
//! ```
//! use bookbind::toc::layout::{plan, ChapterExtent, TocCapacity};
//!
//! let chapters = vec![
//!     ChapterExtent::new("Intro", 5),
//!     ChapterExtent::new("Body", 3),
//!     ChapterExtent::new("Outro", 7),
//! ];
//!
//! let layout = plan(&chapters, TocCapacity::default(), 0).unwrap();
//! assert_eq!(layout.toc_page_count, 1);
//! let destinations: Vec<usize> =
//!     layout.entries.iter().map(|e| e.destination_page).collect();
//! assert_eq!(destinations, vec![2, 7, 10]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod error;
pub mod inputs;
pub mod io;
pub mod merge;
pub mod output;
pub mod toc;

// Re-export commonly used types
pub use config::Config;
pub use error::{BookbindError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
