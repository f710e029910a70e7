//! PDF input/output for bookbind.
//!
//! The reader is the page-count oracle: it opens each chapter once and
//! reads its page count. The writer saves the assembled document with
//! compression and atomic renames, and guards the intermediate artifact
//! that exists between assembly and link binding.

pub mod reader;
pub mod writer;

pub use reader::{ChapterReader, LoadResult, LoadStatistics, LoadedChapter};
pub use writer::{PdfWriter, TempArtifact, WriteOptions};
