//! # wordpace
//!
//! Document ingestion for a one-word-at-a-time speed reader.
//!
//! Given a plain-text file or an EPUB archive, produce a [`ReadableFile`]:
//! ordered sections of whitespace-separated words, ready to be shown one at
//! a time. Rendering and playback timing are left to the caller.
//!
//! ## Features
//!
//! - Plain text (`text/plain`) becomes a single section
//! - EPUB (`application/epub+zip`) is resolved through container.xml, the
//!   OPF manifest and spine, and the NCX table of contents
//! - (X)HTML content is reduced to body text, tolerating malformed markup
//! - Every failure is a typed [`Error`]; nothing is silently skipped
//!
//! ## Quick Start
//!
//! ```no_run
//! use wordpace::load_path;
//!
//! # async fn run() -> wordpace::Result<()> {
//! let file = load_path("book.epub").await?;
//! println!("{} by {:?}", file.display_title(), file.author());
//! for (index, section) in file.sections().iter().enumerate() {
//!     println!("{}: {} words", file.section_label(index).unwrap_or_default(), section.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Loading from memory
//!
//! ```no_run
//! use wordpace::{MemorySource, load_file};
//!
//! # async fn run(upload: Vec<u8>) -> wordpace::Result<()> {
//! let file = load_file(&MemorySource::new(upload), "application/epub+zip", "upload.epub").await?;
//! let first_words: Vec<&str> = file.words().take(10).collect();
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod epub;
pub mod error;
pub mod io;
pub mod loader;
pub mod text;
pub(crate) mod xml;

pub use document::{DocumentSection, MANUAL_INPUT_NAME, ReadableFile};
pub use error::{ArchiveError, EpubStructureError, Error, Result};
pub use io::{ByteSource, FileSource, MemorySource};
pub use loader::{MediaType, load_file, load_path};
