//! Format dispatch: the single entry point that turns a file into a
//! [`ReadableFile`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::document::ReadableFile;
use crate::epub::{EpubArchive, resolve};
use crate::error::{Error, Result};
use crate::io::{ByteSource, FileSource};

/// Content types the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// `application/epub+zip`
    Epub,
    /// `text/plain`
    PlainText,
}

impl MediaType {
    pub const EPUB: &'static str = "application/epub+zip";
    pub const PLAIN_TEXT: &'static str = "text/plain";

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Epub => Self::EPUB,
            MediaType::PlainText => Self::PLAIN_TEXT,
        }
    }

    /// Guess the media type from a file extension (`.epub`, `.txt`, `.text`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("epub") {
            Some(MediaType::Epub)
        } else if extension.eq_ignore_ascii_case("txt") || extension.eq_ignore_ascii_case("text") {
            Some(MediaType::PlainText)
        } else {
            None
        }
    }
}

impl FromStr for MediaType {
    type Err = Error;

    /// Parameters such as `; charset=utf-8` are ignored and the comparison is
    /// case-insensitive.
    fn from_str(declared: &str) -> Result<Self> {
        let essence = declared.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(Self::EPUB) {
            Ok(MediaType::Epub)
        } else if essence.eq_ignore_ascii_case(Self::PLAIN_TEXT) {
            Ok(MediaType::PlainText)
        } else {
            Err(Error::UnsupportedFormat(declared.to_string()))
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load a document from `source` according to its declared media type.
///
/// EPUB archives are opened, resolved and closed again (also when resolving
/// fails). Plain text becomes a single untitled section. Any other media
/// type fails with [`Error::UnsupportedFormat`] before `source` is read.
///
/// # Example
///
/// ```no_run
/// use wordpace::{MemorySource, load_file};
///
/// # async fn run() -> wordpace::Result<()> {
/// let source = MemorySource::new("Hello world\nfoo");
/// let file = load_file(&source, "text/plain", "notes.txt").await?;
/// assert_eq!(file.word_count(None), 3);
/// # Ok(())
/// # }
/// ```
pub async fn load_file<S: ByteSource>(
    source: &S,
    media_type: &str,
    display_name: &str,
) -> Result<ReadableFile> {
    let media_type: MediaType = media_type.parse()?;
    debug!(display_name, %media_type, "loading document");

    let file = match media_type {
        MediaType::Epub => {
            let bytes = source.read_bytes().await?;
            let mut archive = EpubArchive::open(bytes).await?;
            let result = resolve(&mut archive, display_name).await;
            archive.close();
            result?
        }
        MediaType::PlainText => {
            let text = source.read_text().await?;
            ReadableFile::from_text(display_name, &text)
        }
    };

    debug!(
        display_name,
        sections = file.sections().len(),
        words = file.word_count(None),
        "document loaded"
    );
    Ok(file)
}

/// Load a file from disk, taking the media type from its extension and the
/// display name from its file name.
pub async fn load_path(path: impl AsRef<Path>) -> Result<ReadableFile> {
    let path = path.as_ref();
    let media_type = MediaType::from_path(path)
        .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
    let display_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    load_file(&FileSource::new(path), media_type.as_str(), &display_name).await
}
