use std::io::{Cursor, Read};

use tracing::debug;
use zip::ZipArchive;

use crate::error::ArchiveError;
use crate::xml::strip_bom;

/// An opened EPUB (ZIP) archive, owned by a single load.
pub struct EpubArchive {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

/// Handle to an entry found by [`EpubArchive::find_entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef {
    index: usize,
    name: String,
}

impl EntryRef {
    /// Stored entry name inside the archive.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl EpubArchive {
    /// Read the ZIP central directory from `bytes`.
    pub async fn open(bytes: Vec<u8>) -> Result<Self, ArchiveError> {
        let archive = ZipArchive::new(Cursor::new(bytes)).map_err(ArchiveError::Open)?;
        debug!(entries = archive.len(), "opened archive");
        Ok(Self { archive })
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Stored entry names, in central directory order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.archive.file_names()
    }

    /// Exact match against the stored entry names.
    pub fn find_entry(&self, path: &str) -> Option<EntryRef> {
        self.archive.index_for_name(path).map(|index| EntryRef {
            index,
            name: path.to_string(),
        })
    }

    /// Exact match first, then the percent-decoded path.
    ///
    /// Some books percent-encode hrefs in the OPF (`chapter%201.xhtml`) while
    /// storing the entry under its plain name.
    pub fn find_entry_lenient(&self, path: &str) -> Option<EntryRef> {
        self.find_entry(path).or_else(|| {
            let decoded = percent_encoding::percent_decode_str(path)
                .decode_utf8()
                .ok()?;
            if decoded == path {
                return None;
            }
            self.find_entry(&decoded)
        })
    }

    /// Extract an entry and decode it as UTF-8 text, dropping a leading BOM.
    pub async fn read_text(&mut self, entry: &EntryRef) -> Result<String, ArchiveError> {
        let mut file = self
            .archive
            .by_index(entry.index)
            .map_err(|e| ArchiveError::Read {
                path: entry.name.clone(),
                source: e.into(),
            })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|source| ArchiveError::Read {
                path: entry.name.clone(),
                source,
            })?;

        let bom = contents.len() - strip_bom(&contents).len();
        contents.drain(..bom);
        String::from_utf8(contents).map_err(|source| ArchiveError::Decode {
            path: entry.name.clone(),
            source,
        })
    }

    /// Release the archive. Consumes the handle, so it runs at most once.
    pub fn close(self) {
        debug!(entries = self.archive.len(), "closing archive");
    }
}
