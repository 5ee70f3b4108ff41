use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use crate::xml::strip_bom;

/// Something a document can be read from in one piece.
///
/// The returned futures are `Send` so a load can run on a multi-threaded
/// runtime.
pub trait ByteSource: Send + Sync {
    /// Read the full contents as bytes.
    fn read_bytes(&self) -> impl Future<Output = io::Result<Vec<u8>>> + Send;

    /// Read the full contents as UTF-8 text.
    ///
    /// A leading byte order mark is dropped. Invalid UTF-8 is reported as
    /// [`io::ErrorKind::InvalidData`].
    fn read_text(&self) -> impl Future<Output = io::Result<String>> + Send {
        async move {
            let bytes = self.read_bytes().await?;
            decode_utf8(bytes)
        }
    }
}

fn decode_utf8(mut bytes: Vec<u8>) -> io::Result<String> {
    let bom = bytes.len() - strip_bom(&bytes).len();
    bytes.drain(..bom);
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

// --- Implementation: Local File ---

/// A file on disk, read with `tokio::fs` when the load runs.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

// --- Implementation: In-Memory ---

/// Bytes already in memory, e.g. an upload handed over by a file picker.
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl ByteSource for MemorySource {
    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.data.clone())
    }
}
