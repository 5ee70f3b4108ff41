//! EPUB ingestion: ZIP archive access and package structure resolution.

mod archive;
mod parser;
mod reader;

pub use archive::{EntryRef, EpubArchive};
pub use parser::{CONTAINER_PATH, NCX_MEDIA_TYPE};
pub use reader::resolve;
