//! Error types for document loading.

use thiserror::Error;

/// Errors that can occur while loading a document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Structure(#[from] EpubStructureError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document has no sections")]
    EmptyDocument,
}

/// The byte stream is not a usable ZIP container, or one of its entries
/// cannot be extracted.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Not a valid ZIP archive: {0}")]
    Open(#[source] zip::result::ZipError),

    #[error("Cannot read archive entry '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive entry '{path}' is not valid UTF-8")]
    Decode {
        path: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// The archive is a ZIP file but its EPUB structure is incomplete.
///
/// Every variant names the archive path, element, or id that was at fault so
/// a broken book can be diagnosed without unpacking it by hand.
#[derive(Error, Debug)]
pub enum EpubStructureError {
    #[error("Missing archive entry: {path}")]
    MissingEntry { path: String },

    #[error("Malformed XML in {path}: {message}")]
    Xml { path: String, message: String },

    #[error("Missing <{element}> element in {path}")]
    MissingElement { path: String, element: &'static str },

    #[error("Missing or empty '{attribute}' attribute in {path}: {markup}")]
    MissingAttribute {
        path: String,
        attribute: &'static str,
        markup: String,
    },

    #[error("Missing dc:{field} metadata in {path}")]
    MissingMetadata { path: String, field: &'static str },

    #[error("Spine references unknown manifest item '{id}'")]
    UnknownManifestItem { id: String },

    #[error("Spine toc attribute references unknown manifest item '{id}'")]
    UnknownTocItem { id: String },

    #[error("Spine in {path} has no itemref entries")]
    EmptySpine { path: String },
}

pub type Result<T> = std::result::Result<T, Error>;
