//! Byte sources a document can be loaded from.

mod byte_source;

pub use byte_source::{ByteSource, FileSource, MemorySource};
