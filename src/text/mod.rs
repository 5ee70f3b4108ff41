//! Plain-text normalization: markup stripping and word splitting.

mod markup;
mod tokenize;

pub use markup::{ContentKind, markup_to_text};
pub use tokenize::tokenize;
