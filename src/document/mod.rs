use std::time::Duration;

use crate::error::{Error, Result};
use crate::text::tokenize;

/// Display name used for text typed or pasted directly by the reader.
pub const MANUAL_INPUT_NAME: &str = "(manual input)";

/// A loaded document, split into sections of words in reading order.
///
/// Built once per successful load and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReadableFile {
    display_name: String,
    title: Option<String>,
    author: Option<String>,
    sections: Vec<DocumentSection>,
}

/// One unit of reading-ordered content: a spine item, or the whole of a
/// plain-text input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DocumentSection {
    source_path: Option<String>,
    title: Option<String>,
    words: Vec<String>,
}

impl DocumentSection {
    pub fn new(source_path: Option<String>, title: Option<String>, words: Vec<String>) -> Self {
        Self {
            source_path,
            title,
            words,
        }
    }

    /// Origin path inside the archive; `None` for plain text.
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// Label from the table of contents, when one matched.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl ReadableFile {
    /// Assemble a document. Fails with [`Error::EmptyDocument`] when
    /// `sections` is empty.
    pub fn new(
        display_name: impl Into<String>,
        title: Option<String>,
        author: Option<String>,
        sections: Vec<DocumentSection>,
    ) -> Result<Self> {
        if sections.is_empty() {
            return Err(Error::EmptyDocument);
        }
        Ok(Self {
            display_name: display_name.into(),
            title,
            author,
            sections,
        })
    }

    /// Wrap raw text in a single untitled section.
    ///
    /// This is the plain-text load path, and also what a reader gets when
    /// pasting text directly (see [`MANUAL_INPUT_NAME`]).
    pub fn from_text(display_name: impl Into<String>, text: &str) -> Self {
        Self {
            display_name: display_name.into(),
            title: None,
            author: None,
            sections: vec![DocumentSection::new(None, None, tokenize(text))],
        }
    }

    /// Original file name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn sections(&self) -> &[DocumentSection] {
        &self.sections
    }

    /// Title from metadata, falling back to the file name.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.display_name)
    }

    /// Human-readable label for the section at `index`.
    ///
    /// Uses the table-of-contents title when present, otherwise a numbered
    /// label that mentions the archive path if there is one.
    pub fn section_label(&self, index: usize) -> Option<String> {
        let section = self.sections.get(index)?;
        let label = match (section.title(), section.source_path()) {
            (Some(title), _) => title.to_string(),
            (None, Some(path)) => format!("Section {} ({})", index + 1, path),
            (None, None) => format!("Section {}", index + 1),
        };
        Some(label)
    }

    /// Number of words in the sections before `upto_section_exclusive`, or in
    /// the whole document when `None`.
    ///
    /// An index past the last section counts every section.
    pub fn word_count(&self, upto_section_exclusive: Option<usize>) -> usize {
        let end = upto_section_exclusive
            .unwrap_or(self.sections.len())
            .min(self.sections.len());
        self.sections[..end].iter().map(DocumentSection::len).sum()
    }

    /// Global index of word `word` within section `section`.
    pub fn position(&self, section: usize, word: usize) -> Option<usize> {
        let current = self.sections.get(section)?;
        if word >= current.len() {
            return None;
        }
        Some(self.word_count(Some(section)) + word)
    }

    /// Inverse of [`position`](Self::position): the `(section, word)` pair
    /// holding the `global`-th word of the document.
    pub fn locate(&self, global: usize) -> Option<(usize, usize)> {
        let mut remaining = global;
        for (index, section) in self.sections.iter().enumerate() {
            if remaining < section.len() {
                return Some((index, remaining));
            }
            remaining -= section.len();
        }
        None
    }

    /// All words of the document, section by section.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|s| s.words.iter().map(String::as_str))
    }

    /// Time needed to read `words` words at `wpm` words per minute.
    ///
    /// Returns `None` for a speed of zero.
    pub fn estimated_duration(words: usize, wpm: u32) -> Option<Duration> {
        if wpm == 0 {
            return None;
        }
        let millis = (words as u64).saturating_mul(60_000) / u64::from(wpm);
        Some(Duration::from_millis(millis))
    }
}
