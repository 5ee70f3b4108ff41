//! Markup stripping for spine content documents.
//!
//! XHTML is read with quick-xml and only the `<body>` counts, matching what an
//! XML DOM exposes. HTML goes through the html5ever tokenizer, which never
//! fails; without an explicit `<body>` everything outside `<head>` counts.
//! XHTML that is not well-formed is re-read as HTML.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::trace;

use crate::xml::{local_name, resolve_entity};

/// How a content document should be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Xhtml,
}

impl ContentKind {
    /// `application/xhtml+xml` is XHTML; every other media type is parsed
    /// leniently as HTML.
    pub fn from_media_type(media_type: &str) -> Self {
        if media_type.trim().eq_ignore_ascii_case("application/xhtml+xml") {
            ContentKind::Xhtml
        } else {
            ContentKind::Html
        }
    }
}

/// Text content of the document body, with tags, attributes, comments,
/// scripts and styles removed.
///
/// Never fails: malformed input gives whatever text could be recovered, and a
/// document without body text gives an empty string. Block-level element
/// boundaries become line breaks so adjacent paragraphs do not fuse.
pub fn markup_to_text(markup: &str, kind: ContentKind) -> String {
    match kind {
        ContentKind::Xhtml => xhtml_to_text(markup).unwrap_or_else(|| html_to_text(markup)),
        ContentKind::Html => html_to_text(markup),
    }
}

fn xhtml_to_text(markup: &str) -> Option<String> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().check_end_names = false;

    let mut collector = TextCollector::new(true);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                collector.start(&String::from_utf8_lossy(local_name(name.as_ref())), false);
            }
            Ok(Event::Empty(e)) => {
                let name = e.name();
                collector.start(&String::from_utf8_lossy(local_name(name.as_ref())), true);
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                collector.end(&String::from_utf8_lossy(local_name(name.as_ref())));
            }
            Ok(Event::Text(e)) => collector.text(&String::from_utf8_lossy(e.as_ref())),
            Ok(Event::CData(e)) => collector.text(&String::from_utf8_lossy(&e)),
            Ok(Event::GeneralRef(e)) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                if let Some(resolved) = resolve_entity(&entity) {
                    collector.text(&resolved);
                } else if let Some(resolved) = html_entity(&entity) {
                    collector.text(resolved);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                trace!(error = %e, "XHTML not well-formed, falling back to HTML tokenizer");
                return None;
            }
            _ => {}
        }
    }
    Some(collector.finish())
}

fn html_to_text(markup: &str) -> String {
    let sink = CollectingSink {
        collector: RefCell::new(TextCollector::new(false)),
    };
    let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let queue = BufferQueue::default();
    queue.push_back(StrTendril::from_slice(markup));
    let _ = tokenizer.feed(&queue);
    tokenizer.end();

    let text = tokenizer.sink.collector.borrow_mut().finish();
    text
}

struct CollectingSink {
    collector: RefCell<TextCollector>,
}

impl TokenSink for CollectingSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let mut collector = self.collector.borrow_mut();
        match token {
            Token::TagToken(tag) => {
                let name: &str = &tag.name;
                match tag.kind {
                    TagKind::StartTag => {
                        // HTML ignores the self-closing flag on non-void elements
                        collector.start(name, is_void(name));
                        if let Some(kind) = raw_kind(name) {
                            return TokenSinkResult::RawData(kind);
                        }
                    }
                    TagKind::EndTag => collector.end(name),
                }
            }
            Token::CharacterTokens(text) => collector.text(&text),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Accumulates body text from a stream of start/end/text callbacks.
struct TextCollector {
    text: String,
    /// XHTML has no implied body: text outside `<body>` is dropped.
    require_body: bool,
    in_body: bool,
    in_head: bool,
    /// Discarded element currently open, with how many elements of the same
    /// name are nested inside it. Other tags are ignored until it closes, so
    /// unclosed children cannot leak the skip past its end tag.
    skipping: Option<(String, usize)>,
}

impl TextCollector {
    fn new(require_body: bool) -> Self {
        Self {
            text: String::new(),
            require_body,
            in_body: false,
            in_head: false,
            skipping: None,
        }
    }

    fn start(&mut self, name: &str, empty: bool) {
        if let Some((skipped, depth)) = &mut self.skipping {
            if !empty && skipped.as_str() == name {
                *depth += 1;
            }
            return;
        }
        match name {
            "body" if !empty => {
                self.in_body = true;
                self.in_head = false;
            }
            "head" if !empty => self.in_head = true,
            _ => {
                // Body content implicitly closes an unterminated HTML head
                if self.in_head && !self.require_body && !is_head_content(name) {
                    self.in_head = false;
                }
                if !empty && is_discarded(name) {
                    self.skipping = Some((name.to_string(), 0));
                    return;
                }
            }
        }
        if is_block(name) {
            self.line_break();
        }
    }

    fn end(&mut self, name: &str) {
        if let Some((skipped, depth)) = &mut self.skipping {
            if skipped.as_str() == name {
                if *depth == 0 {
                    self.skipping = None;
                } else {
                    *depth -= 1;
                }
            }
            return;
        }
        match name {
            "body" => self.in_body = false,
            "head" => self.in_head = false,
            _ => {}
        }
        if is_block(name) {
            self.line_break();
        }
    }

    fn text(&mut self, text: &str) {
        if self.skipping.is_some() {
            return;
        }
        if self.in_head {
            if self.require_body || text.trim().is_empty() {
                return;
            }
            self.in_head = false;
        }
        if self.require_body && !self.in_body {
            return;
        }
        self.text.push_str(text);
    }

    fn line_break(&mut self) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
    }

    fn finish(&mut self) -> String {
        let text = std::mem::take(&mut self.text);
        text.trim_matches('\n').to_string()
    }
}

fn is_discarded(name: &str) -> bool {
    matches!(name, "script" | "style" | "template" | "title")
}

/// Elements allowed inside `<head>`; anything else starts the body.
fn is_head_content(name: &str) -> bool {
    matches!(
        name,
        "meta" | "link" | "base" | "title" | "style" | "script" | "noscript" | "template"
    )
}

fn is_void(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose boundaries separate words. Everything else, including
/// unknown and namespaced elements such as `epub:noteref`, is inline.
fn is_block(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "body"
            | "br"
            | "caption"
            | "center"
            | "dd"
            | "details"
            | "dialog"
            | "div"
            | "dl"
            | "dt"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "head"
            | "header"
            | "hgroup"
            | "hr"
            | "html"
            | "legend"
            | "li"
            | "main"
            | "menu"
            | "nav"
            | "ol"
            | "option"
            | "p"
            | "pre"
            | "section"
            | "summary"
            | "table"
            | "tbody"
            | "td"
            | "tfoot"
            | "th"
            | "thead"
            | "tr"
            | "ul"
    )
}

/// Tokenizer state for elements whose content is not markup.
fn raw_kind(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}

/// Named HTML entities that turn up in XHTML books without a DTD.
fn html_entity(entity: &str) -> Option<&'static str> {
    let resolved = match entity {
        "nbsp" => "\u{a0}",
        "ensp" => "\u{2002}",
        "emsp" => "\u{2003}",
        "thinsp" => "\u{2009}",
        "shy" => "",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "copy" => "\u{a9}",
        _ => return None,
    };
    Some(resolved)
}
