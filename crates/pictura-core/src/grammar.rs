/*
 * grammar.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Extension points exposed by the base Markdown grammar.
 */

//! Grammar extension points.
//!
//! The base Markdown grammar is not part of this crate. It is reached
//! through two strategies that the image extension plugs into:
//!
//! - [`InlineImageRecognizer`] - turns the text at a cursor into an `img`
//!   element, or reports no match
//! - [`BlockHandler`] - claims a block line that starts with a given
//!   character; handlers are registered in a [`BlockDispatcher`]
//!
//! [`MarkdownImageRecognizer`] is the default recognizer for
//! `![alt](src "title"){attrs}`.

use std::sync::Arc;

use hashlink::LinkedHashMap;
use once_cell::sync::Lazy;
use pictura_ast::Element;
use regex::Regex;

use crate::attr::AttributeListParser;

/// `![alt](src "title")` anchored at the cursor.
static IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^!\[((?:\\.|[^\\\[\]])*)\]\(\s*(?:<([^<>\n]*)>|([^\s()]+))(?:\s+(?:"([^"]*)"|'([^']*)'))?\s*\)"#,
    )
    .expect("image pattern is valid")
});

/// Attribute list directly after an image.
static TRAILING_ATTRS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ ]*\{([^{}\n]*)\}").expect("attribute list pattern is valid"));

/// An element recognized at a cursor, and how many bytes it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch {
    pub element: Element,
    pub extent: usize,
}

/// Recognizes an inline image at the start of `excerpt`.
pub trait InlineImageRecognizer: Send + Sync {
    fn recognize(&self, excerpt: &str) -> Option<InlineMatch>;
}

/// Claims a block line whose first character it was registered for.
///
/// Returning `None` defers to the next handler, and finally to the
/// grammar's default paragraph handling.
pub trait BlockHandler: Send + Sync {
    /// Human-readable name, used for logging.
    fn name(&self) -> &str;

    fn handle(&self, line: &str) -> Option<Element>;
}

/// Block handlers keyed by the leading character of a line.
///
/// Handlers registered for the same character are tried in registration
/// order; the first one that returns an element wins.
#[derive(Default)]
pub struct BlockDispatcher {
    handlers: LinkedHashMap<char, Vec<Arc<dyn BlockHandler>>>,
}

impl BlockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, marker: char, handler: Arc<dyn BlockHandler>) {
        self.handlers.entry(marker).or_insert_with(Vec::new).push(handler);
    }

    /// Names of the handlers registered for `marker`, in order.
    pub fn handler_names(&self, marker: char) -> Vec<&str> {
        self.handlers
            .get(&marker)
            .map(|hs| hs.iter().map(|h| h.name()).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn dispatch(&self, line: &str) -> Option<Element> {
        let marker = line.chars().next()?;
        let handlers = self.handlers.get(&marker)?;
        for handler in handlers {
            if let Some(element) = handler.handle(line) {
                tracing::trace!(handler = handler.name(), "Block handler claimed line");
                return Some(element);
            }
        }
        None
    }
}

/// Default recognizer for Markdown image syntax.
///
/// Produces `img` with `src`, `alt` and (when given) `title`, in that order.
/// A trailing attribute list adds further attributes but never replaces
/// those three.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownImageRecognizer {
    parser: AttributeListParser,
}

impl MarkdownImageRecognizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InlineImageRecognizer for MarkdownImageRecognizer {
    fn recognize(&self, excerpt: &str) -> Option<InlineMatch> {
        let caps = IMAGE_RE.captures(excerpt)?;
        let mut extent = caps.get(0)?.end();

        let alt = caps.get(1).map_or("", |m| m.as_str());
        let src = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
        let title = caps.get(4).or_else(|| caps.get(5)).map(|m| m.as_str());

        let mut element = Element::new("img")
            .with_attr("src", src)
            .with_attr("alt", alt);
        if let Some(title) = title {
            element.set_attr("title", title);
        }

        if let Some(attrs) = TRAILING_ATTRS_RE.captures(&excerpt[extent..]) {
            let token = attrs.get(1).map_or("", |m| m.as_str());
            let parsed = self.parser.parse_lenient(token);
            for (key, value) in parsed.attributes.iter() {
                element.set_attr_if_absent(key, value);
            }
            extent += attrs.get(0).map_or(0, |m| m.end());
        }

        Some(InlineMatch { element, extent })
    }
}
