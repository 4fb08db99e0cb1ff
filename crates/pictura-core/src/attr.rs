/*
 * attr.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Attribute-list parsing: `{#id .class key=value}`.
 */

//! Attribute-list parsing.
//!
//! An attribute list is a trailing fragment such as `{#intro .wide width=300}`
//! that decorates the preceding element. Pieces are separated by whitespace
//! and classified by their first character:
//!
//! - `#name` sets the id (the last one wins)
//! - `.name` appends a class (order kept, duplicates kept)
//! - anything else is decoded as a query string (`key=value`, `a=1&b=2`,
//!   bare `key`), with `+` and `%XX` escapes, and one layer of matching
//!   quotes stripped from the value
//!
//! Malformed pieces are skipped and reported rather than failing the
//! whole list.

use hashlink::LinkedHashMap;
use url::form_urlencoded;

use crate::error::AttributeListError;

/// Decoded attributes of one attribute-list token.
///
/// `id` and `class` live in the same ordered map as every other attribute;
/// a literal `id=` or `class=` pair overrides the shorthand forms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeMap {
    entries: LinkedHashMap<String, String>,
}

impl AttributeMap {
    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    /// Space-joined classes.
    pub fn class(&self) -> Option<&str> {
        self.get("class")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> LinkedHashMap<String, String> {
        self.entries
    }

    fn set(&mut self, key: String, value: String) {
        match self.entries.get_mut(&key) {
            Some(slot) => *slot = value,
            None => {
                self.entries.insert(key, value);
            }
        }
    }
}

/// Result of a lenient parse: the attributes plus every skipped piece.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedAttributes {
    pub attributes: AttributeMap,
    pub skipped: Vec<AttributeListError>,
}

/// Parses attribute-list tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeListParser;

impl AttributeListParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a token, skipping malformed pieces.
    ///
    /// Surrounding braces are optional: `{.a}` and `.a` parse the same.
    pub fn parse_lenient(&self, token: &str) -> ParsedAttributes {
        let body = strip_braces(token.trim());

        let mut id: Option<String> = None;
        let mut classes: Vec<String> = Vec::new();
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut skipped = Vec::new();

        for piece in body.split_whitespace() {
            if let Some(rest) = piece.strip_prefix('#') {
                if rest.is_empty() {
                    skipped.push(AttributeListError::EmptyId(piece.to_string()));
                } else {
                    id = Some(rest.to_string());
                }
            } else if let Some(rest) = piece.strip_prefix('.') {
                if rest.is_empty() {
                    skipped.push(AttributeListError::EmptyClass(piece.to_string()));
                } else {
                    classes.push(rest.to_string());
                }
            } else {
                match decode_pairs(piece) {
                    Ok(decoded) => pairs.extend(decoded),
                    Err(err) => skipped.push(err),
                }
            }
        }

        let mut attributes = AttributeMap::default();
        if let Some(id) = id {
            attributes.set("id".to_string(), id);
        }
        if !classes.is_empty() {
            attributes.set("class".to_string(), classes.join(" "));
        }
        for (key, value) in pairs {
            attributes.set(key, value);
        }

        for err in &skipped {
            tracing::debug!(token = token, error = %err, "Skipping attribute list piece");
        }

        ParsedAttributes {
            attributes,
            skipped,
        }
    }

    /// Parse a token, failing on the first malformed piece.
    pub fn parse(&self, token: &str) -> Result<AttributeMap, AttributeListError> {
        let parsed = self.parse_lenient(token);
        match parsed.skipped.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(parsed.attributes),
        }
    }
}

/// Parse an attribute-list token strictly.
pub fn parse_attribute_list(token: &str) -> Result<AttributeMap, AttributeListError> {
    AttributeListParser::new().parse(token)
}

fn strip_braces(token: &str) -> &str {
    match token.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
        Some(inner) => inner,
        None => token,
    }
}

/// Decode one `key=value` piece (possibly several `&`-joined pairs).
///
/// All pairs are validated before any is returned, so a piece with one bad
/// key contributes nothing.
fn decode_pairs(piece: &str) -> Result<Vec<(String, String)>, AttributeListError> {
    let mut out = Vec::new();
    for (key, value) in form_urlencoded::parse(piece.as_bytes()) {
        if key.is_empty() {
            return Err(AttributeListError::EmptyKey(piece.to_string()));
        }
        if !key.chars().all(is_key_char) {
            return Err(AttributeListError::InvalidKey {
                key: key.into_owned(),
                piece: piece.to_string(),
            });
        }
        out.push((key.into_owned(), strip_quotes(&value).to_string()));
    }
    if out.is_empty() {
        return Err(AttributeListError::EmptyKey(piece.to_string()));
    }
    Ok(out)
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '\\')
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
