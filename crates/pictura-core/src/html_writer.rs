/*
 * html_writer.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * HTML writer for pictura element trees.
 */

//! HTML serialization.
//!
//! Pending attribute values are resolved here and nowhere else: asset
//! references and `srcset` candidates are turned into URLs by the
//! [`AssetAdapter`] the writer was built with.

use std::io::{self, Write};

use pictura_ast::{AttrValue, Element, Node};

use crate::asset::AssetAdapter;

/// Elements written without content or a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta", "source"];

pub struct HtmlWriter<'a> {
    assets: &'a dyn AssetAdapter,
}

impl<'a> HtmlWriter<'a> {
    pub fn new(assets: &'a dyn AssetAdapter) -> Self {
        Self { assets }
    }

    /// Write block-level elements, one per line.
    pub fn write_blocks<W: Write>(&self, blocks: &[Element], buf: &mut W) -> io::Result<()> {
        for block in blocks {
            self.write_element(block, buf)?;
            writeln!(buf)?;
        }
        Ok(())
    }

    pub fn write_nodes<W: Write>(&self, nodes: &[Node], buf: &mut W) -> io::Result<()> {
        for node in nodes {
            match node {
                Node::Element(e) => self.write_element(e, buf)?,
                Node::Text(t) => write!(buf, "{}", escape_html(t))?,
            }
        }
        Ok(())
    }

    pub fn write_element<W: Write>(&self, element: &Element, buf: &mut W) -> io::Result<()> {
        write!(buf, "<{}", element.name)?;
        for (key, value) in &element.attributes {
            write!(buf, " {}=\"{}\"", key, escape_html(&self.attr_value(value)))?;
        }

        if VOID_ELEMENTS.contains(&element.name.as_str()) {
            return write!(buf, " />");
        }

        write!(buf, ">")?;
        self.write_nodes(&element.children, buf)?;
        write!(buf, "</{}>", element.name)
    }

    /// Final string for an attribute value.
    pub fn attr_value(&self, value: &AttrValue) -> String {
        match value {
            AttrValue::Text(s) => s.clone(),
            AttrValue::Asset(a) => self.assets.url(a),
            AttrValue::Srcset(s) => s.render(|a| self.assets.url(a)),
        }
    }

    /// Render block-level elements to a string.
    pub fn blocks_to_string(&self, blocks: &[Element]) -> crate::Result<String> {
        let mut buf = Vec::new();
        self.write_blocks(blocks, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}
