/*
 * figure.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Block handler that turns captioned image lines into figures.
 */

//! Figure synthesis.
//!
//! A block line that consists of a single image with a title:
//!
//! ```markdown
//! ![A cat](cat.jpg "Our cat, asleep")
//! ```
//!
//! renders as
//!
//! ```html
//! <figure><img src="cat.jpg" alt="A cat" title="Our cat, asleep" /><figcaption>Our cat, asleep</figcaption></figure>
//! ```
//!
//! instead of a paragraph. Lines with surrounding prose, and images without
//! a title, are left to the grammar's default handling.

use std::sync::Arc;

use once_cell::sync::Lazy;
use pictura_ast::Element;
use regex::Regex;

use crate::grammar::BlockHandler;
use crate::transforms::image::InlineImageResolver;

/// Marker character this handler is registered under.
pub const FIGURE_MARKER: char = '!';

/// An image reference at the very start of the line.
static LEADING_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^!\[.*?\]\(.*?\)").expect("leading image pattern is valid"));

pub struct FigureBlockBuilder {
    resolver: Arc<InlineImageResolver>,
}

impl FigureBlockBuilder {
    pub fn new(resolver: Arc<InlineImageResolver>) -> Self {
        Self { resolver }
    }

    /// Build a figure for `line`, or `None` to defer to default handling.
    pub fn build(&self, line: &str) -> Option<Element> {
        if !LEADING_IMAGE_RE.is_match(line) {
            return None;
        }

        let mut image = self.resolver.recognize(line)?;
        if !line.get(image.extent..)?.trim().is_empty() {
            return None;
        }

        let caption = image
            .element
            .text_attr("title")
            .filter(|t| !t.is_empty())?
            .to_string();

        self.resolver.enhance(&mut image.element);

        Some(
            Element::new("figure")
                .with_child(image.element)
                .with_child(Element::with_text("figcaption", caption)),
        )
    }
}

impl BlockHandler for FigureBlockBuilder {
    fn name(&self) -> &str {
        "figure-caption"
    }

    fn handle(&self, line: &str) -> Option<Element> {
        self.build(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ManifestAssetAdapter;
    use crate::config::ImageConfig;
    use crate::grammar::{InlineImageRecognizer, InlineMatch, MarkdownImageRecognizer};
    use pictura_ast::{AssetRef, AttrValue, Node};

    fn builder() -> FigureBlockBuilder {
        let resolver = InlineImageResolver::new(
            Arc::new(MarkdownImageRecognizer::new()),
            Arc::new(ManifestAssetAdapter::new().with_image("x.png", 640, 480)),
            Arc::new(ImageConfig::default()),
        );
        FigureBlockBuilder::new(Arc::new(resolver))
    }

    #[test]
    fn test_captioned_image_becomes_figure() {
        let figure = builder().build(r#"![alt](x.png "A caption")"#).unwrap();

        assert_eq!(figure.name, "figure");
        assert_eq!(figure.children.len(), 2);

        let img = match &figure.children[0] {
            Node::Element(e) => e,
            Node::Text(_) => panic!("expected img element"),
        };
        assert_eq!(img.name, "img");
        assert_eq!(img.attr("src"), Some(&AttrValue::Asset(AssetRef::new("x.png"))));
        assert_eq!(img.text_attr("width"), Some("640"));

        let caption = match &figure.children[1] {
            Node::Element(e) => e,
            Node::Text(_) => panic!("expected figcaption element"),
        };
        assert_eq!(caption.name, "figcaption");
        assert_eq!(caption.text_content(), "A caption");
    }

    #[test]
    fn test_unresolvable_image_still_gets_figure() {
        let figure = builder()
            .build(r#"![alt](https://example.com/y.png "Remote")"#)
            .unwrap();
        let img = figure.child_elements().next().unwrap();
        assert_eq!(img.text_attr("src"), Some("https://example.com/y.png"));
        assert!(!img.has_attr("width"));
    }

    #[test]
    fn test_trailing_attribute_list_allowed() {
        let figure = builder()
            .build(r#"![alt](x.png "Cap"){.wide}  "#)
            .unwrap();
        let img = figure.child_elements().next().unwrap();
        assert_eq!(img.text_attr("class"), Some("wide"));
    }

    #[test]
    fn test_without_title_defers() {
        assert!(builder().build("![alt](x.png)").is_none());
        assert!(builder().build(r#"![alt](x.png "")"#).is_none());
    }

    #[test]
    fn test_mixed_prose_defers() {
        assert!(builder().build(r#"text ![alt](x.png "Cap")"#).is_none());
        assert!(builder().build(r#"![alt](x.png "Cap") and text"#).is_none());
    }

    /// Recognizer reporting an extent that does not fit the line.
    struct Overreaching;

    impl InlineImageRecognizer for Overreaching {
        fn recognize(&self, excerpt: &str) -> Option<InlineMatch> {
            Some(InlineMatch {
                element: Element::new("img").with_attr("title", "Cap"),
                extent: excerpt.len() + 1,
            })
        }
    }

    #[test]
    fn test_out_of_range_extent_defers() {
        let resolver = InlineImageResolver::new(
            Arc::new(Overreaching),
            Arc::new(ManifestAssetAdapter::new()),
            Arc::new(ImageConfig::default()),
        );
        let builder = FigureBlockBuilder::new(Arc::new(resolver));
        assert!(builder.build(r#"![alt](x.png "Cap")"#).is_none());
    }

    #[test]
    fn test_handler_name() {
        assert_eq!(builder().name(), "figure-caption");
    }
}
