/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Wires the image extension into a minimal document renderer.
 */

//! Document rendering.
//!
//! [`Renderer`] owns the frozen configuration, the asset backend and the
//! grammar hooks. At construction it registers the figure handler for `!`
//! (when captions are enabled) and wraps the image recognizer in an
//! [`InlineImageResolver`].
//!
//! Block structure is deliberately small: blank lines separate blocks, each
//! line is first offered to the block dispatcher, and unclaimed lines are
//! gathered into paragraphs whose text is scanned for inline images.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pictura_core::{ImageConfig, ManifestAssetAdapter, Renderer};
//!
//! let assets = ManifestAssetAdapter::new().with_image("cat.jpg", 800, 600);
//! let renderer = Renderer::new(ImageConfig::default(), Arc::new(assets));
//!
//! let html = renderer.render_html("See ![a cat](cat.jpg).").unwrap();
//! assert_eq!(
//!     html,
//!     "<p>See <img src=\"cat.jpg\" alt=\"a cat\" loading=\"lazy\" width=\"800\" height=\"600\" />.</p>\n"
//! );
//! ```

use std::sync::Arc;

use pictura_ast::{Element, Node};

use crate::Result;
use crate::asset::AssetAdapter;
use crate::config::ImageConfig;
use crate::grammar::{BlockDispatcher, BlockHandler, InlineImageRecognizer, MarkdownImageRecognizer};
use crate::html_writer::HtmlWriter;
use crate::transforms::{FIGURE_MARKER, FigureBlockBuilder, InlineImageResolver};

pub struct Renderer {
    config: Arc<ImageConfig>,
    assets: Arc<dyn AssetAdapter>,
    resolver: Arc<InlineImageResolver>,
    blocks: BlockDispatcher,
}

impl Renderer {
    /// Renderer using the default Markdown image recognizer.
    pub fn new(config: ImageConfig, assets: Arc<dyn AssetAdapter>) -> Self {
        Self::with_recognizer(config, assets, Arc::new(MarkdownImageRecognizer::new()))
    }

    /// Renderer configured from a YAML document.
    pub fn from_yaml(yaml: &str, assets: Arc<dyn AssetAdapter>) -> Result<Self> {
        let config = ImageConfig::from_yaml_str(yaml)?;
        Ok(Self::new(config, assets))
    }

    pub fn with_recognizer(
        config: ImageConfig,
        assets: Arc<dyn AssetAdapter>,
        recognizer: Arc<dyn InlineImageRecognizer>,
    ) -> Self {
        let config = Arc::new(config);
        let resolver = Arc::new(InlineImageResolver::new(
            recognizer,
            Arc::clone(&assets),
            Arc::clone(&config),
        ));

        let mut blocks = BlockDispatcher::new();
        if config.figure_caption.enabled {
            blocks.register(
                FIGURE_MARKER,
                Arc::new(FigureBlockBuilder::new(Arc::clone(&resolver))),
            );
        }

        tracing::debug!(
            lazy = config.lazy.enabled,
            resize = config.resize.enabled,
            responsive = config.responsive.enabled,
            figure_caption = config.figure_caption.enabled,
            "Created image renderer"
        );

        Self {
            config,
            assets,
            resolver,
            blocks,
        }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// Heading selectors for the grammar's table of contents, unmodified.
    pub fn toc_selectors(&self) -> &[String] {
        self.config.toc_selectors()
    }

    pub fn resolver(&self) -> &InlineImageResolver {
        &self.resolver
    }

    pub fn block_dispatcher(&self) -> &BlockDispatcher {
        &self.blocks
    }

    /// Register an extra block handler, tried after any already registered
    /// for the same marker.
    pub fn register_block_handler(&mut self, marker: char, handler: Arc<dyn BlockHandler>) {
        self.blocks.register(marker, handler);
    }

    /// Render `text` to block-level elements.
    pub fn render_document(&self, text: &str) -> Vec<Element> {
        let mut out = Vec::new();
        let mut paragraph: Vec<&str> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                self.flush_paragraph(&mut paragraph, &mut out);
                continue;
            }
            if let Some(block) = self.blocks.dispatch(trimmed) {
                self.flush_paragraph(&mut paragraph, &mut out);
                out.push(block);
                continue;
            }
            paragraph.push(trimmed);
        }
        self.flush_paragraph(&mut paragraph, &mut out);

        out
    }

    fn flush_paragraph(&self, lines: &mut Vec<&str>, out: &mut Vec<Element>) {
        if lines.is_empty() {
            return;
        }
        let text = lines.join("\n");
        lines.clear();

        let mut p = Element::new("p");
        p.children = self.render_inlines(&text);
        out.push(p);
    }

    /// Split `text` into text runs and resolved images.
    pub fn render_inlines(&self, text: &str) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut pending_start = 0;
        let mut cursor = 0;

        while let Some(offset) = text.get(cursor..).and_then(|rest| rest.find("![")) {
            let at = cursor + offset;
            let excerpt = &text[at..];
            // A recognizer's extent must be non-empty and end on a char
            // boundary inside the excerpt, otherwise the match is ignored.
            let image = self
                .resolver
                .resolve(excerpt)
                .filter(|m| m.extent > 0 && excerpt.get(..m.extent).is_some());
            match image {
                Some(image) => {
                    if pending_start < at {
                        nodes.push(Node::Text(text[pending_start..at].to_string()));
                    }
                    nodes.push(Node::Element(image.element));
                    cursor = at + image.extent;
                    pending_start = cursor;
                }
                // `!` is one byte, so `at + 1` is a char boundary
                None => cursor = at + 1,
            }
        }

        if pending_start < text.len() {
            nodes.push(Node::Text(text[pending_start..].to_string()));
        }
        nodes
    }

    /// Render `text` straight to HTML.
    pub fn render_html(&self, text: &str) -> Result<String> {
        let blocks = self.render_document(text);
        HtmlWriter::new(self.assets.as_ref()).blocks_to_string(&blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ManifestAssetAdapter;
    use crate::config::Toggle;
    use crate::error::{ConfigError, PicturaError};
    use crate::grammar::InlineMatch;

    fn renderer(config: ImageConfig) -> Renderer {
        Renderer::new(
            config,
            Arc::new(ManifestAssetAdapter::new().with_image("x.png", 640, 480)),
        )
    }

    #[test]
    fn test_figure_handler_registered_only_when_enabled() {
        let off = renderer(ImageConfig::default());
        assert!(off.block_dispatcher().is_empty());

        let on = renderer(ImageConfig {
            figure_caption: Toggle::on(),
            ..ImageConfig::default()
        });
        assert_eq!(on.block_dispatcher().handler_names('!'), vec!["figure-caption"]);
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let blocks = renderer(ImageConfig::default()).render_document("one\ntwo\n\n\nthree\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text_content(), "one\ntwo");
        assert_eq!(blocks[1].text_content(), "three");
    }

    #[test]
    fn test_inline_images_between_text() {
        let nodes = renderer(ImageConfig::default()).render_inlines("a ![i](x.png) b ![ not an image");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0], Node::Text("a ".to_string()));
        assert!(matches!(&nodes[1], Node::Element(e) if e.name == "img"));
        assert_eq!(nodes[2], Node::Text(" b ![ not an image".to_string()));
    }

    #[test]
    fn test_adjacent_images() {
        let nodes = renderer(ImageConfig::default()).render_inlines("![a](x.png)![b](y.png)");
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_figure_interrupts_paragraph() {
        let blocks = renderer(ImageConfig {
            figure_caption: Toggle::on(),
            ..ImageConfig::default()
        })
        .render_document("before\n![a](x.png \"Cap\")\nafter");

        let names: Vec<&str> = blocks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["p", "figure", "p"]);
    }

    /// Recognizer that claims every `![` with a fixed extent.
    struct FixedExtent(usize);

    impl InlineImageRecognizer for FixedExtent {
        fn recognize(&self, excerpt: &str) -> Option<InlineMatch> {
            excerpt.starts_with("![").then(|| InlineMatch {
                element: Element::new("img").with_attr("src", "x.png"),
                extent: self.0,
            })
        }
    }

    fn with_extent(extent: usize) -> Renderer {
        Renderer::with_recognizer(
            ImageConfig {
                figure_caption: Toggle::on(),
                ..ImageConfig::default()
            },
            Arc::new(ManifestAssetAdapter::new()),
            Arc::new(FixedExtent(extent)),
        )
    }

    #[test]
    fn test_bad_recognizer_extent_is_ignored() {
        // Past the end of the input
        let nodes = with_extent(100).render_inlines("a ![b]");
        assert_eq!(nodes, vec![Node::Text("a ![b]".to_string())]);

        // Inside the two-byte `é`
        let nodes = with_extent(3).render_inlines("![é]");
        assert_eq!(nodes, vec![Node::Text("![é]".to_string())]);

        // Zero-length match
        let nodes = with_extent(0).render_inlines("![x] y");
        assert_eq!(nodes, vec![Node::Text("![x] y".to_string())]);

        let blocks = with_extent(3).render_document("![é](x.png \"Cap\")");
        assert_eq!(blocks[0].name, "p");
    }

    #[test]
    fn test_valid_custom_extent_is_used() {
        let nodes = with_extent(2).render_inlines("a ![rest");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[2], Node::Text("rest".to_string()));
    }

    #[test]
    fn test_from_yaml() {
        let assets: Arc<dyn AssetAdapter> = Arc::new(ManifestAssetAdapter::new());
        let r = Renderer::from_yaml("figure-caption:\n  enabled: true\n", Arc::clone(&assets))
            .unwrap();
        assert!(r.config().figure_caption.enabled);
        assert_eq!(r.block_dispatcher().handler_names('!'), vec!["figure-caption"]);

        let err = Renderer::from_yaml("responsive:\n  width:\n    min: 0\n", assets)
            .err()
            .unwrap();
        assert!(matches!(err, PicturaError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_toc_selectors_pass_through() {
        let mut config = ImageConfig::default();
        config.toc.selectors = vec!["h1".to_string(), "h4".to_string()];
        assert_eq!(renderer(config).toc_selectors(), ["h1", "h4"]);
    }

    struct Shout;

    impl BlockHandler for Shout {
        fn name(&self) -> &str {
            "shout"
        }

        fn handle(&self, line: &str) -> Option<Element> {
            Some(Element::with_text("h1", line.trim_start_matches('!')))
        }
    }

    #[test]
    fn test_extra_handler_runs_after_figure() {
        let mut r = renderer(ImageConfig {
            figure_caption: Toggle::on(),
            ..ImageConfig::default()
        });
        r.register_block_handler('!', Arc::new(Shout));

        let blocks = r.render_document("![a](x.png \"Cap\")\n\n!loud");
        assert_eq!(blocks[0].name, "figure");
        assert_eq!(blocks[1].name, "h1");
        assert_eq!(blocks[1].text_content(), "loud");
    }
}
