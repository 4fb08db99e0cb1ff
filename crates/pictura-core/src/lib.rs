//! Asset-aware image rendering for Markdown
//!
//! This crate extends a Markdown grammar with image handling that knows
//! about the files behind each image: it reads natural dimensions, resizes
//! on demand, emits responsive `srcset` lists, adds lazy loading, and turns
//! captioned image lines into `<figure>` blocks.
//!
//! # Architecture
//!
//! - [`AttributeListParser`] - parses `{#id .class key=value}` fragments
//! - [`AssetAdapter`] / [`Asset`] - the asset backend contract and the
//!   memoizing per-image handle
//! - [`SrcsetGenerator`] - stepped `srcset` candidates
//! - [`InlineImageResolver`] - per-image enhancement
//! - [`FigureBlockBuilder`] - block handler for captioned images
//! - [`Renderer`] - wires the pieces to the grammar hooks in [`grammar`]
//! - [`HtmlWriter`] - serializes the element tree, resolving asset URLs
//!
//! All behaviour is driven by an immutable [`ImageConfig`] supplied at
//! construction.

pub mod asset;
pub mod attr;
pub mod config;
pub mod error;
pub mod grammar;
pub mod html_writer;
pub mod render;
pub mod transforms;

// Re-export commonly used types
pub use asset::{Asset, AssetAdapter, Dimensions, ManifestAssetAdapter};
pub use attr::{AttributeListParser, AttributeMap, ParsedAttributes, parse_attribute_list};
pub use config::{ImageConfig, ResponsiveConfig, Sizes, TocConfig, Toggle, WidthSteps};
pub use error::{AssetError, AttributeListError, ConfigError, PicturaError, Result};
pub use grammar::{
    BlockDispatcher, BlockHandler, InlineImageRecognizer, InlineMatch, MarkdownImageRecognizer,
};
pub use html_writer::HtmlWriter;
pub use render::Renderer;
pub use transforms::{FIGURE_MARKER, FigureBlockBuilder, InlineImageResolver, SrcsetGenerator};
