/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Element tree definitions for pictura.
 *
 * This crate provides the pure data types produced by the Markdown image
 * extension: elements with ordered attribute maps, and the tagged attribute
 * values (plain text, pending asset references, srcset candidate lists)
 * that an HTML serializer resolves at the very end of rendering. It has
 * minimal dependencies (serde, hashlink) and does not know how assets are
 * stored or resized.
 */

pub mod asset_ref;
pub mod attr;
pub mod element;

// Re-export commonly used types at the crate root
pub use asset_ref::{AssetRef, Srcset, SrcsetCandidate};
pub use attr::{AttrValue, Attributes, empty_attributes};
pub use element::{Element, Node};
