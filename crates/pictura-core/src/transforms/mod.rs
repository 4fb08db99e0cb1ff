/*
 * transforms/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Image transforms plugged into the base grammar.
 */

//! Image transforms plugged into the base grammar.
//!
//! - [`InlineImageResolver`] - enhances every recognized inline image
//! - [`FigureBlockBuilder`] - renders captioned image-only lines as figures
//! - [`SrcsetGenerator`] - computes responsive `srcset` candidates

mod figure;
mod image;
mod srcset;

pub use figure::{FIGURE_MARKER, FigureBlockBuilder};
pub use image::InlineImageResolver;
pub use srcset::SrcsetGenerator;
