/*
 * image.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-image enhancement: dimensions, lazy loading, resizing, srcset.
 */

//! Inline image resolution.
//!
//! [`InlineImageResolver`] wraps the grammar's image recognizer. For every
//! recognized image whose source is a readable raster asset it:
//!
//! 1. points `src` at the asset (resolved to a URL only at serialization)
//! 2. adds `loading="lazy"` when lazy loading is enabled
//! 3. resizes the asset when a numeric `width` below the natural width is
//!    declared and resizing is enabled
//! 4. fills in missing `width`/`height` from the asset
//! 5. adds `srcset`/`sizes` when responsive images are enabled
//!
//! Each step only runs after the previous one, since the effective width
//! chosen in steps 3-4 drives step 5. Images whose asset has no natural
//! width (remote URLs, SVG, unreadable files) are passed through without
//! any of this.

use std::sync::Arc;

use pictura_ast::Element;

use crate::asset::{Asset, AssetAdapter};
use crate::config::ImageConfig;
use crate::grammar::{InlineImageRecognizer, InlineMatch};
use crate::transforms::srcset::SrcsetGenerator;

pub struct InlineImageResolver {
    recognizer: Arc<dyn InlineImageRecognizer>,
    assets: Arc<dyn AssetAdapter>,
    config: Arc<ImageConfig>,
    srcset: SrcsetGenerator,
}

impl InlineImageResolver {
    pub fn new(
        recognizer: Arc<dyn InlineImageRecognizer>,
        assets: Arc<dyn AssetAdapter>,
        config: Arc<ImageConfig>,
    ) -> Self {
        let srcset = SrcsetGenerator::new(config.responsive.width);
        Self {
            recognizer,
            assets,
            config,
            srcset,
        }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// Run only the grammar's recognizer, without enhancement.
    pub fn recognize(&self, excerpt: &str) -> Option<InlineMatch> {
        self.recognizer.recognize(excerpt)
    }

    /// Recognize an image at the start of `excerpt` and enhance it.
    pub fn resolve(&self, excerpt: &str) -> Option<InlineMatch> {
        let mut image = self.recognize(excerpt)?;
        self.enhance(&mut image.element);
        Some(image)
    }

    /// Apply asset-aware enhancement to an `img` element in place.
    pub fn enhance(&self, element: &mut Element) {
        let Some(source) = element.text_attr("src").map(clean_source) else {
            return;
        };
        element.set_attr("src", source.as_str());

        let asset = Asset::resolve(Arc::clone(&self.assets), &source);
        let Some(natural_width) = asset.width() else {
            tracing::trace!(src = %source, "No raster dimensions, leaving image as is");
            return;
        };

        element.set_attr("src", asset.reference().clone());

        if self.config.lazy.enabled {
            element.set_attr("loading", "lazy");
        }

        let mut effective_width = natural_width;
        let mut resized: Option<Asset> = None;
        if let Some(declared) = element.text_attr("width").and_then(parse_width) {
            if declared < natural_width && self.config.resize.enabled {
                match asset.resize(declared) {
                    Ok(variant) => {
                        element.set_attr("src", variant.reference().clone());
                        effective_width = declared;
                        resized = Some(variant);
                    }
                    Err(err) => {
                        tracing::debug!(
                            src = %source,
                            width = declared,
                            error = %err,
                            "Image resize failed"
                        );
                        return;
                    }
                }
            }
        }

        element.set_attr_if_absent("width", natural_width.to_string());
        // Height always comes from the original asset, even when a narrower
        // variant was selected above.
        if let Some(height) = asset.height() {
            element.set_attr_if_absent("height", height.to_string());
        }

        if self.config.responsive.enabled {
            if let Some(srcset) = self
                .srcset
                .generate(&asset, effective_width, resized.as_ref())
            {
                element.set_attr("srcset", srcset);
                element.set_attr("sizes", self.config.responsive.sizes.default.as_str());
            }
        }

        tracing::trace!(src = %source, width = effective_width, "Resolved image");
    }
}

/// Trimmed source with any query string removed.
fn clean_source(src: &str) -> String {
    let src = src.trim();
    let path = match src.split_once('?') {
        Some((path, _query)) => path,
        None => src,
    };
    path.trim().to_string()
}

/// Declared width in whole pixels. Decimal values such as `400.0` or
/// `400.7` are truncated; anything negative or non-numeric is `None`.
fn parse_width(value: &str) -> Option<u32> {
    let value = value.trim();
    if let Ok(width) = value.parse::<u32>() {
        return Some(width);
    }
    let width = value.parse::<f64>().ok()?;
    (width.is_finite() && width >= 0.0).then(|| width.trunc() as u32)
}
