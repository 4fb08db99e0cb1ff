/*
 * asset.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Asset backend contract and the per-image asset handle.
 */

//! Asset backend abstraction.
//!
//! Storage, caching and resizing of image files belong to the surrounding
//! build system. This module defines the narrow contract the renderer needs
//! from it:
//!
//! - [`AssetAdapter`] - the backend trait (dimensions, resize, final URL)
//! - [`Asset`] - a handle pairing an [`AssetRef`] with the backend, with the
//!   natural dimensions computed lazily and memoized
//! - [`ManifestAssetAdapter`] - an in-memory backend driven by a manifest of
//!   known image sizes

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use once_cell::unsync::OnceCell;
use pictura_ast::AssetRef;
use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// Natural pixel size of a raster image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Dimensions { width, height }
    }

    /// Height after scaling to `width` with the aspect ratio kept.
    pub fn scaled_height(&self, width: u32) -> u32 {
        if self.width == 0 {
            return self.height;
        }
        let scaled = (u64::from(self.height) * u64::from(width)) as f64 / f64::from(self.width);
        scaled.round() as u32
    }
}

/// The asset backend.
///
/// Implementations may be slow (they can decode files or shell out to an
/// image tool) and may fail; the renderer calls them synchronously.
///
/// # Thread Safety
///
/// Adapters must be `Send + Sync` so that independent documents can be
/// rendered in parallel against one backend.
pub trait AssetAdapter: Send + Sync {
    /// Natural pixel size, or `None` for anything that is not a readable
    /// raster image (remote URL, SVG, missing file).
    fn dimensions(&self, asset: &AssetRef) -> Option<Dimensions>;

    /// Produce the variant of `asset` at `width` pixels.
    ///
    /// Must not change what `asset` itself refers to.
    fn resize(&self, asset: &AssetRef, width: u32) -> Result<AssetRef, AssetError>;

    /// Final URL or path written into the HTML.
    fn url(&self, asset: &AssetRef) -> String;
}

/// An asset together with the backend that owns it.
///
/// Dimensions are fetched on first use and memoized for the life of the
/// handle. Cloning a handle gives an independent copy: resizing either one
/// never affects the other.
#[derive(Clone)]
pub struct Asset {
    reference: AssetRef,
    adapter: Arc<dyn AssetAdapter>,
    dimensions: OnceCell<Option<Dimensions>>,
}

impl Asset {
    /// Handle for the original asset at `source`.
    pub fn resolve(adapter: Arc<dyn AssetAdapter>, source: &str) -> Self {
        Self::from_ref(adapter, AssetRef::new(source))
    }

    pub fn from_ref(adapter: Arc<dyn AssetAdapter>, reference: AssetRef) -> Self {
        Asset {
            reference,
            adapter,
            dimensions: OnceCell::new(),
        }
    }

    pub fn reference(&self) -> &AssetRef {
        &self.reference
    }

    pub fn adapter(&self) -> &Arc<dyn AssetAdapter> {
        &self.adapter
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        *self
            .dimensions
            .get_or_init(|| self.adapter.dimensions(&self.reference))
    }

    /// Natural width; `None` disables all image processing for this asset.
    pub fn width(&self) -> Option<u32> {
        self.dimensions().map(|d| d.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.dimensions().map(|d| d.height)
    }

    /// Request a variant at `width`. The receiver is left untouched.
    pub fn resize(&self, width: u32) -> Result<Asset, AssetError> {
        let reference = self.adapter.resize(&self.reference, width)?;
        Ok(Asset::from_ref(Arc::clone(&self.adapter), reference))
    }

    pub fn url(&self) -> String {
        self.adapter.url(&self.reference)
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("reference", &self.reference)
            .field("dimensions", &self.dimensions.get())
            .finish()
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// In-memory asset backend.
///
/// Knows the natural size of every image listed in `images`. Resized
/// variants are addressed as `<dir>/<stem>-<width>w.<ext>`, under
/// `url_prefix` when one is set. Sources listed in `fail_resize` report a
/// resize error, which is useful for exercising fallback paths.
///
/// The manifest can be deserialized:
///
/// ```yaml
/// url-prefix: /assets
/// images:
///   images/cat.jpg: { width: 1600, height: 900 }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ManifestAssetAdapter {
    pub url_prefix: String,
    pub images: HashMap<String, Dimensions>,
    pub fail_resize: HashSet<String>,
}

impl ManifestAssetAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    pub fn with_image(mut self, source: impl Into<String>, width: u32, height: u32) -> Self {
        self.images
            .insert(source.into(), Dimensions::new(width, height));
        self
    }

    pub fn with_failing_resize(mut self, source: impl Into<String>) -> Self {
        self.fail_resize.insert(source.into());
        self
    }

    fn variant_path(source: &str, width: u32) -> String {
        let (dir, file) = match source.rfind('/') {
            Some(pos) => (&source[..=pos], &source[pos + 1..]),
            None => ("", source),
        };
        match file.rfind('.') {
            Some(dot) if dot > 0 => format!("{dir}{}-{width}w{}", &file[..dot], &file[dot..]),
            _ => format!("{dir}{file}-{width}w"),
        }
    }
}

impl AssetAdapter for ManifestAssetAdapter {
    fn dimensions(&self, asset: &AssetRef) -> Option<Dimensions> {
        let natural = self.images.get(&asset.source)?;
        match asset.width {
            Some(w) => Some(Dimensions::new(w, natural.scaled_height(w))),
            None => Some(*natural),
        }
    }

    fn resize(&self, asset: &AssetRef, width: u32) -> Result<AssetRef, AssetError> {
        let natural = self
            .images
            .get(&asset.source)
            .ok_or_else(|| AssetError::NotFound(asset.source.clone()))?;
        if width == 0 {
            return Err(AssetError::InvalidWidth {
                source_path: asset.source.clone(),
                width,
            });
        }
        if self.fail_resize.contains(&asset.source) {
            return Err(AssetError::resize(
                asset.source.clone(),
                width,
                "resize disabled for this source",
            ));
        }
        // Never upscale: the original already is the largest variant
        if width >= natural.width {
            return Ok(AssetRef::new(asset.source.clone()));
        }
        Ok(asset.with_width(width))
    }

    fn url(&self, asset: &AssetRef) -> String {
        let path = match asset.width {
            Some(w) => Self::variant_path(&asset.source, w),
            None => asset.source.clone(),
        };
        if self.url_prefix.is_empty() {
            path
        } else {
            format!(
                "{}/{}",
                self.url_prefix.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        }
    }
}
