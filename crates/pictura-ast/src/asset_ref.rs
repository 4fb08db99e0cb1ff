/*
 * asset_ref.rs
 * Copyright (c) 2025 Posit, PBC
 */

use serde::{Deserialize, Serialize};

/// Plain-data identity of an asset.
///
/// An `AssetRef` names a source file and, for derived variants, the width
/// it was resized to. Two references to the same source with different
/// widths are distinct values; nothing here touches the file system. The
/// final URL is produced by whatever asset backend the renderer was built
/// with, at serialization time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    pub source: String,
    /// Target width of a resized variant, `None` for the original.
    pub width: Option<u32>,
}

impl AssetRef {
    /// Reference to the original (unresized) asset at `source`.
    pub fn new(source: impl Into<String>) -> Self {
        AssetRef {
            source: source.into(),
            width: None,
        }
    }

    /// Reference to a variant of the same source at `width` pixels.
    pub fn with_width(&self, width: u32) -> Self {
        AssetRef {
            source: self.source.clone(),
            width: Some(width),
        }
    }

    pub fn is_variant(&self) -> bool {
        self.width.is_some()
    }
}

/// One `srcset` entry: an asset and its width descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrcsetCandidate {
    pub asset: AssetRef,
    pub width: u32,
}

impl SrcsetCandidate {
    pub fn new(asset: AssetRef, width: u32) -> Self {
        SrcsetCandidate { asset, width }
    }
}

/// An ordered list of `srcset` candidates.
///
/// The candidates are kept unresolved so the element tree stays free of
/// backend state; [`Srcset::render`] turns them into the attribute string
/// once a URL resolver is available.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Srcset {
    candidates: Vec<SrcsetCandidate>,
}

impl Srcset {
    pub fn new(candidates: Vec<SrcsetCandidate>) -> Self {
        Srcset { candidates }
    }

    pub fn candidates(&self) -> &[SrcsetCandidate] {
        &self.candidates
    }

    /// Width descriptors in candidate order.
    pub fn widths(&self) -> Vec<u32> {
        self.candidates.iter().map(|c| c.width).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Render as an HTML `srcset` value, e.g. `a-320w.png 320w, a.png 800w`.
    pub fn render<F>(&self, mut url: F) -> String
    where
        F: FnMut(&AssetRef) -> String,
    {
        self.candidates
            .iter()
            .map(|c| format!("{} {}w", url(&c.asset), c.width))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
