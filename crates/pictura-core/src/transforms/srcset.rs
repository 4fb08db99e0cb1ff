/*
 * srcset.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Stepped `srcset` candidate generation.
 */

//! Responsive `srcset` generation.
//!
//! Candidate `i` (1-based) has width `min * i`. Stepping stops at the first
//! width above the target width or the configured `max`; the remaining steps
//! are not tried. When at least one stepped candidate fits, a final
//! full-size candidate at the target width is appended.

use pictura_ast::{Srcset, SrcsetCandidate};

use crate::asset::Asset;
use crate::config::WidthSteps;

/// Builds `srcset` candidate lists from a frozen set of width bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SrcsetGenerator {
    bounds: WidthSteps,
}

impl SrcsetGenerator {
    pub fn new(bounds: WidthSteps) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &WidthSteps {
        &self.bounds
    }

    /// Width of stepped candidate `step`.
    fn candidate_width(&self, step: u32) -> u32 {
        self.bounds.min.saturating_mul(step)
    }

    /// Candidates for `asset` displayed at `target_width`.
    ///
    /// `resized` is the variant already chosen for the image's `src`, if
    /// any; it becomes the full-size candidate instead of `asset`. Returns
    /// `None` when no stepped candidate fits, in which case the caller must
    /// leave `srcset` and `sizes` off entirely.
    pub fn generate(
        &self,
        asset: &Asset,
        target_width: u32,
        resized: Option<&Asset>,
    ) -> Option<Srcset> {
        // Variants are derived from a private copy so the caller's handle
        // is never touched.
        let working = asset.clone();
        let mut candidates: Vec<SrcsetCandidate> = Vec::new();

        for step in 1..=self.bounds.steps {
            let width = self.candidate_width(step);
            if width > target_width || width > self.bounds.max {
                break;
            }
            match working.resize(width) {
                Ok(variant) => {
                    candidates.push(SrcsetCandidate::new(variant.reference().clone(), width));
                }
                Err(err) => {
                    tracing::debug!(
                        src = %asset.reference().source,
                        width,
                        error = %err,
                        "Stopping srcset generation after failed resize"
                    );
                    break;
                }
            }
        }

        if candidates.is_empty() {
            return None;
        }

        // A stepped candidate that already sits at the target width is
        // superseded by the full-size entry, keeping widths strictly
        // increasing.
        if candidates.last().map(|c| c.width) == Some(target_width) {
            candidates.pop();
        }
        let full_size = resized.unwrap_or(asset);
        candidates.push(SrcsetCandidate::new(
            full_size.reference().clone(),
            target_width,
        ));

        Some(Srcset::new(candidates))
    }

    /// Like [`generate`](Self::generate), rendered to the attribute string.
    ///
    /// Empty when no candidate fits.
    pub fn generate_string(
        &self,
        asset: &Asset,
        target_width: u32,
        resized: Option<&Asset>,
    ) -> String {
        match self.generate(asset, target_width, resized) {
            Some(srcset) => srcset.render(|r| asset.adapter().url(r)),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetAdapter, ManifestAssetAdapter};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn adapter() -> Arc<dyn AssetAdapter> {
        Arc::new(ManifestAssetAdapter::new().with_image("cat.jpg", 2000, 1000))
    }

    fn generator(steps: u32, min: u32, max: u32) -> SrcsetGenerator {
        SrcsetGenerator::new(WidthSteps { steps, min, max })
    }

    #[test]
    fn test_steps_stop_at_target_width() {
        let cat = Asset::resolve(adapter(), "cat.jpg");
        let srcset = generator(5, 320, 1280).generate(&cat, 1000, None).unwrap();

        assert_eq!(srcset.widths(), vec![320, 640, 960, 1000]);
        assert_eq!(
            generator(5, 320, 1280).generate_string(&cat, 1000, None),
            "cat-320w.jpg 320w, cat-640w.jpg 640w, cat-960w.jpg 960w, cat.jpg 1000w"
        );
    }

    #[test]
    fn test_steps_stop_at_max() {
        let cat = Asset::resolve(adapter(), "cat.jpg");
        let srcset = generator(10, 300, 700).generate(&cat, 2000, None).unwrap();
        assert_eq!(srcset.widths(), vec![300, 600, 2000]);
    }

    #[test]
    fn test_step_count_limits_candidates() {
        let cat = Asset::resolve(adapter(), "cat.jpg");
        let srcset = generator(2, 100, 5000).generate(&cat, 2000, None).unwrap();
        assert_eq!(srcset.widths(), vec![100, 200, 2000]);
    }

    #[test]
    fn test_min_above_target_yields_nothing() {
        let cat = Asset::resolve(adapter(), "cat.jpg");
        assert!(generator(5, 320, 1280).generate(&cat, 200, None).is_none());
        assert_eq!(generator(5, 320, 1280).generate_string(&cat, 200, None), "");
    }

    #[test]
    fn test_zero_steps_yields_nothing() {
        let cat = Asset::resolve(adapter(), "cat.jpg");
        assert!(generator(0, 320, 1280).generate(&cat, 1000, None).is_none());
    }

    #[test]
    fn test_resized_asset_is_full_size_candidate() {
        let cat = Asset::resolve(adapter(), "cat.jpg");
        let resized = cat.resize(700).unwrap();
        let rendered = generator(5, 320, 1280).generate_string(&cat, 700, Some(&resized));
        assert_eq!(rendered, "cat-320w.jpg 320w, cat-640w.jpg 640w, cat-700w.jpg 700w");
    }

    #[test]
    fn test_step_equal_to_target_is_not_duplicated() {
        let cat = Asset::resolve(adapter(), "cat.jpg");
        let srcset = generator(5, 320, 1280).generate(&cat, 640, None).unwrap();
        assert_eq!(srcset.widths(), vec![320, 640]);
        assert_eq!(srcset.candidates()[1].asset, *cat.reference());
    }

    #[test]
    fn test_caller_asset_is_untouched() {
        let cat = Asset::resolve(adapter(), "cat.jpg");
        let before = cat.reference().clone();
        let _ = generator(5, 320, 1280).generate(&cat, 1000, None);
        assert_eq!(cat.reference(), &before);
        assert_eq!(cat.width(), Some(2000));
    }

    #[test]
    fn test_failed_first_step_yields_nothing() {
        let failing: Arc<dyn AssetAdapter> = Arc::new(
            ManifestAssetAdapter::new()
                .with_image("logo.png", 500, 500)
                .with_failing_resize("logo.png"),
        );
        let logo = Asset::resolve(failing, "logo.png");
        assert!(generator(5, 100, 1000).generate(&logo, 500, None).is_none());
    }

    proptest! {
        #[test]
        fn prop_candidates_strictly_increasing_and_bounded(
            steps in 0u32..12,
            min in 1u32..800,
            max in 1u32..3000,
            target in 1u32..2000,
        ) {
            let cat = Asset::resolve(adapter(), "cat.jpg");
            let bounded = generator(steps, min, max);
            if let Some(srcset) = bounded.generate(&cat, target, None) {
                let widths = srcset.widths();
                prop_assert!(widths.windows(2).all(|w| w[0] < w[1]));
                let (last, stepped) = widths.split_last().unwrap();
                prop_assert_eq!(*last, target);
                for w in stepped {
                    prop_assert!(*w <= target && *w <= max);
                }
            } else {
                prop_assert!(steps == 0 || min > target || min > max);
            }
        }
    }
}
