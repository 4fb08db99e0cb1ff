/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Image rendering options.
 */

//! Image rendering configuration.
//!
//! [`ImageConfig`] is resolved once, before rendering starts, and handed to
//! every component at construction. Nothing mutates it afterwards.
//!
//! The serialized shape uses kebab-case keys:
//!
//! ```yaml
//! lazy:
//!   enabled: true
//! resize:
//!   enabled: true
//! figure-caption:
//!   enabled: true
//! responsive:
//!   enabled: true
//!   width:
//!     steps: 5
//!     min: 320
//!     max: 1280
//!   sizes:
//!     default: 100vw
//! toc:
//!   selectors: [h2, h3]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A boolean feature switch (`<feature>.enabled`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggle {
    pub enabled: bool,
}

impl Toggle {
    pub const fn on() -> Self {
        Toggle { enabled: true }
    }

    pub const fn off() -> Self {
        Toggle { enabled: false }
    }
}

/// Bounds for stepped `srcset` candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidthSteps {
    /// Number of stepped candidates to try.
    pub steps: u32,
    /// Width of the first candidate; candidate `i` is `min * i`.
    pub min: u32,
    /// No candidate may exceed this width.
    pub max: u32,
}

impl Default for WidthSteps {
    fn default() -> Self {
        WidthSteps {
            steps: 5,
            min: 320,
            max: 1280,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sizes {
    /// Passed through verbatim to the `sizes` attribute.
    pub default: String,
}

impl Default for Sizes {
    fn default() -> Self {
        Sizes {
            default: "100vw".to_string(),
        }
    }
}

/// Responsive image (`srcset`/`sizes`) options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsiveConfig {
    pub enabled: bool,
    pub width: WidthSteps,
    pub sizes: Sizes,
}

/// Table-of-contents options owned by the base grammar.
///
/// Only carried through so that the grammar can be constructed from the same
/// configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    pub selectors: Vec<String>,
}

impl Default for TocConfig {
    fn default() -> Self {
        TocConfig {
            selectors: vec!["h2".to_string(), "h3".to_string()],
        }
    }
}

/// All options consulted while rendering images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ImageConfig {
    /// Add `loading="lazy"` to resolvable images.
    pub lazy: Toggle,
    /// Resize images whose declared width is below their natural width.
    pub resize: Toggle,
    pub responsive: ResponsiveConfig,
    /// Render captioned image-only lines as `<figure>`.
    #[serde(alias = "caption")]
    pub figure_caption: Toggle,
    pub toc: TocConfig,
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            lazy: Toggle::on(),
            resize: Toggle::off(),
            responsive: ResponsiveConfig::default(),
            figure_caption: Toggle::off(),
            toc: TocConfig::default(),
        }
    }
}

impl ImageConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: ImageConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Convert and validate an already-parsed JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let config: ImageConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the responsive width bounds.
    ///
    /// Only `min == 0` is rejected. A `min` above `max` is accepted and
    /// simply yields no `srcset` candidates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let width = &self.responsive.width;
        if width.min == 0 {
            return Err(ConfigError::Invalid(
                "responsive.width.min must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn toc_selectors(&self) -> &[String] {
        &self.toc.selectors
    }
}
