//! Error types for pictura-core

use thiserror::Error;

/// A piece of an attribute-list token that could not be decoded.
///
/// These never abort a render: the offending piece is skipped and the rest
/// of the token is still applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeListError {
    #[error("empty id in attribute list piece `{0}`")]
    EmptyId(String),

    #[error("empty class in attribute list piece `{0}`")]
    EmptyClass(String),

    #[error("missing attribute name in `{0}`")]
    EmptyKey(String),

    #[error("invalid attribute name `{key}` in `{piece}`")]
    InvalidKey { key: String, piece: String },
}

/// Failures reported by an asset backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("invalid resize width {width} for {source_path}")]
    InvalidWidth { source_path: String, width: u32 },

    #[error("failed to resize {source_path} to {width}px: {message}")]
    Resize {
        source_path: String,
        width: u32,
        message: String,
    },
}

impl AssetError {
    /// Create a resize failure from any message.
    pub fn resize(source_path: impl Into<String>, width: u32, message: impl Into<String>) -> Self {
        Self::Resize {
            source_path: source_path.into(),
            width,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("YAML configuration error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON configuration error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum PicturaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, PicturaError>;
