/*
 * attr.rs
 * Copyright (c) 2025 Posit, PBC
 */

use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};

use crate::asset_ref::{AssetRef, Srcset};

/// Attribute map of an element, in insertion order.
pub type Attributes = LinkedHashMap<String, AttrValue>;

pub fn empty_attributes() -> Attributes {
    LinkedHashMap::new()
}

/// Value of an element attribute.
///
/// Most attributes are plain text. Image sources and `srcset` lists are kept
/// as pending references so that the final URL is computed exactly once, by
/// the asset backend, when the tree is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrValue {
    Text(String),
    Asset(AssetRef),
    Srcset(Srcset),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_asset(&self) -> Option<&AssetRef> {
        match self {
            AttrValue::Asset(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_srcset(&self) -> Option<&Srcset> {
        match self {
            AttrValue::Srcset(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<AssetRef> for AttrValue {
    fn from(a: AssetRef) -> Self {
        AttrValue::Asset(a)
    }
}

impl From<Srcset> for AttrValue {
    fn from(s: Srcset) -> Self {
        AttrValue::Srcset(s)
    }
}
