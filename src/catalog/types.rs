//! Data types for the storage manager
//!
//! This module defines the column data types supported by the catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Number of bytes a TEXT value occupies on a page (space-padded, truncated)
pub const TEXT_WIDTH: usize = 10;

/// Column data types
///
/// Serialized with the historical catalog spellings (`"INT"`, `"TEXT"`) so
/// existing `catalog.json` files keep loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 32-bit signed integer
    #[serde(rename = "INT")]
    Integer,
    /// Fixed-width text (10 bytes on disk)
    #[serde(rename = "TEXT")]
    Text,
}

impl DataType {
    /// Encoded size in bytes on a page
    pub fn size(&self) -> usize {
        match self {
            DataType::Integer => 4,
            DataType::Text => TEXT_WIDTH,
        }
    }

    /// Parse a type name as entered by the user (case-insensitive)
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INT" => Ok(DataType::Integer),
            "TEXT" => Ok(DataType::Text),
            other => Err(Error::UnknownDataType(other.to_string())),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Integer => write!(f, "INT"),
            DataType::Text => write!(f, "TEXT"),
        }
    }
}
