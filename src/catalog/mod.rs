//! Catalog module
//!
//! This module contains the system catalog and its record types.

pub mod catalog;
pub mod types;

pub use catalog::{Catalog, Column, Database, Table, CATALOG_FILE_NAME};
pub use types::DataType;
