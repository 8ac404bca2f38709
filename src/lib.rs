//! storage_manager - A page-based storage manager written in Rust
//!
//! This library provides the core components of a small storage subsystem:
//! - System catalog (databases, tables, columns) persisted as JSON
//! - Slotted 8 KiB pages with extent-based allocation
//! - Heap files managed through a disk manager
//! - An in-memory buffer used to bulk-load CSV data into tables

pub mod catalog;
pub mod error;
pub mod storage;

pub use error::{Error, Result};
