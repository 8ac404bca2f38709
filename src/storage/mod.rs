//! Storage engine module
//!
//! This module contains the storage engine components:
//! - Slotted page layout
//! - Disk manager for heap files
//! - Extent-based page allocation
//! - Tuple codec
//! - In-memory buffer for bulk loads

pub mod buffer;
pub mod disk;
pub mod extent;
pub mod page;
pub mod tuple;

pub use buffer::BufferManager;
pub use disk::DiskManager;
pub use extent::EXTENT_SIZE;
pub use page::{Page, PageNum, ITEM_ID_SIZE, PAGE_HEADER_SIZE, PAGE_SIZE};
pub use tuple::{Tuple, Value};
