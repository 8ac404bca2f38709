//! Extent allocation for heap files
//!
//! Data pages are allocated in extents of 16 pages. Extent `e` covers the
//! absolute pages `1 + e * EXTENT_SIZE .. 1 + (e + 1) * EXTENT_SIZE`
//! (page 0 being the file header page).

use tracing::debug;

use super::disk::DiskManager;
use super::page::{Page, PageNum, PAGE_SIZE};
use crate::error::Result;

/// Pages allocated per extent
pub const EXTENT_SIZE: u32 = 16;

/// First absolute page number of an extent
pub fn extent_start(extent_id: u32) -> PageNum {
    1 + extent_id * EXTENT_SIZE
}

impl DiskManager {
    /// Allocate a new extent (16 initialized pages) and return its id
    pub fn allocate_extent(&self, db_name: &str, table_name: &str) -> Result<u32> {
        let extent_id = self.extent_count(db_name, table_name)?;

        for _ in 0..EXTENT_SIZE {
            self.append_page(db_name, table_name)?;
        }

        let total_pages = self.page_count(db_name, table_name)?;
        self.set_header_counts(db_name, table_name, total_pages, extent_id + 1)?;

        debug!(db = db_name, table = table_name, extent_id, "allocated extent");
        Ok(extent_id)
    }

    /// Find a page in the last extent with at least `required` free bytes
    ///
    /// Allocates the first extent if none exists yet, and a fresh extent
    /// when every page of the last one is too full.
    pub fn find_page_for_insert(
        &self,
        db_name: &str,
        table_name: &str,
        required: u32,
    ) -> Result<PageNum> {
        let total_extents = self.extent_count(db_name, table_name)?;
        let extent_id = if total_extents == 0 {
            self.allocate_extent(db_name, table_name)?
        } else {
            total_extents - 1
        };

        let total_pages = self.page_count(db_name, table_name)?;
        let start = extent_start(extent_id);
        let end = start + EXTENT_SIZE;

        let mut buf = vec![0u8; PAGE_SIZE];
        for page_num in start..end {
            if page_num > total_pages {
                break;
            }
            self.read_page(db_name, table_name, page_num, &mut buf)?;
            let page = Page::from_bytes(&buf)?;
            if page.free_space()? >= required {
                return Ok(page_num);
            }
        }

        let new_extent = self.allocate_extent(db_name, table_name)?;
        Ok(extent_start(new_extent))
    }
}
