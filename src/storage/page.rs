//! Page management for the storage manager
//!
//! Pages are fixed-size 8 KiB blocks using a slotted layout: an item-id
//! array grows downward from the header while tuple data grows upward from
//! the end of the page.
//!
//! Layout (all fields little-endian):
//! - bytes `0..4`  - `lower`: end of the item-id array
//! - bytes `4..8`  - `upper`: start of tuple data
//! - bytes `8..lower` - item ids, 8 bytes each (`offset: u32`, `len: u32`)
//! - bytes `upper..PAGE_SIZE` - tuple data

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Page size in bytes (8 KiB)
pub const PAGE_SIZE: usize = 8192;

/// Page header size (lower + upper offsets)
pub const PAGE_HEADER_SIZE: u32 = 8;

/// Size of one item id (tuple offset + tuple length)
pub const ITEM_ID_SIZE: u32 = 8;

/// Page number type (absolute within a heap file; page 0 is the file header)
pub type PageNum = u32;

/// A fixed-size slotted page
#[derive(Debug, Clone)]
pub struct Page {
    data: Vec<u8>,
}

impl Page {
    /// Create a new page with an initialized header (empty slot array)
    pub fn new() -> Self {
        let mut page = Self {
            data: vec![0u8; PAGE_SIZE],
        };
        page.set_lower(PAGE_HEADER_SIZE);
        page.set_upper(PAGE_SIZE as u32);
        page
    }

    /// Create a completely zeroed page (used for file header pages)
    pub fn zeroed() -> Self {
        Self {
            data: vec![0u8; PAGE_SIZE],
        }
    }

    /// Reconstruct a page from raw bytes read off disk
    ///
    /// The header is validated; a `lower`/`upper` pair outside the page
    /// bounds means the page is corrupted.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut data = vec![0u8; PAGE_SIZE];
        let len = bytes.len().min(PAGE_SIZE);
        data[..len].copy_from_slice(&bytes[..len]);

        let page = Self { data };
        page.check_header()?;
        Ok(page)
    }

    fn check_header(&self) -> Result<()> {
        let (lower, upper) = (self.lower(), self.upper());
        if lower < PAGE_HEADER_SIZE || upper > PAGE_SIZE as u32 || lower > upper {
            return Err(Error::CorruptedPage(lower, upper));
        }
        Ok(())
    }

    /// End of the item-id array
    pub fn lower(&self) -> u32 {
        LittleEndian::read_u32(&self.data[0..4])
    }

    /// Start of tuple data
    pub fn upper(&self) -> u32 {
        LittleEndian::read_u32(&self.data[4..8])
    }

    fn set_lower(&mut self, lower: u32) {
        LittleEndian::write_u32(&mut self.data[0..4], lower);
    }

    fn set_upper(&mut self, upper: u32) {
        LittleEndian::write_u32(&mut self.data[4..8], upper);
    }

    /// Free bytes between the slot array and the tuple data
    pub fn free_space(&self) -> Result<u32> {
        self.check_header()?;
        Ok(self.upper() - self.lower())
    }

    /// Number of tuples stored in this page
    pub fn tuple_count(&self) -> u16 {
        ((self.lower() - PAGE_HEADER_SIZE) / ITEM_ID_SIZE) as u16
    }

    /// Insert a tuple, returning its slot number, or `None` if the page
    /// has no room for the tuple plus its item id
    pub fn insert_tuple(&mut self, tuple: &[u8]) -> Option<u16> {
        let len = tuple.len() as u32;
        let required = len + ITEM_ID_SIZE;
        if self.free_space().ok()? < required {
            return None;
        }

        let slot_num = self.tuple_count();
        let lower = self.lower();
        let start = self.upper() - len;

        self.data[start as usize..(start + len) as usize].copy_from_slice(tuple);

        let item_id = lower as usize;
        LittleEndian::write_u32(&mut self.data[item_id..item_id + 4], start);
        LittleEndian::write_u32(&mut self.data[item_id + 4..item_id + 8], len);

        self.set_lower(lower + ITEM_ID_SIZE);
        self.set_upper(start);
        Some(slot_num)
    }

    /// Get a tuple by slot number
    pub fn get_tuple(&self, slot_num: u16) -> Option<&[u8]> {
        if slot_num >= self.tuple_count() {
            return None;
        }

        let item_id = (PAGE_HEADER_SIZE + slot_num as u32 * ITEM_ID_SIZE) as usize;
        let offset = LittleEndian::read_u32(&self.data[item_id..item_id + 4]) as usize;
        let len = LittleEndian::read_u32(&self.data[item_id + 4..item_id + 8]) as usize;

        self.data.get(offset..offset + len)
    }

    /// Raw page bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw page bytes
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_page_header() {
        let page = Page::new();
        assert_eq!(page.lower(), PAGE_HEADER_SIZE);
        assert_eq!(page.upper(), PAGE_SIZE as u32);
        assert_eq!(page.tuple_count(), 0);
        assert_eq!(
            page.free_space().unwrap(),
            PAGE_SIZE as u32 - PAGE_HEADER_SIZE
        );
    }

    #[test]
    fn test_insert_and_get_tuple() {
        let mut page = Page::new();

        let slot = page.insert_tuple(b"hello").unwrap();
        assert_eq!(slot, 0);
        assert_eq!(page.tuple_count(), 1);
        assert_eq!(page.get_tuple(0), Some(&b"hello"[..]));

        let slot = page.insert_tuple(b"world!").unwrap();
        assert_eq!(slot, 1);
        assert_eq!(page.get_tuple(1), Some(&b"world!"[..]));
        assert_eq!(page.get_tuple(2), None);
    }

    #[test]
    fn test_free_space_accounting() {
        let mut page = Page::new();
        let before = page.free_space().unwrap();

        page.insert_tuple(&[0u8; 100]).unwrap();
        let after = page.free_space().unwrap();
        assert_eq!(before - after, 100 + ITEM_ID_SIZE);

        // lower grew by one item id, upper shrank by the tuple length
        assert_eq!(page.lower(), PAGE_HEADER_SIZE + ITEM_ID_SIZE);
        assert_eq!(page.upper(), PAGE_SIZE as u32 - 100);
    }

    #[test]
    fn test_page_fills_up() {
        let mut page = Page::new();
        let tuple = [7u8; 1000];

        let mut inserted = 0;
        while page.insert_tuple(&tuple).is_some() {
            inserted += 1;
        }

        // 8184 usable bytes / 1008 bytes per tuple+item id
        assert_eq!(inserted, 8);
        assert!(page.free_space().unwrap() < 1000 + ITEM_ID_SIZE);
    }

    #[test]
    fn test_corrupted_header_rejected() {
        let mut bytes = vec![0u8; PAGE_SIZE];
        // lower beyond upper
        LittleEndian::write_u32(&mut bytes[0..4], 9000);
        LittleEndian::write_u32(&mut bytes[4..8], 100);

        assert!(matches!(
            Page::from_bytes(&bytes),
            Err(Error::CorruptedPage(_, _))
        ));
    }

    #[test]
    fn test_round_trip_through_bytes() {
        let mut page = Page::new();
        page.insert_tuple(b"persisted").unwrap();

        let restored = Page::from_bytes(page.data()).unwrap();
        assert_eq!(restored.tuple_count(), 1);
        assert_eq!(restored.get_tuple(0), Some(&b"persisted"[..]));
    }
}
