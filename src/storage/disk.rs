//! Disk manager for the storage manager
//!
//! Handles file I/O for heap files. Each table owns one file at
//! `<data_dir>/base/<database>/<table>.dat`. Page 0 of every heap file is a
//! header page: bytes `0..4` hold the data-page count and bytes `4..8` the
//! extent count, both little-endian; data pages follow from page 1.

use byteorder::{ByteOrder, LittleEndian};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use super::page::{Page, PageNum, PAGE_SIZE};
use crate::error::{Error, Result};

/// Header-page offset of the data-page count
const TOTAL_PAGES_OFFSET: u64 = 0;

/// Header-page offset of the extent count
const TOTAL_EXTENTS_OFFSET: u64 = 4;

/// Disk manager
#[derive(Debug)]
pub struct DiskManager {
    /// File handles for open heap files, keyed by path
    open_files: Mutex<HashMap<PathBuf, File>>,
    /// Directory where data files are stored
    data_dir: PathBuf,
}

impl DiskManager {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            open_files: Mutex::new(HashMap::new()),
            data_dir: data_dir.into(),
        }
    }

    /// Directory this manager stores files under
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of a table's heap file
    pub fn table_path(&self, db_name: &str, table_name: &str) -> PathBuf {
        self.data_dir
            .join("base")
            .join(db_name)
            .join(format!("{}.dat", table_name))
    }

    /// Create (or reset) a table's heap file with a zeroed header page
    pub fn create_heap_file(&self, db_name: &str, table_name: &str) -> Result<()> {
        let path = self.table_path(db_name, table_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut open_files = self.open_files.lock().unwrap();
        let file = self.get_file_mut(&mut open_files, db_name, table_name)?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&vec![0u8; PAGE_SIZE])?;
        file.flush()?;

        debug!(path = %path.display(), "created heap file");
        Ok(())
    }

    /// Read page `page_num` into `data`
    pub fn read_page(
        &self,
        db_name: &str,
        table_name: &str,
        page_num: PageNum,
        data: &mut [u8],
    ) -> Result<()> {
        let mut open_files = self.open_files.lock().unwrap();
        let file = self.get_file_mut(&mut open_files, db_name, table_name)?;

        let offset = page_num as u64 * PAGE_SIZE as u64;
        if offset + PAGE_SIZE as u64 > file.metadata()?.len() {
            return Err(Error::PageOutOfBounds(page_num));
        }

        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(data)?;
        Ok(())
    }

    /// Write page `page_num` from `data`
    ///
    /// Writing exactly at the end of the file is allowed (sequential
    /// extension); anything past that is rejected.
    pub fn write_page(
        &self,
        db_name: &str,
        table_name: &str,
        page_num: PageNum,
        data: &[u8],
    ) -> Result<()> {
        let mut open_files = self.open_files.lock().unwrap();
        let file = self.get_file_mut(&mut open_files, db_name, table_name)?;

        let offset = page_num as u64 * PAGE_SIZE as u64;
        if offset > file.metadata()?.len() {
            return Err(Error::PageOutOfBounds(page_num));
        }

        file.seek(SeekFrom::Start(offset))?;
        file.write_all(data)?;
        file.flush()?;
        Ok(())
    }

    /// Append one freshly initialized page and return its page number
    pub fn append_page(&self, db_name: &str, table_name: &str) -> Result<PageNum> {
        let mut open_files = self.open_files.lock().unwrap();
        let file = self.get_file_mut(&mut open_files, db_name, table_name)?;

        let page_num = (file.metadata()?.len() / PAGE_SIZE as u64) as PageNum;
        let page = Page::new();
        file.seek(SeekFrom::End(0))?;
        file.write_all(page.data())?;

        let total = read_u32_at(file, TOTAL_PAGES_OFFSET)? + 1;
        write_u32_at(file, TOTAL_PAGES_OFFSET, total)?;
        file.flush()?;

        debug!(db = db_name, table = table_name, page_num, "appended page");
        Ok(page_num)
    }

    /// Number of data pages in a heap file (from the header page)
    pub fn page_count(&self, db_name: &str, table_name: &str) -> Result<u32> {
        let mut open_files = self.open_files.lock().unwrap();
        let file = self.get_file_mut(&mut open_files, db_name, table_name)?;
        read_u32_at(file, TOTAL_PAGES_OFFSET)
    }

    /// Number of extents in a heap file (from the header page)
    pub fn extent_count(&self, db_name: &str, table_name: &str) -> Result<u32> {
        let mut open_files = self.open_files.lock().unwrap();
        let file = self.get_file_mut(&mut open_files, db_name, table_name)?;
        read_u32_at(file, TOTAL_EXTENTS_OFFSET)
    }

    /// Update both header counters at once
    pub(crate) fn set_header_counts(
        &self,
        db_name: &str,
        table_name: &str,
        total_pages: u32,
        total_extents: u32,
    ) -> Result<()> {
        let mut open_files = self.open_files.lock().unwrap();
        let file = self.get_file_mut(&mut open_files, db_name, table_name)?;
        write_u32_at(file, TOTAL_PAGES_OFFSET, total_pages)?;
        write_u32_at(file, TOTAL_EXTENTS_OFFSET, total_extents)?;
        file.flush()?;
        Ok(())
    }

    /// Size of a heap file in whole pages (header page included)
    pub fn file_pages(&self, db_name: &str, table_name: &str) -> Result<u32> {
        let mut open_files = self.open_files.lock().unwrap();
        let file = self.get_file_mut(&mut open_files, db_name, table_name)?;
        Ok((file.metadata()?.len() / PAGE_SIZE as u64) as u32)
    }

    fn get_file_mut<'a>(
        &self,
        open_files: &'a mut HashMap<PathBuf, File>,
        db_name: &str,
        table_name: &str,
    ) -> Result<&'a mut File> {
        let path = self.table_path(db_name, table_name);
        if !open_files.contains_key(&path) {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .open(&path)?;
            open_files.insert(path.clone(), file);
        }
        Ok(open_files.get_mut(&path).unwrap())
    }
}

fn read_u32_at(file: &mut File, pos: u64) -> Result<u32> {
    file.seek(SeekFrom::Start(pos))?;
    let mut buf = [0u8; 4];
    file.read_exact(&mut buf)?;
    Ok(LittleEndian::read_u32(&buf))
}

fn write_u32_at(file: &mut File, pos: u64, value: u32) -> Result<()> {
    file.seek(SeekFrom::Start(pos))?;
    let mut buf = [0u8; 4];
    LittleEndian::write_u32(&mut buf, value);
    file.write_all(&buf)?;
    Ok(())
}
