//! In-memory page buffer for the storage manager
//!
//! The buffer mirrors one heap file: the header page at index 0 and data
//! pages after it, grown one extent (16 pages) at a time. It is used to
//! bulk-load CSV files into a table and to read a table back from disk.

use byteorder::{ByteOrder, LittleEndian};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

use super::disk::DiskManager;
use super::extent::EXTENT_SIZE;
use super::page::{Page, ITEM_ID_SIZE, PAGE_HEADER_SIZE, PAGE_SIZE};
use super::tuple::{Tuple, Value};
use crate::catalog::Catalog;
use crate::error::{Error, Result};

/// In-memory buffer over a single heap file
#[derive(Debug)]
pub struct BufferManager {
    /// Header page at index 0, data pages after it
    pages: Vec<Page>,
}

impl BufferManager {
    /// Create a buffer holding only a zeroed header page
    pub fn new() -> Self {
        Self {
            pages: vec![Page::zeroed()],
        }
    }

    /// Total pages held, header page included
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Grow the buffer by one extent of initialized data pages
    fn allocate_extent(&mut self) {
        for _ in 0..EXTENT_SIZE {
            self.pages.push(Page::new());
        }
    }

    /// Replace the buffer contents with all pages of a heap file
    pub fn load_table(
        &mut self,
        disk: &DiskManager,
        db_name: &str,
        table_name: &str,
    ) -> Result<()> {
        let file_pages = disk.file_pages(db_name, table_name)?;
        self.pages.clear();

        let mut buf = vec![0u8; PAGE_SIZE];
        for page_num in 0..file_pages {
            disk.read_page(db_name, table_name, page_num, &mut buf)?;
            if page_num == 0 {
                // Header page has no slot layout to validate.
                let mut header = Page::zeroed();
                header.data_mut().copy_from_slice(&buf);
                self.pages.push(header);
            } else {
                self.pages.push(Page::from_bytes(&buf)?);
            }
        }

        info!(
            db = db_name,
            table = table_name,
            pages = self.pages.len(),
            "loaded table into buffer"
        );
        Ok(())
    }

    /// Decode every tuple in the buffered data pages
    pub fn scan(&self, catalog: &Catalog, db_name: &str, table_name: &str) -> Result<Vec<Tuple>> {
        let columns = &catalog.table(db_name, table_name)?.columns;
        let mut tuples = Vec::new();

        for page in self.pages.iter().skip(1) {
            for slot in 0..page.tuple_count() {
                if let Some(bytes) = page.get_tuple(slot) {
                    tuples.push(Tuple::decode(bytes, columns)?);
                }
            }
        }
        Ok(tuples)
    }

    /// Load a CSV file into the buffer, returning the number of rows stored
    ///
    /// The first CSV line is treated as a header and skipped. Blank lines,
    /// rows with the wrong number of fields, and rows with unparseable
    /// values are skipped with a warning.
    pub fn load_csv(
        &mut self,
        catalog: &Catalog,
        db_name: &str,
        table_name: &str,
        csv_path: impl AsRef<Path>,
    ) -> Result<usize> {
        let columns = &catalog.table(db_name, table_name)?.columns;

        let file = File::open(csv_path.as_ref())?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();
        // Skip the CSV header row.
        if let Some(line) = lines.next() {
            line?;
        }

        let mut inserted = 0usize;
        let mut current = 1usize; // data pages start after the header page

        for (line_num, line) in lines.enumerate() {
            let row = line?;
            if row.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = row.split(',').map(|f| f.trim()).collect();
            if fields.len() != columns.len() {
                warn!(
                    line = line_num + 2,
                    expected = columns.len(),
                    got = fields.len(),
                    "skipping row with wrong field count"
                );
                continue;
            }

            let mut values = Vec::with_capacity(columns.len());
            let mut bad_field = false;
            for (field, column) in fields.iter().zip(columns) {
                match Value::parse(field, column.data_type) {
                    Ok(value) => values.push(value),
                    Err(e) => {
                        warn!(line = line_num + 2, error = %e, "skipping unparseable row");
                        bad_field = true;
                        break;
                    }
                }
            }
            if bad_field {
                continue;
            }

            let bytes = Tuple::new(values).encode(columns)?;
            let required = bytes.len() as u32 + ITEM_ID_SIZE;
            if required > PAGE_SIZE as u32 - PAGE_HEADER_SIZE {
                return Err(Error::LoadError(format!(
                    "row of {} bytes cannot fit in a page",
                    bytes.len()
                )));
            }

            loop {
                if current >= self.pages.len() {
                    self.allocate_extent();
                }
                if self.pages[current].free_space()? < required {
                    current += 1;
                    continue;
                }
                self.pages[current]
                    .insert_tuple(&bytes)
                    .ok_or_else(|| Error::PageFull(current as u32))?;
                inserted += 1;
                break;
            }
        }

        self.update_header();
        info!(
            db = db_name,
            table = table_name,
            rows = inserted,
            pages = self.pages.len() - 1,
            "loaded CSV into buffer"
        );
        Ok(inserted)
    }

    /// Write the header-page counters for the current buffer shape
    fn update_header(&mut self) {
        let data_pages = (self.pages.len() - 1) as u32;
        let extents = data_pages.div_ceil(EXTENT_SIZE);
        let header = self.pages[0].data_mut();
        LittleEndian::write_u32(&mut header[0..4], data_pages);
        LittleEndian::write_u32(&mut header[4..8], extents);
    }

    /// Write every buffered page back to the heap file
    pub fn flush(&self, disk: &DiskManager, db_name: &str, table_name: &str) -> Result<()> {
        for (page_num, page) in self.pages.iter().enumerate() {
            disk.write_page(db_name, table_name, page_num as u32, page.data())?;
        }
        Ok(())
    }

    /// Full pipeline: load a CSV into the buffer, then flush it to disk
    pub fn load_csv_to_disk(
        &mut self,
        disk: &DiskManager,
        catalog: &Catalog,
        db_name: &str,
        table_name: &str,
        csv_path: impl AsRef<Path>,
    ) -> Result<usize> {
        let inserted = self.load_csv(catalog, db_name, table_name, csv_path)?;
        self.flush(disk, db_name, table_name)?;
        Ok(inserted)
    }
}

impl Default for BufferManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Column, DataType};
    use std::io::Write;

    fn setup() -> (tempfile::TempDir, DiskManager, Catalog) {
        let dir = tempfile::tempdir().unwrap();
        let disk = DiskManager::new(dir.path());

        let mut catalog = Catalog::new();
        catalog.create_database("shop").unwrap();
        catalog
            .create_table(
                "shop",
                "users",
                vec![
                    Column::new("id", DataType::Integer),
                    Column::new("name", DataType::Text),
                ],
            )
            .unwrap();
        disk.create_heap_file("shop", "users").unwrap();

        (dir, disk, catalog)
    }

    fn write_csv(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("users.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_csv_into_buffer() {
        let (dir, _disk, catalog) = setup();
        let csv = write_csv(dir.path(), "id,name\n1,alice\n2,bob\n");

        let mut buffer = BufferManager::new();
        let inserted = buffer.load_csv(&catalog, "shop", "users", &csv).unwrap();

        assert_eq!(inserted, 2);
        // one extent was allocated
        assert_eq!(buffer.page_count(), 1 + EXTENT_SIZE as usize);

        let tuples = buffer.scan(&catalog, "shop", "users").unwrap();
        assert_eq!(tuples.len(), 2);
        assert_eq!(
            tuples[0].values(),
            &[Value::Integer(1), Value::Text("alice".to_string())]
        );
    }

    #[test]
    fn test_bad_rows_skipped() {
        let (dir, _disk, catalog) = setup();
        let csv = write_csv(
            dir.path(),
            "id,name\n1,alice\n\ntoo,many,fields\nnot_a_number,carol\n4,dave\n",
        );

        let mut buffer = BufferManager::new();
        let inserted = buffer.load_csv(&catalog, "shop", "users", &csv).unwrap();
        assert_eq!(inserted, 2);

        let tuples = buffer.scan(&catalog, "shop", "users").unwrap();
        assert_eq!(
            tuples[1].values(),
            &[Value::Integer(4), Value::Text("dave".to_string())]
        );
    }

    #[test]
    fn test_flush_and_reload() {
        let (dir, disk, catalog) = setup();
        let csv = write_csv(dir.path(), "id,name\n1,alice\n2,bob\n3,carol\n");

        let mut buffer = BufferManager::new();
        let inserted = buffer
            .load_csv_to_disk(&disk, &catalog, "shop", "users", &csv)
            .unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(disk.page_count("shop", "users").unwrap(), EXTENT_SIZE);
        assert_eq!(disk.extent_count("shop", "users").unwrap(), 1);

        let mut reloaded = BufferManager::new();
        reloaded.load_table(&disk, "shop", "users").unwrap();
        assert_eq!(reloaded.page_count(), 1 + EXTENT_SIZE as usize);

        let tuples = reloaded.scan(&catalog, "shop", "users").unwrap();
        assert_eq!(tuples.len(), 3);
        assert_eq!(
            tuples[2].values(),
            &[Value::Integer(3), Value::Text("carol".to_string())]
        );
    }

    #[test]
    fn test_many_rows_spill_across_pages() {
        let (dir, _disk, catalog) = setup();

        let mut content = String::from("id,name\n");
        for i in 0..2000 {
            content.push_str(&format!("{},user{}\n", i, i % 100));
        }
        let csv = write_csv(dir.path(), &content);

        let mut buffer = BufferManager::new();
        let inserted = buffer.load_csv(&catalog, "shop", "users", &csv).unwrap();
        assert_eq!(inserted, 2000);

        // 14 bytes per row + 8-byte item id = 22 bytes; 8184 usable bytes
        // per page holds 372 rows, so 2000 rows need 6 data pages.
        let tuples = buffer.scan(&catalog, "shop", "users").unwrap();
        assert_eq!(tuples.len(), 2000);
        assert!(buffer.page_count() > 6);
    }
}
