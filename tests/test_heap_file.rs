use storage_manager::storage::{DiskManager, Page, PAGE_HEADER_SIZE, PAGE_SIZE};
use storage_manager::Error;

fn setup() -> (tempfile::TempDir, DiskManager) {
    let dir = tempfile::tempdir().unwrap();
    let disk = DiskManager::new(dir.path());
    disk.create_heap_file("shop", "orders").unwrap();
    (dir, disk)
}

#[test]
fn test_fresh_heap_file_is_one_zeroed_header_page() {
    let (_dir, disk) = setup();

    let path = disk.table_path("shop", "orders");
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), PAGE_SIZE, "heap file should be one page");
    assert!(bytes.iter().all(|&b| b == 0), "header page should be zeroed");

    assert_eq!(disk.page_count("shop", "orders").unwrap(), 0);
    assert_eq!(disk.extent_count("shop", "orders").unwrap(), 0);
}

#[test]
fn test_append_page_grows_file_and_counter() {
    let (_dir, disk) = setup();

    let page_num = disk.append_page("shop", "orders").unwrap();
    assert_eq!(page_num, 1);
    assert_eq!(disk.page_count("shop", "orders").unwrap(), 1);

    let path = disk.table_path("shop", "orders");
    assert_eq!(
        std::fs::metadata(&path).unwrap().len(),
        2 * PAGE_SIZE as u64,
        "file should hold header page plus one data page"
    );

    // The new page carries an initialized slot header.
    let mut buf = vec![0u8; PAGE_SIZE];
    disk.read_page("shop", "orders", page_num, &mut buf).unwrap();
    let page = Page::from_bytes(&buf).unwrap();
    assert_eq!(page.lower(), PAGE_HEADER_SIZE);
    assert_eq!(page.upper(), PAGE_SIZE as u32);
    assert_eq!(page.free_space().unwrap(), PAGE_SIZE as u32 - PAGE_HEADER_SIZE);
}

#[test]
fn test_page_write_read_round_trip() {
    let (_dir, disk) = setup();
    let page_num = disk.append_page("shop", "orders").unwrap();

    let mut page = Page::new();
    page.insert_tuple(&[10, 20, 30, 40]).unwrap();
    disk.write_page("shop", "orders", page_num, page.data())
        .unwrap();

    let mut buf = vec![0u8; PAGE_SIZE];
    disk.read_page("shop", "orders", page_num, &mut buf).unwrap();
    let restored = Page::from_bytes(&buf).unwrap();
    assert_eq!(restored.tuple_count(), 1);
    assert_eq!(restored.get_tuple(0), Some(&[10u8, 20, 30, 40][..]));
}

#[test]
fn test_out_of_bounds_access_rejected() {
    let (_dir, disk) = setup();

    let mut buf = vec![0u8; PAGE_SIZE];
    assert!(matches!(
        disk.read_page("shop", "orders", 9, &mut buf),
        Err(Error::PageOutOfBounds(9))
    ));

    let page = Page::new();
    assert!(matches!(
        disk.write_page("shop", "orders", 9, page.data()),
        Err(Error::PageOutOfBounds(9))
    ));
}
