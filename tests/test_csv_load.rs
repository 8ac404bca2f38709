use std::io::Write;

use storage_manager::catalog::{Catalog, Column, DataType};
use storage_manager::storage::{BufferManager, DiskManager, Value, EXTENT_SIZE};

#[test]
fn test_csv_load_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    // Set up catalog and table the way the CLI does.
    Catalog::init(dir.path()).unwrap();
    let mut catalog = Catalog::load(dir.path()).unwrap();
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
    catalog.save(dir.path()).unwrap();

    let disk = DiskManager::new(dir.path());
    disk.create_heap_file("shop", "users").unwrap();

    let csv_path = dir.path().join("users.csv");
    let mut csv = std::fs::File::create(&csv_path).unwrap();
    writeln!(csv, "id,name").unwrap();
    for i in 1..=100 {
        writeln!(csv, "{},user{}", i, i).unwrap();
    }
    drop(csv);

    let mut buffer = BufferManager::new();
    let inserted = buffer
        .load_csv_to_disk(&disk, &catalog, "shop", "users", &csv_path)
        .unwrap();
    assert_eq!(inserted, 100);

    // The heap file header reflects the extent-based allocation.
    assert_eq!(disk.page_count("shop", "users").unwrap(), EXTENT_SIZE);
    assert_eq!(disk.extent_count("shop", "users").unwrap(), 1);

    // A separate manager instance reads everything back from disk.
    let reopened = DiskManager::new(dir.path());
    let mut reloaded = BufferManager::new();
    reloaded.load_table(&reopened, "shop", "users").unwrap();

    let catalog = Catalog::load(dir.path()).unwrap();
    let tuples = reloaded.scan(&catalog, "shop", "users").unwrap();
    assert_eq!(tuples.len(), 100);
    assert_eq!(
        tuples[0].values(),
        &[Value::Integer(1), Value::Text("user1".to_string())]
    );
    assert_eq!(
        tuples[99].values(),
        &[Value::Integer(100), Value::Text("user100".to_string())]
    );
}
