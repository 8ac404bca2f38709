//! storage-manager - Interactive session

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::env;

use storage_manager::catalog::{Catalog, Column, DataType};
use storage_manager::storage::{BufferManager, DiskManager};

/// Print welcome banner
fn print_banner() {
    println!(
        r#"
storage-manager - a page-based storage manager

Catalog and table files live under the data directory
(default './data', override with the first argument).
"#
    );
}

/// Print the session menu
fn print_menu(current_db: Option<&str>) {
    println!("\n=============================");
    println!("1. Show databases");
    println!("2. Create database");
    println!("3. Select database");
    println!("4. Create table");
    println!("5. Load CSV into table");
    println!("6. Exit");
    println!("=============================");
    match current_db {
        Some(db) => println!("Current database: '{}'", db),
        None => println!("No database selected."),
    }
}

/// Read one line, treating Ctrl-C / Ctrl-D as "no input"
fn prompt(rl: &mut DefaultEditor, msg: &str) -> Result<Option<String>> {
    match rl.readline(msg) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn show_databases(catalog: &Catalog) {
    let names = catalog.database_names();
    if names.is_empty() {
        println!("No databases found.");
        return;
    }
    println!("Databases:");
    for name in names {
        println!("- {}", name);
    }
}

/// Prompt for `name:type` column lines until a blank line
fn read_columns(rl: &mut DefaultEditor) -> Result<Vec<Column>> {
    println!("Enter columns as name:type (INT or TEXT), blank line to finish.");
    let mut columns = Vec::new();

    loop {
        let line = match prompt(rl, "column> ")? {
            Some(line) => line,
            None => break,
        };
        if line.is_empty() {
            break;
        }

        let mut parts = line.splitn(2, ':');
        let (name, ty) = match (parts.next(), parts.next()) {
            (Some(name), Some(ty)) if !name.trim().is_empty() => (name.trim(), ty),
            _ => {
                println!("Invalid format. Use name:type (e.g. id:INT)");
                continue;
            }
        };

        match DataType::parse(ty) {
            Ok(data_type) => columns.push(Column::new(name, data_type)),
            Err(e) => println!("{}", e),
        }
    }

    Ok(columns)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let data_dir = env::args().nth(1).unwrap_or_else(|| "data".to_string());

    print_banner();

    Catalog::init(&data_dir)?;
    let mut catalog = Catalog::load(&data_dir)?;
    let disk = DiskManager::new(&data_dir);

    let mut rl = DefaultEditor::new()?;
    let mut current_db: Option<String> = None;

    loop {
        print_menu(current_db.as_deref());
        let choice = match prompt(&mut rl, "choice> ")? {
            Some(choice) => choice,
            None => break,
        };

        match choice.as_str() {
            "1" => show_databases(&catalog),

            "2" => {
                let name = match prompt(&mut rl, "New database name: ")? {
                    Some(name) => name,
                    None => continue,
                };
                match catalog.create_database(&name) {
                    Ok(()) => {
                        catalog.save(&data_dir)?;
                        println!("Database '{}' created.", name);
                    }
                    Err(e) => println!("{}", e),
                }
            }

            "3" => {
                if catalog.database_names().is_empty() {
                    println!("No databases found. Create one first.");
                    continue;
                }
                show_databases(&catalog);
                let name = match prompt(&mut rl, "Database to select: ")? {
                    Some(name) => name,
                    None => continue,
                };
                if catalog.database_exists(&name) {
                    println!("Database '{}' selected.", name);
                    current_db = Some(name);
                } else {
                    println!("Database '{}' does not exist.", name);
                }
            }

            "4" => {
                let db_name = match &current_db {
                    Some(name) => name.clone(),
                    None => {
                        println!("No database selected. Select one first.");
                        continue;
                    }
                };
                let table_name = match prompt(&mut rl, "New table name: ")? {
                    Some(name) => name,
                    None => continue,
                };

                let columns = read_columns(&mut rl)?;
                if columns.is_empty() {
                    println!("No columns provided. Table not created.");
                    continue;
                }

                match catalog.create_table(&db_name, &table_name, columns) {
                    Ok(()) => {
                        disk.create_heap_file(&db_name, &table_name)?;
                        catalog.save(&data_dir)?;
                        println!("Table '{}' created in '{}'.", table_name, db_name);
                    }
                    Err(e) => println!("{}", e),
                }
            }

            "5" => {
                let db_name = match &current_db {
                    Some(name) => name.clone(),
                    None => {
                        println!("No database selected. Select one first.");
                        continue;
                    }
                };
                let table_name = match prompt(&mut rl, "Table name: ")? {
                    Some(name) => name,
                    None => continue,
                };
                let csv_path = match prompt(&mut rl, "CSV file path: ")? {
                    Some(path) => path,
                    None => continue,
                };

                let mut buffer = BufferManager::new();
                match buffer.load_csv_to_disk(&disk, &catalog, &db_name, &table_name, &csv_path) {
                    Ok(rows) => println!("Loaded {} rows into '{}'.", rows, table_name),
                    Err(e) => println!("{}", e),
                }
            }

            "6" => {
                println!("Goodbye!");
                break;
            }

            _ => println!("Invalid choice. Please select 1-6."),
        }
    }

    Ok(())
}
