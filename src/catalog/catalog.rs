//! System catalog for the storage manager
//!
//! The catalog tracks every database, the tables inside each database, and
//! the columns of each table. It is persisted as pretty-printed JSON in
//! `catalog.json` inside the data directory.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::types::DataType;
use crate::error::{Error, Result};

/// File name of the persisted catalog inside the data directory
pub const CATALOG_FILE_NAME: &str = "catalog.json";

/// Column definition in a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Table definition - an ordered list of columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Ordered list of columns
    pub columns: Vec<Column>,
}

impl Table {
    /// Create a table definition from a list of columns
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Encoded size of one row of this table in bytes
    pub fn row_size(&self) -> usize {
        self.columns.iter().map(|c| c.data_type.size()).sum()
    }
}

/// A named group of tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Tables by name, in creation order
    pub tables: IndexMap<String, Table>,
}

/// System catalog - the top-level metadata registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Databases by name, in creation order
    pub databases: IndexMap<String, Database>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new database
    pub fn create_database(&mut self, name: &str) -> Result<()> {
        let name = valid_name(name)?;

        if self.databases.contains_key(name) {
            return Err(Error::DatabaseAlreadyExists(name.to_string()));
        }

        self.databases.insert(name.to_string(), Database::default());
        info!(database = name, "created database");
        Ok(())
    }

    /// Create a table inside an existing database
    pub fn create_table(&mut self, db_name: &str, name: &str, columns: Vec<Column>) -> Result<()> {
        let name = valid_name(name)?;
        if columns.is_empty() {
            return Err(Error::EmptyColumnList(name.to_string()));
        }

        let db = self
            .databases
            .get_mut(db_name)
            .ok_or_else(|| Error::DatabaseNotFound(db_name.to_string()))?;

        if db.tables.contains_key(name) {
            return Err(Error::TableAlreadyExists(
                name.to_string(),
                db_name.to_string(),
            ));
        }

        db.tables.insert(name.to_string(), Table::new(columns));
        info!(database = db_name, table = name, "created table");
        Ok(())
    }

    /// Drop a table from a database
    pub fn drop_table(&mut self, db_name: &str, name: &str) -> Result<()> {
        let db = self
            .databases
            .get_mut(db_name)
            .ok_or_else(|| Error::DatabaseNotFound(db_name.to_string()))?;

        if db.tables.shift_remove(name).is_none() {
            return Err(Error::TableNotFound(
                name.to_string(),
                db_name.to_string(),
            ));
        }

        info!(database = db_name, table = name, "dropped table");
        Ok(())
    }

    /// Get a database by name
    pub fn database(&self, name: &str) -> Result<&Database> {
        self.databases
            .get(name)
            .ok_or_else(|| Error::DatabaseNotFound(name.to_string()))
    }

    /// Get a table definition by database and table name
    pub fn table(&self, db_name: &str, name: &str) -> Result<&Table> {
        self.database(db_name)?
            .tables
            .get(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string(), db_name.to_string()))
    }

    /// Check if a database exists
    pub fn database_exists(&self, name: &str) -> bool {
        self.databases.contains_key(name)
    }

    /// List all database names in creation order
    pub fn database_names(&self) -> Vec<&str> {
        self.databases.keys().map(|s| s.as_str()).collect()
    }

    /// List all table names of a database in creation order
    pub fn table_names(&self, db_name: &str) -> Result<Vec<&str>> {
        Ok(self
            .database(db_name)?
            .tables
            .keys()
            .map(|s| s.as_str())
            .collect())
    }

    /// Path of the catalog file inside a data directory
    pub fn file_path(data_dir: impl AsRef<Path>) -> PathBuf {
        data_dir.as_ref().join(CATALOG_FILE_NAME)
    }

    /// Create the catalog file with an empty catalog if it does not exist
    pub fn init(data_dir: impl AsRef<Path>) -> Result<()> {
        let path = Self::file_path(&data_dir);
        if path.exists() {
            debug!(path = %path.display(), "catalog file already present");
            return Ok(());
        }

        fs::create_dir_all(data_dir.as_ref())?;
        Catalog::new().save(data_dir)?;
        info!(path = %path.display(), "initialized empty catalog");
        Ok(())
    }

    /// Load the catalog from its JSON file
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self> {
        let path = Self::file_path(data_dir);
        let json = fs::read_to_string(&path)?;
        let catalog = serde_json::from_str(&json)?;
        debug!(path = %path.display(), "loaded catalog");
        Ok(catalog)
    }

    /// Save the catalog to its JSON file
    pub fn save(&self, data_dir: impl AsRef<Path>) -> Result<()> {
        let path = Self::file_path(data_dir);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        debug!(path = %path.display(), "saved catalog");
        Ok(())
    }
}

/// Reject empty or whitespace-only object names
fn valid_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}
