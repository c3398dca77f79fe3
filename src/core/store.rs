//! Table storage - the persistence seam for the three base tables
//!
//! [`TableStore`] is the collaborator contract: read all rows of a named
//! table, append one row, or replace the whole table. [`CsvStore`] is the
//! plain-text backend (one CSV file per table under `data/`); any remote
//! tabular store can implement the same trait and slot in unchanged.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use miette::Diagnostic;
use thiserror::Error;

use crate::core::loader::{self, RawTable};
use crate::core::Project;
use crate::entities::{Quotation, Supplier, Supply};

/// The three base tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Supplies,
    Suppliers,
    Quotations,
}

impl TableKind {
    /// All table kinds
    pub fn all() -> &'static [TableKind] {
        &[
            TableKind::Supplies,
            TableKind::Suppliers,
            TableKind::Quotations,
        ]
    }

    /// Table name as used in messages and for `pqt import`
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Supplies => "supplies",
            TableKind::Suppliers => "suppliers",
            TableKind::Quotations => "quotations",
        }
    }

    /// File name of the table under the project's `data/` directory
    pub fn file_name(&self) -> &'static str {
        match self {
            TableKind::Supplies => "supplies.csv",
            TableKind::Suppliers => "suppliers.csv",
            TableKind::Quotations => "quotations.csv",
        }
    }

    /// Column headers written for this table
    pub fn storage_columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Supplies => &Supply::COLUMNS,
            TableKind::Suppliers => &Supplier::COLUMNS,
            TableKind::Quotations => &Quotation::STORAGE_COLUMNS,
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supplies" | "supply" => Ok(TableKind::Supplies),
            "suppliers" | "supplier" => Ok(TableKind::Suppliers),
            "quotations" | "quotation" | "quotes" => Ok(TableKind::Quotations),
            _ => Err(format!(
                "Unknown table: '{}'. Supported: supplies, suppliers, quotations",
                s
            )),
        }
    }
}

/// Storage and schema errors
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("table '{table}' is missing required column '{column}'")]
    #[diagnostic(
        code(pqt::store::missing_column),
        help("column names are trimmed and matched case-insensitively; check the file's header row")
    )]
    MissingColumn {
        table: TableKind,
        column: &'static str,
    },

    #[error("table '{table}' row {row}: invalid value '{value}' in column '{column}'")]
    #[diagnostic(code(pqt::store::invalid_value))]
    InvalidValue {
        table: TableKind,
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("{path}: no worksheet found")]
    #[diagnostic(code(pqt::store::empty_sheet))]
    EmptySheet { path: PathBuf },

    #[error("failed to read workbook {path}: {message}")]
    #[diagnostic(code(pqt::store::workbook))]
    Workbook { path: PathBuf, message: String },

    #[error("CSV error in {path}: {message}")]
    #[diagnostic(code(pqt::store::csv))]
    Csv { path: PathBuf, message: String },

    #[error("IO error on {path}: {message}")]
    #[diagnostic(code(pqt::store::io))]
    Io { path: PathBuf, message: String },
}

/// The persistence collaborator for the three base tables
///
/// Backends are interchangeable; this crate ships the CSV-file backend.
pub trait TableStore {
    /// Read all rows of a table. A table that does not exist yet reads as
    /// empty (headers only).
    fn read_all(&self, table: TableKind) -> Result<RawTable, StoreError>;

    /// Append one row, creating the table file with headers if needed
    fn append(&self, table: TableKind, row: &[String]) -> Result<(), StoreError>;

    /// Replace the whole table
    fn replace(&self, table: TableKind, raw: &RawTable) -> Result<(), StoreError>;
}

/// CSV-file backend: one file per table under the project's `data/` dir
#[derive(Debug)]
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    /// Store for a project's `data/` directory
    pub fn new(project: &Project) -> Self {
        Self {
            data_dir: project.data_dir(),
        }
    }

    /// Store over an arbitrary directory (used by tests)
    pub fn open(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Path of a table's file
    pub fn table_path(&self, table: TableKind) -> PathBuf {
        self.data_dir.join(table.file_name())
    }

    /// Create any missing table files with header rows only
    pub fn ensure_files(&self) -> Result<(), StoreError> {
        for &table in TableKind::all() {
            let path = self.table_path(table);
            if !path.exists() {
                self.replace(table, &RawTable::with_headers(table.storage_columns()))?;
            }
        }
        Ok(())
    }

    fn io_err(path: &Path, e: impl std::fmt::Display) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    }
}

impl TableStore for CsvStore {
    fn read_all(&self, table: TableKind) -> Result<RawTable, StoreError> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(RawTable::with_headers(table.storage_columns()));
        }
        loader::read_csv_file(&path)
    }

    fn append(&self, table: TableKind, row: &[String]) -> Result<(), StoreError> {
        let path = self.table_path(table);
        let write_headers = !path.exists()
            || std::fs::metadata(&path)
                .map(|m| m.len() == 0)
                .unwrap_or(true);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Self::io_err(&path, e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Self::io_err(&path, e))?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_headers {
            wtr.write_record(table.storage_columns())
                .map_err(|e| Self::io_err(&path, e))?;
        }
        wtr.write_record(row).map_err(|e| Self::io_err(&path, e))?;
        wtr.flush().map_err(|e| Self::io_err(&path, e))?;
        Ok(())
    }

    fn replace(&self, table: TableKind, raw: &RawTable) -> Result<(), StoreError> {
        let path = self.table_path(table);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Self::io_err(&path, e))?;
        }

        let mut wtr = csv::Writer::from_path(&path).map_err(|e| Self::io_err(&path, e))?;
        wtr.write_record(&raw.headers)
            .map_err(|e| Self::io_err(&path, e))?;
        for row in &raw.rows {
            wtr.write_record(row).map_err(|e| Self::io_err(&path, e))?;
        }
        wtr.flush().map_err(|e| Self::io_err(&path, e))?;
        Ok(())
    }
}

/// The session context: all three base tables, loaded once per command
///
/// Every command loads this at the start and passes it down; derived views
/// are recomputed from it on demand and never persisted.
#[derive(Debug, Default)]
pub struct Tables {
    pub supplies: Vec<Supply>,
    pub suppliers: Vec<Supplier>,
    pub quotations: Vec<Quotation>,
}

impl Tables {
    /// Load all three tables from a store
    pub fn load(store: &dyn TableStore) -> Result<Self, StoreError> {
        Ok(Self {
            supplies: loader::parse_supplies(&store.read_all(TableKind::Supplies)?)?,
            suppliers: loader::parse_suppliers(&store.read_all(TableKind::Suppliers)?)?,
            quotations: loader::parse_quotations(&store.read_all(TableKind::Quotations)?)?,
        })
    }

    /// The denormalized quotation view (inner join over the three tables)
    pub fn joined(&self) -> Vec<crate::pipeline::QuoteRow> {
        crate::pipeline::join_quotations(&self.supplies, &self.suppliers, &self.quotations)
    }
}
