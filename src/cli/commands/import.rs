//! `pqt import` command - Load an uploaded table file
//!
//! The whole file is parsed into typed records before the store is touched,
//! so a schema or cell error leaves the existing table unchanged.

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::open_project;
use crate::cli::GlobalOpts;
use crate::core::loader::{self, RawTable};
use crate::core::{CsvStore, TableKind, TableStore};

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Table to import into (supplies, suppliers, quotations)
    #[arg(value_parser = parse_table_kind)]
    pub table: TableKind,

    /// CSV or XLSX file to import
    pub file: PathBuf,

    /// Append the file's rows instead of replacing the table
    #[arg(long)]
    pub append: bool,

    /// Validate the file without writing
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_table_kind(s: &str) -> Result<TableKind, String> {
    s.parse()
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;

    let raw = loader::read_table_file(&args.file)?;

    // Full typed parse up front; the store stays untouched on any error.
    let rows: Vec<Vec<String>> = match args.table {
        TableKind::Supplies => loader::parse_supplies(&raw)?
            .iter()
            .map(|s| s.to_row())
            .collect(),
        TableKind::Suppliers => loader::parse_suppliers(&raw)?
            .iter()
            .map(|s| s.to_row())
            .collect(),
        TableKind::Quotations => loader::parse_quotations(&raw)?
            .iter()
            .map(|q| q.to_row())
            .collect(),
    };

    if args.dry_run {
        println!(
            "{} {} valid row(s) in {} (dry run, nothing written)",
            style("→").blue(),
            style(rows.len()).cyan(),
            args.file.display()
        );
        return Ok(());
    }

    let store = CsvStore::new(&project);
    if args.append {
        for row in &rows {
            store.append(args.table, row)?;
        }
    } else {
        let mut normalized = RawTable::with_headers(args.table.storage_columns());
        normalized.rows = rows.clone();
        store.replace(args.table, &normalized)?;
    }

    if !global.quiet {
        println!(
            "{} Imported {} row(s) into {} ({})",
            style("✓").green(),
            style(rows.len()).cyan(),
            style(args.table).yellow(),
            if args.append { "appended" } else { "replaced" }
        );
    }

    Ok(())
}
