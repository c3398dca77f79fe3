//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs,
    import::ImportArgs,
    init::InitArgs,
    order::OrderArgs,
    quote::QuoteCommands,
    report::ReportCommands,
    sup::SupCommands,
    supply::SupplyCommands,
};

#[derive(Parser)]
#[command(name = "pqt")]
#[command(author, version, about = "Procurement Quote Toolkit")]
#[command(long_about = "A toolkit for maintaining procurement tables (supplies, suppliers, price quotations) as plain text files, with best-price reporting, order simulation, and workbook/email export.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .pqt/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new PQT project
    Init(InitArgs),

    /// Supply management (procured items)
    #[command(subcommand)]
    Supply(SupplyCommands),

    /// Supplier management (vendors)
    #[command(subcommand)]
    Sup(SupCommands),

    /// Quotation management (supplier prices)
    #[command(subcommand)]
    Quote(QuoteCommands),

    /// Import a table from an uploaded CSV or XLSX file
    Import(ImportArgs),

    /// Generate reports (averages, history, workbook export)
    #[command(subcommand)]
    Report(ReportCommands),

    /// Simulate an order for an (item, supplier) pair
    Order(OrderArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (tsv for lists)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}
