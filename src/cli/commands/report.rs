//! `pqt report` command - Aggregate reports and workbook export

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{format_money, load_tables, open_project};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::export::workbook::{
    best_prices_table, quotes_table, supplier_means_table, write_workbook, FILTERED_SHEET,
};
use crate::export::Mailer;
use crate::pipeline::{best_prices, filter_rows, price_history, supplier_means, Selection};

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Mean unit price per supplier
    Averages(AveragesArgs),

    /// Price evolution of one item across its suppliers
    History(HistoryArgs),

    /// Export filtered quotations, best prices, and averages to a workbook
    Export(ExportArgs),
}

#[derive(clap::Args, Debug)]
pub struct AveragesArgs {
    /// Only include these item names (repeatable)
    #[arg(long = "item", short = 'i')]
    pub items: Vec<String>,

    /// Only include these supplier names (repeatable)
    #[arg(long = "supplier", short = 'S')]
    pub suppliers: Vec<String>,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct HistoryArgs {
    /// Item name to chart
    pub item: String,

    /// Only include these supplier names (repeatable)
    #[arg(long = "supplier", short = 'S')]
    pub suppliers: Vec<String>,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Only include these item names (repeatable)
    #[arg(long = "item", short = 'i')]
    pub items: Vec<String>,

    /// Only include these supplier names (repeatable)
    #[arg(long = "supplier", short = 'S')]
    pub suppliers: Vec<String>,

    /// Workbook path to write
    #[arg(long, short = 'o', default_value = "quotation-report.xlsx")]
    pub output: PathBuf,

    /// E-mail the workbook to this recipient (default from config `mail_to`)
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub email: Option<String>,
}

/// Run a report subcommand
pub fn run(cmd: ReportCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ReportCommands::Averages(args) => run_averages(args, global),
        ReportCommands::History(args) => run_history(args, global),
        ReportCommands::Export(args) => run_export(args, global),
    }
}

fn run_averages(args: AveragesArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_store, tables) = load_tables(&project)?;

    let selection = Selection::from_flags(&args.items, &args.suppliers);
    let filtered = filter_rows(&tables.joined(), &selection);
    let means = supplier_means(&filtered);

    if means.is_empty() {
        println!("No quotations found.");
        return Ok(());
    }

    if matches!(global.format, OutputFormat::Json) {
        let json = serde_json::to_string_pretty(&means).into_diagnostic()?;
        println!("{}", json);
        return Ok(());
    }

    let mut output = String::new();
    output.push_str("# Mean Price per Supplier\n\n");

    let mut table = Builder::default();
    table.push_record(["Supplier", "Mean Price", "Quotations"]);
    for mean in &means {
        table.push_record([
            mean.supplier_name.clone(),
            format_money(mean.mean_price),
            mean.quote_count.to_string(),
        ]);
    }
    output.push_str(&table.build().with(Style::markdown()).to_string());
    output.push('\n');
    output.push_str(&format!(
        "\n*{} supplier(s) over {} filtered quotation(s)*\n",
        means.len(),
        filtered.len()
    ));

    write_output(&output, args.output)
}

fn run_history(args: HistoryArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_store, tables) = load_tables(&project)?;

    let selection = Selection::from_flags(&[], &args.suppliers);
    let filtered = filter_rows(&tables.joined(), &selection);
    let history = price_history(&filtered, &args.item);

    if history.is_empty() {
        println!("No dated quotations found for '{}'.", args.item);
        return Ok(());
    }

    if matches!(global.format, OutputFormat::Json) {
        let json = serde_json::to_string_pretty(&history).into_diagnostic()?;
        println!("{}", json);
        return Ok(());
    }

    let mut output = String::new();
    output.push_str(&format!("# Price History: {}\n", args.item));

    for series in &history {
        output.push_str(&format!("\n## {}\n\n", series.supplier_name));
        let mut table = Builder::default();
        table.push_record(["Date", "Unit Price"]);
        for point in &series.points {
            table.push_record([point.date.to_string(), format_money(point.unit_price)]);
        }
        output.push_str(&table.build().with(Style::markdown()).to_string());
        output.push('\n');
    }

    write_output(&output, args.output)
}

fn run_export(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_store, tables) = load_tables(&project)?;
    let config = Config::load();

    let selection = Selection::from_flags(&args.items, &args.suppliers);
    let filtered = filter_rows(&tables.joined(), &selection);
    let best = best_prices(&filtered);
    let means = supplier_means(&filtered);

    let sheets = vec![
        quotes_table(FILTERED_SHEET, &filtered),
        best_prices_table(&best),
        supplier_means_table(&means),
    ];
    let bytes = write_workbook(&sheets)?;

    std::fs::write(&args.output, &bytes).into_diagnostic()?;
    if !global.quiet {
        println!(
            "{} Workbook written to {} ({} quotation(s), {} item(s), {} supplier(s))",
            style("✓").green(),
            style(args.output.display()).cyan(),
            filtered.len(),
            best.len(),
            means.len()
        );
    }

    if let Some(recipient) = args.email {
        let recipient = if recipient.is_empty() {
            config.mail_to.clone().ok_or_else(|| {
                miette::miette!("No recipient given and no mail_to configured in .pqt/config.yaml")
            })?
        } else {
            recipient
        };

        send_workbook(
            &config,
            &recipient,
            "Quotation report",
            "Attached: filtered quotations, best prices, and supplier averages.",
            &args.output,
            bytes,
        )?;
        println!(
            "{} Report e-mailed to {}",
            style("✓").green(),
            style(&recipient).cyan()
        );
    }

    Ok(())
}

/// Send an already-written workbook as a mail attachment
///
/// The workbook stays on disk whatever happens here; a transport failure
/// surfaces as its own error, after the export already succeeded.
pub(crate) fn send_workbook(
    config: &Config,
    recipient: &str,
    subject: &str,
    body: &str,
    path: &std::path::Path,
    bytes: Vec<u8>,
) -> Result<()> {
    let mailer = Mailer::from_config(config)?;
    let attachment_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "report.xlsx".to_string());

    mailer
        .send(recipient, subject, body, &attachment_name, bytes)
        .map_err(|e| {
            miette::miette!(
                "Workbook was generated at {} but could not be mailed: {}",
                path.display(),
                e
            )
        })
}

// Shared helper

pub(crate) fn write_output(content: &str, output_path: Option<PathBuf>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
