//! `pqt quote` command - Quotation management and best-price comparison

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{escape_csv, format_money, load_tables, open_project, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{TableKind, TablePrefix, TableStore};
use crate::entities::Quotation;
use crate::pipeline::{best_prices, filter_rows, QuoteRow, Selection};

#[derive(Subcommand, Debug)]
pub enum QuoteCommands {
    /// List quotations (joined with item and supplier names)
    List(ListArgs),

    /// Register a new quotation
    New(NewArgs),

    /// Show a quotation's details
    Show(ShowArgs),

    /// Best price per item across the filtered quotations
    Best(BestArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only include these item names (repeatable)
    #[arg(long = "item", short = 'i')]
    pub items: Vec<String>,

    /// Only include these supplier names (repeatable)
    #[arg(long = "supplier", short = 'S')]
    pub suppliers: Vec<String>,

    /// Search in item and supplier names
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Record id (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Supply id this quotation is for - REQUIRED
    #[arg(long, short = 'y')]
    pub supply: Option<String>,

    /// Supplier id offering the price - REQUIRED
    #[arg(long, short = 'S')]
    pub supplier: Option<String>,

    /// Offered unit price
    #[arg(long, short = 'p', allow_negative_numbers = true)]
    pub price: Option<f64>,

    /// Lead time in days
    #[arg(long, short = 'l')]
    pub lead_time: Option<u32>,

    /// Validity in days
    #[arg(long)]
    pub validity: Option<u32>,

    /// Quotation date (YYYY-MM-DD)
    #[arg(long, short = 'd')]
    pub date: Option<NaiveDate>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Quotation id
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct BestArgs {
    /// Only include these item names (repeatable)
    #[arg(long = "item", short = 'i')]
    pub items: Vec<String>,

    /// Only include these supplier names (repeatable)
    #[arg(long = "supplier", short = 'S')]
    pub suppliers: Vec<String>,
}

/// Run a quotation subcommand
pub fn run(cmd: QuoteCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        QuoteCommands::List(args) => run_list(args, global),
        QuoteCommands::New(args) => run_new(args, global),
        QuoteCommands::Show(args) => run_show(args, global),
        QuoteCommands::Best(args) => run_best(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_store, tables) = load_tables(&project)?;

    let selection = Selection::from_flags(&args.items, &args.suppliers);
    let mut rows = filter_rows(&tables.joined(), &selection);

    if let Some(ref term) = args.search {
        let term = term.to_lowercase();
        rows.retain(|r| {
            r.supply_name.to_lowercase().contains(&term)
                || r.supplier_name.to_lowercase().contains(&term)
        });
    }

    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    if args.count {
        println!("{}", rows.len());
        return Ok(());
    }

    if rows.is_empty() {
        println!("No quotations found.");
        return Ok(());
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };
    output_rows(&rows, format)
}

fn output_rows(rows: &[QuoteRow], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(rows).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&rows).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("id,item,supplier,unit_price,lead_time_days,validity_days,date,notes");
            for row in rows {
                println!(
                    "{},{},{},{},{},{},{},{}",
                    escape_csv(&row.quotation_id),
                    escape_csv(&row.supply_name),
                    escape_csv(&row.supplier_name),
                    format_money(row.unit_price),
                    row.lead_time_days.map_or(String::new(), |d| d.to_string()),
                    row.validity_days.map_or(String::new(), |d| d.to_string()),
                    row.date.map_or(String::new(), |d| d.to_string()),
                    escape_csv(row.notes.as_deref().unwrap_or(""))
                );
            }
        }
        OutputFormat::Md => {
            println!("| ID | Item | Supplier | Price | Lead | Date |");
            println!("|---|---|---|---|---|---|");
            for row in rows {
                println!(
                    "| {} | {} | {} | {} | {} | {} |",
                    row.quotation_id,
                    row.supply_name,
                    row.supplier_name,
                    format_money(row.unit_price),
                    row.lead_time_days
                        .map_or("-".to_string(), |d| format!("{}d", d)),
                    row.date.map_or("-".to_string(), |d| d.to_string())
                );
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "{:<18} {:<20} {:<18} {:<10} {:<8} {:<12}",
                style("ID").bold(),
                style("ITEM").bold(),
                style("SUPPLIER").bold(),
                style("PRICE").bold(),
                style("LEAD").bold(),
                style("DATE").bold()
            );
            println!("{}", "-".repeat(90));
            for row in rows {
                println!(
                    "{:<18} {:<20} {:<18} {:<10} {:<8} {:<12}",
                    truncate_str(&row.quotation_id, 16),
                    truncate_str(&row.supply_name, 18),
                    truncate_str(&row.supplier_name, 16),
                    format_money(row.unit_price),
                    row.lead_time_days
                        .map_or("-".to_string(), |d| format!("{}d", d)),
                    row.date.map_or("-".to_string(), |d| d.to_string())
                );
            }
            println!();
            println!("{} quotation(s) found.", style(rows.len()).cyan());
        }
    }
    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (store, tables) = load_tables(&project)?;

    let (supply_id, supplier_id, price, date) = if args.interactive {
        let theme = ColorfulTheme::default();
        let supply_id: String = Input::with_theme(&theme)
            .with_prompt("Supply id")
            .interact_text()
            .into_diagnostic()?;
        let supplier_id: String = Input::with_theme(&theme)
            .with_prompt("Supplier id")
            .interact_text()
            .into_diagnostic()?;
        let price: f64 = Input::with_theme(&theme)
            .with_prompt("Unit price")
            .interact_text()
            .into_diagnostic()?;
        let date: String = Input::with_theme(&theme)
            .with_prompt("Quotation date (YYYY-MM-DD, empty for none)")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        let date = if date.trim().is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                    .map_err(|_| miette::miette!("Invalid date '{}'", date.trim()))?,
            )
        };
        (supply_id, supplier_id, price, date)
    } else {
        let supply_id = args
            .supply
            .ok_or_else(|| miette::miette!("Supply id is required (use --supply or -y)"))?;
        let supplier_id = args
            .supplier
            .ok_or_else(|| miette::miette!("Supplier id is required (use --supplier or -S)"))?;
        let price = args
            .price
            .ok_or_else(|| miette::miette!("Unit price is required (use --price or -p)"))?;
        (supply_id, supplier_id, price, args.date)
    };

    if price < 0.0 {
        return Err(miette::miette!("Unit price must be non-negative"));
    }

    // Quotations with unknown references survive registration but drop out
    // of the joined view; warn like for any dangling reference.
    if !tables.supplies.iter().any(|s| s.id == supply_id) {
        println!(
            "{} Warning: Supply '{}' not found. Register it first with: pqt supply new",
            style("!").yellow(),
            supply_id
        );
    }
    if !tables.suppliers.iter().any(|s| s.id == supplier_id) {
        println!(
            "{} Warning: Supplier '{}' not found. Register it first with: pqt sup new",
            style("!").yellow(),
            supplier_id
        );
    }

    let quotation = Quotation {
        id: args.id.unwrap_or_else(|| TablePrefix::Quo.generate()),
        supply_id,
        supplier_id,
        unit_price: price,
        lead_time_days: args.lead_time,
        validity_days: args.validity,
        date,
        notes: args.notes,
    };

    store.append(TableKind::Quotations, &quotation.to_row())?;

    println!(
        "{} Registered quotation {}",
        style("✓").green(),
        style(&quotation.id).cyan()
    );
    println!(
        "   Supply: {} | Supplier: {} | Price: {}",
        style(&quotation.supply_id).dim(),
        style(&quotation.supplier_id).dim(),
        style(format_money(quotation.unit_price)).green()
    );

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_store, tables) = load_tables(&project)?;

    let quotation = tables
        .quotations
        .iter()
        .find(|q| q.id == args.id)
        .ok_or_else(|| miette::miette!("No quotation found matching '{}'", args.id))?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(quotation).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(quotation).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => {
            let supply_name = tables
                .supplies
                .iter()
                .find(|s| s.id == quotation.supply_id)
                .map(|s| s.name.as_str())
                .unwrap_or("(unknown)");
            let supplier_name = tables
                .suppliers
                .iter()
                .find(|s| s.id == quotation.supplier_id)
                .map(|s| s.name.as_str())
                .unwrap_or("(unknown)");

            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("ID").bold(), style(&quotation.id).cyan());
            println!(
                "{}: {} ({})",
                style("Supply").bold(),
                style(supply_name).yellow(),
                style(&quotation.supply_id).dim()
            );
            println!(
                "{}: {} ({})",
                style("Supplier").bold(),
                style(supplier_name).yellow(),
                style(&quotation.supplier_id).dim()
            );
            println!(
                "{}: {}",
                style("Unit price").bold(),
                style(format_money(quotation.unit_price)).green()
            );
            if let Some(lead) = quotation.lead_time_days {
                println!("{}: {} days", style("Lead time").bold(), lead);
            }
            if let Some(validity) = quotation.validity_days {
                println!("{}: {} days", style("Valid for").bold(), validity);
            }
            if let Some(date) = quotation.date {
                println!("{}: {}", style("Date").bold(), date);
            }
            if let Some(ref notes) = quotation.notes {
                println!("{}: {}", style("Notes").bold(), notes);
            }
            println!("{}", style("─".repeat(60)).dim());
        }
    }

    Ok(())
}

fn run_best(args: BestArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_store, tables) = load_tables(&project)?;

    let selection = Selection::from_flags(&args.items, &args.suppliers);
    let filtered = filter_rows(&tables.joined(), &selection);
    let best = best_prices(&filtered);

    if best.is_empty() {
        println!("No quotations found.");
        return Ok(());
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&best).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&best).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("supply_id,item,unit,supplier,unit_price,quotation_id");
            for row in &best {
                println!(
                    "{},{},{},{},{},{}",
                    escape_csv(&row.supply_id),
                    escape_csv(&row.supply_name),
                    escape_csv(&row.unit),
                    escape_csv(&row.supplier_name),
                    format_money(row.unit_price),
                    escape_csv(&row.quotation_id)
                );
            }
        }
        OutputFormat::Md => {
            println!("| Item | Unit | Supplier | Best Price | Quote |");
            println!("|---|---|---|---|---|");
            for row in &best {
                println!(
                    "| {} | {} | {} | {} | {} |",
                    row.supply_name,
                    row.unit,
                    row.supplier_name,
                    format_money(row.unit_price),
                    row.quotation_id
                );
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "Comparing {} quotation(s) across {} item(s)",
                style(filtered.len()).cyan(),
                style(best.len()).cyan()
            );
            println!();
            println!(
                "{:<20} {:<8} {:<18} {:<12} {:<18}",
                style("ITEM").bold(),
                style("UNIT").bold(),
                style("SUPPLIER").bold(),
                style("PRICE").bold(),
                style("QUOTE").bold()
            );
            println!("{}", "-".repeat(78));
            for row in &best {
                println!(
                    "{:<20} {:<8} {:<18} {:<12} {:<18}",
                    truncate_str(&row.supply_name, 18),
                    truncate_str(&row.unit, 6),
                    truncate_str(&row.supplier_name, 16),
                    style(format_money(row.unit_price)).green(),
                    truncate_str(&row.quotation_id, 16)
                );
            }
            println!();
            println!(
                "{} Lowest price per item; order with {}",
                style("★").yellow(),
                style("pqt order <ITEM> <SUPPLIER> <QTY>").cyan()
            );
        }
    }

    Ok(())
}
