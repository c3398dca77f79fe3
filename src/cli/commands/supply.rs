//! `pqt supply` command - Supply item management

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{escape_csv, load_tables, open_project, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{TableKind, TablePrefix, TableStore};
use crate::entities::Supply;

#[derive(Subcommand, Debug)]
pub enum SupplyCommands {
    /// List supply items
    List(ListArgs),

    /// Register a new supply item
    New(NewArgs),

    /// Show a supply item's details
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search by substring over id, name, and unit
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

    /// Item name
    #[arg(long, short = 'N')]
    pub name: Option<String>,

    /// Unit of measure (e.g. "kg", "bag")
    #[arg(long, short = 'u')]
    pub unit: Option<String>,

    /// Quantity on hand
    #[arg(long, short = 'Q')]
    pub quantity: Option<f64>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Supply id (or unique name substring)
    pub id: String,
}

/// Run a supply subcommand
pub fn run(cmd: SupplyCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SupplyCommands::List(args) => run_list(args, global),
        SupplyCommands::New(args) => run_new(args, global),
        SupplyCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_store, tables) = load_tables(&project)?;

    let mut supplies: Vec<&Supply> = tables
        .supplies
        .iter()
        .filter(|s| {
            args.search.as_ref().is_none_or(|term| {
                let term = term.to_lowercase();
                s.id.to_lowercase().contains(&term)
                    || s.name.to_lowercase().contains(&term)
                    || s.unit.to_lowercase().contains(&term)
            })
        })
        .collect();

    if let Some(limit) = args.limit {
        supplies.truncate(limit);
    }

    if args.count {
        println!("{}", supplies.len());
        return Ok(());
    }

    if supplies.is_empty() {
        println!("No supplies found.");
        return Ok(());
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&supplies).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&supplies).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("id,name,unit,quantity");
            for supply in &supplies {
                println!(
                    "{},{},{},{}",
                    escape_csv(&supply.id),
                    escape_csv(&supply.name),
                    escape_csv(&supply.unit),
                    supply.quantity
                );
            }
        }
        OutputFormat::Md => {
            println!("| ID | Name | Unit | Quantity |");
            println!("|---|---|---|---|");
            for supply in &supplies {
                println!(
                    "| {} | {} | {} | {} |",
                    supply.id, supply.name, supply.unit, supply.quantity
                );
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "{:<18} {:<24} {:<8} {:<10}",
                style("ID").bold(),
                style("NAME").bold(),
                style("UNIT").bold(),
                style("QTY").bold()
            );
            println!("{}", "-".repeat(64));
            for supply in &supplies {
                println!(
                    "{:<18} {:<24} {:<8} {:<10}",
                    truncate_str(&supply.id, 16),
                    truncate_str(&supply.name, 22),
                    truncate_str(&supply.unit, 6),
                    supply.quantity
                );
            }
            println!();
            println!("{} suppl{} found.", style(supplies.len()).cyan(), if supplies.len() == 1 { "y" } else { "ies" });
        }
    }

    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;

    let (name, unit, quantity) = if args.interactive {
        let theme = ColorfulTheme::default();
        let name: String = Input::with_theme(&theme)
            .with_prompt("Item name")
            .interact_text()
            .into_diagnostic()?;
        let unit: String = Input::with_theme(&theme)
            .with_prompt("Unit of measure")
            .interact_text()
            .into_diagnostic()?;
        let quantity: f64 = Input::with_theme(&theme)
            .with_prompt("Quantity on hand")
            .default(0.0)
            .interact_text()
            .into_diagnostic()?;
        (name, unit, quantity)
    } else {
        let name = args
            .name
            .ok_or_else(|| miette::miette!("Item name is required (use --name or -N)"))?;
        let unit = args
            .unit
            .ok_or_else(|| miette::miette!("Unit is required (use --unit or -u)"))?;
        (name, unit, args.quantity.unwrap_or(0.0))
    };

    if name.trim().is_empty() || unit.trim().is_empty() {
        return Err(miette::miette!("Item name and unit must not be empty"));
    }

    let supply = Supply {
        id: args.id.unwrap_or_else(|| TablePrefix::Spl.generate()),
        name: name.trim().to_string(),
        unit: unit.trim().to_string(),
        quantity,
    };

    let (store, _tables) = load_tables(&project)?;
    store.append(TableKind::Supplies, &supply.to_row())?;

    println!(
        "{} Registered supply {}",
        style("✓").green(),
        style(&supply.id).cyan()
    );
    println!(
        "   {} | {} {}",
        style(&supply.name).yellow(),
        supply.quantity,
        style(&supply.unit).dim()
    );

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_store, tables) = load_tables(&project)?;

    let supply = tables
        .supplies
        .iter()
        .find(|s| s.id == args.id)
        .or_else(|| {
            tables
                .supplies
                .iter()
                .find(|s| s.name.to_lowercase().contains(&args.id.to_lowercase()))
        })
        .ok_or_else(|| miette::miette!("No supply found matching '{}'", args.id))?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(supply).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(supply).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => {
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("ID").bold(), style(&supply.id).cyan());
            println!("{}: {}", style("Name").bold(), style(&supply.name).yellow());
            println!("{}: {}", style("Unit").bold(), supply.unit);
            println!("{}: {}", style("Quantity").bold(), supply.quantity);
            println!("{}", style("─".repeat(60)).dim());
        }
    }

    Ok(())
}
