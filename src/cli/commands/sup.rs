//! `pqt sup` command - Supplier management

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{escape_csv, load_tables, open_project, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{TableKind, TablePrefix, TableStore};
use crate::entities::Supplier;

#[derive(Subcommand, Debug)]
pub enum SupCommands {
    /// List suppliers
    List(ListArgs),

    /// Register a new supplier
    New(NewArgs),

    /// Show a supplier's details
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search by substring over id, name, tax id, and contact
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

    /// Supplier name
    #[arg(long, short = 'N')]
    pub name: Option<String>,

    /// Tax identification number
    #[arg(long, short = 't')]
    pub tax_id: Option<String>,

    /// Contact (e-mail or phone)
    #[arg(long, short = 'c')]
    pub contact: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Supplier id (or unique name substring)
    pub id: String,
}

/// Run a supplier subcommand
pub fn run(cmd: SupCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SupCommands::List(args) => run_list(args, global),
        SupCommands::New(args) => run_new(args, global),
        SupCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_store, tables) = load_tables(&project)?;

    let mut suppliers: Vec<&Supplier> = tables
        .suppliers
        .iter()
        .filter(|s| {
            args.search.as_ref().is_none_or(|term| {
                let term = term.to_lowercase();
                s.id.to_lowercase().contains(&term)
                    || s.name.to_lowercase().contains(&term)
                    || s.tax_id.to_lowercase().contains(&term)
                    || s.contact.to_lowercase().contains(&term)
            })
        })
        .collect();

    if let Some(limit) = args.limit {
        suppliers.truncate(limit);
    }

    if args.count {
        println!("{}", suppliers.len());
        return Ok(());
    }

    if suppliers.is_empty() {
        println!("No suppliers found.");
        return Ok(());
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&suppliers).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&suppliers).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("id,name,tax_id,contact");
            for supplier in &suppliers {
                println!(
                    "{},{},{},{}",
                    escape_csv(&supplier.id),
                    escape_csv(&supplier.name),
                    escape_csv(&supplier.tax_id),
                    escape_csv(&supplier.contact)
                );
            }
        }
        OutputFormat::Md => {
            println!("| ID | Name | Tax ID | Contact |");
            println!("|---|---|---|---|");
            for supplier in &suppliers {
                println!(
                    "| {} | {} | {} | {} |",
                    supplier.id, supplier.name, supplier.tax_id, supplier.contact
                );
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "{:<18} {:<24} {:<16} {:<20}",
                style("ID").bold(),
                style("NAME").bold(),
                style("TAX ID").bold(),
                style("CONTACT").bold()
            );
            println!("{}", "-".repeat(80));
            for supplier in &suppliers {
                println!(
                    "{:<18} {:<24} {:<16} {:<20}",
                    truncate_str(&supplier.id, 16),
                    truncate_str(&supplier.name, 22),
                    truncate_str(&supplier.tax_id, 14),
                    truncate_str(&supplier.contact, 18)
                );
            }
            println!();
            println!(
                "{} supplier(s) found.",
                style(suppliers.len()).cyan()
            );
        }
    }

    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;

    let (name, tax_id, contact) = if args.interactive {
        let theme = ColorfulTheme::default();
        let name: String = Input::with_theme(&theme)
            .with_prompt("Supplier name")
            .interact_text()
            .into_diagnostic()?;
        let tax_id: String = Input::with_theme(&theme)
            .with_prompt("Tax id")
            .interact_text()
            .into_diagnostic()?;
        let contact: String = Input::with_theme(&theme)
            .with_prompt("Contact (e-mail or phone)")
            .interact_text()
            .into_diagnostic()?;
        (name, tax_id, contact)
    } else {
        let name = args
            .name
            .ok_or_else(|| miette::miette!("Supplier name is required (use --name or -N)"))?;
        let tax_id = args
            .tax_id
            .ok_or_else(|| miette::miette!("Tax id is required (use --tax-id or -t)"))?;
        let contact = args
            .contact
            .ok_or_else(|| miette::miette!("Contact is required (use --contact or -c)"))?;
        (name, tax_id, contact)
    };

    if name.trim().is_empty() || tax_id.trim().is_empty() || contact.trim().is_empty() {
        return Err(miette::miette!(
            "Supplier name, tax id, and contact must not be empty"
        ));
    }

    let supplier = Supplier {
        id: args.id.unwrap_or_else(|| TablePrefix::Sup.generate()),
        name: name.trim().to_string(),
        tax_id: tax_id.trim().to_string(),
        contact: contact.trim().to_string(),
    };

    let (store, _tables) = load_tables(&project)?;
    store.append(TableKind::Suppliers, &supplier.to_row())?;

    println!(
        "{} Registered supplier {}",
        style("✓").green(),
        style(&supplier.id).cyan()
    );
    println!(
        "   {} | {} | {}",
        style(&supplier.name).yellow(),
        supplier.tax_id,
        style(&supplier.contact).dim()
    );

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_store, tables) = load_tables(&project)?;

    let supplier = tables
        .suppliers
        .iter()
        .find(|s| s.id == args.id)
        .or_else(|| {
            tables
                .suppliers
                .iter()
                .find(|s| s.name.to_lowercase().contains(&args.id.to_lowercase()))
        })
        .ok_or_else(|| miette::miette!("No supplier found matching '{}'", args.id))?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(supplier).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(supplier).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => {
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("ID").bold(), style(&supplier.id).cyan());
            println!(
                "{}: {}",
                style("Name").bold(),
                style(&supplier.name).yellow()
            );
            println!("{}: {}", style("Tax ID").bold(), supplier.tax_id);
            println!("{}: {}", style("Contact").bold(), supplier.contact);
            println!("{}", style("─".repeat(60)).dim());
        }
    }

    Ok(())
}
