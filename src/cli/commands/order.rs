//! `pqt order` command - Order simulation with optional confirmation export

use chrono::Local;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::commands::report::send_workbook;
use crate::cli::helpers::{format_money, load_tables, open_project};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::export::workbook::{order_confirmation_table, write_workbook};
use crate::pipeline::{simulate_order, OrderError, OrderQuote};

#[derive(clap::Args, Debug)]
pub struct OrderArgs {
    /// Item name to order
    pub item: String,

    /// Supplier name to order from
    pub supplier: String,

    /// Desired quantity
    pub quantity: u32,

    /// Write an order-confirmation workbook (timestamped filename)
    #[arg(long, short = 'e')]
    pub export: bool,

    /// E-mail the confirmation to this recipient (default from config `mail_to`)
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub email: Option<String>,
}

pub fn run(args: OrderArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_store, tables) = load_tables(&project)?;

    let order = match simulate_order(&tables.joined(), &args.item, &args.supplier, args.quantity)
    {
        Ok(order) => order,
        Err(OrderError::NoMatchingQuotation { item, supplier }) => {
            println!(
                "{} No quotation found for item '{}' from supplier '{}'.",
                style("!").yellow(),
                style(&item).yellow(),
                style(&supplier).yellow()
            );
            println!(
                "   Check current prices with: {}",
                style("pqt quote best").cyan()
            );
            return Ok(());
        }
    };

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&order).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&order).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => {
            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {} from {}",
                style("Order").bold(),
                style(&order.supply_name).yellow(),
                style(&order.supplier_name).yellow()
            );
            println!(
                "{}: {}",
                style("Unit price").bold(),
                format_money(order.unit_price)
            );
            println!("{}: {}", style("Quantity").bold(), order.quantity);
            println!(
                "{}: {}",
                style("Total").bold(),
                style(format_money(order.total)).green()
            );
            println!("{}", style("─".repeat(60)).dim());
        }
    }

    if args.export || args.email.is_some() {
        let path = write_confirmation(&order, args.email.as_deref())?;
        if !global.quiet {
            println!(
                "{} Order confirmation written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    Ok(())
}

/// Write the confirmation workbook and optionally mail it
fn write_confirmation(order: &OrderQuote, email: Option<&str>) -> Result<PathBuf> {
    let config = Config::load();

    let bytes = write_workbook(&[order_confirmation_table(order)])?;
    let path = PathBuf::from(format!(
        "order-confirmation-{}.xlsx",
        Local::now().format("%Y%m%d-%H%M%S")
    ));
    std::fs::write(&path, &bytes).into_diagnostic()?;

    if let Some(recipient) = email {
        let recipient = if recipient.is_empty() {
            config.mail_to.clone().ok_or_else(|| {
                miette::miette!("No recipient given and no mail_to configured in .pqt/config.yaml")
            })?
        } else {
            recipient.to_string()
        };

        let subject = format!(
            "Order confirmation: {} x {} from {}",
            order.quantity, order.supply_name, order.supplier_name
        );
        let body = format!(
            "Order for {} {} at {} each, total {}.",
            order.quantity,
            order.supply_name,
            format_money(order.unit_price),
            format_money(order.total)
        );
        send_workbook(&config, &recipient, &subject, &body, &path, bytes)?;
        println!(
            "{} Confirmation e-mailed to {}",
            style("✓").green(),
            style(&recipient).cyan()
        );
    }

    Ok(path)
}
