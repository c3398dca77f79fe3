//! `pqt init` command - Initialize a new PQT project

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::project::{Project, ProjectError};
use crate::core::CsvStore;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Force initialization even if .pqt/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    match project {
        Ok(project) => {
            let store = CsvStore::new(&project);
            store.ensure_files()?;

            println!(
                "{} Initialized PQT project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            println!("Created project structure:");
            println!("  .pqt/config.yaml     project configuration");
            println!("  data/supplies.csv    supply items");
            println!("  data/suppliers.csv   suppliers");
            println!("  data/quotations.csv  price quotations");
            println!();
            println!("Next steps:");
            println!(
                "  {} Register your first supply item",
                style("pqt supply new").yellow()
            );
            println!(
                "  {} Import an uploaded table",
                style("pqt import supplies supplies.csv").yellow()
            );
            println!(
                "  {} Compare prices once quotations exist",
                style("pqt quote best").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} PQT project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!("Use {} to reinitialize", style("pqt init --force").yellow());
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}
