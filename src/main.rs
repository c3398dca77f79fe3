use clap::Parser;
use miette::Result;
use pqt::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    // This is standard practice for CLI tools that output to stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => pqt::cli::commands::init::run(args),
        Commands::Supply(cmd) => pqt::cli::commands::supply::run(cmd, &global),
        Commands::Sup(cmd) => pqt::cli::commands::sup::run(cmd, &global),
        Commands::Quote(cmd) => pqt::cli::commands::quote::run(cmd, &global),
        Commands::Import(args) => pqt::cli::commands::import::run(args, &global),
        Commands::Report(cmd) => pqt::cli::commands::report::run(cmd, &global),
        Commands::Order(args) => pqt::cli::commands::order::run(args, &global),
        Commands::Completions(args) => pqt::cli::commands::completions::run(args),
    }
}
