mod commands;
mod config;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// dynfields — select fields of nested JSON documents
#[derive(Debug, Parser)]
#[command(name = "dynfields", version, about)]
struct Cli {
    /// Output format. Auto-detected if not specified (human for terminal, json for pipe).
    #[arg(long, global = true)]
    format: Option<output::Format>,

    /// Config file (overrides $DYNFIELDS_CONFIG and ~/.config/dynfields/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path separator inside selector tokens (overrides the config file).
    #[arg(long, global = true)]
    path_separator: Option<String>,

    /// Log per-node resolution to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a JSON document with only the selected fields.
    Project(commands::project::ProjectCmd),
    /// Show declared and retained fields for every node.
    Explain(commands::explain::ExplainCmd),
    /// Print a compact command reference.
    Usage,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,dynfields=trace" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let format = output::resolve_format(cli.format);

    let config = config::resolve(cli.config.as_deref()).and_then(|mut config| {
        if let Some(sep) = cli.path_separator {
            config.path_separator = sep;
            config.validate()?;
        }
        Ok(config)
    });
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Project(cmd) => commands::project::run(cmd, &config, format),
        Command::Explain(cmd) => commands::explain::run(cmd, &config, format),
        Command::Usage => {
            commands::usage::run(&config);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
