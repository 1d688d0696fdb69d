pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use storefront_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    about = "Storefront customer exchange CLI",
    long_about = "Import and export storefront customers as JSON, inspect configuration, and check readiness of the customer API.",
    after_help = "Examples:\n  storefront import customers.json\n  storefront export --output-dir exports\n  storefront doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Import customers from a local JSON file and report per-record results")]
    Import {
        #[arg(help = "Path to a .json file holding an array of customers")]
        path: PathBuf,
    },
    #[command(about = "Export every customer to a timestamped JSON file")]
    Export {
        #[arg(long, default_value = ".", help = "Directory the export file is written to")]
        output_dir: PathBuf,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and customer API reachability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Import { path } => commands::import::run(&path),
        Command::Export { output_dir } => commands::export::run(&output_dir),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only the command result.
/// Config errors are reported by the commands themselves, so defaults are used here.
fn init_logging() {
    let config = AppConfig::load(LoadOptions::default()).unwrap_or_default();
    let log_level = config.logging.level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
