use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "contentcal", version, about = "Content planning calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand events into a month view
    Month(commands::month::MonthArgs),
    /// Check an events file
    Validate {
        /// Events file (defaults to events.path from config)
        events: Option<PathBuf>,
        /// JSON schema listing required fields
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// Convert a CSV export into events JSON
    Csv(commands::csv::CsvArgs),
    /// Edit day content
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Undo the last change
    Undo,
    /// Redo the last undone change
    Redo,
    /// Show undo/redo depth
    History,
    /// Reports and exports
    Report {
        #[command(subcommand)]
        action: commands::report::ReportAction,
    },
    /// Theme, palette and contrast tools
    Theme {
        #[command(subcommand)]
        action: commands::theme::ThemeAction,
    },
    /// Write a backup of the stored document
    Backup {
        /// Only write one if none exists
        #[arg(long)]
        if_missing: bool,
    },
    /// Delete all stored data
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Run diagnostics
    Selfcheck {
        #[arg(long)]
        events: Option<PathBuf>,
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Month(args) => commands::month::run(args),
        Commands::Validate { events, schema } => commands::validate::run(events, schema),
        Commands::Csv(args) => commands::csv::run(args),
        Commands::Day { action } => commands::day::run(action),
        Commands::Undo => commands::history::undo(),
        Commands::Redo => commands::history::redo(),
        Commands::History => commands::history::show(),
        Commands::Report { action } => commands::report::run(action),
        Commands::Theme { action } => commands::theme::run(action),
        Commands::Backup { if_missing } => commands::maintenance::backup(if_missing),
        Commands::Reset { yes } => commands::maintenance::reset(yes),
        Commands::Selfcheck { events, schema } => commands::maintenance::selfcheck(events, schema),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
