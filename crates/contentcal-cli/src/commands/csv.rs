use std::path::PathBuf;

use clap::Args;
use contentcal_core::{merge_events, parse_csv, rows_to_events, validate_events};

use super::{load_events, warn_problems, CliResult};

#[derive(Args)]
pub struct CsvArgs {
    /// CSV file with a header row
    file: PathBuf,
    /// Existing events file to merge the import into
    #[arg(long)]
    merge: Option<PathBuf>,
    /// Write the resulting events JSON here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

pub fn run(args: CsvArgs) -> CliResult {
    let text = std::fs::read_to_string(&args.file)
        .map_err(|e| format!("cannot read {}: {e}", args.file.display()))?;
    let rows = parse_csv(&text)?;
    let (imported, problems) = rows_to_events(&rows);
    warn_problems(&problems);
    warn_problems(&validate_events(&serde_json::to_value(&imported)?, None));
    let count = imported.len();

    let events = match &args.merge {
        Some(path) => merge_events(load_events(path)?, imported),
        None => imported,
    };

    let json = serde_json::to_string_pretty(&events)?;
    match &args.out {
        Some(out) => {
            std::fs::write(out, json + "\n")?;
            eprintln!("imported {count} events, wrote {} to {}", events.len(), out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
