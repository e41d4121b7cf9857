use std::path::PathBuf;

use contentcal_core::{validate_events, Config};

use super::{events_path, read_json, CliResult};

pub fn run(events: Option<PathBuf>, schema: Option<PathBuf>) -> CliResult {
    let config = Config::load_or_default();
    let path = events_path(events, &config)?;
    let data = read_json(&path)?;
    let schema = schema.as_deref().map(read_json).transpose()?;

    let problems = validate_events(&data, schema.as_ref());
    if problems.is_empty() {
        let n = data.as_array().map_or(0, Vec::len);
        println!("ok: {n} events");
        return Ok(());
    }
    for p in &problems {
        println!("- {}: {}", p.path, p.msg);
    }
    Err(format!("{} problem(s) in {}", problems.len(), path.display()).into())
}
