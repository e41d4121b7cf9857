use std::path::PathBuf;

use contentcal_core::planner::STATE_KEY;
use contentcal_core::selfcheck::render;
use contentcal_core::{self_check, CheckInput, Config, Severity};

use super::{open_planner, print_status, read_json, today, CliResult};

/// Write a backup of the current document.
pub fn backup(if_missing: bool) -> CliResult {
    let config = Config::load_or_default();
    let mut planner = open_planner(&config)?;
    if if_missing {
        if !planner.ensure_backup()? {
            println!("backup already present");
            return Ok(());
        }
    } else {
        planner.backup()?;
    }
    print_status(&planner);
    Ok(())
}

pub fn reset(yes: bool) -> CliResult {
    if !yes {
        return Err("reset deletes every stored day; pass --yes to confirm".into());
    }
    let config = Config::load_or_default();
    let mut planner = open_planner(&config)?;
    planner.reset(today())?;
    print_status(&planner);
    Ok(())
}

/// Print diagnostics; fails when a critical finding is present.
pub fn selfcheck(events: Option<PathBuf>, schema: Option<PathBuf>) -> CliResult {
    let (config, config_error) = match Config::load() {
        Ok(c) => (c, None),
        Err(e) => (Config::default(), Some(e.to_string())),
    };
    let events_file = events.or_else(|| config.events.path.as_ref().map(PathBuf::from));
    let events = events_file.as_deref().map(read_json).transpose()?;
    let schema = schema.as_deref().map(read_json).transpose()?;

    let mut planner = open_planner(&config)?;
    let durable_storage = planner.storage_report().durable;
    let stored = planner.store().get(STATE_KEY);

    let findings = self_check(&CheckInput {
        config_error,
        durable_storage,
        stored_state: stored.as_deref(),
        events: events.as_ref(),
        schema: schema.as_ref(),
        theme: planner.state().theme,
        palette: planner.state().palette,
    });
    println!("{}", render(&findings));

    if findings.iter().any(|f| f.severity == Severity::Crit) {
        return Err("self-check found critical problems".into());
    }
    Ok(())
}
