use contentcal_core::Config;

use super::{open_planner, print_status, CliResult};

pub fn undo() -> CliResult {
    let config = Config::load_or_default();
    let mut planner = open_planner(&config)?;
    planner.undo()?;
    print_status(&planner);
    Ok(())
}

pub fn redo() -> CliResult {
    let config = Config::load_or_default();
    let mut planner = open_planner(&config)?;
    planner.redo()?;
    print_status(&planner);
    Ok(())
}

/// Print undo/redo depth as JSON.
pub fn show() -> CliResult {
    let config = Config::load_or_default();
    let planner = open_planner(&config)?;
    let history = planner.history();
    let out = serde_json::json!({
        "undo_steps": history.undo_len(),
        "redo_steps": history.redo_len(),
        "can_undo": history.can_undo(),
        "can_redo": history.can_redo(),
        "limit": history.limit(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
