//! Self-check diagnostics with repair hints.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::calendar::CalendarState;
use crate::theme::{adjust_for_aa, contrast_ratio, hex_to_rgb, rgb_to_hex, Palette, Theme, AA_RATIO};
use crate::validate::validate_events;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Minor,
    Major,
    Crit,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Minor => "MINOR",
            Self::Major => "MAJOR",
            Self::Crit => "CRIT",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

impl Finding {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            fix: None,
        }
    }

    fn fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)?;
        if let Some(fix) = &self.fix {
            write!(f, " | Fix: {fix}")?;
        }
        Ok(())
    }
}

/// What the check looks at. Everything is optional except the display
/// settings.
#[derive(Debug, Clone, Default)]
pub struct CheckInput<'a> {
    /// Error from loading the config file, `None` when it loaded.
    pub config_error: Option<String>,
    /// Result of a durable storage probe.
    pub durable_storage: bool,
    /// Raw stored document, if any.
    pub stored_state: Option<&'a str>,
    /// Parsed events file, if one was given.
    pub events: Option<&'a Value>,
    pub schema: Option<&'a Value>,
    pub theme: Theme,
    pub palette: Palette,
}

/// Run every check. Findings come back most severe first.
pub fn self_check(input: &CheckInput<'_>) -> Vec<Finding> {
    let mut out = Vec::new();

    match &input.config_error {
        None => out.push(Finding::new(Severity::Info, "settings loaded")),
        Some(e) => out.push(
            Finding::new(Severity::Crit, format!("settings could not be loaded: {e}"))
                .fix("fix the syntax of config.toml or run `contentcal config reset`"),
        ),
    }

    if !input.durable_storage {
        out.push(
            Finding::new(
                Severity::Major,
                "durable storage unavailable, changes live in memory only",
            )
            .fix("check that the data directory exists and is writable"),
        );
    }

    if let Some(raw) = input.stored_state {
        match serde_json::from_str::<CalendarState>(raw) {
            Ok(state) => {
                let dups = state.duplicates();
                if !dups.is_empty() {
                    out.push(
                        Finding::new(
                            Severity::Minor,
                            format!("{} duplicate title(s) in the calendar", dups.len()),
                        )
                        .fix("see `contentcal report dupes` and rename or merge entries"),
                    );
                }
            }
            Err(e) => out.push(
                Finding::new(Severity::Crit, format!("stored calendar is unreadable: {e}"))
                    .fix("restore a backup or run `contentcal reset`"),
            ),
        }
    }

    if let Some(events) = input.events {
        for p in validate_events(events, input.schema) {
            out.push(
                Finding::new(Severity::Major, format!("events {}: {}", p.path, p.msg))
                    .fix("correct the events file"),
            );
        }
    }

    let c = input.theme.colors();
    let pairs = [
        ("text vs background", c.fg, c.bg),
        ("text vs card", c.fg, c.card),
        ("accent vs background", c.accent, c.bg),
        ("ok vs background", c.ok, c.bg),
        ("warn vs background", c.warn, c.bg),
        ("danger vs background", c.danger, c.bg),
    ];
    for (label, fg, bg) in pairs {
        let label = format!("{} theme, {label}", input.theme);
        out.extend(check_contrast(&label, fg, bg, Severity::Major));
    }

    let p = input.palette;
    let label = format!("{p} palette, button text");
    out.extend(check_contrast(&label, p.on_primary(), p.primary(), Severity::Minor));

    out.sort_by(|a, b| b.severity.cmp(&a.severity));
    out
}

/// A finding when `fg` on `bg` is below AA, suggesting an adjusted `fg`.
fn check_contrast(label: &str, fg: &str, bg: &str, severity: Severity) -> Option<Finding> {
    let (Some(f), Some(b)) = (hex_to_rgb(fg), hex_to_rgb(bg)) else {
        return Some(
            Finding::new(Severity::Minor, format!("unparsable colour in {label}"))
                .fix("use #rrggbb colours"),
        );
    };
    let ratio = contrast_ratio(f, b);
    if ratio >= AA_RATIO {
        return None;
    }
    let suggestion = rgb_to_hex(adjust_for_aa(f, b));
    Some(
        Finding::new(severity, format!("low contrast ({label} = {ratio:.2}:1)"))
            .fix(format!("use {suggestion} instead of {fg}")),
    )
}

/// One finding per line.
pub fn render(findings: &[Finding]) -> String {
    findings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
