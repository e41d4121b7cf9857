use clap::Subcommand;
use contentcal_core::theme::{
    adjust_for_aa, contrast_ratio, hex_to_rgb, rgb_to_hex, Rgb, AA_RATIO,
};
use contentcal_core::{CalendarState, Config, Palette, Theme};

use super::{open_planner, print_status, CliResult};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Current theme, palette and font size
    Show,
    /// Switch the theme (light, dark, contrast)
    Set { name: String },
    /// Show or switch the accent palette
    Palette { name: Option<String> },
    /// Set the font size in pixels
    FontSize {
        #[arg(value_parser = clap::value_parser!(u32).range(10..=32))]
        size: u32,
    },
    /// Contrast ratio between two colours
    Contrast { fg: String, bg: String },
    /// Nearest colour that reaches AA contrast on a background
    Suggest { color: String, bg: String },
}

fn color(hex: &str) -> Result<Rgb, String> {
    hex_to_rgb(hex).ok_or_else(|| format!("invalid colour '{hex}' (expected #rgb or #rrggbb)"))
}

pub fn run(action: ThemeAction) -> CliResult {
    match action {
        ThemeAction::Contrast { fg, bg } => {
            let ratio = contrast_ratio(color(&fg)?, color(&bg)?);
            let verdict = if ratio >= AA_RATIO { "AA ok" } else { "below AA" };
            println!("{ratio:.2}:1 ({verdict})");
            Ok(())
        }
        ThemeAction::Suggest { color: c, bg } => {
            let bg = color(&bg)?;
            let fixed = adjust_for_aa(color(&c)?, bg);
            println!("{} ({:.2}:1)", rgb_to_hex(fixed), contrast_ratio(fixed, bg));
            Ok(())
        }
        ThemeAction::Show => {
            let planner = open_planner(&Config::load_or_default())?;
            let state = planner.state();
            let colors = state.theme.colors();
            println!("theme: {}", state.theme);
            println!("palette: {}", state.palette);
            println!("font size: {}px", state.font_size);
            println!("background: {}  text: {}", colors.bg, colors.fg);
            println!(
                "primary: {}  button text: {}",
                state.palette.primary(),
                state.palette.on_primary()
            );
            Ok(())
        }
        ThemeAction::Palette { name: None } => {
            let planner = open_planner(&Config::load_or_default())?;
            for p in Palette::ALL {
                let mark = if p == planner.state().palette { "*" } else { " " };
                println!("{mark} {:<7} {}", p.as_str(), p.primary());
            }
            Ok(())
        }
        ThemeAction::Palette { name: Some(name) } => {
            let palette: Palette = name.parse()?;
            edit(&format!("palette: {palette}"), |s| s.palette = palette)
        }
        ThemeAction::Set { name } => {
            let theme = Theme::normalize(&name);
            edit(&format!("theme: {theme}"), |s| s.theme = theme)
        }
        ThemeAction::FontSize { size } => {
            edit(&format!("font size: {size}px"), |s| s.font_size = size)
        }
    }
}

fn edit(msg: &str, f: impl FnOnce(&mut CalendarState)) -> CliResult {
    let mut planner = open_planner(&Config::load_or_default())?;
    planner.apply(msg, f)?;
    print_status(&planner);
    Ok(())
}
