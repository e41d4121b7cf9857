//! Themes, accent palettes and WCAG contrast helpers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// WCAG AA minimum contrast for body text.
pub const AA_RATIO: f64 = 4.5;

const ADJUST_STEP: i32 = 3;
const ADJUST_MAX_STEPS: u32 = 80;

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Parse `#rrggbb` or `#rgb` (the `#` is optional).
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let h = hex.trim().trim_start_matches('#');
    let full = match h.len() {
        6 => h.to_string(),
        3 => h.chars().flat_map(|c| [c, c]).collect(),
        _ => return None,
    };
    let n = u32::from_str_radix(&full, 16).ok()?;
    Some(Rgb {
        r: ((n >> 16) & 0xff) as u8,
        g: ((n >> 8) & 0xff) as u8,
        b: (n & 0xff) as u8,
    })
}

pub fn rgb_to_hex(c: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// CSS `rgba(...)` string for `hex` with the given alpha.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Option<String> {
    let Rgb { r, g, b } = hex_to_rgb(hex)?;
    Some(format!("rgba({r},{g},{b},{alpha})"))
}

/// WCAG relative luminance in `0.0..=1.0`.
pub fn relative_luminance(c: Rgb) -> f64 {
    let lin = |v: u8| {
        let v = f64::from(v) / 255.0;
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * lin(c.r) + 0.7152 * lin(c.g) + 0.0722 * lin(c.b)
}

/// Contrast ratio between two colours, `1.0..=21.0`.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (hi, lo) = if la > lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// [`contrast_ratio`] on hex strings; `None` if either fails to parse.
pub fn contrast_ratio_hex(a: &str, b: &str) -> Option<f64> {
    Some(contrast_ratio(hex_to_rgb(a)?, hex_to_rgb(b)?))
}

/// Nudge `color` towards black or white (whichever contrasts more with
/// `bg`) until it reaches [`AA_RATIO`] against `bg`, staying as close to
/// the original as possible. Gives up after a bounded number of steps.
pub fn adjust_for_aa(color: Rgb, bg: Rgb) -> Rgb {
    let towards = if contrast_ratio(Rgb::BLACK, bg) > contrast_ratio(Rgb::WHITE, bg) {
        Rgb::BLACK
    } else {
        Rgb::WHITE
    };
    let target = towards.channels();

    let mut c = color.channels();
    let mut steps = 0;
    while contrast_ratio(from_channels(c), bg) < AA_RATIO && steps < ADJUST_MAX_STEPS {
        for (v, t) in c.iter_mut().zip(target) {
            let delta = (i32::from(t) - i32::from(*v)).signum() * ADJUST_STEP;
            *v = (i32::from(*v) + delta).clamp(0, 255) as u8;
        }
        steps += 1;
    }
    from_channels(c)
}

fn from_channels([r, g, b]: [u8; 3]) -> Rgb {
    Rgb { r, g, b }
}

/// Colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Contrast,
}

/// Named colours of one theme variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub bg: &'static str,
    pub fg: &'static str,
    pub card: &'static str,
    pub accent: &'static str,
    pub ok: &'static str,
    pub warn: &'static str,
    pub danger: &'static str,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Contrast];

    /// Lenient parse: unknown or empty input falls back to light.
    pub fn normalize(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" | "dunkel" => Self::Dark,
            "contrast" | "kontrast" | "high-contrast" | "high_contrast" | "hc" => Self::Contrast,
            _ => Self::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Contrast => "contrast",
        }
    }

    pub fn colors(&self) -> ThemeColors {
        match self {
            Self::Light => ThemeColors {
                bg: "#f8fafc",
                fg: "#0f172a",
                card: "#ffffff",
                accent: "#1d4ed8",
                ok: "#15803d",
                warn: "#b45309",
                danger: "#b91c1c",
            },
            Self::Dark => ThemeColors {
                bg: "#0b1020",
                fg: "#e5e7eb",
                card: "#111827",
                accent: "#60a5fa",
                ok: "#34d399",
                warn: "#fbbf24",
                danger: "#f87171",
            },
            Self::Contrast => ThemeColors {
                bg: "#000000",
                fg: "#ffffff",
                card: "#000000",
                accent: "#ffff00",
                ok: "#00ff00",
                warn: "#ffa500",
                danger: "#ff6b6b",
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(Self::normalize(&s))
    }
}

/// Accent palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Blue,
    Green,
    Violet,
    Red,
}

impl Palette {
    pub const ALL: [Palette; 4] = [Palette::Blue, Palette::Green, Palette::Violet, Palette::Red];

    /// Lenient lookup: unknown names fall back to blue.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Violet => "violet",
            Self::Red => "red",
        }
    }

    pub fn primary(&self) -> &'static str {
        match self {
            Self::Blue => "#1d4ed8",
            Self::Green => "#16a34a",
            Self::Violet => "#7c3aed",
            Self::Red => "#dc2626",
        }
    }

    pub fn accent(&self) -> &'static str {
        match self {
            Self::Blue => "#0ea5e9",
            Self::Green => "#22c55e",
            Self::Violet => "#a78bfa",
            Self::Red => "#ef4444",
        }
    }

    /// Text colour for buttons filled with the primary colour.
    pub fn on_primary(&self) -> &'static str {
        let lum = hex_to_rgb(self.primary()).map_or(0.0, relative_luminance);
        if lum > 0.6 {
            "#000000"
        } else {
            "#ffffff"
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Palette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "violet" => Ok(Self::Violet),
            "red" => Ok(Self::Red),
            other => Err(format!("unknown palette: {other}")),
        }
    }
}
