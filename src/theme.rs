// SPDX-License-Identifier: GPL-3.0-only

//! Widget color themes.
//!
//! The widget ships four named themes. The selected theme is persisted by
//! name in the key-value store, so the names are part of the storage format.
//!
//! # Color Functions
//!
//! - [`Theme::ball_colors`]: gradient endpoints of the collapsed ball
//! - [`Theme::panel_background`]: background of the expanded panel
//! - [`Theme::text_color`]: foreground text on the panel

use std::str::FromStr;

use cosmic::iced::Color;
use serde::{Deserialize, Serialize};

/// A named color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    Midnight,
    Nebula,
}

impl Theme {
    /// All themes in cycling order.
    pub const ALL: [Theme; 4] = [Theme::Light, Theme::Dark, Theme::Midnight, Theme::Nebula];

    /// Stored name of the theme.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Midnight => "midnight",
            Theme::Nebula => "nebula",
        }
    }

    /// The theme after this one, wrapping around.
    #[must_use]
    pub fn next(self) -> Theme {
        let index = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Parses a stored name, falling back to the default theme.
    pub fn from_name_or_default(name: &str) -> Theme {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown theme {:?}, using {}", name, Theme::default());
            Theme::default()
        })
    }

    /// Gradient endpoints of the ball.
    pub fn ball_colors(&self) -> (Color, Color) {
        match self {
            Theme::Light | Theme::Dark => (rgb(0x66, 0x7e, 0xea), rgb(0x76, 0x4b, 0xa2)),
            Theme::Midnight => (rgb(0x1e, 0x3a, 0x8a), rgb(0x0f, 0x17, 0x2a)),
            Theme::Nebula => (rgb(0xc0, 0x26, 0xd3), rgb(0x4c, 0x1d, 0x95)),
        }
    }

    /// Background of the expanded panel.
    pub fn panel_background(&self) -> Color {
        match self {
            Theme::Light => Color::from_rgba8(0xff, 0xff, 0xff, 0.95),
            Theme::Dark => Color::from_rgba8(0x1f, 0x29, 0x37, 0.95),
            Theme::Midnight => Color::from_rgba8(0x02, 0x06, 0x17, 0.95),
            Theme::Nebula => Color::from_rgba8(0x2e, 0x10, 0x65, 0.95),
        }
    }

    /// Text color on the panel background.
    pub fn text_color(&self) -> Color {
        match self {
            Theme::Light => rgb(0x11, 0x18, 0x27),
            Theme::Dark | Theme::Midnight | Theme::Nebula => rgb(0xf9, 0xfa, 0xfb),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown theme name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme: {0}")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgb8(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: names round-trip through parsing.
    #[test]
    fn test_theme_names_parse() {
        for theme in Theme::ALL {
            assert_eq!(theme.as_str().parse::<Theme>(), Ok(theme));
        }
        assert_eq!(
            "solarized".parse::<Theme>(),
            Err(UnknownTheme("solarized".to_string()))
        );
    }

    /// Test: unknown stored names fall back to dark.
    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(Theme::from_name_or_default("sepia"), Theme::Dark);
        assert_eq!(Theme::from_name_or_default("nebula"), Theme::Nebula);
    }

    /// Test: cycling visits every theme and wraps.
    #[test]
    fn test_theme_cycle() {
        assert_eq!(Theme::Light.next(), Theme::Dark);
        assert_eq!(Theme::Dark.next(), Theme::Midnight);
        assert_eq!(Theme::Midnight.next(), Theme::Nebula);
        assert_eq!(Theme::Nebula.next(), Theme::Light);
    }

    /// Test: the serialized form is the stored name.
    #[test]
    fn test_theme_serializes_as_name() {
        assert_eq!(serde_json::to_string(&Theme::Midnight).unwrap(), "\"midnight\"");
        assert_eq!(
            serde_json::from_str::<Theme>("\"light\"").unwrap(),
            Theme::Light
        );
    }
}
