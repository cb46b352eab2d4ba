use crossterm::style::Color;
use strum::Display;

use crate::calendar::Highlight;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ThemeName {
    Light,
    Dark,
}

impl ThemeName {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            ThemeName::Dark
        } else {
            ThemeName::Light
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            ThemeName::Light => Palette {
                background: Color::White,
                foreground: Color::Black,
            },
            ThemeName::Dark => Palette {
                background: Color::Black,
                foreground: Color::White,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
}

impl Palette {
    /// Returns `(foreground, background)` for a calendar cell.
    pub fn colors_for(&self, highlight: Highlight) -> (Color, Color) {
        match highlight {
            Highlight::Today => (Color::Black, Color::Yellow),
            Highlight::Selected => (Color::Black, Color::Grey),
            Highlight::Plain => (self.foreground, self.background),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_mode_selects_dark_theme() {
        assert_eq!(ThemeName::from_dark_mode(true), ThemeName::Dark);
        assert_eq!(ThemeName::from_dark_mode(false), ThemeName::Light);
        assert_eq!(ThemeName::Dark.to_string(), "dark");
    }

    #[test]
    fn highlights_override_theme_colors() {
        let dark = ThemeName::Dark.palette();
        let light = ThemeName::Light.palette();
        assert_eq!(dark.colors_for(Highlight::Today), light.colors_for(Highlight::Today));
        assert_eq!(dark.colors_for(Highlight::Selected), (Color::Black, Color::Grey));
        assert_eq!(dark.colors_for(Highlight::Plain), (Color::White, Color::Black));
    }
}
