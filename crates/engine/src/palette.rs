//! Colors and the color theme.

use crate::error::EngineError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// RGB color used for cells and pellets.
///
/// Serialized as a `[r, g, b]` array, the layout of `colors.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        [color.r, color.g, color.b]
    }
}

/// The active color theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Colors handed out to new cells and ambient pellets.
    pub colors: Vec<Color>,
    #[serde(default = "default_white")]
    pub white: Color,
    #[serde(default = "default_black")]
    pub black: Color,
}

fn default_white() -> Color {
    Color::WHITE
}
fn default_black() -> Color {
    Color::BLACK
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![
                Color::new(231, 76, 60),
                Color::new(230, 126, 34),
                Color::new(241, 196, 15),
                Color::new(46, 204, 113),
                Color::new(26, 188, 156),
                Color::new(52, 152, 219),
                Color::new(155, 89, 182),
                Color::new(236, 64, 122),
            ],
            white: Color::WHITE,
            black: Color::BLACK,
        }
    }
}

impl Palette {
    /// Parse a palette from a `colors.json` document.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load `colors.json` from disk, falling back to the built-in palette
    /// when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(Self::from_json(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Pick a random color from the palette.
    pub fn random_color(&self, rng: &mut impl Rng) -> Color {
        if self.colors.is_empty() {
            return self.white;
        }
        self.colors[rng.random_range(0..self.colors.len())]
    }

    /// Screen fill color for the current theme.
    pub fn background(&self, dark_theme: bool) -> Color {
        if dark_theme { self.black } else { self.white }
    }

    /// Text color for the current theme.
    pub fn foreground(&self, dark_theme: bool) -> Color {
        if dark_theme { self.white } else { self.black }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_parse_colors_json() {
        let json = r#"{
            "colors": [[255, 0, 0], [0, 255, 0]],
            "white": [250, 250, 250],
            "black": [5, 5, 5]
        }"#;
        let palette = Palette::from_json(json).unwrap();
        assert_eq!(palette.colors, vec![Color::new(255, 0, 0), Color::new(0, 255, 0)]);
        assert_eq!(palette.white, Color::new(250, 250, 250));
        assert_eq!(palette.background(true), Color::new(5, 5, 5));
        assert_eq!(palette.foreground(true), Color::new(250, 250, 250));
    }

    #[test]
    fn test_missing_white_and_black_use_defaults() {
        let palette = Palette::from_json(r#"{ "colors": [[1, 2, 3]] }"#).unwrap();
        assert_eq!(palette.white, Color::WHITE);
        assert_eq!(palette.black, Color::BLACK);
    }

    #[test]
    fn test_invalid_json_is_a_palette_error() {
        let err = Palette::from_json("{ colors: nope }").unwrap_err();
        assert!(matches!(err, EngineError::Palette(_)));
    }

    #[test]
    fn test_random_color_comes_from_palette() {
        let palette = Palette::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(palette.colors.contains(&palette.random_color(&mut rng)));
        }
    }

    #[test]
    fn test_empty_palette_falls_back_to_white() {
        let palette = Palette { colors: Vec::new(), ..Palette::default() };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(palette.random_color(&mut rng), Color::WHITE);
    }
}
