//! Color and paint handling for Penstroke drawings
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, and [`Paint`], the fill/stroke value as it was written
//! in markup together with its parsed color.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use penstroke_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Converts the color to 8-bit sRGB channels, `[r, g, b, a]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use penstroke_core::color::Color;
    ///
    /// let red = Color::new("red").unwrap();
    /// assert_eq!(red.to_rgba8(), [255, 0, 0, 255]);
    /// ```
    pub fn to_rgba8(&self) -> [u8; 4] {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        [rgba.r, rgba.g, rgba.b, rgba.a]
    }

    /// Converts the color to unit-range sRGB channels, `[r, g, b]`.
    pub fn to_rgb_unit(&self) -> [f32; 3] {
        let [r, g, b, _] = self.to_rgba8();
        [
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

/// A fill or stroke paint.
///
/// Keeps the markup spelling next to the parsed [`Color`] so vector output can
/// emit the value the way it was written. Color names written with spaces
/// (`"sky blue"`) are accepted and normalized to their CSS spelling.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Paint {
    source: String,
    color: Color,
}

impl Paint {
    /// Parses a paint value.
    ///
    /// Returns `Ok(None)` for `"none"` (any case) and for empty or blank
    /// strings, meaning "do not paint".
    ///
    /// # Errors
    ///
    /// Returns an error message when the value is not a CSS color.
    ///
    /// # Examples
    ///
    /// ```
    /// use penstroke_core::color::Paint;
    ///
    /// assert!(Paint::parse("none").unwrap().is_none());
    /// assert_eq!(Paint::parse("sky blue").unwrap().unwrap().as_str(), "skyblue");
    /// assert!(Paint::parse("blurple").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Option<Self>, String> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(None);
        }

        if let Ok(color) = Color::new(trimmed) {
            return Ok(Some(Self {
                source: trimmed.to_string(),
                color,
            }));
        }

        let squashed: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        let color = Color::new(&squashed)?;
        Ok(Some(Self {
            source: squashed,
            color,
        }))
    }

    /// Creates a paint from an already parsed color.
    pub fn from_color(color: Color) -> Self {
        Self {
            source: color.to_string(),
            color,
        }
    }

    /// Returns the paint value as it should be written to markup.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the parsed color.
    pub fn color(&self) -> Color {
        self.color
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&Paint> for svg::node::Value {
    fn from(paint: &Paint) -> Self {
        Self::from(paint.as_str())
    }
}
