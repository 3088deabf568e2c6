//! Fill and stroke styling attached to every primitive.

use thiserror::Error;

use crate::color::Paint;

/// Errors raised while building a [`Style`] from markup values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("invalid fill: {0}")]
    Fill(String),

    #[error("invalid stroke: {0}")]
    Stroke(String),
}

/// Paint settings for a single primitive.
///
/// A missing fill means the shape is not filled; a missing stroke means no
/// outline. `stroke_width` is only meaningful while a stroke is present. A
/// style with neither paint draws nothing, which is still a legal draw.
///
/// # Examples
///
/// ```
/// # use penstroke_core::style::Style;
/// let style = Style::parse("red", "black", 2.0).unwrap();
/// assert_eq!(style.fill().unwrap().as_str(), "red");
/// assert_eq!(style.stroke_width(), 2.0);
///
/// let hollow = Style::parse("none", "none", 1.0).unwrap();
/// assert!(hollow.is_invisible());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    fill: Option<Paint>,
    stroke: Option<Paint>,
    stroke_width: f32,
}

impl Style {
    /// Creates a style from already parsed paints.
    pub fn new(fill: Option<Paint>, stroke: Option<Paint>, stroke_width: f32) -> Self {
        Self {
            fill,
            stroke,
            stroke_width,
        }
    }

    /// Parses fill and stroke paint strings.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError`] when either paint is neither `none` nor a CSS
    /// color.
    pub fn parse(fill: &str, stroke: &str, stroke_width: f32) -> Result<Self, StyleError> {
        let fill = Paint::parse(fill).map_err(StyleError::Fill)?;
        let stroke = Paint::parse(stroke).map_err(StyleError::Stroke)?;
        Ok(Self::new(fill, stroke, stroke_width))
    }

    /// Style used for text: a fill color and nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Fill`] for an unparseable color.
    pub fn text(fill: &str) -> Result<Self, StyleError> {
        let fill = Paint::parse(fill).map_err(StyleError::Fill)?;
        Ok(Self::new(fill, None, 0.0))
    }

    pub fn fill(&self) -> Option<&Paint> {
        self.fill.as_ref()
    }

    pub fn stroke(&self) -> Option<&Paint> {
        self.stroke.as_ref()
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// The stroke paint, only when it would leave a mark (width above zero).
    pub fn visible_stroke(&self) -> Option<&Paint> {
        self.stroke.as_ref().filter(|_| self.stroke_width > 0.0)
    }

    /// Returns `true` when the style has neither fill nor a visible stroke.
    pub fn is_invisible(&self) -> bool {
        self.fill.is_none() && self.visible_stroke().is_none()
    }

    /// Returns `true` when the stroke width is a finite, non-negative number.
    pub fn is_valid(&self) -> bool {
        self.stroke_width.is_finite() && self.stroke_width >= 0.0
    }
}

impl Default for Style {
    /// No fill, 1px black stroke: the markup defaults for outlined shapes.
    fn default() -> Self {
        Self {
            fill: None,
            stroke: Paint::parse("black").ok().flatten(),
            stroke_width: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style() {
        let style = Style::default();
        assert!(style.fill().is_none());
        assert_eq!(style.stroke().unwrap().as_str(), "black");
        assert_eq!(style.stroke_width(), 1.0);
        assert!(!style.is_invisible());
    }

    #[test]
    fn test_zero_width_stroke_is_not_visible() {
        let style = Style::parse("none", "black", 0.0).unwrap();
        assert!(style.stroke().is_some());
        assert!(style.visible_stroke().is_none());
        assert!(style.is_invisible());
    }

    #[test]
    fn test_text_style_has_no_stroke() {
        let style = Style::text("navy").unwrap();
        assert!(style.stroke().is_none());
        assert_eq!(style.fill().unwrap().as_str(), "navy");
    }

    #[test]
    fn test_parse_reports_which_paint_failed() {
        assert!(matches!(
            Style::parse("nope-color", "black", 1.0),
            Err(StyleError::Fill(_))
        ));
        assert!(matches!(
            Style::parse("red", "nope-color", 1.0),
            Err(StyleError::Stroke(_))
        ));
    }

    #[test]
    fn test_validity() {
        assert!(Style::parse("red", "black", 0.0).unwrap().is_valid());
        assert!(!Style::parse("red", "black", -1.0).unwrap().is_valid());
        assert!(!Style::parse("red", "black", f32::NAN).unwrap().is_valid());
    }
}
