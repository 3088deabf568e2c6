//! Element extraction from free-form markup.
//!
//! The input does not have to be well-formed XML. For each supported element
//! kind, in [`PrimitiveKind::ALL`] order, the text is scanned for tags of that
//! kind; each match is decoded on its own, so one malformed element never
//! affects its neighbours. Nesting, `transform`, CSS and `<defs>` are ignored.

use std::sync::LazyLock;

use log::{debug, trace};
use penstroke_core::{
    geometry::Point,
    shape::{Circle, Ellipse, Line, Path, Polygon, Polyline, Primitive, PrimitiveKind, Rect, Text},
    style::{Style, StyleError},
};
use regex::Regex;
use thiserror::Error;

use crate::{
    attributes::{Attributes, parse_attributes},
    points::parse_points,
};

/// Compiled tag patterns, one per kind, in scan order.
static TAG_PATTERNS: LazyLock<Vec<(PrimitiveKind, Regex)>> = LazyLock::new(|| {
    PrimitiveKind::ALL
        .into_iter()
        .map(|kind| (kind, tag_pattern(kind)))
        .collect()
});

fn tag_pattern(kind: PrimitiveKind) -> Regex {
    let source = match kind {
        PrimitiveKind::Text => r"(?i)<text(?:\s+([^>]*))?>([^<]*)</text\s*>".to_string(),
        _ => format!(r"(?i)<{}(?:\s+([^>]*))?/?>", kind.tag()),
    };
    Regex::new(&source).expect("tag patterns are valid regular expressions")
}

/// Why a matched tag could not become an element.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    #[error("attribute `{attribute}` is not a number: `{value}`")]
    InvalidNumber { attribute: &'static str, value: String },

    #[error(transparent)]
    InvalidPaint(#[from] StyleError),
}

/// A decoded element: geometry plus paint.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    primitive: Primitive,
    style: Style,
}

impl Element {
    pub fn new(primitive: impl Into<Primitive>, style: Style) -> Self {
        Self {
            primitive: primitive.into(),
            style,
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.primitive.kind()
    }

    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Splits the element into its parts.
    pub fn into_parts(self) -> (Primitive, Style) {
        (self.primitive, self.style)
    }
}

/// A tag that matched but failed to decode.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedElement {
    pub kind: PrimitiveKind,
    pub error: CoercionError,
}

/// Result of scanning one block of markup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub elements: Vec<Element>,
    pub skipped: Vec<SkippedElement>,
}

impl Extraction {
    /// Number of tags recognized, decoded or not.
    pub fn matched(&self) -> usize {
        self.elements.len() + self.skipped.len()
    }
}

/// Scans `markup` for supported elements.
///
/// Never fails: text with no recognizable tags yields an empty extraction.
///
/// # Examples
///
/// ```
/// # use penstroke_parser::extract;
/// # use penstroke_core::shape::PrimitiveKind;
/// let extraction = extract(r#"<svg><rect x="1" y="2"/><circle r="5" fill="red"/></svg>"#);
/// let kinds: Vec<_> = extraction.elements.iter().map(|e| e.kind()).collect();
/// assert_eq!(kinds, vec![PrimitiveKind::Circle, PrimitiveKind::Rect]);
/// ```
pub fn extract(markup: &str) -> Extraction {
    let mut extraction = Extraction::default();

    for (kind, pattern) in TAG_PATTERNS.iter() {
        for caps in pattern.captures_iter(markup) {
            let body = caps.get(1).map_or("", |m| m.as_str());
            let attrs = parse_attributes(body);
            let content = caps.get(2).map(|m| m.as_str());

            match decode(*kind, &attrs, content) {
                Ok(element) => {
                    trace!(kind = kind.tag(); "Element extracted");
                    extraction.elements.push(element);
                }
                Err(error) => {
                    debug!(kind = kind.tag(), error = error.to_string(); "Skipping element");
                    extraction.skipped.push(SkippedElement { kind: *kind, error });
                }
            }
        }
    }

    debug!(
        elements = extraction.elements.len(),
        skipped = extraction.skipped.len();
        "Markup scanned"
    );
    extraction
}

fn number(attrs: &Attributes, attribute: &'static str, default: f32) -> Result<f32, CoercionError> {
    optional_number(attrs, attribute).map(|value| value.unwrap_or(default))
}

fn optional_number(attrs: &Attributes, attribute: &'static str) -> Result<Option<f32>, CoercionError> {
    attrs
        .number(attribute)
        .map_err(|value| CoercionError::InvalidNumber { attribute, value })
}

fn shape_style(attrs: &Attributes, fill: &str) -> Result<Style, CoercionError> {
    let stroke_width = number(attrs, "stroke-width", 1.0)?;
    let style = Style::parse(
        attrs.get_or("fill", fill),
        attrs.get_or("stroke", "black"),
        stroke_width,
    )?;
    Ok(style)
}

fn decode(kind: PrimitiveKind, attrs: &Attributes, content: Option<&str>) -> Result<Element, CoercionError> {
    let element = match kind {
        PrimitiveKind::Circle => {
            let center = Point::new(number(attrs, "cx", 0.0)?, number(attrs, "cy", 0.0)?);
            let circle = Circle::new(center, number(attrs, "r", 10.0)?);
            Element::new(circle, shape_style(attrs, "none")?)
        }
        PrimitiveKind::Ellipse => {
            let center = Point::new(number(attrs, "cx", 0.0)?, number(attrs, "cy", 0.0)?);
            let ellipse = Ellipse::new(center, number(attrs, "rx", 10.0)?, number(attrs, "ry", 10.0)?);
            Element::new(ellipse, shape_style(attrs, "none")?)
        }
        PrimitiveKind::Rect => {
            let origin = Point::new(number(attrs, "x", 0.0)?, number(attrs, "y", 0.0)?);
            let rect = Rect::new(origin, number(attrs, "width", 10.0)?, number(attrs, "height", 10.0)?)
                .with_corner_radii(optional_number(attrs, "rx")?, optional_number(attrs, "ry")?);
            Element::new(rect, shape_style(attrs, "none")?)
        }
        PrimitiveKind::Line => {
            let start = Point::new(number(attrs, "x1", 0.0)?, number(attrs, "y1", 0.0)?);
            let end = Point::new(number(attrs, "x2", 0.0)?, number(attrs, "y2", 0.0)?);
            Element::new(Line::new(start, end), shape_style(attrs, "none")?)
        }
        PrimitiveKind::Polyline => {
            let points = parse_points(attrs.get_or("points", ""));
            Element::new(Polyline::new(points), shape_style(attrs, "none")?)
        }
        PrimitiveKind::Polygon => {
            let points = parse_points(attrs.get_or("points", ""));
            Element::new(Polygon::new(points), shape_style(attrs, "none")?)
        }
        PrimitiveKind::Path => {
            let path = Path::new(attrs.get_or("d", ""));
            Element::new(path, shape_style(attrs, "none")?)
        }
        PrimitiveKind::Text => {
            let position = Point::new(number(attrs, "x", 0.0)?, number(attrs, "y", 0.0)?);
            let text = Text::new(position, unescape(content.unwrap_or_default().trim()))
                .with_font_size(attrs.get_or("font-size", "16px"));
            Element::new(text, Style::text(attrs.get_or("fill", "black"))?)
        }
    };
    Ok(element)
}

/// Decodes the predefined XML entities in text content.
fn unescape(content: &str) -> String {
    if !content.contains('&') {
        return content.to_string();
    }
    content
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn extract_never_panics(markup in ".{0,200}") {
            let _ = extract(&markup);
        }

        #[test]
        fn well_formed_circles_are_all_found(
            circles in prop::collection::vec((0u16..800, 0u16..800, 1u16..100), 0..12),
        ) {
            let markup: String = circles
                .iter()
                .map(|(cx, cy, r)| format!(r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="red"/>"#))
                .collect();
            let extraction = extract(&markup);
            prop_assert_eq!(extraction.elements.len(), circles.len());
            prop_assert!(extraction.skipped.is_empty());
        }
    }
}
