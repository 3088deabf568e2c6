//! Primitive shape definitions.
//!
//! Each supported markup element has a plain value type here. [`Primitive`]
//! wraps any of them and is what a canvas records in its per-object log.
//! All coordinates use the SVG convention described in [`crate::geometry`].

use std::{
    fmt,
    num::{IntErrorKind, ParseIntError},
    str::FromStr,
};

use crate::geometry::Point;

/// The eight supported element kinds.
///
/// [`PrimitiveKind::ALL`] is the fixed order in which markup is scanned, which
/// is also the draw order for backends that paint in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Circle,
    Ellipse,
    Rect,
    Line,
    Polyline,
    Polygon,
    Path,
    Text,
}

impl PrimitiveKind {
    /// All kinds in scan order.
    pub const ALL: [PrimitiveKind; 8] = [
        Self::Circle,
        Self::Ellipse,
        Self::Rect,
        Self::Line,
        Self::Polyline,
        Self::Polygon,
        Self::Path,
        Self::Text,
    ];

    /// Returns the markup tag name for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Rect => "rect",
            Self::Line => "line",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
            Self::Path => "path",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PrimitiveKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unsupported element `{s}`"))
    }
}

/// A circle given by center and radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f32,
}

impl Circle {
    pub fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

/// An axis-aligned ellipse.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    center: Point,
    rx: f32,
    ry: f32,
}

impl Ellipse {
    pub fn new(center: Point, rx: f32, ry: f32) -> Self {
        Self { center, rx, ry }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn rx(&self) -> f32 {
        self.rx
    }

    pub fn ry(&self) -> f32 {
        self.ry
    }
}

/// An axis-aligned rectangle with optional rounded corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    origin: Point,
    width: f32,
    height: f32,
    rx: Option<f32>,
    ry: Option<f32>,
}

impl Rect {
    /// Creates a square-cornered rectangle from its top-left corner and size.
    pub fn new(origin: Point, width: f32, height: f32) -> Self {
        Self {
            origin,
            width,
            height,
            rx: None,
            ry: None,
        }
    }

    /// Sets the corner radii as written in markup (builder style).
    pub fn with_corner_radii(mut self, rx: Option<f32>, ry: Option<f32>) -> Self {
        self.rx = rx;
        self.ry = ry;
        self
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// The `rx` value exactly as given.
    pub fn rx(&self) -> Option<f32> {
        self.rx
    }

    /// The `ry` value exactly as given.
    pub fn ry(&self) -> Option<f32> {
        self.ry
    }

    /// Effective corner radii after SVG resolution rules.
    ///
    /// A single given radius applies to both axes, negative values are
    /// ignored, and each radius is clamped to half the matching side. Returns
    /// `None` when the corners are square.
    ///
    /// # Examples
    ///
    /// ```
    /// # use penstroke_core::{geometry::Point, shape::Rect};
    /// let rect = Rect::new(Point::new(0.0, 0.0), 10.0, 4.0).with_corner_radii(Some(3.0), None);
    /// assert_eq!(rect.corner_radii(), Some((3.0, 2.0)));
    /// ```
    pub fn corner_radii(&self) -> Option<(f32, f32)> {
        let rx = self.rx.filter(|r| *r >= 0.0);
        let ry = self.ry.filter(|r| *r >= 0.0);
        let (rx, ry) = match (rx, ry) {
            (None, None) => return None,
            (Some(rx), None) => (rx, rx),
            (None, Some(ry)) => (ry, ry),
            (Some(rx), Some(ry)) => (rx, ry),
        };
        let rx = rx.min(self.width.abs() / 2.0);
        let ry = ry.min(self.height.abs() / 2.0);
        (rx > 0.0 && ry > 0.0).then_some((rx, ry))
    }

    /// Top-left and bottom-right corners, with negative sizes normalized.
    fn extent(&self) -> (Point, Point) {
        let far = self.origin.add_point(Point::new(self.width, self.height));
        (
            Point::new(self.origin.x().min(far.x()), self.origin.y().min(far.y())),
            Point::new(self.origin.x().max(far.x()), self.origin.y().max(far.y())),
        )
    }

    /// Outline points clockwise (in screen space) starting on the top edge.
    ///
    /// Square corners yield the four corner points. Rounded corners are
    /// flattened into `corner_segments` straight segments each.
    ///
    /// # Examples
    ///
    /// ```
    /// # use penstroke_core::{geometry::Point, shape::Rect};
    /// let square = Rect::new(Point::new(0.0, 0.0), 4.0, 2.0);
    /// assert_eq!(square.outline(8).len(), 4);
    ///
    /// let rounded = square.with_corner_radii(Some(1.0), None);
    /// assert_eq!(rounded.outline(8).len(), 4 * 9);
    /// ```
    pub fn outline(&self, corner_segments: usize) -> Vec<Point> {
        let (min, max) = self.extent();
        let Some((rx, ry)) = self.corner_radii() else {
            return vec![
                min,
                Point::new(max.x(), min.y()),
                max,
                Point::new(min.x(), max.y()),
            ];
        };

        let segments = corner_segments.max(1);
        let corners = [
            (Point::new(max.x() - rx, min.y() + ry), 270.0_f32),
            (Point::new(max.x() - rx, max.y() - ry), 0.0),
            (Point::new(min.x() + rx, max.y() - ry), 90.0),
            (Point::new(min.x() + rx, min.y() + ry), 180.0),
        ];

        let mut points = Vec::with_capacity(4 * (segments + 1));
        for (center, start) in corners {
            for step in 0..=segments {
                let angle = (start + 90.0 * step as f32 / segments as f32).to_radians();
                points.push(Point::new(
                    center.x() + rx * angle.cos(),
                    center.y() + ry * angle.sin(),
                ));
            }
        }
        points
    }
}

/// A straight segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    start: Point,
    end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }
}

/// An open run of connected segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// A closed outline; the last point connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// Path data in the SVG path mini-language, kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    data: String,
}

impl Path {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}

/// Default font size in pixels when `font-size` is absent or has no digits.
pub const DEFAULT_FONT_SIZE: u16 = 16;

/// A text label anchored at its baseline start.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    position: Point,
    content: String,
    font_size: String,
}

impl Text {
    /// Creates a text primitive with the default `16px` font size.
    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            position,
            content: content.into(),
            font_size: format!("{DEFAULT_FONT_SIZE}px"),
        }
    }

    /// Sets the font size as written in markup, e.g. `"24px"` (builder style).
    pub fn with_font_size(mut self, font_size: impl Into<String>) -> Self {
        self.font_size = font_size.into();
        self
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The font size as written in markup.
    pub fn font_size(&self) -> &str {
        &self.font_size
    }

    /// Font size in pixels taken from the leading digits of the markup value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use penstroke_core::{geometry::Point, shape::Text};
    /// let text = Text::new(Point::default(), "hi").with_font_size("24px");
    /// assert_eq!(text.font_size_px(), 24);
    ///
    /// let text = Text::new(Point::default(), "hi").with_font_size("large");
    /// assert_eq!(text.font_size_px(), 16);
    ///
    /// let text = Text::new(Point::default(), "hi").with_font_size("70000px");
    /// assert_eq!(text.font_size_px(), u16::MAX);
    /// ```
    pub fn font_size_px(&self) -> u16 {
        match self.leading_font_size() {
            Ok(0) => DEFAULT_FONT_SIZE,
            Ok(size) => size,
            Err(err) if *err.kind() == IntErrorKind::PosOverflow => u16::MAX,
            Err(_) => DEFAULT_FONT_SIZE,
        }
    }

    /// Returns `true` when the markup size is too large for
    /// [`Text::font_size_px`] and was clamped to `u16::MAX`.
    pub fn font_size_clamped(&self) -> bool {
        matches!(
            self.leading_font_size(),
            Err(err) if *err.kind() == IntErrorKind::PosOverflow
        )
    }

    fn leading_font_size(&self) -> Result<u16, ParseIntError> {
        let digits: String = self
            .font_size
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse()
    }
}

/// Any drawable primitive.
///
/// This is the record kept in a canvas's per-object log, so it carries the
/// geometry but not the style.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Circle(Circle),
    Ellipse(Ellipse),
    Rect(Rect),
    Line(Line),
    Polyline(Polyline),
    Polygon(Polygon),
    Path(Path),
    Text(Text),
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Circle(_) => PrimitiveKind::Circle,
            Self::Ellipse(_) => PrimitiveKind::Ellipse,
            Self::Rect(_) => PrimitiveKind::Rect,
            Self::Line(_) => PrimitiveKind::Line,
            Self::Polyline(_) => PrimitiveKind::Polyline,
            Self::Polygon(_) => PrimitiveKind::Polygon,
            Self::Path(_) => PrimitiveKind::Path,
            Self::Text(_) => PrimitiveKind::Text,
        }
    }

    /// Returns `true` when every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Circle(c) => c.center.is_finite() && c.radius.is_finite(),
            Self::Ellipse(e) => e.center.is_finite() && e.rx.is_finite() && e.ry.is_finite(),
            Self::Rect(r) => {
                r.origin.is_finite()
                    && r.width.is_finite()
                    && r.height.is_finite()
                    && r.rx.is_none_or(f32::is_finite)
                    && r.ry.is_none_or(f32::is_finite)
            }
            Self::Line(l) => l.start.is_finite() && l.end.is_finite(),
            Self::Polyline(p) => p.points.iter().all(|pt| pt.is_finite()),
            Self::Polygon(p) => p.points.iter().all(|pt| pt.is_finite()),
            Self::Path(_) => true,
            Self::Text(t) => t.position.is_finite(),
        }
    }
}

macro_rules! impl_from_shape {
    ($($shape:ident),* $(,)?) => {
        $(
            impl From<$shape> for Primitive {
                fn from(shape: $shape) -> Self {
                    Self::$shape(shape)
                }
            }
        )*
    };
}

impl_from_shape!(Circle, Ellipse, Rect, Line, Polyline, Polygon, Path, Text);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_scan_order() {
        let tags: Vec<_> = PrimitiveKind::ALL.iter().map(|k| k.tag()).collect();
        assert_eq!(
            tags,
            ["circle", "ellipse", "rect", "line", "polyline", "polygon", "path", "text"]
        );
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("RECT".parse::<PrimitiveKind>(), Ok(PrimitiveKind::Rect));
        assert!("group".parse::<PrimitiveKind>().is_err());
    }

    #[test]
    fn test_corner_radii_square() {
        let rect = Rect::new(Point::new(0.0, 0.0), 10.0, 10.0);
        assert_eq!(rect.corner_radii(), None);

        let rect = rect.with_corner_radii(Some(0.0), Some(0.0));
        assert_eq!(rect.corner_radii(), None);
    }

    #[test]
    fn test_corner_radii_mirror_and_clamp() {
        let rect = Rect::new(Point::new(0.0, 0.0), 20.0, 8.0).with_corner_radii(None, Some(6.0));
        assert_eq!(rect.corner_radii(), Some((6.0, 4.0)));

        let rect = Rect::new(Point::new(0.0, 0.0), 20.0, 8.0).with_corner_radii(Some(2.0), Some(3.0));
        assert_eq!(rect.corner_radii(), Some((2.0, 3.0)));
    }

    #[test]
    fn test_outline_normalizes_negative_size() {
        let rect = Rect::new(Point::new(10.0, 10.0), -4.0, -2.0);
        assert_eq!(
            rect.outline(4),
            vec![
                Point::new(6.0, 8.0),
                Point::new(10.0, 8.0),
                Point::new(10.0, 10.0),
                Point::new(6.0, 10.0),
            ]
        );
    }

    #[test]
    fn test_rounded_outline_stays_inside() {
        let rect = Rect::new(Point::new(0.0, 0.0), 20.0, 10.0).with_corner_radii(Some(4.0), None);
        for p in rect.outline(6) {
            assert!((-1e-4..=20.0001).contains(&p.x()));
            assert!((-1e-4..=10.0001).contains(&p.y()));
        }
    }

    #[test]
    fn test_font_size_px() {
        let text = Text::new(Point::default(), "x");
        assert_eq!(text.font_size_px(), 16);
        assert_eq!(text.clone().with_font_size("12pt").font_size_px(), 12);
        assert_eq!(text.clone().with_font_size("0px").font_size_px(), 16);
        assert_eq!(text.with_font_size("").font_size_px(), 16);
    }

    #[test]
    fn test_oversized_font_size_is_clamped() {
        let text = Text::new(Point::default(), "x").with_font_size("70000px");
        assert_eq!(text.font_size_px(), u16::MAX);
        assert!(text.font_size_clamped());

        let text = text.with_font_size("65535px");
        assert_eq!(text.font_size_px(), u16::MAX);
        assert!(!text.font_size_clamped());
    }

    #[test]
    fn test_primitive_is_finite() {
        let ok: Primitive = Circle::new(Point::new(1.0, 1.0), 5.0).into();
        assert!(ok.is_finite());
        assert_eq!(ok.kind(), PrimitiveKind::Circle);

        let bad: Primitive = Rect::new(Point::new(0.0, 0.0), f32::INFINITY, 1.0).into();
        assert!(!bad.is_finite());

        let bad: Primitive = Polyline::new(vec![Point::new(0.0, f32::NAN)]).into();
        assert!(!bad.is_finite());
    }
}
