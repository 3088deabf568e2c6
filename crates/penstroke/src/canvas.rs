//! The drawing canvas.
//!
//! [`Canvas`] is the entry point for drawing: it validates input, keeps the
//! element count and the per-object groups, and forwards every accepted
//! primitive to its [`Backend`].
//!
//! # Lifecycle
//!
//! ```text
//! create ──► initialize ──► add_code / draw_* ... ──► save / show ──► cleanup
//!                 ▲                                                     │
//!                 └─────────────────────────────────────────────────────┘
//! ```
//!
//! Drawing before `initialize` or after `cleanup` fails with
//! [`PenstrokeError::NotInitialized`]. Wrap a canvas in a [`Session`] to run
//! `cleanup` on every exit path.

use std::{
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, info, trace, warn};
use serde::Serialize;

use penstroke_core::{
    shape::{
        Circle, Ellipse, Line, Path as PathShape, Polygon, Polyline, Primitive, PrimitiveKind,
        Rect, Text,
    },
    style::Style,
};
use penstroke_parser::path::Outline;

use crate::{
    backend::{Backend, BackendKind},
    config::DrawingConfig,
    error::PenstrokeError,
};

/// Read-only summary of a canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanvasInfo {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub backend: BackendKind,
    pub element_count: usize,
}

/// A drawing surface backed by one of the [`BackendKind`]s.
///
/// # Examples
///
/// ```
/// use penstroke::{Canvas, config::DrawingConfig};
///
/// let mut canvas = Canvas::create("vector", DrawingConfig::default()).unwrap();
/// canvas.initialize().unwrap();
///
/// let added = canvas
///     .add_code("sun", r#"<circle cx="400" cy="400" r="50" fill="red"/>"#)
///     .unwrap();
/// assert_eq!(added, 1);
///
/// // The vector backend counts its background rectangle.
/// assert_eq!(canvas.element_count(), 2);
/// ```
pub struct Canvas {
    config: DrawingConfig,
    backend: Box<dyn Backend>,
    element_count: usize,
    groups: IndexMap<String, Vec<Primitive>>,
}

impl Canvas {
    /// Creates an uninitialized canvas on the given backend.
    pub fn new(kind: BackendKind, config: DrawingConfig) -> Self {
        Self {
            config,
            backend: kind.create(),
            element_count: 0,
            groups: IndexMap::new(),
        }
    }

    /// Creates an uninitialized canvas from a backend name.
    ///
    /// # Errors
    ///
    /// Returns [`PenstrokeError::UnknownBackend`] if `backend` names no known
    /// backend. Nothing is allocated in that case.
    pub fn create(backend: &str, config: DrawingConfig) -> Result<Self, PenstrokeError> {
        let kind = backend.parse::<BackendKind>()?;
        Ok(Self::new(kind, config))
    }

    /// Allocates the backend surface and paints the background.
    ///
    /// Resets the element count to the backend baseline and clears all
    /// groups, so calling it again starts a new drawing.
    ///
    /// # Errors
    ///
    /// Returns [`PenstrokeError::Config`] for an invalid [`DrawingConfig`].
    pub fn initialize(&mut self) -> Result<(), PenstrokeError> {
        self.config.validate()?;
        info!(
            backend = self.kind().name(),
            width = self.config.width(),
            height = self.config.height();
            "Initializing canvas"
        );

        self.backend.initialize(&self.config)?;
        self.element_count = self.backend.baseline_count();
        self.groups.clear();
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.is_initialized()
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn config(&self) -> &DrawingConfig {
        &self.config
    }

    /// Number of elements drawn so far, plus the backend baseline.
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Tag names this canvas can draw, in scan order.
    pub fn supported_elements(&self) -> Vec<&'static str> {
        PrimitiveKind::ALL.iter().map(|kind| kind.tag()).collect()
    }

    pub fn info(&self) -> CanvasInfo {
        CanvasInfo {
            width: self.config.width(),
            height: self.config.height(),
            background: self.config.background().to_string(),
            backend: self.kind(),
            element_count: self.element_count,
        }
    }

    fn ensure_initialized(&self) -> Result<(), PenstrokeError> {
        if self.backend.is_initialized() {
            Ok(())
        } else {
            Err(PenstrokeError::NotInitialized)
        }
    }

    /// Returns the primitives recorded for `object_id`, creating an empty
    /// group on first use.
    ///
    /// # Errors
    ///
    /// Returns [`PenstrokeError::NotInitialized`] outside the canvas lifetime.
    pub fn get_or_create_group(
        &mut self,
        object_id: &str,
    ) -> Result<&[Primitive], PenstrokeError> {
        self.ensure_initialized()?;
        Ok(self.group_entry(object_id).as_slice())
    }

    fn group_entry(&mut self, object_id: &str) -> &mut Vec<Primitive> {
        if !self.groups.contains_key(object_id) {
            trace!(object_id; "Creating group");
            self.backend.open_group(object_id);
        }
        self.groups.entry(object_id.to_string()).or_default()
    }

    /// Returns the primitives recorded for `object_id`, if the group exists.
    pub fn group(&self, object_id: &str) -> Option<&[Primitive]> {
        self.groups.get(object_id).map(Vec::as_slice)
    }

    /// Iterates over groups in creation order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[Primitive])> {
        self.groups
            .iter()
            .map(|(id, primitives)| (id.as_str(), primitives.as_slice()))
    }

    /// Extracts every supported element from `code` and draws it under
    /// `object_id`.
    ///
    /// Elements that cannot be decoded or drawn are skipped. Returns the
    /// number of elements drawn by this call.
    ///
    /// # Errors
    ///
    /// Returns [`PenstrokeError::NotInitialized`] outside the canvas lifetime.
    pub fn add_code(&mut self, object_id: &str, code: &str) -> Result<usize, PenstrokeError> {
        self.ensure_initialized()?;
        self.group_entry(object_id);

        let extraction = penstroke_parser::extract(code);
        let skipped = extraction.skipped.len();

        let mut added = 0;
        for element in extraction.elements {
            let (primitive, style) = element.into_parts();
            if self.draw(object_id, primitive, &style)? {
                added += 1;
            }
        }

        info!(object_id, added, skipped; "Code added");
        if added == 0 && !code.trim().is_empty() {
            warn!(object_id; "No drawable elements found in code");
        }
        Ok(added)
    }

    /// Draws any primitive. Returns `Ok(false)` when the input is rejected.
    ///
    /// Rejected input is anything a backend cannot draw: non-finite numbers,
    /// a negative or non-finite stroke width, a point list with fewer than
    /// two points, or path data without a single segment or with a coordinate
    /// that overflows.
    ///
    /// # Errors
    ///
    /// Returns [`PenstrokeError::NotInitialized`] outside the canvas lifetime.
    pub fn draw(
        &mut self,
        object_id: &str,
        primitive: Primitive,
        style: &Style,
    ) -> Result<bool, PenstrokeError> {
        self.ensure_initialized()?;

        if let Some(reason) = rejection(&primitive, style) {
            debug!(object_id, kind = primitive.kind().tag(), reason; "Primitive rejected");
            return Ok(false);
        }
        if let Primitive::Text(text) = &primitive {
            if text.font_size_clamped() {
                warn!(
                    object_id,
                    font_size = text.font_size(),
                    clamped_to = text.font_size_px();
                    "Font size too large, clamped"
                );
            }
        }

        let backend = &mut self.backend;
        match &primitive {
            Primitive::Circle(circle) => backend.draw_circle(object_id, circle, style),
            Primitive::Ellipse(ellipse) => backend.draw_ellipse(object_id, ellipse, style),
            Primitive::Rect(rect) => backend.draw_rect(object_id, rect, style),
            Primitive::Line(line) => backend.draw_line(object_id, line, style),
            Primitive::Polyline(polyline) => backend.draw_polyline(object_id, polyline, style),
            Primitive::Polygon(polygon) => backend.draw_polygon(object_id, polygon, style),
            Primitive::Path(path) => backend.draw_path(object_id, path, style),
            Primitive::Text(text) => backend.draw_text(object_id, text, style),
        }

        trace!(object_id, primitive:?; "Primitive drawn");
        self.group_entry(object_id).push(primitive);
        self.element_count += 1;
        Ok(true)
    }

    pub fn draw_circle(
        &mut self,
        object_id: &str,
        circle: Circle,
        style: &Style,
    ) -> Result<bool, PenstrokeError> {
        self.draw(object_id, circle.into(), style)
    }

    pub fn draw_ellipse(
        &mut self,
        object_id: &str,
        ellipse: Ellipse,
        style: &Style,
    ) -> Result<bool, PenstrokeError> {
        self.draw(object_id, ellipse.into(), style)
    }

    pub fn draw_rect(
        &mut self,
        object_id: &str,
        rect: Rect,
        style: &Style,
    ) -> Result<bool, PenstrokeError> {
        self.draw(object_id, rect.into(), style)
    }

    pub fn draw_line(
        &mut self,
        object_id: &str,
        line: Line,
        style: &Style,
    ) -> Result<bool, PenstrokeError> {
        self.draw(object_id, line.into(), style)
    }

    pub fn draw_polyline(
        &mut self,
        object_id: &str,
        polyline: Polyline,
        style: &Style,
    ) -> Result<bool, PenstrokeError> {
        self.draw(object_id, polyline.into(), style)
    }

    pub fn draw_polygon(
        &mut self,
        object_id: &str,
        polygon: Polygon,
        style: &Style,
    ) -> Result<bool, PenstrokeError> {
        self.draw(object_id, polygon.into(), style)
    }

    pub fn draw_path(
        &mut self,
        object_id: &str,
        path: PathShape,
        style: &Style,
    ) -> Result<bool, PenstrokeError> {
        self.draw(object_id, path.into(), style)
    }

    pub fn draw_text(
        &mut self,
        object_id: &str,
        text: Text,
        style: &Style,
    ) -> Result<bool, PenstrokeError> {
        self.draw(object_id, text.into(), style)
    }

    /// Writes the drawing and returns the path actually written.
    ///
    /// # Errors
    ///
    /// Returns [`PenstrokeError::NotInitialized`] outside the canvas lifetime,
    /// or an I/O or export error from the backend.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<PathBuf, PenstrokeError> {
        self.ensure_initialized()?;
        let written = self.backend.save(path.as_ref())?;
        info!(
            backend = self.kind().name(),
            path = written.display().to_string(),
            elements = self.element_count;
            "Drawing saved"
        );
        Ok(written)
    }

    /// Best-effort display of the drawing.
    ///
    /// # Errors
    ///
    /// Returns [`PenstrokeError::NotInitialized`] outside the canvas lifetime.
    pub fn show(&mut self) -> Result<(), PenstrokeError> {
        self.ensure_initialized()?;
        self.backend.show()
    }

    /// Releases backend resources. Idempotent.
    pub fn cleanup(&mut self) {
        if self.backend.is_initialized() {
            info!(backend = self.kind().name(); "Cleaning up canvas");
        }
        self.backend.cleanup();
    }
}

/// Why `primitive` cannot be drawn with `style`, if it cannot.
fn rejection(primitive: &Primitive, style: &Style) -> Option<&'static str> {
    if !style.is_valid() {
        return Some("invalid stroke width");
    }
    if !primitive.is_finite() {
        return Some("non-finite coordinates");
    }
    match primitive {
        Primitive::Polyline(polyline) if polyline.points().len() < 2 => Some("too few points"),
        Primitive::Polygon(polygon) if polygon.points().len() < 2 => Some("too few points"),
        Primitive::Path(path) => {
            let outline = Outline::from_data(path.data());
            if !outline.has_segments() {
                Some("no drawable segments")
            } else if !outline.is_finite() {
                Some("non-finite coordinates")
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Runs [`Canvas::cleanup`] when dropped.
///
/// Dereferences to the wrapped canvas, so drawing code uses it directly:
///
/// ```
/// use penstroke::{Canvas, Session, config::DrawingConfig};
///
/// let mut canvas = Canvas::create("plotter", DrawingConfig::default()).unwrap();
/// {
///     let mut session = Session::start(&mut canvas).unwrap();
///     session.add_code("box", r#"<rect width="20" height="20"/>"#).unwrap();
/// }
/// assert!(!canvas.is_initialized());
/// ```
pub struct Session<'a> {
    canvas: &'a mut Canvas,
}

impl<'a> Session<'a> {
    /// Initializes `canvas` and guards it until the session is dropped.
    ///
    /// # Errors
    ///
    /// Returns the error from [`Canvas::initialize`]; the canvas is cleaned up
    /// before returning.
    pub fn start(canvas: &'a mut Canvas) -> Result<Self, PenstrokeError> {
        let session = Self { canvas };
        session.canvas.initialize()?;
        Ok(session)
    }
}

impl Deref for Session<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        &*self.canvas
    }
}

impl DerefMut for Session<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        &mut *self.canvas
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.canvas.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use penstroke_core::geometry::Point;

    use super::*;

    fn canvas(kind: BackendKind) -> Canvas {
        let mut canvas = Canvas::new(kind, DrawingConfig::new(100, 100, "white"));
        canvas.initialize().unwrap();
        canvas
    }

    #[test]
    fn test_draw_before_initialize_fails() {
        let mut canvas = Canvas::new(BackendKind::Raster, DrawingConfig::default());
        let result = canvas.draw_circle("c", Circle::new(Point::new(1.0, 1.0), 1.0), &Style::default());
        assert!(matches!(result, Err(PenstrokeError::NotInitialized)));
        assert!(matches!(canvas.add_code("c", "<circle/>"), Err(PenstrokeError::NotInitialized)));
    }

    #[test]
    fn test_draw_after_cleanup_fails() {
        let mut canvas = canvas(BackendKind::Plotter);
        canvas.cleanup();
        canvas.cleanup();
        assert!(matches!(canvas.add_code("c", "<circle/>"), Err(PenstrokeError::NotInitialized)));
    }

    #[test]
    fn test_initialize_rejects_bad_config() {
        let mut canvas = Canvas::new(BackendKind::Vector, DrawingConfig::new(0, 10, "white"));
        assert!(matches!(canvas.initialize(), Err(PenstrokeError::Config(_))));
        assert!(!canvas.is_initialized());
    }

    #[test]
    fn test_baselines() {
        assert_eq!(canvas(BackendKind::Vector).element_count(), 1);
        assert_eq!(canvas(BackendKind::Raster).element_count(), 0);
        assert_eq!(canvas(BackendKind::Plotter).element_count(), 0);
    }

    #[test]
    fn test_rejections_do_not_count() {
        let mut canvas = canvas(BackendKind::Raster);
        let style = Style::default();

        let nan = Circle::new(Point::new(f32::NAN, 0.0), 3.0);
        assert!(!canvas.draw_circle("a", nan, &style).unwrap());

        let lonely = Polyline::new(vec![Point::new(1.0, 1.0)]);
        assert!(!canvas.draw_polyline("a", lonely, &style).unwrap());

        let no_segments = PathShape::new("M 5 5");
        assert!(!canvas.draw_path("a", no_segments, &style).unwrap());

        let overflow = PathShape::new(format!("M 10 10 L {} 20", "9".repeat(45)));
        assert!(!canvas.draw_path("a", overflow, &style).unwrap());

        let negative = Style::parse("red", "black", -2.0).unwrap();
        let ok = Circle::new(Point::new(5.0, 5.0), 3.0);
        assert!(!canvas.draw_circle("a", ok, &negative).unwrap());

        assert_eq!(canvas.element_count(), 0);
    }

    #[test]
    fn test_invisible_shape_counts() {
        let mut canvas = canvas(BackendKind::Raster);
        let added = canvas
            .add_code("ghost", r#"<rect width="5" height="5" fill="none" stroke="none"/>"#)
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(canvas.element_count(), 1);
    }

    #[test]
    fn test_groups_are_idempotent_and_ordered() {
        let mut canvas = canvas(BackendKind::Vector);
        canvas.get_or_create_group("b").unwrap();
        canvas.get_or_create_group("a").unwrap();
        canvas.get_or_create_group("b").unwrap();
        canvas.add_code("a", "<circle/><line/>").unwrap();

        let ids: Vec<_> = canvas.groups().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(canvas.group("a").unwrap().len(), 2);
        assert!(canvas.group("b").unwrap().is_empty());
        assert!(canvas.group("missing").is_none());
    }

    #[test]
    fn test_initialize_resets_state() {
        let mut canvas = canvas(BackendKind::Raster);
        canvas.add_code("a", "<circle/>").unwrap();
        canvas.initialize().unwrap();
        assert_eq!(canvas.element_count(), 0);
        assert_eq!(canvas.groups().count(), 0);
    }

    #[test]
    fn test_info() {
        let mut canvas = canvas(BackendKind::Plotter);
        canvas.add_code("a", "<circle/>").unwrap();
        let info = canvas.info();
        assert_eq!(
            info,
            CanvasInfo {
                width: 100,
                height: 100,
                background: "white".to_string(),
                backend: BackendKind::Plotter,
                element_count: 1,
            }
        );
    }

    #[test]
    fn test_supported_elements() {
        let canvas = Canvas::new(BackendKind::Vector, DrawingConfig::default());
        assert_eq!(
            canvas.supported_elements(),
            vec!["circle", "ellipse", "rect", "line", "polyline", "polygon", "path", "text"]
        );
    }

    #[test]
    fn test_session_cleans_up_on_drop() {
        let mut canvas = Canvas::new(BackendKind::Raster, DrawingConfig::default());
        {
            let mut session = Session::start(&mut canvas).unwrap();
            assert!(session.is_initialized());
            session.add_code("x", "<circle/>").unwrap();
        }
        assert!(!canvas.is_initialized());
    }
}
