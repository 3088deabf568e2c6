//! Pen-plotter backend.
//!
//! Every primitive is lowered to pen motions in plotter space, where the
//! origin is the page center and y grows upward. Circles use a native sweep;
//! ellipses, rounded corners and path curves become straight segments.
//! Fills are brackets around the same motion used for the outline, so a
//! fill without a stroke is still traced with the pen down, using invisible
//! ink. The drawing is saved as Encapsulated PostScript.

mod pen;
mod postscript;

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, info};

use penstroke_core::{
    color::Paint,
    geometry::{Point, ellipse_points},
    shape::{Circle, Ellipse, Line, Path as PathShape, Polygon, Polyline, Rect, Text},
    style::Style,
};
use penstroke_parser::path::{PathSink, trace};

use super::{Backend, BackendKind, write_atomically};
use crate::{config::DrawingConfig, error::PenstrokeError};

use pen::Pen;

/// Straight segments used for a full ellipse.
const ELLIPSE_SEGMENTS: usize = 36;

/// Straight segments used for each rounded rectangle corner.
const CORNER_SEGMENTS: usize = ELLIPSE_SEGMENTS / 4;

/// Converts a canvas point (origin top-left, y down) to plotter space.
///
/// # Examples
///
/// ```
/// # use penstroke::{to_plotter, geometry::Point};
/// let p = to_plotter(Point::new(400.0, 100.0), 800, 800);
/// assert_eq!((p.x(), p.y()), (0.0, 300.0));
/// ```
pub fn to_plotter(point: Point, width: u32, height: u32) -> Point {
    Point::new(
        point.x() - width as f32 / 2.0,
        height as f32 / 2.0 - point.y(),
    )
}

/// Converts a plotter-space point back to canvas coordinates.
pub fn from_plotter(point: Point, width: u32, height: u32) -> Point {
    Point::new(
        point.x() + width as f32 / 2.0,
        height as f32 / 2.0 - point.y(),
    )
}

#[derive(Debug)]
struct Sheet {
    width: u32,
    height: u32,
    background: [f32; 3],
    pen: Pen,
}

impl Sheet {
    fn at(&self, point: Point) -> Point {
        to_plotter(point, self.width, self.height)
    }

    /// Traces `body` with the pen down, inside a fill bracket when `fill` is
    /// given. `start` is where the pen lands before the bracket opens.
    fn outline<F>(&mut self, start: Option<Point>, style: &Style, fill: Option<&Paint>, body: F)
    where
        F: FnOnce(&mut Pen),
    {
        let stroke = style.visible_stroke();
        if stroke.is_none() && fill.is_none() {
            return;
        }

        let pen = &mut self.pen;
        pen.pen_up();
        if let Some(start) = start {
            pen.goto(start);
        }
        match stroke {
            Some(paint) => {
                pen.pen_color(Some(paint.color().to_rgb_unit()));
                pen.pen_width(style.stroke_width());
            }
            None => pen.pen_color(None),
        }
        if let Some(paint) = fill {
            pen.fill_color(paint.color().to_rgb_unit());
        }

        pen.pen_down();
        if fill.is_some() {
            pen.begin_fill();
        }
        body(pen);
        if fill.is_some() {
            pen.end_fill();
        }
        pen.pen_up();
    }

    /// Traces straight segments through `points`, back to the first one
    /// when `closed`.
    fn polyline(&mut self, points: &[Point], closed: bool, style: &Style, fill: Option<&Paint>) {
        let points: Vec<Point> = points.iter().map(|p| self.at(*p)).collect();
        let Some(first) = points.first().copied() else {
            return;
        };
        self.outline(Some(first), style, fill, |pen| {
            for point in &points[1..] {
                pen.goto(*point);
            }
            if closed {
                pen.goto(first);
            }
        });
    }
}

/// Feeds path interpreter motion to the pen, converting coordinates.
struct PenTrace<'a> {
    pen: &'a mut Pen,
    width: u32,
    height: u32,
}

impl PathSink for PenTrace<'_> {
    fn move_to(&mut self, to: Point) {
        self.pen.jump(to_plotter(to, self.width, self.height));
    }

    fn line_to(&mut self, to: Point) {
        self.pen.goto(to_plotter(to, self.width, self.height));
    }

    fn close(&mut self, start: Point) {
        self.pen.goto(to_plotter(start, self.width, self.height));
    }
}

/// Records pen motion for later export.
#[derive(Debug, Default)]
pub struct PlotterBackend {
    sheet: Option<Sheet>,
}

impl PlotterBackend {
    #[cfg(test)]
    fn motions(&self) -> Option<&[pen::Motion]> {
        self.sheet.as_ref().map(|sheet| sheet.pen.motions())
    }

    /// Renders the current drawing as EPS.
    ///
    /// # Errors
    ///
    /// Returns [`PenstrokeError::NotInitialized`] before initialization, or an
    /// export error if the document cannot be formatted.
    pub fn to_postscript(&self) -> Result<String, PenstrokeError> {
        let sheet = self.sheet.as_ref().ok_or(PenstrokeError::NotInitialized)?;
        let document = postscript::render(
            sheet.width,
            sheet.height,
            sheet.background,
            sheet.pen.motions(),
        )?;
        Ok(document)
    }
}

/// Swaps any extension other than `.eps` for `.eps`.
fn eps_target(path: &Path) -> PathBuf {
    let is_eps = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("eps"));
    if is_eps {
        return path.to_path_buf();
    }
    let target = path.with_extension("eps");
    debug!(
        requested = path.display().to_string(),
        written = target.display().to_string();
        "Plotter output is PostScript, changing extension"
    );
    target
}

impl Backend for PlotterBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Plotter
    }

    fn initialize(&mut self, config: &DrawingConfig) -> Result<(), PenstrokeError> {
        self.sheet = Some(Sheet {
            width: config.width(),
            height: config.height(),
            background: config.background_color()?.to_rgb_unit(),
            pen: Pen::new(),
        });
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.sheet.is_some()
    }

    fn draw_circle(&mut self, _object_id: &str, circle: &Circle, style: &Style) {
        let Some(sheet) = self.sheet.as_mut() else {
            return;
        };
        let center = sheet.at(circle.center());
        let radius = circle.radius().abs();
        let bottom = center.sub_point(Point::new(0.0, radius));
        sheet.outline(Some(bottom), style, style.fill(), |pen| {
            pen.set_heading(0.0);
            pen.circle(radius);
        });
    }

    fn draw_ellipse(&mut self, _object_id: &str, ellipse: &Ellipse, style: &Style) {
        let Some(sheet) = self.sheet.as_mut() else {
            return;
        };
        let points = ellipse_points(
            ellipse.center(),
            ellipse.rx().abs(),
            ellipse.ry().abs(),
            ELLIPSE_SEGMENTS,
        );
        sheet.polyline(&points, true, style, style.fill());
    }

    fn draw_rect(&mut self, _object_id: &str, rect: &Rect, style: &Style) {
        if let Some(sheet) = self.sheet.as_mut() {
            sheet.polyline(&rect.outline(CORNER_SEGMENTS), true, style, style.fill());
        }
    }

    fn draw_line(&mut self, _object_id: &str, line: &Line, style: &Style) {
        if let Some(sheet) = self.sheet.as_mut() {
            sheet.polyline(&[line.start(), line.end()], false, style, None);
        }
    }

    fn draw_polyline(&mut self, _object_id: &str, polyline: &Polyline, style: &Style) {
        if let Some(sheet) = self.sheet.as_mut() {
            sheet.polyline(polyline.points(), false, style, style.fill());
        }
    }

    fn draw_polygon(&mut self, _object_id: &str, polygon: &Polygon, style: &Style) {
        if let Some(sheet) = self.sheet.as_mut() {
            sheet.polyline(polygon.points(), true, style, style.fill());
        }
    }

    fn draw_path(&mut self, object_id: &str, path: &PathShape, style: &Style) {
        let Some(sheet) = self.sheet.as_mut() else {
            return;
        };
        let (width, height) = (sheet.width, sheet.height);
        let mut report = None;
        sheet.outline(None, style, style.fill(), |pen| {
            let mut sink = PenTrace { pen, width, height };
            report = Some(trace(path.data(), &mut sink));
        });
        if let Some(report) = report {
            log::trace!(
                object_id,
                segments = report.segments,
                arcs = report.arcs;
                "Traced path"
            );
        }
    }

    fn draw_text(&mut self, _object_id: &str, text: &Text, style: &Style) {
        let Some(sheet) = self.sheet.as_mut() else {
            return;
        };
        let position = sheet.at(text.position());
        let ink = style
            .fill()
            .map_or([0.0, 0.0, 0.0], |paint| paint.color().to_rgb_unit());

        let pen = &mut sheet.pen;
        pen.pen_up();
        pen.goto(position);
        pen.pen_color(Some(ink));
        pen.write(text.content(), text.font_size_px());
    }

    fn save(&mut self, path: &Path) -> Result<PathBuf, PenstrokeError> {
        let document = self.to_postscript()?;
        let target = eps_target(path);
        write_atomically(&target, |file| {
            file.write_all(document.as_bytes())?;
            Ok(())
        })?;
        debug!(path = target.display().to_string(), bytes = document.len(); "PostScript written");
        Ok(target)
    }

    fn show(&mut self) -> Result<(), PenstrokeError> {
        let sheet = self.sheet.as_ref().ok_or(PenstrokeError::NotInitialized)?;
        info!(
            width = sheet.width,
            height = sheet.height,
            motions = sheet.pen.motions().len();
            "Plotter has no live display, save the drawing to inspect the pen trace"
        );
        Ok(())
    }

    fn cleanup(&mut self) {
        self.sheet = None;
    }
}
