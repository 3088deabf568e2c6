//! Bitmap backend.
//!
//! Shapes are painted immediately onto a tiny-skia pixmap with anti-aliasing:
//! fill first, then the stroke centered on the outline. Curves in path data
//! are flattened to their end points. Every path subpath is filled as if
//! closed, using the even-odd rule, and stroked exactly as traced. A polyline
//! with a fill is filled as a closed polygon and then stroked as an open line.

mod text;

use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use image::{ImageFormat, Rgb, RgbImage};
use log::{debug, info, warn};
use tiny_skia::{
    Color as SkiaColor, FillRule, LineJoin, Paint as SkiaPaint, Path as SkiaPath, PathBuilder,
    Pixmap, Rect as SkiaRect, Stroke, Transform,
};

use penstroke_core::{
    color::Paint,
    geometry::Point,
    shape::{Circle, Ellipse, Line, Path as PathShape, Polygon, Polyline, Rect, Text},
    style::Style,
};
use penstroke_parser::path::Outline;

use super::{Backend, BackendKind, write_atomically, write_preview};
use crate::{config::DrawingConfig, error::PenstrokeError};

/// Thinnest stroke that still covers a pixel row.
const MIN_STROKE_WIDTH: f32 = 1.0;

/// Straight segments used to flatten one rounded rectangle corner.
fn corner_segments(radius: f32) -> usize {
    (radius.ceil() as usize / 4).clamp(6, 180)
}

fn solid(paint: &Paint) -> SkiaPaint<'static> {
    let [r, g, b, a] = paint.color().to_rgba8();
    let mut solid = SkiaPaint::default();
    solid.set_color_rgba8(r, g, b, a);
    solid
}

/// Appends `points` as one subpath, closing it when `close` is set.
fn push_points(builder: &mut PathBuilder, points: &[Point], close: bool) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    builder.move_to(first.x(), first.y());
    for point in rest {
        builder.line_to(point.x(), point.y());
    }
    if close {
        builder.close();
    }
}

fn polyline_path(points: &[Point], close: bool) -> Option<SkiaPath> {
    let mut builder = PathBuilder::new();
    push_points(&mut builder, points, close);
    builder.finish()
}

fn oval_path(center: Point, rx: f32, ry: f32) -> Option<SkiaPath> {
    let bounds = SkiaRect::from_ltrb(
        center.x() - rx,
        center.y() - ry,
        center.x() + rx,
        center.y() + ry,
    )?;
    PathBuilder::from_oval(bounds)
}

fn rect_path(rect: &Rect) -> Option<SkiaPath> {
    let segments = rect
        .corner_radii()
        .map_or(1, |(rx, ry)| corner_segments(rx.max(ry)));
    polyline_path(&rect.outline(segments), true)
}

/// Paints primitives onto an in-memory pixmap.
#[derive(Debug, Default)]
pub struct RasterBackend {
    pixmap: Option<Pixmap>,
}

impl RasterBackend {
    /// The current pixmap, if initialized.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// The current drawing as an opaque RGB image, if initialized.
    pub fn to_image(&self) -> Option<RgbImage> {
        self.pixmap.as_ref().map(flatten)
    }

    fn fill(&mut self, paint: Option<&Paint>, path: Option<SkiaPath>) {
        let (Some(pixmap), Some(paint), Some(path)) = (self.pixmap.as_mut(), paint, path) else {
            return;
        };
        pixmap.fill_path(
            &path,
            &solid(paint),
            FillRule::EvenOdd,
            Transform::identity(),
            None,
        );
    }

    fn stroke(&mut self, style: &Style, path: Option<SkiaPath>) {
        let (Some(pixmap), Some(paint), Some(path)) =
            (self.pixmap.as_mut(), style.visible_stroke(), path)
        else {
            return;
        };
        let stroke = Stroke {
            width: style.stroke_width().max(MIN_STROKE_WIDTH),
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &solid(paint), &stroke, Transform::identity(), None);
    }
}

/// Drops alpha from the demultiplied pixels.
fn flatten(pixmap: &Pixmap) -> RgbImage {
    RgbImage::from_fn(pixmap.width(), pixmap.height(), |x, y| {
        let color = pixmap
            .pixel(x, y)
            .map_or([0, 0, 0], |pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue()]
            });
        Rgb(color)
    })
}

/// Picks the image format for `path`, falling back to PNG.
fn output_target(path: &Path) -> (PathBuf, ImageFormat) {
    match ImageFormat::from_path(path) {
        Ok(format) if format.writing_enabled() => (path.to_path_buf(), format),
        _ => {
            let target = path.with_extension("png");
            debug!(
                requested = path.display().to_string(),
                written = target.display().to_string();
                "Unsupported raster extension, writing PNG"
            );
            (target, ImageFormat::Png)
        }
    }
}

impl Backend for RasterBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Raster
    }

    fn initialize(&mut self, config: &DrawingConfig) -> Result<(), PenstrokeError> {
        let [r, g, b, a] = config.background_color()?.to_rgba8();
        let (width, height) = (config.width(), config.height());
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            PenstrokeError::Config(format!("{width}x{height} is too large for a bitmap"))
        })?;
        pixmap.fill(SkiaColor::from_rgba8(r, g, b, a));
        self.pixmap = Some(pixmap);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.pixmap.is_some()
    }

    fn draw_circle(&mut self, _object_id: &str, circle: &Circle, style: &Style) {
        let center = circle.center();
        let path = PathBuilder::from_circle(center.x(), center.y(), circle.radius().abs());
        self.fill(style.fill(), path.clone());
        self.stroke(style, path);
    }

    fn draw_ellipse(&mut self, _object_id: &str, ellipse: &Ellipse, style: &Style) {
        let path = oval_path(ellipse.center(), ellipse.rx().abs(), ellipse.ry().abs());
        self.fill(style.fill(), path.clone());
        self.stroke(style, path);
    }

    fn draw_rect(&mut self, _object_id: &str, rect: &Rect, style: &Style) {
        let path = rect_path(rect);
        self.fill(style.fill(), path.clone());
        self.stroke(style, path);
    }

    fn draw_line(&mut self, _object_id: &str, line: &Line, style: &Style) {
        self.stroke(style, polyline_path(&[line.start(), line.end()], false));
    }

    fn draw_polyline(&mut self, _object_id: &str, polyline: &Polyline, style: &Style) {
        let points = polyline.points();
        if points.len() >= 3 {
            self.fill(style.fill(), polyline_path(points, true));
        }
        self.stroke(style, polyline_path(points, false));
    }

    fn draw_polygon(&mut self, _object_id: &str, polygon: &Polygon, style: &Style) {
        let path = polyline_path(polygon.points(), true);
        self.fill(style.fill(), path.clone());
        self.stroke(style, path);
    }

    fn draw_path(&mut self, object_id: &str, path: &PathShape, style: &Style) {
        let outline = Outline::from_data(path.data());
        log::trace!(object_id, subpaths = outline.subpaths().len(); "Flattened path");

        let mut fill = PathBuilder::new();
        let mut stroke = PathBuilder::new();
        for subpath in outline.subpaths() {
            if subpath.points().len() >= 3 {
                push_points(&mut fill, subpath.points(), true);
            }
            push_points(&mut stroke, subpath.points(), false);
        }
        self.fill(style.fill(), fill.finish());
        self.stroke(style, stroke.finish());
    }

    fn draw_text(&mut self, object_id: &str, shape: &Text, style: &Style) {
        let (Some(pixmap), Some(fill)) = (self.pixmap.as_mut(), style.fill()) else {
            return;
        };
        let drawn = text::draw_text(
            pixmap,
            shape.position(),
            shape.content(),
            f32::from(shape.font_size_px()),
            fill.color().to_rgba8(),
        );
        if !drawn && !shape.content().trim().is_empty() {
            warn!(object_id; "No glyphs rendered, is a system font installed?");
        }
    }

    fn save(&mut self, path: &Path) -> Result<PathBuf, PenstrokeError> {
        let pixels = self.to_image().ok_or(PenstrokeError::NotInitialized)?;
        let (target, format) = output_target(path);

        write_atomically(&target, |file| {
            pixels.write_to(file, format)?;
            Ok(())
        })?;
        debug!(path = target.display().to_string(), format:?; "Bitmap written");
        Ok(target)
    }

    fn show(&mut self) -> Result<(), PenstrokeError> {
        let pixels = self.to_image().ok_or(PenstrokeError::NotInitialized)?;
        let mut encoded = Cursor::new(Vec::new());
        pixels.write_to(&mut encoded, ImageFormat::Png)?;

        let preview = write_preview("png", encoded.get_ref())?;
        info!(path = preview.display().to_string(); "Bitmap preview written");
        Ok(())
    }

    fn cleanup(&mut self) {
        self.pixmap = None;
    }
}
