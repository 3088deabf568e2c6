//! SVG document backend.
//!
//! Every primitive maps onto a native SVG element, so this is the only
//! backend with exact curves, arcs and rounded corners. Each object id is a
//! `<g>` group painted in creation order on top of a background rectangle.

mod groups;
mod nodes;

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, info};
use svg::{Document, node::element::Rectangle};

use penstroke_core::{
    shape::{Circle, Ellipse, Line, Path as PathShape, Polygon, Polyline, Rect, Text},
    style::Style,
};

use super::{Backend, BackendKind, write_atomically, write_preview};
use crate::{config::DrawingConfig, error::PenstrokeError};

use groups::GroupedOutput;

#[derive(Debug)]
struct Page {
    width: u32,
    height: u32,
    background: String,
    output: GroupedOutput,
}

impl Page {
    fn document(&self) -> Document {
        let background = Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", self.width)
            .set("height", self.height)
            .set("fill", self.background.as_str());

        self.output.render().into_iter().fold(
            Document::new()
                .set("width", format!("{}px", self.width))
                .set("height", format!("{}px", self.height))
                .set("viewBox", format!("0 0 {} {}", self.width, self.height))
                .add(background),
            |doc, group| doc.add(group),
        )
    }
}

/// Builds an SVG document in memory.
#[derive(Debug, Default)]
pub struct VectorBackend {
    page: Option<Page>,
}

impl VectorBackend {
    fn add(&mut self, object_id: &str, node: groups::SvgNode) {
        if let Some(page) = self.page.as_mut() {
            page.output.add_to_group(object_id, node);
        }
    }

    /// Serializes the current drawing, if initialized.
    pub fn to_markup(&self) -> Option<String> {
        self.page.as_ref().map(|page| page.document().to_string())
    }
}

impl Backend for VectorBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Vector
    }

    fn initialize(&mut self, config: &DrawingConfig) -> Result<(), PenstrokeError> {
        self.page = Some(Page {
            width: config.width(),
            height: config.height(),
            background: config.background().trim().to_string(),
            output: GroupedOutput::new(),
        });
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.page.is_some()
    }

    /// The background rectangle.
    fn baseline_count(&self) -> usize {
        1
    }

    fn open_group(&mut self, object_id: &str) {
        if let Some(page) = self.page.as_mut() {
            page.output.open_group(object_id);
        }
    }

    fn draw_circle(&mut self, object_id: &str, circle: &Circle, style: &Style) {
        self.add(object_id, nodes::circle(circle, style));
    }

    fn draw_ellipse(&mut self, object_id: &str, ellipse: &Ellipse, style: &Style) {
        self.add(object_id, nodes::ellipse(ellipse, style));
    }

    fn draw_rect(&mut self, object_id: &str, rect: &Rect, style: &Style) {
        self.add(object_id, nodes::rect(rect, style));
    }

    fn draw_line(&mut self, object_id: &str, line: &Line, style: &Style) {
        self.add(object_id, nodes::line(line, style));
    }

    fn draw_polyline(&mut self, object_id: &str, polyline: &Polyline, style: &Style) {
        self.add(object_id, nodes::polyline(polyline, style));
    }

    fn draw_polygon(&mut self, object_id: &str, polygon: &Polygon, style: &Style) {
        self.add(object_id, nodes::polygon(polygon, style));
    }

    fn draw_path(&mut self, object_id: &str, path: &PathShape, style: &Style) {
        self.add(object_id, nodes::path(path, style));
    }

    fn draw_text(&mut self, object_id: &str, text: &Text, style: &Style) {
        self.add(object_id, nodes::text(text, style));
    }

    fn save(&mut self, path: &Path) -> Result<PathBuf, PenstrokeError> {
        let markup = self.to_markup().ok_or(PenstrokeError::NotInitialized)?;
        write_atomically(path, |file| {
            file.write_all(markup.as_bytes())?;
            Ok(())
        })?;
        debug!(path = path.display().to_string(), bytes = markup.len(); "SVG written");
        Ok(path.to_path_buf())
    }

    fn show(&mut self) -> Result<(), PenstrokeError> {
        let markup = self.to_markup().ok_or(PenstrokeError::NotInitialized)?;
        let preview = write_preview("svg", markup.as_bytes())?;
        info!(path = preview.display().to_string(); "SVG preview written, open it in a browser");
        Ok(())
    }

    fn cleanup(&mut self) {
        self.page = None;
    }
}
