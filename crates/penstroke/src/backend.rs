//! Drawing backends.
//!
//! A [`Backend`] turns validated primitives into marks on one output medium.
//! The [`Canvas`](crate::Canvas) owns the bookkeeping shared by all of them
//! (element count, per-object groups, input validation) and forwards each
//! accepted primitive to the backend selected by [`BackendKind`].

mod plotter;
mod raster;
mod vector;

use std::{
    fmt,
    fs,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use penstroke_core::{
    shape::{Circle, Ellipse, Line, Path as PathShape, Polygon, Polyline, Rect, Text},
    style::Style,
};

use crate::{config::DrawingConfig, error::PenstrokeError};

pub use plotter::{PlotterBackend, to_plotter, from_plotter};
pub use raster::RasterBackend;
pub use vector::VectorBackend;

/// The available output media.
///
/// Parsing accepts the canonical names and the aliases `svg`, `pillow`/`png`
/// and `turtle`:
///
/// ```
/// # use penstroke::BackendKind;
/// assert_eq!("svg".parse::<BackendKind>().unwrap(), BackendKind::Vector);
/// assert_eq!("Turtle".parse::<BackendKind>().unwrap(), BackendKind::Plotter);
/// assert!("vektor".parse::<BackendKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// SVG document output.
    #[serde(alias = "svg")]
    Vector,
    /// Bitmap output.
    #[default]
    #[serde(alias = "pillow", alias = "png")]
    Raster,
    /// Pen motions saved as Encapsulated PostScript.
    #[serde(alias = "turtle")]
    Plotter,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [Self::Vector, Self::Raster, Self::Plotter];

    /// Canonical backend name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::Raster => "raster",
            Self::Plotter => "plotter",
        }
    }

    /// File extension of the artifact `save` writes by default.
    pub fn default_extension(self) -> &'static str {
        match self {
            Self::Vector => "svg",
            Self::Raster => "png",
            Self::Plotter => "eps",
        }
    }

    /// Creates an uninitialized backend of this kind.
    pub(crate) fn create(self) -> Box<dyn Backend> {
        match self {
            Self::Vector => Box::new(VectorBackend::default()),
            Self::Raster => Box::new(RasterBackend::default()),
            Self::Plotter => Box::new(PlotterBackend::default()),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = PenstrokeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vector" | "svg" => Ok(Self::Vector),
            "raster" | "pillow" | "png" => Ok(Self::Raster),
            "plotter" | "turtle" => Ok(Self::Plotter),
            _ => Err(PenstrokeError::UnknownBackend(s.to_string())),
        }
    }
}

/// One output medium.
///
/// Draw methods receive primitives the canvas has already validated: all
/// numbers are finite, the stroke width is non-negative and point lists are
/// non-empty. They are only called between `initialize` and `cleanup`.
pub trait Backend {
    fn kind(&self) -> BackendKind;

    /// Allocates the backing store and paints the background.
    ///
    /// Calling it again starts a fresh drawing.
    fn initialize(&mut self, config: &DrawingConfig) -> Result<(), PenstrokeError>;

    fn is_initialized(&self) -> bool;

    /// Elements present on a freshly initialized canvas.
    fn baseline_count(&self) -> usize {
        0
    }

    /// Called when a canvas creates the group for `object_id`.
    fn open_group(&mut self, _object_id: &str) {}

    fn draw_circle(&mut self, object_id: &str, circle: &Circle, style: &Style);
    fn draw_ellipse(&mut self, object_id: &str, ellipse: &Ellipse, style: &Style);
    fn draw_rect(&mut self, object_id: &str, rect: &Rect, style: &Style);
    fn draw_line(&mut self, object_id: &str, line: &Line, style: &Style);
    fn draw_polyline(&mut self, object_id: &str, polyline: &Polyline, style: &Style);
    fn draw_polygon(&mut self, object_id: &str, polygon: &Polygon, style: &Style);
    fn draw_path(&mut self, object_id: &str, path: &PathShape, style: &Style);
    fn draw_text(&mut self, object_id: &str, text: &Text, style: &Style);

    /// Writes the drawing to `path` and returns the path actually written,
    /// which may differ in extension.
    fn save(&mut self, path: &Path) -> Result<PathBuf, PenstrokeError>;

    /// Best-effort display of the current drawing.
    fn show(&mut self) -> Result<(), PenstrokeError>;

    /// Releases the backing store. Safe to call any number of times.
    fn cleanup(&mut self);
}

/// Writes a file through a temporary sibling so a failed export never leaves
/// a truncated artifact at `path`.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<(), PenstrokeError>
where
    F: FnOnce(&mut tempfile::NamedTempFile) -> Result<(), PenstrokeError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    write(&mut file)?;
    file.flush()?;
    file.persist(path)?;
    Ok(())
}

/// Writes `contents` to a kept temporary file and returns its path.
pub(crate) fn write_preview(extension: &str, contents: &[u8]) -> Result<PathBuf, PenstrokeError> {
    let mut file = tempfile::Builder::new()
        .prefix("penstroke-preview-")
        .suffix(&format!(".{extension}"))
        .tempfile()?;
    file.write_all(contents)?;
    let (_, path) = file.keep().map_err(|err| PenstrokeError::Io(err.error))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_aliases() {
        for (name, kind) in [
            ("vector", BackendKind::Vector),
            ("SVG", BackendKind::Vector),
            ("raster", BackendKind::Raster),
            ("pillow", BackendKind::Raster),
            ("png", BackendKind::Raster),
            ("plotter", BackendKind::Plotter),
            (" turtle ", BackendKind::Plotter),
        ] {
            assert_eq!(name.parse::<BackendKind>().unwrap(), kind, "name: {name}");
        }
    }

    #[test]
    fn test_unknown_backend() {
        let err = "vektor".parse::<BackendKind>().unwrap_err();
        assert!(matches!(err, PenstrokeError::UnknownBackend(ref name) if name == "vektor"));
    }

    #[test]
    fn test_default_is_raster() {
        assert_eq!(BackendKind::default(), BackendKind::Raster);
    }

    #[test]
    fn test_created_backends_start_uninitialized() {
        for kind in BackendKind::ALL {
            let backend = kind.create();
            assert_eq!(backend.kind(), kind);
            assert!(!backend.is_initialized());
        }
    }

    #[test]
    fn test_write_atomically_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out.txt");
        write_atomically(&target, |file| {
            file.write_all(b"hello")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), "hello");
    }
}
