//! Penstroke - draw SVG-like markup on vector, raster and pen-plotter canvases.
//!
//! A [`Canvas`] takes loosely structured markup (as produced by an
//! unreliable generator), extracts the eight supported elements and draws
//! them on one of three backends:
//!
//! - [`BackendKind::Vector`] builds an SVG document with one group per object.
//! - [`BackendKind::Raster`] paints a bitmap and saves PNG, JPEG or BMP.
//! - [`BackendKind::Plotter`] records pen motion and saves Encapsulated
//!   PostScript.
//!
//! # Examples
//!
//! ```
//! use penstroke::{BackendKind, Canvas, Session, config::DrawingConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut canvas = Canvas::new(BackendKind::Vector, DrawingConfig::default());
//!
//! let mut session = Session::start(&mut canvas).unwrap();
//! let added = session
//!     .add_code(
//!         "face",
//!         r#"<circle cx="400" cy="400" r="50" fill="red" stroke="black" stroke-width="2"/>
//!            <text x="360" y="480" font-size="24px">Hello</text>"#,
//!     )
//!     .unwrap();
//! assert_eq!(added, 2);
//!
//! let written = session.save(dir.path().join("face.svg")).unwrap();
//! assert!(written.exists());
//! ```

pub mod config;

mod backend;
mod canvas;
mod error;

pub use penstroke_core::{color, geometry, shape, style};
pub use penstroke_parser as parser;

pub use backend::{
    Backend, BackendKind, PlotterBackend, RasterBackend, VectorBackend, from_plotter, to_plotter,
};
pub use canvas::{Canvas, CanvasInfo, Session};
pub use error::PenstrokeError;
