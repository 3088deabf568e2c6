//! Error types for Penstroke operations.
//!
//! [`PenstrokeError`] covers the structural failures a caller has to handle:
//! a bad backend name or configuration, using a canvas outside its
//! initialized lifetime, and failures while writing artifacts. Problems in
//! the markup itself never show up here; the extractor skips bad elements.

use std::{fmt, io};

use thiserror::Error;

/// The main error type for Penstroke operations.
#[derive(Debug, Error)]
pub enum PenstrokeError {
    #[error("Unknown backend `{0}`, expected one of: vector, raster, plotter")]
    UnknownBackend(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Canvas is not initialized")]
    NotInitialized,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<image::ImageError> for PenstrokeError {
    fn from(error: image::ImageError) -> Self {
        Self::Export(Box::new(error))
    }
}

impl From<fmt::Error> for PenstrokeError {
    fn from(error: fmt::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl From<tempfile::PersistError> for PenstrokeError {
    fn from(error: tempfile::PersistError) -> Self {
        Self::Io(error.error)
    }
}
