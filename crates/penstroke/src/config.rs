//! Configuration types for Penstroke canvases.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration: which backend to use and the canvas settings.
//! - [`DrawingConfig`] - Canvas extent and background color.
//!
//! # Example
//!
//! ```
//! # use penstroke::{BackendKind, config::AppConfig};
//! let config = AppConfig::default();
//! assert_eq!(config.backend(), BackendKind::Raster);
//! assert_eq!(config.canvas().width(), 800);
//! assert!(config.canvas().validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use penstroke_core::color::Color;

use crate::{backend::BackendKind, error::PenstrokeError};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Backend used when none is requested explicitly.
    #[serde(default)]
    backend: BackendKind,

    /// Canvas settings section.
    #[serde(default)]
    canvas: DrawingConfig,
}

impl AppConfig {
    pub fn new(backend: BackendKind, canvas: DrawingConfig) -> Self {
        Self { backend, canvas }
    }

    /// Returns the configured backend.
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Returns the canvas configuration.
    pub fn canvas(&self) -> &DrawingConfig {
        &self.canvas
    }

    /// Replaces the backend (builder style).
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Replaces the canvas configuration (builder style).
    pub fn with_canvas(mut self, canvas: DrawingConfig) -> Self {
        self.canvas = canvas;
        self
    }
}

/// Canvas extent in pixels and the background color.
///
/// Fixed for the lifetime of a canvas. Missing fields fall back to an
/// 800x800 white canvas.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DrawingConfig {
    width: u32,
    height: u32,
    background: String,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            background: "white".to_string(),
        }
    }
}

impl DrawingConfig {
    pub fn new(width: u32, height: u32, background: impl Into<String>) -> Self {
        Self {
            width,
            height,
            background: background.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The background color as written in configuration.
    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Returns the parsed background [`Color`].
    ///
    /// # Errors
    ///
    /// Returns [`PenstrokeError::Config`] if the background is not a CSS color.
    pub fn background_color(&self) -> Result<Color, PenstrokeError> {
        Color::new(self.background.trim())
            .map_err(|err| PenstrokeError::Config(format!("Invalid background color: {err}")))
    }

    /// Checks that the canvas has a non-zero extent and a usable background.
    ///
    /// # Errors
    ///
    /// Returns [`PenstrokeError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<(), PenstrokeError> {
        if self.width == 0 || self.height == 0 {
            return Err(PenstrokeError::Config(format!(
                "Canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        self.background_color()?;
        Ok(())
    }
}
