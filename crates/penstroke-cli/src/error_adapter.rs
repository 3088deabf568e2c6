//! Error adapter for converting PenstrokeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Markup problems
//! never reach this point (the extractor skips bad elements), so every error
//! is rendered as a single report with a code and, where useful, a hint.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use penstroke::PenstrokeError;

/// Adapter giving a [`PenstrokeError`] a diagnostic code and help text.
pub struct ErrorAdapter<'a>(pub &'a PenstrokeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            PenstrokeError::UnknownBackend(_) => "penstroke::backend",
            PenstrokeError::Config(_) => "penstroke::config",
            PenstrokeError::NotInitialized => "penstroke::canvas",
            PenstrokeError::Io(_) => "penstroke::io",
            PenstrokeError::Export(_) => "penstroke::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            PenstrokeError::UnknownBackend(_) => {
                "Use one of: vector (svg), raster (pillow, png), plotter (turtle)"
            }
            PenstrokeError::Config(_) => {
                "Check the --width/--height/--background flags and the [canvas] section of the configuration file"
            }
            PenstrokeError::Export(_) => {
                "The raster backend writes .png, .jpg or .bmp; other extensions are saved as PNG"
            }
            PenstrokeError::NotInitialized | PenstrokeError::Io(_) => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
