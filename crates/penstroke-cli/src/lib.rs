//! Penstroke CLI library
//!
//! This module contains the core CLI logic for the Penstroke drawing tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use error_adapter::ErrorAdapter;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};

use penstroke::{
    BackendKind, Canvas, PenstrokeError, Session,
    config::{AppConfig, DrawingConfig},
};

/// Applies command-line overrides on top of the loaded configuration.
fn resolve(
    args: &Args,
    app_config: AppConfig,
) -> Result<(BackendKind, DrawingConfig), PenstrokeError> {
    let backend = match &args.backend {
        Some(name) => name.parse()?,
        None => app_config.backend(),
    };

    let mut canvas = app_config.canvas().clone();
    if let Some(width) = args.width {
        canvas = canvas.with_width(width);
    }
    if let Some(height) = args.height {
        canvas = canvas.with_height(height);
    }
    if let Some(background) = &args.background {
        canvas = canvas.with_background(background.as_str());
    }
    Ok((backend, canvas))
}

/// Object id for an input file: its stem, or the whole path if it has none.
fn object_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Run the Penstroke CLI application
///
/// Every input file is drawn as one object on a single canvas, which is then
/// saved to the output path and optionally shown.
///
/// Returns the path actually written, whose extension may differ from the
/// requested one.
///
/// # Errors
///
/// Returns `PenstrokeError` for:
/// - Unknown backend names
/// - Configuration loading and validation errors
/// - File I/O errors
/// - Export errors
pub fn run(args: &Args) -> Result<PathBuf, PenstrokeError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let (backend, drawing_config) = resolve(args, app_config)?;

    info!(
        backend = backend.name(),
        inputs = args.inputs.len(),
        output_path = args.output.as_str();
        "Processing drawing"
    );

    let mut canvas = Canvas::new(backend, drawing_config);
    let mut session = Session::start(&mut canvas)?;

    for input in &args.inputs {
        let code = fs::read_to_string(input)?;
        let object_id = object_id(Path::new(input));
        let added = session.add_code(&object_id, &code)?;
        if added == 0 {
            warn!(input_path = input.as_str(); "Input produced no drawable elements");
        }
    }

    let written = session.save(&args.output)?;
    if args.show {
        session.show()?;
    }

    info!(
        output_file = written.display().to_string(),
        elements = session.element_count();
        "Drawing exported successfully"
    );
    Ok(written)
}
