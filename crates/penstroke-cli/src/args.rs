//! Command-line argument definitions for the Penstroke CLI.
//!
//! Flags given here override values from the configuration file.

use clap::Parser;

/// Command-line arguments for the Penstroke drawing tool
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Markup files to draw; each file becomes one object named after its stem
    #[arg(required = true, help = "Paths to the input markup files")]
    pub inputs: Vec<String>,

    /// Path to the output file
    #[arg(short, long, default_value = "out.png")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Backend: vector (svg), raster (pillow, png) or plotter (turtle)
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Canvas width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Canvas background color
    #[arg(long)]
    pub background: Option<String>,

    /// Display the drawing after saving it
    #[arg(long)]
    pub show: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Arguments for drawing `inputs` into `output` with every other option
    /// left at its default.
    pub fn new(inputs: Vec<String>, output: impl Into<String>) -> Self {
        Self {
            inputs,
            output: output.into(),
            config: None,
            backend: None,
            width: None,
            height: None,
            background: None,
            show: false,
            log_level: "info".to_string(),
        }
    }
}
