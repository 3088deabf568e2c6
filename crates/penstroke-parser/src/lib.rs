//! Tolerant markup reader for Penstroke.
//!
//! Turns SVG-like text, typically produced by a language model and often
//! wrapped in prose, into styled [`penstroke_core`] primitives. The reader is
//! deliberately forgiving: unknown tags and stray text are ignored, and an
//! element whose attributes cannot be decoded is skipped on its own.
//!
//! - [`extract`] finds elements in markup.
//! - [`points::parse_points`] reads `points` lists.
//! - [`path::trace`] interprets path data against a [`path::PathSink`].

pub mod attributes;
pub mod extract;
pub mod lexer;
pub mod path;
pub mod points;

pub use extract::{CoercionError, Element, Extraction, SkippedElement, extract};
