//! Penstroke Core Types
//!
//! This crate provides the value types shared by the Penstroke markup parser
//! and its rendering backends:
//!
//! - **Colors**: CSS color parsing and markup paints ([`color::Color`], [`color::Paint`])
//! - **Geometry**: Points in SVG coordinate space ([`geometry`] module)
//! - **Style**: Fill/stroke settings ([`style::Style`])
//! - **Shapes**: The eight supported primitives ([`shape`] module)

pub mod color;
pub mod geometry;
pub mod shape;
pub mod style;
