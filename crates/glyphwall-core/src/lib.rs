//! Glyphwall Core - Foundational types for the Glyphwall engine
//!
//! This crate provides the core types that all other Glyphwall crates depend on:
//! - `Color` - RGBA color with HSL construction for hue-rotating palettes
//! - `Rect` - Screen-space rectangles for surface clears
//! - `Vec2` - Re-exported 2D vector from `glam`
//! - Error types and Result alias

mod error;
mod types;

pub use error::{GlyphwallError, Result};
pub use glam::Vec2;
pub use types::{Color, Rect};
