//! # CLI UI Module
//!
//! Styling and formatting layer for docfix CLI output.
//!
//! ## Design Principles
//!
//! 1. **Scannable**: one prefixed line per document
//! 2. **Accessible**: works without colors (respects `NO_COLOR`)
//! 3. **Scriptable**: machine-parseable with `--json`
//!
//! ## Module Structure
//!
//! - `color`: Color mode detection and terminal capability checks
//! - `style`: Message types, prefixes, and styling functions
//! - `report`: Per-document lines and job summaries

pub mod color;
pub mod report;
pub mod style;

// Re-export main types for convenient access
pub use color::ColorMode;
pub use style::{MessageType, Style};
