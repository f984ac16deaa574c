//! Output generation for settled searches.
//!
//! # Submodules
//!
//! - [`markdown`]: Renders results as a Markdown document for the terminal
//! - [`json`]: Writes a dated JSON report for other tools

pub mod json;
pub mod markdown;
