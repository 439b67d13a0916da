//! Terminal output for Open Donate tools
//!
//! - Status lines and headers
//! - Korean won and count formatting
//! - Text renderers for centers, locations, posts and statistics

#![warn(missing_docs)]

pub mod output;
pub mod render;

pub use output::{OutputFormat, Status};
