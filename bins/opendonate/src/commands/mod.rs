//! Command implementations

pub mod centers;
pub mod community;
pub mod location;
pub mod stats;
