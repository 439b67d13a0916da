//! Configuration loading and schema definitions
//!
//! Shared configuration types used by the library crates and the CLI.

mod loader;
mod schema;

pub use loader::{Config, ENV_KAKAO_API_KEY, ENV_KAKAO_URL, ENV_NOMINATIM_URL};
pub use schema::*;
