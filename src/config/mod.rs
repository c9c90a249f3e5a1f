//! Configuration module for the assetbuild worker
//!
//! Provides types, parsing, and discovery for `assetbuild.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
