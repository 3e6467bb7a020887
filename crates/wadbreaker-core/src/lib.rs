//! wadbreaker-core
//!
//! Shared error type and pixel/color primitives used by the rest of the
//! wadbreaker crates.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{PixelGrid, Rgba};
