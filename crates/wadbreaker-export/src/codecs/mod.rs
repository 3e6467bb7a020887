//! Raster codecs
//!
//! Each codec exposes `encode` (grid to bytes) and `decode` (bytes to
//! grid). Encoders are deterministic: the same grid always produces the
//! same byte stream.

pub mod raster;
pub mod shtx;
pub mod tga;
