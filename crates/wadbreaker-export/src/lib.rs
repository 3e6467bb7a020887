//! wadbreaker-export
//!
//! Texture codecs and the format conversion engine. The codecs translate
//! between on-disk raster formats and the in-memory [`PixelGrid`]; the
//! engine wires them together along the registry's conversion graph.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wadbreaker_export::convert::{convert_to_bytes, ConvertParams};
//! use wadbreaker_parsers::FormatKind;
//! use wadbreaker_vfs::FileSource;
//!
//! let source = Arc::new(FileSource::new("title.shtx")?);
//! let png = convert_to_bytes(
//!     FormatKind::Shtx,
//!     FormatKind::Png,
//!     source.as_ref(),
//!     &ConvertParams::new(),
//! )?;
//! ```
//!
//! [`PixelGrid`]: wadbreaker_core::PixelGrid

pub mod codecs;
pub mod convert;
pub mod report;

pub use convert::{convert, convert_to_bytes, default_target, ConvertParams};
pub use report::{convert_batch, identify_batch, ConvertReport, IdentifyReport};
