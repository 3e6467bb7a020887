//! Unified error handling for wadbreaker
//!
//! This module provides a single error type covering every failure mode of
//! the container parsers, the windowed source layer, and the codec engine.

use thiserror::Error;

/// Unified error type for all wadbreaker operations
#[derive(Error, Debug)]
pub enum Error {
    // ==================== I/O Errors ====================

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Container Errors ====================

    /// Invalid magic bytes at container start
    #[error("Invalid magic bytes: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        expected: Vec<u8>,
        found: Vec<u8>,
    },

    /// Stream ended before a required structural field
    #[error("Unexpected end of data at offset {offset}")]
    Truncated {
        offset: u64,
    },

    /// Structurally invalid container data
    #[error("Container corrupted: {message}")]
    ContainerCorrupted {
        message: String,
    },

    // ==================== Windowed Source Errors ====================

    /// Attempt to read past a windowed view's declared length
    #[error("Window bounds exceeded: requested {requested} bytes, {available} available")]
    WindowBounds {
        requested: u64,
        available: u64,
    },

    // ==================== Conversion Errors ====================

    /// Claimed source format failed its own detection predicate
    #[error("{location} does not conform to the {format} format")]
    FormatMismatch {
        format: String,
        location: String,
    },

    /// Requested conversion edge absent from the format graph
    #[error("Cannot convert {from} to {to}")]
    UnsupportedConversion {
        from: String,
        to: String,
    },

    // ==================== Codec Errors ====================

    /// Palette index beyond the decoded palette
    #[error("Palette index {index} out of range (palette has {palette_len} entries)")]
    PaletteIndexOutOfRange {
        index: usize,
        palette_len: usize,
    },

    /// Pixel grid dimensions do not match its pixel buffer
    #[error("Malformed pixel grid: {message}")]
    MalformedPixelGrid {
        message: String,
    },

    /// Error from the delegated raster codec
    #[error("Image codec error: {0}")]
    ImageCodec(String),

    // ==================== General Errors ====================

    /// Operation declared but intentionally unimplemented
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Result type using the unified Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a container corruption error
    pub fn corrupted(message: impl Into<String>) -> Self {
        Error::ContainerCorrupted {
            message: message.into(),
        }
    }

    /// Create a malformed pixel grid error
    pub fn malformed_grid(message: impl Into<String>) -> Self {
        Error::MalformedPixelGrid {
            message: message.into(),
        }
    }

    /// Check if this is a structural container parse error
    pub fn is_container_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidMagic { .. }
                | Error::Truncated { .. }
                | Error::ContainerCorrupted { .. }
        )
    }

    /// Check if this is a codec-level error
    pub fn is_codec_error(&self) -> bool {
        matches!(
            self,
            Error::PaletteIndexOutOfRange { .. }
                | Error::MalformedPixelGrid { .. }
                | Error::ImageCodec(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_container_error() {
        assert!(Error::InvalidMagic {
            expected: b"AGAR".to_vec(),
            found: b"ZZZZ".to_vec(),
        }
        .is_container_error());

        assert!(Error::Truncated { offset: 12 }.is_container_error());
        assert!(!Error::NotImplemented("compile").is_container_error());
    }

    #[test]
    fn test_is_codec_error() {
        assert!(Error::PaletteIndexOutOfRange {
            index: 300,
            palette_len: 16,
        }
        .is_codec_error());

        assert!(!Error::WindowBounds {
            requested: 10,
            available: 4,
        }
        .is_codec_error());
    }

    #[test]
    fn test_display_messages() {
        let err = Error::UnsupportedConversion {
            from: "WAD".to_string(),
            to: "PNG".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot convert WAD to PNG");
    }
}
