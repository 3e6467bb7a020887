//! Format conversion engine
//!
//! `convert` walks one edge of the registry's conversion graph: it checks
//! the edge exists, verifies the source actually is what the caller claims,
//! decodes to a [`PixelGrid`], and re-encodes as the target.
//!
//! [`PixelGrid`]: wadbreaker_core::PixelGrid

use std::collections::HashMap;
use std::io::Write;

use serde_json::Value;
use tracing::info;

use wadbreaker_core::{Error, PixelGrid, Result};
use wadbreaker_parsers::FormatKind;
use wadbreaker_vfs::DataSource;

use crate::codecs::{raster, shtx, tga};

/// Free-form conversion parameters keyed by name.
///
/// Recognized keys: `"quality"` (integer 1-100) for JPEG targets. Unknown
/// keys are ignored.
pub type ConvertParams = HashMap<String, Value>;

/// Preferred conversion target for a format, if it has any
pub fn default_target(from: FormatKind) -> Option<FormatKind> {
    from.conversions().first().copied()
}

/// Convert a source from one format to another, writing to `sink`.
///
/// Fails with `UnsupportedConversion` when the graph has no direct edge,
/// and with `FormatMismatch` when the source fails the claimed format's
/// detection predicate. Nothing is written to the sink on failure.
pub fn convert(
    from: FormatKind,
    to: FormatKind,
    source: &dyn DataSource,
    sink: &mut dyn Write,
    params: &ConvertParams,
) -> Result<()> {
    let bytes = convert_to_bytes(from, to, source, params)?;
    sink.write_all(&bytes)?;
    Ok(())
}

/// Convert a source from one format to another, returning the bytes
pub fn convert_to_bytes(
    from: FormatKind,
    to: FormatKind,
    source: &dyn DataSource,
    params: &ConvertParams,
) -> Result<Vec<u8>> {
    if !from.can_convert(to) {
        return Err(Error::UnsupportedConversion {
            from: from.name().to_string(),
            to: to.name().to_string(),
        });
    }
    if !from.detect(source) {
        return Err(Error::FormatMismatch {
            format: from.name().to_string(),
            location: source.location(),
        });
    }

    let data = source.read_all()?;
    let grid = decode_raster(from, &data)?;
    let out = encode_raster(to, &grid, params)?;

    info!(
        from = from.name(),
        to = to.name(),
        location = %source.location(),
        bytes = out.len(),
        "converted"
    );
    Ok(out)
}

fn decode_raster(format: FormatKind, data: &[u8]) -> Result<PixelGrid> {
    match format {
        FormatKind::Shtx => shtx::decode(data),
        FormatKind::Tga => tga::decode(data),
        FormatKind::Png => raster::decode_png(data),
        FormatKind::Jpeg => raster::decode_jpeg(data),
        other => Err(Error::UnsupportedConversion {
            from: other.name().to_string(),
            to: "pixel data".to_string(),
        }),
    }
}

fn encode_raster(format: FormatKind, grid: &PixelGrid, params: &ConvertParams) -> Result<Vec<u8>> {
    match format {
        FormatKind::Shtx => shtx::encode(grid),
        FormatKind::Tga => tga::encode(grid),
        FormatKind::Png => raster::encode_png(grid),
        FormatKind::Jpeg => raster::encode_jpeg(grid, jpeg_quality(params)),
        other => Err(Error::UnsupportedConversion {
            from: "pixel data".to_string(),
            to: other.name().to_string(),
        }),
    }
}

fn jpeg_quality(params: &ConvertParams) -> u8 {
    params
        .get("quality")
        .and_then(Value::as_u64)
        .map(|q| q.clamp(1, 100) as u8)
        .unwrap_or(raster::DEFAULT_JPEG_QUALITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets() {
        assert_eq!(default_target(FormatKind::Shtx), Some(FormatKind::Tga));
        assert_eq!(default_target(FormatKind::Png), Some(FormatKind::Tga));
        assert_eq!(default_target(FormatKind::Wad), None);
    }

    #[test]
    fn test_quality_param() {
        let mut params = ConvertParams::new();
        assert_eq!(jpeg_quality(&params), raster::DEFAULT_JPEG_QUALITY);

        params.insert("quality".to_string(), Value::from(75));
        assert_eq!(jpeg_quality(&params), 75);

        params.insert("quality".to_string(), Value::from(400));
        assert_eq!(jpeg_quality(&params), 100);
    }
}
