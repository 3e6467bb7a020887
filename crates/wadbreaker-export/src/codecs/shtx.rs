//! SHTX texture codec
//!
//! SHTX is the engine's native texture container. Two variants share a
//! 12-byte header:
//!
//! ```text
//! "SHTX"  magic (4 bytes)
//! marker  (2 bytes): "Fs" paletted, "Ff" raw
//! width   (u16 LE)
//! height  (u16 LE)
//! reserved (u16, written as zero)
//! ```
//!
//! `Fs` stores a palette of RGBA colors in first-occurrence order followed
//! by one index byte per pixel in scan order. `Ff` stores the full RGBA
//! stream directly. The encoder picks `Fs` whenever the image fits in 256
//! colors, `Ff` otherwise.

use tracing::debug;

use wadbreaker_core::{Error, PixelGrid, Result, Rgba};
use wadbreaker_parsers::registry::SHTX_MAGIC;

/// Paletted variant marker
pub const MARKER_PALETTE: &[u8; 2] = b"Fs";
/// Raw RGBA variant marker
pub const MARKER_RAW: &[u8; 2] = b"Ff";

const HEADER_LEN: usize = 12;
const PALETTE_MAX: usize = 256;

/// Encode a grid as SHTX, choosing the variant by color count
pub fn encode(grid: &PixelGrid) -> Result<Vec<u8>> {
    if grid.width() > u16::MAX as u32 || grid.height() > u16::MAX as u32 {
        return Err(Error::malformed_grid(format!(
            "{}x{} exceeds the u16 dimension limit",
            grid.width(),
            grid.height()
        )));
    }

    let mut out = Vec::with_capacity(HEADER_LEN + grid.pixels().len());
    out.extend_from_slice(SHTX_MAGIC);

    let palette = build_palette(grid);
    if let Some(palette) = palette {
        out.extend_from_slice(MARKER_PALETTE);
        write_dimensions(&mut out, grid);
        for color in &palette {
            out.extend_from_slice(&color.to_bytes());
        }
        for pixel in grid.pixels() {
            // Always present: the palette was built from these pixels
            let index = palette.iter().position(|c| c == pixel).unwrap_or(0);
            out.push(index as u8);
        }
        debug!(
            width = grid.width(),
            height = grid.height(),
            palette = palette.len(),
            "encoded paletted SHTX"
        );
    } else {
        out.extend_from_slice(MARKER_RAW);
        write_dimensions(&mut out, grid);
        out.extend_from_slice(&grid.to_rgba_bytes());
        debug!(
            width = grid.width(),
            height = grid.height(),
            "encoded raw SHTX"
        );
    }

    Ok(out)
}

/// Decode SHTX bytes back into a grid.
///
/// Strict inverse of [`encode`]: the palette length is recovered from the
/// payload size, and any index at or beyond it is a codec error.
pub fn decode(data: &[u8]) -> Result<PixelGrid> {
    if data.len() < HEADER_LEN {
        return Err(Error::Truncated {
            offset: data.len() as u64,
        });
    }
    if &data[0..4] != SHTX_MAGIC {
        return Err(Error::InvalidMagic {
            expected: SHTX_MAGIC.to_vec(),
            found: data[0..4].to_vec(),
        });
    }

    let marker = &data[4..6];
    let width = u16::from_le_bytes([data[6], data[7]]) as u32;
    let height = u16::from_le_bytes([data[8], data[9]]) as u32;
    let pixel_count = width as usize * height as usize;
    let payload = &data[HEADER_LEN..];

    match marker {
        m if m == MARKER_PALETTE => decode_paletted(width, height, pixel_count, payload),
        m if m == MARKER_RAW => {
            if payload.len() != pixel_count * 4 {
                return Err(Error::ImageCodec(format!(
                    "raw SHTX payload is {} bytes, expected {}",
                    payload.len(),
                    pixel_count * 4
                )));
            }
            PixelGrid::from_rgba_bytes(width, height, payload)
        }
        other => Err(Error::ImageCodec(format!(
            "unknown SHTX marker {:?}",
            other
        ))),
    }
}

fn decode_paletted(
    width: u32,
    height: u32,
    pixel_count: usize,
    payload: &[u8],
) -> Result<PixelGrid> {
    let palette_bytes = payload.len().checked_sub(pixel_count).ok_or_else(|| {
        Error::ImageCodec(format!(
            "paletted SHTX payload is {} bytes, too short for {} indices",
            payload.len(),
            pixel_count
        ))
    })?;
    if palette_bytes % 4 != 0 {
        return Err(Error::ImageCodec(
            "paletted SHTX palette is not a whole number of RGBA entries".to_string(),
        ));
    }
    let palette_len = palette_bytes / 4;
    if palette_len > PALETTE_MAX {
        return Err(Error::ImageCodec(format!(
            "paletted SHTX declares {} palette entries, limit is {}",
            palette_len, PALETTE_MAX
        )));
    }

    let palette: Vec<Rgba> = payload[..palette_bytes]
        .chunks_exact(4)
        .map(|c| Rgba::from_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    let mut pixels = Vec::with_capacity(pixel_count);
    for &index in &payload[palette_bytes..] {
        let color = palette.get(index as usize).ok_or(Error::PaletteIndexOutOfRange {
            index: index as usize,
            palette_len,
        })?;
        pixels.push(*color);
    }

    PixelGrid::from_pixels(width, height, pixels)
}

/// Palette in first-occurrence order, or `None` if over 256 colors
fn build_palette(grid: &PixelGrid) -> Option<Vec<Rgba>> {
    let mut palette = Vec::new();
    for pixel in grid.pixels() {
        if !palette.contains(pixel) {
            if palette.len() == PALETTE_MAX {
                return None;
            }
            palette.push(*pixel);
        }
    }
    Some(palette)
}

fn write_dimensions(out: &mut Vec<u8>, grid: &PixelGrid) {
    out.extend_from_slice(&(grid.width() as u16).to_le_bytes());
    out.extend_from_slice(&(grid.height() as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_image_gets_palette_marker() {
        let grid = PixelGrid::filled(4, 4, Rgba::rgb(10, 20, 30));
        let bytes = encode(&grid).unwrap();
        assert_eq!(&bytes[0..4], SHTX_MAGIC);
        assert_eq!(&bytes[4..6], MARKER_PALETTE);
        // Header + one palette entry + 16 indices
        assert_eq!(bytes.len(), 12 + 4 + 16);
    }

    #[test]
    fn test_palette_is_first_occurrence_ordered() {
        let grid = PixelGrid::from_pixels(
            2,
            2,
            vec![Rgba::WHITE, Rgba::BLACK, Rgba::WHITE, Rgba::rgb(9, 9, 9)],
        )
        .unwrap();
        let bytes = encode(&grid).unwrap();
        assert_eq!(&bytes[12..16], &Rgba::WHITE.to_bytes());
        assert_eq!(&bytes[16..20], &Rgba::BLACK.to_bytes());
        // Indices follow occurrence order too
        assert_eq!(&bytes[24..28], &[0, 1, 0, 2]);
    }

    #[test]
    fn test_unknown_marker_is_codec_error() {
        let mut bytes = encode(&PixelGrid::filled(1, 1, Rgba::BLACK)).unwrap();
        bytes[4] = b'X';
        let err = decode(&bytes).unwrap_err();
        assert!(err.is_codec_error());
    }

    #[test]
    fn test_out_of_range_index_is_codec_error() {
        let mut bytes = encode(&PixelGrid::filled(2, 2, Rgba::BLACK)).unwrap();
        // Single-entry palette, so index 5 is out of range
        let last = bytes.len() - 1;
        bytes[last] = 5;
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, Error::PaletteIndexOutOfRange { index: 5, palette_len: 1 }));
    }

    #[test]
    fn test_many_colors_gets_raw_marker_and_round_trips() {
        // 24x12 = 288 distinct colors, over the palette limit
        let pixels: Vec<Rgba> = (0u32..288)
            .map(|i| Rgba::new(i as u8, (i >> 8) as u8, 77, 255))
            .collect();
        let grid = PixelGrid::from_pixels(24, 12, pixels).unwrap();
        assert!(grid.distinct_colors() > 256);

        let bytes = encode(&grid).unwrap();
        assert_eq!(&bytes[4..6], MARKER_RAW);
        assert_eq!(decode(&bytes).unwrap(), grid);
    }

    #[test]
    fn test_palette_round_trip() {
        let grid = PixelGrid::from_pixels(
            2,
            2,
            vec![Rgba::WHITE, Rgba::BLACK, Rgba::new(5, 6, 7, 8), Rgba::WHITE],
        )
        .unwrap();
        let bytes = encode(&grid).unwrap();
        assert_eq!(&bytes[4..6], MARKER_PALETTE);
        assert_eq!(decode(&bytes).unwrap(), grid);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let grid = PixelGrid::from_pixels(
            2,
            2,
            vec![Rgba::rgb(1, 2, 3), Rgba::WHITE, Rgba::BLACK, Rgba::WHITE],
        )
        .unwrap();
        assert_eq!(encode(&grid).unwrap(), encode(&grid).unwrap());
    }
}
