//! PNG and JPEG bridges
//!
//! Both formats delegate to the `image` crate; this module only translates
//! between its buffer types and [`PixelGrid`], and maps its errors into the
//! unified error type.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageFormat, RgbaImage};

use wadbreaker_core::{Error, PixelGrid, Result};

/// Default JPEG quality when the caller supplies none
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

pub fn decode_png(data: &[u8]) -> Result<PixelGrid> {
    decode_with(data, ImageFormat::Png)
}

pub fn decode_jpeg(data: &[u8]) -> Result<PixelGrid> {
    decode_with(data, ImageFormat::Jpeg)
}

fn decode_with(data: &[u8], format: ImageFormat) -> Result<PixelGrid> {
    let image = image::load_from_memory_with_format(data, format)
        .map_err(|e| Error::ImageCodec(e.to_string()))?;
    let rgba = image.to_rgba8();
    PixelGrid::from_rgba_bytes(rgba.width(), rgba.height(), rgba.as_raw())
}

pub fn encode_png(grid: &PixelGrid) -> Result<Vec<u8>> {
    let image = to_rgba_image(grid)?;
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| Error::ImageCodec(e.to_string()))?;
    Ok(out.into_inner())
}

/// Encode as JPEG, flattening alpha away (JPEG has no alpha channel)
pub fn encode_jpeg(grid: &PixelGrid, quality: u8) -> Result<Vec<u8>> {
    let mut rgb = Vec::with_capacity(grid.pixels().len() * 3);
    for p in grid.pixels() {
        rgb.extend_from_slice(&[p.r, p.g, p.b]);
    }

    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode(&rgb, grid.width(), grid.height(), ExtendedColorType::Rgb8)
        .map_err(|e| Error::ImageCodec(e.to_string()))?;
    Ok(out.into_inner())
}

fn to_rgba_image(grid: &PixelGrid) -> Result<RgbaImage> {
    RgbaImage::from_raw(grid.width(), grid.height(), grid.to_rgba_bytes())
        .ok_or_else(|| Error::malformed_grid("pixel buffer does not match dimensions"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wadbreaker_core::Rgba;

    #[test]
    fn test_png_round_trip() {
        let grid = PixelGrid::from_pixels(
            2,
            1,
            vec![Rgba::new(1, 2, 3, 255), Rgba::new(4, 5, 6, 128)],
        )
        .unwrap();
        let back = decode_png(&encode_png(&grid).unwrap()).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_jpeg_dimensions_survive() {
        let grid = PixelGrid::filled(8, 4, Rgba::rgb(200, 100, 50));
        let back = decode_jpeg(&encode_jpeg(&grid, DEFAULT_JPEG_QUALITY).unwrap()).unwrap();
        assert_eq!(back.width(), 8);
        assert_eq!(back.height(), 4);
    }

    #[test]
    fn test_garbage_is_codec_error() {
        assert!(decode_png(b"not a png").unwrap_err().is_codec_error());
        assert!(decode_jpeg(b"not a jpeg").unwrap_err().is_codec_error());
    }
}
