//! Common types used across wadbreaker
//!
//! This module provides the shared pixel types the codec engine and the
//! raster bridges operate on.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Color in RGBA format (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 255 };
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Channel order used by the on-disk codecs
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
            a: bytes[3],
        }
    }
}

/// An in-memory RGBA raster, pixels stored in row-major scan order
/// (row 0 first, left to right).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelGrid {
    /// Create a grid from row-major pixels.
    ///
    /// Fails if the pixel count does not equal `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::malformed_grid(format!(
                "{}x{} grid requires {} pixels, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a grid filled with a single color
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels in row-major scan order
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Number of distinct colors, counted over the full pixel stream
    pub fn distinct_colors(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        self.pixels.iter().filter(|p| seen.insert(**p)).count()
    }

    /// Flatten to interleaved RGBA bytes in scan order
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            out.extend_from_slice(&p.to_bytes());
        }
        out
    }

    /// Build from interleaved RGBA bytes in scan order
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(Error::malformed_grid(format!(
                "{}x{} grid requires {} bytes, got {}",
                width,
                height,
                expected,
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Rgba::from_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions_enforced() {
        assert!(PixelGrid::from_pixels(2, 2, vec![Rgba::BLACK; 3]).is_err());
        assert!(PixelGrid::from_pixels(2, 2, vec![Rgba::BLACK; 4]).is_ok());
    }

    #[test]
    fn test_pixel_lookup() {
        let grid = PixelGrid::from_pixels(
            2,
            2,
            vec![Rgba::BLACK, Rgba::WHITE, Rgba::rgb(1, 2, 3), Rgba::TRANSPARENT],
        )
        .unwrap();

        assert_eq!(grid.pixel(1, 0), Some(Rgba::WHITE));
        assert_eq!(grid.pixel(0, 1), Some(Rgba::rgb(1, 2, 3)));
        assert_eq!(grid.pixel(2, 0), None);
    }

    #[test]
    fn test_distinct_colors() {
        let grid = PixelGrid::from_pixels(
            2,
            2,
            vec![Rgba::BLACK, Rgba::BLACK, Rgba::WHITE, Rgba::BLACK],
        )
        .unwrap();
        assert_eq!(grid.distinct_colors(), 2);
    }

    #[test]
    fn test_rgba_bytes_round_trip() {
        let grid = PixelGrid::from_pixels(
            2,
            1,
            vec![Rgba::new(1, 2, 3, 4), Rgba::new(5, 6, 7, 8)],
        )
        .unwrap();

        let bytes = grid.to_rgba_bytes();
        assert_eq!(bytes, vec![1, 2, 3, 4, 5, 6, 7, 8]);

        let back = PixelGrid::from_rgba_bytes(2, 1, &bytes).unwrap();
        assert_eq!(back, grid);
    }
}
