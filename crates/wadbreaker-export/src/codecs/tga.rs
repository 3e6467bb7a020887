//! TGA raster codec
//!
//! The encoder always writes type 2 (uncompressed true-color), 32-bit
//! BGRA, bottom-up scanlines. The decoder accepts 24- and 32-bit type 2
//! images with either vertical origin, which covers every TGA the game
//! archives actually contain.

use wadbreaker_core::{Error, PixelGrid, Result, Rgba};

const HEADER_LEN: usize = 18;
const IMAGE_TYPE_TRUE_COLOR: u8 = 2;
// Descriptor: 8 attribute (alpha) bits, bottom-up origin
const DESCRIPTOR_BGRA_BOTTOM_UP: u8 = 0x08;
const DESCRIPTOR_TOP_DOWN: u8 = 0x20;

/// Encode a grid as an uncompressed 32-bit TGA
pub fn encode(grid: &PixelGrid) -> Result<Vec<u8>> {
    if grid.width() > u16::MAX as u32 || grid.height() > u16::MAX as u32 {
        return Err(Error::malformed_grid(format!(
            "{}x{} exceeds the u16 dimension limit",
            grid.width(),
            grid.height()
        )));
    }

    let mut out = Vec::with_capacity(HEADER_LEN + grid.pixels().len() * 4);
    out.push(0); // id length
    out.push(0); // no color map
    out.push(IMAGE_TYPE_TRUE_COLOR);
    out.extend_from_slice(&[0u8; 5]); // color map spec
    out.extend_from_slice(&[0u8; 4]); // x/y origin
    out.extend_from_slice(&(grid.width() as u16).to_le_bytes());
    out.extend_from_slice(&(grid.height() as u16).to_le_bytes());
    out.push(32);
    out.push(DESCRIPTOR_BGRA_BOTTOM_UP);

    // Bottom-up: last scanline first
    for y in (0..grid.height()).rev() {
        for x in 0..grid.width() {
            let p = grid.pixel(x, y).unwrap_or(Rgba::TRANSPARENT);
            out.extend_from_slice(&[p.b, p.g, p.r, p.a]);
        }
    }

    Ok(out)
}

/// Decode an uncompressed true-color TGA back into a grid
pub fn decode(data: &[u8]) -> Result<PixelGrid> {
    if data.len() < HEADER_LEN {
        return Err(Error::Truncated {
            offset: data.len() as u64,
        });
    }

    let id_len = data[0] as usize;
    let colormap_type = data[1];
    let image_type = data[2];
    let width = u16::from_le_bytes([data[12], data[13]]) as u32;
    let height = u16::from_le_bytes([data[14], data[15]]) as u32;
    let bpp = data[16];
    let descriptor = data[17];

    if image_type != IMAGE_TYPE_TRUE_COLOR {
        return Err(Error::ImageCodec(format!(
            "unsupported TGA image type {}",
            image_type
        )));
    }
    if colormap_type != 0 {
        return Err(Error::ImageCodec(
            "true-color TGA with a color map".to_string(),
        ));
    }
    let bytes_per_pixel = match bpp {
        24 => 3,
        32 => 4,
        other => {
            return Err(Error::ImageCodec(format!(
                "unsupported TGA depth {} bpp",
                other
            )))
        }
    };

    let pixel_count = width as usize * height as usize;
    let data_start = HEADER_LEN + id_len;
    let data_end = data_start + pixel_count * bytes_per_pixel;
    if data.len() < data_end {
        return Err(Error::Truncated {
            offset: data.len() as u64,
        });
    }

    let top_down = descriptor & DESCRIPTOR_TOP_DOWN != 0;
    let mut pixels = vec![Rgba::TRANSPARENT; pixel_count];
    let mut cursor = data_start;
    for row in 0..height as usize {
        let y = if top_down { row } else { height as usize - 1 - row };
        for x in 0..width as usize {
            let px = &data[cursor..cursor + bytes_per_pixel];
            pixels[y * width as usize + x] = Rgba {
                r: px[2],
                g: px[1],
                b: px[0],
                a: if bytes_per_pixel == 4 { px[3] } else { 255 },
            };
            cursor += bytes_per_pixel;
        }
    }

    PixelGrid::from_pixels(width, height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelGrid {
        PixelGrid::from_pixels(
            2,
            2,
            vec![
                Rgba::new(255, 0, 0, 255),
                Rgba::new(0, 255, 0, 255),
                Rgba::new(0, 0, 255, 255),
                Rgba::new(10, 20, 30, 40),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let grid = sample();
        assert_eq!(decode(&encode(&grid).unwrap()).unwrap(), grid);
    }

    #[test]
    fn test_encoded_header_fields() {
        let bytes = encode(&sample()).unwrap();
        assert_eq!(bytes[2], IMAGE_TYPE_TRUE_COLOR);
        assert_eq!(u16::from_le_bytes([bytes[12], bytes[13]]), 2);
        assert_eq!(bytes[16], 32);
        assert_eq!(bytes[17], DESCRIPTOR_BGRA_BOTTOM_UP);
    }

    #[test]
    fn test_scanlines_are_bottom_up() {
        let bytes = encode(&sample()).unwrap();
        // First stored pixel is the grid's bottom-left: (0, 1) = blue
        assert_eq!(&bytes[18..22], &[255, 0, 0, 255]); // BGRA of (0,0,255,255)
    }

    #[test]
    fn test_decode_top_down_origin() {
        let grid = sample();
        let mut bytes = encode(&grid).unwrap();
        // Flip the origin bit and re-order scanlines to match
        bytes[17] |= DESCRIPTOR_TOP_DOWN;
        let row = 2 * 4;
        let (top, bottom): (Vec<u8>, Vec<u8>) =
            (bytes[18..18 + row].to_vec(), bytes[18 + row..].to_vec());
        bytes[18..18 + row].copy_from_slice(&bottom);
        bytes[18 + row..].copy_from_slice(&top);
        assert_eq!(decode(&bytes).unwrap(), grid);
    }

    #[test]
    fn test_decode_24_bit() {
        // Hand-built 1x1 24-bit top-down image
        let mut bytes = vec![0u8; 18];
        bytes[2] = IMAGE_TYPE_TRUE_COLOR;
        bytes[12] = 1;
        bytes[14] = 1;
        bytes[16] = 24;
        bytes[17] = DESCRIPTOR_TOP_DOWN;
        bytes.extend_from_slice(&[30, 20, 10]); // BGR
        let grid = decode(&bytes).unwrap();
        assert_eq!(grid.pixel(0, 0), Some(Rgba::rgb(10, 20, 30)));
    }

    #[test]
    fn test_rle_rejected() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[2] = 10; // RLE true-color
        assert!(decode(&bytes).unwrap_err().is_codec_error());
    }
}
