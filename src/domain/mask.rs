//! Image to obstacle mask rasterization
//!
//! Turns an RGBA image (row 0 = top, as canvases deliver it) into a
//! grid-space mask (row 0 = bottom). Pixels are nearest-sampled; opaque
//! pixels darker than the threshold become obstacles.

use super::params::ParamError;

/// Alpha below this counts as background
const OPAQUE_ALPHA: u8 = 128;

#[inline]
fn luminance(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

pub fn rasterize_rgba_mask(
    rgba: &[u8],
    image_width: u32,
    image_height: u32,
    grid_width: u32,
    grid_height: u32,
    threshold: u8,
) -> Result<Vec<u8>, ParamError> {
    if image_width == 0 || image_height == 0 {
        return Err(ParamError::InvalidGrid {
            width: image_width,
            height: image_height,
        });
    }
    let pixels = (image_width as usize) * (image_height as usize);
    if rgba.len() != pixels * 4 {
        return Err(ParamError::MaskSize {
            expected: pixels * 4,
            actual: rgba.len(),
        });
    }

    let gw = grid_width as usize;
    let gh = grid_height as usize;
    let iw = image_width as usize;
    let ih = image_height as usize;
    let mut mask = vec![0u8; gw * gh];

    for y in 0..gh {
        // Grid row 0 samples the bottom image row.
        let iy = ((gh - 1 - y) * ih) / gh;
        for x in 0..gw {
            let ix = (x * iw) / gw;
            let p = (iy * iw + ix) * 4;
            let (r, g, b, a) = (rgba[p], rgba[p + 1], rgba[p + 2], rgba[p + 3]);
            if a >= OPAQUE_ALPHA && luminance(r, g, b) < threshold as f32 {
                mask[y * gw + x] = 1;
            }
        }
    }

    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(buf: &mut [u8], w: usize, x: usize, y: usize, rgba: [u8; 4]) {
        let p = (y * w + x) * 4;
        buf[p..p + 4].copy_from_slice(&rgba);
    }

    #[test]
    fn top_image_row_lands_on_top_grid_row() {
        // 2x2 white image with one black pixel at the top-left.
        let mut img = vec![255u8; 2 * 2 * 4];
        pixel(&mut img, 2, 0, 0, [0, 0, 0, 255]);

        let mask = rasterize_rgba_mask(&img, 2, 2, 2, 2, 128).unwrap();
        // Grid row 1 is the top row.
        assert_eq!(mask, vec![0, 0, 1, 0]);
    }

    #[test]
    fn scales_to_grid_resolution() {
        // 1x2 image: top black, bottom white, sampled onto a 3x4 grid.
        let mut img = vec![255u8; 2 * 4];
        pixel(&mut img, 1, 0, 0, [10, 10, 10, 255]);

        let mask = rasterize_rgba_mask(&img, 1, 2, 3, 4, 100).unwrap();
        assert_eq!(&mask[0..6], &[0; 6]);
        assert_eq!(&mask[6..12], &[1; 6]);
    }

    #[test]
    fn transparent_pixels_are_fluid() {
        let img = vec![0u8, 0, 0, 0];
        let mask = rasterize_rgba_mask(&img, 1, 1, 2, 2, 200).unwrap();
        assert_eq!(mask, vec![0; 4]);
    }

    #[test]
    fn rejects_short_buffers() {
        let err = rasterize_rgba_mask(&[0u8; 7], 1, 2, 4, 4, 128).unwrap_err();
        assert_eq!(err, ParamError::MaskSize { expected: 8, actual: 7 });
    }
}
