// Shared resampling helpers for the geometric transforms.

use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
use image::Rgb;

/// Bilinear sample of `source` at a fractional position. Neighbours that fall outside
/// the buffer take the `border` color, so samples near the edge fade into it the way a
/// constant-border remap does.
pub fn sample_bilinear(source: &PixelBuffer, x: f32, y: f32, border: Rgb<u8>) -> [f32; 3] {
    let border_f = [border[0] as f32, border[1] as f32, border[2] as f32];
    if !x.is_finite() || !y.is_finite() {
        return border_f;
    }

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let x0 = x0 as i64;
    let y0 = y0 as i64;

    let fetch = |xi: i64, yi: i64| -> [f32; 3] {
        if xi < 0 || yi < 0 || xi > u32::MAX as i64 || yi > u32::MAX as i64 {
            return border_f;
        }
        match source.get(xi as u32, yi as u32) {
            Some(p) => [p[0] as f32, p[1] as f32, p[2] as f32],
            None => border_f,
        }
    };

    let top_left = fetch(x0, y0);
    let top_right = fetch(x0 + 1, y0);
    let bottom_left = fetch(x0, y0 + 1);
    let bottom_right = fetch(x0 + 1, y0 + 1);

    let mut out = [0.0f32; 3];
    for c in 0..3 {
        let top = top_left[c] + (top_right[c] - top_left[c]) * fx;
        let bottom = bottom_left[c] + (bottom_right[c] - bottom_left[c]) * fx;
        out[c] = top + (bottom - top) * fy;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_positions_return_the_pixel() {
        let mut source = PixelBuffer::new(3, 3);
        source.set(1, 1, Rgb([200, 100, 50]));
        let s = sample_bilinear(&source, 1.0, 1.0, Rgb([0, 0, 0]));
        assert_eq!(s, [200.0, 100.0, 50.0]);
    }

    #[test]
    fn halfway_blends_neighbours() {
        let mut source = PixelBuffer::new(2, 1);
        source.set(0, 0, Rgb([0, 0, 0]));
        source.set(1, 0, Rgb([100, 200, 50]));
        let s = sample_bilinear(&source, 0.5, 0.0, Rgb([0, 0, 0]));
        assert_eq!(s, [50.0, 100.0, 25.0]);
    }

    #[test]
    fn outside_positions_take_the_border() {
        let source = PixelBuffer::filled(4, 4, Rgb([255, 255, 255]));
        let s = sample_bilinear(&source, -5.0, 2.0, Rgb([7, 7, 7]));
        assert_eq!(s, [7.0, 7.0, 7.0]);
        let s = sample_bilinear(&source, f32::NAN, 2.0, Rgb([7, 7, 7]));
        assert_eq!(s, [7.0, 7.0, 7.0]);
    }
}
