// THEORY:
// Geometric transforms move pixels around inside their region: a sinusoidal warp,
// a rescale, a rotation about the center, and a mirror. All of them read from an owned
// snapshot of the region (so the source is never partially overwritten while it is
// still being sampled) and write the result back through the view.
//
// Warp and rotation use inverse mapping: for each destination pixel they compute where
// it came from and sample there bilinearly, with black outside the region. Rescaling
// goes through `image::imageops::resize` with a triangle (bilinear) filter and then
// crops or pads back to the original size, anchored at the top-left. Mirrors are exact
// index permutations, done with `imageops` flips.

use crate::core_modules::difficulty::Difficulty;
use crate::core_modules::pixel_buffer::pixel_buffer::{PixelBuffer, RegionViewMut, clamp_channel};
use crate::core_modules::transforms::sampling::sample_bilinear;
use crate::core_modules::transforms::{FlipMode, TransformDetail};
use image::Rgb;
use image::imageops::{self, FilterType};
use rand::Rng;
use std::f32::consts::PI;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
/// Wavelength, in pixels, of the sinusoidal warp is `2 * WARP_PERIOD`.
const WARP_PERIOD: f32 = 30.0;

/// Displaces samples along two orthogonal sine waves.
pub fn shape_deform(view: &mut RegionViewMut<'_>, difficulty: Difficulty) -> TransformDetail {
    let strength = difficulty.inverse() as f32 * 0.05;
    let source = view.to_buffer();
    let amplitude_x = strength * view.width() as f32;
    let amplitude_y = strength * view.height() as f32;

    for y in 0..view.height() {
        for x in 0..view.width() {
            let sx = x as f32 + amplitude_x * (y as f32 * PI / WARP_PERIOD).sin();
            let sy = y as f32 + amplitude_y * (x as f32 * PI / WARP_PERIOD).cos();
            view.put(x, y, to_pixel(sample_bilinear(&source, sx, sy, BLACK)));
        }
    }

    TransformDetail::ShapeDeform { strength }
}

/// Grows (or, on a coin flip, shrinks) the region's content, anchored top-left.
pub fn scale_change<R: Rng + ?Sized>(
    view: &mut RegionViewMut<'_>,
    difficulty: Difficulty,
    rng: &mut R,
) -> TransformDetail {
    let mut factor = 1.0 + difficulty.inverse() as f32 * 0.03;
    if rng.random_bool(0.5) {
        factor = 1.0 / factor;
    }

    let width = view.width();
    let height = view.height();
    let scaled_width = ((width as f32 * factor).round() as u32).max(1);
    let scaled_height = ((height as f32 * factor).round() as u32).max(1);

    let source = view.to_buffer();
    let scaled = imageops::resize(
        source.as_rgb_image(),
        scaled_width,
        scaled_height,
        FilterType::Triangle,
    );

    for y in 0..height {
        for x in 0..width {
            let pixel = scaled.get_pixel_checked(x, y).copied().unwrap_or(BLACK);
            view.put(x, y, pixel);
        }
    }

    TransformDetail::ScaleChange { factor }
}

/// Rotates the region about its center by `±(11 - d) * 3` degrees.
pub fn rotation<R: Rng + ?Sized>(
    view: &mut RegionViewMut<'_>,
    difficulty: Difficulty,
    rng: &mut R,
) -> TransformDetail {
    let mut degrees = difficulty.inverse() as f32 * 3.0;
    if rng.random_bool(0.5) {
        degrees = -degrees;
    }

    let source = view.to_buffer();
    let cx = view.width() as f32 / 2.0;
    let cy = view.height() as f32 / 2.0;
    let (sin, cos) = degrees.to_radians().sin_cos();

    // Positive angles turn counter-clockwise on screen; sample through the inverse.
    for y in 0..view.height() {
        for x in 0..view.width() {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let sx = cos * dx - sin * dy + cx;
            let sy = sin * dx + cos * dy + cy;
            view.put(x, y, to_pixel(sample_bilinear(&source, sx, sy, BLACK)));
        }
    }

    TransformDetail::Rotation { degrees }
}

/// Mirrors the region. Easy difficulties pick horizontal or vertical; harder ones may
/// also mirror both axes at once.
pub fn flip<R: Rng + ?Sized>(
    view: &mut RegionViewMut<'_>,
    difficulty: Difficulty,
    rng: &mut R,
) -> TransformDetail {
    let mode = if difficulty.get() <= 3 {
        if rng.random_bool(0.5) {
            FlipMode::Vertical
        } else {
            FlipMode::Horizontal
        }
    } else {
        match rng.random_range(0..3) {
            0 => FlipMode::Vertical,
            1 => FlipMode::Horizontal,
            _ => FlipMode::Both,
        }
    };

    let source = view.to_buffer();
    let flipped = match mode {
        FlipMode::Horizontal => imageops::flip_horizontal(source.as_rgb_image()),
        FlipMode::Vertical => imageops::flip_vertical(source.as_rgb_image()),
        FlipMode::Both => imageops::rotate180(source.as_rgb_image()),
    };
    view.copy_from(&PixelBuffer::from_rgb_image(flipped));

    TransformDetail::Flip(mode)
}

#[inline]
fn to_pixel(v: [f32; 3]) -> Rgb<u8> {
    Rgb([
        clamp_channel(v[0].round()),
        clamp_channel(v[1].round()),
        clamp_channel(v[2].round()),
    ])
}
