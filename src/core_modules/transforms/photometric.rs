// THEORY:
// Photometric transforms change pixel values without moving anything. They are the
// cheap edits: a channel offset, a blended tile texture, a sparse brightness nudge, and
// a blended shape painted on top. Each one scales with `Difficulty::inverse()` so the
// same code produces a glaring change at difficulty 1 and a faint one at 10.

use crate::core_modules::difficulty::Difficulty;
use crate::core_modules::pixel_buffer::pixel_buffer::{CHANNELS, RegionViewMut, clamp_channel};
use crate::core_modules::transforms::{Shape, TransformDetail};
use image::Rgb;
use rand::Rng;

const TEXTURE_ALPHA: f32 = 0.2;

/// Adds a signed offset of `(11 - d) * 2.5` (truncated) to one random channel.
pub fn color_shift<R: Rng + ?Sized>(
    view: &mut RegionViewMut<'_>,
    difficulty: Difficulty,
    rng: &mut R,
) -> TransformDetail {
    let magnitude = (difficulty.inverse() as f32 * 2.5) as i32;
    let offset = if rng.random_bool(0.5) { magnitude } else { -magnitude };
    let channel = rng.random_range(0..CHANNELS);

    view.for_each_pixel_mut(|_, _, pixel| {
        pixel[channel] = (pixel[channel] as i32 + offset).clamp(0, 255) as u8;
    });

    TransformDetail::ColorShift { channel, offset }
}

/// Blends a coarse grid of random gray tiles into the region.
pub fn texture_change<R: Rng + ?Sized>(
    view: &mut RegionViewMut<'_>,
    difficulty: Difficulty,
    rng: &mut R,
) -> TransformDetail {
    let tile_size = (10u32.saturating_sub(difficulty.get() as u32 / 2)).max(2);
    let tiles_x = view.width().div_ceil(tile_size);
    let tiles_y = view.height().div_ceil(tile_size);

    let tiles: Vec<u8> = (0..tiles_x * tiles_y)
        .map(|_| rng.random_range(0..=255u8))
        .collect();

    view.for_each_pixel_mut(|x, y, pixel| {
        let tile = tiles[((y / tile_size) * tiles_x + x / tile_size) as usize] as f32;
        for c in 0..CHANNELS {
            pixel[c] = clamp_channel((1.0 - TEXTURE_ALPHA) * pixel[c] as f32 + TEXTURE_ALPHA * tile);
        }
    });

    TransformDetail::TextureChange { tile_size }
}

/// Pushes a sparse, randomly phased diagonal pattern of pixels toward black or white.
pub fn subtle_pattern<R: Rng + ?Sized>(
    view: &mut RegionViewMut<'_>,
    difficulty: Difficulty,
    rng: &mut R,
) -> TransformDetail {
    let period = difficulty.get() as u32;
    let intensity = 0.1 + (1.0 - difficulty.get() as f32 / 10.0) * 0.2;
    let step = intensity * 50.0;
    let mut touched_pixels = 0usize;

    view.for_each_pixel_mut(|x, y, pixel| {
        let phase = rng.random_range(0..=period);
        if (x + y) % (period + 1) != phase {
            return;
        }
        touched_pixels += 1;
        for c in 0..CHANNELS {
            let change = if pixel[c] < 128 { step } else { -step };
            pixel[c] = clamp_channel(pixel[c] as f32 + change);
        }
    });

    TransformDetail::SubtlePattern {
        touched_pixels,
        intensity,
    }
}

/// Paints a random-colored circle, square or upward triangle in the middle of the
/// region, blended at an opacity that drops as difficulty rises.
pub fn addition<R: Rng + ?Sized>(
    view: &mut RegionViewMut<'_>,
    difficulty: Difficulty,
    rng: &mut R,
) -> TransformDetail {
    let shape = match rng.random_range(0..3) {
        0 => Shape::Circle,
        1 => Shape::Square,
        _ => Shape::Triangle,
    };
    let color = Rgb([
        rng.random_range(0..=255u8),
        rng.random_range(0..=255u8),
        rng.random_range(0..=255u8),
    ]);
    let alpha = 0.5 + (10 - difficulty.get() as i32) as f32 * 0.05;

    let size = (view.width() / 4) as i64;
    let cx = (view.width() / 2) as i64;
    let cy = (view.height() / 2) as i64;

    view.for_each_pixel_mut(|x, y, pixel| {
        if !shape_contains(shape, cx, cy, size, x as i64, y as i64) {
            return;
        }
        for c in 0..CHANNELS {
            pixel[c] = clamp_channel(pixel[c] as f32 * (1.0 - alpha) + color[c] as f32 * alpha);
        }
    });

    TransformDetail::Addition {
        shape,
        color,
        alpha,
    }
}

fn shape_contains(shape: Shape, cx: i64, cy: i64, size: i64, x: i64, y: i64) -> bool {
    let dx = x - cx;
    let dy = y - cy;
    match shape {
        Shape::Circle => dx * dx + dy * dy <= size * size,
        Shape::Square => dx.abs() <= size && dy.abs() <= size,
        Shape::Triangle => {
            let apex = (cx, cy - size);
            let left = (cx - size, cy + size);
            let right = (cx + size, cy + size);
            let edge = |a: (i64, i64), b: (i64, i64)| (b.0 - a.0) * (y - a.1) - (b.1 - a.1) * (x - a.0);
            let e0 = edge(apex, left);
            let e1 = edge(left, right);
            let e2 = edge(right, apex);
            (e0 >= 0 && e1 >= 0 && e2 >= 0) || (e0 <= 0 && e1 <= 0 && e2 <= 0)
        }
    }
}
