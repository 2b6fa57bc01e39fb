// THEORY:
// Object removal erases whatever sits in the middle of a region by filling the
// region's central ellipse from its surroundings. The fill is a fast-marching style
// "onion peel": the hole is consumed one boundary layer at a time, and every pixel in
// the current layer becomes a distance-weighted average of the already-known pixels
// within a small radius. Because each layer only reads values fixed by earlier layers,
// colors bleed inward smoothly from the rim, which is what makes the hole disappear
// instead of looking painted over.
//
// The fill needs at least one known pixel to start from. A region so thin that the
// ellipse covers all of it has none, and that case is reported as a `TransformError`
// rather than silently leaving the region untouched.

use crate::core_modules::pixel_buffer::pixel_buffer::{RegionViewMut, clamp_channel};
use crate::core_modules::transforms::{TransformDetail, TransformError};
use image::Rgb;

/// Neighbourhood radius, in pixels, a filled pixel samples from.
const INPAINT_RADIUS: i64 = 3;

/// Fills the region's inscribed ellipse from its surroundings.
pub fn object_removal(view: &mut RegionViewMut<'_>) -> Result<TransformDetail, TransformError> {
    let width = view.width() as i64;
    let height = view.height() as i64;
    let index = |x: i64, y: i64| (y * width + x) as usize;

    let mask = ellipse_mask(width, height);
    let mut known: Vec<bool> = mask.iter().map(|&m| !m).collect();
    let mut remaining = mask.iter().filter(|&&m| m).count();

    if remaining == mask.len() {
        return Err(TransformError::DegenerateMask {
            width: view.width(),
            height: view.height(),
        });
    }

    let mut values: Vec<[f32; 3]> = Vec::with_capacity(mask.len());
    for y in 0..view.height() {
        for x in 0..view.width() {
            let p = view.pixel(x, y);
            values.push([p[0] as f32, p[1] as f32, p[2] as f32]);
        }
    }

    let filled_pixels = remaining;
    while remaining > 0 {
        // --- 1. Find the current boundary layer of the hole ---
        let mut frontier: Vec<(i64, i64)> = Vec::new();
        for y in 0..height {
            for x in 0..width {
                if !known[index(x, y)] && touches_known(&known, width, height, x, y) {
                    frontier.push((x, y));
                }
            }
        }
        if frontier.is_empty() {
            return Err(TransformError::DegenerateMask {
                width: view.width(),
                height: view.height(),
            });
        }

        // --- 2. Fill the layer from known pixels only ---
        let mut layer: Vec<[f32; 3]> = Vec::with_capacity(frontier.len());
        for &(x, y) in &frontier {
            layer.push(weighted_neighbourhood(&values, &known, width, height, x, y));
        }

        // --- 3. Commit the layer ---
        for (&(x, y), value) in frontier.iter().zip(layer) {
            values[index(x, y)] = value;
            known[index(x, y)] = true;
        }
        remaining -= frontier.len();
    }

    for y in 0..height {
        for x in 0..width {
            if mask[index(x, y)] {
                let v = values[index(x, y)];
                view.put(
                    x as u32,
                    y as u32,
                    Rgb([clamp_channel(v[0]), clamp_channel(v[1]), clamp_channel(v[2])]),
                );
            }
        }
    }

    Ok(TransformDetail::ObjectRemoval { filled_pixels })
}

/// The filled ellipse centered at `(w/2, h/2)` with semi-axes `(w/2, h/2)`.
fn ellipse_mask(width: i64, height: i64) -> Vec<bool> {
    let cx = width / 2;
    let cy = height / 2;
    let ax = width / 2;
    let ay = height / 2;
    let mut mask = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let dx = x - cx;
            let dy = y - cy;
            mask.push(dx * dx * ay * ay + dy * dy * ax * ax <= ax * ax * ay * ay);
        }
    }
    mask
}

fn touches_known(known: &[bool], width: i64, height: i64, x: i64, y: i64) -> bool {
    for dy in -1..=1 {
        for dx in -1..=1 {
            let nx = x + dx;
            let ny = y + dy;
            if (dx != 0 || dy != 0)
                && nx >= 0
                && nx < width
                && ny >= 0
                && ny < height
                && known[(ny * width + nx) as usize]
            {
                return true;
            }
        }
    }
    false
}

fn weighted_neighbourhood(
    values: &[[f32; 3]],
    known: &[bool],
    width: i64,
    height: i64,
    x: i64,
    y: i64,
) -> [f32; 3] {
    let mut sum = [0.0f32; 3];
    let mut total_weight = 0.0f32;
    for dy in -INPAINT_RADIUS..=INPAINT_RADIUS {
        for dx in -INPAINT_RADIUS..=INPAINT_RADIUS {
            let dist_sq = dx * dx + dy * dy;
            if dist_sq == 0 || dist_sq > INPAINT_RADIUS * INPAINT_RADIUS {
                continue;
            }
            let nx = x + dx;
            let ny = y + dy;
            if nx < 0 || nx >= width || ny < 0 || ny >= height {
                continue;
            }
            let i = (ny * width + nx) as usize;
            if !known[i] {
                continue;
            }
            let weight = 1.0 / dist_sq as f32;
            for c in 0..3 {
                sum[c] += values[i][c] * weight;
            }
            total_weight += weight;
        }
    }
    // The frontier test guarantees an 8-neighbour is known, so the weight is positive.
    [sum[0] / total_weight, sum[1] / total_weight, sum[2] / total_weight]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
    use crate::core_modules::region::region::Region;

    #[test]
    fn uniform_surroundings_fill_uniformly() {
        let background = Rgb([40, 120, 200]);
        let mut image = PixelBuffer::filled(50, 50, background);
        // Paint an "object" in the middle of the region.
        for y in 20..30 {
            for x in 20..30 {
                image.set(x, y, Rgb([255, 0, 0]));
            }
        }
        let mut view = image.view_mut(Region::new(5, 5, 40, 40)).unwrap();
        let detail = object_removal(&mut view).unwrap();
        assert!(matches!(detail, TransformDetail::ObjectRemoval { filled_pixels } if filled_pixels > 0));
        for y in 0..40 {
            for x in 0..40 {
                let p = view.pixel(x, y);
                for c in 0..3 {
                    assert!((p[c] as i32 - background[c] as i32).abs() <= 1, "{p:?} at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn corners_are_outside_the_fill() {
        let mut image = PixelBuffer::filled(30, 30, Rgb([10, 10, 10]));
        image.set(0, 0, Rgb([250, 250, 250]));
        let mut view = image.view_mut(Region::new(0, 0, 30, 30)).unwrap();
        object_removal(&mut view).unwrap();
        assert_eq!(view.pixel(0, 0), Rgb([250, 250, 250]));
    }

    #[test]
    fn fully_masked_strip_is_degenerate() {
        let mut image = PixelBuffer::new(8, 8);
        let mut view = image.view_mut(Region::new(3, 0, 1, 8)).unwrap();
        let err = object_removal(&mut view).unwrap_err();
        assert!(matches!(err, TransformError::DegenerateMask { width: 1, height: 8 }));
    }
}
