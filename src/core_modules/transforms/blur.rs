// Separable Gaussian blur, confined to the region.
//
// The kernel size is `max(3, 11 - d)` rounded up to odd, and sigma is derived from it
// the usual way for a size-only Gaussian: `0.3 * ((k - 1) / 2 - 1) + 0.8`. Samples that
// would fall outside the region are reflected back in (mirror without repeating the
// edge pixel), so the blur never reads a neighbouring difference.

use crate::core_modules::difficulty::Difficulty;
use crate::core_modules::pixel_buffer::pixel_buffer::{RegionViewMut, clamp_channel};
use crate::core_modules::transforms::TransformDetail;
use image::Rgb;

pub fn blur(view: &mut RegionViewMut<'_>, difficulty: Difficulty) -> TransformDetail {
    let kernel_size = kernel_size_for(difficulty);
    let kernel = gaussian_kernel(kernel_size);
    let radius = (kernel_size / 2) as i64;

    let width = view.width() as i64;
    let height = view.height() as i64;
    let source = view.to_buffer();

    // --- Horizontal pass ---
    let mut horizontal = vec![[0.0f32; 3]; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 3];
            for (k, weight) in kernel.iter().enumerate() {
                let sx = reflect_101(x + k as i64 - radius, width);
                let p = source.get(sx as u32, y as u32).unwrap_or(Rgb([0, 0, 0]));
                for c in 0..3 {
                    acc[c] += p[c] as f32 * weight;
                }
            }
            horizontal[(y * width + x) as usize] = acc;
        }
    }

    // --- Vertical pass ---
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 3];
            for (k, weight) in kernel.iter().enumerate() {
                let sy = reflect_101(y + k as i64 - radius, height);
                let row = horizontal[(sy * width + x) as usize];
                for c in 0..3 {
                    acc[c] += row[c] * weight;
                }
            }
            view.put(
                x as u32,
                y as u32,
                Rgb([
                    clamp_channel(acc[0].round()),
                    clamp_channel(acc[1].round()),
                    clamp_channel(acc[2].round()),
                ]),
            );
        }
    }

    TransformDetail::Blur { kernel_size }
}

fn kernel_size_for(difficulty: Difficulty) -> usize {
    let size = (difficulty.inverse() as usize).max(3);
    if size % 2 == 0 { size + 1 } else { size }
}

/// Normalised 1D Gaussian weights for an odd `size`.
fn gaussian_kernel(size: usize) -> Vec<f32> {
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (size / 2) as f32;
    let mut weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Mirrors an out-of-range index back into `[0, n)` without repeating the edge.
fn reflect_101(i: i64, n: i64) -> i64 {
    if n <= 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let m = i.rem_euclid(period);
    if m >= n { period - m } else { m }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
    use crate::core_modules::region::region::Region;

    #[test]
    fn kernel_sizes_are_odd_and_shrink_with_difficulty() {
        assert_eq!(kernel_size_for(Difficulty::new(1)), 11);
        assert_eq!(kernel_size_for(Difficulty::new(2)), 9);
        assert_eq!(kernel_size_for(Difficulty::new(3)), 9);
        assert_eq!(kernel_size_for(Difficulty::new(8)), 3);
        assert_eq!(kernel_size_for(Difficulty::new(10)), 3);
    }

    #[test]
    fn kernel_is_normalised_and_symmetric() {
        let kernel = gaussian_kernel(7);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!((kernel[0] - kernel[6]).abs() < 1e-7);
        assert!(kernel[3] > kernel[2]);
    }

    #[test]
    fn reflect_101_mirrors_without_repeating_the_edge() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(3, 5), 3);
        assert_eq!(reflect_101(-4, 1), 0);
    }

    #[test]
    fn blur_softens_an_edge_and_keeps_flat_areas() {
        let mut image = PixelBuffer::filled(40, 20, Rgb([0, 0, 0]));
        for y in 0..20 {
            for x in 20..40 {
                image.set(x, y, Rgb([200, 200, 200]));
            }
        }
        let mut view = image.view_mut(Region::new(0, 0, 40, 20)).unwrap();
        blur(&mut view, Difficulty::new(1));
        assert_eq!(view.pixel(2, 10), Rgb([0, 0, 0]));
        assert_eq!(view.pixel(37, 10), Rgb([200, 200, 200]));
        let left = view.pixel(19, 10)[0];
        let right = view.pixel(20, 10)[0];
        assert!(left > 0 && left < 100, "left of edge: {left}");
        assert!(right > 100 && right < 200, "right of edge: {right}");
    }
}
