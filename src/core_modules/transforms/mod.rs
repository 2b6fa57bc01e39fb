// THEORY:
// The transform library is the set of ten per-region edits. Every transform has the
// same shape: it receives a mutable view of exactly one region, the difficulty, and the
// caller's RNG; it edits the region in place and reports what it did. Transforms never
// see pixels outside their region and never compute the position or size of the
// difference; the engine derives those from the region itself.
//
// Key architectural principles:
// 1.  **Single Dispatch Point**: `apply` is the only place an `AlgorithmId` becomes
//     code. Adding an algorithm without handling it here is a compile error.
// 2.  **Explicit Randomness**: All random draws come from the `rng` argument. Seeding
//     that RNG reproduces the exact same edit.
// 3.  **Clamped Output**: Every channel value written is clamped to `[0,255]`.
// 4.  **Local Failure**: A transform that can fail (only the inpainting fill can, on a
//     mask with nothing to sample from) returns a `TransformError` instead of panicking,
//     so the engine can retry the region with a different algorithm.

pub mod blur;
pub mod geometric;
pub mod inpaint;
pub mod photometric;
pub mod sampling;

use crate::core_modules::algorithm_selector::AlgorithmId;
use crate::core_modules::difficulty::Difficulty;
use crate::core_modules::pixel_buffer::pixel_buffer::RegionViewMut;
use image::Rgb;
use rand::Rng;

/// Flip direction used by the `Flip` transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipMode {
    /// Mirror left-right.
    Horizontal,
    /// Mirror top-bottom.
    Vertical,
    /// Mirror both axes (a 180° turn).
    Both,
}

/// Shape drawn by the `Addition` transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
    Triangle,
}

/// The parameters a transform actually used.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformDetail {
    ColorShift { channel: usize, offset: i32 },
    ObjectRemoval { filled_pixels: usize },
    TextureChange { tile_size: u32 },
    ShapeDeform { strength: f32 },
    SubtlePattern { touched_pixels: usize, intensity: f32 },
    ScaleChange { factor: f32 },
    Rotation { degrees: f32 },
    Flip(FlipMode),
    Blur { kernel_size: usize },
    Addition { shape: Shape, color: Rgb<u8>, alpha: f32 },
}

/// What a transform reports back after editing its region.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutcome {
    pub algorithm: AlgorithmId,
    pub detail: TransformDetail,
}

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("fill mask has no known pixels to sample from ({width}x{height} region)")]
    DegenerateMask { width: u32, height: u32 },
}

/// Applies `algorithm` to the region behind `view`.
pub fn apply<R: Rng + ?Sized>(
    algorithm: AlgorithmId,
    view: &mut RegionViewMut<'_>,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<TransformOutcome, TransformError> {
    let detail = match algorithm {
        AlgorithmId::ColorShift => photometric::color_shift(view, difficulty, rng),
        AlgorithmId::ObjectRemoval => inpaint::object_removal(view)?,
        AlgorithmId::TextureChange => photometric::texture_change(view, difficulty, rng),
        AlgorithmId::ShapeDeform => geometric::shape_deform(view, difficulty),
        AlgorithmId::SubtlePattern => photometric::subtle_pattern(view, difficulty, rng),
        AlgorithmId::ScaleChange => geometric::scale_change(view, difficulty, rng),
        AlgorithmId::Rotation => geometric::rotation(view, difficulty, rng),
        AlgorithmId::Flip => geometric::flip(view, difficulty, rng),
        AlgorithmId::Blur => blur::blur(view, difficulty),
        AlgorithmId::Addition => photometric::addition(view, difficulty, rng),
    };
    Ok(TransformOutcome { algorithm, detail })
}
