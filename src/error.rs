// THEORY:
// Every failure the engine can report is a variant of `DiffError`. The engine never
// signals failure through a silent no-op: a caller either receives a complete set of
// diff records or one of these values, and in the latter case the image it handed in
// is left exactly as it was.
//
// Detector failures live in their own type (`DetectorError`) because the detector is an
// external capability. They are folded into `DiffError` at the session boundary.

use crate::core_modules::algorithm_selector::AlgorithmId;

/// Errors produced by an `ObjectDetector` implementation.
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("detector is not initialised")]
    NotInitialised,

    #[error("detection failed: {0}")]
    Failed(String),
}

/// Errors produced while synthesising differences.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "could not place {requested} non-overlapping regions in a {width}x{height} image \
         (placed {placed} after {attempts} attempts)"
    )]
    RegionSelectionFailed {
        requested: usize,
        placed: usize,
        attempts: u32,
        width: u32,
        height: u32,
    },

    #[error("no suitable regions found for differences")]
    NoRegionsAvailable,

    #[error("transform {algorithm:?} failed: {reason}")]
    TransformFailed {
        algorithm: AlgorithmId,
        reason: String,
    },

    #[error("region ({x}, {y}, {width}x{height}) lies outside the {image_width}x{image_height} image")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("worker pool is unavailable: {0}")]
    WorkerUnavailable(&'static str),

    #[error(transparent)]
    Detection(#[from] DetectorError),
}

pub type DiffResult<T> = Result<T, DiffError>;
