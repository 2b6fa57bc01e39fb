// THEORY:
// This file is the main entry point for the `spot_diff` library crate. It defines the
// public API handed to hosts that want to turn a single image into a
// spot-the-difference puzzle.
//
// The primary interfaces are `DiffEngine` (one call: image + detections + count +
// difficulty in, modified image + answer key out), its tokio-backed sibling
// `ParallelDiffEngine`, and `DiffSession`, which wraps an engine and an
// `ObjectDetector` behind whole-image `DynamicImage` calls. The leaf components
// (region selection, algorithm selection, the transform library) live in
// `core_modules` and are public so they can be tested and reused on their own.

pub mod annotate;
pub mod core_modules;
pub mod engine;
pub mod error;
pub mod parallel_engine;
pub mod session;

pub use core_modules::algorithm_selector::AlgorithmId;
pub use core_modules::detection::{DetectedObject, NoDetections, ObjectDetector, StaticDetections};
pub use core_modules::diff_record::DiffRecord;
pub use core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
pub use core_modules::region::region::{Point, Region};
pub use core_modules::region_selector::PlacementConfig;
pub use engine::{DiffEngine, DiffReport, EngineConfig};
pub use error::{DetectorError, DiffError, DiffResult};
pub use parallel_engine::{ParallelConfig, ParallelDiffEngine};
pub use session::DiffSession;
