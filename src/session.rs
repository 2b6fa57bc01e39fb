// THEORY:
// A `DiffSession` is the host-facing wrapper around the engine. A host (a game, a
// tool) works in whole images and simple settings; it should not have to know about
// pixel buffers, detection boxes or region selection. The session owns a detector, an
// engine and the two user settings, and keeps the answer key of the last run.
//
// Key architectural principles:
// 1.  **Settings Are Clamped, Never Rejected**: `set_diff_count` and `set_difficulty`
//     accept any integer and store the clamped value.
// 2.  **Format In, Format Out**: The engine works on RGB. An image with alpha is edited
//     on its RGB channels and handed back with its original alpha channel.
// 3.  **No Stale Answer Keys**: A failed run clears the stored records, so `diff_data`
//     never describes an image the caller did not receive.

use crate::core_modules::detection::ObjectDetector;
use crate::core_modules::diff_record::DiffRecord;
use crate::core_modules::difficulty::{DiffCount, Difficulty};
use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
use crate::engine::{DiffEngine, EngineConfig};
use crate::error::DiffResult;
use image::{DynamicImage, Rgba, RgbaImage};

pub struct DiffSession<D: ObjectDetector> {
    detector: D,
    engine: DiffEngine,
    diff_count: DiffCount,
    difficulty: Difficulty,
    records: Vec<DiffRecord>,
}

impl<D: ObjectDetector> DiffSession<D> {
    pub fn new(detector: D, config: EngineConfig) -> Self {
        Self {
            detector,
            engine: DiffEngine::new(config),
            diff_count: DiffCount::default(),
            difficulty: Difficulty::default(),
            records: Vec::new(),
        }
    }

    pub fn set_diff_count(&mut self, count: i32) {
        self.diff_count = DiffCount::new(count);
    }

    pub fn diff_count(&self) -> usize {
        self.diff_count.get()
    }

    pub fn set_difficulty(&mut self, difficulty: i32) {
        self.difficulty = Difficulty::new(difficulty);
    }

    pub fn difficulty(&self) -> u8 {
        self.difficulty.get()
    }

    /// The answer key of the last successful run, empty after a failure.
    pub fn diff_data(&self) -> &[DiffRecord] {
        &self.records
    }

    /// Produces the modified copy of `image` and stores its answer key.
    pub fn generate_diff_image(&mut self, image: &DynamicImage) -> DiffResult<DynamicImage> {
        self.records.clear();
        let (output, records) = self.run(image)?;
        self.records = records;
        Ok(output)
    }

    fn run(&mut self, image: &DynamicImage) -> DiffResult<(DynamicImage, Vec<DiffRecord>)> {
        let alpha = image.color().has_alpha().then(|| image.to_rgba8());
        let mut buffer = PixelBuffer::from_rgb_image(image.to_rgb8());

        let detections = self.detector.detect(&buffer)?;
        log::debug!("detector returned {} objects", detections.len());

        let report = self.engine.generate(
            &mut buffer,
            &detections,
            self.diff_count.get() as i32,
            self.difficulty.get() as i32,
        )?;

        let rgb = buffer.into_rgb_image();
        let output = match alpha {
            Some(source) => {
                let mut rgba = RgbaImage::new(rgb.width(), rgb.height());
                for ((out, px), src) in rgba.pixels_mut().zip(rgb.pixels()).zip(source.pixels()) {
                    *out = Rgba([px[0], px[1], px[2], src[3]]);
                }
                DynamicImage::ImageRgba8(rgba)
            }
            None => DynamicImage::ImageRgb8(rgb),
        };
        Ok((output, report.records))
    }
}
