// THEORY:
// Object detection is an external capability. The engine never loads a model or runs
// inference; it only consumes bounding boxes that something else produced. This module
// defines the shape of that input and the seam (`ObjectDetector`) through which a host
// plugs a real detector in.
//
// A detector reports failure as a `Result`, never by panicking across the seam. Its
// boxes are trusted but not blindly: `DetectedObject::region_within` clips every box to
// the image before the engine uses it, so a sloppy detector cannot push a region view
// outside the buffer.

use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
use crate::core_modules::region::region::Region;
use crate::error::DetectorError;

/// A single object reported by a detector.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedObject {
    pub class_id: i32,
    /// Detection confidence in `[0,1]`.
    pub confidence: f32,
    pub bbox: Region,
    /// Optional segmentation outline. Carried through but unused by the engine.
    pub segment: Vec<(i32, i32)>,
}

impl DetectedObject {
    pub fn new(class_id: i32, confidence: f32, bbox: Region) -> Self {
        Self {
            class_id,
            confidence,
            bbox,
            segment: Vec::new(),
        }
    }

    /// The bounding box clipped to the image, or `None` if nothing of it is visible.
    pub fn region_within(&self, image_width: u32, image_height: u32) -> Option<Region> {
        self.bbox.clip_to(image_width, image_height)
    }
}

/// Anything that can find objects in an image.
pub trait ObjectDetector {
    fn detect(&mut self, image: &PixelBuffer) -> Result<Vec<DetectedObject>, DetectorError>;
}

/// A detector that never finds anything; region placement falls back to random squares.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDetections;

impl ObjectDetector for NoDetections {
    fn detect(&mut self, _image: &PixelBuffer) -> Result<Vec<DetectedObject>, DetectorError> {
        Ok(Vec::new())
    }
}

/// A detector that reports a fixed list, e.g. detections computed ahead of time.
#[derive(Debug, Clone, Default)]
pub struct StaticDetections {
    objects: Vec<DetectedObject>,
}

impl StaticDetections {
    pub fn new(objects: Vec<DetectedObject>) -> Self {
        Self { objects }
    }
}

impl ObjectDetector for StaticDetections {
    fn detect(&mut self, _image: &PixelBuffer) -> Result<Vec<DetectedObject>, DetectorError> {
        Ok(self.objects.clone())
    }
}
