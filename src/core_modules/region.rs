// THEORY:
// A `Region` is the unit of spatial reasoning for the whole engine. It is an
// axis-aligned rectangle in pixel coordinates, nothing more. It does not own pixels
// and does not know about any image; `PixelBuffer` is the one that decides whether a
// region is a legal window into its storage.
//
// The only geometry the engine needs is intersection area (for the non-overlap
// guarantee), containment within image bounds, clamping untrusted rectangles back into
// bounds, and the two summary values reported for every difference: the centroid and
// the mean side length.

pub mod region {
    /// An axis-aligned rectangle `(x, y, width, height)` in pixel coordinates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Region {
        pub x: u32,
        pub y: u32,
        pub width: u32,
        pub height: u32,
    }

    /// A 2D point with sub-pixel precision.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Point {
        pub x: f32,
        pub y: f32,
    }

    impl Region {
        pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
            Self { x, y, width, height }
        }

        /// A square with its top-left corner at `(x, y)`.
        pub fn square(x: u32, y: u32, side: u32) -> Self {
            Self::new(x, y, side, side)
        }

        /// One past the last column covered by this region.
        #[inline]
        pub fn right(&self) -> u32 {
            self.x + self.width
        }

        /// One past the last row covered by this region.
        #[inline]
        pub fn bottom(&self) -> u32 {
            self.y + self.height
        }

        pub fn area(&self) -> u64 {
            self.width as u64 * self.height as u64
        }

        pub fn is_empty(&self) -> bool {
            self.width == 0 || self.height == 0
        }

        /// Area of the overlap between two regions. Touching edges do not overlap.
        pub fn intersection_area(&self, other: &Region) -> u64 {
            let left = self.x.max(other.x);
            let top = self.y.max(other.y);
            let right = self.right().min(other.right());
            let bottom = self.bottom().min(other.bottom());
            if right <= left || bottom <= top {
                return 0;
            }
            (right - left) as u64 * (bottom - top) as u64
        }

        pub fn overlaps(&self, other: &Region) -> bool {
            self.intersection_area(other) > 0
        }

        /// True when the region is non-empty and lies entirely inside `[0,w)×[0,h)`.
        pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
            !self.is_empty()
                && self.x.checked_add(self.width).is_some_and(|r| r <= image_width)
                && self.y.checked_add(self.height).is_some_and(|b| b <= image_height)
        }

        /// Clips a possibly out-of-range rectangle (signed origin, as detectors report
        /// them) to the image. Returns `None` when nothing of it remains.
        pub fn clamped(
            x: i64,
            y: i64,
            width: i64,
            height: i64,
            image_width: u32,
            image_height: u32,
        ) -> Option<Region> {
            let left = x.clamp(0, image_width as i64);
            let top = y.clamp(0, image_height as i64);
            let right = x.saturating_add(width).clamp(0, image_width as i64);
            let bottom = y.saturating_add(height).clamp(0, image_height as i64);
            if right <= left || bottom <= top {
                return None;
            }
            Some(Region::new(
                left as u32,
                top as u32,
                (right - left) as u32,
                (bottom - top) as u32,
            ))
        }

        /// This region clipped to `[0,w)×[0,h)`, or `None` if it lies fully outside.
        pub fn clip_to(&self, image_width: u32, image_height: u32) -> Option<Region> {
            Region::clamped(
                self.x as i64,
                self.y as i64,
                self.width as i64,
                self.height as i64,
                image_width,
                image_height,
            )
        }

        /// Geometric center of the region.
        pub fn centroid(&self) -> Point {
            Point {
                x: self.x as f32 + self.width as f32 / 2.0,
                y: self.y as f32 + self.height as f32 / 2.0,
            }
        }

        /// Mean of width and height, the "size" reported for a difference.
        pub fn mean_side(&self) -> f32 {
            (self.width + self.height) as f32 / 2.0
        }
    }
}
