// THEORY:
// The `PixelBuffer` is the data primitive every transform reads from and writes to. It
// owns a row-major, 3-channel (RGB8) grid, backed by an `image::RgbImage` so that the
// `image` crate's crop, replace and resize operations can be used directly on it.
//
// Key architectural principles:
// 1.  **Checked Access Only**: Every pixel access is bounds-checked against
//     `[0,W)×[0,H)`. There is no way to reach outside the grid, neither from the
//     buffer itself nor through a view.
// 2.  **Views, Not Copies**: A transform never sees the whole image. It receives a
//     `RegionViewMut`, a live window onto one region whose coordinates are local to the
//     region. The view is created only after the region has been validated against the
//     buffer, and it borrows the buffer mutably, so two views can never alias.
// 3.  **Snapshots on Demand**: Transforms that need the untouched source while writing
//     (warps, rotation, blur) take an owned snapshot of their region with `to_buffer`
//     and write the result back through the view.

pub mod pixel_buffer {
    use crate::core_modules::region::region::Region;
    use crate::error::{DiffError, DiffResult};
    use image::{Rgb, RgbImage, imageops};

    pub const CHANNELS: usize = 3;

    /// Clamps a computed channel value into `[0,255]`, truncating the fraction.
    #[inline]
    pub fn clamp_channel(value: f32) -> u8 {
        value.clamp(0.0, 255.0) as u8
    }

    /// An owned, row-major RGB8 image.
    #[derive(Debug, Clone, PartialEq)]
    pub struct PixelBuffer {
        image: RgbImage,
    }

    impl PixelBuffer {
        /// A black buffer of the given size.
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                image: RgbImage::new(width, height),
            }
        }

        /// A buffer where every pixel has the same color.
        pub fn filled(width: u32, height: u32, color: Rgb<u8>) -> Self {
            Self {
                image: RgbImage::from_pixel(width, height, color),
            }
        }

        /// Wraps raw row-major RGB bytes. The length must be exactly `width * height * 3`.
        pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> DiffResult<Self> {
            let expected = width as usize * height as usize * CHANNELS;
            if data.len() != expected {
                return Err(DiffError::InvalidInput(format!(
                    "expected {} bytes for a {}x{} RGB image, got {}",
                    expected,
                    width,
                    height,
                    data.len()
                )));
            }
            let image = RgbImage::from_raw(width, height, data).ok_or_else(|| {
                DiffError::InvalidInput("failed to create image from raw data".to_string())
            })?;
            Ok(Self { image })
        }

        pub fn from_rgb_image(image: RgbImage) -> Self {
            Self { image }
        }

        pub fn into_rgb_image(self) -> RgbImage {
            self.image
        }

        pub fn as_rgb_image(&self) -> &RgbImage {
            &self.image
        }

        #[inline]
        pub fn width(&self) -> u32 {
            self.image.width()
        }

        #[inline]
        pub fn height(&self) -> u32 {
            self.image.height()
        }

        pub fn dimensions(&self) -> (u32, u32) {
            self.image.dimensions()
        }

        pub fn is_empty(&self) -> bool {
            self.width() == 0 || self.height() == 0
        }

        /// The region covering the whole buffer.
        pub fn bounds(&self) -> Region {
            Region::new(0, 0, self.width(), self.height())
        }

        pub fn get(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
            self.image.get_pixel_checked(x, y).copied()
        }

        /// Writes a pixel. Returns `false` (and writes nothing) when out of bounds.
        pub fn set(&mut self, x: u32, y: u32, pixel: Rgb<u8>) -> bool {
            match self.image.get_pixel_mut_checked(x, y) {
                Some(slot) => {
                    *slot = pixel;
                    true
                }
                None => false,
            }
        }

        pub fn contains(&self, region: &Region) -> bool {
            region.fits_within(self.width(), self.height())
        }

        fn check_region(&self, region: &Region) -> DiffResult<()> {
            if self.contains(region) {
                Ok(())
            } else {
                Err(DiffError::RegionOutOfBounds {
                    x: region.x,
                    y: region.y,
                    width: region.width,
                    height: region.height,
                    image_width: self.width(),
                    image_height: self.height(),
                })
            }
        }

        /// A mutable window onto `region`.
        pub fn view_mut(&mut self, region: Region) -> DiffResult<RegionViewMut<'_>> {
            self.check_region(&region)?;
            Ok(RegionViewMut {
                image: &mut self.image,
                region,
            })
        }

        /// Copies `region` out into a new, owned buffer.
        pub fn crop(&self, region: Region) -> DiffResult<PixelBuffer> {
            self.check_region(&region)?;
            let sub = imageops::crop_imm(&self.image, region.x, region.y, region.width, region.height);
            Ok(PixelBuffer {
                image: sub.to_image(),
            })
        }

        /// Writes `patch` back with its top-left corner at `(x, y)`. The whole patch must
        /// fit inside this buffer.
        pub fn paste(&mut self, x: u32, y: u32, patch: &PixelBuffer) -> DiffResult<()> {
            self.check_region(&Region::new(x, y, patch.width(), patch.height()))?;
            imageops::replace(&mut self.image, &patch.image, x as i64, y as i64);
            Ok(())
        }
    }

    /// A mutable, bounds-checked window onto one region of a `PixelBuffer`.
    /// Coordinates are local to the region; writes land in the parent buffer.
    pub struct RegionViewMut<'a> {
        image: &'a mut RgbImage,
        region: Region,
    }

    impl RegionViewMut<'_> {
        pub fn region(&self) -> Region {
            self.region
        }

        pub fn width(&self) -> u32 {
            self.region.width
        }

        pub fn height(&self) -> u32 {
            self.region.height
        }

        pub fn get(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
            if x < self.region.width && y < self.region.height {
                Some(*self.image.get_pixel(self.region.x + x, self.region.y + y))
            } else {
                None
            }
        }

        /// Reads a pixel that the caller knows to be inside the region.
        ///
        /// Panics on out-of-region coordinates, like slice indexing.
        #[inline]
        pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
            assert!(
                x < self.region.width && y < self.region.height,
                "({x}, {y}) outside {}x{} view",
                self.region.width,
                self.region.height
            );
            *self.image.get_pixel(self.region.x + x, self.region.y + y)
        }

        /// Writes a pixel that the caller knows to be inside the region.
        ///
        /// Panics on out-of-region coordinates, like slice indexing.
        #[inline]
        pub fn put(&mut self, x: u32, y: u32, pixel: Rgb<u8>) {
            assert!(
                x < self.region.width && y < self.region.height,
                "({x}, {y}) outside {}x{} view",
                self.region.width,
                self.region.height
            );
            self.image.put_pixel(self.region.x + x, self.region.y + y, pixel);
        }

        /// Visits every pixel of the region in row-major order.
        pub fn for_each_pixel_mut<F>(&mut self, mut f: F)
        where
            F: FnMut(u32, u32, &mut Rgb<u8>),
        {
            for y in 0..self.region.height {
                for x in 0..self.region.width {
                    let pixel = self.image.get_pixel_mut(self.region.x + x, self.region.y + y);
                    f(x, y, pixel);
                }
            }
        }

        /// Owned copy of the region's current contents.
        pub fn to_buffer(&self) -> PixelBuffer {
            let sub = imageops::crop_imm(
                &*self.image,
                self.region.x,
                self.region.y,
                self.region.width,
                self.region.height,
            );
            PixelBuffer {
                image: sub.to_image(),
            }
        }

        /// Overwrites the region with `source`, which must have the region's size.
        pub fn copy_from(&mut self, source: &PixelBuffer) {
            assert_eq!(
                source.dimensions(),
                (self.region.width, self.region.height),
                "source does not match the view size"
            );
            imageops::replace(
                &mut *self.image,
                &source.image,
                self.region.x as i64,
                self.region.y as i64,
            );
        }
    }
}
