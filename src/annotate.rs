// Answer-key overlay: one circle outline per difference, centred on the record's
// position with radius `size / 2`. Drawn with the midpoint circle algorithm; points
// that fall outside the image are skipped.

use crate::core_modules::diff_record::DiffRecord;
use image::{Rgb, RgbImage};

pub const KEY_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Circles every record on `image`.
pub fn draw_answer_key(image: &mut RgbImage, records: &[DiffRecord]) {
    for record in records {
        let cx = record.position.x.round() as i64;
        let cy = record.position.y.round() as i64;
        let radius = (record.size / 2.0).round() as i64;
        draw_circle(image, cx, cy, radius, KEY_COLOR);
    }
}

/// Draws a 1px circle outline.
pub fn draw_circle(image: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
    let mut x = radius;
    let mut y = 0;
    let mut err = 0;

    while x >= y {
        for (dx, dy) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
            put_checked(image, cx + dx, cy + dy, color);
        }

        y += 1;
        err += 1 + 2 * y;
        if 2 * (err - x) + 1 > 0 {
            x -= 1;
            err += 1 - 2 * x;
        }
    }
}

#[inline]
fn put_checked(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x < 0 || y < 0 || x >= image.width() as i64 || y >= image.height() as i64 {
        return;
    }
    image.put_pixel(x as u32, y as u32, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::algorithm_selector::AlgorithmId;
    use crate::core_modules::region::region::Region;

    #[test]
    fn circle_hits_its_extremes_and_skips_the_center() {
        let mut image = RgbImage::new(60, 60);
        let record = DiffRecord::for_region(&Region::new(10, 10, 40, 40), AlgorithmId::Flip);
        draw_answer_key(&mut image, &[record]);
        assert_eq!(*image.get_pixel(50, 30), KEY_COLOR);
        assert_eq!(*image.get_pixel(10, 30), KEY_COLOR);
        assert_eq!(*image.get_pixel(30, 10), KEY_COLOR);
        assert_eq!(*image.get_pixel(30, 50), KEY_COLOR);
        assert_eq!(*image.get_pixel(30, 30), Rgb([0, 0, 0]));
    }

    #[test]
    fn circles_past_the_edge_are_clipped() {
        let mut image = RgbImage::new(20, 20);
        draw_circle(&mut image, 0, 0, 15, KEY_COLOR);
        assert_eq!(*image.get_pixel(15, 0), KEY_COLOR);
        assert_eq!(*image.get_pixel(0, 15), KEY_COLOR);
    }
}
