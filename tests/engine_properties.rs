use rand::SeedableRng;
use rand_pcg::Pcg32;
use spot_diff::core_modules::algorithm_selector::Tier;
use spot_diff::core_modules::difficulty::Difficulty;
use spot_diff::core_modules::transforms::{self, FlipMode, TransformDetail};
use spot_diff::{AlgorithmId, DetectedObject, DiffEngine, DiffError, PixelBuffer, Region};

fn pattern(width: u32, height: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 5 % 256) as u8, (y * 3 % 256) as u8, ((x * y) % 256) as u8]);
        }
    }
    PixelBuffer::from_raw(width, height, data).unwrap()
}

fn assert_disjoint_and_inside(regions: &[Region], width: u32, height: u32) {
    for (i, a) in regions.iter().enumerate() {
        assert!(a.fits_within(width, height), "{a:?} escapes {width}x{height}");
        assert!(!a.is_empty());
        for b in &regions[i + 1..] {
            assert_eq!(a.intersection_area(b), 0, "{a:?} overlaps {b:?}");
        }
    }
}

#[test_log::test]
fn small_image_easy_run() {
    let mut engine = DiffEngine::with_seed(200);
    let mut image = pattern(200, 200);
    let report = engine.generate(&mut image, &[], 5, 1).unwrap();

    assert_eq!(report.records.len(), 5);
    assert_disjoint_and_inside(&report.regions, 200, 200);
    for record in &report.records {
        assert!(Tier::Easy.pool().contains(&record.algorithm));
        assert!(record.algorithm_id() <= 9);
    }
}

#[test_log::test]
fn tiny_image_fails_and_is_left_alone() {
    let mut engine = DiffEngine::with_seed(10);
    let mut image = pattern(10, 10);
    let before = image.clone();
    let err = engine.generate(&mut image, &[], 10, 5).unwrap_err();
    assert!(matches!(err, DiffError::RegionSelectionFailed { .. }), "{err}");
    assert_eq!(image, before);
}

#[test_log::test]
fn record_count_follows_clamped_count() {
    for (requested, expected) in [(-3, 5), (5, 5), (7, 7), (10, 10), (40, 10)] {
        let mut engine = DiffEngine::with_seed((requested as u64).wrapping_add(100));
        let mut image = pattern(400, 300);
        let report = engine.generate(&mut image, &[], requested, 4).unwrap();
        assert_eq!(report.records.len(), expected);
        assert_disjoint_and_inside(&report.regions, 400, 300);
    }
}

#[test_log::test]
fn recorded_ids_stay_in_their_tier() {
    for difficulty in 1..=10 {
        let tier = Tier::for_difficulty(Difficulty::new(difficulty));
        let mut engine = DiffEngine::with_seed(difficulty as u64);
        let mut image = pattern(320, 320);
        let report = engine.generate(&mut image, &[], 8, difficulty).unwrap();
        for record in &report.records {
            assert!(
                tier.pool().contains(&record.algorithm),
                "{:?} not in {:?} at difficulty {}",
                record.algorithm,
                tier,
                difficulty
            );
        }
    }
}

#[test_log::test]
fn only_region_pixels_change() {
    let source = pattern(300, 240);
    let mut image = source.clone();
    let detections = [
        DetectedObject::new(3, 0.7, Region::new(20, 20, 60, 45)),
        DetectedObject::new(5, 0.6, Region::new(250, 200, 90, 90)),
    ];
    let report = DiffEngine::with_seed(77)
        .generate(&mut image, &detections, 9, 6)
        .unwrap();
    assert_disjoint_and_inside(&report.regions, 300, 240);
    // The second box is clipped to the image before use.
    assert!(report.regions.contains(&Region::new(20, 20, 60, 45)));
    assert!(report.regions.contains(&Region::new(250, 200, 50, 40)));

    for y in 0..240 {
        for x in 0..300 {
            let inside = report
                .regions
                .iter()
                .any(|r| x >= r.x && x < r.right() && y >= r.y && y < r.bottom());
            if !inside {
                assert_eq!(image.get(x, y), source.get(x, y));
            }
        }
    }
}

#[test_log::test]
fn color_shift_at_hardest_difficulty_stays_within_two() {
    let gray = image::Rgb([100, 100, 100]);
    for seed in 0..8 {
        let mut image = PixelBuffer::filled(64, 64, gray);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut view = image.view_mut(Region::new(8, 8, 40, 40)).unwrap();
        transforms::apply(AlgorithmId::ColorShift, &mut view, Difficulty::new(10), &mut rng).unwrap();
        for y in 0..64 {
            for x in 0..64 {
                let p = image.get(x, y).unwrap();
                for c in 0..3 {
                    assert!((p[c] as i32 - 100).abs() <= 2);
                }
            }
        }
    }
}

#[test_log::test]
fn easy_flip_is_a_single_mirror() {
    let source = pattern(50, 50);
    let region = Region::new(5, 7, 31, 17);
    for seed in 0..16 {
        let mut image = source.clone();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut view = image.view_mut(region).unwrap();
        let outcome = transforms::apply(AlgorithmId::Flip, &mut view, Difficulty::new(2), &mut rng).unwrap();
        assert_eq!(outcome.algorithm, AlgorithmId::Flip);

        let original = |x: u32, y: u32| source.get(region.x + x, region.y + y).unwrap();
        let horizontal = (0..region.height)
            .all(|y| (0..region.width).all(|x| view.pixel(x, y) == original(region.width - 1 - x, y)));
        let vertical = (0..region.height)
            .all(|y| (0..region.width).all(|x| view.pixel(x, y) == original(x, region.height - 1 - y)));
        assert!(horizontal ^ vertical);
        match outcome.detail {
            TransformDetail::Flip(FlipMode::Horizontal) => assert!(horizontal),
            TransformDetail::Flip(FlipMode::Vertical) => assert!(vertical),
            other => panic!("unexpected detail {other:?}"),
        }
    }
}
