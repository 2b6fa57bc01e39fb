// THEORY:
// The `RegionSelector` decides *where* differences go. It is a stateless utility, like
// a detector pass: given the image size, a list of candidate rectangles (usually the
// detector's boxes) and a target count, it returns that many mutually disjoint regions.
//
// Algorithm:
// 1.  **Seeding from Candidates**: Candidates are clipped-checked, shuffled, and taken
//     greedily, skipping any that would overlap one already taken. Shuffling first means
//     that when there are more candidates than needed, the ones kept are a uniform
//     random subset, exactly as "shuffle then truncate" would give, while the greedy
//     pass keeps the result disjoint even when the detector's boxes overlap each other.
// 2.  **Random Fill**: While short, a random square is drawn: top-left inside
//     `[0, W-m]×[0, H-m]` with `m = max(margin, min_side)`, side in
//     `[min_side, max_side]`, clipped so it stays inside the image. It is kept only if it has zero-area intersection with
//     everything kept so far.
// 3.  **Bounded Retries**: The fill loop gives up after `max_attempts` draws, and an
//     image smaller than `min_side` in either direction is refused up front. Both end
//     in `RegionSelectionFailed` rather than spinning forever.

use crate::core_modules::region::region::Region;
use crate::error::{DiffError, DiffResult};
use rand::Rng;
use rand::seq::SliceRandom;

/// Tunables for random region placement.
#[derive(Debug, Clone)]
pub struct PlacementConfig {
    /// Smallest side of a randomly placed square.
    pub min_side: u32,
    /// Largest side of a randomly placed square, before clipping to the image.
    pub max_side: u32,
    /// Top-left corners are drawn from `[0, W - edge_margin]×[0, H - edge_margin]`.
    pub edge_margin: u32,
    /// Random draws allowed before placement is declared impossible.
    pub max_attempts: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            min_side: 30,
            max_side: 100,
            edge_margin: 50,
            max_attempts: 10_000,
        }
    }
}

pub mod region_selector {
    use super::*;

    /// Picks `count` mutually non-overlapping regions inside a `width`x`height` image,
    /// preferring `candidates` and filling the rest with random squares.
    pub fn select_regions<R: Rng + ?Sized>(
        image_width: u32,
        image_height: u32,
        candidates: &[Region],
        count: usize,
        config: &PlacementConfig,
        rng: &mut R,
    ) -> DiffResult<Vec<Region>> {
        let mut regions: Vec<Region> = Vec::with_capacity(count);
        if count == 0 {
            return Ok(regions);
        }

        // --- 1. Seeding ---
        let mut pool: Vec<Region> = candidates
            .iter()
            .copied()
            .filter(|c| c.fits_within(image_width, image_height))
            .collect();
        if pool.len() < candidates.len() {
            log::warn!(
                "ignoring {} candidate regions outside the {}x{} image",
                candidates.len() - pool.len(),
                image_width,
                image_height
            );
        }
        pool.shuffle(rng);

        for candidate in pool {
            if regions.len() == count {
                break;
            }
            if regions.iter().all(|kept| !kept.overlaps(&candidate)) {
                regions.push(candidate);
            } else {
                log::debug!("skipping candidate {:?}: overlaps a kept region", candidate);
            }
        }

        // --- 2. Random fill ---
        if regions.len() < count {
            fill_randomly(&mut regions, image_width, image_height, count, config, rng)?;
        }

        Ok(regions)
    }

    fn fill_randomly<R: Rng + ?Sized>(
        regions: &mut Vec<Region>,
        image_width: u32,
        image_height: u32,
        count: usize,
        config: &PlacementConfig,
        rng: &mut R,
    ) -> DiffResult<()> {
        let min_side = config.min_side.max(1);
        let max_side = config.max_side.max(min_side);
        let failure = |placed: usize, attempts: u32| DiffError::RegionSelectionFailed {
            requested: count,
            placed,
            attempts,
            width: image_width,
            height: image_height,
        };

        if image_width < min_side || image_height < min_side {
            log::warn!(
                "{}x{} image is smaller than the minimum region side {}",
                image_width,
                image_height,
                min_side
            );
            return Err(failure(regions.len(), 0));
        }

        // Corners stay at least `min_side` from the far edges, so a clipped square
        // never falls below the minimum side.
        let corner_margin = config.edge_margin.max(min_side);
        let max_x = image_width.saturating_sub(corner_margin);
        let max_y = image_height.saturating_sub(corner_margin);
        let mut attempts = 0u32;

        while regions.len() < count {
            if attempts >= config.max_attempts {
                log::warn!(
                    "gave up placing regions after {} attempts ({} of {} placed)",
                    attempts,
                    regions.len(),
                    count
                );
                return Err(failure(regions.len(), attempts));
            }
            attempts += 1;

            let x = rng.random_range(0..=max_x);
            let y = rng.random_range(0..=max_y);
            let side = rng
                .random_range(min_side..=max_side)
                .min(image_width - x)
                .min(image_height - y);
            let candidate = Region::square(x, y, side);

            if regions.iter().all(|kept| !kept.overlaps(&candidate)) {
                regions.push(candidate);
            }
        }

        log::debug!("placed {} regions in {} attempts", regions.len(), attempts);
        Ok(())
    }
}
