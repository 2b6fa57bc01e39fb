// THEORY:
// The `engine` module is the top-level API of the difference synthesiser. It wires the
// leaf components together into one call: given an image, the detector's boxes, a
// count and a difficulty, it places regions, picks an algorithm for each, applies it,
// and returns the answer key.
//
// Stages of `DiffEngine::generate`:
// 1.  **Validation & Clamping**: An empty image is rejected. Count and difficulty are
//     clamped into range, never rejected.
// 2.  **Planning**: Regions are selected (detector boxes first, random squares to fill)
//     and one algorithm is drawn per region. The draw happens exactly once per region
//     and the same value is used both to dispatch and to report, so the answer key can
//     never disagree with what was painted.
// 3.  **Application**: Each region is edited through its own view. Regions are
//     disjoint, so the edits never see each other's output.
// 4.  **Commit**: Edits are made on a working copy that replaces the caller's image only
//     when every region succeeded. A failed call leaves the image untouched.
//
// The engine owns a single `Pcg32` stream. Seeding it (`EngineConfig::seed`) makes a
// whole run reproducible.

use crate::core_modules::algorithm_selector::{AlgorithmId, select_algorithm, select_algorithm_excluding};
use crate::core_modules::detection::DetectedObject;
use crate::core_modules::diff_record::DiffRecord;
use crate::core_modules::difficulty::{DiffCount, Difficulty};
use crate::core_modules::pixel_buffer::pixel_buffer::{PixelBuffer, RegionViewMut};
use crate::core_modules::region::region::Region;
use crate::core_modules::region_selector::PlacementConfig;
use crate::core_modules::region_selector::region_selector;
use crate::core_modules::transforms::{self, TransformOutcome};
use crate::error::{DiffError, DiffResult};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Configuration for the DiffEngine.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Seed for the engine's random stream. `None` draws a seed from the thread RNG.
    pub seed: Option<u64>,
    /// Random region placement tunables.
    pub placement: PlacementConfig,
}

/// The output of one successful `generate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffReport {
    /// One record per changed region, in processing order.
    pub records: Vec<DiffRecord>,
    /// The regions that were changed, parallel to `records`.
    pub regions: Vec<Region>,
}

/// One region and the algorithm chosen for it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Assignment {
    pub region: Region,
    pub algorithm: AlgorithmId,
}

/// Everything decided before any pixel is touched.
#[derive(Debug, Clone)]
pub(crate) struct GenerationPlan {
    pub difficulty: Difficulty,
    pub assignments: Vec<Assignment>,
}

/// The main, top-level struct for difference synthesis.
pub struct DiffEngine {
    config: EngineConfig,
    rng: Pcg32,
}

impl DiffEngine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = seeded_rng(config.seed);
        Self { config, rng }
    }

    /// An engine with default placement and a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(EngineConfig {
            seed: Some(seed),
            ..EngineConfig::default()
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Synthesises `count` differences in `image` (mutated in place on success).
    ///
    /// `count` is clamped to `[5,10]` and `difficulty` to `[1,10]`.
    pub fn generate(
        &mut self,
        image: &mut PixelBuffer,
        detections: &[DetectedObject],
        count: i32,
        difficulty: i32,
    ) -> DiffResult<DiffReport> {
        let plan = plan_generation(
            image,
            detections,
            DiffCount::new(count),
            Difficulty::new(difficulty),
            &self.config.placement,
            &mut self.rng,
        )?;

        let mut working = image.clone();
        let mut records = Vec::with_capacity(plan.assignments.len());
        let mut regions = Vec::with_capacity(plan.assignments.len());

        for assignment in &plan.assignments {
            let mut view = working.view_mut(assignment.region)?;
            let outcome = apply_with_fallback(&mut view, assignment.algorithm, plan.difficulty, &mut self.rng)?;
            records.push(DiffRecord::for_region(&assignment.region, outcome.algorithm));
            regions.push(assignment.region);
        }

        *image = working;
        log::info!(
            "generated {} differences at difficulty {}",
            records.len(),
            plan.difficulty.get()
        );
        Ok(DiffReport { records, regions })
    }
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> Pcg32 {
    match seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_rng(&mut rand::rng()),
    }
}

/// Validates the input, selects regions and draws one algorithm per region.
pub(crate) fn plan_generation<R: Rng + ?Sized>(
    image: &PixelBuffer,
    detections: &[DetectedObject],
    count: DiffCount,
    difficulty: Difficulty,
    placement: &PlacementConfig,
    rng: &mut R,
) -> DiffResult<GenerationPlan> {
    if image.is_empty() {
        return Err(DiffError::InvalidInput(format!(
            "empty {}x{} image",
            image.width(),
            image.height()
        )));
    }

    let (width, height) = image.dimensions();
    let candidates: Vec<Region> = detections
        .iter()
        .filter_map(|d| d.region_within(width, height))
        .collect();
    log::debug!(
        "{} of {} detections usable as candidate regions",
        candidates.len(),
        detections.len()
    );

    let regions = region_selector::select_regions(width, height, &candidates, count.get(), placement, rng)?;
    if regions.is_empty() {
        return Err(DiffError::NoRegionsAvailable);
    }

    let assignments = regions
        .into_iter()
        .map(|region| {
            let algorithm = select_algorithm(difficulty, rng);
            log::debug!("region {:?} -> {}", region, algorithm.name());
            Assignment { region, algorithm }
        })
        .collect();

    Ok(GenerationPlan {
        difficulty,
        assignments,
    })
}

/// Applies `first`, and if it fails, the remaining algorithms of the same tier in
/// random order until one succeeds. A transform that fails has not written anything,
/// so each retry starts from the original region.
pub(crate) fn apply_with_fallback<R: Rng + ?Sized>(
    view: &mut RegionViewMut<'_>,
    first: AlgorithmId,
    difficulty: Difficulty,
    rng: &mut R,
) -> DiffResult<TransformOutcome> {
    let mut tried: Vec<AlgorithmId> = Vec::new();
    let mut algorithm = first;
    loop {
        match transforms::apply(algorithm, view, difficulty, rng) {
            Ok(outcome) => {
                log::trace!("{:?}: {:?}", view.region(), outcome.detail);
                return Ok(outcome);
            }
            Err(err) => {
                log::warn!(
                    "{} failed on {:?}: {}; reselecting",
                    algorithm.name(),
                    view.region(),
                    err
                );
                tried.push(algorithm);
                match select_algorithm_excluding(difficulty, &tried, rng) {
                    Some(next) => algorithm = next,
                    None => {
                        return Err(DiffError::TransformFailed {
                            algorithm,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }
    }
}
