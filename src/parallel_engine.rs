// THEORY:
// The `ParallelDiffEngine` produces the same kind of result as `DiffEngine` but spreads
// the per-region transforms over a pool of tokio worker tasks. Regions are disjoint, so
// once they are chosen each one can be edited in isolation.
//
// Key architectural principles:
// 1.  **Sequential Decisions, Parallel Pixels**: Validation, region placement, algorithm
//     choice and one seed per region are all drawn from the engine's master RNG before
//     anything is dispatched. Only the pixel work runs concurrently.
// 2.  **Owned Jobs**: Each job carries an owned copy of its region and its own `Pcg32`
//     seed. Workers share nothing, so the output of a region depends only on its pixels,
//     its algorithm and its seed, never on scheduling.
// 3.  **Round-Robin Dispatch**: A single dispatcher task forwards jobs to the workers in
//     turn. Each job carries a `oneshot` sender for its result.
// 4.  **Ordered, All-or-Nothing Commit**: Results are gathered with `join_all` and
//     written back in processing order. If any region failed the caller's image is not
//     touched.

use crate::core_modules::algorithm_selector::AlgorithmId;
use crate::core_modules::detection::DetectedObject;
use crate::core_modules::diff_record::DiffRecord;
use crate::core_modules::difficulty::{DiffCount, Difficulty};
use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
use crate::core_modules::transforms::TransformOutcome;
use crate::engine::{DiffReport, EngineConfig, apply_with_fallback, plan_generation, seeded_rng};
use crate::error::{DiffError, DiffResult};
use futures::future::join_all;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tokio::sync::{mpsc, oneshot};

/// Sizing for the worker pool.
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    pub workers: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
        }
    }
}

pub struct RegionJob {
    pub buffer: PixelBuffer,
    pub algorithm: AlgorithmId,
    pub difficulty: Difficulty,
    pub seed: u64,
    pub result_sender: oneshot::Sender<DiffResult<(PixelBuffer, TransformOutcome)>>,
}

pub struct WorkerPool {
    task_sender: Option<mpsc::UnboundedSender<RegionJob>>,
    workers: Vec<tokio::task::JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns the dispatcher and `workers` worker tasks. Must be called from within a
    /// tokio runtime.
    pub fn new(workers: usize) -> Self {
        let worker_count = workers.max(1);
        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<RegionJob>();

        let (worker_senders, worker_receivers): (Vec<_>, Vec<_>) = (0..worker_count)
            .map(|_| mpsc::unbounded_channel::<RegionJob>())
            .unzip();

        tokio::spawn(async move {
            let mut worker_idx = 0;
            while let Some(job) = task_receiver.recv().await {
                if let Err(mpsc::error::SendError(job)) = worker_senders[worker_idx].send(job) {
                    let _ = job
                        .result_sender
                        .send(Err(DiffError::WorkerUnavailable("worker task has stopped")));
                }
                worker_idx = (worker_idx + 1) % worker_count;
            }
        });

        let mut handles = Vec::with_capacity(worker_count);
        for (id, mut worker_receiver) in worker_receivers.into_iter().enumerate() {
            let worker = tokio::spawn(async move {
                while let Some(job) = worker_receiver.recv().await {
                    log::trace!("worker {} took a {} job", id, job.algorithm.name());
                    let result = Self::process_region_worker(job.buffer, job.algorithm, job.difficulty, job.seed);
                    let _ = job.result_sender.send(result);
                }
            });
            handles.push(worker);
        }
        log::debug!("worker pool started with {} workers", worker_count);

        Self {
            task_sender: Some(task_sender),
            workers: handles,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    fn process_region_worker(
        mut buffer: PixelBuffer,
        algorithm: AlgorithmId,
        difficulty: Difficulty,
        seed: u64,
    ) -> DiffResult<(PixelBuffer, TransformOutcome)> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bounds = buffer.bounds();
        let outcome = {
            let mut view = buffer.view_mut(bounds)?;
            apply_with_fallback(&mut view, algorithm, difficulty, &mut rng)?
        };
        Ok((buffer, outcome))
    }

    /// Sends one region to the pool and waits for the edited copy.
    pub async fn process_region(
        &self,
        buffer: PixelBuffer,
        algorithm: AlgorithmId,
        difficulty: Difficulty,
        seed: u64,
    ) -> DiffResult<(PixelBuffer, TransformOutcome)> {
        let (result_sender, result_receiver) = oneshot::channel();

        let job = RegionJob {
            buffer,
            algorithm,
            difficulty,
            seed,
            result_sender,
        };

        self.task_sender
            .as_ref()
            .ok_or(DiffError::WorkerUnavailable("worker pool has been shut down"))?
            .send(job)
            .map_err(|_| DiffError::WorkerUnavailable("failed to send job to worker pool"))?;

        result_receiver
            .await
            .map_err(|_| DiffError::WorkerUnavailable("failed to receive result from worker"))?
    }

    /// Closes the job channel. The dispatcher and the workers drain and exit; later
    /// jobs fail with `WorkerUnavailable`.
    pub fn shutdown(&mut self) {
        if self.task_sender.take().is_some() {
            log::debug!("worker pool shutting down");
        }
    }
}

/// Difference synthesis with the per-region transforms run on a worker pool.
pub struct ParallelDiffEngine {
    config: EngineConfig,
    rng: Pcg32,
    worker_pool: WorkerPool,
}

impl ParallelDiffEngine {
    /// Must be called from within a tokio runtime.
    pub fn new(config: EngineConfig, parallel: ParallelConfig) -> Self {
        let rng = seeded_rng(config.seed);
        let worker_pool = WorkerPool::new(parallel.workers);
        Self {
            config,
            rng,
            worker_pool,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn worker_pool(&self) -> &WorkerPool {
        &self.worker_pool
    }

    /// Same contract as `DiffEngine::generate`.
    pub async fn generate(
        &mut self,
        image: &mut PixelBuffer,
        detections: &[DetectedObject],
        count: i32,
        difficulty: i32,
    ) -> DiffResult<DiffReport> {
        // --- 1. Decide everything on the master RNG ---
        let plan = plan_generation(
            image,
            detections,
            DiffCount::new(count),
            Difficulty::new(difficulty),
            &self.config.placement,
            &mut self.rng,
        )?;

        let mut jobs = Vec::with_capacity(plan.assignments.len());
        for assignment in &plan.assignments {
            let buffer = image.crop(assignment.region)?;
            let seed: u64 = self.rng.random();
            jobs.push((buffer, assignment.algorithm, seed));
        }

        // --- 2. Fan out ---
        let pool = &self.worker_pool;
        let results = join_all(
            jobs.into_iter()
                .map(|(buffer, algorithm, seed)| pool.process_region(buffer, algorithm, plan.difficulty, seed)),
        )
        .await;

        // --- 3. Write back in processing order ---
        let mut working = image.clone();
        let mut records = Vec::with_capacity(plan.assignments.len());
        let mut regions = Vec::with_capacity(plan.assignments.len());
        for (assignment, result) in plan.assignments.iter().zip(results) {
            let (patch, outcome) = result?;
            working.paste(assignment.region.x, assignment.region.y, &patch)?;
            records.push(DiffRecord::for_region(&assignment.region, outcome.algorithm));
            regions.push(assignment.region);
        }

        *image = working;
        log::info!(
            "generated {} differences at difficulty {} on {} workers",
            records.len(),
            plan.difficulty.get(),
            self.worker_pool.worker_count()
        );
        Ok(DiffReport { records, regions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::region::region::Region;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
            }
        }
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    fn seeded(seed: u64, workers: usize) -> ParallelDiffEngine {
        ParallelDiffEngine::new(
            EngineConfig {
                seed: Some(seed),
                ..EngineConfig::default()
            },
            ParallelConfig { workers },
        )
    }

    #[tokio::test]
    async fn output_does_not_depend_on_worker_count() {
        let source = gradient(320, 240);
        let mut one = source.clone();
        let mut many = source.clone();
        let a = seeded(9, 1).generate(&mut one, &[], 8, 3).await.unwrap();
        let b = seeded(9, 4).generate(&mut many, &[], 8, 3).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(one, many);
        assert_ne!(one, source);
    }

    #[tokio::test]
    async fn pixels_outside_regions_are_untouched() {
        let source = gradient(300, 300);
        let mut image = source.clone();
        let report = seeded(5, 3).generate(&mut image, &[], 6, 7).await.unwrap();
        assert_eq!(report.records.len(), 6);
        for y in 0..300 {
            for x in 0..300 {
                let inside = report
                    .regions
                    .iter()
                    .any(|r| x >= r.x && x < r.right() && y >= r.y && y < r.bottom());
                if !inside {
                    assert_eq!(image.get(x, y), source.get(x, y), "({x}, {y})");
                }
            }
        }
    }

    #[tokio::test]
    async fn worker_reuses_the_fallback() {
        let pool = WorkerPool::new(2);
        let strip = PixelBuffer::filled(1, 12, Rgb([10, 20, 30]));
        let (patch, outcome) = pool
            .process_region(strip, AlgorithmId::ObjectRemoval, Difficulty::new(1), 11)
            .await
            .unwrap();
        assert_ne!(outcome.algorithm, AlgorithmId::ObjectRemoval);
        assert_eq!(patch.bounds(), Region::new(0, 0, 1, 12));
    }

    #[tokio::test]
    async fn stopped_pool_reports_worker_unavailable() {
        let mut pool = WorkerPool::new(1);
        pool.shutdown();
        let err = pool
            .process_region(PixelBuffer::new(4, 4), AlgorithmId::Blur, Difficulty::new(1), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, DiffError::WorkerUnavailable(_)));
    }

    #[tokio::test]
    async fn failure_leaves_the_image_untouched() {
        let mut image = gradient(10, 10);
        let before = image.clone();
        let err = seeded(1, 2).generate(&mut image, &[], 5, 5).await.unwrap_err();
        assert!(matches!(err, DiffError::RegionSelectionFailed { .. }));
        assert_eq!(image, before);
    }
}
