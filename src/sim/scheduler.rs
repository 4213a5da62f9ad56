//! Adaptive physics sub-stepping
//!
//! Rendering usually costs far more than physics, so the physics step is
//! detached from the frame rate. The frame delta is smoothed and then halved
//! until it fits under `MAX_DT`, doubling the number of solver calls each
//! time. The solver thus runs at a rate independent of, but in integral sync
//! with, the render rate. `MAX_DN` bounds the work done after a stall.

use glam::Vec3;

use super::solver::Solver;
use super::world::World;
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;

/// How a frame's simulated time is split
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubSteps {
    /// Number of solver calls (a power of two, at most `MAX_DN`)
    pub count: u32,
    /// Duration of each call
    pub size: f32,
}

impl SubSteps {
    pub const NONE: SubSteps = SubSteps { count: 0, size: 0.0 };

    /// Total simulated time covered
    #[inline]
    pub fn total(&self) -> f32 {
        self.count as f32 * self.size
    }
}

/// Split `total` into power-of-two sub-steps no larger than `MAX_DT`
/// (unless the `MAX_DN` cap is hit first)
pub fn subdivide(total: f32) -> SubSteps {
    if total <= 0.0 {
        return SubSteps::NONE;
    }

    let mut size = total;
    let mut count = 1;
    while size > MAX_DT && count < MAX_DN {
        size /= 2.0;
        count *= 2;
    }
    SubSteps { count, size }
}

/// What the solver reported over one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepSummary {
    /// Peak bounce magnitude over all sub-steps
    pub bounce: f32,
    /// Simulated time the current ball spent not moving
    pub settled: f32,
}

/// Frame-delta smoother and sub-step driver
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    /// Exponentially smoothed frame delta. Reset on hole load.
    smoothed: f32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.smoothed = 0.0;
    }

    pub fn smoothed_dt(&self) -> f32 {
        self.smoothed
    }

    /// Fold `dt` into the smoothed delta and plan the frame's sub-steps.
    ///
    /// A non-positive `dt` plans nothing and leaves the smoothing untouched.
    pub fn plan(&mut self, dt: f32) -> SubSteps {
        if dt <= 0.0 {
            return SubSteps::NONE;
        }

        self.smoothed = (7.0 * self.smoothed + dt) / 8.0;
        let steps = subdivide(self.smoothed);
        log::trace!(
            "frame dt {:.4} smoothed {:.4} -> {} x {:.5}",
            dt,
            self.smoothed,
            steps.count,
            steps.size
        );
        steps
    }

    /// Run the planned sub-steps through the solver.
    ///
    /// Plays a bump scaled by how far the peak bounce exceeds
    /// `BUMP_THRESHOLD`.
    pub fn run<S: Solver + ?Sized>(
        &self,
        steps: SubSteps,
        world: &mut World,
        solver: &mut S,
        audio: &mut dyn AudioSink,
        gravity: Vec3,
        current: usize,
    ) -> StepSummary {
        let mut summary = StepSummary::default();

        for _ in 0..steps.count {
            let report = solver.step(world, gravity, steps.size, current);
            summary.bounce = summary.bounce.max(report.bounce);
            if !report.moving {
                summary.settled += steps.size;
            }
        }

        if summary.bounce > BUMP_THRESHOLD {
            audio.play(SoundEffect::Bump, (summary.bounce - BUMP_THRESHOLD) * 2.0);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::solver::StepReport;
    use crate::sim::testing::{RecordingAudio, ScriptedSolver};
    use proptest::prelude::*;

    #[test]
    fn test_small_delta_single_step() {
        let steps = subdivide(MAX_DT * 0.5);
        assert_eq!(steps.count, 1);
        assert!((steps.size - MAX_DT * 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_large_delta_halves_until_fit() {
        let steps = subdivide(MAX_DT * 3.0);
        assert_eq!(steps.count, 4);
        assert!(steps.size <= MAX_DT);
    }

    #[test]
    fn test_stall_is_capped() {
        let steps = subdivide(10.0);
        assert_eq!(steps.count, MAX_DN);
        assert!(steps.size > MAX_DT);
        assert!((steps.total() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_dt_plans_nothing() {
        let mut scheduler = Scheduler::new();
        scheduler.plan(0.02);
        let before = scheduler.smoothed_dt();

        assert_eq!(scheduler.plan(0.0), SubSteps::NONE);
        assert_eq!(scheduler.smoothed_dt(), before);
    }

    #[test]
    fn test_smoothing_converges() {
        let mut scheduler = Scheduler::new();
        for _ in 0..200 {
            scheduler.plan(0.02);
        }
        assert!((scheduler.smoothed_dt() - 0.02).abs() < 1e-5);
    }

    #[test]
    fn test_run_accumulates_bounce_and_settled_time() {
        let mut world = World::default();
        let mut solver = ScriptedSolver::default();
        solver.reports = vec![
            StepReport {
                bounce: 0.2,
                moving: true,
            },
            StepReport {
                bounce: 0.9,
                moving: false,
            },
        ];
        let mut audio = RecordingAudio::default();
        let scheduler = Scheduler::new();
        let steps = SubSteps {
            count: 4,
            size: 0.005,
        };

        let summary = scheduler.run(steps, &mut world, &mut solver, &mut audio, Vec3::NEG_Y, 1);

        assert_eq!(solver.steps_taken, 4);
        assert!((summary.bounce - 0.9).abs() < 1e-6);
        // reports cycle: moving, still, moving, still
        assert!((summary.settled - 0.01).abs() < 1e-6);
        assert_eq!(audio.cues.len(), 1);
        assert_eq!(audio.cues[0].0, SoundEffect::Bump);
        assert!((audio.cues[0].1 - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_soft_bounce_is_silent() {
        let mut world = World::default();
        let mut solver = ScriptedSolver::default();
        solver.reports = vec![StepReport {
            bounce: 0.5,
            moving: true,
        }];
        let mut audio = RecordingAudio::default();

        Scheduler::new().run(subdivide(0.01), &mut world, &mut solver, &mut audio, Vec3::NEG_Y, 1);
        assert!(audio.cues.is_empty());
    }

    proptest! {
        #[test]
        fn prop_substeps_cover_smoothed_delta(
            warmup in proptest::collection::vec(0.0001f32..0.5, 0..8),
            dt in 0.0001f32..5.0,
        ) {
            let mut scheduler = Scheduler::new();
            for d in warmup {
                scheduler.plan(d);
            }
            let steps = scheduler.plan(dt);
            let s = scheduler.smoothed_dt();

            prop_assert!(steps.count.is_power_of_two());
            prop_assert!(steps.count <= MAX_DN);
            prop_assert!((steps.total() - s).abs() <= s * 1e-5);
            prop_assert!(steps.size <= MAX_DT || steps.count == MAX_DN);
        }
    }
}
