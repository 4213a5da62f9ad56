//! Test doubles for driving the simulation without real geometry.

use glam::Vec3;

use super::ball::Ball;
use super::solver::{JumpTrigger, Scoreboard, Solver, StepReport};
use super::world::World;
use crate::audio::{AudioSink, SoundEffect};

/// Solver whose answers are set up by the test.
///
/// `step` moves active balls in straight lines; everything else reports
/// whatever the test queued.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSolver {
    /// Cycled through by `step`; empty means "report from the world"
    pub reports: Vec<StepReport>,
    pub steps_taken: usize,
    /// Returned (once) by the next `test_switch`
    pub switch_pending: bool,
    /// Returned (once) by the next `test_jump`
    pub jump_pending: Option<JumpTrigger>,
    pub rearm_calls: usize,
    /// Balls for which `test_goal` succeeds
    pub goal_balls: Vec<usize>,
}

impl Solver for ScriptedSolver {
    fn step(&mut self, world: &mut World, _gravity: Vec3, dt: f32, current: usize) -> StepReport {
        for ball in world.balls.iter_mut().filter(|b| b.active) {
            ball.pos += ball.vel * dt;
        }

        let report = if self.reports.is_empty() {
            StepReport {
                bounce: 0.0,
                moving: world.balls.get(current).is_some_and(|b| b.is_moving(0.0)),
            }
        } else {
            self.reports[self.steps_taken % self.reports.len()]
        };
        self.steps_taken += 1;
        report
    }

    fn test_switch(&mut self, _world: &mut World) -> bool {
        std::mem::take(&mut self.switch_pending)
    }

    fn test_jump(&mut self, _world: &mut World) -> Option<JumpTrigger> {
        self.jump_pending.take()
    }

    fn rearm_jumps(&mut self, _world: &mut World) {
        self.rearm_calls += 1;
    }

    fn test_goal(&self, world: &World, ball: usize) -> Option<Vec3> {
        self.goal_balls.contains(&ball).then(|| world.balls[ball].pos)
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingAudio {
    pub cues: Vec<(SoundEffect, f32)>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect, intensity: f32) {
        self.cues.push((effect, intensity));
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingScoreboard {
    pub falls: Vec<usize>,
    pub goals: Vec<usize>,
}

impl Scoreboard for RecordingScoreboard {
    fn on_fall(&mut self, ball: usize) {
        self.falls.push(ball);
    }

    fn on_goal(&mut self, ball: usize) {
        self.goals.push(ball);
    }
}

/// Sentinel plus `n` active balls at rest, 10 units apart along +X
pub(crate) fn resting_world(n: usize) -> World {
    let mut balls = vec![Ball::new(Vec3::ZERO, 0.25)];
    for i in 1..=n {
        let mut ball = Ball::new(Vec3::new(10.0 * i as f32, 0.25, 0.0), 0.25);
        ball.active = true;
        balls.push(ball);
    }
    World {
        balls,
        ..Default::default()
    }
}
