//! Jump pad teleport sequencing
//!
//! A jump is a two-phase hop: the ball rises off the source pad, is moved to
//! the destination at the midpoint, then settles onto the destination pad.
//! While a jump runs the solver is not stepped at all. Only one jump can be
//! in progress at a time.

use glam::Vec3;

use super::solver::{JumpTrigger, Solver};
use super::world::World;
use crate::consts::JUMP_DURATION;

/// Phase of the current jump
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum JumpState {
    #[default]
    Inactive,
    /// Trigger detected, destination cached, ball not yet moved
    Armed {
        ball: usize,
        elapsed: f32,
        destination: Vec3,
    },
    /// Past the midpoint; the ball already sits at the destination
    Snapped { ball: usize, elapsed: f32 },
}

/// Drives a single jump from trigger to landing
#[derive(Debug, Clone, Default)]
pub struct JumpSequencer {
    state: JumpState,
}

impl JumpSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.state = JumpState::Inactive;
    }

    pub fn state(&self) -> JumpState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != JumpState::Inactive
    }

    /// Ball being teleported, if any
    pub fn ball(&self) -> Option<usize> {
        match self.state {
            JumpState::Inactive => None,
            JumpState::Armed { ball, .. } | JumpState::Snapped { ball, .. } => Some(ball),
        }
    }

    /// Time since the jump started, if any
    pub fn elapsed(&self) -> Option<f32> {
        match self.state {
            JumpState::Inactive => None,
            JumpState::Armed { elapsed, .. } | JumpState::Snapped { elapsed, .. } => Some(elapsed),
        }
    }

    /// Start a jump. Ignored (returns false) while another jump is running.
    pub fn arm(&mut self, trigger: JumpTrigger) -> bool {
        if self.is_active() {
            return false;
        }
        log::debug!(
            "jump armed: ball {} -> {:?}",
            trigger.ball,
            trigger.destination
        );
        self.state = JumpState::Armed {
            ball: trigger.ball,
            elapsed: 0.0,
            destination: trigger.destination,
        };
        true
    }

    /// Advance the jump clock by `dt`.
    ///
    /// Crossing the midpoint moves the ball to the destination exactly once and
    /// lets the solver re-arm its pads; crossing the full duration ends the jump.
    pub fn advance<S: Solver + ?Sized>(&mut self, world: &mut World, solver: &mut S, dt: f32) {
        if let JumpState::Armed {
            ball,
            elapsed,
            destination,
        } = self.state
        {
            let elapsed = elapsed + dt;
            if elapsed > JUMP_DURATION * 0.5 {
                world.balls[ball].pos = destination;
                solver.rearm_jumps(world);
                log::debug!("jump snapped: ball {ball}");
                self.state = JumpState::Snapped { ball, elapsed };
            } else {
                self.state = JumpState::Armed {
                    ball,
                    elapsed,
                    destination,
                };
            }
        } else if let JumpState::Snapped { ball, elapsed } = self.state {
            self.state = JumpState::Snapped {
                ball,
                elapsed: elapsed + dt,
            };
        }

        if let JumpState::Snapped { ball, elapsed } = self.state {
            if elapsed > JUMP_DURATION {
                log::debug!("jump landed: ball {ball}");
                self.state = JumpState::Inactive;
            }
        }
    }

    /// Field-of-view multiplier: narrows to zero at the midpoint of a jump
    pub fn fov_scale(&self) -> f32 {
        match self.elapsed() {
            Some(elapsed) => 2.0 * (elapsed / JUMP_DURATION - 0.5).abs(),
            None => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testing::{ScriptedSolver, resting_world};

    fn trigger(ball: usize) -> JumpTrigger {
        JumpTrigger {
            ball,
            destination: Vec3::new(-4.0, 1.0, 9.0),
        }
    }

    #[test]
    fn test_only_one_jump_at_a_time() {
        let mut jump = JumpSequencer::new();
        assert!(jump.arm(trigger(1)));
        assert!(!jump.arm(trigger(2)));
        assert_eq!(jump.ball(), Some(1));
    }

    #[test]
    fn test_snap_happens_once_past_midpoint() {
        let mut world = resting_world(2);
        let mut solver = ScriptedSolver::default();
        let mut jump = JumpSequencer::new();
        jump.arm(trigger(2));

        jump.advance(&mut world, &mut solver, 0.3);
        assert!(matches!(jump.state(), JumpState::Armed { .. }));
        assert_eq!(world.balls[2].pos, Vec3::new(20.0, 0.25, 0.0));

        jump.advance(&mut world, &mut solver, 0.3);
        assert!(matches!(jump.state(), JumpState::Snapped { ball: 2, .. }));
        assert_eq!(world.balls[2].pos, Vec3::new(-4.0, 1.0, 9.0));
        assert_eq!(solver.rearm_calls, 1);

        // Moving the ball after the snap must not be undone
        world.balls[2].pos = Vec3::ZERO;
        jump.advance(&mut world, &mut solver, 0.3);
        assert_eq!(world.balls[2].pos, Vec3::ZERO);
        assert_eq!(solver.rearm_calls, 1);
        assert!(jump.is_active());

        jump.advance(&mut world, &mut solver, 0.3);
        assert_eq!(jump.state(), JumpState::Inactive);
    }

    #[test]
    fn test_long_frame_snaps_and_lands_together() {
        let mut world = resting_world(1);
        let mut solver = ScriptedSolver::default();
        let mut jump = JumpSequencer::new();
        jump.arm(trigger(1));

        jump.advance(&mut world, &mut solver, 1.5);
        assert!(!jump.is_active());
        assert_eq!(world.balls[1].pos, Vec3::new(-4.0, 1.0, 9.0));
        assert_eq!(solver.rearm_calls, 1);
    }

    #[test]
    fn test_fov_scale() {
        let mut world = resting_world(1);
        let mut solver = ScriptedSolver::default();
        let mut jump = JumpSequencer::new();
        assert_eq!(jump.fov_scale(), 1.0);

        jump.arm(trigger(1));
        assert!((jump.fov_scale() - 1.0).abs() < 1e-6);
        jump.advance(&mut world, &mut solver, 0.25);
        assert!((jump.fov_scale() - 0.5).abs() < 1e-6);
    }
}
