//! Per-frame game state classification
//!
//! Bookkeeping for non-current balls (falls, rest overlaps, goals) runs every
//! frame and never blocks progress. The current ball is only classified as
//! holed or stopped once everything on the course has been still for longer
//! than `STOP_DEBOUNCE`, so a teammate's ball coming to rest early does not
//! stall party play.

use super::jump::JumpSequencer;
use super::session::Collaborators;
use super::world::World;
use crate::audio::SoundEffect;
use crate::consts::*;

/// Classification of one simulated frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    /// Play continues
    #[default]
    None,
    /// The current ball was holed
    Goal,
    /// The current ball fell out of the course
    Fall,
    /// Everything came to rest without a goal
    Stop,
}

/// Game rule evaluator
#[derive(Debug, Clone, Default)]
pub struct Rules {
    /// Accumulated settled time. Reset on hole load, ball assignment, any
    /// frame in which the current ball never stopped, and after each
    /// Goal/Stop classification.
    settle_timer: f32,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.settle_timer = 0.0;
    }

    pub fn settle_timer(&self) -> f32 {
        self.settle_timer
    }

    /// Evaluate the post-step world.
    ///
    /// `settled` is the time the current ball spent not moving during this
    /// frame's sub-steps. It doubles as the speed margin below which a ball
    /// counts as still, so integration noise does not read as motion.
    pub fn evaluate(
        &mut self,
        world: &mut World,
        current: usize,
        settled: f32,
        jump: &mut JumpSequencer,
        collab: &mut Collaborators<'_>,
    ) -> Outcome {
        if settled > 0.0 {
            self.settle_timer += settled;
        } else {
            self.settle_timer = 0.0;
        }

        let current_moving = world.balls[current].is_moving(settled);
        let others_moving = world.others_moving(current, settled);

        if collab.solver.test_switch(world) {
            collab.audio.play(SoundEffect::Switch, 1.0);
        }

        if !jump.is_active() {
            if let Some(trigger) = collab.solver.test_jump(world) {
                jump.arm(trigger);
                collab.audio.play(SoundEffect::Jump, 1.0);
            }
        }

        for (i, ball) in world.balls.iter_mut().enumerate().skip(1) {
            if i != current && ball.active && ball.pos.y < FALL_FLOOR {
                ball.active = false;
                ball.stop();
                log::debug!("ball {i} fell out");
                collab.scoreboard.on_fall(i);
            }
        }

        if !others_moving {
            let ball = &mut world.balls[current];
            if ball.active && ball.pos.y < FALL_FLOOR {
                ball.active = false;
                ball.stop();
                log::info!("current ball {current} fell out");
                return Outcome::Fall;
            }
        }

        resolve_rest_overlaps(world, current);

        for i in 1..world.balls.len() {
            let ball = &world.balls[i];
            if i == current || !ball.active || !ball.is_at_rest() {
                continue;
            }
            if collab.solver.test_goal(world, i).is_some() {
                world.balls[i].active = false;
                log::debug!("ball {i} holed");
                collab.scoreboard.on_goal(i);
            }
        }

        if world.balls[current].active
            && !current_moving
            && !others_moving
            && self.settle_timer > STOP_DEBOUNCE
        {
            self.settle_timer = 0.0;

            if collab.solver.test_goal(world, current).is_some() {
                world.balls[current].active = false;
                log::info!("current ball {current} holed");
                return Outcome::Goal;
            }
            log::info!("current ball {current} stopped");
            return Outcome::Stop;
        }

        Outcome::None
    }
}

/// Resting balls may not overlap: of each overlapping resting pair, retire the
/// one that is not being played.
fn resolve_rest_overlaps(world: &mut World, current: usize) {
    let count = world.balls.len();

    for i in 1..count {
        for j in i + 1..count {
            let a = &world.balls[i];
            if !a.active || !a.is_at_rest() {
                break;
            }
            let b = &world.balls[j];
            if !b.active || !b.is_at_rest() {
                continue;
            }

            if a.pos.distance(b.pos) * REST_OVERLAP_FACTOR < a.radius + b.radius {
                let retired = if i == current { j } else { i };
                world.balls[retired].active = false;
                log::debug!("balls {i} and {j} overlap at rest, retiring {retired}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::solver::JumpTrigger;
    use crate::sim::testing::{RecordingAudio, RecordingScoreboard, ScriptedSolver, resting_world};
    use glam::Vec3;

    struct Harness {
        world: World,
        rules: Rules,
        jump: JumpSequencer,
        solver: ScriptedSolver,
        audio: RecordingAudio,
        scores: RecordingScoreboard,
    }

    impl Harness {
        fn new(balls: usize) -> Self {
            Self {
                world: resting_world(balls),
                rules: Rules::new(),
                jump: JumpSequencer::new(),
                solver: ScriptedSolver::default(),
                audio: RecordingAudio::default(),
                scores: RecordingScoreboard::default(),
            }
        }

        fn eval(&mut self, current: usize, settled: f32) -> Outcome {
            let mut collab = Collaborators {
                solver: &mut self.solver,
                audio: &mut self.audio,
                scoreboard: &mut self.scores,
            };
            self.rules
                .evaluate(&mut self.world, current, settled, &mut self.jump, &mut collab)
        }
    }

    #[test]
    fn test_goal_after_debounce_exactly_once() {
        let mut h = Harness::new(1);
        h.solver.goal_balls = vec![1];

        assert_eq!(h.eval(1, 0.6), Outcome::None);
        assert_eq!(h.eval(1, 0.6), Outcome::Goal);
        assert!(!h.world.balls[1].active);
        assert_eq!(h.rules.settle_timer(), 0.0);

        for _ in 0..5 {
            assert_eq!(h.eval(1, 0.6), Outcome::None);
        }
    }

    #[test]
    fn test_stop_without_goal() {
        let mut h = Harness::new(1);
        assert_eq!(h.eval(1, 0.8), Outcome::None);
        assert_eq!(h.eval(1, 0.8), Outcome::Stop);
        assert!(h.world.balls[1].active);
    }

    #[test]
    fn test_motion_resets_debounce() {
        let mut h = Harness::new(1);
        assert_eq!(h.eval(1, 0.9), Outcome::None);
        assert_eq!(h.eval(1, 0.0), Outcome::None);
        assert_eq!(h.eval(1, 0.9), Outcome::None);
        assert_eq!(h.eval(1, 0.2), Outcome::Stop);
    }

    #[test]
    fn test_moving_teammate_blocks_classification() {
        let mut h = Harness::new(2);
        h.world.balls[2].vel = Vec3::new(3.0, 0.0, 0.0);
        assert_eq!(h.eval(1, 0.8), Outcome::None);
        assert_eq!(h.eval(1, 0.8), Outcome::None);

        h.world.balls[2].stop();
        assert_eq!(h.eval(1, 0.1), Outcome::Stop);
    }

    #[test]
    fn test_current_fall_reported_once() {
        let mut h = Harness::new(1);
        h.world.balls[1].pos.y = -11.0;
        h.world.balls[1].vel = Vec3::new(0.0, -5.0, 0.0);
        h.world.balls[1].spin = Vec3::X;

        assert_eq!(h.eval(1, 0.0), Outcome::Fall);
        assert!(!h.world.balls[1].active);
        assert_eq!(h.world.balls[1].vel, Vec3::ZERO);
        assert_eq!(h.world.balls[1].spin, Vec3::ZERO);

        assert_eq!(h.eval(1, 0.0), Outcome::None);
        assert!(h.scores.falls.is_empty());
    }

    #[test]
    fn test_current_fall_waits_for_other_balls() {
        let mut h = Harness::new(2);
        h.world.balls[1].pos.y = -11.0;
        h.world.balls[2].vel = Vec3::X;

        assert_eq!(h.eval(1, 0.0), Outcome::None);
        assert!(h.world.balls[1].active);

        h.world.balls[2].stop();
        assert_eq!(h.eval(1, 0.0), Outcome::Fall);
    }

    #[test]
    fn test_every_other_fall_is_reported() {
        let mut h = Harness::new(3);
        h.world.balls[2].pos.y = -20.0;
        h.world.balls[3].pos.y = -20.0;
        h.world.balls[3].vel = Vec3::NEG_Y;

        assert_eq!(h.eval(1, 0.0), Outcome::None);
        assert_eq!(h.scores.falls, vec![2, 3]);
        assert!(!h.world.balls[2].active && !h.world.balls[3].active);
        assert_eq!(h.world.balls[3].vel, Vec3::ZERO);
    }

    #[test]
    fn test_rest_overlap_never_retires_current() {
        let mut h = Harness::new(3);
        h.world.balls[3].pos = h.world.balls[1].pos + Vec3::new(0.3, 0.0, 0.0);

        h.eval(3, 0.0);
        assert!(!h.world.balls[1].active);
        assert!(h.world.balls[3].active);
        assert!(h.world.balls[2].active);
    }

    #[test]
    fn test_rest_overlap_retires_exactly_one() {
        let mut h = Harness::new(3);
        h.world.balls[3].pos = h.world.balls[2].pos + Vec3::new(0.0, 0.0, 0.4);

        h.eval(1, 0.0);
        let retired = [2, 3].iter().filter(|&&i| !h.world.balls[i].active).count();
        assert_eq!(retired, 1);
        assert!(h.world.balls[1].active);
    }

    #[test]
    fn test_moving_balls_may_overlap() {
        let mut h = Harness::new(2);
        h.world.balls[2].pos = h.world.balls[1].pos;
        h.world.balls[2].vel = Vec3::X;

        h.eval(1, 0.0);
        assert!(h.world.balls[1].active && h.world.balls[2].active);
    }

    #[test]
    fn test_other_ball_goal_independent_of_current() {
        let mut h = Harness::new(3);
        h.solver.goal_balls = vec![2, 3];
        h.world.balls[1].vel = Vec3::X;
        h.world.balls[3].vel = Vec3::Z;

        assert_eq!(h.eval(1, 0.0), Outcome::None);
        assert_eq!(h.scores.goals, vec![2]);
        assert!(!h.world.balls[2].active);
        assert!(h.world.balls[3].active);
    }

    #[test]
    fn test_switch_and_jump_cues() {
        let mut h = Harness::new(2);
        h.solver.switch_pending = true;
        h.solver.jump_pending = Some(JumpTrigger {
            ball: 2,
            destination: Vec3::ONE,
        });

        h.eval(1, 0.0);
        assert_eq!(
            h.audio.cues,
            vec![(SoundEffect::Switch, 1.0), (SoundEffect::Jump, 1.0)]
        );
        assert_eq!(h.jump.ball(), Some(2));
    }

    #[test]
    fn test_jump_not_polled_while_jumping() {
        let mut h = Harness::new(2);
        h.jump.arm(JumpTrigger {
            ball: 1,
            destination: Vec3::ZERO,
        });
        h.solver.jump_pending = Some(JumpTrigger {
            ball: 2,
            destination: Vec3::ONE,
        });

        h.eval(1, 0.0);
        assert_eq!(h.jump.ball(), Some(1));
        assert!(h.solver.jump_pending.is_some());
        assert!(h.audio.cues.is_empty());
    }
}
