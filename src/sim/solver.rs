//! Interfaces to the collaborators the simulation drives
//!
//! The solver owns collision math and geometry tests; the scoreboard reacts to
//! balls leaving play. Both are called synchronously from `Session::advance`.

use glam::Vec3;

use super::world::World;

/// Result of one solver sub-step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    /// Largest contact impact seen during the sub-step
    pub bounce: f32,
    /// The current ball is still in motion
    pub moving: bool,
}

/// A ball entered a jump pad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpTrigger {
    pub ball: usize,
    /// Where the ball lands at the midpoint of the jump
    pub destination: Vec3,
}

/// Rigid-body solver and level geometry tests
pub trait Solver {
    /// Integrate every active ball over `dt`
    fn step(&mut self, world: &mut World, gravity: Vec3, dt: f32, current: usize) -> StepReport;

    /// True if any switch changed state since the last call
    fn test_switch(&mut self, world: &mut World) -> bool;

    /// Report a ball that just entered a jump pad
    fn test_jump(&mut self, world: &mut World) -> Option<JumpTrigger>;

    /// Refresh jump pad occupancy without producing a trigger
    fn rearm_jumps(&mut self, world: &mut World);

    /// Goal point if `ball` is inside a goal
    fn test_goal(&self, world: &World, ball: usize) -> Option<Vec3>;
}

/// Reactions to balls leaving play
pub trait Scoreboard {
    fn on_fall(&mut self, ball: usize);
    fn on_goal(&mut self, ball: usize);
}

/// Scoreboard that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScore;

impl Scoreboard for NoScore {
    fn on_fall(&mut self, _ball: usize) {}
    fn on_goal(&mut self, _ball: usize) {}
}
