//! Simulation module
//!
//! Everything that advances the course lives here and stays free of rendering
//! and platform dependencies:
//! - Sub-stepped solver scheduling with a smoothed frame time
//! - Jump pad sequencing
//! - Per-frame goal/fall/stop classification
//! - Ball roster (activation and aggressor tagging)
//!
//! Collision math is behind the [`Solver`] trait; [`FlatGreen`] is a small
//! implementation for demos and tests.

pub mod ball;
pub mod green;
pub mod jump;
pub mod roster;
pub mod rules;
pub mod scheduler;
pub mod session;
pub mod solver;
pub mod world;

#[cfg(test)]
pub(crate) mod testing;

pub use ball::{Ball, BallRef, Basis, IDENTITY_BASIS, Pose};
pub use green::FlatGreen;
pub use jump::{JumpSequencer, JumpState};
pub use roster::{BallScope, Roster};
pub use rules::{Outcome, Rules};
pub use scheduler::{Scheduler, StepSummary, SubSteps, subdivide};
pub use session::{Collaborators, Session};
pub use solver::{JumpTrigger, NoScore, Scoreboard, Solver, StepReport};
pub use world::{Goal, JumpPad, Switch, ViewAnchor, World};
