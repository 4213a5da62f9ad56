//! World snapshot for one hole
//!
//! Loaded once per hole and owned by the session until the hole unloads.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ball::Ball;

/// A cup the ball can be holed in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Center of the cup at rim height
    pub pos: Vec3,
    pub radius: f32,
}

/// A floor switch toggled when a ball rolls onto it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Switch {
    pub pos: Vec3,
    pub radius: f32,
    /// Current toggle state
    #[serde(default)]
    pub on: bool,
    /// A ball is standing on the switch
    #[serde(default)]
    pub occupied: bool,
}

/// A jump pad teleporting balls to `target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpPad {
    pub pos: Vec3,
    pub radius: f32,
    /// Destination of the pad's center
    pub target: Vec3,
    /// A ball is inside the pad (pad will not fire again until it leaves)
    #[serde(default)]
    pub occupied: bool,
}

/// A fixed camera anchor used by fly-through transitions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewAnchor {
    /// Camera position
    pub pos: Vec3,
    /// Point looked at
    pub center: Vec3,
}

/// Everything the simulation owns for the duration of a hole
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// Index 0 is a sentinel; playable balls start at 1
    pub balls: Vec<Ball>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub switches: Vec<Switch>,
    #[serde(default)]
    pub jumps: Vec<JumpPad>,
    #[serde(default)]
    pub views: Vec<ViewAnchor>,
}

impl World {
    /// Parse a hole. The ball list must at least hold the sentinel.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let world: World = serde_json::from_str(json)?;
        if world.balls.is_empty() {
            return Err(serde::de::Error::custom("world has no sentinel ball"));
        }
        Ok(world)
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    /// Zero every ball's linear and angular velocity
    pub fn stop_all(&mut self) {
        for ball in &mut self.balls {
            ball.stop();
        }
    }

    /// Any ball other than `current` moving faster than `margin`
    pub fn others_moving(&self, current: usize, margin: f32) -> bool {
        self.balls
            .iter()
            .enumerate()
            .skip(1)
            .any(|(i, b)| i != current && b.is_moving(margin))
    }
}
