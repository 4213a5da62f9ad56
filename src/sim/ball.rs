//! Ball entity and pose types

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Orientation as three axes (x, y, z)
pub type Basis = [Vec3; 3];

/// Axis-aligned orientation
pub const IDENTITY_BASIS: Basis = [Vec3::X, Vec3::Y, Vec3::Z];

fn identity_basis() -> Basis {
    IDENTITY_BASIS
}

/// A ball on the course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec3,
    #[serde(default)]
    pub vel: Vec3,
    /// Angular velocity
    #[serde(default)]
    pub spin: Vec3,
    /// Rolling orientation
    #[serde(default = "identity_basis")]
    pub basis: Basis,
    /// Pendulum orientation (hangs toward gravity, drawn by the renderer)
    #[serde(default = "identity_basis")]
    pub pendulum: Basis,
    pub radius: f32,
    #[serde(default)]
    pub active: bool,
    /// Player that last put this ball in motion
    #[serde(default)]
    pub aggressor: Option<u32>,
}

impl Ball {
    pub fn new(pos: Vec3, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            spin: Vec3::ZERO,
            basis: IDENTITY_BASIS,
            pendulum: IDENTITY_BASIS,
            radius,
            active: false,
            aggressor: None,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Active and faster than `margin`.
    ///
    /// The margin absorbs integration noise left over after a ball settles.
    #[inline]
    pub fn is_moving(&self, margin: f32) -> bool {
        self.active && self.speed() - margin > 0.0
    }

    /// Exactly zero speed
    #[inline]
    pub fn is_at_rest(&self) -> bool {
        self.speed() <= 0.0
    }

    /// Zero linear and angular velocity
    pub fn stop(&mut self) {
        self.vel = Vec3::ZERO;
        self.spin = Vec3::ZERO;
    }

    pub fn pose(&self) -> Pose {
        Pose {
            pos: self.pos,
            basis: self.basis,
        }
    }

    pub fn set_pose(&mut self, pose: &Pose) {
        self.pos = pose.pos;
        self.basis = pose.basis;
    }
}

/// Position plus rolling orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub pos: Vec3,
    pub basis: Basis,
}

/// Addresses a single ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallRef {
    /// Whichever ball is being played
    Current,
    Index(usize),
}

impl BallRef {
    /// Resolve to a roster index given the current ball
    #[inline]
    pub fn resolve(self, current: usize) -> usize {
        match self {
            BallRef::Current => current,
            BallRef::Index(i) => i,
        }
    }
}

impl From<usize> for BallRef {
    fn from(i: usize) -> Self {
        BallRef::Index(i)
    }
}
