//! Putt Core - simulation loop of a physics-based putting game
//!
//! Core modules:
//! - `sim`: Sub-stepped physics scheduling, jump sequencing, game rules, ball roster
//! - `camera`: Third-person camera that tracks and retargets between moving balls
//! - `audio`: Sound cue interface
//! - `settings`: Key/value configuration with JSON persistence

pub mod audio;
pub mod camera;
pub mod settings;
pub mod sim;

pub use audio::{AudioSink, SoundEffect};
pub use camera::{Camera, CameraMode, Tracking};
pub use settings::{CameraTuning, ConfigOption, Settings, SettingsError};
pub use sim::{
    Ball, BallRef, BallScope, Collaborators, FlatGreen, JumpSequencer, Outcome, Pose, Rules,
    Scheduler, Scoreboard, Session, Solver, World,
};

use glam::Vec3;

/// Simulation constants
pub mod consts {
    /// Maximum physics sub-step (seconds)
    pub const MAX_DT: f32 = 1.0 / 60.0;
    /// Maximum number of sub-steps per frame (power of two)
    pub const MAX_DN: u32 = 16;

    /// Peak bounce magnitude above which a bump is heard
    pub const BUMP_THRESHOLD: f32 = 0.5;

    /// Balls below this height have fallen out of the hole
    pub const FALL_FLOOR: f32 = -10.0;
    /// Time everything must be still before the frame is classified
    pub const STOP_DEBOUNCE: f32 = 1.0;
    /// Rest-overlap test inflates separation by this factor
    pub const REST_OVERLAP_FACTOR: f32 = 1.1;

    /// Total jump duration (seconds); the ball is relocated at the midpoint
    pub const JUMP_DURATION: f32 = 1.0;

    /// Speed margin used by the camera to treat a ball as moving
    pub const MOVING_EPSILON: f32 = 0.0005;

    /// Ideal view distance above the ball
    pub const VIEW_DY: f32 = 3.0;
    /// Ideal view distance behind the ball
    pub const VIEW_DZ: f32 = 5.0;

    /// Putt speed per unit of aim magnitude
    pub const PUTT_SCALE: f32 = 4.0;
    /// Small upward nudge on every putt so the ball does not start in rolling contact
    pub const BALL_FUDGE: f32 = 0.001;
    /// Lower bound of the aim magnitude while adjusting
    pub const MIN_MAGNITUDE: f32 = 0.25;
    /// Degrees of yaw per unit of rotation input (before sensitivity)
    pub const ROTATE_STEP: f32 = 30.0;
}

/// Normalize `v`, or return `fallback` if `v` is too short to have a direction
#[inline]
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let len = v.length();
    if len.is_finite() && len > 1.0e-6 {
        v / len
    } else {
        fallback
    }
}

/// Re-orthonormalize a (right, up, forward) basis keeping `up` fixed.
///
/// `forward` loses its vertical component. When forward is parallel to up
/// the previous right axis is kept.
pub fn orthonormalize(basis: &mut [Vec3; 3]) {
    let up = normalize_or(basis[1], Vec3::Y);
    let previous_right = basis[0] - up * up.dot(basis[0]);
    let right = normalize_or(
        up.cross(basis[2]),
        normalize_or(previous_right, up.any_orthonormal_vector()),
    );
    let forward = normalize_or(right.cross(up), Vec3::Z);

    basis[0] = right;
    basis[1] = up;
    basis[2] = forward;
}

/// Yaw (degrees) of a forward axis about +Y
#[inline]
pub fn yaw_degrees(forward: Vec3) -> f32 {
    forward.x.atan2(forward.z).to_degrees()
}
