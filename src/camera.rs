//! Third-person camera
//!
//! Follows the current ball while it moves. When it stops, the camera hunts
//! for the nearest other moving ball. Target changes are eased, never
//! snapped: the view center glides toward the new ball and only commits to it
//! once it arrives.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::{CameraTuning, Settings};
use crate::sim::World;
use crate::sim::ball::{Basis, IDENTITY_BASIS};
use crate::{normalize_or, orthonormalize, yaw_degrees};

/// How the camera's forward axis is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraMode {
    /// Forward axis lags behind the ball's direction of travel
    #[default]
    Chase,
    /// Forward axis set directly by the player's yaw
    Manual,
}

impl CameraMode {
    /// Integer value stored in the key/value configuration
    pub fn as_config(&self) -> i32 {
        match self {
            CameraMode::Chase => 0,
            CameraMode::Manual => 2,
        }
    }

    pub fn from_config(value: i32) -> Self {
        match value {
            2 => CameraMode::Manual,
            _ => CameraMode::Chase,
        }
    }
}

/// Relationship between the camera and a target ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracking {
    /// Arrived; the view center is locked to the ball
    Settled,
    /// Still gliding toward the ball
    Transitioning,
}

/// Camera state
#[derive(Debug, Clone)]
pub struct Camera {
    /// Ideal view distance above the ball
    pub view_dy: f32,
    /// Ideal view distance behind the ball
    pub view_dz: f32,
    /// Yaw about +Y (degrees)
    yaw: f32,
    /// Pending putt strength, shown as the aim marker
    magnitude: f32,
    center: Vec3,
    /// Direction the view trails (opposite the tracked ball's velocity)
    view_vec: Vec3,
    pos: Vec3,
    /// right, up, forward (forward points from the center toward the camera)
    basis: Basis,

    target: usize,
    tracking: Tracking,
    /// Ball the camera last settled on, or is accelerating toward
    last_target: usize,
    last_tracking: Tracking,
    /// Accumulated blend factor of the accelerating approach
    transition_time: f32,
    /// View vector cached at the last commit
    last_view_vec: Vec3,
    /// Where the current transition started from (the last settled target)
    transition_origin: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            view_dy: VIEW_DY,
            view_dz: VIEW_DZ,
            yaw: 0.0,
            magnitude: 0.0,
            center: Vec3::ZERO,
            view_vec: Vec3::ZERO,
            pos: Vec3::new(0.0, VIEW_DY, VIEW_DZ),
            basis: IDENTITY_BASIS,
            target: 0,
            tracking: Tracking::Settled,
            last_target: 0,
            last_tracking: Tracking::Settled,
            transition_time: 0.0,
            last_view_vec: Vec3::ZERO,
            transition_origin: Vec3::ZERO,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.pos
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn basis(&self) -> Basis {
        self.basis
    }

    /// Overwrite the camera pose (renderer or cut-scene control)
    pub fn set_view(&mut self, pos: Vec3, center: Vec3, basis: Basis) {
        self.pos = pos;
        self.center = center;
        self.basis = basis;
        orthonormalize(&mut self.basis);
        self.yaw = yaw_degrees(self.basis[2]);
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn set_yaw(&mut self, degrees: f32) {
        self.yaw = degrees;
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    pub fn view_vector(&self) -> Vec3 {
        self.view_vec
    }

    pub fn target(&self) -> (usize, Tracking) {
        (self.target, self.tracking)
    }

    pub fn last_target(&self) -> (usize, Tracking) {
        (self.last_target, self.last_tracking)
    }

    pub fn transition_time(&self) -> f32 {
        self.transition_time
    }

    /// Lock onto `ball` immediately, making the current view vector the
    /// baseline for the next transition.
    pub fn commit(&mut self, ball: usize) {
        self.target = ball;
        self.last_target = ball;
        self.tracking = Tracking::Settled;
        self.last_tracking = Tracking::Settled;
        self.transition_time = 0.0;
        self.last_view_vec = self.view_vec;
    }

    /// Turn the view by `delta` input units
    pub fn rotate(&mut self, delta: i32, sensitivity: f32) {
        self.yaw += ROTATE_STEP * delta as f32 / sensitivity;
    }

    /// Decrease putt strength by `delta` input units (floored)
    pub fn adjust_power(&mut self, delta: i32, sensitivity: f32) {
        self.magnitude = (self.magnitude - delta as f32 / sensitivity).max(MIN_MAGNITUDE);
    }

    /// Full putt strength
    pub fn reset_power(&mut self) {
        self.magnitude = 1.0;
    }

    /// Velocity a putt gives the ball: along the view direction, scaled by
    /// the pending magnitude, with a small upward nudge.
    pub fn putt_velocity(&self) -> Vec3 {
        -PUTT_SCALE * self.basis[2] * self.magnitude + Vec3::new(0.0, BALL_FUDGE, 0.0)
    }

    /// Consume the pending putt strength
    pub fn take_power(&mut self) -> f32 {
        std::mem::take(&mut self.magnitude)
    }

    /// Triangle marking the aim on the targeted ball: left edge, tip, right edge
    pub fn aim_marker(&self, world: &World) -> Option<[Vec3; 3]> {
        if self.magnitude <= 0.0 {
            return None;
        }
        let ball = world.balls.get(self.target)?;
        let side = self.basis[0] * ball.radius;
        Some([
            ball.pos - side,
            ball.pos + self.basis[2] * self.magnitude,
            ball.pos + side,
        ])
    }

    /// Per-frame update.
    ///
    /// Picks a ball to follow, eases the view center toward it, re-derives the
    /// orientation for the configured mode and eases the camera offsets.
    pub fn update(&mut self, world: &World, current: usize, dt: f32, settings: &Settings) {
        let tuning = settings.camera_tuning;
        let ball = &world.balls[current];
        let follow_current =
            ball.active && (!settings.putt_collisions || ball.speed() - dt > MOVING_EPSILON);

        let candidate = if follow_current {
            Some(current)
        } else {
            self.nearest_moving(world, dt)
        };
        if let Some(candidate) = candidate {
            self.retarget(world, candidate, dt, &tuning);
        }

        let blend = match settings.camera {
            CameraMode::Manual => {
                let a = self.yaw.to_radians();
                self.basis[2] = Vec3::new(a.sin(), 0.0, a.cos());
                1.0
            }
            CameraMode::Chase => {
                let k = self.view_vec.length_squared();
                self.basis[2] = (self.pos - self.center) + self.view_vec * (k * dt * 0.1);
                (2.0 * dt).min(1.0)
            }
        };

        orthonormalize(&mut self.basis);
        self.ease_offsets(blend);
    }

    /// Closest active ball (to the view center) moving faster than the noise margin
    fn nearest_moving(&self, world: &World, dt: f32) -> Option<usize> {
        world
            .balls
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, b)| b.active && b.speed() - dt > MOVING_EPSILON)
            .min_by(|(_, a), (_, b)| {
                a.pos
                    .distance_squared(self.center)
                    .total_cmp(&b.pos.distance_squared(self.center))
            })
            .map(|(i, _)| i)
    }

    /// Follow `candidate`, gliding toward it first if it is not the settled target.
    fn retarget(&mut self, world: &World, candidate: usize, dt: f32, tuning: &CameraTuning) {
        let target = &world.balls[candidate];

        if self.tracking == Tracking::Settled && self.target == candidate {
            self.center = target.pos;
            self.view_vec = -target.vel;
            return;
        }

        self.target = candidate;
        self.tracking = Tracking::Transitioning;

        let last = &world.balls[self.last_target];
        let far = self.last_tracking == Tracking::Transitioning
            || last.pos.distance(self.center) > last.radius * tuning.near_fraction;

        // Once a far transition starts, last_target follows the candidate,
        // so the origin is latched from the settled target beforehand.
        if self.last_tracking == Tracking::Settled {
            self.transition_origin = last.pos;
        }

        let blend = if far {
            self.last_target = candidate;
            self.last_tracking = Tracking::Transitioning;
            self.transition_time += dt * tuning.speed * tuning.acceleration;
            self.transition_time
        } else {
            dt * tuning.speed
        };
        self.center += (target.pos - self.center) * blend.clamp(0.0, 1.0);

        // Swing the view vector from the baseline toward chasing the new target
        // in proportion to how much of the way the center has covered.
        let origin = self.transition_origin;
        let span = origin.distance(target.pos);
        let covered = if span > 1.0e-6 {
            (origin.distance(self.center) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.view_vec = self.last_view_vec.lerp(-target.vel, covered);

        if target.pos.distance(self.center) < target.radius * tuning.arrive_fraction {
            log::debug!("camera settled on ball {candidate}");
            self.commit(candidate);
        }
    }

    /// Ease the (above, behind) offsets toward the ideal and rebuild the position
    fn ease_offsets(&mut self, blend: f32) {
        let d = self.pos - self.center;
        let mut dy = self.basis[1].dot(d);
        let mut dz = self.basis[2].dot(d);

        dy += (self.view_dy - dy) * blend;
        dz += (self.view_dz - dz) * blend;

        self.pos = self.center + self.basis[1] * dy + self.basis[2] * dz;
        self.yaw = yaw_degrees(self.basis[2]);
    }

    /// Cinematic fly-through between the current ball and the hole's anchor views.
    ///
    /// `k = 0` is the view at the ball, `k = 1` anchor view 0, `k = -1`
    /// anchor view 1. Position and center move by `k²`.
    pub fn fly(&mut self, world: &World, current: usize, k: f32) {
        let ball = world.balls.get(current).map_or(Vec3::ZERO, |b| b.pos);

        let forward = match world.goals.first() {
            Some(goal) => normalize_or(ball - goal.pos, Vec3::Z),
            None => Vec3::Z,
        };
        let forward = if Vec3::Y.dot(forward).abs() > 0.999 {
            Vec3::Z
        } else {
            forward
        };
        self.basis = [Vec3::X, Vec3::Y, forward];
        orthonormalize(&mut self.basis);

        let c0 = ball;
        let p0 = ball + self.basis[1] * self.view_dy + self.basis[2] * self.view_dz;

        let anchor = if k >= 0.0 {
            world.views.first()
        } else {
            world.views.get(1)
        };
        let (p1, c1) = anchor.map_or((p0, c0), |v| (v.pos, v.center));

        let t = k * k;
        self.pos = p0 + (p1 - p0) * t;
        self.center = c0 + (c1 - c0) * t;

        self.basis[2] = self.pos - self.center;
        orthonormalize(&mut self.basis);
        self.yaw = yaw_degrees(self.basis[2]);
    }
}
