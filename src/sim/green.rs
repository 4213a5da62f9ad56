//! Flat putting green solver
//!
//! A level-free [`Solver`]: an axis-aligned rectangle of turf at `y = 0`
//! centred on the origin. Balls roll on it with constant rolling resistance,
//! bounce off it when dropped, and fall forever once they leave its edge.
//! Goals, switches and jump pads from the [`World`] are tested as vertical
//! cylinders around their centres.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::ball::{Ball, Basis};
use super::solver::{JumpTrigger, Solver, StepReport};
use super::world::World;
use crate::{normalize_or, orthonormalize};

/// Height above the turf within which a ball counts as touching it
const CONTACT_SLOP: f32 = 1.0e-3;

/// Flat rectangular green
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatGreen {
    /// Half size of the turf along X and Z
    pub half_extents: Vec2,
    /// Rolling deceleration (units/s^2)
    pub friction: f32,
    /// Fraction of vertical speed kept on a bounce
    pub restitution: f32,
    /// Balls collide with each other
    pub collisions: bool,
}

impl Default for FlatGreen {
    fn default() -> Self {
        Self {
            half_extents: Vec2::new(10.0, 10.0),
            friction: 1.5,
            restitution: 0.4,
            collisions: true,
        }
    }
}

impl FlatGreen {
    pub fn new(half_extents: Vec2) -> Self {
        Self {
            half_extents,
            ..Default::default()
        }
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_collisions(mut self, collisions: bool) -> Self {
        self.collisions = collisions;
        self
    }

    /// Point lies above (or below) the turf
    pub fn covers(&self, pos: Vec3) -> bool {
        pos.x.abs() <= self.half_extents.x && pos.z.abs() <= self.half_extents.y
    }

    /// Integrate one ball, returning the impact speed of any bounce
    fn integrate(&self, ball: &mut Ball, gravity: Vec3, dt: f32) -> f32 {
        let mut impact = 0.0;
        let grounded = self.covers(ball.pos) && ball.pos.y <= ball.radius + CONTACT_SLOP;

        if grounded {
            ball.pos.y = ball.pos.y.max(ball.radius);

            if ball.vel.y < 0.0 {
                impact = -ball.vel.y;
                ball.vel.y = impact * self.restitution;
            }
            // Too slow to leave the turf before the next step
            if ball.vel.y <= gravity.length() * dt {
                ball.vel.y = 0.0;
            }

            let rolling = Vec2::new(ball.vel.x, ball.vel.z);
            let speed = rolling.length();
            let slowed = (speed - self.friction * dt).max(0.0);
            let scale = if speed > 0.0 { slowed / speed } else { 0.0 };
            ball.vel.x *= scale;
            ball.vel.z *= scale;

            ball.spin = Vec3::Y.cross(Vec3::new(ball.vel.x, 0.0, ball.vel.z)) / ball.radius;
        } else {
            ball.vel += gravity * dt;
        }

        ball.pos += ball.vel * dt;

        let angle = ball.spin.length() * dt;
        if angle > 0.0 {
            let rotation = Quat::from_axis_angle(ball.spin / ball.spin.length(), angle);
            ball.basis = reorthogonalize(ball.basis.map(|axis| rotation * axis));
        }

        ball.pendulum[1] = normalize_or(-gravity, Vec3::Y);
        orthonormalize(&mut ball.pendulum);

        impact
    }

    /// Ball is touching the cylinder of radius `radius` around `center`
    fn inside(ball: &Ball, center: Vec3, radius: f32) -> bool {
        ball.active && Vec2::new(ball.pos.x - center.x, ball.pos.z - center.z).length() < radius
    }
}

impl Solver for FlatGreen {
    fn step(&mut self, world: &mut World, gravity: Vec3, dt: f32, current: usize) -> StepReport {
        let mut bounce = 0.0f32;
        for ball in world.balls.iter_mut().skip(1).filter(|b| b.active) {
            bounce = bounce.max(self.integrate(ball, gravity, dt));
        }
        if self.collisions {
            bounce = bounce.max(collide_balls(&mut world.balls));
        }

        let moving = world
            .balls
            .get(current)
            .is_some_and(|b| b.active && !b.is_at_rest());
        StepReport { bounce, moving }
    }

    fn test_switch(&mut self, world: &mut World) -> bool {
        let mut toggled = false;
        for switch in &mut world.switches {
            let occupied = world
                .balls
                .iter()
                .skip(1)
                .any(|b| Self::inside(b, switch.pos, switch.radius));

            if occupied && !switch.occupied {
                switch.on = !switch.on;
                toggled = true;
                log::debug!("switch at {:?} turned {}", switch.pos, if switch.on { "on" } else { "off" });
            }
            switch.occupied = occupied;
        }
        toggled
    }

    fn test_jump(&mut self, world: &mut World) -> Option<JumpTrigger> {
        for pad in &mut world.jumps {
            let entrant = world
                .balls
                .iter()
                .enumerate()
                .skip(1)
                .find(|(_, b)| Self::inside(b, pad.pos, pad.radius));

            match entrant {
                Some((ball, b)) if !pad.occupied => {
                    pad.occupied = true;
                    return Some(JumpTrigger {
                        ball,
                        destination: pad.target + (b.pos - pad.pos),
                    });
                }
                Some(_) => {}
                None => pad.occupied = false,
            }
        }
        None
    }

    fn rearm_jumps(&mut self, world: &mut World) {
        for pad in &mut world.jumps {
            pad.occupied = world
                .balls
                .iter()
                .skip(1)
                .any(|b| Self::inside(b, pad.pos, pad.radius));
        }
    }

    fn test_goal(&self, world: &World, ball: usize) -> Option<Vec3> {
        let b = world.balls.get(ball)?;
        world
            .goals
            .iter()
            .find(|goal| Self::inside(b, goal.pos, goal.radius))
            .map(|goal| goal.pos)
    }
}

/// Elastic contact between equal-mass balls. Returns the largest closing speed.
fn collide_balls(balls: &mut [Ball]) -> f32 {
    let mut bounce = 0.0f32;

    for j in 2..balls.len() {
        let (head, tail) = balls.split_at_mut(j);
        let b = &mut tail[0];
        if !b.active {
            continue;
        }

        for a in head.iter_mut().skip(1).filter(|a| a.active) {
            let offset = b.pos - a.pos;
            let distance = offset.length();
            let reach = a.radius + b.radius;
            if distance >= reach || distance <= 1.0e-6 {
                continue;
            }

            let normal = offset / distance;
            let closing = (b.vel - a.vel).dot(normal);
            if closing < 0.0 {
                a.vel += normal * closing;
                b.vel -= normal * closing;
                bounce = bounce.max(-closing);
            }

            let push = normal * (reach - distance) * 0.5;
            a.pos -= push;
            b.pos += push;
        }
    }
    bounce
}

fn reorthogonalize([x, y, _]: Basis) -> Basis {
    let x = normalize_or(x, Vec3::X);
    let y = normalize_or(y - x * x.dot(y), x.any_orthonormal_vector());
    [x, y, x.cross(y)]
}
