//! Per-hole simulation session
//!
//! Owns the world snapshot together with the camera, jump, scheduler and rule
//! state for the duration of one hole. The game loop drives it once per frame
//! through [`Session::advance`] and renders from [`Session::camera`].

use glam::Vec3;

use super::ball::{BallRef, Pose};
use super::jump::JumpSequencer;
use super::roster::{BallScope, Roster};
use super::rules::{Outcome, Rules};
use super::scheduler::Scheduler;
use super::solver::{Scoreboard, Solver};
use super::world::World;
use crate::audio::AudioSink;
use crate::camera::Camera;
use crate::settings::Settings;

/// External collaborators called during a frame
pub struct Collaborators<'a> {
    pub solver: &'a mut dyn Solver,
    pub audio: &'a mut dyn AudioSink,
    pub scoreboard: &'a mut dyn Scoreboard,
}

/// Simulation state for one hole
#[derive(Debug, Clone)]
pub struct Session {
    world: World,
    settings: Settings,
    camera: Camera,
    jump: JumpSequencer,
    scheduler: Scheduler,
    rules: Rules,
    /// Ball being played (0 until a ball is assigned)
    current: usize,
    /// Number of balls controlled by active players
    party: usize,
}

impl Session {
    /// Load a hole. Every playable ball starts inactive.
    ///
    /// `world.balls` must hold at least the sentinel at index 0.
    pub fn new(world: World, settings: Settings) -> Self {
        assert!(!world.balls.is_empty(), "world has no sentinel ball");
        let mut session = Self {
            world,
            settings,
            camera: Camera::new(),
            jump: JumpSequencer::new(),
            scheduler: Scheduler::new(),
            rules: Rules::new(),
            current: 0,
            party: 1,
        };
        session.inactivate(BallScope::All);

        log::info!(
            "hole loaded: {} balls, {} goals, {} jumps, {} switches",
            session.world.ball_count().saturating_sub(1),
            session.world.goals.len(),
            session.world.jumps.len(),
            session.world.switches.len()
        );
        session
    }

    /// Unload the hole, handing the world back
    pub fn into_world(self) -> World {
        self.world
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn jump(&self) -> &JumpSequencer {
        &self.jump
    }

    pub fn current_ball(&self) -> usize {
        self.current
    }

    pub fn party_size(&self) -> usize {
        self.party
    }

    pub fn set_party_size(&mut self, party: usize) {
        self.party = party;
    }

    /// Advance the simulation by one rendered frame.
    ///
    /// Either the solver is sub-stepped or, while a jump is running, the jump
    /// sequencer alone advances. The post-step world is then classified and
    /// the camera follows.
    pub fn advance(&mut self, collab: &mut Collaborators<'_>, gravity: Vec3, dt: f32) -> Outcome {
        let steps = self.scheduler.plan(dt);

        let settled = if self.jump.is_active() {
            self.jump.advance(&mut self.world, &mut *collab.solver, dt);
            0.0
        } else {
            self.scheduler
                .run(
                    steps,
                    &mut self.world,
                    &mut *collab.solver,
                    &mut *collab.audio,
                    gravity,
                    self.current,
                )
                .settled
        };

        let outcome =
            self.rules
                .evaluate(&mut self.world, self.current, settled, &mut self.jump, collab);

        self.camera
            .update(&self.world, self.current, dt, &self.settings);
        outcome
    }

    /// Make `ball` the ball in play.
    ///
    /// The camera locks onto it, every ball stops, and the jump and settle
    /// timers start over.
    pub fn assign_ball(&mut self, ball: usize) {
        assert!(ball < self.world.balls.len(), "ball {ball} out of range");
        self.current = ball;
        self.camera.commit(ball);
        self.world.stop_all();
        self.jump.reset();
        self.rules.reset();
        log::debug!("playing ball {ball}");
    }

    /// Launch the current ball along the aim, consuming the pending power
    pub fn putt(&mut self) {
        let vel = self.camera.putt_velocity();
        let power = self.camera.take_power();
        self.world.balls[self.current].vel = vel;
        log::debug!("putt ball {} power {:.2}", self.current, power);
    }

    pub fn pose(&self, ball: BallRef) -> Pose {
        self.world.balls[ball.resolve(self.current)].pose()
    }

    pub fn set_pose(&mut self, ball: BallRef, pose: &Pose) {
        let i = ball.resolve(self.current);
        self.world.balls[i].set_pose(pose);
    }

    pub fn rotate_view(&mut self, delta: i32) {
        self.camera.rotate(delta, self.settings.sensitivity());
    }

    pub fn adjust_power(&mut self, delta: i32) {
        self.camera.adjust_power(delta, self.settings.sensitivity());
    }

    pub fn reset_power(&mut self) {
        self.camera.reset_power();
    }

    /// Position the camera along the fly-through path (`k` in `[-1, 1]`)
    pub fn fly(&mut self, k: f32) {
        self.camera.fly(&self.world, self.current, k.clamp(-1.0, 1.0));
    }

    /// Field of view for this frame.
    ///
    /// Narrows while the camera's own ball is mid-jump, and locks the camera
    /// onto that ball so it does not glide after the teleport.
    pub fn field_of_view(&mut self, base: f32) -> f32 {
        match self.jump.ball() {
            Some(ball) if ball == self.camera.target().0 => {
                self.camera.commit(ball);
                base * self.jump.fov_scale()
            }
            _ => base,
        }
    }

    pub fn roster(&mut self) -> Roster<'_> {
        Roster::new(&mut self.world, self.current, self.party)
    }

    pub fn activate(&mut self, scope: BallScope) {
        self.roster().activate(scope);
    }

    pub fn inactivate(&mut self, scope: BallScope) {
        self.roster().inactivate(scope);
    }

    pub fn aggressor(&self, ball: BallRef) -> Option<u32> {
        self.world.balls[ball.resolve(self.current)].aggressor
    }

    pub fn set_aggressor(&mut self, scope: BallScope, player: Option<u32>) {
        self.roster().set_aggressor(scope, player);
    }
}
