//! Putt Core demo
//!
//! Plays a two-player hole on a flat green without rendering and logs what
//! happens. Usage: `putt-demo [seed] [settings.json]`
//!
//! Run with `RUST_LOG=debug` to see camera, jump and audio cues.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use putt_core::audio::LogAudio;
use putt_core::sim::{
    Ball, BallRef, BallScope, Collaborators, FlatGreen, Goal, JumpPad, Outcome, Scoreboard,
    Session, Switch, ViewAnchor, World,
};
use putt_core::{CameraMode, Settings, yaw_degrees};

const PLAYERS: usize = 2;
const MAX_STROKES: u32 = 12;
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up on a stroke that has not settled after this many frames
const MAX_FRAMES: u32 = 60 * 30;
const GRAVITY: Vec3 = Vec3::new(0.0, -9.8, 0.0);
const GREEN_FRICTION: f32 = 1.0;

/// Logs balls leaving play and counts holes per ball
#[derive(Debug, Default)]
struct Tally {
    holed: Vec<usize>,
    fallen: Vec<usize>,
}

impl Scoreboard for Tally {
    fn on_fall(&mut self, ball: usize) {
        log::info!("ball {ball} fell off the green");
        self.fallen.push(ball);
    }

    fn on_goal(&mut self, ball: usize) {
        log::info!("ball {ball} dropped in while resting");
        self.holed.push(ball);
    }
}

fn demo_course() -> World {
    let mut balls = vec![Ball::new(Vec3::ZERO, 0.25)];
    for x in [-1.0, 1.0] {
        balls.push(Ball::new(Vec3::new(x, 0.25, 4.0), 0.25));
    }

    World {
        balls,
        goals: vec![Goal {
            pos: Vec3::new(0.0, 0.0, -2.0),
            radius: 0.4,
        }],
        switches: vec![Switch {
            pos: Vec3::new(0.0, 0.0, 1.0),
            radius: 0.3,
            on: false,
            occupied: false,
        }],
        jumps: vec![
            JumpPad {
                pos: Vec3::new(3.0, 0.0, 0.0),
                radius: 0.5,
                target: Vec3::new(-3.0, 0.0, 0.0),
                occupied: false,
            },
            JumpPad {
                pos: Vec3::new(-3.0, 0.0, 0.0),
                radius: 0.5,
                target: Vec3::new(3.0, 0.0, 0.0),
                occupied: false,
            },
        ],
        views: vec![
            ViewAnchor {
                pos: Vec3::new(0.0, 12.0, 10.0),
                center: Vec3::ZERO,
            },
            ViewAnchor {
                pos: Vec3::new(0.0, 12.0, -10.0),
                center: Vec3::ZERO,
            },
        ],
    }
}

/// Aim the current ball at the first goal, with some human error
fn line_up(session: &mut Session, rng: &mut Pcg32) {
    let ball = session.pose(BallRef::Current).pos;
    let Some(goal) = session.world().goals.first().map(|g| g.pos) else {
        return;
    };

    // The camera looks along -forward, so forward points back at the ball
    let yaw = yaw_degrees(ball - goal) + rng.random_range(-6.0..6.0);
    session.camera_mut().set_yaw(yaw);

    // Speed that rolls exactly to the cup: v^2 = 2 a d
    let distance = Vec2::new(goal.x - ball.x, goal.z - ball.z).length();
    let speed = (2.0 * GREEN_FRICTION * distance).sqrt() * rng.random_range(0.85..1.2);
    let magnitude = (speed / putt_core::consts::PUTT_SCALE).min(1.0);

    let sense = session.settings().sensitivity();
    session.reset_power();
    session.adjust_power(((1.0 - magnitude) * sense).round() as i32);
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(0x5eed);
    let mut settings = args
        .next()
        .map_or_else(Settings::default, Settings::load_or_default);
    if settings.camera != CameraMode::Manual {
        log::info!("demo aims by yaw, switching camera to manual");
        settings.camera = CameraMode::Manual;
    }

    log::info!("Putt demo starting (seed {seed})");
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut green = FlatGreen::new(Vec2::new(5.0, 6.0))
        .with_friction(GREEN_FRICTION)
        .with_collisions(settings.putt_collisions);
    let mut audio = LogAudio;
    let mut tally = Tally::default();

    let mut session = Session::new(demo_course(), settings);
    session.set_party_size(PLAYERS);
    session.activate(BallScope::Party);

    // Opening fly-in from the first anchor view
    for frame in 0..=30 {
        session.fly(1.0 - frame as f32 / 30.0);
    }

    let mut strokes = [0u32; PLAYERS + 1];
    for stroke in 0..MAX_STROKES {
        let Some(ball) = (1..=PLAYERS)
            .cycle()
            .skip(stroke as usize % PLAYERS)
            .take(PLAYERS)
            .find(|&b| session.world().balls[b].active)
        else {
            break;
        };

        session.assign_ball(ball);
        session.set_aggressor(BallScope::Current, Some(ball as u32));
        let tee = session.pose(BallRef::Current);

        line_up(&mut session, &mut rng);
        let mut collab = Collaborators {
            solver: &mut green,
            audio: &mut audio,
            scoreboard: &mut tally,
        };
        // One still frame so the camera takes the new aim
        session.advance(&mut collab, GRAVITY, 0.0);
        session.putt();
        strokes[ball] += 1;

        let mut outcome = Outcome::None;
        for _ in 0..MAX_FRAMES {
            outcome = session.advance(&mut collab, GRAVITY, FRAME_DT);
            if outcome != Outcome::None {
                break;
            }
        }

        let at = session.pose(BallRef::Current).pos;
        match outcome {
            Outcome::Goal => log::info!("ball {ball} holed in {}", strokes[ball]),
            Outcome::Stop => log::info!("ball {ball} stopped at ({:.2}, {:.2})", at.x, at.z),
            Outcome::Fall => {
                log::info!("ball {ball} fell, back to the tee");
                session.set_pose(BallRef::Current, &tee);
                session.activate(BallScope::Current);
            }
            Outcome::None => log::warn!("ball {ball} never settled"),
        }
    }

    for ball in 1..=PLAYERS {
        let status = if session.world().balls[ball].active {
            "still out"
        } else {
            "holed"
        };
        println!("ball {ball}: {} strokes, {status}", strokes[ball]);
    }
    println!(
        "holed while resting: {:?}, fell: {:?}",
        tally.holed, tally.fallen
    );
}
