//! Sound cue interface
//!
//! The core only decides *when* a cue fires and how loud; playback belongs
//! to the host.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ball hit something hard enough to be heard
    Bump,
    /// A switch toggled
    Switch,
    /// A ball entered a jump pad
    Jump,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Bump => "bump",
            SoundEffect::Switch => "switch",
            SoundEffect::Jump => "jump",
        }
    }
}

/// Fire-and-forget sound playback
pub trait AudioSink {
    /// Play `effect` at `intensity` (1.0 = nominal volume)
    fn play(&mut self, effect: SoundEffect, intensity: f32);
}

/// Audio sink that drops every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _effect: SoundEffect, _intensity: f32) {}
}

/// Audio sink that logs cues at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, intensity: f32) {
        log::debug!("audio: {} ({:.2})", effect.as_str(), intensity);
    }
}
