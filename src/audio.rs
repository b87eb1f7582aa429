//! Sound notifications
//!
//! The game only says *what* happened; an [`AudioBackend`] decides how it
//! sounds. Backend failures are logged and never reach game logic.

use thiserror::Error;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Tomato leaves the barrel
    Shot,
    /// Trigger pulled with no ammunition
    EmptyGun,
    /// Tomato hits the cow or the ground
    Splat,
    /// Cow took a hit
    SadCow,
    /// Cow defeated
    DeadCow,
    /// Background music for a scored round
    MusicStart,
    MusicStop,
    /// Victory dance
    Celebrate,
    EndCelebration,
    /// Engine loop while a motion key is held
    MoveStart,
    MoveStop,
}

impl SoundEffect {
    /// Effects that stop a loop. These go through even when muted.
    pub fn is_stop(self) -> bool {
        matches!(
            self,
            SoundEffect::MusicStop | SoundEffect::EndCelebration | SoundEffect::MoveStop
        )
    }
}

/// Error reported by an audio backend
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio backend unavailable: {0}")]
    Unavailable(String),
    #[error("failed to play {effect:?}: {message}")]
    Playback {
        effect: SoundEffect,
        message: String,
    },
}

/// Something that can make noise
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Backend that only logs (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioBackend for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        log::trace!("sound {:?} at volume {:.2}", effect, volume);
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    master_volume: f32,
    muted: bool,
    moving: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(LogAudio))
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            muted: false,
            moving: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 && !effect.is_stop() {
            return;
        }
        if let Err(err) = self.backend.play(effect, vol) {
            log::warn!("Audio degraded: {}", err);
        }
    }

    /// Engine loop follows the held motion keys
    pub fn set_moving(&mut self, moving: bool) {
        if moving == self.moving {
            return;
        }
        self.moving = moving;
        self.play(if moving {
            SoundEffect::MoveStart
        } else {
            SoundEffect::MoveStop
        });
    }

    /// Sounds for a simulation event
    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ShotFired => self.play(SoundEffect::Shot),
            GameEvent::EmptyGun => self.play(SoundEffect::EmptyGun),
            GameEvent::Hit { .. } => {
                self.play(SoundEffect::Splat);
                self.play(SoundEffect::SadCow);
            }
            GameEvent::Landed => self.play(SoundEffect::Splat),
            GameEvent::TargetDefeated => self.play(SoundEffect::DeadCow),
            GameEvent::RoundStarted => self.play(SoundEffect::MusicStart),
            GameEvent::RoundEnded { .. } => self.play(SoundEffect::MusicStop),
            GameEvent::DanceStarted => self.play(SoundEffect::Celebrate),
            GameEvent::DanceEnded => self.play(SoundEffect::EndCelebration),
            GameEvent::TargetRespawned { .. } | GameEvent::LandedCleared { .. } => {}
        }
    }
}
