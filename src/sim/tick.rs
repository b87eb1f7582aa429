//! Fixed timestep simulation tick
//!
//! Update order within a tick is fixed:
//! controls → fire → target advance → projectiles → dance/ammo → respawn.
//! A hit is therefore always scored before ammunition exhaustion is checked.

use glam::Mat4;

use super::controls::{ControlState, HeldAxes};
use super::physics::{TargetFrames, step_projectiles};
use super::state::{GameRound, RoundPhase, Trigger};
use crate::consts::*;

/// Input sampled once per tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held keys
    pub axes: HeldAxes,
}

/// Matrices captured by the last render pass, consumed by the next tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Anchors {
    /// Barrel muzzle world matrix
    pub barrel: Option<Mat4>,
    /// Cow body world matrix
    pub target_body: Option<Mat4>,
    /// Cow mount world matrix
    pub target_mount: Option<Mat4>,
}

impl Anchors {
    /// Collision frames, when both target matrices were captured
    pub fn target_frames(&self) -> Option<TargetFrames> {
        match (self.target_body, self.target_mount) {
            (Some(body), Some(mount)) => Some(TargetFrames::new(body, mount)),
            _ => None,
        }
    }
}

/// Advance the round by one fixed timestep
pub fn tick(
    round: &mut GameRound,
    controls: &mut ControlState,
    input: &TickInput,
    anchors: &Anchors,
    dt: f32,
) {
    controls.apply(&input.axes);

    round.shot_cooldown = (round.shot_cooldown - dt).max(0.0);
    if input.axes.fire {
        match anchors.barrel {
            Some(barrel) => {
                round.fire(&barrel);
            }
            None => log::debug!("Fire ignored, barrel not placed yet"),
        }
    }

    if round.phase == RoundPhase::TargetAlive {
        round.target.advance(dt);
    }

    let frames = anchors.target_frames();
    step_projectiles(round, frames.as_ref(), dt);

    match round.phase {
        RoundPhase::VictoryDance { elapsed } => {
            let elapsed = elapsed + dt;
            round.phase = RoundPhase::VictoryDance { elapsed };
            if elapsed >= DANCE_SECONDS {
                round.transition(Trigger::DanceFinished);
            }
        }
        RoundPhase::TargetAlive | RoundPhase::TargetRespawning { .. }
            if round.ammo == 0 && !round.any_flying() =>
        {
            round.transition(Trigger::AmmoExhausted);
        }
        _ => {}
    }

    if let RoundPhase::TargetRespawning { remaining } = round.phase {
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            round.transition(Trigger::RespawnElapsed);
        } else {
            round.phase = RoundPhase::TargetRespawning { remaining };
        }
    }

    round.normalize_order();
}
