//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by projectile ID)
//! - No rendering or platform dependencies

pub mod controls;
pub mod physics;
pub mod state;
pub mod tick;

pub use controls::{ControlState, ControlVar, HeldAxes};
pub use physics::{TargetFrames, check_ground, check_target_hit, in_hit_box, integrate};
pub use state::{
    GameEvent, GameRound, Projectile, ProjectileState, RoundPhase, RoundSnapshot, Target, Trigger,
};
pub use tick::{Anchors, TickInput, tick};
