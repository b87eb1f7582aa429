//! Tomato Tank - a scene-graph turret tank lobbing tomatoes at a roaming cow
//!
//! Core modules:
//! - `scene`: Scene graph model, transform stack and evaluator
//! - `sim`: Deterministic simulation (projectiles, target, round state machine)
//! - `camera`: View and projection selection per viewport
//! - `renderer`: Render service boundary (matrices, colors, draw calls)
//! - `input`: Key mapping into continuous axes and discrete commands
//! - `game`: Fixed-timestep driver tying everything together
//! - `audio`, `highscores`, `settings`: sound notifications and persisted state

pub mod audio;
pub mod camera;
pub mod game;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use highscores::{HighScore, ScoreStore};
pub use scene::{SceneError, SceneGraph};
pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one continuous-input sample per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest wall-clock delta accepted per frame (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Target orbit (world units)
    pub const TARGET_ORBIT_RADIUS: f32 = 10.0;
    pub const TARGET_HEIGHT: f32 = 2.5;
    /// Target collision box half extents, in the target body's local frame
    pub const TARGET_HALF_EXTENTS: [f32; 3] = [1.3 / 2.0, 0.7 / 2.0, 0.5 / 2.0];
    pub const TARGET_MAX_HP: u8 = 5;
    /// Initial angular speed (radians/s) and per-level increase
    pub const TARGET_START_SPEED: f32 = 0.5;
    pub const TARGET_SPEED_STEP: f32 = 0.3;
    /// Seconds before a defeated target comes back
    pub const RESPAWN_SECONDS: f32 = 3.0;
    /// Seconds the victory dance lasts before the round ends
    pub const DANCE_SECONDS: f32 = 6.0;
    /// Dance wobble amplitude (degrees) and rate (per millisecond)
    pub const DANCE_AMPLITUDE_DEG: f32 = 30.0;
    pub const DANCE_RATE: f32 = 0.01;

    /// Projectile launch speed along the barrel axis
    pub const LAUNCH_SPEED: f32 = 50.0;
    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 150.0;
    /// Height at which a projectile counts as landed
    pub const GROUND_OFFSET: f32 = 0.3;
    /// Minimum time between accepted shots (seconds)
    pub const SHOT_INTERVAL: f32 = 0.2;

    /// Ammunition allotments
    pub const ROUND_AMMO: u32 = 5;
    pub const PRACTICE_AMMO: u32 = ROUND_AMMO * 10;

    /// Scoring, multiplied by the current level
    pub const HIT_POINTS: u64 = 100;
    pub const MISS_POINTS: u64 = 10;

    /// Control rates per tick and limits
    pub const MOVE_STEP: f32 = 0.1;
    pub const TURN_STEP_DEG: f32 = 1.0;
    pub const CANNON_MIN_DEG: f32 = -102.0;
    pub const CANNON_MAX_DEG: f32 = 30.0;
    pub const CANNON_START_DEG: f32 = -90.0;
    /// Wheel spin per unit of forward travel
    pub const WHEEL_SPIN_FACTOR: f32 = -50.0;

    /// Floor checkerboard
    pub const FLOOR_TILES: u32 = 20;
    pub const FLOOR_TILE_SIZE: f32 = 2.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Point on the target orbit for a given angle (radians)
#[inline]
pub fn orbit_position(angle: f32) -> Vec3 {
    Vec3::new(
        consts::TARGET_ORBIT_RADIUS * angle.cos(),
        consts::TARGET_HEIGHT,
        consts::TARGET_ORBIT_RADIUS * angle.sin(),
    )
}
