//! Live control variables the scene graph can reference by name
//!
//! Only the continuous-input sampler mutates these, once per tick.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A control variable a transform component may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlVar {
    /// Forward/back offset of the tank
    Move,
    /// Wheel spin derived from `Move`
    MoveWheels,
    /// Cabin yaw (degrees)
    TurnCabin,
    /// Cannon pitch (degrees)
    TurnCannon,
}

impl ControlVar {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlVar::Move => "move",
            ControlVar::MoveWheels => "moveWheels",
            ControlVar::TurnCabin => "turnCabin",
            ControlVar::TurnCannon => "turnCannon",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "move" => Some(ControlVar::Move),
            "moveWheels" => Some(ControlVar::MoveWheels),
            "turnCabin" => Some(ControlVar::TurnCabin),
            "turnCannon" => Some(ControlVar::TurnCannon),
            _ => None,
        }
    }
}

/// Continuous axes held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeldAxes {
    /// -1 (back), 0, +1 (forward)
    pub drive: i8,
    /// -1 (clockwise), 0, +1 (counter clockwise)
    pub traverse: i8,
    /// -1 (lower), 0, +1 (raise)
    pub elevate: i8,
    pub fire: bool,
}

impl HeldAxes {
    /// True when any motion axis is active (drives the engine sound)
    pub fn is_moving(&self) -> bool {
        self.drive != 0 || self.traverse != 0 || self.elevate != 0
    }
}

/// Tank pose controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub move_offset: f32,
    pub turn_cabin: f32,
    pub turn_cannon: f32,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            move_offset: 0.0,
            turn_cabin: 0.0,
            turn_cannon: CANNON_START_DEG,
        }
    }
}

impl ControlState {
    /// Current value of a control variable
    #[inline]
    pub fn value(&self, var: ControlVar) -> f32 {
        match var {
            ControlVar::Move => self.move_offset,
            ControlVar::MoveWheels => self.move_offset * WHEEL_SPIN_FACTOR,
            ControlVar::TurnCabin => self.turn_cabin,
            ControlVar::TurnCannon => self.turn_cannon,
        }
    }

    /// Apply one tick's worth of held axes
    pub fn apply(&mut self, axes: &HeldAxes) {
        self.move_offset += axes.drive as f32 * MOVE_STEP;
        self.turn_cabin += axes.traverse as f32 * TURN_STEP_DEG;
        self.set_cannon(self.turn_cannon + axes.elevate as f32 * TURN_STEP_DEG);
    }

    /// Set cannon pitch, clamped to the mount's range
    pub fn set_cannon(&mut self, degrees: f32) {
        self.turn_cannon = degrees.clamp(CANNON_MIN_DEG, CANNON_MAX_DEG);
    }

    /// Back to the parked pose
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
