//! Round state and core simulation types
//!
//! `GameRound` owns the target, the projectile set and the scoring counters.
//! Every phase change goes through [`GameRound::transition`].

use glam::{Mat4, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{normalize_angle, orbit_position};

/// Current phase of the round state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No active round; target absent, practice ammunition
    Idle,
    /// Target roaming and hittable
    TargetAlive,
    /// Target defeated, waiting to come back
    TargetRespawning { remaining: f32 },
    /// Player ran dry; the target taunts before the round ends
    VictoryDance { elapsed: f32 },
}

impl RoundPhase {
    pub fn is_playing(&self) -> bool {
        !matches!(self, RoundPhase::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Idle => "idle",
            RoundPhase::TargetAlive => "target-alive",
            RoundPhase::TargetRespawning { .. } => "target-respawning",
            RoundPhase::VictoryDance { .. } => "victory-dance",
        }
    }
}

/// Inputs to the round state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// External start/stop action
    Toggle,
    /// Physics brought the target to zero hit-points
    TargetDefeated,
    /// Respawn countdown ran out
    RespawnElapsed,
    /// No ammunition and nothing left in the air
    AmmoExhausted,
    /// Dance timer ran out
    DanceFinished,
}

/// Projectile flight state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    /// Integrating under gravity
    Flying,
    /// Resting on the ground plane
    Landed,
    /// Stuck to the target; `pos` is in the target's mount frame
    Attached,
}

/// A tomato
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec3,
    pub vel: Vec3,
    pub state: ProjectileState,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec3, vel: Vec3) -> Self {
        Self {
            id,
            pos,
            vel,
            state: ProjectileState::Flying,
        }
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        self.state == ProjectileState::Flying
    }
}

/// The roaming cow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Angle on the orbit (radians)
    pub angle: f32,
    /// +1 or -1
    pub direction: f32,
    /// Angular speed (radians/s)
    pub speed: f32,
    pub hp: u8,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            angle: 0.0,
            direction: 1.0,
            speed: TARGET_START_SPEED,
            hp: 0,
        }
    }
}

impl Target {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn position(&self) -> Vec3 {
        orbit_position(self.angle)
    }

    /// Yaw (degrees) so the cow faces along the orbit
    pub fn yaw_degrees(&self) -> f32 {
        -(self.angle.to_degrees() - 90.0)
    }

    /// Advance along the orbit
    pub fn advance(&mut self, dt: f32) {
        self.angle = normalize_angle(self.angle + self.direction * self.speed * dt);
    }

    /// World placement of the cow subtree. `dance` is the elapsed dance time in seconds.
    pub fn mount_matrix(&self, dance: Option<f32>) -> Mat4 {
        let mut m = Mat4::from_translation(self.position())
            * Mat4::from_rotation_y(self.yaw_degrees().to_radians());
        if let Some(elapsed) = dance {
            m *= Mat4::from_rotation_x(dance_angle(elapsed).to_radians());
        }
        m
    }
}

/// Wobble angle (degrees) for the victory dance
#[inline]
pub fn dance_angle(elapsed: f32) -> f32 {
    DANCE_AMPLITUDE_DEG * (elapsed * 1000.0 * DANCE_RATE).sin()
}

/// Fire-and-forget notifications for audio and UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired,
    EmptyGun,
    /// Projectile stuck to the target
    Hit { hp: u8 },
    /// Projectile reached the ground
    Landed,
    TargetDefeated,
    TargetRespawned { level: u32 },
    RoundStarted,
    RoundEnded { score: u64, new_best: bool },
    DanceStarted,
    DanceEnded,
    LandedCleared { count: usize },
}

/// RNG state wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete round state
#[derive(Debug, Clone)]
pub struct GameRound {
    pub rng_state: RngState,
    rng: Pcg32,
    pub phase: RoundPhase,
    pub target: Target,
    pub ammo: u32,
    pub score: u64,
    pub level: u32,
    /// Best score ever recorded
    pub best: u64,
    /// Projectiles (sorted by id)
    pub projectiles: Vec<Projectile>,
    /// Seconds until the next shot is accepted
    pub shot_cooldown: f32,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameRound {
    /// Create an idle round with the given seed and previously stored best score
    pub fn new(seed: u64, best: u64) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            rng: rng_state.to_rng(),
            rng_state,
            phase: RoundPhase::Idle,
            target: Target::default(),
            ammo: PRACTICE_AMMO,
            score: 0,
            level: 1,
            best,
            projectiles: Vec::new(),
            shot_cooldown: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase.is_playing()
    }

    /// Allocate a new projectile ID
    fn next_projectile_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place the target somewhere new with full hit-points
    pub fn spawn_target(&mut self) {
        self.target.angle = self.rng.random::<f32>() * std::f32::consts::TAU;
        self.target.direction = if self.rng.random_bool(0.5) { -1.0 } else { 1.0 };
        self.target.hp = TARGET_MAX_HP;
    }

    /// Apply a trigger to the state machine. Returns true if the phase changed.
    pub fn transition(&mut self, trigger: Trigger) -> bool {
        use RoundPhase::*;
        match (self.phase, trigger) {
            (Idle, Trigger::Toggle) => {
                self.start_round();
                true
            }
            (_, Trigger::Toggle) | (VictoryDance { .. }, Trigger::DanceFinished) => {
                self.end_round();
                true
            }
            (TargetAlive, Trigger::TargetDefeated) => {
                self.phase = TargetRespawning {
                    remaining: RESPAWN_SECONDS,
                };
                true
            }
            (TargetRespawning { .. }, Trigger::RespawnElapsed) => {
                self.level += 1;
                self.target.speed += TARGET_SPEED_STEP;
                self.spawn_target();
                self.phase = TargetAlive;
                log::info!("Target respawned at level {}", self.level);
                self.events.push(GameEvent::TargetRespawned { level: self.level });
                true
            }
            (TargetAlive | TargetRespawning { .. }, Trigger::AmmoExhausted) => {
                self.phase = VictoryDance { elapsed: 0.0 };
                log::info!("Out of ammunition, target starts dancing");
                self.events.push(GameEvent::DanceStarted);
                true
            }
            (phase, trigger) => {
                log::debug!("Ignoring {:?} in phase {}", trigger, phase.as_str());
                false
            }
        }
    }

    fn start_round(&mut self) {
        self.score = 0;
        self.level = 1;
        self.ammo = ROUND_AMMO;
        self.target.speed = TARGET_START_SPEED;
        self.spawn_target();
        self.phase = RoundPhase::TargetAlive;
        log::info!("Round started (best so far: {})", self.best);
        self.events.push(GameEvent::RoundStarted);
    }

    fn end_round(&mut self) {
        if matches!(self.phase, RoundPhase::VictoryDance { .. }) {
            self.events.push(GameEvent::DanceEnded);
        }
        let new_best = self.score > self.best;
        if new_best {
            self.best = self.score;
        }
        self.target.hp = 0;
        self.projectiles.clear();
        self.ammo = PRACTICE_AMMO;
        self.phase = RoundPhase::Idle;
        log::info!("Round ended with score {} (new best: {})", self.score, new_best);
        self.events.push(GameEvent::RoundEnded {
            score: self.score,
            new_best,
        });
    }

    /// Try to fire from the barrel muzzle. Returns true if a projectile was spawned.
    pub fn fire(&mut self, barrel: &Mat4) -> bool {
        if self.shot_cooldown > 0.0 {
            return false;
        }
        self.shot_cooldown = SHOT_INTERVAL;
        if self.ammo == 0 {
            self.events.push(GameEvent::EmptyGun);
            return false;
        }
        let pos = barrel.transform_point3(Vec3::ZERO);
        let vel = barrel.transform_vector3(Vec3::Y * LAUNCH_SPEED);
        let id = self.next_projectile_id();
        self.projectiles.push(Projectile::new(id, pos, vel));
        self.ammo -= 1;
        log::debug!("Shot {} fired from {:?}, {} left", id, pos, self.ammo);
        self.events.push(GameEvent::ShotFired);
        true
    }

    /// Remove projectiles resting on the ground
    pub fn clear_landed(&mut self) -> usize {
        let before = self.projectiles.len();
        self.projectiles
            .retain(|p| p.state != ProjectileState::Landed);
        let count = before - self.projectiles.len();
        self.events.push(GameEvent::LandedCleared { count });
        count
    }

    /// Remove projectiles stuck to the target
    pub fn clear_attached(&mut self) {
        self.projectiles
            .retain(|p| p.state != ProjectileState::Attached);
    }

    /// True while any projectile is still in the air
    pub fn any_flying(&self) -> bool {
        self.projectiles.iter().any(Projectile::is_flying)
    }

    /// Elapsed dance time, if dancing
    pub fn dance_elapsed(&self) -> Option<f32> {
        match self.phase {
            RoundPhase::VictoryDance { elapsed } => Some(elapsed),
            _ => None,
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure projectiles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.projectiles.sort_by_key(|p| p.id);
    }

    /// HUD-facing view of the round
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            phase: self.phase.as_str(),
            ammo: self.ammo,
            hp: self.target.hp,
            score: self.score,
            level: self.level,
            best: self.best,
            target: self.target.is_alive().then(|| self.target.position()),
        }
    }
}

/// Values the HUD displays each frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSnapshot {
    pub phase: &'static str,
    pub ammo: u32,
    pub hp: u8,
    pub score: u64,
    pub level: u32,
    pub best: u64,
    pub target: Option<Vec3>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_is_idle() {
        let round = GameRound::new(7, 0);
        assert_eq!(round.phase, RoundPhase::Idle);
        assert_eq!(round.ammo, PRACTICE_AMMO);
        assert!(!round.target.is_alive());
    }

    #[test]
    fn test_toggle_starts_and_stops() {
        let mut round = GameRound::new(7, 0);
        assert!(round.transition(Trigger::Toggle));
        assert_eq!(round.phase, RoundPhase::TargetAlive);
        assert_eq!(round.ammo, ROUND_AMMO);
        assert_eq!(round.target.hp, TARGET_MAX_HP);
        assert_eq!(round.level, 1);

        round.score = 250;
        assert!(round.transition(Trigger::Toggle));
        assert_eq!(round.phase, RoundPhase::Idle);
        assert_eq!(round.best, 250);
        assert!(!round.target.is_alive());
        assert_eq!(round.ammo, PRACTICE_AMMO);
    }

    #[test]
    fn test_invalid_triggers_ignored() {
        let mut round = GameRound::new(7, 0);
        assert!(!round.transition(Trigger::TargetDefeated));
        assert!(!round.transition(Trigger::DanceFinished));
        assert!(!round.transition(Trigger::AmmoExhausted));
        assert_eq!(round.phase, RoundPhase::Idle);
    }

    #[test]
    fn test_spawn_is_seeded() {
        let mut a = GameRound::new(42, 0);
        let mut b = GameRound::new(42, 0);
        a.transition(Trigger::Toggle);
        b.transition(Trigger::Toggle);
        assert_eq!(a.target.angle, b.target.angle);
        assert_eq!(a.target.direction, b.target.direction);
    }

    #[test]
    fn test_fire_respects_cooldown_and_ammo() {
        let mut round = GameRound::new(1, 0);
        round.transition(Trigger::Toggle);
        let barrel = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0));

        assert!(round.fire(&barrel));
        assert_eq!(round.ammo, ROUND_AMMO - 1);
        assert_eq!(round.projectiles[0].pos, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(round.projectiles[0].vel, Vec3::new(0.0, LAUNCH_SPEED, 0.0));

        // Still cooling down
        assert!(!round.fire(&barrel));
        assert_eq!(round.projectiles.len(), 1);

        round.shot_cooldown = 0.0;
        round.ammo = 0;
        round.drain_events();
        assert!(!round.fire(&barrel));
        assert_eq!(round.drain_events(), vec![GameEvent::EmptyGun]);
    }

    #[test]
    fn test_advance_wraps_angle() {
        let mut target = Target {
            angle: 0.01,
            direction: -1.0,
            speed: 1.0,
            hp: TARGET_MAX_HP,
        };
        target.advance(0.02);
        assert!((target.angle - (std::f32::consts::TAU - 0.01)).abs() < 1e-5);

        target.direction = 1.0;
        for _ in 0..10_000 {
            target.advance(0.5);
            assert!((0.0..std::f32::consts::TAU).contains(&target.angle));
        }
    }

    #[test]
    fn test_mount_matrix_places_target_on_orbit() {
        let target = Target {
            angle: 0.0,
            ..Default::default()
        };
        let origin = target.mount_matrix(None).transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(TARGET_ORBIT_RADIUS, TARGET_HEIGHT, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_clear_landed_keeps_others() {
        let mut round = GameRound::new(1, 0);
        round.projectiles = vec![
            Projectile::new(1, Vec3::ZERO, Vec3::ZERO),
            Projectile {
                state: ProjectileState::Landed,
                ..Projectile::new(2, Vec3::ZERO, Vec3::ZERO)
            },
            Projectile {
                state: ProjectileState::Attached,
                ..Projectile::new(3, Vec3::ZERO, Vec3::ZERO)
            },
        ];
        assert_eq!(round.clear_landed(), 1);
        let ids: Vec<u32> = round.projectiles.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
