//! Projectile integration and collision
//!
//! The target's collision volume is a fixed box in the cow body's own frame,
//! so every test first pulls the projectile into that frame with the inverse
//! of the body's current world matrix.

use glam::{Mat4, Vec3};

use super::state::{GameEvent, GameRound, Projectile, ProjectileState, Trigger};
use crate::consts::*;

/// World matrices captured while drawing the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetFrames {
    /// World to cow body (the `Archibald` node)
    world_to_body: Mat4,
    /// World to the cow mount (before the cow subtree's own transforms)
    world_to_mount: Mat4,
}

impl TargetFrames {
    pub fn new(body: Mat4, mount: Mat4) -> Self {
        Self {
            world_to_body: body.inverse(),
            world_to_mount: mount.inverse(),
        }
    }

    /// Position in the cow body's frame
    #[inline]
    pub fn to_body(&self, world: Vec3) -> Vec3 {
        self.world_to_body.transform_point3(world)
    }

    /// Position in the cow mount's frame
    #[inline]
    pub fn to_mount(&self, world: Vec3) -> Vec3 {
        self.world_to_mount.transform_point3(world)
    }
}

/// Gravity vector (vertical only)
#[inline]
pub fn gravity() -> Vec3 {
    Vec3::new(0.0, -GRAVITY, 0.0)
}

/// Explicit Euler step; resting projectiles are frozen
pub fn integrate(projectile: &mut Projectile, dt: f32) {
    if !projectile.is_flying() {
        return;
    }
    projectile.pos += projectile.vel * dt;
    projectile.vel += gravity() * dt;
}

/// Land a flying projectile that dipped below the ground offset.
/// Returns true only on the transition tick.
pub fn check_ground(projectile: &mut Projectile) -> bool {
    if !projectile.is_flying() || projectile.pos.y >= GROUND_OFFSET {
        return false;
    }
    projectile.pos.y = GROUND_OFFSET;
    projectile.state = ProjectileState::Landed;
    true
}

/// Axis-aligned containment in the body frame (inclusive bounds)
#[inline]
pub fn in_hit_box(local: Vec3) -> bool {
    let half = Vec3::from_array(TARGET_HALF_EXTENTS);
    local.abs().cmple(half).all()
}

/// Stick a flying projectile to the target if it is inside the hit box.
/// On a hit `pos` is re-expressed in the mount frame so it rides along.
pub fn check_target_hit(projectile: &mut Projectile, frames: &TargetFrames) -> bool {
    if !projectile.is_flying() || !in_hit_box(frames.to_body(projectile.pos)) {
        return false;
    }
    projectile.pos = frames.to_mount(projectile.pos);
    projectile.state = ProjectileState::Attached;
    true
}

/// Integrate and test every projectile for one tick.
///
/// The target test runs before the ground test, so a projectile that is both
/// inside the hit box and below the ground offset counts as a hit.
pub fn step_projectiles(round: &mut GameRound, frames: Option<&TargetFrames>, dt: f32) {
    let playing = round.is_playing();
    let mut defeated = false;

    for i in 0..round.projectiles.len() {
        let projectile = &mut round.projectiles[i];
        if !projectile.is_flying() {
            continue;
        }
        integrate(projectile, dt);

        let hit = match frames {
            Some(frames) if round.target.is_alive() => check_target_hit(projectile, frames),
            _ => false,
        };

        if hit {
            round.target.hp -= 1;
            round.ammo += 1;
            round.score += HIT_POINTS * round.level as u64;
            log::debug!(
                "Hit! hp {} score {} ammo {}",
                round.target.hp,
                round.score,
                round.ammo
            );
            round.events.push(GameEvent::Hit {
                hp: round.target.hp,
            });
            if round.target.hp == 0 {
                defeated = true;
            }
        } else if check_ground(projectile) {
            if playing {
                round.score = round
                    .score
                    .saturating_sub(MISS_POINTS * round.level as u64);
            }
            round.events.push(GameEvent::Landed);
        }
    }

    if defeated {
        round.clear_attached();
        log::info!("Target defeated at level {}", round.level);
        round.events.push(GameEvent::TargetDefeated);
        round.transition(Trigger::TargetDefeated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames_at(pos: Vec3) -> TargetFrames {
        let m = Mat4::from_translation(pos);
        TargetFrames::new(m, m)
    }

    #[test]
    fn test_integrate_under_gravity() {
        let mut p = Projectile::new(1, Vec3::ZERO, Vec3::new(1.0, 10.0, 0.0));
        integrate(&mut p, 0.5);
        assert_eq!(p.pos, Vec3::new(0.5, 5.0, 0.0));
        assert_eq!(p.vel, Vec3::new(1.0, 10.0 - GRAVITY * 0.5, 0.0));
    }

    #[test]
    fn test_landed_is_frozen() {
        let mut p = Projectile::new(1, Vec3::new(0.0, 0.1, 0.0), Vec3::new(3.0, -5.0, 0.0));
        assert!(check_ground(&mut p));
        assert_eq!(p.pos.y, GROUND_OFFSET);
        assert_eq!(p.state, ProjectileState::Landed);

        let before = p.pos;
        integrate(&mut p, 1.0);
        assert_eq!(p.pos, before);
        // Second check does not transition again
        assert!(!check_ground(&mut p));
    }

    #[test]
    fn test_hit_box_bounds() {
        assert!(in_hit_box(Vec3::ZERO));
        assert!(in_hit_box(Vec3::new(0.65, 0.35, 0.25)));
        assert!(!in_hit_box(Vec3::new(0.66, 0.0, 0.0)));
        assert!(!in_hit_box(Vec3::new(0.0, 0.0, -0.3)));
    }

    #[test]
    fn test_hit_uses_body_frame() {
        // Body rotated 90° about Y: the long X axis of the box now lies along world Z
        let body = Mat4::from_translation(Vec3::new(10.0, 2.5, 0.0))
            * Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let frames = TargetFrames::new(body, body);

        let mut along_z = Projectile::new(1, Vec3::new(10.0, 2.5, 0.6), Vec3::ZERO);
        assert!(check_target_hit(&mut along_z, &frames));
        assert_eq!(along_z.state, ProjectileState::Attached);
        // Now relative to the mount
        assert!(along_z.pos.length() < 0.7);

        let mut along_x = Projectile::new(2, Vec3::new(10.6, 2.5, 0.0), Vec3::ZERO);
        assert!(!check_target_hit(&mut along_x, &frames));
        assert!(along_x.is_flying());
    }

    #[test]
    fn test_hit_wins_over_ground() {
        let mut round = GameRound::new(3, 0);
        round.transition(Trigger::Toggle);
        // Target sitting on the ground plane so both conditions hold
        let frames = frames_at(Vec3::new(0.0, 0.2, 0.0));
        round
            .projectiles
            .push(Projectile::new(1, Vec3::new(0.0, 0.2, 0.0), Vec3::ZERO));

        step_projectiles(&mut round, Some(&frames), 0.0);

        assert_eq!(round.projectiles[0].state, ProjectileState::Attached);
        assert_eq!(round.target.hp, TARGET_MAX_HP - 1);
        assert_eq!(round.score, HIT_POINTS);
    }

    #[test]
    fn test_no_hits_without_frames() {
        let mut round = GameRound::new(3, 0);
        round.transition(Trigger::Toggle);
        round
            .projectiles
            .push(Projectile::new(1, Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO));
        step_projectiles(&mut round, None, SIM_DT);
        assert!(round.projectiles[0].is_flying());
        assert_eq!(round.target.hp, TARGET_MAX_HP);
    }

    #[test]
    fn test_practice_landing_not_scored() {
        let mut round = GameRound::new(3, 0);
        round.score = 40;
        round
            .projectiles
            .push(Projectile::new(1, Vec3::new(0.0, 0.31, 0.0), Vec3::new(0.0, -10.0, 0.0)));
        step_projectiles(&mut round, None, 0.1);
        assert_eq!(round.projectiles[0].state, ProjectileState::Landed);
        assert_eq!(round.score, 40);
        assert_eq!(round.drain_events(), vec![GameEvent::Landed]);
    }
}
