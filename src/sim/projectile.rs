//! Ballistic projectiles
//!
//! Heading is fixed at creation; nothing re-targets in flight.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Circle, circle_outside_viewport};
use crate::consts::*;
use crate::{Viewport, direction_to, heading};

/// Player projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Time alive (ms)
    pub age_ms: f32,
    pub lifetime_ms: f32,
}

impl Projectile {
    /// Fire from `origin` toward the point `target`
    pub fn aimed(origin: Vec2, target: Vec2, damage: f32) -> Self {
        Self::with_velocity(origin, direction_to(origin, target) * PROJECTILE_SPEED, damage)
    }

    /// Fire from `origin` along `angle` (radians)
    pub fn with_heading(origin: Vec2, angle: f32, damage: f32) -> Self {
        Self::with_velocity(origin, heading(angle) * PROJECTILE_SPEED, damage)
    }

    fn with_velocity(origin: Vec2, vel: Vec2, damage: f32) -> Self {
        Self {
            pos: origin,
            vel,
            radius: PROJECTILE_RADIUS,
            damage,
            age_ms: 0.0,
            lifetime_ms: PROJECTILE_LIFETIME_MS,
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.pos += self.vel * (dt_ms / 1000.0);
        self.age_ms += dt_ms;
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.age_ms < self.lifetime_ms
    }

    #[inline]
    pub fn is_out_of_bounds(&self, viewport: &Viewport) -> bool {
        circle_outside_viewport(self.pos, self.radius, viewport)
    }
}

impl Circle for Projectile {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Boss projectile flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossProjectileKind {
    /// Radial burst
    Fire,
    /// Aimed wave
    Ice,
    /// Spiral
    Dark,
}

/// Per-kind ballistics
#[derive(Debug, Clone, Copy)]
pub struct BossProjectileSpec {
    pub speed: f32,
    pub damage: f32,
    pub tint: u32,
}

const BOSS_PROJECTILE_TABLE: [BossProjectileSpec; 3] = [
    BossProjectileSpec {
        speed: 180.0,
        damage: 35.0,
        tint: 0xff4500,
    },
    BossProjectileSpec {
        speed: 220.0,
        damage: 30.0,
        tint: 0x00bfff,
    },
    BossProjectileSpec {
        speed: 160.0,
        damage: 45.0,
        tint: 0x8b008b,
    },
];

impl BossProjectileKind {
    pub fn spec(self) -> &'static BossProjectileSpec {
        &BOSS_PROJECTILE_TABLE[self as usize]
    }
}

/// Projectile fired by a boss; only hurts the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossProjectile {
    pub kind: BossProjectileKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub age_ms: f32,
    pub lifetime_ms: f32,
}

impl BossProjectile {
    /// Launch from `origin` along `angle` (radians)
    pub fn with_heading(origin: Vec2, angle: f32, kind: BossProjectileKind) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            pos: origin,
            vel: heading(angle) * spec.speed,
            radius: BOSS_PROJECTILE_RADIUS,
            damage: spec.damage,
            age_ms: 0.0,
            lifetime_ms: BOSS_PROJECTILE_LIFETIME_MS,
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.pos += self.vel * (dt_ms / 1000.0);
        self.age_ms += dt_ms;
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.age_ms < self.lifetime_ms
    }

    #[inline]
    pub fn is_out_of_bounds(&self, viewport: &Viewport) -> bool {
        circle_outside_viewport(self.pos, self.radius, viewport)
    }

    pub fn tint(&self) -> u32 {
        self.kind.spec().tint
    }
}

impl Circle for BossProjectile {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aimed_velocity() {
        let p = Projectile::aimed(Vec2::new(400.0, 300.0), Vec2::new(450.0, 300.0), 20.0);
        assert!((p.vel.x - PROJECTILE_SPEED).abs() < 1e-3);
        assert!(p.vel.y.abs() < 1e-3);
        assert_eq!(p.damage, 20.0);
    }

    #[test]
    fn test_update_moves_and_ages() {
        let mut p = Projectile::aimed(Vec2::ZERO, Vec2::new(0.0, 10.0), 5.0);
        p.update(500.0);
        assert!((p.pos.y - 200.0).abs() < 1e-3);
        assert_eq!(p.age_ms, 500.0);
    }

    #[test]
    fn test_lifetime_expiry() {
        let mut p = Projectile::aimed(Vec2::ZERO, Vec2::X, 5.0);
        p.update(PROJECTILE_LIFETIME_MS - 1.0);
        assert!(p.is_alive());
        p.update(1.0);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_out_of_bounds() {
        let vp = Viewport::new(800.0, 600.0);
        let mut p = Projectile::aimed(Vec2::new(799.0, 300.0), Vec2::new(900.0, 300.0), 5.0);
        assert!(!p.is_out_of_bounds(&vp));
        p.update(100.0); // +40 px
        assert!(p.is_out_of_bounds(&vp));
    }

    #[test]
    fn test_boss_projectile_kinds() {
        let fire = BossProjectile::with_heading(Vec2::ZERO, 0.0, BossProjectileKind::Fire);
        let dark = BossProjectile::with_heading(Vec2::ZERO, 0.0, BossProjectileKind::Dark);
        assert_eq!(fire.damage, 35.0);
        assert!((fire.vel.x - 180.0).abs() < 1e-3);
        assert_eq!(dark.damage, 45.0);
        assert_eq!(dark.tint(), 0x8b008b);
    }

    #[test]
    fn test_never_retargets() {
        let mut p = Projectile::aimed(Vec2::ZERO, Vec2::new(1.0, 1.0), 5.0);
        let vel = p.vel;
        for _ in 0..10 {
            p.update(16.0);
        }
        assert_eq!(p.vel, vel);
    }
}
