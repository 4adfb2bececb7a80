//! Horde Survivor - top-down survival arena simulation
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawners, boss state machine, frame tick)
//! - `engine`: Frame driver, lifecycle, render snapshots
//! - `audio`: Sound event sink handed in by the host application
//! - `tuning`: Data-driven game balance
//! - `error`: Construction/configuration errors

pub mod audio;
pub mod engine;
pub mod error;
pub mod sim;
pub mod tuning;

pub use audio::{AudioSink, LogAudio, MusicTrack, NullAudio, SoundEffect};
pub use engine::{GameEngine, HudStats, Snapshot};
pub use error::{Result, SimError};
pub use tuning::Tuning;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_FIRST_LEVEL_XP: u32 = 100;
    /// Experience requirement growth per level (floored)
    pub const LEVEL_XP_GROWTH: f32 = 1.2;
    pub const LEVEL_UP_HEALTH_BONUS: f32 = 10.0;
    pub const LEVEL_UP_SPEED_BONUS: f32 = 5.0;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 8.0;
    pub const ENEMY_SPEED: f32 = 50.0;
    pub const ENEMY_HEALTH: f32 = 30.0;
    pub const ENEMY_DAMAGE: f32 = 10.0;
    pub const ENEMY_XP: u32 = 25;
    pub const ENEMY_TINT: u32 = 0xff4444;
    /// Distance outside the viewport edge where enemies and bosses appear
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Player projectile
    pub const PROJECTILE_SPEED: f32 = 400.0;
    pub const PROJECTILE_RADIUS: f32 = 3.0;
    pub const PROJECTILE_LIFETIME_MS: f32 = 2000.0;

    /// Boss projectile
    pub const BOSS_PROJECTILE_RADIUS: f32 = 6.0;
    pub const BOSS_PROJECTILE_LIFETIME_MS: f32 = 5000.0;

    /// Weapon upgrade steps
    pub const WEAPON_UPGRADE_DAMAGE: f32 = 5.0;
    pub const WEAPON_UPGRADE_RATE: f32 = 1.1;
    pub const WEAPON_UPGRADE_RANGE: f32 = 20.0;
    /// Half-angle between shotgun pellets (15 degrees)
    pub const SHOTGUN_SPREAD: f32 = std::f32::consts::PI / 12.0;

    /// Items
    pub const ITEM_RADIUS: f32 = 8.0;
    pub const ITEM_LIFETIME_MS: f32 = 30000.0;
    /// Inset from the viewport edge for interior spawn points
    pub const INTERIOR_MARGIN: f32 = 50.0;
    pub const SPEED_BOOST_DURATION_MS: f32 = 10000.0;
    pub const DAMAGE_BOOST_DURATION_MS: f32 = 15000.0;

    /// Boss timings
    pub const BOSS_INVULNERABLE_MS: f32 = 200.0;
    pub const BOSS_PATTERN_PERIOD_MS: f32 = 5000.0;
    pub const BOSS_TELEPORT_PERIOD_MS: f32 = 3000.0;
    pub const BOSS_CIRCLE_RADIUS: f32 = 100.0;
    /// Orbit angular rate (radians per ms of pattern time)
    pub const BOSS_CIRCLE_RATE: f32 = 0.002;
    pub const BOSS_CIRCLE_SPEED_FACTOR: f32 = 0.8;
    /// Health ratio at or below which phase 2 starts
    pub const BOSS_ENRAGE_RATIO: f32 = 0.5;
    pub const BOSS_ENRAGE_SPEED: f32 = 1.3;
    pub const BOSS_ENRAGE_INTERVAL: f32 = 0.7;

    /// Boss attack shapes
    pub const BURST_COUNT: usize = 8;
    pub const WAVE_COUNT: u8 = 3;
    pub const WAVE_SPREAD: f32 = 0.3;
    pub const WAVE_STAGGER_MS: f64 = 200.0;
    pub const SPIRAL_COUNT: u8 = 12;
    pub const SPIRAL_STAGGER_MS: f64 = 100.0;
    /// Spiral rotation (radians per ms of simulation clock)
    pub const SPIRAL_ROTATION_RATE: f64 = 0.01;
}

/// Current drawable area, supplied by the host every frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Usable for simulation (finite, strictly positive)
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Clamp a circle's center so the whole circle stays on screen
    pub fn clamp_circle(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.max(radius).min(self.width - radius),
            pos.y.max(radius).min(self.height - radius),
        )
    }
}

/// Unit vector pointing along `angle` (radians, screen coordinates)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Direction from `from` to `to`, zero when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_to_zero_length() {
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(direction_to(p, p), Vec2::ZERO);
    }

    #[test]
    fn test_direction_to_is_unit() {
        let d = direction_to(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!((d.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_viewport_clamp_circle() {
        let vp = Viewport::new(800.0, 600.0);
        let p = vp.clamp_circle(Vec2::new(-40.0, 900.0), 25.0);
        assert_eq!(p, Vec2::new(25.0, 575.0));
    }

    #[test]
    fn test_viewport_validity() {
        assert!(Viewport::new(800.0, 600.0).is_valid());
        assert!(!Viewport::new(0.0, 600.0).is_valid());
        assert!(!Viewport::new(800.0, f32::NAN).is_valid());
    }
}
