//! The player: movement, leveling, weapons and timed buffs

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use super::health::{Damageable, Health};
use super::projectile::Projectile;
use super::weapon::{Weapon, WeaponKind};
use crate::Viewport;
use crate::consts::*;

/// A multiplicative stat buff that wears off
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedBuff {
    pub multiplier: f32,
    pub remaining_ms: f32,
}

impl Default for TimedBuff {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            remaining_ms: 0.0,
        }
    }
}

impl TimedBuff {
    /// Replace any running buff with `+percent%` for `duration_ms`
    pub fn apply(&mut self, percent: f32, duration_ms: f32) {
        self.multiplier = 1.0 + percent / 100.0;
        self.remaining_ms = duration_ms;
    }

    /// Count down; returns true on the tick the buff expires
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if self.remaining_ms <= 0.0 {
            return false;
        }
        self.remaining_ms -= dt_ms;
        if self.remaining_ms <= 0.0 {
            self.remaining_ms = 0.0;
            self.multiplier = 1.0;
            return true;
        }
        false
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }

    /// Current multiplier (1.0 when inactive)
    #[inline]
    pub fn factor(&self) -> f32 {
        if self.is_active() { self.multiplier } else { 1.0 }
    }
}

/// Outcome of offering a weapon to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponGrant {
    /// An owned weapon of that kind was upgraded
    Upgraded { level: u32 },
    /// A new weapon was added
    Added,
    /// No slot left and no weapon of that kind owned
    Full,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Base movement speed (px/s) before buffs
    pub speed: f32,
    pub health: Health,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    pub weapons: Vec<Weapon>,
    pub max_weapons: usize,
    pub speed_boost: TimedBuff,
    pub damage_boost: TimedBuff,
}

impl Player {
    /// New level-1 player holding the basic gun
    pub fn new(pos: Vec2, max_weapons: usize) -> Self {
        let mut player = Self {
            pos,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            health: Health::new(PLAYER_MAX_HEALTH),
            level: 1,
            experience: 0,
            experience_to_next: PLAYER_FIRST_LEVEL_XP,
            weapons: Vec::with_capacity(max_weapons),
            max_weapons,
            speed_boost: TimedBuff::default(),
            damage_boost: TimedBuff::default(),
        };
        player.add_weapon(WeaponKind::BasicGun);
        player
    }

    /// Advance buffs and move according to `intent`
    ///
    /// Intent components are expected in [-1, 1]; anything longer than a unit
    /// vector (diagonals) is normalized.
    pub fn update(&mut self, dt_ms: f32, intent: Vec2, viewport: &Viewport) {
        if self.speed_boost.tick(dt_ms) {
            log::debug!("Speed boost expired");
        }
        if self.damage_boost.tick(dt_ms) {
            log::debug!("Damage boost expired");
        }

        let dir = if intent.length_squared() > 1.0 {
            intent.normalize_or_zero()
        } else {
            intent
        };
        self.vel = dir * self.current_speed();
        self.pos += self.vel * (dt_ms / 1000.0);
        self.pos = viewport.clamp_circle(self.pos, self.radius);
    }

    #[inline]
    pub fn current_speed(&self) -> f32 {
        self.speed * self.speed_boost.factor()
    }

    /// Add experience, leveling up as many times as it covers
    ///
    /// Returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: u32) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0;
        while self.experience >= self.experience_to_next {
            self.level_up();
            gained += 1;
        }
        gained
    }

    fn level_up(&mut self) {
        self.experience -= self.experience_to_next;
        self.level += 1;
        self.experience_to_next = ((self.experience_to_next as f32 * LEVEL_XP_GROWTH).floor() as u32).max(1);

        self.health.raise_max(LEVEL_UP_HEALTH_BONUS);
        self.health.refill();
        self.speed += LEVEL_UP_SPEED_BONUS;

        log::info!("Level up! Now level {}", self.level);
    }

    /// Add a weapon if a slot is free
    pub fn add_weapon(&mut self, kind: WeaponKind) -> bool {
        if self.weapons.len() >= self.max_weapons {
            log::debug!("Weapon slots full, {} discarded", kind.name());
            return false;
        }
        self.weapons.push(Weapon::new(kind));
        log::debug!("New weapon: {}", kind.name());
        true
    }

    /// Upgrade an owned weapon of this kind, otherwise add one
    pub fn grant_weapon(&mut self, kind: WeaponKind) -> WeaponGrant {
        if let Some(weapon) = self.weapons.iter_mut().find(|w| w.kind == kind) {
            weapon.upgrade();
            return WeaponGrant::Upgraded { level: weapon.level };
        }
        if self.add_weapon(kind) {
            WeaponGrant::Added
        } else {
            WeaponGrant::Full
        }
    }

    /// Fire every weapon that is ready; returns how many weapons discharged
    pub fn fire_weapons(&mut self, targets: &[Vec2], sink: &mut Vec<Projectile>, now_ms: f64) -> usize {
        let boost = self.damage_boost.factor();
        let origin = self.pos;
        let mut fired = 0;
        for weapon in &mut self.weapons {
            let damage = (weapon.damage * boost).floor();
            if weapon.fire_with_damage(origin, targets, sink, now_ms, damage) > 0 {
                fired += 1;
            }
        }
        fired
    }

    pub fn apply_speed_boost(&mut self, percent: f32, duration_ms: f32) {
        self.speed_boost.apply(percent, duration_ms);
        log::debug!("Speed +{}% for {}s", percent, duration_ms / 1000.0);
    }

    pub fn apply_damage_boost(&mut self, percent: f32, duration_ms: f32) {
        self.damage_boost.apply(percent, duration_ms);
        log::debug!("Damage +{}% for {}s", percent, duration_ms / 1000.0);
    }

    pub fn has_active_effects(&self) -> bool {
        self.speed_boost.is_active() || self.damage_boost.is_active()
    }
}

impl Damageable for Player {
    fn health(&self) -> &Health {
        &self.health
    }

    fn take_damage(&mut self, amount: f32) {
        self.health.take_damage(amount);
    }
}

impl Circle for Player {
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

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_starts_with_basic_gun() {
        let p = Player::new(Vec2::new(400.0, 300.0), 6);
        assert_eq!(p.weapons.len(), 1);
        assert_eq!(p.weapons[0].kind, WeaponKind::BasicGun);
        assert_eq!(p.level, 1);
        assert_eq!(p.health.current(), 100.0);
    }

    #[test]
    fn test_diagonal_movement_normalized() {
        let mut p = Player::new(Vec2::new(400.0, 300.0), 6);
        p.update(1000.0, Vec2::new(1.0, 1.0), &viewport());
        assert!((p.vel.length() - PLAYER_SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_movement_clamped_to_viewport() {
        let mut p = Player::new(Vec2::new(20.0, 300.0), 6);
        p.update(1000.0, Vec2::new(-1.0, 0.0), &viewport());
        assert_eq!(p.pos.x, PLAYER_RADIUS);
    }

    #[test]
    fn test_level_curve() {
        let mut p = Player::new(Vec2::ZERO, 6);
        p.health.take_damage(50.0);
        assert_eq!(p.gain_experience(100), 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.experience, 0);
        assert_eq!(p.experience_to_next, 120);
        assert_eq!(p.health.max(), 110.0);
        assert_eq!(p.health.current(), 110.0);
        assert_eq!(p.speed, PLAYER_SPEED + LEVEL_UP_SPEED_BONUS);
    }

    #[test]
    fn test_multi_level_gain() {
        let mut p = Player::new(Vec2::ZERO, 6);
        // 100 + 120 + 144 = 364
        assert_eq!(p.gain_experience(370), 3);
        assert_eq!(p.level, 4);
        assert_eq!(p.experience, 6);
        assert_eq!(p.experience_to_next, 172);
    }

    #[test]
    fn test_grant_prefers_upgrade() {
        let mut p = Player::new(Vec2::ZERO, 2);
        assert_eq!(p.grant_weapon(WeaponKind::Shotgun), WeaponGrant::Added);
        assert_eq!(p.grant_weapon(WeaponKind::Shotgun), WeaponGrant::Upgraded { level: 2 });
        assert_eq!(p.grant_weapon(WeaponKind::RapidFire), WeaponGrant::Full);
        assert_eq!(p.weapons.len(), 2);
    }

    #[test]
    fn test_buff_expires() {
        let mut p = Player::new(Vec2::new(400.0, 300.0), 6);
        p.apply_speed_boost(50.0, 1000.0);
        assert!((p.current_speed() - 300.0).abs() < 1e-3);
        p.update(600.0, Vec2::ZERO, &viewport());
        assert!(p.has_active_effects());
        p.update(600.0, Vec2::ZERO, &viewport());
        assert!(!p.has_active_effects());
        assert_eq!(p.current_speed(), PLAYER_SPEED);
    }

    #[test]
    fn test_damage_boost_floors_projectile_damage() {
        let mut p = Player::new(Vec2::new(400.0, 300.0), 6);
        p.weapons[0].damage = 21.0;
        p.apply_damage_boost(50.0, 15000.0);
        let mut shots = Vec::new();
        let fired = p.fire_weapons(&[Vec2::new(450.0, 300.0)], &mut shots, 0.0);
        assert_eq!(fired, 1);
        // 21 * 1.5 = 31.5
        assert_eq!(shots[0].damage, 31.0);
        assert_eq!(p.weapons[0].damage, 21.0);
    }
}
