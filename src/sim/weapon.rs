//! Auto-firing weapons
//!
//! Weapon kinds are a closed set. Base stats and the firing routine for each
//! kind live in a single table indexed by [`WeaponKind`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::nearest_within;
use super::projectile::Projectile;
use crate::angle_to;
use crate::consts::*;

/// Weapon types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    BasicGun,
    RapidFire,
    Shotgun,
}

/// Emits projectiles from `origin` toward `target`; returns how many
type EmitFn = fn(origin: Vec2, target: Vec2, damage: f32, sink: &mut Vec<Projectile>) -> usize;

/// Base stats and firing routine for a weapon kind
pub struct WeaponSpec {
    pub name: &'static str,
    pub damage: f32,
    /// Shots per second
    pub fire_rate: f32,
    pub range: f32,
    emit: EmitFn,
}

const WEAPON_TABLE: [WeaponSpec; 3] = [
    WeaponSpec {
        name: "Basic Gun",
        damage: 20.0,
        fire_rate: 2.0,
        range: 150.0,
        emit: emit_single,
    },
    WeaponSpec {
        name: "Rapid Fire",
        damage: 10.0,
        fire_rate: 5.0,
        range: 120.0,
        emit: emit_single,
    },
    WeaponSpec {
        name: "Shotgun",
        damage: 30.0,
        fire_rate: 1.0,
        range: 100.0,
        emit: emit_spread,
    },
];

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [WeaponKind::BasicGun, WeaponKind::RapidFire, WeaponKind::Shotgun];

    /// Kinds that can drop from kills (the basic gun is the starting weapon)
    pub const DROPPABLE: [WeaponKind; 2] = [WeaponKind::RapidFire, WeaponKind::Shotgun];

    pub fn spec(self) -> &'static WeaponSpec {
        &WEAPON_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

fn emit_single(origin: Vec2, target: Vec2, damage: f32, sink: &mut Vec<Projectile>) -> usize {
    sink.push(Projectile::aimed(origin, target, damage));
    1
}

/// Three pellets: straight at the target and one spread step to either side
fn emit_spread(origin: Vec2, target: Vec2, damage: f32, sink: &mut Vec<Projectile>) -> usize {
    let base = angle_to(origin, target);
    for step in [-1.0f32, 0.0, 1.0] {
        sink.push(Projectile::with_heading(origin, base + step * SHOTGUN_SPREAD, damage));
    }
    3
}

/// An owned weapon instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub damage: f32,
    /// Shots per second
    pub fire_rate: f32,
    pub range: f32,
    pub level: u32,
    /// Simulation time of the last discharge (ms); `None` until the first shot
    pub last_fire_ms: Option<f64>,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            damage: spec.damage,
            fire_rate: spec.fire_rate,
            range: spec.range,
            level: 1,
            last_fire_ms: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Minimum time between shots (ms)
    #[inline]
    pub fn fire_interval_ms(&self) -> f64 {
        1000.0 / self.fire_rate as f64
    }

    pub fn can_fire(&self, now_ms: f64) -> bool {
        match self.last_fire_ms {
            None => true,
            Some(last) => now_ms - last >= self.fire_interval_ms(),
        }
    }

    /// Fire at the nearest target in range using the weapon's own damage
    pub fn fire(&mut self, origin: Vec2, targets: &[Vec2], sink: &mut Vec<Projectile>, now_ms: f64) -> usize {
        let damage = self.damage;
        self.fire_with_damage(origin, targets, sink, now_ms, damage)
    }

    /// Fire with an overridden per-projectile damage (buffs)
    ///
    /// Returns the number of projectiles emitted; zero when gated or when no
    /// target is in range, in which case the weapon state is untouched.
    pub fn fire_with_damage(
        &mut self,
        origin: Vec2,
        targets: &[Vec2],
        sink: &mut Vec<Projectile>,
        now_ms: f64,
        damage: f32,
    ) -> usize {
        if !self.can_fire(now_ms) {
            return 0;
        }
        let Some((_, target)) = nearest_within(origin, self.range, targets) else {
            return 0;
        };

        let emitted = (self.kind.spec().emit)(origin, target, damage, sink);
        self.last_fire_ms = Some(now_ms);
        emitted
    }

    pub fn upgrade(&mut self) {
        self.level += 1;
        self.damage += WEAPON_UPGRADE_DAMAGE;
        self.fire_rate *= WEAPON_UPGRADE_RATE;
        self.range += WEAPON_UPGRADE_RANGE;
        log::debug!("{} upgraded to level {}", self.name(), self.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic_gun_scenario() {
        let mut gun = Weapon::new(WeaponKind::BasicGun);
        let mut shots = Vec::new();
        let origin = Vec2::new(400.0, 300.0);
        let enemies = [Vec2::new(450.0, 300.0)];

        assert_eq!(gun.fire(origin, &enemies, &mut shots, 1000.0), 1);
        assert_eq!(shots.len(), 1);

        let dir = shots[0].vel.normalize();
        assert!((dir.x - 1.0).abs() < 1e-5);
        assert!(dir.y.abs() < 1e-5);
        assert_eq!(shots[0].damage, 20.0);
        assert_eq!(gun.last_fire_ms, Some(1000.0));
    }

    #[test]
    fn test_rate_gate() {
        let mut gun = Weapon::new(WeaponKind::BasicGun);
        let mut shots = Vec::new();
        let enemies = [Vec2::new(10.0, 0.0)];

        assert_eq!(gun.fire(Vec2::ZERO, &enemies, &mut shots, 0.0), 1);
        assert_eq!(gun.fire(Vec2::ZERO, &enemies, &mut shots, 499.0), 0);
        assert_eq!(gun.fire(Vec2::ZERO, &enemies, &mut shots, 500.0), 1);
        assert_eq!(shots.len(), 2);
    }

    #[test]
    fn test_no_target_in_range_is_noop() {
        let mut gun = Weapon::new(WeaponKind::BasicGun);
        let mut shots = Vec::new();
        assert_eq!(gun.fire(Vec2::ZERO, &[Vec2::new(151.0, 0.0)], &mut shots, 0.0), 0);
        assert!(shots.is_empty());
        assert_eq!(gun.last_fire_ms, None);
    }

    #[test]
    fn test_shotgun_spread() {
        let mut gun = Weapon::new(WeaponKind::Shotgun);
        let mut shots = Vec::new();
        let n = gun.fire(Vec2::ZERO, &[Vec2::new(50.0, 0.0)], &mut shots, 0.0);
        assert_eq!(n, 3);

        let angles: Vec<f32> = shots.iter().map(|p| p.vel.y.atan2(p.vel.x)).collect();
        let fifteen = 15f32.to_radians();
        assert!((angles[0] + fifteen).abs() < 1e-4);
        assert!(angles[1].abs() < 1e-4);
        assert!((angles[2] - fifteen).abs() < 1e-4);
        assert!(shots.iter().all(|p| p.damage == 30.0));
    }

    #[test]
    fn test_upgrade_steps() {
        let mut gun = Weapon::new(WeaponKind::RapidFire);
        gun.upgrade();
        gun.upgrade();
        assert_eq!(gun.level, 3);
        assert_eq!(gun.damage, 20.0);
        assert!((gun.fire_rate - 5.0 * 1.1 * 1.1).abs() < 1e-4);
        assert_eq!(gun.range, 160.0);
    }

    #[test]
    fn test_table_matches_kinds() {
        for kind in WeaponKind::ALL {
            let w = Weapon::new(kind);
            assert_eq!(w.name(), kind.spec().name);
            assert!(w.fire_rate > 0.0);
        }
        assert_eq!(WeaponKind::BasicGun.name(), "Basic Gun");
        assert_eq!(WeaponKind::Shotgun.spec().range, 100.0);
    }

    proptest! {
        #[test]
        fn prop_never_fires_faster_than_rate(
            steps in proptest::collection::vec(0.0f64..400.0, 1..64),
            kind_idx in 0usize..3,
        ) {
            let mut weapon = Weapon::new(WeaponKind::ALL[kind_idx]);
            let interval = weapon.fire_interval_ms();
            let mut sink = Vec::new();
            let targets = [Vec2::new(5.0, 0.0)];
            let mut now = 0.0;
            let mut fired_at: Vec<f64> = Vec::new();

            for step in steps {
                now += step;
                if weapon.fire(Vec2::ZERO, &targets, &mut sink, now) > 0 {
                    fired_at.push(now);
                }
            }
            for pair in fired_at.windows(2) {
                prop_assert!(pair[1] - pair[0] >= interval);
            }
        }
    }
}
