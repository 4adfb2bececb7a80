//! Boss: a heavy enemy with an enrage phase, movement patterns and timed
//! volleys of its own projectiles
//!
//! Wave and spiral volleys are staggered. Their later shots go through a
//! [`DeferredQueue`] keyed on the simulation clock and tagged with the boss id,
//! so a shot whose boss is gone does nothing.

use std::f64::consts::TAU as TAU64;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use super::deferred::DeferredQueue;
use super::enemy::edge_spawn_point;
use super::health::{Damageable, Health};
use super::item::interior_point;
use super::projectile::{BossProjectile, BossProjectileKind};
use crate::consts::*;
use crate::{Viewport, angle_to, direction_to};

/// Boss variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    Warden,
    FlameLord,
    IceQueen,
}

/// Base stats for a boss variant
pub struct BossSpec {
    pub name: &'static str,
    pub radius: f32,
    pub speed: f32,
    pub health: f32,
    /// Contact damage taken on each frame of overlap
    pub damage: f32,
    pub xp_reward: u32,
    pub tint: u32,
    pub attack_interval_ms: f32,
}

const BOSS_TABLE: [BossSpec; 3] = [
    BossSpec {
        name: "Warden",
        radius: 25.0,
        speed: 30.0,
        health: 200.0,
        damage: 25.0,
        xp_reward: 500,
        tint: 0x8b0000,
        attack_interval_ms: 3000.0,
    },
    BossSpec {
        name: "Flame Lord",
        radius: 30.0,
        speed: 40.0,
        health: 300.0,
        damage: 30.0,
        xp_reward: 750,
        tint: 0xff4500,
        attack_interval_ms: 2500.0,
    },
    BossSpec {
        name: "Ice Queen",
        radius: 28.0,
        speed: 25.0,
        health: 350.0,
        damage: 35.0,
        xp_reward: 800,
        tint: 0x00bfff,
        attack_interval_ms: 3500.0,
    },
];

impl BossKind {
    pub const ALL: [BossKind; 3] = [BossKind::Warden, BossKind::FlameLord, BossKind::IceQueen];

    pub fn spec(self) -> &'static BossSpec {
        &BOSS_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    One,
    /// Enraged: faster movement and attacks
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovePattern {
    Chase,
    /// Orbit the player
    Circle,
    /// Periodically jump to a random interior point
    Teleport,
}

impl MovePattern {
    pub const ALL: [MovePattern; 3] = [MovePattern::Chase, MovePattern::Circle, MovePattern::Teleport];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPattern {
    /// Full ring of fire projectiles at once
    Burst,
    /// Three aimed ice shots, staggered
    Wave,
    /// Rotating ring of dark shots, staggered
    Spiral,
}

impl AttackPattern {
    pub const ALL: [AttackPattern; 3] = [AttackPattern::Burst, AttackPattern::Wave, AttackPattern::Spiral];
}

/// One shot of a staggered volley
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaggeredShot {
    Wave { index: u8 },
    Spiral { index: u8 },
}

/// Staggered shot waiting in the deferred queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingShot {
    pub boss_id: u32,
    pub shot: StaggeredShot,
}

/// Per-frame inputs to the boss
#[derive(Debug, Clone, Copy)]
pub struct BossFrame {
    pub dt_ms: f32,
    /// Simulation clock at the start of this frame
    pub now_ms: f64,
    pub player_pos: Vec2,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    pub kind: BossKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub health: Health,
    pub damage: f32,
    pub xp_reward: u32,
    pub tint: u32,
    pub phase: BossPhase,
    pub attack_timer_ms: f32,
    pub attack_interval_ms: f32,
    /// Remaining invulnerability (ms); damage is ignored while positive
    pub invulnerable_ms: f32,
    pub move_pattern: MovePattern,
    pub pattern_timer_ms: f32,
    pub projectiles: Vec<BossProjectile>,
}

impl Boss {
    pub fn new(id: u32, kind: BossKind, pos: Vec2) -> Self {
        let spec = kind.spec();
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            radius: spec.radius,
            speed: spec.speed,
            health: Health::new(spec.health),
            damage: spec.damage,
            xp_reward: spec.xp_reward,
            tint: spec.tint,
            phase: BossPhase::One,
            attack_timer_ms: 0.0,
            attack_interval_ms: spec.attack_interval_ms,
            invulnerable_ms: 0.0,
            move_pattern: MovePattern::Chase,
            pattern_timer_ms: 0.0,
            projectiles: Vec::new(),
        }
    }

    /// Random variant entering from just beyond a random edge
    pub fn spawn<R: Rng + ?Sized>(id: u32, viewport: &Viewport, rng: &mut R) -> Self {
        let kind = BossKind::random(rng);
        let pos = edge_spawn_point(viewport, rng);
        Self::new(id, kind, pos)
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }

    /// Apply damage unless invulnerable; returns whether it landed
    ///
    /// An accepted hit opens a fresh invulnerability window.
    pub fn try_damage(&mut self, amount: f32) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.health.take_damage(amount);
        self.invulnerable_ms = BOSS_INVULNERABLE_MS;
        true
    }

    pub fn tick_invulnerability(&mut self, dt_ms: f32) {
        if self.invulnerable_ms > 0.0 {
            self.invulnerable_ms = (self.invulnerable_ms - dt_ms).max(0.0);
        }
    }

    /// Enter phase 2 once health is at or below half
    ///
    /// Returns true only on the transition.
    pub fn evaluate_phase(&mut self) -> bool {
        if self.phase != BossPhase::One || self.health.ratio() > BOSS_ENRAGE_RATIO {
            return false;
        }
        self.phase = BossPhase::Two;
        self.speed *= BOSS_ENRAGE_SPEED;
        self.attack_interval_ms *= BOSS_ENRAGE_INTERVAL;
        log::info!("{} is enraged! Phase 2", self.name());
        true
    }

    /// Advance one frame; returns the attack started this frame, if any
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        frame: &BossFrame,
        rng: &mut R,
        deferred: &mut DeferredQueue<PendingShot>,
    ) -> Option<AttackPattern> {
        self.tick_invulnerability(frame.dt_ms);
        self.evaluate_phase();
        self.update_movement(frame, rng);

        let attack = self.update_attack(frame, rng, deferred);

        let viewport = frame.viewport;
        self.projectiles.retain_mut(|p| {
            p.update(frame.dt_ms);
            p.is_alive() && !p.is_out_of_bounds(&viewport)
        });

        self.pos += self.vel * (frame.dt_ms / 1000.0);
        self.pos = viewport.clamp_circle(self.pos, self.radius);

        attack
    }

    fn update_movement<R: Rng + ?Sized>(&mut self, frame: &BossFrame, rng: &mut R) {
        self.pattern_timer_ms += frame.dt_ms;

        if self.pattern_timer_ms >= BOSS_PATTERN_PERIOD_MS {
            self.move_pattern = MovePattern::ALL[rng.random_range(0..MovePattern::ALL.len())];
            self.pattern_timer_ms = 0.0;
            log::debug!("{} switches to {:?}", self.name(), self.move_pattern);
        }

        match self.move_pattern {
            MovePattern::Chase => {
                self.vel = direction_to(self.pos, frame.player_pos) * self.speed;
            }
            MovePattern::Circle => {
                let angle = self.pattern_timer_ms * BOSS_CIRCLE_RATE;
                let orbit = frame.player_pos + crate::heading(angle) * BOSS_CIRCLE_RADIUS;
                self.vel = direction_to(self.pos, orbit) * (self.speed * BOSS_CIRCLE_SPEED_FACTOR);
            }
            MovePattern::Teleport => {
                if self.pattern_timer_ms % BOSS_TELEPORT_PERIOD_MS < frame.dt_ms {
                    self.pos = interior_point(&frame.viewport, rng);
                    self.vel = Vec2::ZERO;
                }
            }
        }
    }

    fn update_attack<R: Rng + ?Sized>(
        &mut self,
        frame: &BossFrame,
        rng: &mut R,
        deferred: &mut DeferredQueue<PendingShot>,
    ) -> Option<AttackPattern> {
        self.attack_timer_ms += frame.dt_ms;
        if self.attack_timer_ms < self.attack_interval_ms {
            return None;
        }
        self.attack_timer_ms = 0.0;

        let pattern = AttackPattern::ALL[rng.random_range(0..AttackPattern::ALL.len())];
        self.perform_attack(pattern, frame.now_ms, deferred);
        Some(pattern)
    }

    /// Start an attack: bursts fire now, volleys are queued
    pub fn perform_attack(&mut self, pattern: AttackPattern, now_ms: f64, deferred: &mut DeferredQueue<PendingShot>) {
        match pattern {
            AttackPattern::Burst => {
                for i in 0..BURST_COUNT {
                    let angle = i as f32 / BURST_COUNT as f32 * TAU;
                    self.projectiles
                        .push(BossProjectile::with_heading(self.pos, angle, BossProjectileKind::Fire));
                }
            }
            AttackPattern::Wave => {
                for index in 0..WAVE_COUNT {
                    self.queue(deferred, now_ms + index as f64 * WAVE_STAGGER_MS, StaggeredShot::Wave { index });
                }
            }
            AttackPattern::Spiral => {
                for index in 0..SPIRAL_COUNT {
                    self.queue(
                        deferred,
                        now_ms + index as f64 * SPIRAL_STAGGER_MS,
                        StaggeredShot::Spiral { index },
                    );
                }
            }
        }
        log::debug!("{} attacks: {:?}", self.name(), pattern);
    }

    fn queue(&self, deferred: &mut DeferredQueue<PendingShot>, at_ms: f64, shot: StaggeredShot) {
        deferred.schedule(
            at_ms,
            PendingShot {
                boss_id: self.id,
                shot,
            },
        );
    }

    /// Fire one queued shot from the boss's current position
    pub fn fire_staggered(&mut self, shot: StaggeredShot, player_pos: Vec2, now_ms: f64) {
        let projectile = match shot {
            StaggeredShot::Wave { index } => {
                let spread = (index as f32 - 1.0) * WAVE_SPREAD;
                let angle = angle_to(self.pos, player_pos) + spread;
                BossProjectile::with_heading(self.pos, angle, BossProjectileKind::Ice)
            }
            StaggeredShot::Spiral { index } => {
                let angle = index as f64 / SPIRAL_COUNT as f64 * TAU64 + now_ms * SPIRAL_ROTATION_RATE;
                let angle = angle.rem_euclid(TAU64) as f32;
                BossProjectile::with_heading(self.pos, angle, BossProjectileKind::Dark)
            }
        };
        self.projectiles.push(projectile);
    }
}

impl Damageable for Boss {
    fn health(&self) -> &Health {
        &self.health
    }

    fn take_damage(&mut self, amount: f32) {
        self.try_damage(amount);
    }
}

impl Circle for Boss {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}
