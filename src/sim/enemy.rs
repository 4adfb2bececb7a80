//! Homing enemies and the wave spawner

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use super::health::{Damageable, Health};
use super::state::EntityIds;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{Viewport, direction_to};

/// A basic chaser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// px/s
    pub speed: f32,
    pub health: Health,
    /// Damage dealt on contact with the player
    pub damage: f32,
    /// Score and experience granted on kill
    pub xp_reward: u32,
    /// RGB color hint for the renderer
    pub tint: u32,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: ENEMY_RADIUS,
            speed: ENEMY_SPEED,
            health: Health::new(ENEMY_HEALTH),
            damage: ENEMY_DAMAGE,
            xp_reward: ENEMY_XP,
            tint: ENEMY_TINT,
        }
    }

    /// Head straight for `target`
    pub fn update(&mut self, dt_ms: f32, target: Vec2) {
        self.vel = direction_to(self.pos, target) * self.speed;
        self.pos += self.vel * (dt_ms / 1000.0);
    }
}

impl Damageable for Enemy {
    fn health(&self) -> &Health {
        &self.health
    }

    fn take_damage(&mut self, amount: f32) {
        self.health.take_damage(amount);
    }
}

impl Circle for Enemy {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Random point just beyond a uniformly chosen viewport edge
pub fn edge_spawn_point<R: Rng + ?Sized>(viewport: &Viewport, rng: &mut R) -> Vec2 {
    let along_x = rng.random::<f32>() * viewport.width;
    let along_y = rng.random::<f32>() * viewport.height;
    match rng.random_range(0..4u8) {
        0 => Vec2::new(along_x, -SPAWN_MARGIN),                  // top
        1 => Vec2::new(viewport.width + SPAWN_MARGIN, along_y),  // right
        2 => Vec2::new(along_x, viewport.height + SPAWN_MARGIN), // bottom
        _ => Vec2::new(-SPAWN_MARGIN, along_y),                  // left
    }
}

/// Timed off-screen spawner with an accelerating rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawner {
    pub timer_ms: f32,
    pub interval_ms: f32,
    pub floor_ms: f32,
    pub decay: f32,
    pub max_enemies: usize,
}

impl EnemySpawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            timer_ms: 0.0,
            interval_ms: tuning.enemy_spawn_interval_ms,
            floor_ms: tuning.enemy_spawn_floor_ms,
            decay: tuning.enemy_spawn_decay,
            max_enemies: tuning.max_enemies,
        }
    }

    /// Advance the timer and spawn at most one enemy
    ///
    /// While the cap is reached the timer keeps running, so the next free slot
    /// fills on the following tick.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f32,
        enemies: &mut Vec<Enemy>,
        viewport: &Viewport,
        rng: &mut R,
        ids: &mut EntityIds,
    ) -> bool {
        self.timer_ms += dt_ms;

        if self.timer_ms < self.interval_ms || enemies.len() >= self.max_enemies {
            return false;
        }

        let pos = edge_spawn_point(viewport, rng);
        enemies.push(Enemy::new(ids.next(), pos));
        self.timer_ms = 0.0;
        self.interval_ms = (self.interval_ms * self.decay).max(self.floor_ms);
        true
    }
}
