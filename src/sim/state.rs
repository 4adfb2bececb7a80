//! Game state and core simulation types
//!
//! Everything one run needs lives here, including its seeded RNG.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::{Boss, PendingShot};
use super::deferred::DeferredQueue;
use super::enemy::{Enemy, EnemySpawner};
use super::item::{Item, ItemSpawner};
use super::player::Player;
use super::projectile::Projectile;
use crate::Viewport;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Player died; the state no longer advances
    GameOver,
}

/// Monotonic entity id allocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Single source of randomness for the run
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation clock (ms)
    pub time_ms: f64,
    pub score: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Player projectiles
    pub projectiles: Vec<Projectile>,
    pub items: Vec<Item>,
    /// At most one boss at a time
    pub boss: Option<Boss>,
    pub enemy_spawner: EnemySpawner,
    pub item_spawner: ItemSpawner,
    /// Game time when the next boss appears
    pub next_boss_ms: f64,
    /// Staggered boss shots waiting to fire
    pub deferred: DeferredQueue<PendingShot>,
    pub ids: EntityIds,
    pub kills: u32,
    pub bosses_defeated: u32,
}

impl GameState {
    /// Fresh run with the player at the viewport center
    pub fn new(seed: u64, tuning: Tuning, viewport: &Viewport) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            time_ms: 0.0,
            score: 0,
            player: Player::new(viewport.center(), tuning.max_weapons),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            items: Vec::new(),
            boss: None,
            enemy_spawner: EnemySpawner::new(&tuning),
            item_spawner: ItemSpawner::new(tuning.item_spawn_interval_ms),
            next_boss_ms: tuning.first_boss_ms,
            deferred: DeferredQueue::new(),
            ids: EntityIds::default(),
            kills: 0,
            bosses_defeated: 0,
            tuning,
        }
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Whole seconds until the next boss, `None` while one is alive
    pub fn boss_timer_s(&self) -> Option<u64> {
        if self.boss.is_some() {
            return None;
        }
        Some(((self.next_boss_ms - self.time_ms).max(0.0) / 1000.0).ceil() as u64)
    }

    /// Drop all pending boss shots
    pub fn cancel_deferred(&mut self) {
        if !self.deferred.is_empty() {
            log::debug!("Cancelling {} pending boss shots", self.deferred.len());
        }
        self.deferred.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let vp = Viewport::new(800.0, 600.0);
        let state = GameState::new(42, Tuning::default(), &vp);
        assert_eq!(state.player.pos, vp.center());
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.boss.is_none());
        assert_eq!(state.next_boss_ms, 60_000.0);
        assert_eq!(state.boss_timer_s(), Some(60));
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut ids = EntityIds::default();
        assert_eq!(ids.next(), 1);
        assert_eq!(ids.next(), 2);
    }
}
