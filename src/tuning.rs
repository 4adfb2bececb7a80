//! Game balance knobs
//!
//! Everything here can be overridden from JSON by the host; fixed per-entity
//! stats live in `crate::consts`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Difficulty and pacing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Enemy waves ===
    /// Initial delay between enemy spawns (ms)
    pub enemy_spawn_interval_ms: f32,
    /// Spawn interval never shrinks below this (ms)
    pub enemy_spawn_floor_ms: f32,
    /// Interval multiplier applied after each spawn
    pub enemy_spawn_decay: f32,
    /// Maximum concurrent enemies
    pub max_enemies: usize,

    // === Items ===
    /// Delay between ambient item spawns (ms)
    pub item_spawn_interval_ms: f32,
    /// Chance that a killed enemy drops an item
    pub kill_drop_chance: f64,
    /// Chance that a kill grants or upgrades a weapon
    pub weapon_grant_chance: f64,

    // === Player ===
    /// Maximum weapons the player can carry
    pub max_weapons: usize,

    // === Boss ===
    /// Game time of the first boss (ms)
    pub first_boss_ms: f64,
    /// Delay between a boss defeat and the next boss (ms)
    pub boss_respawn_ms: f64,
    /// Items dropped on boss defeat
    pub boss_reward_items: usize,
    /// Half-width of the square reward items scatter over (px)
    pub boss_reward_scatter: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enemy_spawn_interval_ms: 2000.0,
            enemy_spawn_floor_ms: 500.0,
            enemy_spawn_decay: 0.99,
            max_enemies: 20,

            item_spawn_interval_ms: 8000.0,
            kill_drop_chance: 0.2,
            weapon_grant_chance: 0.3,

            max_weapons: 6,

            first_boss_ms: 60_000.0,
            boss_respawn_ms: 120_000.0,
            boss_reward_items: 5,
            boss_reward_scatter: 50.0,
        }
    }
}

impl Tuning {
    /// Parse from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidTuning(format!("{name} must be positive, got {v}")))
            }
        };
        let chance = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(SimError::InvalidTuning(format!("{name} must be within [0, 1], got {v}")))
            }
        };

        positive("enemy_spawn_interval_ms", self.enemy_spawn_interval_ms as f64)?;
        positive("enemy_spawn_floor_ms", self.enemy_spawn_floor_ms as f64)?;
        positive("item_spawn_interval_ms", self.item_spawn_interval_ms as f64)?;
        positive("boss_respawn_ms", self.boss_respawn_ms)?;
        chance("kill_drop_chance", self.kill_drop_chance)?;
        chance("weapon_grant_chance", self.weapon_grant_chance)?;

        if !(self.enemy_spawn_decay > 0.0 && self.enemy_spawn_decay < 1.0) {
            return Err(SimError::InvalidTuning(format!(
                "enemy_spawn_decay must be within (0, 1), got {}",
                self.enemy_spawn_decay
            )));
        }
        if self.enemy_spawn_floor_ms > self.enemy_spawn_interval_ms {
            return Err(SimError::InvalidTuning(
                "enemy_spawn_floor_ms exceeds enemy_spawn_interval_ms".to_string(),
            ));
        }
        if self.max_weapons == 0 {
            return Err(SimError::InvalidTuning("max_weapons must be at least 1".to_string()));
        }
        if !self.first_boss_ms.is_finite() || self.first_boss_ms < 0.0 {
            return Err(SimError::InvalidTuning(format!(
                "first_boss_ms must be non-negative, got {}",
                self.first_boss_ms
            )));
        }
        if !self.boss_reward_scatter.is_finite() || self.boss_reward_scatter < 0.0 {
            return Err(SimError::InvalidTuning(format!(
                "boss_reward_scatter must be non-negative, got {}",
                self.boss_reward_scatter
            )));
        }
        Ok(())
    }
}
