//! Pickups and the ambient item spawner

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use super::player::Player;
use crate::Viewport;
use crate::consts::*;

/// Pickup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Health,
    Experience,
    SpeedBoost,
    DamageBoost,
}

/// Applies an item of the given value; returns levels gained
type ApplyFn = fn(player: &mut Player, value: f32) -> u32;

pub struct ItemSpec {
    pub name: &'static str,
    /// Heal amount, experience, or boost percent depending on kind
    pub value: f32,
    pub radius: f32,
    pub tint: u32,
    pub glow_tint: u32,
    /// Glyph drawn on top of the item
    pub symbol: char,
    apply: ApplyFn,
}

const ITEM_TABLE: [ItemSpec; 4] = [
    ItemSpec {
        name: "health",
        value: 30.0,
        radius: ITEM_RADIUS,
        tint: 0xff6b6b,
        glow_tint: 0xff0000,
        symbol: '+',
        apply: apply_health,
    },
    ItemSpec {
        name: "experience",
        value: 50.0,
        radius: 6.0,
        tint: 0xffff00,
        glow_tint: 0xffaa00,
        symbol: '★',
        apply: apply_experience,
    },
    ItemSpec {
        name: "speed_boost",
        value: 50.0,
        radius: ITEM_RADIUS,
        tint: 0x00ff00,
        glow_tint: 0x00aa00,
        symbol: '^',
        apply: apply_speed_boost,
    },
    ItemSpec {
        name: "damage_boost",
        value: 30.0,
        radius: ITEM_RADIUS,
        tint: 0xff8800,
        glow_tint: 0xff4400,
        symbol: '†',
        apply: apply_damage_boost,
    },
];

fn apply_health(player: &mut Player, value: f32) -> u32 {
    player.health.heal(value);
    0
}

fn apply_experience(player: &mut Player, value: f32) -> u32 {
    player.gain_experience(value as u32)
}

fn apply_speed_boost(player: &mut Player, value: f32) -> u32 {
    player.apply_speed_boost(value, SPEED_BOOST_DURATION_MS);
    0
}

fn apply_damage_boost(player: &mut Player, value: f32) -> u32 {
    player.apply_damage_boost(value, DAMAGE_BOOST_DURATION_MS);
    0
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Health,
        ItemKind::Experience,
        ItemKind::SpeedBoost,
        ItemKind::DamageBoost,
    ];

    pub fn spec(self) -> &'static ItemSpec {
        &ITEM_TABLE[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        self.spec().name
    }

    /// Ambient spawn table: experience 40%, health 20%, speed 20%, damage 20%
    pub fn roll_ambient<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f32 = rng.random();
        if roll < 0.4 {
            ItemKind::Experience
        } else if roll < 0.6 {
            ItemKind::Health
        } else if roll < 0.8 {
            ItemKind::SpeedBoost
        } else {
            ItemKind::DamageBoost
        }
    }

    /// Kill drop table: experience 70%, health 20%, a boost otherwise
    pub fn roll_drop<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f32 = rng.random();
        if roll < 0.7 {
            ItemKind::Experience
        } else if roll < 0.9 {
            ItemKind::Health
        } else if rng.random_bool(0.5) {
            ItemKind::SpeedBoost
        } else {
            ItemKind::DamageBoost
        }
    }
}

/// A pickup lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub pos: Vec2,
    pub radius: f32,
    pub value: f32,
    pub age_ms: f32,
    pub lifetime_ms: f32,
    /// Pulse in [0, 1]
    pub glow: f32,
    /// Vertical draw offset (px)
    pub bob: f32,
}

impl Item {
    pub fn new(kind: ItemKind, pos: Vec2) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            pos,
            radius: spec.radius,
            value: spec.value,
            age_ms: 0.0,
            lifetime_ms: ITEM_LIFETIME_MS,
            glow: 0.0,
            bob: 0.0,
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.age_ms += dt_ms;
        self.glow = (self.age_ms * 0.005).sin() * 0.5 + 0.5;
        self.bob = (self.age_ms * 0.003).sin() * 3.0;
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.age_ms < self.lifetime_ms
    }

    /// Give this item's effect to the player; returns levels gained
    pub fn apply(&self, player: &mut Player) -> u32 {
        (self.kind.spec().apply)(player, self.value)
    }

    pub fn tint(&self) -> u32 {
        self.kind.spec().tint
    }
}

impl Circle for Item {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Random point at least `INTERIOR_MARGIN` inside every edge
pub fn interior_point<R: Rng + ?Sized>(viewport: &Viewport, rng: &mut R) -> Vec2 {
    let span = 2.0 * INTERIOR_MARGIN;
    Vec2::new(
        rng.random::<f32>() * (viewport.width - span).max(0.0) + INTERIOR_MARGIN,
        rng.random::<f32>() * (viewport.height - span).max(0.0) + INTERIOR_MARGIN,
    )
}

/// Periodic ambient item spawner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSpawner {
    pub timer_ms: f32,
    pub interval_ms: f32,
}

impl ItemSpawner {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            timer_ms: 0.0,
            interval_ms,
        }
    }

    /// Spawn one item per interval, but only while enemies are around
    ///
    /// The timer resets at every interval whether or not an item appeared.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f32,
        items: &mut Vec<Item>,
        enemy_count: usize,
        viewport: &Viewport,
        rng: &mut R,
    ) -> Option<ItemKind> {
        self.timer_ms += dt_ms;
        if self.timer_ms < self.interval_ms {
            return None;
        }
        self.timer_ms = 0.0;

        if enemy_count == 0 {
            return None;
        }

        let pos = interior_point(viewport, rng);
        let kind = ItemKind::roll_ambient(rng);
        items.push(Item::new(kind, pos));
        log::debug!("Item spawned: {} at ({:.0}, {:.0})", kind.as_str(), pos.x, pos.y);
        Some(kind)
    }

    /// Drop a kill-table item at `pos`
    pub fn spawn_drop_at<R: Rng + ?Sized>(items: &mut Vec<Item>, pos: Vec2, rng: &mut R) -> ItemKind {
        let kind = ItemKind::roll_drop(rng);
        Self::spawn_kind_at(items, pos, kind);
        kind
    }

    pub fn spawn_kind_at(items: &mut Vec<Item>, pos: Vec2, kind: ItemKind) {
        items.push(Item::new(kind, pos));
    }
}
