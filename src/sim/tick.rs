//! Per-frame simulation step
//!
//! Frame order:
//! 1. Boss spawn window
//! 2. Player movement and buffs
//! 3. Weapons fire
//! 4. Player projectiles advance and hit enemies
//! 5. Enemy and item spawners
//! 6. Items age and get picked up
//! 7. Enemies advance and touch the player
//! 8. Boss, its projectiles, player projectiles vs boss, boss body contact
//! 9. Game over check

use glam::Vec2;
use rand::Rng;

use super::boss::{Boss, BossFrame};
use super::collision::Circle;
use super::health::Damageable;
use super::item::ItemSpawner;
use super::player::WeaponGrant;
use super::state::{GamePhase, GameState};
use super::weapon::WeaponKind;
use crate::Viewport;
use crate::audio::{AudioSink, MusicTrack, SoundEffect};

/// Input for a single frame
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Movement intent, components in [-1, 1]
    pub movement: Vec2,
    pub viewport: Viewport,
}

impl TickInput {
    pub fn new(movement: Vec2, viewport: Viewport) -> Self {
        Self { movement, viewport }
    }
}

/// Held direction keys, resolved into a movement intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementKeys {
    /// Screen coordinates: up is -y
    pub fn intent(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Advance the game by `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32, audio: &mut dyn AudioSink) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    if !dt_ms.is_finite() || dt_ms < 0.0 {
        log::warn!("Ignoring frame with invalid delta {dt_ms}");
        return;
    }
    let viewport = input.viewport;
    if !viewport.is_valid() {
        log::warn!("Ignoring frame with invalid viewport {}x{}", viewport.width, viewport.height);
        return;
    }

    state.time_ms += dt_ms as f64;
    let now = state.time_ms;

    // Boss spawn window
    if state.boss.is_none() && now >= state.next_boss_ms {
        spawn_boss(state, &viewport, audio);
    }

    // Player
    state.player.update(dt_ms, input.movement, &viewport);

    // Weapons aim at enemies only; the boss takes whatever strays into it
    let targets: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();
    let fired = state.player.fire_weapons(&targets, &mut state.projectiles, now);
    for _ in 0..fired {
        audio.play(SoundEffect::Shoot);
    }

    // Player projectiles vs enemies
    update_projectiles(state, &viewport, dt_ms, audio);

    // Spawners
    state
        .enemy_spawner
        .update(dt_ms, &mut state.enemies, &viewport, &mut state.rng, &mut state.ids);
    state
        .item_spawner
        .update(dt_ms, &mut state.items, state.enemies.len(), &viewport, &mut state.rng);

    update_items(state, dt_ms, audio);
    update_enemies(state, dt_ms, audio);
    update_boss(state, &viewport, dt_ms, now, audio);

    if !state.player.is_alive() {
        state.phase = GamePhase::GameOver;
        state.cancel_deferred();
        log::info!(
            "Game over! Level {}, score {}, {:.1}s survived",
            state.player.level,
            state.score,
            state.time_ms / 1000.0
        );
    }
}

/// Move projectiles, drop expired ones, and resolve enemy hits
///
/// A projectile damages at most one enemy and is consumed by the hit.
fn update_projectiles(state: &mut GameState, viewport: &Viewport, dt_ms: f32, audio: &mut dyn AudioSink) {
    let enemies = &mut state.enemies;
    state.projectiles.retain_mut(|projectile| {
        projectile.update(dt_ms);
        if !projectile.is_alive() || projectile.is_out_of_bounds(viewport) {
            return false;
        }

        // Newest enemy first
        for enemy in enemies.iter_mut().rev() {
            // Killed earlier this frame
            if !enemy.is_alive() {
                continue;
            }
            if projectile.is_colliding_with(&*enemy) {
                enemy.take_damage(projectile.damage);
                audio.play(SoundEffect::Hit);
                return false;
            }
        }
        true
    });

    let mut fallen = Vec::new();
    state.enemies.retain(|enemy| {
        if enemy.is_alive() {
            return true;
        }
        fallen.push((enemy.pos, enemy.xp_reward));
        false
    });

    for (pos, reward) in fallen {
        reward_kill(state, pos, reward, audio);
    }
}

/// Score, experience, drop and weapon rolls for a kill
fn reward_kill(state: &mut GameState, pos: Vec2, reward: u32, audio: &mut dyn AudioSink) {
    state.kills += 1;
    state.score += reward as u64;
    let levels = state.player.gain_experience(reward);
    audio.play(SoundEffect::EnemyDeath);
    for _ in 0..levels {
        audio.play(SoundEffect::LevelUp);
    }

    if state.rng.random_bool(state.tuning.kill_drop_chance) {
        let kind = ItemSpawner::spawn_drop_at(&mut state.items, pos, &mut state.rng);
        log::debug!("Kill dropped {}", kind.as_str());
    }

    if state.rng.random_bool(state.tuning.weapon_grant_chance) {
        give_random_weapon(state);
    }
}

fn give_random_weapon(state: &mut GameState) {
    let kinds = WeaponKind::DROPPABLE;
    let kind = kinds[state.rng.random_range(0..kinds.len())];
    match state.player.grant_weapon(kind) {
        WeaponGrant::Upgraded { level } => log::debug!("{} upgraded to level {}", kind.name(), level),
        WeaponGrant::Added => log::debug!("Picked up {}", kind.name()),
        WeaponGrant::Full => log::debug!("No room for {}", kind.name()),
    }
}

fn update_items(state: &mut GameState, dt_ms: f32, audio: &mut dyn AudioSink) {
    let player = &mut state.player;
    let mut levels = 0;
    state.items.retain_mut(|item| {
        item.update(dt_ms);
        if !item.is_alive() {
            return false;
        }
        if item.is_colliding_with(&*player) {
            levels += item.apply(player);
            audio.play(SoundEffect::Pickup);
            log::debug!("Picked up {}", item.kind.as_str());
            return false;
        }
        true
    });

    for _ in 0..levels {
        audio.play(SoundEffect::LevelUp);
    }
}

/// Enemies home in; touching the player costs one hit and the enemy
fn update_enemies(state: &mut GameState, dt_ms: f32, audio: &mut dyn AudioSink) {
    let player = &mut state.player;
    state.enemies.retain_mut(|enemy| {
        enemy.update(dt_ms, player.pos);
        if enemy.is_colliding_with(&*player) {
            player.take_damage(enemy.damage);
            audio.play(SoundEffect::PlayerHurt);
            log::debug!("Player hit by enemy, health {:.0}", player.health.current());
            return false;
        }
        true
    });
}

fn update_boss(state: &mut GameState, viewport: &Viewport, dt_ms: f32, now: f64, audio: &mut dyn AudioSink) {
    // Staggered shots due by now; ones whose boss is gone do nothing
    while let Some(pending) = state.deferred.pop_due(now) {
        match state.boss.as_mut() {
            Some(boss) if boss.id == pending.boss_id => boss.fire_staggered(pending.shot, state.player.pos, now),
            _ => log::trace!("Dropped stale shot from boss {}", pending.boss_id),
        }
    }

    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    let frame = BossFrame {
        dt_ms,
        now_ms: now,
        player_pos: state.player.pos,
        viewport: *viewport,
    };
    if boss.update(&frame, &mut state.rng, &mut state.deferred).is_some() {
        audio.play(SoundEffect::BossAttack);
    }

    // Boss projectiles vs player
    let player = &mut state.player;
    boss.projectiles.retain(|shot| {
        if !shot.is_colliding_with(&*player) {
            return true;
        }
        player.take_damage(shot.damage);
        audio.play(SoundEffect::PlayerHurt);
        false
    });

    // Player projectiles vs boss; nothing more lands once it is dead
    let mut defeated = false;
    state.projectiles.retain(|projectile| {
        if defeated || !boss.is_colliding_with(projectile) {
            return true;
        }
        boss.try_damage(projectile.damage);
        audio.play(SoundEffect::Hit);
        defeated = !boss.is_alive();
        false
    });

    if defeated {
        defeat_boss(state, audio);
        return;
    }

    // Full contact damage on every overlapping frame
    if boss.is_colliding_with(&state.player) {
        state.player.take_damage(boss.damage);
        audio.play(SoundEffect::PlayerHurt);
    }
}

fn spawn_boss(state: &mut GameState, viewport: &Viewport, audio: &mut dyn AudioSink) {
    let id = state.ids.next();
    let boss = Boss::spawn(id, viewport, &mut state.rng);
    log::info!(
        "Boss {} appeared at {:.0}s ({:.0} HP)",
        boss.name(),
        state.time_ms / 1000.0,
        boss.health.max()
    );
    state.boss = Some(boss);
    audio.play(SoundEffect::BossSpawn);
    audio.set_music(MusicTrack::Boss);
}

fn defeat_boss(state: &mut GameState, audio: &mut dyn AudioSink) {
    let Some(boss) = state.boss.take() else {
        return;
    };

    state.score += boss.xp_reward as u64;
    let levels = state.player.gain_experience(boss.xp_reward);
    audio.play(SoundEffect::EnemyDeath);
    for _ in 0..levels {
        audio.play(SoundEffect::LevelUp);
    }

    let scatter = state.tuning.boss_reward_scatter;
    for _ in 0..state.tuning.boss_reward_items {
        let offset = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * 2.0 * scatter,
            (state.rng.random::<f32>() - 0.5) * 2.0 * scatter,
        );
        ItemSpawner::spawn_drop_at(&mut state.items, boss.pos + offset, &mut state.rng);
    }

    state.deferred.retain(|pending| pending.boss_id != boss.id);
    state.bosses_defeated += 1;
    state.next_boss_ms = state.time_ms + state.tuning.boss_respawn_ms;
    audio.set_music(MusicTrack::Game);

    log::info!(
        "Boss {} defeated! Next boss in {:.0}s",
        boss.name(),
        state.tuning.boss_respawn_ms / 1000.0
    );
}
