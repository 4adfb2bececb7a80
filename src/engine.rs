//! Frame driver: lifecycle, input plumbing and render snapshots
//!
//! The host owns the window, the clock and the renderer. It feeds frame deltas
//! and movement intent in, and reads a [`Snapshot`] back out.

use glam::Vec2;
use serde::Serialize;

use crate::Viewport;
use crate::audio::{AudioSink, MusicTrack};
use crate::error::{Result, SimError};
use crate::sim::{Boss, Enemy, GameState, Item, MovementKeys, Player, Projectile, TickInput, tick};
use crate::tuning::Tuning;

/// Frames counted over rolling one-second windows
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    window_ms: f32,
    fps: u32,
}

impl FpsCounter {
    pub fn record(&mut self, dt_ms: f32) {
        self.frames += 1;
        self.window_ms += dt_ms;
        if self.window_ms >= 1000.0 {
            self.fps = self.frames;
            self.frames = 0;
            self.window_ms = 0.0;
        }
    }

    /// Frames in the last completed window
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Weapon line in the HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponHud {
    pub name: &'static str,
    pub level: u32,
}

/// Numbers the HUD draws
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudStats {
    pub score: u64,
    pub elapsed_ms: f64,
    /// Elapsed time as `m:ss`
    pub elapsed_label: String,
    pub fps: u32,
    /// Whole seconds until the next boss; `None` while a boss is alive
    pub boss_timer_s: Option<u64>,
    pub boss_health_ratio: Option<f32>,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    pub health: f32,
    pub max_health: f32,
    pub weapons: Vec<WeaponHud>,
    /// Seconds left on the speed boost, rounded up
    pub speed_boost_s: Option<u32>,
    pub damage_boost_s: Option<u32>,
    pub game_over: bool,
}

impl HudStats {
    pub fn from_state(state: &GameState, fps: u32) -> Self {
        let player = &state.player;
        let buff_secs = |remaining_ms: f32| (remaining_ms > 0.0).then(|| (remaining_ms / 1000.0).ceil() as u32);

        Self {
            score: state.score,
            elapsed_ms: state.time_ms,
            elapsed_label: format_clock(state.time_ms),
            fps,
            boss_timer_s: state.boss_timer_s(),
            boss_health_ratio: state.boss.as_ref().map(|b| b.health.ratio()),
            level: player.level,
            experience: player.experience,
            experience_to_next: player.experience_to_next,
            health: player.health.current(),
            max_health: player.health.max(),
            weapons: player
                .weapons
                .iter()
                .map(|w| WeaponHud {
                    name: w.name(),
                    level: w.level,
                })
                .collect(),
            speed_boost_s: buff_secs(player.speed_boost.remaining_ms),
            damage_boost_s: buff_secs(player.damage_boost.remaining_ms),
            game_over: state.is_game_over(),
        }
    }
}

/// `m:ss` from milliseconds
pub fn format_clock(ms: f64) -> String {
    let total = (ms.max(0.0) / 1000.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Read-only view of one frame for the renderer
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub viewport: Viewport,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub items: &'a [Item],
    pub boss: Option<&'a Boss>,
    pub hud: HudStats,
}

impl Snapshot<'_> {
    /// Serialize for a renderer on the other side of a process or JS boundary
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Owns a run and drives it one frame at a time
pub struct GameEngine<A: AudioSink> {
    state: GameState,
    audio: A,
    viewport: Viewport,
    movement: Vec2,
    running: bool,
    fps: FpsCounter,
}

impl<A: AudioSink> GameEngine<A> {
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning, mut audio: A) -> Result<Self> {
        check_viewport(&viewport)?;
        tuning.validate()?;

        log::info!(
            "New run (seed {seed}) on a {}x{} arena",
            viewport.width,
            viewport.height
        );
        audio.set_music(MusicTrack::Game);

        Ok(Self {
            state: GameState::new(seed, tuning, &viewport),
            audio,
            viewport,
            movement: Vec2::ZERO,
            running: false,
            fps: FpsCounter::default(),
        })
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        log::info!("Engine started");
    }

    /// Halt updates and cancel any staggered boss shots still pending
    pub fn stop(&mut self) {
        self.running = false;
        self.state.cancel_deferred();
        log::info!("Engine stopped");
    }

    /// Fresh run with the same tuning and viewport; running state is kept
    pub fn restart(&mut self, seed: u64) {
        let tuning = self.state.tuning.clone();
        self.state = GameState::new(seed, tuning, &self.viewport);
        self.fps = FpsCounter::default();
        self.movement = Vec2::ZERO;
        self.audio.set_music(MusicTrack::Game);
        log::info!("Restarted (seed {seed})");
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        check_viewport(&viewport)?;
        self.viewport = viewport;
        Ok(())
    }

    /// Movement intent for the following frames
    pub fn set_movement(&mut self, movement: Vec2) {
        self.movement = movement;
    }

    pub fn set_keys(&mut self, keys: MovementKeys) {
        self.movement = keys.intent();
    }

    /// Advance one frame; returns false when nothing ran
    pub fn update(&mut self, dt_ms: f32) -> bool {
        if !self.running || self.state.is_game_over() {
            return false;
        }

        self.fps.record(dt_ms);
        let input = TickInput::new(self.movement, self.viewport);
        tick(&mut self.state, &input, dt_ms, &mut self.audio);

        if self.state.is_game_over() {
            self.running = false;
        }
        true
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            viewport: self.viewport,
            player: &self.state.player,
            enemies: &self.state.enemies,
            projectiles: &self.state.projectiles,
            items: &self.state.items,
            boss: self.state.boss.as_ref(),
            hud: self.hud(),
        }
    }

    pub fn hud(&self) -> HudStats {
        HudStats::from_state(&self.state, self.fps.fps())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }
}

fn check_viewport(viewport: &Viewport) -> Result<()> {
    if viewport.is_valid() {
        Ok(())
    } else {
        Err(SimError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{NullAudio, RecordingAudio};
    use crate::sim::{BossKind, PendingShot, StaggeredShot};

    fn engine() -> GameEngine<RecordingAudio> {
        GameEngine::new(1, Viewport::new(800.0, 600.0), Tuning::default(), RecordingAudio::default()).unwrap()
    }

    #[test]
    fn test_rejects_bad_viewport() {
        let err = GameEngine::new(1, Viewport::new(0.0, 600.0), Tuning::default(), NullAudio).err();
        assert!(matches!(err, Some(SimError::InvalidViewport { .. })));

        let mut ok = engine();
        assert!(ok.set_viewport(Viewport::new(-1.0, 10.0)).is_err());
        assert_eq!(ok.viewport(), Viewport::new(800.0, 600.0));
    }

    #[test]
    fn test_rejects_bad_tuning() {
        let tuning = Tuning {
            max_weapons: 0,
            ..Default::default()
        };
        let err = GameEngine::new(1, Viewport::new(800.0, 600.0), tuning, NullAudio).err();
        assert!(matches!(err, Some(SimError::InvalidTuning(_))));
    }

    #[test]
    fn test_update_requires_start() {
        let mut e = engine();
        assert!(!e.update(16.0));
        assert_eq!(e.state().time_ms, 0.0);

        e.start();
        assert!(e.update(16.0));
        assert_eq!(e.state().time_ms, 16.0);
        assert_eq!(e.audio().music, vec![MusicTrack::Game]);
    }

    #[test]
    fn test_stop_cancels_pending_shots() {
        let mut e = engine();
        e.start();
        e.state.boss = Some(Boss::new(42, BossKind::Warden, Vec2::new(100.0, 100.0)));
        e.state.deferred.schedule(
            500.0,
            PendingShot {
                boss_id: 42,
                shot: StaggeredShot::Wave { index: 0 },
            },
        );

        e.stop();
        assert!(e.state().deferred.is_empty());
        assert!(!e.update(16.0));
    }

    #[test]
    fn test_game_over_stops_engine() {
        let mut e = engine();
        e.start();
        e.state.player.health.take_damage(500.0);
        assert!(e.update(16.0));
        assert!(!e.is_running());
        assert!(e.hud().game_over);
        assert!(!e.update(16.0));
    }

    #[test]
    fn test_restart_resets_run() {
        let mut e = engine();
        e.start();
        for _ in 0..200 {
            e.update(16.0);
        }
        e.restart(9);
        assert_eq!(e.state().time_ms, 0.0);
        assert_eq!(e.state().seed, 9);
        assert!(e.state().enemies.is_empty());
        assert!(e.is_running());
    }

    #[test]
    fn test_keys_drive_player() {
        let mut e = engine();
        e.start();
        e.set_keys(MovementKeys {
            right: true,
            ..Default::default()
        });
        let x0 = e.state().player.pos.x;
        e.update(100.0);
        assert!((e.state().player.pos.x - x0 - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        for _ in 0..59 {
            fps.record(16.0);
        }
        assert_eq!(fps.fps(), 0);
        for _ in 0..4 {
            fps.record(16.0);
        }
        // 63 frames cross 1000 ms
        assert_eq!(fps.fps(), 63);
    }

    #[test]
    fn test_hud_and_snapshot() {
        let mut e = engine();
        e.start();
        for _ in 0..5 {
            e.update(13_000.0 / 5.0);
        }
        let hud = e.hud();
        assert_eq!(hud.elapsed_label, "0:13");
        assert_eq!(hud.boss_timer_s, Some(47));
        assert_eq!(hud.weapons[0].name, "Basic Gun");

        let json = e.snapshot().to_json().unwrap();
        assert!(json.contains("\"player\""));
        assert!(json.contains("\"boss\":null"));
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(65_400.0), "1:05");
        assert_eq!(format_clock(600_000.0), "10:00");
    }
}
