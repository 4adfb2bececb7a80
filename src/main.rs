//! Horde Survivor headless runner
//!
//! Plays a scripted session at 60 Hz without a window and prints a summary.
//! Rendering and real input belong to the host application.
//!
//! Usage: `horde-survivor [seed] [seconds] [tuning.json]`

use std::f32::consts::TAU;

use glam::Vec2;
use horde_survivor::audio::Mutable;
use horde_survivor::{GameEngine, LogAudio, Result, Tuning, Viewport};

const FRAME_MS: f32 = 1000.0 / 60.0;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0xC0FFEE);
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);
    let tuning = match args.next() {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    log::info!("Horde Survivor (headless) starting: seed {seed}, {seconds}s");

    let viewport = Viewport::new(1280.0, 720.0);
    let mut engine = GameEngine::new(seed, viewport, tuning, Mutable::new(LogAudio))?;
    engine.start();

    let frames = (seconds * 1000.0 / FRAME_MS) as u32;
    for frame in 0..frames {
        // Slow figure-eight around the arena
        let t = frame as f32 * FRAME_MS / 1000.0;
        let phase = t / 8.0 * TAU;
        engine.set_movement(Vec2::new(phase.cos(), (2.0 * phase).sin()));

        if !engine.update(FRAME_MS) {
            break;
        }
        if frame % 600 == 0 {
            let hud = engine.hud();
            log::debug!(
                "{} score {} level {} hp {:.0}/{:.0} enemies {}",
                hud.elapsed_label,
                hud.score,
                hud.level,
                hud.health,
                hud.max_health,
                engine.state().enemies.len()
            );
        }
    }
    engine.stop();

    let state = engine.state();
    let hud = engine.hud();
    println!("Survived {} ({})", hud.elapsed_label, if hud.game_over { "died" } else { "alive" });
    println!("Score:   {}", hud.score);
    println!("Level:   {} ({}/{} xp)", hud.level, hud.experience, hud.experience_to_next);
    println!("Kills:   {} enemies, {} bosses", state.kills, state.bosses_defeated);
    println!(
        "Weapons: {}",
        hud.weapons
            .iter()
            .map(|w| format!("{} L{}", w.name, w.level))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}
