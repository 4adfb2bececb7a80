//! Audio event plumbing
//!
//! The simulation never synthesizes sound. It reports named events to an
//! [`AudioSink`] owned by the host application; the host decides how (and
//! whether) to play them. Each effect carries a suggested beep tone so a
//! minimal backend can synthesize it without any asset files.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// A weapon discharged
    Shoot,
    /// A player projectile struck an enemy or the boss
    Hit,
    /// Item collected
    Pickup,
    /// Enemy or boss destroyed
    EnemyDeath,
    /// Player gained a level
    LevelUp,
    /// Boss entered the arena
    BossSpawn,
    /// Boss started a special attack
    BossAttack,
    /// Player took damage
    PlayerHurt,
}

/// Oscillator shape for the suggested tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// Suggested beep for an effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_s: f32,
    pub waveform: Waveform,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 8] = [
        SoundEffect::Shoot,
        SoundEffect::Hit,
        SoundEffect::Pickup,
        SoundEffect::EnemyDeath,
        SoundEffect::LevelUp,
        SoundEffect::BossSpawn,
        SoundEffect::BossAttack,
        SoundEffect::PlayerHurt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Shoot => "shoot",
            SoundEffect::Hit => "hit",
            SoundEffect::Pickup => "pickup",
            SoundEffect::EnemyDeath => "enemy_death",
            SoundEffect::LevelUp => "level_up",
            SoundEffect::BossSpawn => "boss_spawn",
            SoundEffect::BossAttack => "boss_attack",
            SoundEffect::PlayerHurt => "player_hurt",
        }
    }

    pub fn tone(&self) -> Tone {
        let (frequency_hz, duration_s, waveform) = match self {
            SoundEffect::Shoot => (200.0, 0.1, Waveform::Sine),
            SoundEffect::Hit => (150.0, 0.15, Waveform::Square),
            SoundEffect::Pickup => (400.0, 0.1, Waveform::Triangle),
            SoundEffect::EnemyDeath => (100.0, 0.2, Waveform::Sawtooth),
            SoundEffect::LevelUp => (500.0, 0.3, Waveform::Sine),
            SoundEffect::BossSpawn => (80.0, 0.5, Waveform::Sawtooth),
            SoundEffect::BossAttack => (120.0, 0.3, Waveform::Square),
            SoundEffect::PlayerHurt => (180.0, 0.2, Waveform::Triangle),
        };
        Tone {
            frequency_hz,
            duration_s,
            waveform,
        }
    }
}

/// Background music selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicTrack {
    Game,
    Boss,
}

/// Receiver for simulation audio events
///
/// Calls are fire-and-forget; the simulation never waits on playback.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    fn set_music(&mut self, _track: MusicTrack) {}
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn play(&mut self, effect: SoundEffect) {
        (**self).play(effect);
    }

    fn set_music(&mut self, track: MusicTrack) {
        (**self).set_music(track);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Writes events to the log (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        let tone = effect.tone();
        log::trace!(
            "sfx {} ({} Hz, {:?}, {}s)",
            effect.as_str(),
            tone.frequency_hz,
            tone.waveform,
            tone.duration_s
        );
    }

    fn set_music(&mut self, track: MusicTrack) {
        log::debug!("music -> {:?}", track);
    }
}

/// Keeps every event in order (tests, replays into another backend)
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    pub effects: Vec<SoundEffect>,
    pub music: Vec<MusicTrack>,
}

impl RecordingAudio {
    pub fn count(&self, effect: SoundEffect) -> usize {
        self.effects.iter().filter(|e| **e == effect).count()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
        self.music.clear();
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.effects.push(effect);
    }

    fn set_music(&mut self, track: MusicTrack) {
        self.music.push(track);
    }
}

/// Mute switch in front of another sink
///
/// Music changes are still forwarded while muted so the right track resumes
/// on unmute.
#[derive(Debug, Clone, Default)]
pub struct Mutable<S> {
    inner: S,
    muted: bool,
}

impl<S: AudioSink> Mutable<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            muted: false,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Flip mute state, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: AudioSink> AudioSink for Mutable<S> {
    fn play(&mut self, effect: SoundEffect) {
        if !self.muted {
            self.inner.play(effect);
        }
    }

    fn set_music(&mut self, track: MusicTrack) {
        self.inner.set_music(track);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_names_unique() {
        let mut names: Vec<_> = SoundEffect::ALL.iter().map(|e| e.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SoundEffect::ALL.len());
    }

    #[test]
    fn test_mutable_blocks_effects_not_music() {
        let mut sink = Mutable::new(RecordingAudio::default());
        sink.play(SoundEffect::Hit);
        assert!(sink.toggle_mute());
        sink.play(SoundEffect::Hit);
        sink.set_music(MusicTrack::Boss);

        assert_eq!(sink.inner().count(SoundEffect::Hit), 1);
        assert_eq!(sink.inner().music, vec![MusicTrack::Boss]);
    }

    #[test]
    fn test_boxed_sink_forwards() {
        let mut boxed: Box<RecordingAudio> = Box::default();
        boxed.play(SoundEffect::Pickup);
        assert_eq!(boxed.count(SoundEffect::Pickup), 1);
    }
}
