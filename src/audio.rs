//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Each effect is a short list of oscillator notes. The note tables and the
//! event mapping are plain data; only `AudioManager` talks to the browser.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Gem picked up
    Collect,
    /// Bonus threshold reached
    ExtraLife,
    /// Obstacle, bounds or timer
    LifeLost,
    /// Goal reached
    LevelComplete,
    GameOver,
    /// Final goal reached
    Victory,
}

/// Oscillator shape, mirrors the Web Audio types we use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Triangle,
    Square,
}

/// One oscillator blip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub freq: f32,
    /// Frequency at the end of the note, for glides
    pub end_freq: Option<f32>,
    pub wave: Wave,
    /// Offset from the effect start in seconds
    pub delay: f64,
    pub duration: f64,
    /// Peak gain before master/sfx volume
    pub gain: f32,
}

const fn note(freq: f32, wave: Wave, delay: f64, duration: f64, gain: f32) -> Note {
    Note {
        freq,
        end_freq: None,
        wave,
        delay,
        duration,
        gain,
    }
}

const COLLECT: &[Note] = &[
    note(800.0, Wave::Sine, 0.0, 0.12, 0.25),
    note(1200.0, Wave::Sine, 0.06, 0.12, 0.25),
];

const EXTRA_LIFE: &[Note] = &[
    note(500.0, Wave::Triangle, 0.0, 0.2, 0.25),
    note(700.0, Wave::Triangle, 0.08, 0.2, 0.25),
    note(900.0, Wave::Triangle, 0.16, 0.2, 0.25),
    note(1200.0, Wave::Triangle, 0.24, 0.3, 0.25),
];

const LIFE_LOST: &[Note] = &[Note {
    freq: 300.0,
    end_freq: Some(60.0),
    wave: Wave::Square,
    delay: 0.0,
    duration: 0.4,
    gain: 0.2,
}];

const LEVEL_COMPLETE: &[Note] = &[
    note(400.0, Wave::Triangle, 0.0, 0.4, 0.3),
    note(500.0, Wave::Triangle, 0.1, 0.4, 0.3),
    note(600.0, Wave::Triangle, 0.2, 0.4, 0.3),
    note(800.0, Wave::Triangle, 0.3, 0.5, 0.3),
];

const GAME_OVER: &[Note] = &[
    note(400.0, Wave::Sine, 0.0, 0.3, 0.3),
    note(350.0, Wave::Sine, 0.2, 0.3, 0.3),
    note(300.0, Wave::Sine, 0.4, 0.3, 0.3),
    note(200.0, Wave::Sine, 0.6, 0.5, 0.3),
];

const VICTORY: &[Note] = &[
    note(500.0, Wave::Triangle, 0.0, 0.25, 0.25),
    note(600.0, Wave::Triangle, 0.08, 0.25, 0.25),
    note(700.0, Wave::Triangle, 0.16, 0.25, 0.25),
    note(800.0, Wave::Triangle, 0.24, 0.25, 0.25),
    note(1000.0, Wave::Triangle, 0.32, 0.6, 0.3),
];

impl SoundEffect {
    /// Sound for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Collected { .. } => Some(SoundEffect::Collect),
            GameEvent::ExtraLife { .. } => Some(SoundEffect::ExtraLife),
            // The game-over jingle covers the last life
            GameEvent::LifeLost { lives_left } if *lives_left > 0 => Some(SoundEffect::LifeLost),
            GameEvent::LifeLost { .. } => None,
            GameEvent::LevelComplete { .. } => Some(SoundEffect::LevelComplete),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::Won { .. } => Some(SoundEffect::Victory),
            GameEvent::Restarted => None,
        }
    }

    pub fn notes(self) -> &'static [Note] {
        match self {
            SoundEffect::Collect => COLLECT,
            SoundEffect::ExtraLife => EXTRA_LIFE,
            SoundEffect::LifeLost => LIFE_LOST,
            SoundEffect::LevelComplete => LEVEL_COMPLETE,
            SoundEffect::GameOver => GAME_OVER,
            SoundEffect::Victory => VICTORY,
        }
    }
}

/// Final gain multiplier from the player's preferences
pub fn effective_volume(settings: &Settings) -> f32 {
    if settings.muted {
        0.0
    } else {
        (settings.master_volume * settings.sfx_volume).clamp(0.0, 1.0)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, OscillatorType};

    use super::{Note, SoundEffect, Wave, effective_volume};
    use crate::settings::Settings;
    use crate::sim::GameEvent;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: effective_volume(settings),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play whatever the tick's events call for
        pub fn play_events(&self, events: &[GameEvent]) {
            for effect in events.iter().filter_map(SoundEffect::for_event) {
                self.play(effect);
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let start = ctx.current_time();
            for note in effect.notes() {
                self.play_note(ctx, start, note);
            }
        }

        fn play_note(&self, ctx: &AudioContext, start: f64, note: &Note) -> Option<()> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match note.wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Triangle => OscillatorType::Triangle,
                Wave::Square => OscillatorType::Square,
            });
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            let t = start + note.delay;
            let end = t + note.duration;
            osc.frequency().set_value_at_time(note.freq, t).ok()?;
            if let Some(end_freq) = note.end_freq {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(end_freq, end)
                    .ok()?;
            }
            gain.gain().set_value_at_time(self.volume * note.gain, t).ok()?;
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok()?;

            osc.start_with_when(t).ok()?;
            osc.stop_with_when(end + 0.05).ok()?;
            Some(())
        }
    }
}
