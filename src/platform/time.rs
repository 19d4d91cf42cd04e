//! Frame pacing
//!
//! The simulation runs at a fixed 60 Hz regardless of the display rate.
//! `FrameClock` accumulates real time between frames and reports how many
//! fixed ticks are due, so a 75 Hz or 144 Hz display still advances the
//! game 60 ticks per second.

use crate::consts::{MAX_FRAME_MS, TICK_MS, TICKS_PER_SECOND};

/// Slack allowed against the nominal interval so a 60 Hz display does not
/// alternate between zero and two ticks on timer jitter
const TICK_SLACK_MS: f32 = 1.0;

/// Most ticks run for a single frame. Time beyond this is dropped rather
/// than replayed.
pub const MAX_SUBSTEPS: u32 = 8;

const FPS_WINDOW: usize = TICKS_PER_SECOND as usize;

#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Option<f64>,
    /// Real time not yet consumed by ticks, may dip below zero by the slack
    accumulator: f32,
    tick_times: [f64; FPS_WINDOW],
    tick_index: usize,
    ticks_seen: usize,
    fps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            accumulator: 0.0,
            tick_times: [0.0; FPS_WINDOW],
            tick_index: 0,
            ticks_seen: 0,
            fps: 0,
        }
    }

    /// Called once per display frame with a monotonic timestamp in
    /// milliseconds. Returns how many ticks of `TICK_MS` to run now.
    ///
    /// The first call only starts the clock. Frame gaps are clamped to
    /// `MAX_FRAME_MS` and a single frame never runs more than
    /// `MAX_SUBSTEPS` ticks.
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        let Some(last) = self.last_frame.replace(now_ms) else {
            return 0;
        };

        let gap = ((now_ms - last) as f32).clamp(0.0, MAX_FRAME_MS);
        self.accumulator += gap;

        let mut due = 0;
        while self.accumulator >= TICK_MS - TICK_SLACK_MS && due < MAX_SUBSTEPS {
            self.accumulator -= TICK_MS;
            due += 1;
        }
        if due == MAX_SUBSTEPS && self.accumulator > 0.0 {
            log::debug!("Dropping {:.1} ms of backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        for _ in 0..due {
            self.record(now_ms);
        }
        due
    }

    /// When the next tick becomes due, for native `WaitUntil` scheduling
    pub fn next_due(&self) -> Option<f64> {
        self.last_frame
            .map(|last| last + (TICK_MS - TICK_SLACK_MS - self.accumulator).max(0.0) as f64)
    }

    /// Ticks per second over the last second's worth of ticks
    pub fn fps(&self) -> u32 {
        self.fps
    }

    fn record(&mut self, now_ms: f64) {
        let oldest = self.tick_times[self.tick_index];
        self.tick_times[self.tick_index] = now_ms;
        self.tick_index = (self.tick_index + 1) % FPS_WINDOW;
        self.ticks_seen += 1;

        if self.ticks_seen > FPS_WINDOW {
            let span = now_ms - oldest;
            if span > 0.0 {
                self.fps = (FPS_WINDOW as f64 * 1000.0 / span).round() as u32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ticks run over `seconds` of frames at `hz`, after the starting frame
    fn ticks_at(hz: f64, seconds: f64) -> u32 {
        let mut clock = FrameClock::new();
        let frames = (hz * seconds).round() as u32;
        (0..=frames)
            .map(|i| clock.poll(i as f64 * 1000.0 / hz))
            .sum()
    }

    #[test]
    fn test_first_poll_starts_clock() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.next_due(), None);
        assert_eq!(clock.poll(1000.0), 0);
        assert!(clock.next_due().is_some());
    }

    #[test]
    fn test_fixed_rate_on_common_displays() {
        for hz in [30.0, 60.0, 75.0, 90.0, 120.0, 144.0, 165.0, 240.0] {
            let ticks = ticks_at(hz, 1.0);
            assert!((59..=61).contains(&ticks), "{hz} Hz ran {ticks} ticks");
        }
    }

    #[test]
    fn test_steady_60hz_runs_one_tick_per_frame() {
        let mut clock = FrameClock::new();
        let step = 1000.0 / 60.0;
        clock.poll(0.0);
        for i in 1..=120 {
            // A little jitter either way
            let jitter = if i % 2 == 0 { 0.4 } else { -0.4 };
            assert_eq!(clock.poll(i as f64 * step + jitter), 1, "frame {i}");
        }
    }

    #[test]
    fn test_fast_display_skips_frames() {
        let mut clock = FrameClock::new();
        clock.poll(0.0);
        // 240 Hz: three of every four frames have nothing to do
        let due: Vec<u32> = (1..=8).map(|i| clock.poll(i as f64 * 1000.0 / 240.0)).collect();
        assert_eq!(due.iter().sum::<u32>(), 2);
        assert!(due.iter().all(|&d| d <= 1));
    }

    #[test]
    fn test_slow_frame_catches_up() {
        let mut clock = FrameClock::new();
        clock.poll(0.0);
        assert_eq!(clock.poll(50.0), 3);
    }

    #[test]
    fn test_long_gap_capped() {
        let mut clock = FrameClock::new();
        clock.poll(0.0);
        assert_eq!(clock.poll(5_000.0), MAX_SUBSTEPS);
        // Backlog was dropped, not carried into the next frame
        assert_eq!(clock.poll(5_000.0 + TICK_MS as f64), 1);
    }

    #[test]
    fn test_fps_reports_tick_rate() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.fps(), 0);
        for i in 0..=288 {
            clock.poll(i as f64 * 1000.0 / 144.0);
        }
        assert!((59..=61).contains(&clock.fps()), "fps {}", clock.fps());
    }
}
