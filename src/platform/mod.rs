//! Platform abstraction layer
//!
//! Pieces both front ends share:
//! - Keyboard state to per-tick input
//! - Frame pacing and FPS measurement

pub mod input;
pub mod time;

pub use input::{Key, KeyboardState};
pub use time::FrameClock;
