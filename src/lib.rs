//! Ball Roller - steer a ball to the goal before the clock runs out
//!
//! Core modules:
//! - `sim`: Level catalog, moving obstacles, collisions and the game state machine
//! - `renderer`: Draw list construction and the WebGPU pipeline that draws it
//! - `platform`: Keyboard and frame-clock collaborators shared by both front ends
//! - `settings`: Player preferences and gameplay rule switches
//! - `audio`: Procedural sound effects for game events (played on the web)

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Rules, Settings, SettingsError};
pub use sim::WaypointArrival;

/// Game configuration constants
pub mod consts {
    /// Target tick rate
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Nominal tick interval in milliseconds
    pub const TICK_MS: f32 = 1000.0 / TICKS_PER_SECOND as f32;
    /// Longest frame gap fed to the timer (tab suspended, debugger stop)
    pub const MAX_FRAME_MS: f32 = 250.0;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 20.0;
    /// Units moved per tick per held direction
    pub const BALL_SPEED: f32 = 5.0;

    /// Goal is reached within this many ball radii of its centre
    pub const GOAL_REACH_FACTOR: f32 = 1.5;
    /// Obstacles (static and moving) are drawn at ball size, so contact is two radii
    pub const OBSTACLE_REACH_FACTOR: f32 = 2.0;
    pub const COLLECTIBLE_RADIUS: f32 = 10.0;

    /// Countdown per level attempt
    pub const LEVEL_TIME_MS: f32 = 60_000.0;
    pub const INITIAL_LIVES: u8 = 3;
    pub const COLLECTIBLE_POINTS: u64 = 100;
    /// Gems needed for an extra life
    pub const BONUS_THRESHOLD: u32 = 10;
}
