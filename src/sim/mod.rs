//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only enters through the `elapsed_ms` passed to `tick`
//! - Levels come from an immutable catalog
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use collision::{
    ball_hits_obstacle, ball_reaches_goal, ball_touches_collectible, out_of_bounds,
};
pub use level::{LevelCatalog, LevelError, LevelTemplate, MovingObstacleDef, Platform};
pub use obstacle::{MovingObstacle, WaypointArrival};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{Contact, Flow, TickInput, ball_step, evaluate, tick};
