//! Per-frame simulation tick
//!
//! Order within a tick: close signal, modal handling, ball movement, moving
//! obstacles, collision evaluation, countdown.

use glam::Vec2;

use super::collision::{
    ball_reaches_goal, ball_touches_collectible, first_obstacle_hit, out_of_bounds,
};
use super::state::{GamePhase, GameState};
use crate::consts::*;
use crate::settings::Rules;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Retry / play again (modal screens only)
    pub retry: bool,
    /// Quit (modal screens only)
    pub quit: bool,
    /// Window close request, honoured in every phase
    pub close: bool,
}

/// Whether the loop should keep running after this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Result of the collision pass. Collectibles never short-circuit, so they
/// are not represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Goal,
    Obstacle(usize),
    MovingObstacle(usize),
    OutOfBounds,
    Clear,
}

/// Advance the game by one tick. `elapsed_ms` comes off the level timer;
/// the front ends pass the fixed `TICK_MS`.
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f32, rules: &Rules) -> Flow {
    if input.close {
        log::info!("Close requested");
        return Flow::Quit;
    }

    if state.phase.is_modal() {
        if input.quit {
            log::info!("Quit from {:?} screen", state.phase);
            return Flow::Quit;
        }
        if input.retry {
            state.reset_game();
        }
        return Flow::Continue;
    }

    state.time_ticks += 1;

    state.ball += ball_step(input, rules.normalize_diagonal);
    for obstacle in &mut state.moving {
        obstacle.advance(rules.waypoint_arrival);
    }

    let contact = evaluate(state, rules);
    if contact != Contact::Clear {
        log::debug!("Tick {}: {:?}", state.time_ticks, contact);
    }

    // The run may have ended (or moved to a new level) during evaluation
    if state.phase == GamePhase::Playing {
        state.timer_ms -= elapsed_ms;
        if state.timer_ms <= 0.0 {
            state.timer_ms = 0.0;
            log::info!("Time up on level {}", state.level_number());
            state.lose_life(rules.respawn_collectibles);
        }
    }

    Flow::Continue
}

/// Ball displacement for the held direction keys
pub fn ball_step(input: &TickInput, normalize_diagonal: bool) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }
    if input.up {
        dir.y -= 1.0;
    }
    if input.down {
        dir.y += 1.0;
    }

    if normalize_diagonal {
        dir.normalize_or_zero() * BALL_SPEED
    } else {
        dir * BALL_SPEED
    }
}

/// Run the collision pass in priority order: goal, static obstacles, moving
/// obstacles, collectibles, bounds. Applies the resulting state change.
pub fn evaluate(state: &mut GameState, rules: &Rules) -> Contact {
    let ball = state.ball;

    if ball_reaches_goal(ball, state.level().goal) {
        state.complete_level();
        return Contact::Goal;
    }

    if let Some(i) = first_obstacle_hit(ball, state.level().obstacles.iter().copied()) {
        state.lose_life(rules.respawn_collectibles);
        return Contact::Obstacle(i);
    }

    if let Some(i) = first_obstacle_hit(ball, state.moving.iter().map(|o| o.pos)) {
        state.lose_life(rules.respawn_collectibles);
        return Contact::MovingObstacle(i);
    }

    let before = state.collectibles.len();
    state
        .collectibles
        .retain(|&gem| !ball_touches_collectible(ball, gem));
    for _ in state.collectibles.len()..before {
        state.collect_gem();
    }

    if out_of_bounds(ball, SCREEN_WIDTH, SCREEN_HEIGHT) {
        state.lose_life(rules.respawn_collectibles);
        return Contact::OutOfBounds;
    }

    Contact::Clear
}
