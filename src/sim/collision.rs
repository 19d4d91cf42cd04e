//! Circle and playfield collision checks
//!
//! Everything in the game is a circle, so contact is a squared-distance
//! comparison against the sum of radii. No square roots on the hot path.

use glam::Vec2;

use crate::consts::*;

/// True when `a` and `b` are no further apart than `reach`
#[inline]
pub fn within_reach(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance_squared(b) <= reach * reach
}

/// Ball centre is close enough to the goal centre to finish the level
#[inline]
pub fn ball_reaches_goal(ball: Vec2, goal: Vec2) -> bool {
    within_reach(ball, goal, BALL_RADIUS * GOAL_REACH_FACTOR)
}

/// Ball touches an obstacle (static or moving) of ball size
#[inline]
pub fn ball_hits_obstacle(ball: Vec2, obstacle: Vec2) -> bool {
    within_reach(ball, obstacle, BALL_RADIUS * OBSTACLE_REACH_FACTOR)
}

/// Ball overlaps a collectible
#[inline]
pub fn ball_touches_collectible(ball: Vec2, collectible: Vec2) -> bool {
    within_reach(ball, collectible, BALL_RADIUS + COLLECTIBLE_RADIUS)
}

/// Index of the first obstacle the ball touches, in list order
pub fn first_obstacle_hit<I>(ball: Vec2, obstacles: I) -> Option<usize>
where
    I: IntoIterator<Item = Vec2>,
{
    obstacles
        .into_iter()
        .position(|obstacle| ball_hits_obstacle(ball, obstacle))
}

/// Ball centre has left the `[0, width] x [0, height]` playfield
#[inline]
pub fn out_of_bounds(pos: Vec2, width: f32, height: f32) -> bool {
    pos.x < 0.0 || pos.x > width || pos.y < 0.0 || pos.y > height
}
