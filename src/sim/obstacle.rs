//! Moving obstacles
//!
//! Each obstacle travels back and forth between two waypoints at a constant
//! speed. Movement is a unit vector toward the current target scaled by speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::MovingObstacleDef;

/// What an obstacle does once it is within one step of its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointArrival {
    /// Land exactly on the waypoint, then turn around
    #[default]
    Snap,
    /// Turn around where it stands (stops up to one step short of the waypoint)
    Reverse,
}

/// A live obstacle, reset with its level
#[derive(Debug, Clone, PartialEq)]
pub struct MovingObstacle {
    pub start: Vec2,
    pub end: Vec2,
    pub speed: f32,
    pub pos: Vec2,
    pub heading_to_end: bool,
}

impl MovingObstacle {
    pub fn new(start: Vec2, end: Vec2, speed: f32) -> Self {
        Self {
            start,
            end,
            speed,
            pos: start,
            heading_to_end: true,
        }
    }

    pub fn target(&self) -> Vec2 {
        if self.heading_to_end {
            self.end
        } else {
            self.start
        }
    }

    /// Move one tick toward the current waypoint
    pub fn advance(&mut self, arrival: WaypointArrival) {
        let target = self.target();
        let delta = target - self.pos;
        let distance = delta.length();

        // distance == 0 covers zero-length paths and zero speed at a waypoint
        if distance < self.speed || distance == 0.0 {
            if arrival == WaypointArrival::Snap {
                self.pos = target;
            }
            self.heading_to_end = !self.heading_to_end;
        } else {
            self.pos += delta / distance * self.speed;
        }
    }

    pub fn reset(&mut self) {
        self.pos = self.start;
        self.heading_to_end = true;
    }
}

impl From<&MovingObstacleDef> for MovingObstacle {
    fn from(def: &MovingObstacleDef) -> Self {
        Self::new(def.start, def.end, def.speed)
    }
}
