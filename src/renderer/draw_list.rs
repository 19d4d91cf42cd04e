//! Per-frame draw list
//!
//! Built from the game state without touching the GPU, so what gets drawn
//! (and what the HUD says) can be checked in tests.

use glam::Vec2;

use super::vertex::colors;
use crate::consts::*;
use crate::sim::{GamePhase, GameState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
}

/// Axis-aligned rectangle, `min` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
    pub color: [f32; 4],
}

/// Everything one frame shows
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub background: [f32; 4],
    /// Drawn first, under the circles
    pub rects: Vec<Rect>,
    /// Drawn in order; the ball is last
    pub circles: Vec<Circle>,
    /// Text lines for the front end's HUD
    pub hud: Vec<String>,
}

impl DrawList {
    /// `fps` is shown when `Some`
    pub fn build(state: &GameState, fps: Option<u32>) -> Self {
        let mut list = Self {
            background: colors::BACKGROUND,
            rects: Vec::new(),
            circles: Vec::new(),
            hud: Vec::new(),
        };

        match state.phase {
            GamePhase::GameOver => {
                list.hud.push("Game Over!".to_string());
                list.hud.push(format!("Final Score: {}", state.score));
                list.hud.push("Press R to Retry".to_string());
                list.hud.push("Press Q to Quit".to_string());
                return list;
            }
            GamePhase::Won => {
                list.hud.push("Congratulations! You Won!".to_string());
                list.hud.push(format!("Final Score: {}", state.score));
                list.hud.push("Press R to Play Again".to_string());
                list.hud.push("Press Q to Quit".to_string());
                return list;
            }
            GamePhase::Playing => {}
        }

        let level = state.level();

        list.rects.extend(level.platforms.iter().map(|p| Rect {
            min: Vec2::new(p.x, p.y),
            size: Vec2::new(p.width, p.height),
            color: colors::PLATFORM,
        }));

        list.push_circle(level.goal, BALL_RADIUS * GOAL_REACH_FACTOR, colors::GOAL);
        for &pos in &level.obstacles {
            list.push_circle(pos, BALL_RADIUS, colors::OBSTACLE);
        }
        for obstacle in &state.moving {
            list.push_circle(obstacle.pos, BALL_RADIUS, colors::MOVING_OBSTACLE);
        }
        for &gem in &state.collectibles {
            list.push_circle(gem, COLLECTIBLE_RADIUS, colors::COLLECTIBLE);
        }
        list.push_circle(state.ball, BALL_RADIUS, colors::BALL);

        list.hud.push(format!("Level: {}", state.level_number()));
        list.hud.push(format!("Lives: {}", state.lives));
        list.hud.push(format!("Score: {}", state.score));
        list.hud.push(format!("Time: {}", state.remaining_secs()));
        list.hud
            .push(format!("Gems: {}/{}", state.bonus_counter, BONUS_THRESHOLD));
        if let Some(fps) = fps {
            list.hud.push(format!("FPS: {}", fps));
        }

        list
    }

    /// HUD joined on one line, for the native window title
    pub fn hud_line(&self) -> String {
        self.hud.join("  |  ")
    }

    fn push_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        self.circles.push(Circle {
            center,
            radius,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{LevelCatalog, LevelTemplate, MovingObstacleDef, Platform};

    fn catalog() -> LevelCatalog {
        let mut level = LevelTemplate::new(Vec2::new(100.0, 500.0), Vec2::new(700.0, 100.0));
        level.obstacles = vec![Vec2::new(300.0, 300.0), Vec2::new(500.0, 200.0)];
        level.moving.push(MovingObstacleDef {
            start: Vec2::new(400.0, 400.0),
            end: Vec2::new(600.0, 400.0),
            speed: 2.0,
        });
        level.collectibles = vec![Vec2::new(200.0, 450.0)];
        level.platforms.push(Platform {
            x: 50.0,
            y: 540.0,
            width: 200.0,
            height: 20.0,
        });
        LevelCatalog::new(vec![level]).unwrap()
    }

    #[test]
    fn test_playing_frame_contents() {
        let state = GameState::new(catalog());
        let list = DrawList::build(&state, None);

        assert_eq!(list.background, colors::BACKGROUND);
        assert_eq!(list.rects.len(), 1);
        // goal + 2 obstacles + 1 moving + 1 gem + ball
        assert_eq!(list.circles.len(), 6);

        let goal = list.circles[0];
        assert_eq!(goal.center, Vec2::new(700.0, 100.0));
        assert_eq!(goal.radius, 30.0);
        assert_eq!(goal.color, colors::GOAL);

        assert_eq!(list.circles[3].color, colors::MOVING_OBSTACLE);
        assert_eq!(list.circles[4].radius, COLLECTIBLE_RADIUS);

        let ball = list.circles.last().unwrap();
        assert_eq!(ball.center, Vec2::new(100.0, 500.0));
        assert_eq!(ball.color, colors::BALL);
    }

    #[test]
    fn test_hud_lines() {
        let mut state = GameState::new(catalog());
        state.score = 250;
        state.timer_ms = 42_500.0;
        state.bonus_counter = 3;

        let list = DrawList::build(&state, None);
        assert_eq!(
            list.hud,
            vec!["Level: 1", "Lives: 3", "Score: 250", "Time: 42", "Gems: 3/10"]
        );

        let with_fps = DrawList::build(&state, Some(59));
        assert_eq!(with_fps.hud.last().unwrap(), "FPS: 59");
        assert!(with_fps.hud_line().starts_with("Level: 1  |  Lives: 3"));
    }

    #[test]
    fn test_modal_screens_only_show_text() {
        let mut state = GameState::new(catalog());
        state.score = 1234;
        state.phase = GamePhase::GameOver;

        let list = DrawList::build(&state, Some(60));
        assert!(list.circles.is_empty());
        assert!(list.rects.is_empty());
        assert_eq!(list.hud[0], "Game Over!");
        assert_eq!(list.hud[1], "Final Score: 1234");
        assert!(list.hud.contains(&"Press R to Retry".to_string()));

        state.phase = GamePhase::Won;
        let list = DrawList::build(&state, None);
        assert_eq!(list.hud[0], "Congratulations! You Won!");
        assert!(list.hud.contains(&"Press R to Play Again".to_string()));
        assert!(list.hud.contains(&"Press Q to Quit".to_string()));
    }

    #[test]
    fn test_collected_gems_disappear() {
        let mut state = GameState::new(catalog());
        state.collectibles.clear();
        let list = DrawList::build(&state, None);
        assert!(list.circles.iter().all(|c| c.color != colors::COLLECTIBLE));
    }
}
