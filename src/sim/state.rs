//! Game state and level lifecycle
//!
//! `GameState` owns the catalog plus the live copy of the current level
//! (moving obstacles and remaining collectibles). Templates are never touched.

use glam::Vec2;

use super::level::{LevelCatalog, LevelTemplate};
use super::obstacle::MovingObstacle;
use crate::consts::*;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Out of lives; waiting for retry or quit
    GameOver,
    /// Final goal reached; waiting for play-again or quit
    Won,
}

impl GamePhase {
    /// Modal phases accept only retry/quit
    pub fn is_modal(self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// Things that happened during a tick, drained by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// `level` is the 0-based index of the level just finished
    LevelComplete { level: usize, time_bonus: u64 },
    Collected { points: u64 },
    ExtraLife { lives: u8 },
    LifeLost { lives_left: u8 },
    GameOver { score: u64 },
    Won { score: u64 },
    Restarted,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    catalog: LevelCatalog,
    pub phase: GamePhase,
    /// Player lives
    pub lives: u8,
    /// Score (never decreases within a playthrough)
    pub score: u64,
    /// Current level index (0-based, always valid)
    pub level_index: usize,
    /// Gems collected since the last extra life
    pub bonus_counter: u32,
    /// Countdown for the current attempt in milliseconds
    pub timer_ms: f32,
    pub ball: Vec2,
    /// Live moving obstacles for the current level
    pub moving: Vec<MovingObstacle>,
    /// Gems still on the board
    pub collectibles: Vec<Vec2>,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Start a new game on the first level of `catalog`
    pub fn new(catalog: LevelCatalog) -> Self {
        let mut state = Self {
            catalog,
            phase: GamePhase::Playing,
            lives: INITIAL_LIVES,
            score: 0,
            level_index: 0,
            bonus_counter: 0,
            timer_ms: LEVEL_TIME_MS,
            ball: Vec2::ZERO,
            moving: Vec::new(),
            collectibles: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
        };
        state.enter_level(0);
        state
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    /// Template of the level being played
    pub fn level(&self) -> &LevelTemplate {
        &self.catalog[self.level_index]
    }

    /// 1-based level number for display
    pub fn level_number(&self) -> usize {
        self.level_index + 1
    }

    /// Whole seconds left on the clock, never negative
    pub fn remaining_secs(&self) -> u64 {
        (self.timer_ms.max(0.0) / 1000.0).floor() as u64
    }

    /// Retry / play again: back to level 1 with full lives and no score
    pub fn reset_game(&mut self) {
        self.phase = GamePhase::Playing;
        self.lives = INITIAL_LIVES;
        self.score = 0;
        self.bonus_counter = 0;
        self.time_ticks = 0;
        self.enter_level(0);
        self.events.push(GameEvent::Restarted);
        log::info!("New game started");
    }

    /// Move to `index` with its own obstacles and a fresh copy of its gems
    fn enter_level(&mut self, index: usize) {
        self.level_index = index;
        self.moving = self.catalog[index]
            .moving
            .iter()
            .map(MovingObstacle::from)
            .collect();
        self.reset_level(true);
    }

    /// Put the ball, clock and obstacles back to the start of the current level
    pub fn reset_level(&mut self, restore_collectibles: bool) {
        let level = &self.catalog[self.level_index];
        self.ball = level.start;
        self.timer_ms = LEVEL_TIME_MS;
        for obstacle in &mut self.moving {
            obstacle.reset();
        }
        if restore_collectibles {
            self.collectibles = level.collectibles.clone();
        }
    }

    /// Goal reached: bank the time bonus and move on (or win)
    pub fn complete_level(&mut self) {
        let time_bonus = self.remaining_secs();
        self.score += time_bonus;
        self.events.push(GameEvent::LevelComplete {
            level: self.level_index,
            time_bonus,
        });
        log::info!(
            "Level {} complete (+{} time bonus, score {})",
            self.level_number(),
            time_bonus,
            self.score
        );

        if self.catalog.is_last(self.level_index) {
            self.phase = GamePhase::Won;
            self.events.push(GameEvent::Won { score: self.score });
            log::info!("All levels cleared! Final score: {}", self.score);
        } else {
            self.enter_level(self.level_index + 1);
        }
    }

    /// Lose a life; restart the level or end the game
    pub fn lose_life(&mut self, respawn_collectibles: bool) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost {
            lives_left: self.lives,
        });

        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver { score: self.score });
            log::info!("Game over on level {}, score {}", self.level_number(), self.score);
        } else {
            log::info!("Life lost on level {}, {} left", self.level_number(), self.lives);
            self.reset_level(respawn_collectibles);
        }
    }

    /// Award one collected gem, granting an extra life at the bonus threshold
    pub fn collect_gem(&mut self) {
        self.score += COLLECTIBLE_POINTS;
        self.bonus_counter += 1;
        self.events.push(GameEvent::Collected {
            points: COLLECTIBLE_POINTS,
        });

        if self.bonus_counter >= BONUS_THRESHOLD {
            self.bonus_counter = 0;
            self.lives = self.lives.saturating_add(1);
            self.events.push(GameEvent::ExtraLife { lives: self.lives });
            log::info!("Extra life! {} lives", self.lives);
        }
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
