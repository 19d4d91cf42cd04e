//! Level catalog
//!
//! Levels are hand-authored templates. The built-in set ships as JSON embedded
//! at compile time; templates are never mutated during play (the live copy of
//! collectibles and obstacles lives in `GameState`).

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Built-in level data
const BUILTIN_LEVELS: &str = include_str!("../../assets/levels.json");

/// Errors raised while loading or validating level data
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level catalog is empty")]
    Empty,
    #[error("level {level}: {field} is not a finite coordinate")]
    NonFinite { level: usize, field: &'static str },
    #[error("level {level}: moving obstacle {index} has invalid speed {speed}")]
    InvalidSpeed { level: usize, index: usize, speed: f32 },
    #[error("level {level}: platform {index} has a negative size")]
    InvalidPlatform { level: usize, index: usize },
    #[error("malformed level data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A moving obstacle's path: two waypoints and a speed in units per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingObstacleDef {
    pub start: Vec2,
    pub end: Vec2,
    pub speed: f32,
}

/// Decorative rectangle (no collision effect)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Immutable level definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTemplate {
    pub start: Vec2,
    pub goal: Vec2,
    /// Static obstacle centres
    #[serde(default)]
    pub obstacles: Vec<Vec2>,
    #[serde(default)]
    pub moving: Vec<MovingObstacleDef>,
    #[serde(default)]
    pub collectibles: Vec<Vec2>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
}

impl LevelTemplate {
    /// A bare level with only a start and a goal
    pub fn new(start: Vec2, goal: Vec2) -> Self {
        Self {
            start,
            goal,
            obstacles: Vec::new(),
            moving: Vec::new(),
            collectibles: Vec::new(),
            platforms: Vec::new(),
        }
    }

    fn validate(&self, level: usize) -> Result<(), LevelError> {
        let finite = |field: &'static str, p: Vec2| {
            if p.is_finite() {
                Ok(())
            } else {
                Err(LevelError::NonFinite { level, field })
            }
        };

        finite("start", self.start)?;
        finite("goal", self.goal)?;
        for &p in &self.obstacles {
            finite("obstacle", p)?;
        }
        for &p in &self.collectibles {
            finite("collectible", p)?;
        }
        for (index, def) in self.moving.iter().enumerate() {
            finite("moving obstacle waypoint", def.start)?;
            finite("moving obstacle waypoint", def.end)?;
            if !def.speed.is_finite() || def.speed < 0.0 {
                return Err(LevelError::InvalidSpeed {
                    level,
                    index,
                    speed: def.speed,
                });
            }
        }
        for (index, platform) in self.platforms.iter().enumerate() {
            finite("platform", Vec2::new(platform.x, platform.y))?;
            let size = Vec2::new(platform.width, platform.height);
            finite("platform", size)?;
            if size.x < 0.0 || size.y < 0.0 {
                return Err(LevelError::InvalidPlatform { level, index });
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    levels: Vec<LevelTemplate>,
}

/// Ordered, index-addressable set of level templates
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCatalog {
    levels: Vec<LevelTemplate>,
}

impl LevelCatalog {
    /// Validate and wrap a list of levels
    pub fn new(levels: Vec<LevelTemplate>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        for (i, level) in levels.iter().enumerate() {
            level.validate(i)?;
        }
        Ok(Self { levels })
    }

    /// Parse a `{ "levels": [...] }` document
    pub fn from_json(text: &str) -> Result<Self, LevelError> {
        let file: CatalogFile = serde_json::from_str(text)?;
        Self::new(file.levels)
    }

    /// The ten levels that ship with the game
    pub fn builtin() -> Result<Self, LevelError> {
        let catalog = Self::from_json(BUILTIN_LEVELS)?;
        log::debug!("Loaded {} built-in levels", catalog.level_count());
        Ok(catalog)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level_at(&self, index: usize) -> Option<&LevelTemplate> {
        self.levels.get(index)
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.levels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelTemplate> {
        self.levels.iter()
    }
}

impl std::ops::Index<usize> for LevelCatalog {
    type Output = LevelTemplate;

    fn index(&self, index: usize) -> &LevelTemplate {
        &self.levels[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = LevelCatalog::builtin().unwrap();
        assert_eq!(catalog.level_count(), 10);

        let first = catalog.level_at(0).unwrap();
        assert_eq!(first.start, Vec2::new(100.0, 500.0));
        assert_eq!(first.goal, Vec2::new(700.0, 100.0));
        assert_eq!(first.obstacles.len(), 2);

        let second = catalog.level_at(1).unwrap();
        assert_eq!(second.start, Vec2::new(50.0, 550.0));

        assert!(catalog.level_at(10).is_none());
        assert!(catalog.is_last(9));
        assert!(!catalog.is_last(8));
    }

    #[test]
    fn test_builtin_starts_are_safe() {
        // Spawning must never be an instant life loss
        let catalog = LevelCatalog::builtin().unwrap();
        let reach = BALL_RADIUS * OBSTACLE_REACH_FACTOR;
        for (i, level) in catalog.iter().enumerate() {
            for obstacle in &level.obstacles {
                assert!(
                    level.start.distance(*obstacle) > reach,
                    "level {} start touches obstacle {:?}",
                    i + 1,
                    obstacle
                );
            }
            for def in &level.moving {
                assert!(level.start.distance(def.start) > reach);
            }
            assert!(level.start.x >= 0.0 && level.start.x <= SCREEN_WIDTH);
            assert!(level.start.y >= 0.0 && level.start.y <= SCREEN_HEIGHT);
        }
    }

    #[test]
    fn test_later_levels_add_moving_obstacles() {
        let catalog = LevelCatalog::builtin().unwrap();
        assert!(catalog.level_at(0).unwrap().moving.is_empty());
        assert!(!catalog.level_at(9).unwrap().moving.is_empty());
        let gems: usize = catalog.iter().map(|l| l.collectibles.len()).sum();
        assert!(gems >= BONUS_THRESHOLD as usize);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(LevelCatalog::new(Vec::new()), Err(LevelError::Empty)));
        assert!(matches!(
            LevelCatalog::from_json(r#"{ "levels": [] }"#),
            Err(LevelError::Empty)
        ));
    }

    #[test]
    fn test_optional_lists_default_to_empty() {
        let catalog =
            LevelCatalog::from_json(r#"{ "levels": [{ "start": [1, 2], "goal": [3, 4] }] }"#)
                .unwrap();
        let level = catalog.level_at(0).unwrap();
        assert!(level.obstacles.is_empty());
        assert!(level.moving.is_empty());
        assert!(level.collectibles.is_empty());
        assert!(level.platforms.is_empty());
    }

    #[test]
    fn test_invalid_data_rejected() {
        let mut level = LevelTemplate::new(Vec2::ZERO, Vec2::ONE);
        level.moving.push(MovingObstacleDef {
            start: Vec2::ZERO,
            end: Vec2::ONE,
            speed: -1.0,
        });
        assert!(matches!(
            LevelCatalog::new(vec![level]),
            Err(LevelError::InvalidSpeed { level: 0, index: 0, .. })
        ));

        let mut level = LevelTemplate::new(Vec2::ZERO, Vec2::ONE);
        level.obstacles.push(Vec2::new(f32::NAN, 0.0));
        assert!(matches!(
            LevelCatalog::new(vec![LevelTemplate::new(Vec2::ZERO, Vec2::ONE), level]),
            Err(LevelError::NonFinite { level: 1, field: "obstacle" })
        ));

        let mut level = LevelTemplate::new(Vec2::ZERO, Vec2::ONE);
        level.platforms.push(Platform {
            x: 0.0,
            y: 0.0,
            width: -5.0,
            height: 10.0,
        });
        assert!(matches!(
            LevelCatalog::new(vec![level]),
            Err(LevelError::InvalidPlatform { level: 0, index: 0 })
        ));

        assert!(matches!(
            LevelCatalog::from_json("{ not json"),
            Err(LevelError::Parse(_))
        ));
    }
}
