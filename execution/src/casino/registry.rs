//! Game registry for managing available games and their configurations.
//!
//! The registry provides:
//! - Centralized listing of supported games
//! - Per-game configuration with defaults
//! - Active/inactive game filtering
//! - Metadata for UI display (names, descriptions, categories)
//! - JSON import/export of the configuration set
//!
//! # Example
//! ```rust
//! use neovegas_execution::casino::registry::GameRegistry;
//! use neovegas_types::casino::GameType;
//!
//! let registry = GameRegistry::default();
//! assert!(registry.is_active(GameType::Mines));
//! let info = GameRegistry::get_info(GameType::Mines);
//! assert_eq!(info.name, "Mines");
//! ```

use super::dice::{DiceConfig, DiceSetup};
use super::dragon_tower::{TowerConfig, TowerSetup};
use super::hilo::HiLoConfig;
use super::mines::{multiplier_for, MinesConfig};
use super::wheel::{bucket_counts, WheelConfig};
use super::GameError;
use neovegas_types::casino::{GameType, MINES_GRID_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Per-game configuration values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", content = "config", rename_all = "snake_case")]
pub enum GameConfig {
    Dice(DiceConfig),
    Mines(MinesConfig),
    DragonTower(TowerConfig),
    Wheel(WheelConfig),
    #[serde(rename = "hilo")]
    HiLo(HiLoConfig),
}

impl GameConfig {
    /// Create a default configuration for a game type.
    pub fn default_for(game_type: GameType) -> Self {
        match game_type {
            GameType::Dice => Self::Dice(DiceConfig::default()),
            GameType::Mines => Self::Mines(MinesConfig::default()),
            GameType::DragonTower => Self::DragonTower(TowerConfig::default()),
            GameType::Wheel => Self::Wheel(WheelConfig::default()),
            GameType::HiLo => Self::HiLo(HiLoConfig::default()),
        }
    }

    /// Get the game type for this configuration.
    pub fn game_type(&self) -> GameType {
        match self {
            Self::Dice(_) => GameType::Dice,
            Self::Mines(_) => GameType::Mines,
            Self::DragonTower(_) => GameType::DragonTower,
            Self::Wheel(_) => GameType::Wheel,
            Self::HiLo(_) => GameType::HiLo,
        }
    }

    /// Reject configurations no table would accept.
    pub fn validate(&self) -> Result<(), GameError> {
        match self {
            Self::Mines(c) => c.validate(),
            Self::Wheel(c) => c.validate(),
            // Dice targets are clamped rather than rejected.
            Self::Dice(_) | Self::DragonTower(_) | Self::HiLo(_) => Ok(()),
        }
    }

    /// Return of one unit wagered on the first decision of a round.
    ///
    /// Hi-Lo depends on the first card dealt, so it has no fixed value.
    pub fn expected_return(&self) -> Option<f64> {
        match self {
            Self::Dice(c) => {
                let setup = DiceSetup::new(*c);
                Some(setup.win_chance as f64 / 100.0 * setup.multiplier.as_f64())
            }
            Self::Mines(c) => {
                c.validate().ok()?;
                let safe = (MINES_GRID_SIZE - c.mines) as f64;
                Some(safe / MINES_GRID_SIZE as f64 * multiplier_for(c.mines, 1).as_f64())
            }
            Self::DragonTower(c) => {
                let setup = TowerSetup::new(c.difficulty);
                let columns = setup.columns as f64;
                Some((columns - 1.0) / columns * setup.multiplier(0).as_f64())
            }
            Self::Wheel(c) => {
                c.validate().ok()?;
                let total: f64 = bucket_counts(c.difficulty, c.segments)
                    .iter()
                    .map(|(m, count)| m.as_f64() * *count as f64)
                    .sum();
                Some(total / c.segments as f64)
            }
            Self::HiLo(_) => None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate().map_err(|source| RegistryError::Invalid {
            game: config.game_type(),
            source,
        })?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, RegistryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("malformed registry json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid {game} config: {source}")]
    Invalid {
        game: GameType,
        #[source]
        source: GameError,
    },
}

// ============================================================================
// Game metadata
// ============================================================================

/// Game category for UI organization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameCategory {
    /// Resolved by one random draw (Dice, Wheel).
    Instant,
    /// Step-by-step grid games with cash-out (Mines, Dragon Tower).
    Grid,
    /// Card games (Hi-Lo).
    Cards,
}

/// Metadata about a game for UI display.
#[derive(Clone, Debug, Serialize)]
pub struct GameInfo {
    /// Game type identifier.
    pub game_type: GameType,
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Category for UI grouping.
    pub category: GameCategory,
    /// Minimum bet (in coins).
    pub min_bet: u64,
    /// Maximum bet (in coins); `None` means limited by the balance only.
    pub max_bet: Option<u64>,
    /// Whether the game is single-step (no cash-out).
    pub single_shot: bool,
    /// Whether the game is currently active.
    pub active: bool,
}

impl GameInfo {
    const fn new(
        game_type: GameType,
        name: &'static str,
        description: &'static str,
        category: GameCategory,
        single_shot: bool,
    ) -> Self {
        Self {
            game_type,
            name,
            description,
            category,
            min_bet: 1,
            max_bet: None,
            single_shot,
            active: true,
        }
    }
}

/// Configured state of the registry as written to JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub configs: Vec<GameConfig>,
    #[serde(default)]
    pub inactive: Vec<GameType>,
}

// ============================================================================
// Game registry
// ============================================================================

/// Registry of available games and their configurations.
#[derive(Clone, Debug)]
pub struct GameRegistry {
    configs: HashMap<GameType, GameConfig>,
    active: HashMap<GameType, bool>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRegistry {
    /// Create a new registry with all games using default configurations.
    pub fn new() -> Self {
        let mut configs = HashMap::new();
        let mut active = HashMap::new();

        for &game_type in Self::all_game_types() {
            configs.insert(game_type, GameConfig::default_for(game_type));
            active.insert(game_type, true);
        }

        Self { configs, active }
    }

    /// List all supported game types.
    pub fn all_game_types() -> &'static [GameType] {
        &GameType::ALL
    }

    /// Get static metadata for a game type.
    pub fn get_info(game_type: GameType) -> GameInfo {
        match game_type {
            GameType::Dice => GameInfo::new(
                GameType::Dice,
                "Dice",
                "Roll over or under a target. Lower chance, bigger payout.",
                GameCategory::Instant,
                true,
            ),
            GameType::Mines => GameInfo::new(
                GameType::Mines,
                "Mines",
                "Uncover gems on a 5x5 grid and cash out before you hit a mine.",
                GameCategory::Grid,
                false,
            ),
            GameType::DragonTower => GameInfo::new(
                GameType::DragonTower,
                "Dragon Tower",
                "Climb nine rows, avoiding the dragon hidden in each one.",
                GameCategory::Grid,
                false,
            ),
            GameType::Wheel => GameInfo::new(
                GameType::Wheel,
                "Wheel",
                "Spin a wheel of multipliers sized and weighted by difficulty.",
                GameCategory::Instant,
                true,
            ),
            GameType::HiLo => GameInfo::new(
                GameType::HiLo,
                "Hi-Lo",
                "Predict if the next card is higher or lower.",
                GameCategory::Cards,
                false,
            ),
        }
    }

    /// Check if a game is active.
    pub fn is_active(&self, game_type: GameType) -> bool {
        self.active.get(&game_type).copied().unwrap_or(false)
    }

    /// Set a game's active status.
    pub fn set_active(&mut self, game_type: GameType, active: bool) {
        self.active.insert(game_type, active);
    }

    /// Get all active games.
    pub fn active_games(&self) -> Vec<GameType> {
        Self::all_game_types()
            .iter()
            .copied()
            .filter(|gt| self.is_active(*gt))
            .collect()
    }

    /// Get configuration for a game.
    pub fn get_config(&self, game_type: GameType) -> Option<&GameConfig> {
        self.configs.get(&game_type)
    }

    /// Set configuration for a game.
    pub fn set_config(&mut self, config: GameConfig) -> Result<(), RegistryError> {
        let game_type = config.game_type();
        config
            .validate()
            .map_err(|source| RegistryError::Invalid {
                game: game_type,
                source,
            })?;
        self.configs.insert(game_type, config);
        Ok(())
    }

    /// Get all game info with current active status.
    pub fn all_games_info(&self) -> Vec<GameInfo> {
        Self::all_game_types()
            .iter()
            .map(|&gt| {
                let mut info = Self::get_info(gt);
                info.active = self.is_active(gt);
                info
            })
            .collect()
    }

    /// Get games by category.
    pub fn games_by_category(&self, category: GameCategory) -> Vec<GameType> {
        Self::all_game_types()
            .iter()
            .copied()
            .filter(|&gt| Self::get_info(gt).category == category)
            .collect()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            configs: Self::all_game_types()
                .iter()
                .filter_map(|gt| self.configs.get(gt).cloned())
                .collect(),
            inactive: Self::all_game_types()
                .iter()
                .copied()
                .filter(|&gt| !self.is_active(gt))
                .collect(),
        }
    }

    /// Export configuration to JSON (for persistence).
    pub fn export_json(&self) -> Result<String, RegistryError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Apply a JSON snapshot. Games it does not name keep their current config.
    ///
    /// Nothing is applied unless every entry is valid.
    pub fn load_json(&mut self, json: &str) -> Result<usize, RegistryError> {
        let snapshot: RegistrySnapshot = serde_json::from_str(json)?;
        for config in &snapshot.configs {
            config.validate().map_err(|source| RegistryError::Invalid {
                game: config.game_type(),
                source,
            })?;
        }
        let applied = snapshot.configs.len();
        for config in snapshot.configs {
            self.configs.insert(config.game_type(), config);
        }
        for game_type in Self::all_game_types() {
            self.active
                .insert(*game_type, !snapshot.inactive.contains(game_type));
        }
        Ok(applied)
    }
}
