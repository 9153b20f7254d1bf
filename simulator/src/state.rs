use neovegas_execution::casino::mines::AutoOrder;
use neovegas_execution::casino::registry::GameConfig;
use neovegas_types::casino::{GameType, DEFAULT_BALANCE, TOWER_ROWS};
use serde::Serialize;

pub const DEFAULT_ROUNDS: u64 = 1_000;
pub const DEFAULT_WAGER: u64 = 10;
pub const DEFAULT_MINES_REVEALS: u8 = 3;
pub const DEFAULT_TOWER_CLIMB: u8 = 3;
pub const DEFAULT_HILO_GUESSES: u8 = 3;

/// Most guesses a Hi-Lo round can hold (one card is dealt face up).
pub const MAX_HILO_GUESSES: u8 = 51;

/// How the automated player plays multi-step games.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Strategy {
    /// Mines: safe cells to open before cashing out.
    pub mines_reveals: u8,
    pub mines_order: AutoOrder,
    /// Dragon Tower: rows to clear before cashing out.
    pub tower_climb: u8,
    /// Hi-Lo: guesses to survive before cashing out.
    pub hilo_guesses: u8,
}

impl Default for Strategy {
    fn default() -> Self {
        Self {
            mines_reveals: DEFAULT_MINES_REVEALS,
            mines_order: AutoOrder::Random,
            tower_climb: DEFAULT_TOWER_CLIMB,
            hilo_guesses: DEFAULT_HILO_GUESSES,
        }
    }
}

impl Strategy {
    pub fn tower_climb(&self) -> u8 {
        self.tower_climb.clamp(1, TOWER_ROWS)
    }

    pub fn hilo_guesses(&self) -> u8 {
        self.hilo_guesses.clamp(1, MAX_HILO_GUESSES)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulatorConfig {
    pub game: GameConfig,
    pub rounds: u64,
    pub wager: u64,
    pub seed: u64,
    /// Starting in-memory balance; `None` plays against the persisted balance.
    pub bankroll: Option<u64>,
    pub strategy: Strategy,
}

impl SimulatorConfig {
    pub fn new(game: GameConfig) -> Self {
        Self {
            game,
            rounds: DEFAULT_ROUNDS,
            wager: DEFAULT_WAGER,
            seed: 0,
            bankroll: None,
            strategy: Strategy::default(),
        }
    }

    pub fn game_type(&self) -> GameType {
        self.game.game_type()
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        let mut config = Self::new(GameConfig::default_for(GameType::Dice));
        config.bankroll = Some(DEFAULT_BALANCE);
        config
    }
}
