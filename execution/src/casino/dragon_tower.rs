//! Dragon Tower game implementation.
//!
//! Nine rows, each hiding one trap column. The player climbs one row per pick; every
//! cleared row raises the multiplier to `base^(row + 1)`.

use super::{CasinoGame, GameError, GameResult, InvalidAction, RandomSource};
use neovegas_types::casino::{Difficulty, GameType, Multiplier, TOWER_ROWS};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerConfig {
    pub difficulty: Difficulty,
}

/// Columns per row and per-row growth factor for a difficulty.
pub fn difficulty_params(difficulty: Difficulty) -> (u8, f64) {
    match difficulty {
        Difficulty::Easy => (4, 1.2),
        Difficulty::Medium => (3, 1.5),
        Difficulty::Hard => (2, 2.0),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TowerSetup {
    pub difficulty: Difficulty,
    pub columns: u8,
    /// Multiplier earned by clearing each row, bottom first.
    pub multipliers: Vec<Multiplier>,
}

impl TowerSetup {
    pub fn new(difficulty: Difficulty) -> Self {
        let (columns, base) = difficulty_params(difficulty);
        let multipliers = (0..TOWER_ROWS as i32)
            .map(|row| Multiplier::from_f64(base.powi(row + 1)))
            .collect();
        Self {
            difficulty,
            columns,
            multipliers,
        }
    }

    pub fn multiplier(&self, row: u8) -> Multiplier {
        self.multipliers
            .get(row as usize)
            .copied()
            .unwrap_or(Multiplier::ZERO)
    }

    pub fn multipliers(&self) -> &[Multiplier] {
        &self.multipliers
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TowerMove {
    Pick { row: u8, column: u8 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TowerRound {
    traps: Vec<u8>,
    level: u8,
}

impl TowerRound {
    pub fn new(columns: u8, rng: &mut dyn RandomSource) -> Self {
        let traps = (0..TOWER_ROWS)
            .map(|_| rng.next_index(columns as usize) as u8)
            .collect();
        Self { traps, level: 0 }
    }

    /// Round over fixed trap columns.
    pub fn with_traps(traps: Vec<u8>) -> Self {
        Self { traps, level: 0 }
    }

    /// Rows cleared so far; also the row currently in play.
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn trap(&self, row: u8) -> Option<u8> {
        self.traps.get(row as usize).copied()
    }

    /// Multiplier banked by the rows cleared so far.
    pub fn current_multiplier(&self, setup: &TowerSetup) -> Multiplier {
        match self.level {
            0 => Multiplier::ZERO,
            level => setup.multiplier(level - 1),
        }
    }

    /// What a cash-out would pay right now.
    pub fn current_payout(&self, setup: &TowerSetup, wager: u64) -> u64 {
        self.current_multiplier(setup).payout(wager)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TowerEvent {
    pub row: u8,
    pub column: u8,
    /// Trap column of the row, revealed only when that row ended the round.
    pub trap: Option<u8>,
    pub level: u8,
    pub multiplier: Multiplier,
}

pub struct DragonTower;

impl CasinoGame for DragonTower {
    const GAME_TYPE: GameType = GameType::DragonTower;

    type Config = TowerConfig;
    type Setup = TowerSetup;
    type Round = TowerRound;
    type Move = TowerMove;
    type Event = TowerEvent;

    fn configure(
        config: TowerConfig,
        _rng: &mut dyn RandomSource,
    ) -> Result<TowerSetup, GameError> {
        Ok(TowerSetup::new(config.difficulty))
    }

    fn init(setup: &TowerSetup, rng: &mut dyn RandomSource) -> TowerRound {
        TowerRound::new(setup.columns, rng)
    }

    fn process_move(
        setup: &TowerSetup,
        round: &mut TowerRound,
        mv: TowerMove,
        _rng: &mut dyn RandomSource,
    ) -> Result<GameResult<TowerEvent>, GameError> {
        let TowerMove::Pick { row, column } = mv;
        if row != round.level {
            return Err(InvalidAction::WrongRow.into());
        }
        if column >= setup.columns {
            return Err(InvalidAction::ColumnOutOfRange.into());
        }
        let trap = round.trap(row).ok_or(GameError::InvalidState)?;

        if column == trap {
            return Ok(GameResult::Loss(TowerEvent {
                row,
                column,
                trap: Some(trap),
                level: round.level,
                multiplier: Multiplier::ZERO,
            }));
        }

        round.level += 1;
        let multiplier = round.current_multiplier(setup);
        let event = TowerEvent {
            row,
            column,
            trap: None,
            level: round.level,
            multiplier,
        };
        if round.level == TOWER_ROWS {
            return Ok(GameResult::Win(multiplier, event));
        }
        Ok(GameResult::Continue(event))
    }

    fn cash_out(
        setup: &TowerSetup,
        round: &mut TowerRound,
    ) -> Result<(Multiplier, TowerEvent), GameError> {
        if round.level == 0 {
            return Err(InvalidAction::NothingToCashOut.into());
        }
        let multiplier = round.current_multiplier(setup);
        let row = round.level - 1;
        let event = TowerEvent {
            row,
            column: 0,
            trap: round.trap(row),
            level: round.level,
            multiplier,
        };
        Ok((multiplier, event))
    }
}
