//! Casino game execution module.
//!
//! This module contains the game logic for all casino games:
//! - Dice
//! - Mines
//! - Dragon Tower
//! - Wheel
//! - Hi-Lo
//!
//! Each game implements [`CasinoGame`] and is driven through a [`table::Table`], which owns
//! the round state machine and all balance mutations.

pub mod cards;
pub mod dice;
pub mod dragon_tower;
pub mod hilo;
#[cfg(test)]
mod integration_tests;
pub mod mines;
pub mod registry;
pub mod table;
pub mod wheel;

use neovegas_types::casino::{
    GameType, Multiplier, ERROR_DECK_EXHAUSTED, ERROR_INSUFFICIENT_FUNDS, ERROR_INVALID_CONFIG,
    ERROR_INVALID_MOVE, ERROR_INVALID_WAGER, ERROR_NOTHING_TO_CASH_OUT, ERROR_NOT_CONFIGURED,
    ERROR_NO_ACTIVE_ROUND, ERROR_ROUND_ACTIVE, ERROR_STALE_ROUND,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::fmt;
use thiserror::Error;

/// Uniform random capability injected into every game.
pub trait RandomSource {
    /// Next value in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, len)`; returns 0 when `len == 0`.
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len - 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Shuffle a slice in place using Fisher-Yates.
pub fn shuffle<T>(rng: &mut dyn RandomSource, slice: &mut [T]) {
    for i in (1..slice.len()).rev() {
        let j = rng.next_index(i + 1);
        slice.swap(i, j);
    }
}

/// ChaCha20-backed random source.
///
/// Seeded construction is deterministic so simulations and replays can be reproduced.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha20Rng,
}

impl GameRng {
    /// Create a new RNG from a seed and a round number.
    pub fn new(seed: u64, round: u64) -> Self {
        let mut key = [0u8; 32];
        key[..8].copy_from_slice(&seed.to_be_bytes());
        key[8..16].copy_from_slice(&round.to_be_bytes());
        Self {
            inner: ChaCha20Rng::from_seed(key),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha20Rng::from_entropy(),
        }
    }
}

impl RandomSource for GameRng {
    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

/// Result of processing a game move.
#[derive(Clone, Debug, PartialEq)]
pub enum GameResult<E> {
    /// Round is still in progress, state updated.
    Continue(E),
    /// Round completed with a win at the given multiplier.
    Win(Multiplier, E),
    /// Round completed with a loss; the wager is forfeited.
    Loss(E),
}

impl<E> GameResult<E> {
    pub fn event(&self) -> &E {
        match self {
            Self::Continue(event) | Self::Win(_, event) | Self::Loss(event) => event,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Continue(_))
    }
}

/// Why an action was rejected against a table or round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidAction {
    /// No configuration has been chosen yet.
    NotConfigured,
    /// The action is not allowed while a round is in progress.
    RoundActive,
    /// There is no round in progress.
    NoActiveRound,
    /// The handle does not name the current round.
    StaleRound,
    /// Mines: the cell is already open.
    AlreadyRevealed,
    /// Mines: the cell index is outside the grid.
    CellOutOfRange,
    /// Dragon Tower: only the current row can be picked.
    WrongRow,
    /// Dragon Tower: the column index is outside the row.
    ColumnOutOfRange,
    /// Cash-out with no accumulated progress.
    NothingToCashOut,
    /// Hi-Lo: no cards left to draw.
    DeckExhausted,
    /// The move is malformed for this game (e.g. an auto target out of range).
    WrongChoice,
}

impl fmt::Display for InvalidAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NotConfigured => "game not configured",
            Self::RoundActive => "round in progress",
            Self::NoActiveRound => "no active round",
            Self::StaleRound => "round handle is stale",
            Self::AlreadyRevealed => "cell already revealed",
            Self::CellOutOfRange => "cell out of range",
            Self::WrongRow => "only the current row can be played",
            Self::ColumnOutOfRange => "column out of range",
            Self::NothingToCashOut => "nothing to cash out",
            Self::DeckExhausted => "deck exhausted",
            Self::WrongChoice => "choice not valid for this game",
        };
        f.write_str(reason)
    }
}

/// Error during game execution.
///
/// Every variant is recoverable: a rejected call leaves the round and balance unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("wager must be greater than zero")]
    InvalidWager,
    #[error("insufficient funds (wager={wager}, balance={balance})")]
    InsufficientFunds { wager: u64, balance: u64 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid action: {0}")]
    InvalidAction(InvalidAction),
    #[error("invalid game state")]
    InvalidState,
}

impl GameError {
    /// Reason code surfaced to the presentation layer.
    pub fn code(&self) -> u8 {
        match self {
            Self::InvalidWager => ERROR_INVALID_WAGER,
            Self::InsufficientFunds { .. } => ERROR_INSUFFICIENT_FUNDS,
            Self::InvalidConfig(_) => ERROR_INVALID_CONFIG,
            Self::InvalidAction(action) => match action {
                InvalidAction::NotConfigured => ERROR_NOT_CONFIGURED,
                InvalidAction::RoundActive => ERROR_ROUND_ACTIVE,
                InvalidAction::NoActiveRound => ERROR_NO_ACTIVE_ROUND,
                InvalidAction::StaleRound => ERROR_STALE_ROUND,
                InvalidAction::NothingToCashOut => ERROR_NOTHING_TO_CASH_OUT,
                InvalidAction::DeckExhausted => ERROR_DECK_EXHAUSTED,
                InvalidAction::AlreadyRevealed
                | InvalidAction::CellOutOfRange
                | InvalidAction::WrongRow
                | InvalidAction::ColumnOutOfRange
                | InvalidAction::WrongChoice => ERROR_INVALID_MOVE,
            },
            Self::InvalidState => ERROR_INVALID_MOVE,
        }
    }
}

impl From<InvalidAction> for GameError {
    fn from(action: InvalidAction) -> Self {
        Self::InvalidAction(action)
    }
}

/// Trait for casino game implementations.
pub trait CasinoGame {
    const GAME_TYPE: GameType;

    /// Player-chosen parameters.
    type Config: Clone + fmt::Debug;
    /// Validated configuration plus anything derived before a round (odds, wheel layout).
    type Setup: Clone + fmt::Debug;
    /// Per-round state.
    type Round: Clone + fmt::Debug;
    /// Player move within a round.
    type Move: Copy + fmt::Debug;
    /// Data describing what a move (or cash-out) revealed.
    type Event: Clone + fmt::Debug;

    /// Validate a configuration and prepare the setup shown before the round starts.
    fn configure(config: Self::Config, rng: &mut dyn RandomSource)
        -> Result<Self::Setup, GameError>;

    /// Build a fresh round. The wager has already been debited.
    fn init(setup: &Self::Setup, rng: &mut dyn RandomSource) -> Self::Round;

    /// Process a player move.
    fn process_move(
        setup: &Self::Setup,
        round: &mut Self::Round,
        mv: Self::Move,
        rng: &mut dyn RandomSource,
    ) -> Result<GameResult<Self::Event>, GameError>;

    /// Settle early at the accrued multiplier.
    fn cash_out(
        setup: &Self::Setup,
        round: &mut Self::Round,
    ) -> Result<(Multiplier, Self::Event), GameError>;
}

/// Games resolved by a single move right after the wager (Dice, Wheel).
pub trait SingleShot: CasinoGame {
    const PLAY: Self::Move;
}
