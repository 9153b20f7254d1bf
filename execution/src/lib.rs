//! Neovegas execution layer.
//!
//! This crate contains the casino round engines, the [`casino::table::Table`] state
//! machine that drives them, and the persisted coin balance they settle against.
//!
//! ## Accounting rules
//! - The wager is debited once, when a round starts.
//! - A round credits its payout at most once, inside the transition to settled.
//! - The balance never goes below zero.
//!
//! ## Minimal round (example)
//! ```rust
//! use neovegas_execution::balance::{BalanceStore, Ledger};
//! use neovegas_execution::casino::dice::{Dice, DiceConfig};
//! use neovegas_execution::casino::table::Table;
//!
//! let mut bank = Ledger::in_memory();
//! let mut table: Table<Dice> = Table::seeded(7);
//! table.configure(DiceConfig::default()).unwrap();
//! let (_roll, settlement) = table.play(&mut bank, 100).unwrap();
//! assert_eq!(bank.get(), settlement.balance);
//! ```

pub mod balance;
pub mod casino;
pub mod state;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use balance::{BalanceStore, Ledger};
pub use casino::table::{Outcome, RoundHandle, RoundUpdate, Settlement, Table};
pub use casino::{CasinoGame, GameError, GameResult, GameRng, InvalidAction, RandomSource};
pub use state::{FileState, Memory, State, StorageError};
