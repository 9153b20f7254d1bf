//! Persisted coin balance.
//!
//! The balance is a single non-negative integer stored as a base-10 string under
//! [`BALANCE_STORAGE_KEY`]. Persistence fails soft: unreadable or unparsable values fall
//! back to [`DEFAULT_BALANCE`] and failed writes keep the in-memory value authoritative.

use crate::state::{Memory, State};
use neovegas_types::casino::{BALANCE_STORAGE_KEY, DEFAULT_BALANCE};
use tracing::warn;

/// Balance service shared by every game table.
pub trait BalanceStore {
    /// Current balance, initializing the default on first use.
    fn get(&mut self) -> u64;

    /// Overwrite the balance.
    fn set(&mut self, amount: u64);

    /// Apply `change`, clamping the result at zero, and return the new balance.
    fn delta(&mut self, change: i64) -> u64 {
        let current = self.get();
        let next = apply_delta(current, change);
        self.set(next);
        next
    }

    /// Restore the default balance and return it.
    fn reset(&mut self) -> u64 {
        self.set(DEFAULT_BALANCE);
        DEFAULT_BALANCE
    }
}

impl<B: BalanceStore + ?Sized> BalanceStore for &mut B {
    fn get(&mut self) -> u64 {
        (**self).get()
    }

    fn set(&mut self, amount: u64) {
        (**self).set(amount)
    }

    fn delta(&mut self, change: i64) -> u64 {
        (**self).delta(change)
    }

    fn reset(&mut self) -> u64 {
        (**self).reset()
    }
}

/// `max(0, current + change)`, saturating at `u64::MAX`.
pub fn apply_delta(current: u64, change: i64) -> u64 {
    let next = current as i128 + change as i128;
    next.clamp(0, u64::MAX as i128) as u64
}

/// [`BalanceStore`] over any [`State`] backend.
#[derive(Debug)]
pub struct Ledger<S: State> {
    state: S,
    last_known: Option<u64>,
}

impl Ledger<Memory> {
    pub fn in_memory() -> Self {
        Self::new(Memory::default())
    }

    /// In-memory ledger starting at `amount` instead of the default.
    pub fn with_balance(amount: u64) -> Self {
        let mut ledger = Self::in_memory();
        ledger.set(amount);
        ledger
    }
}

impl<S: State> Ledger<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            last_known: None,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_inner(self) -> S {
        self.state
    }

    fn persist(&mut self, amount: u64) {
        self.last_known = Some(amount);
        if let Err(err) = self.state.insert(BALANCE_STORAGE_KEY, amount.to_string()) {
            warn!(?err, amount, "failed to persist balance; keeping in-memory value");
        }
    }
}

impl<S: State> BalanceStore for Ledger<S> {
    fn get(&mut self) -> u64 {
        match self.state.get(BALANCE_STORAGE_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(amount) => {
                    self.last_known = Some(amount);
                    amount
                }
                Err(_) => {
                    warn!(raw = %raw, "unparsable persisted balance; restoring default");
                    self.persist(DEFAULT_BALANCE);
                    DEFAULT_BALANCE
                }
            },
            Ok(None) => {
                self.persist(DEFAULT_BALANCE);
                DEFAULT_BALANCE
            }
            Err(err) => {
                let fallback = self.last_known.unwrap_or(DEFAULT_BALANCE);
                warn!(?err, fallback, "failed to read balance; using in-memory value");
                self.last_known = Some(fallback);
                fallback
            }
        }
    }

    fn set(&mut self, amount: u64) {
        self.persist(amount);
    }
}
