//! Round state machine shared by every game.
//!
//! ```text
//! Idle -> Configuring -> Active -> Settled -> (Configuring | Active)
//! ```
//!
//! The wager is debited when a round starts and the payout is credited inside the
//! transition to `Settled`; once settled, the round handle can no longer be used, so a
//! round pays out at most once.

use super::{CasinoGame, GameError, GameResult, GameRng, InvalidAction, RandomSource, SingleShot};
use crate::balance::BalanceStore;
use neovegas_types::casino::{GameType, Multiplier};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Identifies one round on a table. Ids only increase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoundHandle(u64);

impl RoundHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RoundHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Won,
    Lost,
}

/// Final accounting of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub round: RoundHandle,
    pub game: GameType,
    pub wager: u64,
    pub multiplier: Multiplier,
    pub payout: u64,
    pub outcome: Outcome,
    /// Balance after the payout was credited.
    pub balance: u64,
}

impl Settlement {
    /// Payout minus wager.
    pub fn net(&self) -> i128 {
        self.payout as i128 - self.wager as i128
    }
}

/// Result of a move against an active round.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundUpdate<E> {
    Continue(E),
    Settled { event: E, settlement: Settlement },
}

impl<E> RoundUpdate<E> {
    pub fn event(&self) -> &E {
        match self {
            Self::Continue(event) | Self::Settled { event, .. } => event,
        }
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        match self {
            Self::Continue(_) => None,
            Self::Settled { settlement, .. } => Some(settlement),
        }
    }
}

pub struct ActiveRound<G: CasinoGame> {
    pub id: RoundHandle,
    pub wager: u64,
    pub state: G::Round,
}

pub enum Phase<G: CasinoGame> {
    Idle,
    Configuring(G::Setup),
    Active {
        setup: G::Setup,
        round: ActiveRound<G>,
    },
    Settled {
        setup: G::Setup,
        round: ActiveRound<G>,
        event: Option<G::Event>,
        settlement: Settlement,
    },
}

impl<G: CasinoGame> Phase<G> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Configuring(_) => "configuring",
            Self::Active { .. } => "active",
            Self::Settled { .. } => "settled",
        }
    }
}

/// One game table: current configuration, the round in play, and the random source.
pub struct Table<G: CasinoGame, R: RandomSource = GameRng> {
    phase: Phase<G>,
    rng: R,
    next_round: u64,
}

impl<G: CasinoGame> Table<G, GameRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(GameRng::from_seed(seed))
    }
}

impl<G: CasinoGame, R: RandomSource> Table<G, R> {
    pub fn new(rng: R) -> Self {
        Self {
            phase: Phase::Idle,
            rng,
            next_round: 1,
        }
    }

    pub fn phase(&self) -> &Phase<G> {
        &self.phase
    }

    pub fn setup(&self) -> Option<&G::Setup> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Configuring(setup)
            | Phase::Active { setup, .. }
            | Phase::Settled { setup, .. } => Some(setup),
        }
    }

    /// Round in play or the one that just settled.
    pub fn round(&self) -> Option<&ActiveRound<G>> {
        match &self.phase {
            Phase::Active { round, .. } | Phase::Settled { round, .. } => Some(round),
            _ => None,
        }
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        match &self.phase {
            Phase::Settled { settlement, .. } => Some(settlement),
            _ => None,
        }
    }

    /// Event that ended the last round (or its cash-out).
    pub fn last_event(&self) -> Option<&G::Event> {
        match &self.phase {
            Phase::Settled { event, .. } => event.as_ref(),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active { .. })
    }

    fn reject<T>(&self, action: &'static str, err: GameError) -> Result<T, GameError> {
        warn!(
            game = %G::GAME_TYPE,
            action,
            phase = self.phase.name(),
            code = err.code(),
            %err,
            "casino action rejected"
        );
        Err(err)
    }

    /// Choose (or change) the game parameters. Not allowed mid-round.
    pub fn configure(&mut self, config: G::Config) -> Result<&G::Setup, GameError> {
        if self.is_active() {
            return self.reject("configure", InvalidAction::RoundActive.into());
        }
        let setup = match G::configure(config, &mut self.rng) {
            Ok(setup) => setup,
            Err(err) => return self.reject("configure", err),
        };
        debug!(game = %G::GAME_TYPE, ?setup, "table configured");
        self.phase = Phase::Configuring(setup);
        match &self.phase {
            Phase::Configuring(setup) => Ok(setup),
            _ => Err(GameError::InvalidState),
        }
    }

    /// Debit `wager` and start a round with the current configuration.
    pub fn start_round<B: BalanceStore + ?Sized>(
        &mut self,
        bank: &mut B,
        wager: u64,
    ) -> Result<RoundHandle, GameError> {
        match &self.phase {
            Phase::Idle => return self.reject("start", InvalidAction::NotConfigured.into()),
            Phase::Active { .. } => return self.reject("start", InvalidAction::RoundActive.into()),
            Phase::Configuring(_) | Phase::Settled { .. } => {}
        }
        if wager == 0 {
            return self.reject("start", GameError::InvalidWager);
        }
        let balance = bank.get();
        if wager > balance {
            return self.reject("start", GameError::InsufficientFunds { wager, balance });
        }
        let Ok(debit) = i64::try_from(wager) else {
            return self.reject("start", GameError::InvalidWager);
        };

        let setup = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Configuring(setup) | Phase::Settled { setup, .. } => setup,
            other => {
                self.phase = other;
                return Err(GameError::InvalidState);
            }
        };

        let balance = bank.delta(-debit);
        let id = RoundHandle(self.next_round);
        self.next_round += 1;
        let state = G::init(&setup, &mut self.rng);
        info!(
            game = %G::GAME_TYPE,
            round = id.0,
            wager,
            balance,
            "casino round started"
        );
        self.phase = Phase::Active {
            setup,
            round: ActiveRound { id, wager, state },
        };
        Ok(id)
    }

    fn check_handle(&self, action: &'static str, handle: RoundHandle) -> Result<(), GameError> {
        match &self.phase {
            Phase::Active { round, .. } if round.id == handle => Ok(()),
            Phase::Active { .. } => self.reject(action, InvalidAction::StaleRound.into()),
            _ => self.reject(action, InvalidAction::NoActiveRound.into()),
        }
    }

    /// Apply a move to the active round.
    pub fn act<B: BalanceStore + ?Sized>(
        &mut self,
        bank: &mut B,
        handle: RoundHandle,
        mv: G::Move,
    ) -> Result<RoundUpdate<G::Event>, GameError> {
        self.check_handle("move", handle)?;
        let Phase::Active { setup, round } = &mut self.phase else {
            return Err(GameError::InvalidState);
        };
        let result = G::process_move(setup, &mut round.state, mv, &mut self.rng);

        match result {
            Err(err) => self.reject("move", err),
            Ok(GameResult::Continue(event)) => {
                debug!(game = %G::GAME_TYPE, round = handle.0, ?mv, "casino move processed");
                Ok(RoundUpdate::Continue(event))
            }
            Ok(GameResult::Win(multiplier, event)) => {
                let settlement = self.settle(bank, multiplier, Outcome::Won, event.clone())?;
                Ok(RoundUpdate::Settled { event, settlement })
            }
            Ok(GameResult::Loss(event)) => {
                let settlement = self.settle(bank, Multiplier::ZERO, Outcome::Lost, event.clone())?;
                Ok(RoundUpdate::Settled { event, settlement })
            }
        }
    }

    /// Settle the active round at its accrued multiplier.
    pub fn cash_out<B: BalanceStore + ?Sized>(
        &mut self,
        bank: &mut B,
        handle: RoundHandle,
    ) -> Result<Settlement, GameError> {
        self.check_handle("cash_out", handle)?;
        let Phase::Active { setup, round } = &mut self.phase else {
            return Err(GameError::InvalidState);
        };
        match G::cash_out(setup, &mut round.state) {
            Ok((multiplier, event)) => self.settle(bank, multiplier, Outcome::Won, event),
            Err(err) => self.reject("cash_out", err),
        }
    }

    /// Drop the active round without a payout.
    pub fn abandon(&mut self) -> Result<RoundHandle, GameError> {
        let (setup, round) = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Active { setup, round } => (setup, round),
            other => {
                self.phase = other;
                return self.reject("abandon", InvalidAction::NoActiveRound.into());
            }
        };
        info!(
            game = %G::GAME_TYPE,
            round = round.id.0,
            wager = round.wager,
            "casino round abandoned"
        );
        self.phase = Phase::Configuring(setup);
        Ok(round.id)
    }

    fn settle<B: BalanceStore + ?Sized>(
        &mut self,
        bank: &mut B,
        multiplier: Multiplier,
        outcome: Outcome,
        event: G::Event,
    ) -> Result<Settlement, GameError> {
        let (setup, round) = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Active { setup, round } => (setup, round),
            other => {
                self.phase = other;
                return Err(GameError::InvalidState);
            }
        };

        let payout = match outcome {
            Outcome::Won => multiplier.payout(round.wager),
            Outcome::Lost => 0,
        };
        let balance = if payout > 0 {
            bank.delta(i64::try_from(payout).unwrap_or(i64::MAX))
        } else {
            bank.get()
        };
        let settlement = Settlement {
            round: round.id,
            game: G::GAME_TYPE,
            wager: round.wager,
            multiplier,
            payout,
            outcome,
            balance,
        };
        info!(
            game = %G::GAME_TYPE,
            round = round.id.0,
            wager = round.wager,
            multiplier = %multiplier,
            payout,
            balance,
            outcome = ?outcome,
            "casino round settled"
        );
        self.phase = Phase::Settled {
            setup,
            round,
            event: Some(event),
            settlement,
        };
        Ok(settlement)
    }
}

impl<G: SingleShot, R: RandomSource> Table<G, R> {
    /// Start a round and resolve it in one step.
    pub fn play<B: BalanceStore + ?Sized>(
        &mut self,
        bank: &mut B,
        wager: u64,
    ) -> Result<(G::Event, Settlement), GameError> {
        let handle = self.start_round(bank, wager)?;
        match self.act(bank, handle, G::PLAY)? {
            RoundUpdate::Settled { event, settlement } => Ok((event, settlement)),
            RoundUpdate::Continue(_) => Err(GameError::InvalidState),
        }
    }
}
