//! Hi-Lo game implementation.
//!
//! A shuffled deck is dealt one card face up. The player guesses whether the next card is
//! higher or lower; every correct guess compounds the running multiplier by the odds of
//! that guess. Ranks run Ace (1) low to King (13) high.
//!
//! Equal ranks push in the player's favor, except Ace guessed lower and King guessed
//! higher, which lose.

use super::cards::{shuffled_deck, Card};
use super::{CasinoGame, GameError, GameResult, InvalidAction, RandomSource};
use neovegas_types::casino::{GameType, Multiplier, HILO_MAX_RANK, HILO_MIN_RANK};
use serde::{Deserialize, Serialize};

/// Number of other ranks a guess can be measured against.
const OTHER_RANKS: f64 = (HILO_MAX_RANK - HILO_MIN_RANK) as f64;

/// Hi-Lo has no options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiLoConfig {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guess {
    Higher,
    Lower,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HiLoMove {
    Guess(Guess),
    /// Replace the current card without changing the multiplier.
    Skip,
}

/// Payout factor for a correct guess from `rank`, or `None` when no card can beat it.
pub fn odds(guess: Guess, rank: u8) -> Option<Multiplier> {
    let remaining = match guess {
        Guess::Higher => HILO_MAX_RANK.saturating_sub(rank),
        Guess::Lower => rank.saturating_sub(HILO_MIN_RANK),
    };
    if remaining == 0 {
        return None;
    }
    Some(Multiplier::from_f64(OTHER_RANKS / remaining as f64))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessOutcome {
    Correct,
    Push,
    Wrong,
    Skipped,
}

/// Classify a guess from `current` to `next`.
pub fn judge(guess: Guess, current: u8, next: u8) -> GuessOutcome {
    use std::cmp::Ordering;
    match (next.cmp(&current), guess) {
        (Ordering::Greater, Guess::Higher) | (Ordering::Less, Guess::Lower) => {
            GuessOutcome::Correct
        }
        (Ordering::Equal, Guess::Lower) if current == HILO_MIN_RANK => GuessOutcome::Wrong,
        (Ordering::Equal, Guess::Higher) if current == HILO_MAX_RANK => GuessOutcome::Wrong,
        (Ordering::Equal, _) => GuessOutcome::Push,
        _ => GuessOutcome::Wrong,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HiLoRound {
    deck: Vec<Card>,
    position: usize,
    history: Vec<Card>,
    streak: u32,
    total: Multiplier,
}

impl HiLoRound {
    pub fn new(rng: &mut dyn RandomSource) -> Self {
        Self::with_deck(shuffled_deck(rng))
    }

    /// Round over a fixed deck; the first card is dealt face up.
    pub fn with_deck(deck: Vec<Card>) -> Self {
        let history = deck.first().copied().into_iter().collect();
        Self {
            deck,
            position: 1,
            history,
            streak: 0,
            total: Multiplier::ONE,
        }
    }

    pub fn current(&self) -> Option<Card> {
        self.history.last().copied()
    }

    /// Face-up cards in the order they were shown.
    pub fn history(&self) -> &[Card] {
        &self.history
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn total(&self) -> Multiplier {
        self.total
    }

    pub fn cards_remaining(&self) -> usize {
        self.deck.len().saturating_sub(self.position)
    }

    pub fn odds(&self, guess: Guess) -> Option<Multiplier> {
        self.current().and_then(|card| odds(guess, card.rank()))
    }

    fn draw(&mut self) -> Result<Card, GameError> {
        let card = *self
            .deck
            .get(self.position)
            .ok_or(InvalidAction::DeckExhausted)?;
        self.position += 1;
        self.history.push(card);
        Ok(card)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HiLoEvent {
    pub previous: Card,
    pub card: Card,
    pub guess: Option<Guess>,
    pub outcome: GuessOutcome,
    pub streak: u32,
    pub total: Multiplier,
    pub higher_odds: Option<Multiplier>,
    pub lower_odds: Option<Multiplier>,
    pub history: Vec<Card>,
}

impl HiLoEvent {
    fn new(round: &HiLoRound, previous: Card, guess: Option<Guess>, outcome: GuessOutcome) -> Self {
        Self {
            previous,
            card: round.current().unwrap_or(previous),
            guess,
            outcome,
            streak: round.streak,
            total: round.total,
            higher_odds: round.odds(Guess::Higher),
            lower_odds: round.odds(Guess::Lower),
            history: round.history.clone(),
        }
    }
}

pub struct HiLo;

impl CasinoGame for HiLo {
    const GAME_TYPE: GameType = GameType::HiLo;

    type Config = HiLoConfig;
    type Setup = HiLoConfig;
    type Round = HiLoRound;
    type Move = HiLoMove;
    type Event = HiLoEvent;

    fn configure(
        config: HiLoConfig,
        _rng: &mut dyn RandomSource,
    ) -> Result<HiLoConfig, GameError> {
        Ok(config)
    }

    fn init(_setup: &HiLoConfig, rng: &mut dyn RandomSource) -> HiLoRound {
        HiLoRound::new(rng)
    }

    fn process_move(
        _setup: &HiLoConfig,
        round: &mut HiLoRound,
        mv: HiLoMove,
        _rng: &mut dyn RandomSource,
    ) -> Result<GameResult<HiLoEvent>, GameError> {
        let previous = round.current().ok_or(GameError::InvalidState)?;
        let card = round.draw()?;

        let guess = match mv {
            HiLoMove::Skip => {
                let event = HiLoEvent::new(round, previous, None, GuessOutcome::Skipped);
                return Ok(GameResult::Continue(event));
            }
            HiLoMove::Guess(guess) => guess,
        };

        let outcome = judge(guess, previous.rank(), card.rank());
        if outcome == GuessOutcome::Wrong {
            let event = HiLoEvent::new(round, previous, Some(guess), outcome);
            return Ok(GameResult::Loss(event));
        }

        let factor = odds(guess, previous.rank()).ok_or(GameError::InvalidState)?;
        round.total = round.total.compound(factor);
        round.streak += 1;
        let event = HiLoEvent::new(round, previous, Some(guess), outcome);
        Ok(GameResult::Continue(event))
    }

    fn cash_out(
        _setup: &HiLoConfig,
        round: &mut HiLoRound,
    ) -> Result<(Multiplier, HiLoEvent), GameError> {
        if round.streak == 0 {
            return Err(InvalidAction::NothingToCashOut.into());
        }
        let current = round.current().ok_or(GameError::InvalidState)?;
        let event = HiLoEvent {
            previous: current,
            card: current,
            guess: None,
            outcome: GuessOutcome::Correct,
            streak: round.streak,
            total: round.total,
            higher_odds: round.odds(Guess::Higher),
            lower_odds: round.odds(Guess::Lower),
            history: round.history.clone(),
        };
        Ok((round.total, event))
    }
}
