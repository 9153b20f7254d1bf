//! Mines game implementation.
//!
//! A 5x5 grid hides `mines` mines. Each safe reveal raises the multiplier by the inverse
//! of the odds of that reveal having been safe; hitting a mine forfeits the wager.
//!
//! The multiplier after `k` safe reveals is:
//! ```text
//! prod_{i<k} (25 - i) / (safe - i)
//! ```
//! computed exactly from the reveal count and rounded to hundredths once.

use super::{CasinoGame, GameError, GameResult, InvalidAction, RandomSource};
use neovegas_types::casino::{
    GameType, Multiplier, MINES_GRID_SIZE, MINES_MAX_MINES, MINES_MIN_MINES, MULTIPLIER_SCALE,
};
use serde::{Deserialize, Serialize};

const GRID: usize = MINES_GRID_SIZE as usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinesConfig {
    pub mines: u8,
}

impl Default for MinesConfig {
    fn default() -> Self {
        Self { mines: 5 }
    }
}

impl MinesConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if !(MINES_MIN_MINES..=MINES_MAX_MINES).contains(&self.mines) {
            return Err(GameError::InvalidConfig(format!(
                "mine count must be between {MINES_MIN_MINES} and {MINES_MAX_MINES}, got {}",
                self.mines
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinesSetup {
    pub mines: u8,
}

impl MinesSetup {
    pub fn safe_cells(&self) -> u8 {
        MINES_GRID_SIZE - self.mines
    }
}

/// Multiplier after `revealed` safe cells with `mines` mines on the board.
pub fn multiplier_for(mines: u8, revealed: u8) -> Multiplier {
    let safe = MINES_GRID_SIZE.saturating_sub(mines) as u128;
    let revealed = (revealed as u128).min(safe);
    let mut numerator: u128 = 1;
    let mut denominator: u128 = 1;
    for i in 0..revealed {
        numerator *= GRID as u128 - i;
        denominator *= safe - i;
    }
    let scale = MULTIPLIER_SCALE as u128;
    let hundredths = (numerator * scale + denominator / 2) / denominator;
    Multiplier::from_hundredths(u64::try_from(hundredths).unwrap_or(u64::MAX))
}

/// Order in which auto-play opens cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoOrder {
    #[default]
    Random,
    Sequential,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinesMove {
    Reveal(u8),
    /// Open cells until `target` safe cells are showing, then cash out.
    Auto { target: u8, order: AutoOrder },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinesRound {
    mines: [bool; GRID],
    revealed: [bool; GRID],
    mine_count: u8,
    safe_revealed: u8,
}

impl MinesRound {
    /// Place `mine_count` mines by sampling cells until enough distinct ones are drawn.
    pub fn new(mine_count: u8, rng: &mut dyn RandomSource) -> Self {
        let mut mines = [false; GRID];
        let mut placed = 0;
        while placed < mine_count {
            let cell = rng.next_index(GRID);
            if !mines[cell] {
                mines[cell] = true;
                placed += 1;
            }
        }
        Self::with_mines(mines)
    }

    /// Round over a fixed layout.
    pub fn with_mines(mines: [bool; GRID]) -> Self {
        let mine_count = mines.iter().filter(|&&m| m).count() as u8;
        Self {
            mines,
            revealed: [false; GRID],
            mine_count,
            safe_revealed: 0,
        }
    }

    pub fn mine_count(&self) -> u8 {
        self.mine_count
    }

    pub fn safe_revealed(&self) -> u8 {
        self.safe_revealed
    }

    pub fn is_revealed(&self, cell: u8) -> bool {
        self.revealed.get(cell as usize).copied().unwrap_or(false)
    }

    pub fn is_mine(&self, cell: u8) -> bool {
        self.mines.get(cell as usize).copied().unwrap_or(false)
    }

    pub fn mine_positions(&self) -> Vec<u8> {
        (0..MINES_GRID_SIZE).filter(|&c| self.is_mine(c)).collect()
    }

    pub fn is_cleared(&self) -> bool {
        self.safe_revealed == MINES_GRID_SIZE - self.mine_count
    }

    pub fn multiplier(&self) -> Multiplier {
        multiplier_for(self.mine_count, self.safe_revealed)
    }

    /// Multiplier shown for the next safe reveal.
    pub fn next_multiplier(&self) -> Multiplier {
        multiplier_for(self.mine_count, self.safe_revealed.saturating_add(1))
    }

    /// Chance that the next reveal is safe.
    pub fn safe_probability(&self) -> f64 {
        let unrevealed = GRID as f64 - self.safe_revealed as f64;
        let safe_left = (MINES_GRID_SIZE - self.mine_count - self.safe_revealed) as f64;
        if unrevealed <= 0.0 {
            return 0.0;
        }
        safe_left / unrevealed
    }

    fn unrevealed(&self) -> Vec<u8> {
        (0..MINES_GRID_SIZE)
            .filter(|&c| !self.revealed[c as usize])
            .collect()
    }

    fn reveal_all_mines(&mut self) {
        for (revealed, mine) in self.revealed.iter_mut().zip(self.mines.iter()) {
            if *mine {
                *revealed = true;
            }
        }
    }

    /// Open one cell. Returns `true` when it was safe.
    fn open(&mut self, cell: u8) -> Result<bool, GameError> {
        let idx = cell as usize;
        if idx >= GRID {
            return Err(InvalidAction::CellOutOfRange.into());
        }
        if self.revealed[idx] {
            return Err(InvalidAction::AlreadyRevealed.into());
        }
        self.revealed[idx] = true;
        if self.mines[idx] {
            self.reveal_all_mines();
            return Ok(false);
        }
        self.safe_revealed += 1;
        Ok(true)
    }
}

/// What a move opened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MinesEvent {
    /// Cells opened by this move, in order.
    pub opened: Vec<u8>,
    /// Mine that ended the round, if any.
    pub mine_hit: Option<u8>,
    pub safe_revealed: u8,
    pub multiplier: Multiplier,
    pub next_multiplier: Multiplier,
    /// Mine layout, populated once the round ends.
    pub mines: Vec<u8>,
}

impl MinesEvent {
    fn new(round: &MinesRound, opened: Vec<u8>, mine_hit: Option<u8>, terminal: bool) -> Self {
        Self {
            opened,
            mine_hit,
            safe_revealed: round.safe_revealed,
            multiplier: round.multiplier(),
            next_multiplier: round.next_multiplier(),
            mines: if terminal {
                round.mine_positions()
            } else {
                Vec::new()
            },
        }
    }
}

pub struct Mines;

impl Mines {
    fn auto_play(
        round: &mut MinesRound,
        target: u8,
        order: AutoOrder,
        rng: &mut dyn RandomSource,
    ) -> Result<GameResult<MinesEvent>, GameError> {
        let safe_cells = MINES_GRID_SIZE - round.mine_count;
        if target == 0 || target > safe_cells || target <= round.safe_revealed {
            return Err(InvalidAction::WrongChoice.into());
        }

        let mut opened = Vec::new();
        while round.safe_revealed < target {
            let candidates = round.unrevealed();
            let cell = match order {
                AutoOrder::Sequential => candidates[0],
                AutoOrder::Random => candidates[rng.next_index(candidates.len())],
            };
            opened.push(cell);
            if !round.open(cell)? {
                let event = MinesEvent::new(round, opened, Some(cell), true);
                return Ok(GameResult::Loss(event));
            }
        }
        round.reveal_all_mines();
        let event = MinesEvent::new(round, opened, None, true);
        Ok(GameResult::Win(round.multiplier(), event))
    }
}

impl CasinoGame for Mines {
    const GAME_TYPE: GameType = GameType::Mines;

    type Config = MinesConfig;
    type Setup = MinesSetup;
    type Round = MinesRound;
    type Move = MinesMove;
    type Event = MinesEvent;

    fn configure(
        config: MinesConfig,
        _rng: &mut dyn RandomSource,
    ) -> Result<MinesSetup, GameError> {
        config.validate()?;
        Ok(MinesSetup {
            mines: config.mines,
        })
    }

    fn init(setup: &MinesSetup, rng: &mut dyn RandomSource) -> MinesRound {
        MinesRound::new(setup.mines, rng)
    }

    fn process_move(
        _setup: &MinesSetup,
        round: &mut MinesRound,
        mv: MinesMove,
        rng: &mut dyn RandomSource,
    ) -> Result<GameResult<MinesEvent>, GameError> {
        match mv {
            MinesMove::Reveal(cell) => {
                if !round.open(cell)? {
                    let event = MinesEvent::new(round, vec![cell], Some(cell), true);
                    return Ok(GameResult::Loss(event));
                }
                if round.is_cleared() {
                    round.reveal_all_mines();
                    let event = MinesEvent::new(round, vec![cell], None, true);
                    return Ok(GameResult::Win(round.multiplier(), event));
                }
                let event = MinesEvent::new(round, vec![cell], None, false);
                Ok(GameResult::Continue(event))
            }
            MinesMove::Auto { target, order } => Self::auto_play(round, target, order, rng),
        }
    }

    fn cash_out(
        _setup: &MinesSetup,
        round: &mut MinesRound,
    ) -> Result<(Multiplier, MinesEvent), GameError> {
        if round.safe_revealed == 0 {
            return Err(InvalidAction::NothingToCashOut.into());
        }
        round.reveal_all_mines();
        let event = MinesEvent::new(round, Vec::new(), None, true);
        Ok((round.multiplier(), event))
    }
}
