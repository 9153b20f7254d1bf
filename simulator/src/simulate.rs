//! Automated play of many rounds of one game.

use crate::state::{SimulatorConfig, Strategy};
use neovegas_execution::casino::dice::Dice;
use neovegas_execution::casino::dragon_tower::{DragonTower, TowerMove};
use neovegas_execution::casino::hilo::{Guess, HiLo, HiLoMove};
use neovegas_execution::casino::mines::{Mines, MinesMove};
use neovegas_execution::casino::registry::GameConfig;
use neovegas_execution::casino::wheel::Wheel;
use neovegas_execution::{
    BalanceStore, CasinoGame, GameError, GameRng, InvalidAction, Outcome, RandomSource,
    RoundUpdate, Settlement, Table,
};
use neovegas_types::casino::{GameType, Multiplier, MINES_GRID_SIZE};
use serde::Serialize;
use tracing::info;

/// Stream id for the player's own choices, kept apart from the table's outcomes.
const PLAYER_STREAM: u64 = 1;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub game: GameType,
    pub rounds: u64,
    pub wins: u64,
    pub losses: u64,
    pub wagered: u64,
    pub returned: u64,
    /// `returned / wagered`.
    pub rtp: f64,
    pub starting_balance: u64,
    pub final_balance: u64,
    pub best_multiplier: Multiplier,
    /// The balance could no longer cover the wager before all rounds were played.
    pub bankrupt: bool,
}

impl Summary {
    fn new(game: GameType, starting_balance: u64) -> Self {
        Self {
            game,
            rounds: 0,
            wins: 0,
            losses: 0,
            wagered: 0,
            returned: 0,
            rtp: 0.0,
            starting_balance,
            final_balance: starting_balance,
            best_multiplier: Multiplier::ZERO,
            bankrupt: false,
        }
    }

    fn record(&mut self, settlement: &Settlement) {
        self.rounds += 1;
        self.wagered += settlement.wager;
        self.returned += settlement.payout;
        match settlement.outcome {
            Outcome::Won => self.wins += 1,
            Outcome::Lost => self.losses += 1,
        }
        self.best_multiplier = self.best_multiplier.max(settlement.multiplier);
        self.final_balance = settlement.balance;
    }

    fn finish(&mut self, balance: u64) {
        self.final_balance = balance;
        self.rtp = if self.wagered == 0 {
            0.0
        } else {
            self.returned as f64 / self.wagered as f64
        };
    }
}

/// Play `config.rounds` rounds against `bank`, stopping early if the balance runs out.
pub fn simulate<B: BalanceStore + ?Sized>(
    config: &SimulatorConfig,
    bank: &mut B,
) -> Result<Summary, GameError> {
    let strategy = config.strategy;
    let mut player = GameRng::new(config.seed, PLAYER_STREAM);

    let summary = match config.game {
        GameConfig::Dice(c) => run::<Dice, _, _>(config, c, bank, |table, bank, wager| {
            table.play(bank, wager).map(|(_, settlement)| settlement)
        })?,
        GameConfig::Wheel(c) => run::<Wheel, _, _>(config, c, bank, |table, bank, wager| {
            table.play(bank, wager).map(|(_, settlement)| settlement)
        })?,
        GameConfig::Mines(c) => {
            c.validate()?;
            let target = strategy.mines_reveals.clamp(1, MINES_GRID_SIZE - c.mines);
            run::<Mines, _, _>(config, c, bank, |table, bank, wager| {
                let handle = table.start_round(bank, wager)?;
                let mv = MinesMove::Auto {
                    target,
                    order: strategy.mines_order,
                };
                match table.act(bank, handle, mv)? {
                    RoundUpdate::Settled { settlement, .. } => Ok(settlement),
                    RoundUpdate::Continue(_) => Err(GameError::InvalidState),
                }
            })?
        }
        GameConfig::DragonTower(c) => {
            run::<DragonTower, _, _>(config, c, bank, |table, bank, wager| {
                climb(table, bank, wager, &strategy, &mut player)
            })?
        }
        GameConfig::HiLo(c) => run::<HiLo, _, _>(config, c, bank, |table, bank, wager| {
            guess_streak(table, bank, wager, &strategy)
        })?,
    };

    info!(
        game = %summary.game,
        rounds = summary.rounds,
        wagered = summary.wagered,
        returned = summary.returned,
        rtp = summary.rtp,
        final_balance = summary.final_balance,
        "simulation finished"
    );
    Ok(summary)
}

fn run<G, B, F>(
    config: &SimulatorConfig,
    game_config: G::Config,
    bank: &mut B,
    mut play_round: F,
) -> Result<Summary, GameError>
where
    G: CasinoGame,
    B: BalanceStore + ?Sized,
    F: FnMut(&mut Table<G>, &mut B, u64) -> Result<Settlement, GameError>,
{
    let mut table: Table<G> = Table::new(GameRng::new(config.seed, 0));
    table.configure(game_config)?;

    let mut summary = Summary::new(G::GAME_TYPE, bank.get());
    for _ in 0..config.rounds {
        if bank.get() < config.wager {
            summary.bankrupt = true;
            break;
        }
        let settlement = play_round(&mut table, bank, config.wager)?;
        summary.record(&settlement);
    }
    summary.finish(bank.get());
    Ok(summary)
}

/// Pick random columns for `tower_climb` rows, then cash out.
fn climb<B: BalanceStore + ?Sized>(
    table: &mut Table<DragonTower>,
    bank: &mut B,
    wager: u64,
    strategy: &Strategy,
    player: &mut GameRng,
) -> Result<Settlement, GameError> {
    let handle = table.start_round(bank, wager)?;
    let columns = table.setup().map(|s| s.columns).ok_or(GameError::InvalidState)?;
    for row in 0..strategy.tower_climb() {
        let column = player.next_index(columns as usize) as u8;
        if let RoundUpdate::Settled { settlement, .. } =
            table.act(bank, handle, TowerMove::Pick { row, column })?
        {
            return Ok(settlement);
        }
    }
    table.cash_out(bank, handle)
}

/// Guess the likelier side each time, then cash out after `hilo_guesses` survivals.
fn guess_streak<B: BalanceStore + ?Sized>(
    table: &mut Table<HiLo>,
    bank: &mut B,
    wager: u64,
    strategy: &Strategy,
) -> Result<Settlement, GameError> {
    let handle = table.start_round(bank, wager)?;
    for _ in 0..strategy.hilo_guesses() {
        let rank = table
            .round()
            .and_then(|round| round.state.current())
            .map(|card| card.rank())
            .ok_or(GameError::InvalidState)?;
        let guess = if rank <= 7 { Guess::Higher } else { Guess::Lower };
        match table.act(bank, handle, HiLoMove::Guess(guess)) {
            Ok(RoundUpdate::Settled { settlement, .. }) => return Ok(settlement),
            Ok(RoundUpdate::Continue(_)) => {}
            Err(GameError::InvalidAction(InvalidAction::DeckExhausted)) => break,
            Err(err) => return Err(err),
        }
    }
    table.cash_out(bank, handle)
}
