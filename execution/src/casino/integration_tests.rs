//! Integration tests for casino game execution.
//!
//! These tests drive full rounds through a [`Table`] against a shared balance and check
//! the accounting end to end.

#[cfg(test)]
mod tests {
    use crate::balance::{BalanceStore, Ledger};
    use crate::casino::dice::{Dice, DiceConfig, RollDirection};
    use crate::casino::dragon_tower::{DragonTower, TowerConfig, TowerMove};
    use crate::casino::hilo::{Guess, HiLo, HiLoConfig, HiLoMove};
    use crate::casino::mines::{AutoOrder, Mines, MinesConfig, MinesMove};
    use crate::casino::registry::{GameConfig, GameRegistry};
    use crate::casino::table::{Outcome, RoundUpdate, Settlement, Table};
    use crate::casino::wheel::{Wheel, WheelConfig};
    use crate::casino::{GameError, GameRng, InvalidAction};
    use crate::mocks::{identity_shuffle_script, ScriptedRng};
    use crate::state::{FileState, Memory};
    use neovegas_types::casino::{Difficulty, GameType, DEFAULT_BALANCE, WHEEL_SEGMENT_OPTIONS};
    use proptest::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Running totals checked against the ledger.
    #[derive(Default)]
    struct Books {
        wagered: u64,
        returned: u64,
    }

    impl Books {
        fn record(&mut self, settlement: &Settlement) {
            self.wagered += settlement.wager;
            self.returned += settlement.payout;
        }

        fn expected(&self, start: u64) -> u64 {
            start - self.wagered + self.returned
        }
    }

    #[test]
    fn test_dice_end_to_end() {
        let mut bank = Ledger::in_memory();
        assert_eq!(bank.get(), 10_000);

        let mut table: Table<Dice, _> = Table::new(ScriptedRng::new([0.6]));
        table
            .configure(DiceConfig {
                target: 50,
                direction: RollDirection::Over,
            })
            .unwrap();
        let (event, settlement) = table.play(&mut bank, 100).unwrap();

        assert_eq!(event.roll_f64(), 60.0);
        assert!(event.won);
        assert_eq!(settlement.payout, 200);
        assert_eq!(bank.get(), 10_100);
    }

    #[test]
    fn test_loss_conserves_balance() {
        let mut bank = Ledger::with_balance(1_000);
        let mut table: Table<Dice, _> = Table::new(ScriptedRng::new([0.1]));
        table.configure(DiceConfig::default()).unwrap();
        let (_, settlement) = table.play(&mut bank, 250).unwrap();
        assert_eq!(settlement.outcome, Outcome::Lost);
        assert_eq!(settlement.balance, 750);
        assert_eq!(bank.get(), 750);
    }

    #[test]
    fn test_mines_auto_play_settles_once() {
        let mut bank = Ledger::in_memory();
        let rng = ScriptedRng::from_indices(&[20, 21, 22, 23, 24], 25);
        let mut table: Table<Mines, _> = Table::new(rng);
        table.configure(MinesConfig::default()).unwrap();

        let handle = table.start_round(&mut bank, 1_000).unwrap();
        let update = table
            .act(
                &mut bank,
                handle,
                MinesMove::Auto {
                    target: 2,
                    order: AutoOrder::Sequential,
                },
            )
            .unwrap();
        let settlement = *update.settlement().unwrap();
        // 25/20 * 24/19 = 1.578... -> 1.58
        assert_eq!(settlement.payout, 1_580);
        assert_eq!(bank.get(), 10_580);
        assert_eq!(
            table.cash_out(&mut bank, handle),
            Err(GameError::InvalidAction(InvalidAction::NoActiveRound))
        );
        assert_eq!(bank.get(), 10_580);
    }

    #[test]
    fn test_tower_climb_three_rows() {
        let mut bank = Ledger::in_memory();
        let mut table: Table<DragonTower> = Table::seeded(17);
        table.configure(TowerConfig::default()).unwrap();
        let handle = table.start_round(&mut bank, 100).unwrap();

        // Pick a column that is not the trap for each of the first three rows.
        for row in 0..3 {
            let round = table.round().unwrap();
            let trap = round.state.trap(row).unwrap();
            let column = (trap + 1) % 3;
            let update = table
                .act(&mut bank, handle, TowerMove::Pick { row, column })
                .unwrap();
            assert!(matches!(update, RoundUpdate::Continue(_)));
        }
        let settlement = table.cash_out(&mut bank, handle).unwrap();
        assert_eq!(settlement.multiplier.hundredths(), 338);
        assert_eq!(bank.get(), 10_000 - 100 + 338);
    }

    #[test]
    fn test_hilo_round_on_unshuffled_deck() {
        let mut bank = Ledger::in_memory();
        // Deck in suit-major order: A, 2, 3, ... of spades.
        let rng = ScriptedRng::new(identity_shuffle_script(52));
        let mut table: Table<HiLo, _> = Table::new(rng);
        table.configure(HiLoConfig {}).unwrap();

        let handle = table.start_round(&mut bank, 100).unwrap();
        // A -> 2 higher pays 1.00, 2 -> 3 higher pays 12/11.
        table
            .act(&mut bank, handle, HiLoMove::Guess(Guess::Higher))
            .unwrap();
        let update = table
            .act(&mut bank, handle, HiLoMove::Guess(Guess::Higher))
            .unwrap();
        assert_eq!(update.event().streak, 2);
        assert_eq!(update.event().total.hundredths(), 109);

        let update = table
            .act(&mut bank, handle, HiLoMove::Guess(Guess::Lower))
            .unwrap();
        let settlement = update.settlement().unwrap();
        assert_eq!(settlement.outcome, Outcome::Lost);
        assert_eq!(update.event().history.len(), 4);
        assert_eq!(bank.get(), 9_900);
    }

    #[test]
    fn test_wheel_layout_visible_before_spin() {
        let mut bank = Ledger::in_memory();
        let mut table: Table<Wheel> = Table::seeded(99);
        let segments = table
            .configure(WheelConfig {
                difficulty: Difficulty::Hard,
                segments: 40,
            })
            .unwrap()
            .segments
            .clone();
        assert_eq!(segments.len(), 40);

        let (event, settlement) = table.play(&mut bank, 10).unwrap();
        assert_eq!(segments[event.index], event.multiplier);
        assert_eq!(settlement.payout, event.multiplier.payout(10));
    }

    #[test]
    fn test_balance_persists_between_tables() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut bank = Ledger::new(FileState::open(dir.path()).unwrap());
            let mut table: Table<Dice, _> = Table::new(ScriptedRng::new([0.0]));
            table.configure(DiceConfig::default()).unwrap();
            table.play(&mut bank, 1_000).unwrap();
        }
        let mut bank = Ledger::new(FileState::open(dir.path()).unwrap());
        assert_eq!(bank.get(), DEFAULT_BALANCE - 1_000);
    }

    #[test]
    fn test_registry_configs_drive_tables() {
        let registry = GameRegistry::new();
        let mut bank = Ledger::in_memory();
        for game_type in GameRegistry::all_game_types() {
            match registry.get_config(*game_type).unwrap() {
                GameConfig::Dice(c) => {
                    let mut table: Table<Dice> = Table::seeded(1);
                    table.configure(*c).unwrap();
                    table.play(&mut bank, 1).unwrap();
                }
                GameConfig::Wheel(c) => {
                    let mut table: Table<Wheel> = Table::seeded(1);
                    table.configure(*c).unwrap();
                    table.play(&mut bank, 1).unwrap();
                }
                GameConfig::Mines(c) => {
                    let mut table: Table<Mines> = Table::seeded(1);
                    table.configure(*c).unwrap();
                    table.start_round(&mut bank, 1).unwrap();
                }
                GameConfig::DragonTower(c) => {
                    let mut table: Table<DragonTower> = Table::seeded(1);
                    table.configure(*c).unwrap();
                    table.start_round(&mut bank, 1).unwrap();
                }
                GameConfig::HiLo(c) => {
                    let mut table: Table<HiLo> = Table::seeded(1);
                    table.configure(*c).unwrap();
                    table.start_round(&mut bank, 1).unwrap();
                }
            }
        }
        assert!(bank.get() <= DEFAULT_BALANCE + 100);
    }

    /// Random play across every game; the ledger must match the settlements exactly.
    #[test]
    fn test_random_play_balances_books() {
        let mut move_rng = StdRng::seed_from_u64(0x5eed_f00d);
        let mut bank = Ledger::new(Memory::default());
        let start = bank.get();
        let mut books = Books::default();

        let mut dice: Table<Dice> = Table::seeded(1);
        let mut wheel: Table<Wheel> = Table::seeded(2);
        let mut mines: Table<Mines> = Table::seeded(3);
        let mut tower: Table<DragonTower> = Table::seeded(4);
        let mut hilo: Table<HiLo> = Table::seeded(5);
        hilo.configure(HiLoConfig {}).unwrap();

        for _ in 0..300 {
            let wager = move_rng.gen_range(1..=20);
            match GameType::ALL[move_rng.gen_range(0..GameType::ALL.len())] {
                GameType::Dice => {
                    let direction = if move_rng.gen_bool(0.5) {
                        RollDirection::Over
                    } else {
                        RollDirection::Under
                    };
                    dice.configure(DiceConfig {
                        target: move_rng.gen_range(1..=99),
                        direction,
                    })
                    .unwrap();
                    let (_, settlement) = dice.play(&mut bank, wager).unwrap();
                    books.record(&settlement);
                }
                GameType::Wheel => {
                    let segments =
                        WHEEL_SEGMENT_OPTIONS[move_rng.gen_range(0..WHEEL_SEGMENT_OPTIONS.len())];
                    let difficulty = Difficulty::ALL[move_rng.gen_range(0..3)];
                    wheel
                        .configure(WheelConfig {
                            difficulty,
                            segments,
                        })
                        .unwrap();
                    let (_, settlement) = wheel.play(&mut bank, wager).unwrap();
                    books.record(&settlement);
                }
                GameType::Mines => {
                    mines
                        .configure(MinesConfig {
                            mines: move_rng.gen_range(1..=24),
                        })
                        .unwrap();
                    let handle = mines.start_round(&mut bank, wager).unwrap();
                    loop {
                        let cell = move_rng.gen_range(0..25);
                        match mines.act(&mut bank, handle, MinesMove::Reveal(cell)) {
                            Ok(RoundUpdate::Settled { settlement, .. }) => {
                                books.record(&settlement);
                                break;
                            }
                            Ok(RoundUpdate::Continue(_)) if move_rng.gen_bool(0.3) => {
                                let settlement = mines.cash_out(&mut bank, handle).unwrap();
                                books.record(&settlement);
                                break;
                            }
                            Ok(RoundUpdate::Continue(_)) => {}
                            Err(GameError::InvalidAction(InvalidAction::AlreadyRevealed)) => {}
                            Err(err) => panic!("unexpected error: {err}"),
                        }
                    }
                }
                GameType::DragonTower => {
                    tower
                        .configure(TowerConfig {
                            difficulty: Difficulty::ALL[move_rng.gen_range(0..3)],
                        })
                        .unwrap();
                    let handle = tower.start_round(&mut bank, wager).unwrap();
                    let columns = tower.setup().unwrap().columns;
                    let mut row = 0;
                    loop {
                        let column = move_rng.gen_range(0..columns);
                        match tower.act(&mut bank, handle, TowerMove::Pick { row, column }) {
                            Ok(RoundUpdate::Settled { settlement, .. }) => {
                                books.record(&settlement);
                                break;
                            }
                            Ok(RoundUpdate::Continue(_)) if move_rng.gen_bool(0.4) => {
                                let settlement = tower.cash_out(&mut bank, handle).unwrap();
                                books.record(&settlement);
                                break;
                            }
                            Ok(RoundUpdate::Continue(_)) => row += 1,
                            Err(err) => panic!("unexpected error: {err}"),
                        }
                    }
                }
                GameType::HiLo => {
                    let handle = hilo.start_round(&mut bank, wager).unwrap();
                    loop {
                        let mv = match move_rng.gen_range(0..5) {
                            0 => HiLoMove::Skip,
                            1 | 2 => HiLoMove::Guess(Guess::Higher),
                            _ => HiLoMove::Guess(Guess::Lower),
                        };
                        match hilo.act(&mut bank, handle, mv) {
                            Ok(RoundUpdate::Settled { settlement, .. }) => {
                                books.record(&settlement);
                                break;
                            }
                            Ok(RoundUpdate::Continue(_)) if move_rng.gen_bool(0.3) => {
                                match hilo.cash_out(&mut bank, handle) {
                                    Ok(settlement) => {
                                        books.record(&settlement);
                                        break;
                                    }
                                    // Only skips so far.
                                    Err(GameError::InvalidAction(
                                        InvalidAction::NothingToCashOut,
                                    )) => {}
                                    Err(err) => panic!("unexpected error: {err}"),
                                }
                            }
                            Ok(RoundUpdate::Continue(_)) => {}
                            Err(GameError::InvalidAction(InvalidAction::DeckExhausted)) => {
                                match hilo.cash_out(&mut bank, handle) {
                                    Ok(settlement) => books.record(&settlement),
                                    Err(_) => {
                                        hilo.abandon().unwrap();
                                        books.wagered += wager;
                                    }
                                }
                                break;
                            }
                            Err(err) => panic!("unexpected error: {err}"),
                        }
                    }
                }
            }
            assert_eq!(bank.get(), books.expected(start));
        }
    }

    proptest! {
        #[test]
        fn prop_dice_settlement_matches_roll(
            target in 1u8..=99,
            over in any::<bool>(),
            roll in 0.0f64..1.0,
            wager in 1u64..=10_000,
        ) {
            let direction = if over { RollDirection::Over } else { RollDirection::Under };
            let mut bank = Ledger::in_memory();
            let mut table: Table<Dice, _> = Table::new(ScriptedRng::new([roll]));
            table.configure(DiceConfig { target, direction }).unwrap();
            let (event, settlement) = table.play(&mut bank, wager).unwrap();

            let threshold = target as u32 * 100;
            let won = match direction {
                RollDirection::Over => event.roll > threshold,
                RollDirection::Under => event.roll < threshold,
            };
            prop_assert_eq!(event.won, won);
            if won {
                prop_assert_eq!(settlement.payout, settlement.multiplier.payout(wager));
            } else {
                prop_assert_eq!(settlement.payout, 0);
            }
            prop_assert_eq!(bank.get(), DEFAULT_BALANCE - wager + settlement.payout);
        }

        #[test]
        fn prop_mines_layout_has_exact_count(mines in 1u8..=24, seed in any::<u64>()) {
            let mut bank = Ledger::in_memory();
            let mut table: Table<Mines> = Table::new(GameRng::from_seed(seed));
            table.configure(MinesConfig { mines }).unwrap();
            table.start_round(&mut bank, 1).unwrap();
            let round = table.round().unwrap();
            prop_assert_eq!(round.state.mine_positions().len(), mines as usize);
        }
    }
}
