//! Wheel game implementation.
//!
//! The wheel is a shuffled bag of multiplier segments sized by the player. Bucket sizes
//! follow the difficulty's probability table; rounding drift is absorbed by the most
//! probable bucket so the segment total always matches.

use super::{shuffle, CasinoGame, GameError, GameResult, InvalidAction, RandomSource, SingleShot};
use neovegas_types::casino::{Difficulty, GameType, Multiplier, WHEEL_SEGMENT_OPTIONS};
use serde::{Deserialize, Serialize};

/// `(multiplier in hundredths, percent of segments)` per difficulty.
pub fn probability_table(difficulty: Difficulty) -> &'static [(u64, u32)] {
    match difficulty {
        Difficulty::Easy => &[(0, 30), (150, 50), (170, 20)],
        Difficulty::Medium => &[(0, 45), (150, 20), (170, 15), (200, 10), (300, 10)],
        Difficulty::Hard => &[
            (0, 50),
            (150, 10),
            (170, 10),
            (200, 10),
            (300, 10),
            (400, 10),
        ],
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelConfig {
    pub difficulty: Difficulty,
    pub segments: u8,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            segments: 30,
        }
    }
}

impl WheelConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if !WHEEL_SEGMENT_OPTIONS.contains(&self.segments) {
            return Err(GameError::InvalidConfig(format!(
                "segment count must be one of {WHEEL_SEGMENT_OPTIONS:?}, got {}",
                self.segments
            )));
        }
        Ok(())
    }
}

/// Segments per bucket for a wheel of `segments` entries.
pub fn bucket_counts(difficulty: Difficulty, segments: u8) -> Vec<(Multiplier, usize)> {
    let table = probability_table(difficulty);
    let total = segments as i64;
    let mut counts: Vec<i64> = table
        .iter()
        .map(|&(_, pct)| (pct as i64 * total + 50) / 100)
        .collect();

    let drift = total - counts.iter().sum::<i64>();
    if drift != 0 {
        // First bucket wins ties.
        let mut absorb = 0;
        for (idx, &(_, pct)) in table.iter().enumerate() {
            if pct > table[absorb].1 {
                absorb = idx;
            }
        }
        counts[absorb] = (counts[absorb] + drift).max(0);
    }

    table
        .iter()
        .zip(counts)
        .map(|(&(hundredths, _), count)| (Multiplier::from_hundredths(hundredths), count as usize))
        .collect()
}

/// Build and shuffle the segment bag.
pub fn build_segments(
    difficulty: Difficulty,
    segments: u8,
    rng: &mut dyn RandomSource,
) -> Vec<Multiplier> {
    let mut bag: Vec<Multiplier> = bucket_counts(difficulty, segments)
        .into_iter()
        .flat_map(|(multiplier, count)| std::iter::repeat(multiplier).take(count))
        .collect();
    shuffle(rng, &mut bag);
    bag
}

/// Wheel layout shown before the spin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WheelSetup {
    pub difficulty: Difficulty,
    pub segments: Vec<Multiplier>,
}

impl WheelSetup {
    /// Average multiplier across all segments.
    pub fn expected_return(&self) -> f64 {
        if self.segments.is_empty() {
            return 0.0;
        }
        let total: u64 = self.segments.iter().map(|m| m.hundredths()).sum();
        total as f64 / 100.0 / self.segments.len() as f64
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WheelRound {
    pub result: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelMove {
    Spin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WheelEvent {
    pub index: usize,
    pub multiplier: Multiplier,
}

pub struct Wheel;

impl CasinoGame for Wheel {
    const GAME_TYPE: GameType = GameType::Wheel;

    type Config = WheelConfig;
    type Setup = WheelSetup;
    type Round = WheelRound;
    type Move = WheelMove;
    type Event = WheelEvent;

    fn configure(
        config: WheelConfig,
        rng: &mut dyn RandomSource,
    ) -> Result<WheelSetup, GameError> {
        config.validate()?;
        Ok(WheelSetup {
            difficulty: config.difficulty,
            segments: build_segments(config.difficulty, config.segments, rng),
        })
    }

    fn init(_setup: &WheelSetup, _rng: &mut dyn RandomSource) -> WheelRound {
        WheelRound::default()
    }

    fn process_move(
        setup: &WheelSetup,
        round: &mut WheelRound,
        mv: WheelMove,
        rng: &mut dyn RandomSource,
    ) -> Result<GameResult<WheelEvent>, GameError> {
        match mv {
            WheelMove::Spin => {
                if round.result.is_some() {
                    return Err(InvalidAction::NoActiveRound.into());
                }
                if setup.segments.is_empty() {
                    return Err(GameError::InvalidState);
                }
                let index = rng.next_index(setup.segments.len());
                round.result = Some(index);
                let multiplier = setup.segments[index];
                let event = WheelEvent { index, multiplier };
                if multiplier.is_zero() {
                    Ok(GameResult::Loss(event))
                } else {
                    Ok(GameResult::Win(multiplier, event))
                }
            }
        }
    }

    fn cash_out(
        _setup: &WheelSetup,
        _round: &mut WheelRound,
    ) -> Result<(Multiplier, WheelEvent), GameError> {
        Err(InvalidAction::NothingToCashOut.into())
    }
}

impl SingleShot for Wheel {
    const PLAY: WheelMove = WheelMove::Spin;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casino::GameRng;
    use crate::mocks::ScriptedRng;

    #[test]
    fn test_bag_sizing_for_every_option() {
        let mut rng = GameRng::from_seed(5);
        for difficulty in Difficulty::ALL {
            let table = probability_table(difficulty);
            for segments in WHEEL_SEGMENT_OPTIONS {
                let counts = bucket_counts(difficulty, segments);
                let total: usize = counts.iter().map(|(_, c)| c).sum();
                assert_eq!(total, segments as usize);

                // Every bucket but the absorbing one stays within one segment of its
                // exact share.
                let largest = table.iter().map(|&(_, pct)| pct).max().unwrap();
                for (&(_, pct), &(_, count)) in table.iter().zip(counts.iter()) {
                    if pct == largest {
                        continue;
                    }
                    let exact = pct as f64 * segments as f64 / 100.0;
                    assert!(
                        (count as f64 - exact).abs() <= 1.0,
                        "{difficulty} {segments}: {count} vs {exact}"
                    );
                }

                let setup = Wheel::configure(WheelConfig { difficulty, segments }, &mut rng)
                    .unwrap();
                assert_eq!(setup.segments.len(), segments as usize);
            }
        }
    }

    #[test]
    fn test_medium_thirty_layout() {
        let counts: Vec<usize> = bucket_counts(Difficulty::Medium, 30)
            .into_iter()
            .map(|(_, c)| c)
            .collect();
        // Rounded shares are 14, 6, 5, 3, 3; the zero bucket gives one back.
        assert_eq!(counts, vec![13, 6, 5, 3, 3]);
    }

    #[test]
    fn test_invalid_segments() {
        let mut rng = GameRng::from_seed(0);
        let config = WheelConfig {
            difficulty: Difficulty::Easy,
            segments: 21,
        };
        assert!(matches!(
            Wheel::configure(config, &mut rng),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_spin_pays_drawn_segment() {
        let setup = WheelSetup {
            difficulty: Difficulty::Easy,
            segments: vec![
                Multiplier::ZERO,
                Multiplier::from_hundredths(150),
                Multiplier::from_hundredths(170),
                Multiplier::ZERO,
            ],
        };
        let mut rng = ScriptedRng::from_indices(&[2, 3], 4);

        let mut round = WheelRound::default();
        match Wheel::process_move(&setup, &mut round, WheelMove::Spin, &mut rng).unwrap() {
            GameResult::Win(multiplier, event) => {
                assert_eq!(event.index, 2);
                assert_eq!(multiplier.hundredths(), 170);
            }
            other => panic!("expected win, got {other:?}"),
        }

        let mut round = WheelRound::default();
        let result = Wheel::process_move(&setup, &mut round, WheelMove::Spin, &mut rng).unwrap();
        assert!(matches!(result, GameResult::Loss(WheelEvent { index: 3, .. })));
    }

    #[test]
    fn test_expected_return() {
        let mut rng = GameRng::from_seed(11);
        let setup = Wheel::configure(
            WheelConfig {
                difficulty: Difficulty::Easy,
                segments: 20,
            },
            &mut rng,
        )
        .unwrap();
        // 6 x 0, 10 x 1.5, 4 x 1.7
        assert!((setup.expected_return() - (15.0 + 6.8) / 20.0).abs() < 1e-9);
    }
}
