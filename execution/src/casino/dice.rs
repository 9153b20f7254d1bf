//! Dice game implementation.
//!
//! The player picks a target in `[1, 99]` and a direction. A roll in `[0, 100)` with two
//! decimals wins when it lands strictly on the chosen side of the target.
//!
//! Rolls and targets are kept in hundredths (`5000` = `50.00`) so comparisons are exact.

use super::{CasinoGame, GameError, GameResult, InvalidAction, RandomSource, SingleShot};
use neovegas_types::casino::{
    Difficulty, GameType, Multiplier, DICE_MAX_TARGET, DICE_MIN_TARGET, DICE_ROLL_RANGE,
};
use serde::{Deserialize, Serialize};

/// Highest roll value in hundredths (`99.99`).
const MAX_ROLL: u32 = DICE_ROLL_RANGE * 100 - 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollDirection {
    #[default]
    Over,
    Under,
}

impl RollDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Over => Self::Under,
            Self::Under => Self::Over,
        }
    }
}

/// Dice configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceConfig {
    /// Threshold; clamped into `[1, 99]`.
    pub target: u8,
    pub direction: RollDirection,
}

impl Default for DiceConfig {
    fn default() -> Self {
        Self {
            target: 50,
            direction: RollDirection::Over,
        }
    }
}

impl DiceConfig {
    /// Quick-pick targets for a difficulty.
    pub fn preset(difficulty: Difficulty, direction: RollDirection) -> Self {
        let target = match (difficulty, direction) {
            (Difficulty::Easy, RollDirection::Over) => 25,
            (Difficulty::Easy, RollDirection::Under) => 75,
            (Difficulty::Medium, _) => 50,
            (Difficulty::Hard, RollDirection::Over) => 70,
            (Difficulty::Hard, RollDirection::Under) => 30,
        };
        Self { target, direction }
    }

    /// Same target, opposite direction.
    pub fn toggled(self) -> Self {
        Self {
            target: self.target,
            direction: self.direction.toggled(),
        }
    }
}

/// Clamp a target into the selectable range.
pub fn clamp_target(target: u8) -> u8 {
    target.clamp(DICE_MIN_TARGET, DICE_MAX_TARGET)
}

/// Percent chance of winning; always in `1..=99` for a clamped target.
pub fn win_chance(target: u8, direction: RollDirection) -> u8 {
    let target = clamp_target(target);
    match direction {
        RollDirection::Over => 100 - target,
        RollDirection::Under => target,
    }
}

/// `round2(100 / win_chance)`.
pub fn multiplier_for(target: u8, direction: RollDirection) -> Multiplier {
    Multiplier::from_f64(100.0 / win_chance(target, direction) as f64)
}

/// Validated dice parameters with their odds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiceSetup {
    pub target: u8,
    pub direction: RollDirection,
    pub win_chance: u8,
    pub multiplier: Multiplier,
}

impl DiceSetup {
    pub fn new(config: DiceConfig) -> Self {
        let target = clamp_target(config.target);
        Self {
            target,
            direction: config.direction,
            win_chance: win_chance(target, config.direction),
            multiplier: multiplier_for(target, config.direction),
        }
    }

    /// `floor(wager * multiplier)`.
    pub fn potential_payout(&self, wager: u64) -> u64 {
        self.multiplier.payout(wager)
    }

    /// Whether a roll (in hundredths) wins.
    pub fn is_win(&self, roll: u32) -> bool {
        let threshold = self.target as u32 * 100;
        match self.direction {
            RollDirection::Over => roll > threshold,
            RollDirection::Under => roll < threshold,
        }
    }
}

/// `round2(random * 100)` in hundredths, capped at `99.99`.
pub fn roll(rng: &mut dyn RandomSource) -> u32 {
    let scaled = (rng.next_f64() * (DICE_ROLL_RANGE * 100) as f64).round();
    (scaled.max(0.0) as u32).min(MAX_ROLL)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiceRound {
    pub roll: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiceMove {
    Roll,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DiceEvent {
    /// Roll in hundredths.
    pub roll: u32,
    pub target: u8,
    pub direction: RollDirection,
    pub won: bool,
}

impl DiceEvent {
    pub fn roll_f64(&self) -> f64 {
        self.roll as f64 / 100.0
    }
}

pub struct Dice;

impl CasinoGame for Dice {
    const GAME_TYPE: GameType = GameType::Dice;

    type Config = DiceConfig;
    type Setup = DiceSetup;
    type Round = DiceRound;
    type Move = DiceMove;
    type Event = DiceEvent;

    fn configure(
        config: DiceConfig,
        _rng: &mut dyn RandomSource,
    ) -> Result<DiceSetup, GameError> {
        Ok(DiceSetup::new(config))
    }

    fn init(_setup: &DiceSetup, _rng: &mut dyn RandomSource) -> DiceRound {
        DiceRound::default()
    }

    fn process_move(
        setup: &DiceSetup,
        round: &mut DiceRound,
        mv: DiceMove,
        rng: &mut dyn RandomSource,
    ) -> Result<GameResult<DiceEvent>, GameError> {
        match mv {
            DiceMove::Roll => {
                if round.roll.is_some() {
                    return Err(InvalidAction::NoActiveRound.into());
                }
                let value = roll(rng);
                round.roll = Some(value);
                let won = setup.is_win(value);
                let event = DiceEvent {
                    roll: value,
                    target: setup.target,
                    direction: setup.direction,
                    won,
                };
                if won {
                    Ok(GameResult::Win(setup.multiplier, event))
                } else {
                    Ok(GameResult::Loss(event))
                }
            }
        }
    }

    fn cash_out(
        _setup: &DiceSetup,
        _round: &mut DiceRound,
    ) -> Result<(Multiplier, DiceEvent), GameError> {
        Err(InvalidAction::NothingToCashOut.into())
    }
}

impl SingleShot for Dice {
    const PLAY: DiceMove = DiceMove::Roll;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::ScriptedRng;

    #[test]
    fn test_multiplier_formula() {
        assert_eq!(multiplier_for(50, RollDirection::Over).hundredths(), 200);
        assert_eq!(multiplier_for(25, RollDirection::Over).hundredths(), 133);
        assert_eq!(multiplier_for(25, RollDirection::Under).hundredths(), 400);
        assert_eq!(multiplier_for(99, RollDirection::Under).hundredths(), 101);
        assert_eq!(multiplier_for(99, RollDirection::Over).hundredths(), 10_000);
    }

    #[test]
    fn test_target_clamped() {
        let setup = DiceSetup::new(DiceConfig {
            target: 0,
            direction: RollDirection::Under,
        });
        assert_eq!(setup.target, 1);
        assert_eq!(setup.win_chance, 1);

        let setup = DiceSetup::new(DiceConfig {
            target: 200,
            direction: RollDirection::Under,
        });
        assert_eq!(setup.target, 99);
        assert_eq!(setup.win_chance, 99);
    }

    #[test]
    fn test_win_is_strict() {
        let over = DiceSetup::new(DiceConfig::default());
        assert!(!over.is_win(5_000));
        assert!(over.is_win(5_001));
        assert!(!over.is_win(4_999));

        let under = DiceSetup::new(DiceConfig::default().toggled());
        assert!(!under.is_win(5_000));
        assert!(under.is_win(4_999));
    }

    #[test]
    fn test_potential_payout_floors() {
        let setup = DiceSetup::new(DiceConfig {
            target: 25,
            direction: RollDirection::Over,
        });
        assert_eq!(setup.potential_payout(100), 133);
        assert_eq!(setup.potential_payout(7), 9);
    }

    #[test]
    fn test_roll_rounding_and_cap() {
        let mut rng = ScriptedRng::new([0.6, 0.123456, 0.99999, 0.0]);
        assert_eq!(roll(&mut rng), 6_000);
        assert_eq!(roll(&mut rng), 1_235);
        assert_eq!(roll(&mut rng), MAX_ROLL);
        assert_eq!(roll(&mut rng), 0);
    }

    #[test]
    fn test_presets() {
        assert_eq!(
            DiceConfig::preset(Difficulty::Easy, RollDirection::Over).target,
            25
        );
        assert_eq!(
            DiceConfig::preset(Difficulty::Easy, RollDirection::Under).target,
            75
        );
        assert_eq!(
            DiceConfig::preset(Difficulty::Hard, RollDirection::Over).target,
            70
        );
        assert_eq!(
            DiceConfig::preset(Difficulty::Hard, RollDirection::Under).target,
            30
        );
        // Presets keep the same win chance on either side.
        for difficulty in Difficulty::ALL {
            let over = DiceConfig::preset(difficulty, RollDirection::Over);
            let under = DiceConfig::preset(difficulty, RollDirection::Under);
            assert_eq!(
                win_chance(over.target, over.direction),
                win_chance(under.target, under.direction)
            );
        }
    }

    #[test]
    fn test_roll_twice_rejected() {
        let setup = DiceSetup::new(DiceConfig::default());
        let mut round = DiceRound::default();
        let mut rng = ScriptedRng::new([0.9, 0.9]);
        let result = Dice::process_move(&setup, &mut round, DiceMove::Roll, &mut rng).unwrap();
        assert!(matches!(result, GameResult::Win(m, _) if m.hundredths() == 200));
        assert!(Dice::process_move(&setup, &mut round, DiceMove::Roll, &mut rng).is_err());
    }
}
