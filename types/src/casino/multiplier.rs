use serde::{Deserialize, Serialize};
use std::fmt;

/// Multiplier denominator: values are stored in hundredths (1.00x = 100).
pub const MULTIPLIER_SCALE: u64 = 100;

/// Payout multiplier with two decimals of precision.
///
/// Every multiplier the games publish is rounded to hundredths, and payouts are
/// `floor(wager * multiplier)` computed exactly in integer arithmetic.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Multiplier(u64);

impl Multiplier {
    pub const ZERO: Multiplier = Multiplier(0);
    pub const ONE: Multiplier = Multiplier(MULTIPLIER_SCALE);

    pub const fn from_hundredths(hundredths: u64) -> Self {
        Self(hundredths)
    }

    pub const fn hundredths(self) -> u64 {
        self.0
    }

    /// Round a real-valued factor to two decimals.
    ///
    /// Non-finite and non-positive inputs map to [`Multiplier::ZERO`].
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Self::ZERO;
        }
        let scaled = (value * MULTIPLIER_SCALE as f64).round();
        if scaled >= u64::MAX as f64 {
            Self(u64::MAX)
        } else {
            Self(scaled as u64)
        }
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / MULTIPLIER_SCALE as f64
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `floor(wager * self)`, saturating at `u64::MAX`.
    pub fn payout(self, wager: u64) -> u64 {
        let total = (wager as u128) * (self.0 as u128) / (MULTIPLIER_SCALE as u128);
        u64::try_from(total).unwrap_or(u64::MAX)
    }

    /// Multiply two multipliers, rounding the product to hundredths (half up).
    pub fn compound(self, other: Multiplier) -> Multiplier {
        let scale = MULTIPLIER_SCALE as u128;
        let product = (self.0 as u128) * (other.0 as u128);
        let rounded = (product + scale / 2) / scale;
        Multiplier(u64::try_from(rounded).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}x",
            self.0 / MULTIPLIER_SCALE,
            self.0 % MULTIPLIER_SCALE
        )
    }
}
