//! Money as an amount in the smallest currency unit (paise).
//!
//! All ledger arithmetic happens on integer paise; rendering to a currency
//! string (symbols, digit grouping) is a presentation concern and lives with
//! the statement sinks.

use serde::{Deserialize, Serialize};

/// Signed amount in paise (1/100 rupee).
///
/// Negative amounts are representable on purpose: a member record with a
/// non-positive premium still computes a schedule, and callers may flag it
/// upstream.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn paise(amount: i64) -> Self {
        Self(amount)
    }

    /// Whole-rupee constructor (saturates on overflow).
    pub const fn rupees(amount: i64) -> Self {
        Self(amount.saturating_mul(100))
    }

    pub const fn as_paise(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn min(self, other: Money) -> Money {
        Money(self.0.min(other.0))
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Floor at zero: outstanding balances never go into credit.
    pub fn clamp_non_negative(self) -> Money {
        Money(self.0.max(0))
    }

    /// Multiply by a head count (saturates on overflow).
    pub fn times(self, n: u32) -> Money {
        Money(self.0.saturating_mul(n as i64))
    }

    /// Percentage share, widened through i128 to avoid intermediate overflow.
    /// Rounds toward zero.
    pub fn percent(self, pct: u8) -> Money {
        let wide = (self.0 as i128) * (pct as i128) / 100;
        Money(wide as i64)
    }

    /// Equal split across `n` people. Rounds toward zero; `n == 0` yields zero.
    pub fn split_among(self, n: u32) -> Money {
        if n == 0 {
            return Money::ZERO;
        }
        Money(self.0 / (n as i64))
    }
}

impl core::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl core::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl core::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl core::ops::SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc.saturating_add(m))
    }
}

impl core::fmt::Display for Money {
    /// Plain decimal rupees ("5000.00"), no grouping or symbol.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
