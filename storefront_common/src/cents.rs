use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;

use crate::op;

//--------------------------------------       Cents         ---------------------------------------------------------
/// A currency amount expressed in minor units (cents). All monetary values in the storefront are carried as `Cents`
/// so that totals are exact; conversion to a decimal representation only happens for display.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Cents(i64);

op!(binary Cents, Add, add);
op!(binary Cents, Sub, sub);
op!(inplace Cents, SubAssign, sub_assign);
op!(inplace Cents, AddAssign, add_assign);
op!(unary Cents, Neg, neg);

impl Mul<i64> for Cents {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Cents {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Cents {}

impl Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Cents {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    /// Returns the share of this amount given in basis points (1/100th of a percent), rounded half away from zero to
    /// the nearest cent. `Cents(2599).percent_bps(800)` is `Cents(208)`.
    pub fn percent_bps(&self, bps: i64) -> Self {
        Self(div_round_half_away(self.0 * bps, 10_000))
    }

    /// Divides the amount into `n` equal parts, rounding half away from zero. Returns `None` if `n` is not positive.
    pub fn div_round(&self, n: i64) -> Option<Self> {
        (n > 0).then(|| Self(div_round_half_away(self.0, n)))
    }

    /// The absolute difference between two amounts
    pub fn abs_diff(&self, other: Cents) -> Cents {
        Self((self.0 - other.0).abs())
    }
}

fn div_round_half_away(numerator: i64, denominator: i64) -> i64 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}
