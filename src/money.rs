//! Amounts of money stored as integer thousandths of the currency unit.

use std::{fmt, ops, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::Error;

/// An amount of money in thousandths of the currency unit, e.g., $12.34 is
/// 12,340 milliunits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Milliunits(i64);

impl Milliunits {
    const SCALE: u32 = 3;

    /// Wrap a raw count of milliunits.
    pub fn new(milliunits: i64) -> Self {
        Self(milliunits)
    }

    /// The raw count of milliunits.
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// The amount in whole currency units without trailing zeros, e.g.,
    /// 12,340 milliunits is 12.34.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, Self::SCALE).normalize()
    }

    /// The magnitude of the amount.
    ///
    /// `i64::MIN` has no positive counterpart and saturates to `i64::MAX`.
    /// Amounts parsed by [convert_amount_to_miliunits] never hit this case.
    pub fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Whether the amount is below zero.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl ops::Neg for Milliunits {
    type Output = Milliunits;

    fn neg(self) -> Milliunits {
        Milliunits(self.0.saturating_neg())
    }
}

impl fmt::Display for Milliunits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl ToSql for Milliunits {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for Milliunits {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Milliunits)
    }
}

/// Convert a decimal amount entered by the user, e.g., "12.34", into milliunits.
///
/// Digits beyond the third decimal place are rounded half away from zero.
///
/// # Errors
///
/// Returns [Error::InvalidAmount] if `amount` is empty, is not a decimal
/// number, or its magnitude does not fit in milliunits. The magnitude
/// limit keeps amounts symmetric around zero so that flipping the sign of
/// an amount cannot overflow.
pub fn convert_amount_to_miliunits(amount: &str) -> Result<Milliunits, Error> {
    let trimmed = amount.trim();
    let invalid_amount = || Error::InvalidAmount(amount.to_owned());

    let decimal = Decimal::from_str(trimmed).map_err(|_| invalid_amount())?;

    decimal
        .checked_mul(Decimal::new(1000, 0))
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|scaled| scaled.to_i64())
        .filter(|milliunits| *milliunits != i64::MIN)
        .map(Milliunits)
        .ok_or_else(invalid_amount)
}
