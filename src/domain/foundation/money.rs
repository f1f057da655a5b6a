//! Money value object.
//!
//! Amounts are whole cents in an `i64`; floats only appear at the JSON
//! boundary, where amounts travel as decimal numbers (`49.99`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

use super::ValidationError;

/// Largest accepted amount: 10 billion currency units.
const MAX_CENTS: i64 = 1_000_000_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Converts a decimal amount, rounding to the nearest cent.
    pub fn from_decimal(amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::invalid_format("amount", "must be a finite number"));
        }
        let cents = (amount * 100.0).round();
        if cents.abs() > MAX_CENTS as f64 {
            return Err(ValidationError::out_of_range(
                "amount",
                -MAX_CENTS,
                MAX_CENTS,
                cents as i64,
            ));
        }
        Ok(Self(cents as i64))
    }

    /// A price: non-negative and within range.
    pub fn price(amount: f64) -> Result<Self, ValidationError> {
        let money = Self::from_decimal(amount).map_err(|e| e.for_field("price"))?;
        if money.is_negative() {
            return Err(ValidationError::out_of_range("price", 0, MAX_CENTS, money.0));
        }
        Ok(money)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Divides by `parts`, rounding half away from zero to whole cents.
    ///
    /// `Money::from_cents(10_000).divide_rounded(12)` is 8.33.
    pub fn divide_rounded(&self, parts: i64) -> Self {
        debug_assert!(parts > 0);
        let half = parts / 2;
        if self.0 >= 0 {
            Self((self.0 + half) / parts)
        } else {
            Self(-((-self.0 + half) / parts))
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount).map_err(serde::de::Error::custom)
    }
}
