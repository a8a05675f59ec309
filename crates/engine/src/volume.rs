//! Fixed-point volume used for meter readings and tank stock.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Money, ResultEngine,
    money::{parse_fixed, split_sign},
};

/// Thousandths per unit.
pub const MILLI: i64 = 1_000;

/// A quantity of fuel (or any product) in **thousandths of a unit**.
///
/// Readings are cumulative counters, stock levels can legitimately go below
/// zero, and dispensed totals are differences, so the value is signed.
/// User input is limited to three decimals and must not be negative.
///
/// ```rust
/// use engine::{Money, Volume};
///
/// let sold: Volume = "50".parse().unwrap();
/// let rate: Money = "95.5".parse().unwrap();
/// assert_eq!(sold.value_at(rate).unwrap(), Money::new(4775_00));
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Volume(i64);

impl Volume {
    pub const ZERO: Volume = Volume(0);

    #[must_use]
    pub const fn from_milli(milli: i64) -> Self {
        Self(milli)
    }

    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        Self(units * MILLI)
    }

    #[must_use]
    pub const fn milli(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub fn max(self, other: Volume) -> Volume {
        Volume(self.0.max(other.0))
    }

    #[must_use]
    pub fn checked_add(self, rhs: Volume) -> Option<Volume> {
        self.0.checked_add(rhs.0).map(Volume)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: Volume) -> Option<Volume> {
        self.0.checked_sub(rhs.0).map(Volume)
    }

    pub fn try_add(self, rhs: Volume) -> ResultEngine<Volume> {
        self.checked_add(rhs).ok_or_else(volume_overflow)
    }

    pub fn try_sub(self, rhs: Volume) -> ResultEngine<Volume> {
        self.checked_sub(rhs).ok_or_else(volume_overflow)
    }

    /// Values this volume at `rate` per unit, rounded to two decimals with
    /// halves rounded away from zero.
    pub fn value_at(self, rate: Money) -> ResultEngine<Money> {
        let product = i128::from(self.0) * i128::from(rate.minor());
        let divisor = i128::from(MILLI);
        let mut quotient = product / divisor;
        let remainder = product % divisor;
        if remainder.abs() * 2 >= divisor {
            quotient += product.signum();
        }
        i64::try_from(quotient)
            .map(Money::new)
            .map_err(|_| EngineError::Validation("amount too large".to_string()))
    }
}

fn volume_overflow() -> EngineError {
    EngineError::Validation("volume too large".to_string())
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let unit = MILLI.unsigned_abs();
        write!(f, "{sign}{}.{:03}", abs / unit, abs % unit)
    }
}

impl Add for Volume {
    type Output = Volume;

    fn add(self, rhs: Volume) -> Self::Output {
        Volume(self.0 + rhs.0)
    }
}

impl AddAssign for Volume {
    fn add_assign(&mut self, rhs: Volume) {
        self.0 += rhs.0;
    }
}

impl Sub for Volume {
    type Output = Volume;

    fn sub(self, rhs: Volume) -> Self::Output {
        Volume(self.0 - rhs.0)
    }
}

impl Neg for Volume {
    type Output = Volume;

    fn neg(self) -> Self::Output {
        Volume(-self.0)
    }
}

impl Sum for Volume {
    fn sum<I: Iterator<Item = Volume>>(iter: I) -> Self {
        iter.fold(Volume::ZERO, Add::add)
    }
}

impl FromStr for Volume {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, digits) = split_sign(s)?;
        if negative {
            return Err(EngineError::Validation(format!(
                "invalid volume: {} must not be negative",
                s.trim()
            )));
        }
        parse_fixed(digits, 3, "volume").map(Volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_arithmetic_reports_overflow() {
        assert_eq!(
            Volume::from_units(2).try_add(Volume::from_milli(500)).unwrap(),
            Volume::from_milli(2_500)
        );
        assert!(matches!(
            Volume::from_milli(i64::MAX).try_add(Volume::from_milli(1)),
            Err(EngineError::Validation(_))
        ));
        assert!(Volume::from_milli(i64::MIN).try_sub(Volume::from_milli(1)).is_err());
    }

    #[test]
    fn parses_up_to_three_decimals() {
        assert_eq!("150".parse::<Volume>().unwrap().milli(), 150_000);
        assert_eq!("150.0".parse::<Volume>().unwrap().milli(), 150_000);
        assert_eq!("12,345".parse::<Volume>().unwrap().milli(), 12_345);
        assert_eq!("0.5".parse::<Volume>().unwrap().milli(), 500);
        assert!("1.2345".parse::<Volume>().is_err());
        assert!("-1".parse::<Volume>().is_err());
        assert!("x".parse::<Volume>().is_err());
    }

    #[test]
    fn display_keeps_three_decimals() {
        assert_eq!(Volume::from_milli(50_000).to_string(), "50.000");
        assert_eq!(Volume::from_milli(-1_250).to_string(), "-1.250");
    }

    #[test]
    fn values_sale_volume_at_rate() {
        let volume = Volume::from_units(50);
        assert_eq!(volume.value_at(Money::new(9550)).unwrap(), Money::new(477_500));
        assert_eq!(Volume::ZERO.value_at(Money::new(9550)).unwrap(), Money::ZERO);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 0.005 units at 1.00 = 0.005 -> 0.01
        assert_eq!(Volume::from_milli(5).value_at(Money::new(100)).unwrap(), Money::new(1));
        // 0.004 units at 1.00 = 0.004 -> 0.00
        assert_eq!(Volume::from_milli(4).value_at(Money::new(100)).unwrap(), Money::ZERO);
        // 1.333 units at 10.01 = 13.34333 -> 13.34
        assert_eq!(
            Volume::from_milli(1_333).value_at(Money::new(1001)).unwrap(),
            Money::new(1334)
        );
        assert_eq!(Volume::from_milli(-5).value_at(Money::new(100)).unwrap(), Money::new(-1));
    }
}
