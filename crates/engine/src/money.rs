use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Signed money amount represented as **integer minor units** (two decimals).
///
/// Every monetary value of the back-office (fuel prices, sale revenue,
/// expenses, deposits, carried balances) goes through this type so that no
/// floating-point drift ever reaches a settlement.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(4775_00);
/// assert_eq!(amount.minor(), 477500);
/// assert_eq!(amount.to_string(), "4775.00");
/// assert_eq!("95,5".parse::<Money>().unwrap().minor(), 9550);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Addition that reports overflow as a validation error.
    pub fn try_add(self, rhs: Money) -> ResultEngine<Money> {
        self.checked_add(rhs).ok_or_else(amount_overflow)
    }

    pub fn try_sub(self, rhs: Money) -> ResultEngine<Money> {
        self.checked_sub(rhs).ok_or_else(amount_overflow)
    }

    /// Sum of `values`, failing instead of wrapping or panicking on overflow.
    pub fn try_sum<I: IntoIterator<Item = Money>>(values: I) -> ResultEngine<Money> {
        values
            .into_iter()
            .try_fold(Money::ZERO, |acc, value| acc.try_add(value))
    }
}

fn amount_overflow() -> EngineError {
    EngineError::Validation("amount too large".to_string())
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
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

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// Rejects more than 2 fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, digits) = split_sign(s)?;
        let minor = parse_fixed(digits, 2, "amount")?;
        let signed = if negative {
            minor
                .checked_neg()
                .ok_or_else(|| EngineError::Validation("amount too large".to_string()))?
        } else {
            minor
        };
        Ok(Money(signed))
    }
}

/// Splits an optional sign from a trimmed decimal literal.
pub(crate) fn split_sign(raw: &str) -> Result<(bool, &str), EngineError> {
    let trimmed = raw.trim();
    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(EngineError::Validation("empty number".to_string()));
    }
    Ok((negative, rest))
}

/// Parses an unsigned decimal literal into an integer scaled by `10^scale`.
///
/// `label` names the quantity in error messages.
pub(crate) fn parse_fixed(digits: &str, scale: u32, label: &str) -> Result<i64, EngineError> {
    let invalid = || EngineError::Validation(format!("invalid {label}: {digits}"));
    let overflow = || EngineError::Validation(format!("{label} too large"));

    let normalized = digits.replace(',', ".");
    let mut parts = normalized.split('.');
    let whole = parts.next().ok_or_else(invalid)?;
    let frac = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        return Err(invalid());
    }
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > scale as usize {
        return Err(EngineError::Validation(format!(
            "invalid {label}: at most {scale} decimals allowed"
        )));
    }

    let factor = 10i64.pow(scale);
    let whole: i64 = whole.parse().map_err(|_| overflow())?;
    let frac_value: i64 = if frac.is_empty() {
        0
    } else {
        let padding = 10i64.pow(scale - frac.len() as u32);
        frac.parse::<i64>().map_err(|_| invalid())? * padding
    };

    whole
        .checked_mul(factor)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_sum_reports_overflow() {
        assert_eq!(
            Money::try_sum([Money::new(100), Money::new(250)]).unwrap(),
            Money::new(350)
        );
        assert!(matches!(
            Money::try_sum([Money::new(i64::MAX), Money::new(1)]),
            Err(EngineError::Validation(_))
        ));
        assert!(Money::new(i64::MIN).try_sub(Money::new(1)).is_err());
    }

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(477500).to_string(), "4775.00");
        assert_eq!(Money::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
        assert_eq!("95.5".parse::<Money>().unwrap().minor(), 9550);
        assert_eq!("10,50".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().minor(), -1);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().minor(), 230);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn sums_iterators() {
        let total: Money = [Money::new(100), Money::new(250), Money::new(-50)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::new(300));
    }
}
