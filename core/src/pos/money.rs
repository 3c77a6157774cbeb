use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Amount in whole cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Rounds to the nearest cent; `None` for negative or non-finite input.
    pub fn from_dollars(dollars: f64) -> Option<Self> {
        if !dollars.is_finite() || dollars < 0.0 {
            return None;
        }
        Some(Self((dollars * 100.0).round() as u64))
    }

    /// Lenient parse of spreadsheet price cells such as `"$3.49"` or `"1,299.00"`.
    pub fn parse(text: &str) -> Option<Self> {
        let cleaned: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        let mut parts = cleaned.split('.');
        let whole = parts.next().unwrap_or_default();
        let fraction = parts.next().unwrap_or_default();
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        format!("{}.{}", whole, fraction)
            .trim_end_matches('.')
            .parse::<f64>()
            .ok()
            .and_then(Self::from_dollars)
    }

    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Percentage of this amount rounded to the nearest cent.
    pub fn apply_rate(self, rate: f64) -> Self {
        Self((self.0 as f64 * rate).round().max(0.0) as u64)
    }

    pub fn checked_sub(self, other: Money) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_price_cells() {
        assert_eq!(Money::parse("$3.49"), Some(Money::from_cents(349)));
        assert_eq!(Money::parse("1,299.00"), Some(Money::from_cents(129_900)));
        assert_eq!(Money::parse("12"), Some(Money::from_cents(1200)));
        assert_eq!(Money::parse(".5"), Some(Money::from_cents(50)));
        assert_eq!(Money::parse("n/a"), None);
        assert_eq!(Money::parse("."), None);
    }

    #[test]
    fn arithmetic_saturates() {
        let huge = Money::from_cents(u64::MAX - 1);
        assert_eq!(huge.times(u32::MAX), Money::from_cents(u64::MAX));
        assert_eq!(huge + Money::from_cents(5), Money::from_cents(u64::MAX));
        assert_eq!(Money::from_cents(250).times(3), Money::from_cents(750));
    }

    #[test]
    fn displays_as_dollars() {
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(12_345).to_string(), "$123.45");
    }

    #[test]
    fn tax_rounds_to_nearest_cent() {
        assert_eq!(Money::from_cents(699).apply_rate(0.0825), Money::from_cents(58));
        assert_eq!(Money::ZERO.apply_rate(0.0825), Money::ZERO);
    }

    #[test]
    fn rejects_negative_dollars() {
        assert_eq!(Money::from_dollars(-1.0), None);
        assert_eq!(Money::from_dollars(f64::NAN), None);
    }
}
