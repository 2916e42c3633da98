use std::{
    fmt::{Debug, Display},
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// A monetary amount as it appears in a pain document.
///
/// The raw value is kept as constructed. A caller-supplied amount with more
/// than two fractional digits stays that way, so validation can reject it
/// instead of silently rounding it into something the caller never wrote.
/// Sums of already-valid amounts are re-rounded to the nearest cent.
#[derive(PartialEq, Clone, Copy, Default, PartialOrd)]
pub struct Amount(f64);

impl Amount {
    pub fn new(units: i64, cents: i64) -> Self {
        Amount(units as f64 + cents as f64 / 100.0)
    }

    /// The value as rendered into `CtrlSum`/`InstdAmt`, always 2 decimals.
    pub fn xml_string(&self) -> String {
        format!("{:.2}", self.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// True when the amount equals its own 2-decimal rounding.
    pub fn is_whole_cents(&self) -> bool {
        (self.0 * 100.0).round() / 100.0 == self.0
    }

    fn round(mut self) -> Self {
        self.0 = (self.0 * 100.0).round() / 100.0;
        self
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount(value)
    }
}

impl From<f32> for Amount {
    fn from(value: f32) -> Self {
        Amount(value as f64)
    }
}

macro_rules! from_integer_type {
    ($($t:ty),* $(,)?) => {
        $(impl From<$t> for Amount {
            fn from(value: $t) -> Self {
                Amount(value as f64)
            }
        })*
    };
}

from_integer_type!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl FromStr for Amount {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let f = s.parse::<f64>().map_err(|_| "invalid amount format")?;
        Ok(Amount(f))
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0).round()
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0).round()
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount::default() - self
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Debug for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Amount").field(&self.0).finish()
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.xml_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::Amount;

    #[test]
    fn xml_string_is_two_decimals() {
        assert_eq!(Amount::from(50.23).xml_string(), "50.23");
        assert_eq!(Amount::new(7, 5).xml_string(), "7.05");
        assert_eq!(Amount::from(3).xml_string(), "3.00");
    }

    #[test]
    fn raw_value_survives_construction() {
        let a = Amount::from(50.234);
        assert!(!a.is_whole_cents());
        assert!(Amount::from(50.23).is_whole_cents());
    }

    #[test]
    fn sum_rounds_to_cents() {
        let total: Amount = [50.23, 10.01, 0.10]
            .iter()
            .map(|v| Amount::from(*v))
            .sum();
        assert_eq!(total.xml_string(), "60.34");
    }
}
