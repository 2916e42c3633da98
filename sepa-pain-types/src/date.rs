use std::{
    fmt::Display,
    ops::{Deref, DerefMut},
};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar date, rendered as `YYYY-MM-DD` wherever pain documents need
/// one (`ReqdColltnDt`, `ReqdExctnDt`, `DtOfSgntr`).
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct Date {
    date: NaiveDate,
}

impl Default for Date {
    fn default() -> Self {
        Self::today()
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format!(
            "{:04}-{:02}-{:02}",
            self.date.year_ce().1,
            self.date.month(),
            self.date.day()
        ))
    }
}

impl Date {
    /// `None` when the components do not resolve to a real calendar date.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        Some(Self {
            date: NaiveDate::from_ymd_opt(year, month, day)?,
        })
    }

    pub fn today() -> Self {
        Self {
            date: chrono::Local::now().date_naive(),
        }
    }

    pub fn in_days(days: u64) -> Self {
        let now = chrono::Local::now();
        let res = now.checked_add_days(Days::new(days)).unwrap_or(now);
        Self {
            date: res.date_naive(),
        }
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Deref for Date {
    type Target = NaiveDate;

    fn deref(&self) -> &Self::Target {
        &self.date
    }
}

impl DerefMut for Date {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.date
    }
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let mut parts = s.split('-');
        let year = parts
            .next()
            .ok_or_else(|| serde::de::Error::custom("Missing Year in Date"))?;
        let month = parts
            .next()
            .ok_or_else(|| serde::de::Error::custom("Missing Month in Date"))?;
        let day = parts
            .next()
            .ok_or_else(|| serde::de::Error::custom("Missing Day in Date"))?;
        let year = year
            .parse()
            .map_err(|_| serde::de::Error::custom("Year is not a number"))?;
        let month = month
            .parse()
            .map_err(|_| serde::de::Error::custom("Month is not a number"))?;
        let day = day
            .parse()
            .map_err(|_| serde::de::Error::custom("Day is not a number"))?;

        Self::new(year, month, day)
            .ok_or_else(|| serde::de::Error::custom(format!("{} is not a valid date", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::Date;

    #[test]
    fn display_is_iso() {
        let d = Date::new(2014, 2, 1).unwrap();
        assert_eq!(d.to_string(), "2014-02-01");
    }

    #[test]
    fn impossible_date_is_rejected() {
        assert!(Date::new(2014, 2, 30).is_none());
        assert!(Date::new(2014, 13, 1).is_none());
    }
}
