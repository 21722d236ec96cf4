use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// ISO 8601 week identifier in the form `YYYY-Www`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey(String);

impl WeekKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidWeekKey(pub String);

impl fmt::Display for InvalidWeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid week key: {:?}", self.0)
    }
}

impl std::error::Error for InvalidWeekKey {}

impl FromStr for WeekKey {
    type Err = InvalidWeekKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidWeekKey(value.to_string());
        let (year, week) = value.split_once("-W").ok_or_else(invalid)?;
        if year.len() != 4 || week.len() != 2 {
            return Err(invalid());
        }
        if !year.bytes().chain(week.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        match week.parse::<u32>() {
            Ok(1..=53) => Ok(Self(value.to_string())),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for WeekKey {
    type Error = InvalidWeekKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.0
    }
}

/// Week key for a calendar date. Weeks start on Monday and belong to the
/// year containing their Thursday.
pub fn week_key_for(date: NaiveDate) -> WeekKey {
    let iso = date.iso_week();
    WeekKey(format!("{}-W{:02}", iso.year(), iso.week()))
}

/// Uses the calendar date of `now` as seen in its own timezone; time of day
/// never affects the result.
pub fn current_week_key_at<Tz: TimeZone>(now: &DateTime<Tz>) -> WeekKey {
    week_key_for(now.date_naive())
}

/// Tracked weekdays, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        Day::ALL
            .into_iter()
            .find(|day| day.as_str() == normalized)
            .ok_or_else(|| format!("unknown day '{value}'"))
    }
}
