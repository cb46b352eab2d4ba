use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::calendar::CalendarDate;
use crate::error::{JournalError, JournalResult};

static KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]+)_([0-9]{1,2})_(-?[0-9]+)$").expect("valid note key regex"));

// Fixed table so keys never depend on the process locale.
const KEY_MONTHS: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// File name of the note for one calendar day, e.g. `JANUARY_5_2024`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteKey {
    value: String,
    date: CalendarDate,
}

impl NoteKey {
    pub fn for_date(date: CalendarDate) -> Self {
        let month = KEY_MONTHS[usize::from(date.month() - 1)];
        Self {
            value: format!("{month}_{}_{}", date.day(), date.year()),
            date,
        }
    }

    pub fn parse(raw: &str) -> JournalResult<Self> {
        let invalid = || JournalError::invalid(format!("malformed note key {raw:?}"));
        let caps = KEY_PATTERN.captures(raw).ok_or_else(invalid)?;
        let month = KEY_MONTHS
            .iter()
            .position(|name| *name == &caps[1])
            .ok_or_else(invalid)?;
        let day = caps[2].parse::<u8>().map_err(|_| invalid())?;
        let year = caps[3].parse::<i32>().map_err(|_| invalid())?;
        let date = CalendarDate::new(year, month as u8 + 1, day)?;
        let key = Self::for_date(date);
        // Rejects non-canonical spellings such as a zero-padded day.
        if key.value != raw {
            return Err(invalid());
        }
        Ok(key)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn date(&self) -> CalendarDate {
        self.date
    }
}

pub fn key_for(date: CalendarDate) -> NoteKey {
    NoteKey::for_date(date)
}

impl FromStr for NoteKey {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteKey::parse(s)
    }
}

impl fmt::Display for NoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for NoteKey {
    fn as_ref(&self) -> &str {
        &self.value
    }
}
