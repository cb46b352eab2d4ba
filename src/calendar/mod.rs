use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{EnumIter, IntoStaticStr};
use time::macros::format_description;

use crate::error::{JournalError, JournalResult};

mod grid;

pub use grid::{build_grid, GridCell, Highlight};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// Sakamoto's month offsets for day-of-week arithmetic.
const WEEKDAY_OFFSETS: [i64; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr)]
pub enum Weekday {
    #[strum(serialize = "Su")]
    Sunday,
    #[strum(serialize = "Mo")]
    Monday,
    #[strum(serialize = "Tu")]
    Tuesday,
    #[strum(serialize = "We")]
    Wednesday,
    #[strum(serialize = "Th")]
    Thursday,
    #[strum(serialize = "Fr")]
    Friday,
    #[strum(serialize = "Sa")]
    Saturday,
}

impl Weekday {
    const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// 0 for Sunday through 6 for Saturday.
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        self.into()
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u8) -> JournalResult<u8> {
    check_month(month)?;
    Ok(month_length(year, month))
}

pub fn first_weekday(year: i32, month: u8) -> JournalResult<Weekday> {
    check_month(month)?;
    Ok(weekday_of(year, month, 1))
}

pub fn month_name(month: u8) -> JournalResult<&'static str> {
    check_month(month)?;
    Ok(MONTH_NAMES[usize::from(month - 1)])
}

/// Clamps at January of `i32::MIN` and December of `i32::MAX`.
pub fn advance_month(period: DisplayedPeriod, delta: i32) -> DisplayedPeriod {
    let index = (i64::from(period.year) * 12 + i64::from(period.month - 1) + i64::from(delta))
        .clamp(i64::from(i32::MIN) * 12, i64::from(i32::MAX) * 12 + 11);
    DisplayedPeriod {
        year: index.div_euclid(12) as i32,
        month: index.rem_euclid(12) as u8 + 1,
    }
}

pub fn advance_year(period: DisplayedPeriod, delta: i32) -> DisplayedPeriod {
    DisplayedPeriod {
        year: period.year.saturating_add(delta),
        month: period.month,
    }
}

pub fn resolve_tap(period: DisplayedPeriod, day: u32) -> JournalResult<CalendarDate> {
    let days = period.days();
    let day = u8::try_from(day)
        .ok()
        .filter(|day| (1..=days).contains(day))
        .ok_or_else(|| {
            JournalError::invalid(format!("day {day} is outside {period} (1..={days})"))
        })?;
    Ok(CalendarDate {
        year: period.year,
        month: period.month,
        day,
    })
}

fn check_month(month: u8) -> JournalResult<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(JournalError::invalid(format!(
            "month {month} is outside 1..=12"
        )))
    }
}

fn month_length(year: i32, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

fn weekday_of(year: i32, month: u8, day: u8) -> Weekday {
    let y = i64::from(year) - i64::from(month < 3);
    let raw = y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        + WEEKDAY_OFFSETS[usize::from(month - 1)]
        + i64::from(day);
    Weekday::ALL[raw.rem_euclid(7) as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CalendarDate {
    year: i32,
    month: u8,
    day: u8,
}

impl CalendarDate {
    pub fn new(year: i32, month: u8, day: u8) -> JournalResult<Self> {
        let days = days_in_month(year, month)?;
        if day == 0 || day > days {
            return Err(JournalError::invalid(format!(
                "day {day} is outside {year}-{month:02} (1..={days})"
            )));
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn period(&self) -> DisplayedPeriod {
        DisplayedPeriod {
            year: self.year,
            month: self.month,
        }
    }

    pub fn weekday(&self) -> Weekday {
        weekday_of(self.year, self.month, self.day)
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[usize::from(self.month - 1)]
    }
}

impl From<time::Date> for CalendarDate {
    fn from(date: time::Date) -> Self {
        Self {
            year: date.year(),
            month: date.month() as u8,
            day: date.day(),
        }
    }
}

impl FromStr for CalendarDate {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = format_description!("[year]-[month]-[day]");
        time::Date::parse(s.trim(), format)
            .map(CalendarDate::from)
            .map_err(|err| JournalError::invalid(format!("invalid date {s:?}: {err}")))
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Parts {
            year: i32,
            month: u8,
            day: u8,
        }
        let parts = Parts::deserialize(deserializer)?;
        CalendarDate::new(parts.year, parts.month, parts.day).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DisplayedPeriod {
    year: i32,
    month: u8,
}

impl DisplayedPeriod {
    pub fn new(year: i32, month: u8) -> JournalResult<Self> {
        check_month(month)?;
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn days(&self) -> u8 {
        month_length(self.year, self.month)
    }

    pub fn first_weekday(&self) -> Weekday {
        weekday_of(self.year, self.month, 1)
    }

    /// Human title such as "February 2024".
    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[usize::from(self.month - 1)], self.year)
    }
}

impl FromStr for DisplayedPeriod {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || JournalError::invalid(format!("invalid month {s:?}, expected YYYY-MM"));
        let (year, month) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u8>().map_err(|_| invalid())?;
        DisplayedPeriod::new(year, month)
    }
}

impl fmt::Display for DisplayedPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl<'de> Deserialize<'de> for DisplayedPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Parts {
            year: i32,
            month: u8,
        }
        let parts = Parts::deserialize(deserializer)?;
        DisplayedPeriod::new(parts.year, parts.month).map_err(serde::de::Error::custom)
    }
}
