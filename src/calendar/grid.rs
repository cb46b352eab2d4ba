use strum::IntoEnumIterator;

use super::{CalendarDate, DisplayedPeriod, Weekday};
use crate::error::JournalResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    Blank,
    Header(Weekday),
    Day {
        day: u8,
        is_today: bool,
        is_selected: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Plain,
    Today,
    Selected,
}

impl GridCell {
    /// Today's styling wins when a day is both today and selected.
    pub fn highlight(&self) -> Highlight {
        match *self {
            GridCell::Day { is_today: true, .. } => Highlight::Today,
            GridCell::Day {
                is_selected: true, ..
            } => Highlight::Selected,
            _ => Highlight::Plain,
        }
    }

    pub fn day(&self) -> Option<u8> {
        match *self {
            GridCell::Day { day, .. } => Some(day),
            _ => None,
        }
    }
}

pub fn build_grid(
    year: i32,
    month: u8,
    today: CalendarDate,
    selected: CalendarDate,
) -> JournalResult<Vec<GridCell>> {
    let period = DisplayedPeriod::new(year, month)?;
    Ok(period.grid(today, selected))
}

impl DisplayedPeriod {
    /// Headers, leading blanks, then one cell per day. The tail is not padded.
    pub fn grid(&self, today: CalendarDate, selected: CalendarDate) -> Vec<GridCell> {
        let blanks = usize::from(self.first_weekday().index());
        let days = self.days();
        let mut cells = Vec::with_capacity(7 + blanks + usize::from(days));
        cells.extend(Weekday::iter().map(GridCell::Header));
        cells.extend(std::iter::repeat(GridCell::Blank).take(blanks));
        let today = (today.period() == *self).then_some(today.day());
        let selected = (selected.period() == *self).then_some(selected.day());
        cells.extend((1..=days).map(|day| GridCell::Day {
            day,
            is_today: today == Some(day),
            is_selected: selected == Some(day),
        }));
        cells
    }
}
