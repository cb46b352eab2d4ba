use std::fmt::Write as _;

use crossterm::style::Stylize;

use crate::calendar::{CalendarDate, DisplayedPeriod, GridCell};
use crate::config::themes::Palette;

/// Lays the grid out seven cells per row under a month title.
pub fn render_calendar(
    period: DisplayedPeriod,
    cells: &[GridCell],
    palette: Option<&Palette>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(&mut out, "{}", period.title());
    for row in cells.chunks(7) {
        let line = row
            .iter()
            .map(|cell| render_cell(cell, palette))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(&mut out, "{}", line.trim_end());
    }
    out
}

fn render_cell(cell: &GridCell, palette: Option<&Palette>) -> String {
    let text = match cell {
        GridCell::Blank => "  ".to_string(),
        GridCell::Header(weekday) => weekday.label().to_string(),
        GridCell::Day { day, .. } => format!("{day:>2}"),
    };
    match (palette, cell) {
        (Some(palette), GridCell::Day { .. }) => {
            let (fg, bg) = palette.colors_for(cell.highlight());
            text.with(fg).on(bg).to_string()
        }
        _ => text,
    }
}

pub fn date_heading(date: CalendarDate) -> String {
    format!("{} {}, {}", date.month_name(), date.day(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::build_grid;
    use crate::config::themes::ThemeName;

    fn date(year: i32, month: u8, day: u8) -> CalendarDate {
        CalendarDate::new(year, month, day).expect("valid date")
    }

    #[test]
    fn plain_february_2024_layout() {
        let cells = build_grid(2024, 2, date(2024, 2, 15), date(2024, 2, 1)).unwrap();
        let period = DisplayedPeriod::new(2024, 2).unwrap();
        let rendered = render_calendar(period, &cells, None);
        let first_week = format!("{}1  2  3", " ".repeat(13));
        let expected = vec![
            "February 2024",
            "Su Mo Tu We Th Fr Sa",
            first_week.as_str(),
            " 4  5  6  7  8  9 10",
            "11 12 13 14 15 16 17",
            "18 19 20 21 22 23 24",
            "25 26 27 28 29",
        ];
        assert_eq!(rendered.lines().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn colored_render_keeps_every_day() {
        let cells = build_grid(2024, 2, date(2024, 2, 15), date(2024, 2, 1)).unwrap();
        let period = DisplayedPeriod::new(2024, 2).unwrap();
        let palette = ThemeName::Dark.palette();
        let rendered = render_calendar(period, &cells, Some(&palette));
        assert_eq!(rendered.lines().count(), 7);
        for day in ["15", "29"] {
            assert!(rendered.contains(day), "missing day {day}");
        }
    }

    #[test]
    fn heading_spells_out_month() {
        assert_eq!(date_heading(date(2024, 1, 5)), "January 5, 2024");
    }
}
