use std::fmt::Write as _;
use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use clap::Args;
use time::OffsetDateTime;

use crate::app::Journal;
use crate::calendar::{CalendarDate, DisplayedPeriod};
use crate::cli::render;
use crate::config::themes::Palette;
use crate::preferences::{self, PreferenceStore, Settings};

#[derive(Args, Debug, Clone, Default)]
pub struct CalendarArgs {
    /// Jump to a month (YYYY-MM) before applying any shifts
    #[arg(long)]
    pub month: Option<DisplayedPeriod>,
    /// Move forward this many months
    #[arg(long, default_value_t = 0)]
    pub next: u16,
    /// Move back this many months
    #[arg(long, default_value_t = 0)]
    pub prev: u16,
    /// Move forward this many years
    #[arg(long, default_value_t = 0)]
    pub next_year: u16,
    /// Move back this many years
    #[arg(long, default_value_t = 0)]
    pub prev_year: u16,
}

#[derive(Args, Debug, Clone)]
pub struct SelectArgs {
    /// Day of the displayed month
    pub day: u32,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DateArgs {
    /// Date to act on (YYYY-MM-DD); defaults to the selected date
    pub date: Option<CalendarDate>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct WriteArgs {
    /// Date to write (YYYY-MM-DD); defaults to the selected date
    pub date: Option<CalendarDate>,
    /// Provide the note body inline. If omitted, reads from stdin.
    #[arg(long)]
    pub body: Option<String>,
    /// Allow an empty body to replace the stored note
    #[arg(long)]
    pub allow_empty: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Switch dark mode on or off
    #[arg(long)]
    pub dark_mode: Option<bool>,
    /// Text size, clamped to 12..=24
    #[arg(long)]
    pub font_size: Option<i64>,
}

pub fn local_today() -> CalendarDate {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
        .into()
}

pub fn calendar(journal: &mut Journal, args: CalendarArgs, palette: Option<&Palette>) -> String {
    if let Some(period) = args.month {
        journal.show_period(period);
    }
    journal.shift_months(i32::from(args.next) - i32::from(args.prev));
    journal.shift_years(i32::from(args.next_year) - i32::from(args.prev_year));

    let mut out = render::render_calendar(journal.displayed(), &journal.grid(), palette);
    let _ = writeln!(
        &mut out,
        "\ntoday {}  selected {}",
        journal.today(),
        journal.selected()
    );
    out
}

pub fn select(journal: &mut Journal, args: SelectArgs) -> Result<String> {
    journal
        .tap(args.day)
        .with_context(|| format!("selecting day {} of {}", args.day, journal.displayed()))?;
    Ok(format_note(journal))
}

pub fn today(journal: &mut Journal) -> Result<String> {
    journal.jump_to_today().context("loading today's note")?;
    Ok(format_note(journal))
}

pub fn show(journal: &mut Journal, args: DateArgs) -> Result<String> {
    focus(journal, args.date);
    journal
        .reload()
        .with_context(|| format!("loading note for {}", journal.selected()))?;
    Ok(format_note(journal))
}

pub fn write(journal: &mut Journal, args: WriteArgs) -> Result<String> {
    let piped = if args.body.is_none() {
        read_stdin()?
    } else {
        None
    };
    write_body(journal, args, piped)
}

fn write_body(journal: &mut Journal, args: WriteArgs, piped: Option<String>) -> Result<String> {
    let Some(body) = args.body.or(piped) else {
        bail!("no note body (pass --body or pipe text)");
    };
    if body.is_empty() && !args.allow_empty {
        bail!("refusing to save an empty note (pass --allow-empty to clear it)");
    }
    focus(journal, args.date);
    journal.set_buffer(body);
    journal
        .save()
        .with_context(|| format!("saving note for {}", journal.selected()))?;
    Ok(format_status(journal))
}

pub fn delete(journal: &mut Journal, args: DateArgs) -> Result<String> {
    focus(journal, args.date);
    journal
        .delete()
        .with_context(|| format!("deleting note for {}", journal.selected()))?;
    Ok(format_status(journal))
}

pub fn settings(store: &mut impl PreferenceStore, args: SettingsArgs) -> Result<String> {
    if let Some(enabled) = args.dark_mode {
        preferences::set_dark_mode(store, enabled).context("saving dark mode")?;
    }
    if let Some(size) = args.font_size {
        let stored = preferences::set_font_size(store, size).context("saving font size")?;
        if i64::from(stored) != size {
            tracing::info!(requested = size, stored, "font size clamped");
        }
    }
    let settings = Settings::load(&*store);
    let mut out = String::new();
    let _ = writeln!(&mut out, "theme      {}", settings.theme());
    let _ = writeln!(&mut out, "font size  {}", settings.font_size);
    Ok(out)
}

fn focus(journal: &mut Journal, date: Option<CalendarDate>) {
    if let Some(date) = date {
        journal.show_period(date.period());
        journal.set_selected(date);
    }
}

fn format_note(journal: &Journal) -> String {
    let mut out = String::new();
    let _ = writeln!(&mut out, "{}", render::date_heading(journal.selected()));
    if journal.has_note() {
        out.push_str(journal.buffer());
        if !journal.buffer().ends_with('\n') {
            out.push('\n');
        }
    } else {
        out.push_str("(no note)\n");
    }
    out
}

fn format_status(journal: &Journal) -> String {
    match journal.status() {
        Some(status) => format!("{status} ({})\n", journal.selected()),
        None => String::new(),
    }
}

fn read_stdin() -> Result<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("reading note body from stdin")?;
    Ok(Some(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::app::SessionState;
    use crate::config::StorageOptions;
    use crate::preferences::MemoryPreferenceStore;
    use crate::storage::NoteStore;
    use tempfile::TempDir;

    type TestResult<T = ()> = Result<T>;

    fn date(year: i32, month: u8, day: u8) -> CalendarDate {
        CalendarDate::new(year, month, day).expect("valid date")
    }

    fn setup_journal(today: CalendarDate) -> TestResult<(TempDir, Journal)> {
        let temp = TempDir::new()?;
        let store = NoteStore::open(temp.path().join("notes"), &StorageOptions::default())?;
        let journal = Journal::new(store, SessionState::starting_at(today), today);
        Ok((temp, journal))
    }

    #[test]
    fn write_then_show_prints_the_note() -> TestResult {
        let (_temp, mut journal) = setup_journal(date(2024, 2, 15))?;
        let status = write(
            &mut journal,
            WriteArgs {
                date: Some(date(2024, 1, 5)),
                body: Some("walked the dog".into()),
                ..WriteArgs::default()
            },
        )?;
        assert_eq!(status, "Note saved (2024-01-05)\n");
        assert_eq!(journal.displayed(), DisplayedPeriod::new(2024, 1)?);

        let output = show(&mut journal, DateArgs::default())?;
        assert_eq!(output, "January 5, 2024\nwalked the dog\n");
        Ok(())
    }

    #[test]
    fn write_without_body_keeps_the_stored_note() -> TestResult {
        let (_temp, mut journal) = setup_journal(date(2024, 2, 15))?;
        journal.set_buffer("precious entry");
        journal.save()?;

        let err = write_body(&mut journal, WriteArgs::default(), None).unwrap_err();
        assert!(err.to_string().contains("no note body"));
        let err = write_body(&mut journal, WriteArgs::default(), Some(String::new())).unwrap_err();
        assert!(err.to_string().contains("--allow-empty"));

        let output = show(&mut journal, DateArgs::default())?;
        assert_eq!(output, "February 15, 2024\nprecious entry\n");
        Ok(())
    }

    #[test]
    fn allow_empty_clears_the_note() -> TestResult {
        let (_temp, mut journal) = setup_journal(date(2024, 2, 15))?;
        journal.set_buffer("draft");
        journal.save()?;

        let args = WriteArgs {
            allow_empty: true,
            ..WriteArgs::default()
        };
        let status = write_body(&mut journal, args, Some(String::new()))?;
        assert_eq!(status, "Note saved (2024-02-15)\n");
        journal.reload()?;
        assert!(journal.has_note());
        assert_eq!(journal.buffer(), "");
        Ok(())
    }

    #[test]
    fn piped_body_is_saved() -> TestResult {
        let (_temp, mut journal) = setup_journal(date(2024, 2, 15))?;
        let status = write_body(&mut journal, WriteArgs::default(), Some("from stdin\n".into()))?;
        assert_eq!(status, "Note saved (2024-02-15)\n");
        let output = show(&mut journal, DateArgs::default())?;
        assert_eq!(output, "February 15, 2024\nfrom stdin\n");
        Ok(())
    }

    #[test]
    fn unreadable_note_can_still_be_deleted() -> TestResult {
        let (temp, mut journal) = setup_journal(date(2024, 2, 15))?;
        fs::write(temp.path().join("notes").join("FEBRUARY_15_2024"), [0xff, 0xfe, 0x00])?;

        let output = calendar(&mut journal, CalendarArgs::default(), None);
        assert!(output.starts_with("February 2024\n"));
        let err = show(&mut journal, DateArgs::default()).unwrap_err();
        assert!(format!("{err:#}").contains("loading note for 2024-02-15"));

        let output = delete(&mut journal, DateArgs::default())?;
        assert_eq!(output, "Note deleted (2024-02-15)\n");
        let output = show(&mut journal, DateArgs::default())?;
        assert_eq!(output, "February 15, 2024\n(no note)\n");
        Ok(())
    }

    #[test]
    fn show_marks_missing_notes() -> TestResult {
        let (_temp, mut journal) = setup_journal(date(2024, 2, 15))?;
        let output = show(&mut journal, DateArgs::default())?;
        assert_eq!(output, "February 15, 2024\n(no note)\n");
        Ok(())
    }

    #[test]
    fn delete_reports_missing_note() -> TestResult {
        let (_temp, mut journal) = setup_journal(date(2024, 2, 15))?;
        let output = delete(&mut journal, DateArgs::default())?;
        assert_eq!(output, "No note to delete (2024-02-15)\n");
        Ok(())
    }

    #[test]
    fn calendar_shifts_then_renders() -> TestResult {
        let (_temp, mut journal) = setup_journal(date(2024, 2, 15))?;
        let output = calendar(
            &mut journal,
            CalendarArgs {
                month: Some(DisplayedPeriod::new(2023, 12)?),
                next: 3,
                prev: 1,
                ..CalendarArgs::default()
            },
            None,
        );
        assert!(output.starts_with("February 2024\n"));
        assert!(output.ends_with("today 2024-02-15  selected 2024-02-15\n"));
        Ok(())
    }

    #[test]
    fn select_out_of_range_day_fails() -> TestResult {
        let (_temp, mut journal) = setup_journal(date(2023, 2, 15))?;
        let err = select(&mut journal, SelectArgs { day: 30 }).unwrap_err();
        assert!(format!("{err:#}").contains("selecting day 30 of 2023-02"));
        Ok(())
    }

    #[test]
    fn settings_updates_and_reports() -> TestResult {
        let mut store = MemoryPreferenceStore::default();
        let output = settings(
            &mut store,
            SettingsArgs {
                dark_mode: Some(true),
                font_size: Some(30),
            },
        )?;
        assert_eq!(output, "theme      dark\nfont size  24\n");
        Ok(())
    }
}
