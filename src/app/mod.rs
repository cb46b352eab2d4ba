use std::fmt;

use crate::calendar::{self, CalendarDate, DisplayedPeriod, GridCell};
use crate::error::JournalResult;
use crate::storage::{key_for, NoteKey, NoteStore};

pub mod state;

pub use state::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    Saved,
    Deleted,
    NothingToDelete,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StatusMessage::Saved => "Note saved",
            StatusMessage::Deleted => "Note deleted",
            StatusMessage::NothingToDelete => "No note to delete",
        };
        f.write_str(text)
    }
}

/// Selected date, displayed month and editor buffer for one journal session.
#[derive(Debug)]
pub struct Journal {
    store: NoteStore,
    state: SessionState,
    today: CalendarDate,
    buffer: String,
    has_note: bool,
    status: Option<StatusMessage>,
}

impl Journal {
    /// Builds a journal without touching the store; call [`Journal::reload`] to fill the buffer.
    pub fn new(store: NoteStore, state: SessionState, today: CalendarDate) -> Self {
        Self {
            store,
            state,
            today,
            buffer: String::new(),
            has_note: false,
            status: None,
        }
    }

    pub fn open(store: NoteStore, state: SessionState, today: CalendarDate) -> JournalResult<Self> {
        let mut journal = Self::new(store, state, today);
        journal.reload()?;
        Ok(journal)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn today(&self) -> CalendarDate {
        self.today
    }

    pub fn selected(&self) -> CalendarDate {
        self.state.selected
    }

    pub fn displayed(&self) -> DisplayedPeriod {
        self.state.displayed
    }

    pub fn selected_key(&self) -> NoteKey {
        key_for(self.state.selected)
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn has_note(&self) -> bool {
        self.has_note
    }

    pub fn status(&self) -> Option<StatusMessage> {
        self.status
    }

    pub fn grid(&self) -> Vec<GridCell> {
        self.state.displayed.grid(self.today, self.state.selected)
    }

    pub fn shift_months(&mut self, delta: i32) {
        self.state.displayed = calendar::advance_month(self.state.displayed, delta);
    }

    pub fn shift_years(&mut self, delta: i32) {
        self.state.displayed = calendar::advance_year(self.state.displayed, delta);
    }

    pub fn show_period(&mut self, period: DisplayedPeriod) {
        self.state.displayed = period;
    }

    pub fn tap(&mut self, day: u32) -> JournalResult<CalendarDate> {
        let date = calendar::resolve_tap(self.state.displayed, day)?;
        self.select_date(date)?;
        Ok(date)
    }

    /// Moves the selection, then replaces the buffer with that day's saved note.
    pub fn select_date(&mut self, date: CalendarDate) -> JournalResult<()> {
        self.set_selected(date);
        self.reload()
    }

    /// Moves the selection and clears the buffer without reading the new day's note.
    pub fn set_selected(&mut self, date: CalendarDate) {
        self.state.selected = date;
        self.buffer.clear();
        self.has_note = false;
        self.status = None;
    }

    pub fn jump_to_today(&mut self) -> JournalResult<()> {
        self.state.displayed = self.today.period();
        self.select_date(self.today)
    }

    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Discards unsaved edits in favour of the stored version.
    pub fn reload(&mut self) -> JournalResult<()> {
        let loaded = self.store.load(&self.selected_key())?;
        self.has_note = loaded.is_some();
        self.buffer = loaded.unwrap_or_default();
        Ok(())
    }

    pub fn save(&mut self) -> JournalResult<()> {
        self.store.save(&self.selected_key(), &self.buffer)?;
        self.has_note = true;
        self.status = Some(StatusMessage::Saved);
        Ok(())
    }

    pub fn delete(&mut self) -> JournalResult<bool> {
        let removed = self.store.delete(&self.selected_key())?;
        self.status = Some(if removed {
            StatusMessage::Deleted
        } else {
            StatusMessage::NothingToDelete
        });
        self.reload()?;
        Ok(removed)
    }
}
