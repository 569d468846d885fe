use crate::config::Config;
use crate::error::ScoreError;
use crate::export::{resolve_export_path, write_export};
use crate::session::Session;
use crate::store::{ScoreTable, StudentRecord};
use crate::tui::theme::ThemeColors;
use std::time::Instant;

const FLASH_SECS: u64 = 3;
const MAX_SCORE: u16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    Profile,
    Data,
}

impl View {
    pub const ALL: [View; 3] = [View::Overview, View::Profile, View::Data];

    pub fn title(self) -> &'static str {
        match self {
            View::Overview => "Class Overview",
            View::Profile => "Student Profile",
            View::Data => "Data Table",
        }
    }

    pub fn index(self) -> usize {
        match self {
            View::Overview => 0,
            View::Profile => 1,
            View::Data => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Entry,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

/// Fields of the entry form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    StudentId,
    Name,
    Chinese,
    Math,
    English,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::StudentId,
        Field::Name,
        Field::Chinese,
        Field::Math,
        Field::English,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::StudentId => "Student ID",
            Field::Name => "Name",
            Field::Chinese => "Chinese",
            Field::Math => "Math",
            Field::English => "English",
        }
    }

    pub fn is_score(self) -> bool {
        matches!(self, Field::Chinese | Field::Math | Field::English)
    }
}

/// Input buffer for a new record
#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    values: [String; 5],
    focus: usize,
}

impl EntryForm {
    pub fn focused(&self) -> Field {
        Field::ALL[self.focus]
    }

    pub fn value(&self, field: Field) -> &str {
        &self.values[field_index(field)]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % Field::ALL.len();
    }

    pub fn previous_field(&mut self) {
        self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len();
    }

    /// Type a character into the focused field.
    /// Score fields take digits only and saturate at 100.
    pub fn push_char(&mut self, c: char) {
        let field = self.focused();
        let value = &mut self.values[self.focus];
        if field.is_score() {
            if !c.is_ascii_digit() {
                return;
            }
            value.push(c);
            let parsed: u16 = value.parse().unwrap_or(MAX_SCORE);
            *value = parsed.min(MAX_SCORE).to_string();
        } else if !c.is_control() {
            value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.values[self.focus].pop();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Build the record; empty score fields count as 0
    pub fn to_record(&self) -> StudentRecord {
        let score = |field: Field| -> u8 {
            self.value(field)
                .parse::<u16>()
                .map(|s| s.min(MAX_SCORE) as u8)
                .unwrap_or(0)
        };
        StudentRecord::new(
            self.value(Field::StudentId),
            self.value(Field::Name),
            score(Field::Chinese),
            score(Field::Math),
            score(Field::English),
        )
    }
}

fn field_index(field: Field) -> usize {
    match field {
        Field::StudentId => 0,
        Field::Name => 1,
        Field::Chinese => 2,
        Field::Math => 3,
        Field::English => 4,
    }
}

pub struct App {
    pub session: Session,
    pub config: Config,
    pub theme: ThemeColors,
    pub current_view: View,
    pub input_mode: InputMode,
    pub entry: EntryForm,
    pub table_state: ratatui::widgets::TableState,
    pub profile_index: usize,
    pub flash_message: Option<(String, FlashKind, Instant)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session, config: Config, theme: ThemeColors) -> Self {
        let mut table_state = ratatui::widgets::TableState::default();
        if !session.table().is_empty() {
            table_state.select(Some(0));
        }

        Self {
            session,
            config,
            theme,
            current_view: View::Overview,
            input_mode: InputMode::Normal,
            entry: EntryForm::default(),
            table_state,
            profile_index: 0,
            flash_message: None,
            should_quit: false,
        }
    }

    pub fn table(&self) -> &ScoreTable {
        self.session.table()
    }

    pub fn select_view(&mut self, view: View) {
        self.current_view = view;
    }

    pub fn next_view(&mut self) {
        let next = (self.current_view.index() + 1) % View::ALL.len();
        self.current_view = View::ALL[next];
    }

    pub fn previous_view(&mut self) {
        let prev = (self.current_view.index() + View::ALL.len() - 1) % View::ALL.len();
        self.current_view = View::ALL[prev];
    }

    /// Move down in the current view's list (students on Profile, rows on Data)
    pub fn next_row(&mut self) {
        match self.current_view {
            View::Profile => {
                let count = self.table().names().len();
                if count > 0 {
                    self.profile_index = (self.profile_index + 1) % count;
                }
            }
            View::Data => {
                let count = self.table().len();
                if count == 0 {
                    return;
                }
                let i = match self.table_state.selected() {
                    Some(i) if i + 1 < count => i + 1,
                    _ => 0,
                };
                self.table_state.select(Some(i));
            }
            View::Overview => {}
        }
    }

    pub fn previous_row(&mut self) {
        match self.current_view {
            View::Profile => {
                let count = self.table().names().len();
                if count > 0 {
                    self.profile_index = (self.profile_index + count - 1) % count;
                }
            }
            View::Data => {
                let count = self.table().len();
                if count == 0 {
                    return;
                }
                let i = match self.table_state.selected() {
                    Some(0) | None => count - 1,
                    Some(i) => i - 1,
                };
                self.table_state.select(Some(i));
            }
            View::Overview => {}
        }
    }

    /// The record shown on the Profile tab: the first one with the picked name
    pub fn selected_profile(&self) -> Option<&StudentRecord> {
        let names = self.table().names();
        names
            .get(self.profile_index)
            .and_then(|name| self.table().find_by_name(name))
    }

    pub fn start_entry(&mut self) {
        self.input_mode = InputMode::Entry;
    }

    pub fn cancel_entry(&mut self) {
        self.input_mode = InputMode::Normal;
        self.entry.clear();
        self.show_flash("Entry discarded".to_string(), FlashKind::Info);
    }

    /// Submit the entry form. The form stays open on validation errors so the
    /// user can fill in what is missing.
    pub fn submit_entry(&mut self) {
        let record = self.entry.to_record();
        match self.session.submit(record) {
            Ok(name) => {
                self.entry.clear();
                self.input_mode = InputMode::Normal;
                self.clamp_selection();
                self.show_flash(format!("Saved scores for {}", name), FlashKind::Success);
            }
            Err(ScoreError::Validation(_)) => {
                self.show_flash("Please enter student ID and name".to_string(), FlashKind::Error);
            }
            Err(e) => {
                tracing::error!(error = %e, "saving scores failed");
                self.input_mode = InputMode::Normal;
                self.show_flash(format!("Failed to save: {}", e), FlashKind::Error);
            }
        }
    }

    /// Reload the table from disk, keeping the current one if that fails
    pub fn reload(&mut self) {
        match self.session.reload() {
            Ok(count) => {
                self.clamp_selection();
                self.show_flash(format!("Reloaded ({} students)", count), FlashKind::Success);
            }
            Err(e) => {
                tracing::error!(error = %e, "reload failed");
                self.show_flash(format!("Failed to reload: {}", e), FlashKind::Error);
            }
        }
    }

    /// Write the export artifact next to the data file
    pub fn export(&mut self) {
        let path = resolve_export_path(
            self.session.store().path(),
            self.config.export_file_name(),
        );
        match write_export(self.session.table(), &path) {
            Ok(()) => self.show_flash(format!("Exported to {}", path.display()), FlashKind::Success),
            Err(e) => self.show_flash(format!("Failed to export: {}", e), FlashKind::Error),
        }
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn show_flash(&mut self, msg: String, kind: FlashKind) {
        self.flash_message = Some((msg, kind, Instant::now()));
    }

    pub fn update_flash(&mut self) {
        if let Some((_, _, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    /// Keep selections valid after the table was replaced
    fn clamp_selection(&mut self) {
        let rows = self.table().len();
        if rows == 0 {
            self.table_state.select(None);
        } else {
            match self.table_state.selected() {
                Some(i) if i >= rows => self.table_state.select(Some(rows - 1)),
                None => self.table_state.select(Some(0)),
                _ => {}
            }
        }

        let names = self.table().names().len();
        if self.profile_index >= names {
            self.profile_index = names.saturating_sub(1);
        }
    }
}
