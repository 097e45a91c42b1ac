//! TUI application state
//!
//! Translates key presses into form events, runs the resulting effects and
//! keeps the view-only state (focus, cursors, status line). All domain state
//! lives in the [`Registry`].

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::core::{
    EntryPersistence, FormEvent, Gender, PreviewLoader, PreviewReady, Registry, TextField,
    SKILL_OPTIONS,
};

/// Focusable components, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    FullName,
    Email,
    Phone,
    Gender,
    Skills,
    ProfilePic,
    Register,
    Entries,
}

impl Focus {
    const ORDER: [Focus; 8] = [
        Focus::FullName,
        Focus::Email,
        Focus::Phone,
        Focus::Gender,
        Focus::Skills,
        Focus::ProfilePic,
        Focus::Register,
        Focus::Entries,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn text_field(self) -> Option<TextField> {
        match self {
            Focus::FullName => Some(TextField::FullName),
            Focus::Email => Some(TextField::Email),
            Focus::Phone => Some(TextField::Phone),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One-line feedback shown under the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

/// Interactive registration form
pub struct FormApp<P: EntryPersistence> {
    registry: Registry<P>,
    loader: PreviewLoader,
    preview_rx: mpsc::UnboundedReceiver<PreviewReady>,
    focus: Focus,
    skill_cursor: usize,
    picture_input: String,
    selected_entry: usize,
    status: Option<Status>,
    should_quit: bool,
}

impl<P: EntryPersistence> FormApp<P> {
    pub fn new(registry: Registry<P>, max_preview_bytes: u64) -> Self {
        let (loader, preview_rx) = PreviewLoader::new(max_preview_bytes);
        Self {
            registry,
            loader,
            preview_rx,
            focus: Focus::FullName,
            skill_cursor: 0,
            picture_input: String::new(),
            selected_entry: 0,
            status: None,
            should_quit: false,
        }
    }

    pub fn registry(&self) -> &Registry<P> {
        &self.registry
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn skill_cursor(&self) -> usize {
        self.skill_cursor
    }

    pub fn picture_input(&self) -> &str {
        &self.picture_input
    }

    pub fn selected_entry(&self) -> usize {
        self.selected_entry
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn preview_loading(&self) -> bool {
        self.loader.in_flight().is_some()
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: text.into(),
        });
    }

    /// Route an event into the registry and run its effect
    fn dispatch(&mut self, event: FormEvent) {
        if let Some(effect) = self.registry.dispatch(event) {
            self.loader.handle(effect);
        }
    }

    /// Apply finished preview reads
    pub fn poll_previews(&mut self) {
        while let Ok(ready) = self.preview_rx.try_recv() {
            let failed = ready.result.is_err();
            let event = self.loader.accept(ready);
            self.registry.dispatch(event);
            if failed && self.registry.form().preview_pending() && !self.preview_loading() {
                self.set_status(StatusKind::Info, "No preview available for this file");
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                self.should_quit = true;
                return;
            }
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
                self.submit();
                return;
            }
            (KeyCode::Tab, _) => {
                self.focus = self.focus.next();
                return;
            }
            (KeyCode::BackTab, _) => {
                self.focus = self.focus.previous();
                return;
            }
            _ => {}
        }

        if let Some(field) = self.focus.text_field() {
            self.edit_text(field, key);
            return;
        }

        match self.focus {
            Focus::Gender => self.edit_gender(key),
            Focus::Skills => self.edit_skills(key),
            Focus::ProfilePic => self.edit_picture(key),
            Focus::Register => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.submit();
                }
            }
            Focus::Entries => self.navigate_entries(key),
            Focus::FullName | Focus::Email | Focus::Phone => {}
        }
    }

    fn edit_text(&mut self, field: TextField, key: KeyEvent) {
        let mut value = self.registry.form().draft().text(field).to_string();
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => value.push(c),
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Enter => {
                self.focus = self.focus.next();
                return;
            }
            _ => return,
        }
        self.dispatch(FormEvent::Text { field, value });
    }

    fn edit_gender(&mut self, key: KeyEvent) {
        let current = self.registry.form().draft().gender;
        let gender = match key.code {
            KeyCode::Left | KeyCode::Char('m') | KeyCode::Char('M') => Gender::Male,
            KeyCode::Right | KeyCode::Char('f') | KeyCode::Char('F') => Gender::Female,
            KeyCode::Char(' ') => match current {
                Some(Gender::Male) => Gender::Female,
                _ => Gender::Male,
            },
            KeyCode::Enter => {
                self.focus = self.focus.next();
                return;
            }
            _ => return,
        };
        self.dispatch(FormEvent::Gender(gender));
    }

    fn edit_skills(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.skill_cursor = self.skill_cursor.saturating_sub(1),
            KeyCode::Right => {
                self.skill_cursor = (self.skill_cursor + 1).min(SKILL_OPTIONS.len() - 1)
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let skill = SKILL_OPTIONS[self.skill_cursor];
                self.dispatch(FormEvent::ToggleSkill(skill));
            }
            _ => {}
        }
    }

    fn edit_picture(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.picture_input.push(c)
            }
            KeyCode::Backspace => {
                self.picture_input.pop();
            }
            KeyCode::Enter => {
                let path = self.picture_input.trim();
                if path.is_empty() {
                    self.dispatch(FormEvent::FileSelected(None));
                    self.set_status(StatusKind::Info, "Picture cleared");
                } else {
                    let path = PathBuf::from(path);
                    self.set_status(
                        StatusKind::Info,
                        format!("Loading preview for {}", path.display()),
                    );
                    self.dispatch(FormEvent::FileSelected(Some(path)));
                }
            }
            _ => {}
        }
    }

    fn navigate_entries(&mut self, key: KeyEvent) {
        let count = self.registry.entries().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_entry = self.selected_entry.saturating_sub(1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_entry + 1 < count {
                    self.selected_entry += 1;
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => self.delete_selected(),
            _ => {}
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self
            .registry
            .entries()
            .get(self.selected_entry)
            .map(|entry| entry.id)
        else {
            return;
        };

        if self.registry.delete(id) {
            self.set_status(StatusKind::Success, format!("Deleted entry {}", id));
        }
        let count = self.registry.entries().len();
        self.selected_entry = self.selected_entry.min(count.saturating_sub(1));
    }

    pub fn submit(&mut self) {
        match self.registry.submit() {
            Ok(id) => {
                self.loader.cancel();
                self.picture_input.clear();
                self.skill_cursor = 0;
                self.selected_entry = 0;
                self.focus = Focus::FullName;
                self.set_status(StatusKind::Success, format!("Registered candidate {}", id));
            }
            Err(errors) => {
                let noun = if errors.len() == 1 { "field" } else { "fields" };
                self.set_status(
                    StatusKind::Error,
                    format!("Fix {} {} before registering", errors.len(), noun),
                );
            }
        }
    }
}
