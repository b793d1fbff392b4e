//! Registration view: the three-step contestant wizard.
//!
//! Personal details are typed into text fields and mirrored into the
//! wizard's draft on every edit. Choosing a category immediately fetches the
//! eligible events for it; the events step shows them as a checklist.
//! Network work runs in spawned tasks that report back through `data_tx`,
//! drained on every tick by [`RegistrationViewState::poll`].

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc;

use crate::core::api::{ContestantId, EligibleEvent};
use crate::core::registration::{
    DraftField, EligibleEvents, EligibleEventsRequest, Gender, ReferenceLists,
    RegistrationWizard, SubmitStatus, WizardStep,
};
use crate::tui::events::NotificationLevel;
use crate::tui::services::{notify, Services};
use crate::tui::theme;
use crate::tui::widgets::text_field::TextField;

const EVENTS_NOTE: &str = "A person can participate in up to four individual programmes. \
There is no limit for general items.";
const CATEGORY_NOTE: &str = "Category A - UG    Category B - PG & PhD";

// ── Async results ────────────────────────────────────────────────────────────

#[derive(Debug)]
enum RegistrationData {
    ReferenceLists(Result<ReferenceLists, String>),
    EligibleEvents {
        generation: u64,
        result: Result<Vec<EligibleEvent>, String>,
    },
    Submitted(Result<ContestantId, String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReferenceState {
    NotLoaded,
    Loading,
    Loaded,
    Failed(String),
}

// ── State ────────────────────────────────────────────────────────────────────

pub struct RegistrationViewState {
    wizard: RegistrationWizard,
    /// One input per free-text field, in `DraftField::PERSONAL` order.
    inputs: Vec<(DraftField, TextField)>,
    /// Focused row on the personal step (index into `DraftField::PERSONAL`).
    row: usize,
    category_cursor: usize,
    event_cursor: usize,
    reference: ReferenceState,
    data_rx: mpsc::UnboundedReceiver<RegistrationData>,
    data_tx: mpsc::UnboundedSender<RegistrationData>,
}

impl RegistrationViewState {
    pub fn new() -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            wizard: RegistrationWizard::new(),
            inputs: Self::empty_inputs(),
            row: 0,
            category_cursor: 0,
            event_cursor: 0,
            reference: ReferenceState::NotLoaded,
            data_rx,
            data_tx,
        }
    }

    fn empty_inputs() -> Vec<(DraftField, TextField)> {
        DraftField::PERSONAL
            .into_iter()
            .filter(|f| f.is_text())
            .map(|f| (f, TextField::new()))
            .collect()
    }

    pub fn wizard(&self) -> &RegistrationWizard {
        &self.wizard
    }

    pub fn is_submitting(&self) -> bool {
        self.wizard.is_submitting()
    }

    /// Fetch groups and categories unless already loaded or in flight.
    pub fn load(&mut self, services: &Services) {
        if matches!(self.reference, ReferenceState::Loading | ReferenceState::Loaded) {
            return;
        }
        self.reference = ReferenceState::Loading;

        let service = services.registration.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let result = service
                .load_reference_lists()
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(RegistrationData::ReferenceLists(result));
        });
    }

    /// Drain finished async work. Call from on_tick.
    pub fn poll(&mut self) {
        while let Ok(data) = self.data_rx.try_recv() {
            match data {
                RegistrationData::ReferenceLists(Ok(lists)) => {
                    self.wizard.apply_reference_lists(lists);
                    self.reference = ReferenceState::Loaded;
                }
                RegistrationData::ReferenceLists(Err(e)) => {
                    log::warn!("Failed to load groups/categories: {e}");
                    self.reference = ReferenceState::Failed(e);
                }
                RegistrationData::EligibleEvents { generation, result } => {
                    if self.wizard.apply_eligible_events(generation, result) {
                        self.event_cursor = 0;
                    }
                }
                RegistrationData::Submitted(result) => {
                    self.wizard.finish_submit(result);
                }
            }
        }
    }

    // ── Input ────────────────────────────────────────────────────────────

    /// Returns true if the key was consumed.
    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }

        if self.wizard.is_complete() {
            return match key.code {
                KeyCode::Enter | KeyCode::Char('n') => {
                    self.reset();
                    true
                }
                _ => false,
            };
        }
        if self.wizard.is_submitting() {
            // Swallow edits while the write is in flight.
            return !matches!(key.code, KeyCode::F(_))
                && !key.modifiers.contains(KeyModifiers::CONTROL);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('n')) => {
                if self.wizard.step().is_last() {
                    self.submit(services);
                } else {
                    self.advance();
                }
                return true;
            }
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.wizard.back();
                return true;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('r'))
                if matches!(self.reference, ReferenceState::Failed(_)) =>
            {
                self.load(services);
                return true;
            }
            _ => {}
        }

        match self.wizard.step() {
            WizardStep::Personal => self.handle_personal_input(*key),
            WizardStep::Category => self.handle_category_input(*key, services),
            WizardStep::Events => self.handle_events_input(*key, services),
        }
    }

    fn handle_personal_input(&mut self, key: KeyEvent) -> bool {
        let rows = DraftField::PERSONAL.len();
        let field = DraftField::PERSONAL[self.row];

        // Leave Ctrl chords (quit, ...) to the global bindings, except Ctrl+U.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code != KeyCode::Char('u') {
            return false;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.row = (self.row + 1) % rows;
                true
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.row = (self.row + rows - 1) % rows;
                true
            }
            KeyCode::Enter => {
                if self.row + 1 < rows {
                    self.row += 1;
                } else {
                    self.advance();
                }
                true
            }
            KeyCode::Char(_)
            | KeyCode::Backspace
            | KeyCode::Delete
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Home
            | KeyCode::End
                if field.is_text() =>
            {
                if let Some(input) = self.input_mut(field) {
                    if input.handle_key(key) {
                        let text = input.text().to_string();
                        self.wizard.set_text(field, text);
                    }
                }
                true
            }
            KeyCode::Left => {
                self.cycle_choice(field, -1);
                true
            }
            KeyCode::Right | KeyCode::Char(' ') => {
                self.cycle_choice(field, 1);
                true
            }
            // Stray letters on a choice row must not trigger global keys.
            KeyCode::Char(_) => true,
            _ => false,
        }
    }

    fn handle_category_input(&mut self, key: KeyEvent, services: &Services) -> bool {
        let count = self.wizard.reference().categories.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down if count > 0 => {
                self.category_cursor = (self.category_cursor + 1).min(count - 1);
                self.choose_category_at_cursor(services);
                true
            }
            KeyCode::Char('k') | KeyCode::Up if count > 0 => {
                self.category_cursor = self.category_cursor.saturating_sub(1);
                self.choose_category_at_cursor(services);
                true
            }
            KeyCode::Char(' ') if count > 0 => {
                self.choose_category_at_cursor(services);
                true
            }
            KeyCode::Char('x') | KeyCode::Backspace => {
                self.wizard.select_category(None);
                true
            }
            KeyCode::Enter => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn handle_events_input(&mut self, key: KeyEvent, services: &Services) -> bool {
        let count = self.wizard.eligible().events().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if count > 0 {
                    self.event_cursor = (self.event_cursor + 1).min(count - 1);
                }
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.event_cursor = self.event_cursor.saturating_sub(1);
                true
            }
            KeyCode::Char(' ') => {
                if let Some(event) = self.wizard.eligible().events().get(self.event_cursor) {
                    let id = event.id;
                    self.wizard.toggle_event(id);
                }
                true
            }
            KeyCode::Char('r') => {
                if let Some(request) = self.wizard.retry_eligible_events() {
                    self.fetch_eligible_events(request, services);
                }
                true
            }
            KeyCode::Enter => {
                self.submit(services);
                true
            }
            _ => false,
        }
    }

    // ── Actions ──────────────────────────────────────────────────────────

    fn advance(&mut self) {
        match self.wizard.next() {
            Ok(WizardStep::Category) => self.sync_category_cursor(),
            Ok(_) => {}
            Err(e) => log::debug!("Step not complete: {e}"),
        }
    }

    fn choose_category_at_cursor(&mut self, services: &Services) {
        let Some(id) = self
            .wizard
            .reference()
            .categories
            .get(self.category_cursor)
            .map(|c| c.id)
        else {
            return;
        };
        if let Some(request) = self.wizard.select_category(Some(id)) {
            self.fetch_eligible_events(request, services);
        }
    }

    fn fetch_eligible_events(&self, request: EligibleEventsRequest, services: &Services) {
        let service = services.registration.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let result = service
                .eligible_events(request.category)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(RegistrationData::EligibleEvents {
                generation: request.generation,
                result,
            });
        });
    }

    fn submit(&mut self, services: &Services) {
        let plan = match self.wizard.begin_submit() {
            Ok(plan) => plan,
            Err(e) => {
                log::debug!("Submit rejected: {e}");
                return;
            }
        };

        let service = services.registration.clone();
        let tx = self.data_tx.clone();
        let event_tx = services.event_tx.clone();
        tokio::spawn(async move {
            let result = service.submit(&plan).await.map_err(|e| e.to_string());
            match &result {
                Ok(id) => notify(
                    &event_tx,
                    format!("Registered contestant #{id}"),
                    NotificationLevel::Success,
                ),
                Err(_) => notify(&event_tx, "Registration failed", NotificationLevel::Error),
            }
            let _ = tx.send(RegistrationData::Submitted(result));
        });
    }

    fn reset(&mut self) {
        self.wizard.reset();
        self.inputs = Self::empty_inputs();
        self.row = 0;
        self.category_cursor = 0;
        self.event_cursor = 0;
    }

    fn cycle_choice(&mut self, field: DraftField, delta: isize) {
        match field {
            DraftField::Gender => {
                let options: Vec<Option<Gender>> = std::iter::once(None)
                    .chain(Gender::ALL.into_iter().map(Some))
                    .collect();
                let next = cycle_index(&options, &self.wizard.draft().gender, delta);
                self.wizard.set_gender(options[next]);
            }
            DraftField::Group => {
                let options: Vec<Option<u64>> = std::iter::once(None)
                    .chain(self.wizard.reference().groups.iter().map(|g| Some(g.id)))
                    .collect();
                let next = cycle_index(&options, &self.wizard.draft().group_id, delta);
                self.wizard.set_group(options[next]);
            }
            _ => {}
        }
    }

    fn sync_category_cursor(&mut self) {
        if let Some(id) = self.wizard.draft().category_id {
            if let Some(pos) = self
                .wizard
                .reference()
                .categories
                .iter()
                .position(|c| c.id == id)
            {
                self.category_cursor = pos;
            }
        }
    }

    fn input_mut(&mut self, field: DraftField) -> Option<&mut TextField> {
        self.inputs
            .iter_mut()
            .find(|(f, _)| *f == field)
            .map(|(_, input)| input)
    }

    fn input(&self, field: DraftField) -> Option<&TextField> {
        self.inputs
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, input)| input)
    }

    // ── Rendering ────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block("Registration", true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if let SubmitStatus::Succeeded(id) = self.wizard.status() {
            self.render_success(frame, inner, id);
            return;
        }

        let chunks = Layout::vertical([
            Constraint::Length(2), // Stepper
            Constraint::Min(3),    // Step body
            Constraint::Length(1), // Error / status
            Constraint::Length(1), // Key hints
        ])
        .split(inner);

        self.render_stepper(frame, chunks[0]);
        match self.wizard.step() {
            WizardStep::Personal => self.render_personal(frame, chunks[1]),
            WizardStep::Category => self.render_category(frame, chunks[1]),
            WizardStep::Events => self.render_events(frame, chunks[1]),
        }
        self.render_message(frame, chunks[2]);
        self.render_hints(frame, chunks[3]);
    }

    fn render_stepper(&self, frame: &mut Frame, area: Rect) {
        let current = self.wizard.step();
        let mut spans = vec![Span::raw(" ")];
        for (i, step) in WizardStep::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ── ", theme::dim()));
            }
            let (marker, style) = if *step == current {
                ("●", theme::highlight())
            } else if step.index() < current.index() {
                ("✓", Style::default().fg(theme::SUCCESS))
            } else {
                ("○", theme::dim())
            };
            spans.push(Span::styled(format!("{marker} {}", step.label()), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_personal(&self, frame: &mut Frame, area: Rect) {
        if let ReferenceState::Failed(ref e) = self.reference {
            let warning = Line::from(vec![
                Span::styled(" Could not load schools: ", theme::error()),
                Span::styled(e.as_str(), theme::muted()),
            ]);
            let rows = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(area);
            frame.render_widget(Paragraph::new(warning), rows[0]);
            self.render_personal_rows(frame, rows[1]);
        } else {
            self.render_personal_rows(frame, area);
        }
    }

    fn render_personal_rows(&self, frame: &mut Frame, area: Rect) {
        let draft = self.wizard.draft();
        for (i, field) in DraftField::PERSONAL.iter().enumerate() {
            let y = area.y + i as u16;
            if y >= area.bottom() {
                break;
            }
            let row = Rect::new(area.x, y, area.width, 1);
            let focused = i == self.row;

            if let Some(input) = self.input(*field) {
                input.render(frame, row, field.label(), focused);
                continue;
            }

            let value = match field {
                DraftField::Gender => draft.gender.map(|g| g.to_string()),
                DraftField::Group => draft.group_id.and_then(|id| {
                    self.wizard
                        .reference()
                        .groups
                        .iter()
                        .find(|g| g.id == id)
                        .map(|g| g.name.clone())
                }),
                _ => None,
            };
            let label_style = if focused {
                theme::highlight()
            } else {
                theme::muted()
            };
            let value_span = match value {
                Some(v) => Span::raw(format!("‹ {v} ›")),
                None if *field == DraftField::Group && self.reference == ReferenceState::Loading => {
                    Span::styled("loading…", theme::dim())
                }
                None => Span::styled("‹ choose ›", theme::dim()),
            };
            let line = Line::from(vec![
                Span::styled(format!("{:>16}: ", field.label()), label_style),
                value_span,
            ]);
            frame.render_widget(Paragraph::new(line), row);
        }
    }

    fn render_category(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).split(area);

        let note = Paragraph::new(vec![
            Line::from(Span::styled(" Note", theme::heading())),
            Line::from(Span::styled(format!(" {CATEGORY_NOTE}"), theme::muted())),
        ]);
        frame.render_widget(note, chunks[0]);

        let categories = &self.wizard.reference().categories;
        if categories.is_empty() {
            let msg = match self.reference {
                ReferenceState::Loading => "Loading categories…",
                _ => "No categories available.",
            };
            frame.render_widget(Paragraph::new(Span::styled(msg, theme::dim())), chunks[1]);
            return;
        }

        let selected = self.wizard.draft().category_id;
        let items: Vec<ListItem> = categories
            .iter()
            .map(|c| {
                let mark = if Some(c.id) == selected { "(•) " } else { "( ) " };
                ListItem::new(format!("{mark}{}", c.name))
            })
            .collect();
        let list = List::new(items)
            .block(theme::block(DraftField::Category.label(), true))
            .highlight_style(theme::highlight())
            .highlight_symbol("▸ ");

        let mut state = ListState::default();
        state.select(Some(self.category_cursor.min(categories.len() - 1)));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn render_events(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).split(area);

        let note = Paragraph::new(vec![
            Line::from(Span::styled(" Note", theme::heading())),
            Line::from(Span::styled(format!(" {EVENTS_NOTE}"), theme::muted())),
        ])
        .wrap(Wrap { trim: false });
        frame.render_widget(note, chunks[0]);

        let placeholder = match self.wizard.eligible() {
            EligibleEvents::Idle => Some("Please select your category to see eligible events.".to_string()),
            EligibleEvents::Loading => Some("Loading competitions…".to_string()),
            EligibleEvents::Failed(msg) => Some(msg.clone()),
            EligibleEvents::Loaded(events) if events.is_empty() => {
                Some("No competitions available for this category.".to_string())
            }
            EligibleEvents::Loaded(_) => None,
        };
        if let Some(text) = placeholder {
            frame.render_widget(Paragraph::new(Span::styled(text, theme::dim())), chunks[1]);
            return;
        }

        let events = self.wizard.eligible().events();
        let items: Vec<ListItem> = events
            .iter()
            .map(|e| {
                let checked = self.wizard.is_selected(e.id);
                let mark = if checked { "[x] " } else { "[ ] " };
                let style = if checked {
                    Style::default().fg(theme::SUCCESS)
                } else {
                    Style::default().fg(theme::TEXT)
                };
                ListItem::new(Line::from(Span::styled(format!("{mark}{}", e.name), style)))
            })
            .collect();

        let title = format!("Competitions ({} selected)", self.wizard.draft().events.len());
        let list = List::new(items)
            .block(theme::block(&title, true))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▸ ");

        let mut state = ListState::default();
        state.select(Some(self.event_cursor.min(events.len() - 1)));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn render_message(&self, frame: &mut Frame, area: Rect) {
        let line = if self.wizard.is_submitting() {
            Line::from(Span::styled(" Submitting registration…", theme::key_hint()))
        } else if let Some(error) = self.wizard.error() {
            Line::from(Span::styled(format!(" {error}"), theme::error()))
        } else {
            Line::raw("")
        };
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let hints: &[(&str, &str)] = match self.wizard.step() {
            WizardStep::Personal => &[
                ("Tab/↑↓", "field"),
                ("←→", "choose"),
                ("Enter", "next field"),
                ("Ctrl+N", "next step"),
            ],
            WizardStep::Category => &[
                ("j/k", "category"),
                ("x", "clear"),
                ("Enter", "next"),
                ("Esc", "back"),
            ],
            WizardStep::Events => &[
                ("j/k", "move"),
                ("Space", "toggle"),
                ("Enter", "submit"),
                ("Esc", "back"),
            ],
        };
        let mut spans = vec![Span::raw(" ")];
        for (key, desc) in hints {
            spans.push(Span::styled(*key, theme::key_hint()));
            spans.push(Span::styled(format!(":{desc}  "), theme::muted()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_success(&self, frame: &mut Frame, area: Rect, id: ContestantId) {
        let lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                "Congratulations!",
                Style::default()
                    .fg(theme::SUCCESS)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
            Line::raw("You are successfully registered for PU Sahithyolsav."),
            Line::from(Span::styled(format!("Contestant ID: {id}"), theme::muted())),
            Line::raw(""),
            Line::raw("Thank you for participating, wishing you all the best."),
            Line::raw(""),
            Line::from(vec![
                Span::styled("Enter", theme::key_hint()),
                Span::raw(" to register another participant"),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }
}

/// Position of `current` in `options` moved by `delta`, wrapping.
fn cycle_index<T: PartialEq>(options: &[T], current: &T, delta: isize) -> usize {
    let len = options.len() as isize;
    let pos = options.iter().position(|o| o == current).unwrap_or(0) as isize;
    (pos + delta).rem_euclid(len) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_index_wraps() {
        let options = [None, Some(1), Some(2)];
        assert_eq!(cycle_index(&options, &None, 1), 1);
        assert_eq!(cycle_index(&options, &Some(2), 1), 0);
        assert_eq!(cycle_index(&options, &None, -1), 2);
    }

    #[test]
    fn test_new_view_has_an_input_per_text_field() {
        let view = RegistrationViewState::new();
        let fields: Vec<_> = view.inputs.iter().map(|(f, _)| *f).collect();
        assert_eq!(
            fields,
            vec![
                DraftField::FullName,
                DraftField::Email,
                DraftField::State,
                DraftField::Course,
                DraftField::PhoneNumber,
            ]
        );
    }

    #[test]
    fn test_typing_updates_draft() {
        let mut view = RegistrationViewState::new();
        for c in "Asha".chars() {
            view.handle_personal_input(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        assert_eq!(view.wizard().draft().full_name, "Asha");
    }

    #[test]
    fn test_gender_row_cycles() {
        let mut view = RegistrationViewState::new();
        view.row = 3;
        view.handle_personal_input(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        assert_eq!(view.wizard().draft().gender, Some(Gender::Male));
        view.handle_personal_input(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        assert_eq!(view.wizard().draft().gender, Some(Gender::Female));
        view.handle_personal_input(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        assert_eq!(view.wizard().draft().gender, None);
    }

    #[test]
    fn test_enter_on_last_row_validates() {
        let mut view = RegistrationViewState::new();
        view.row = DraftField::PERSONAL.len() - 1;
        view.handle_personal_input(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(view.wizard().step(), WizardStep::Personal);
        assert!(view.wizard().error().is_some());
    }
}
