use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{Action, AppEvent, Focus, Notification, NotificationLevel};
use super::layout::{centered_rect, AppLayout};
use super::services::Services;
use super::theme;
use super::views::gallery::GalleryViewState;
use super::views::registration::RegistrationViewState;
use super::views::results::ResultsViewState;
use super::views::scoreboard::ScoreboardViewState;

/// Most notifications shown at once.
const MAX_NOTIFICATIONS: usize = 3;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Currently focused top-level view.
    pub focus: Focus,
    pub registration: RegistrationViewState,
    pub results: ResultsViewState,
    pub scoreboard: ScoreboardViewState,
    pub gallery: GalleryViewState,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(event_rx: mpsc::UnboundedReceiver<AppEvent>, services: Services) -> Self {
        Self {
            running: true,
            focus: Focus::Register,
            registration: RegistrationViewState::new(),
            results: ResultsViewState::new(),
            scoreboard: ScoreboardViewState::new(&services),
            gallery: GalleryViewState::new(),
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            event_rx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        self.on_focus_changed();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Help modal swallows everything but its own close keys
                if self.show_help {
                    if let Some(action) = map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                if self.dispatch_view_input(&crossterm_event) {
                    return;
                }

                if let Some(action) = map_input_to_action(&crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Action(action) => self.handle_action(action),
            AppEvent::Tick => self.on_tick(),
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::Quit => {
                self.running = false;
            }
        }
    }

    /// Dispatch input to the currently focused view. Returns true if consumed.
    fn dispatch_view_input(&mut self, event: &Event) -> bool {
        match self.focus {
            Focus::Register => self.registration.handle_input(event, &self.services),
            Focus::Results => self.results.handle_input(event, &self.services),
            Focus::Scoreboard => self.scoreboard.handle_input(event, &self.services),
            Focus::Gallery => self.gallery.handle_input(event, &self.services),
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::FocusRegister => self.set_focus(Focus::Register),
            Action::FocusResults => self.set_focus(Focus::Results),
            Action::FocusScoreboard => self.set_focus(Focus::Scoreboard),
            Action::FocusGallery => self.set_focus(Focus::Gallery),
            Action::TabNext => self.set_focus(self.focus.next()),
            Action::TabPrev => self.set_focus(self.focus.prev()),
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        if self.focus != focus {
            log::debug!("Focus {} -> {}", self.focus.label(), focus.label());
        }
        self.focus = focus;
        self.on_focus_changed();
    }

    fn on_focus_changed(&mut self) {
        match self.focus {
            Focus::Register => self.registration.load(&self.services),
            Focus::Results => self.results.load(&self.services),
            Focus::Scoreboard => self.scoreboard.refresh_if_due(&self.services),
            Focus::Gallery => self.gallery.load(&self.services),
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        let mut notification = Notification::new(message, level);
        notification.id = self.notification_counter;
        self.notifications.push(notification);

        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, poll async data, drive the
    /// scoreboard timer while it is on screen.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);

        self.registration.poll();
        self.results.poll();
        self.scoreboard.poll();
        self.gallery.poll();

        if self.focus == Focus::Scoreboard {
            self.scoreboard.refresh_if_due(&self.services);
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = AppLayout::compute(area);

        self.render_tabs(frame, layout.tabs);
        match self.focus {
            Focus::Register => self.registration.render(frame, layout.main),
            Focus::Results => self.results.render(frame, layout.main),
            Focus::Scoreboard => self.scoreboard.render(frame, layout.main),
            Focus::Gallery => self.gallery.render(frame, layout.main),
        }
        self.render_status_bar(frame, layout.status);

        // Overlays
        self.render_notifications(frame, area);
        if self.show_help {
            render_help_modal(frame, area);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" Sahityotsav ", theme::brand_badge()),
            Span::raw(" "),
        ];
        for focus in Focus::ALL {
            let style = if focus == self.focus {
                theme::highlight()
            } else {
                theme::muted()
            };
            spans.push(Span::styled(
                format!(" F{} {} ", focus.hotkey(), focus.label()),
                style,
            ));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let activity = if self.registration.is_submitting() {
            Span::styled("submitting", Style::default().fg(theme::PRIMARY_LIGHT))
        } else {
            Span::styled("ready", Style::default().fg(theme::TEXT_MUTED))
        };

        let status = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                self.focus.label(),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" │ "),
            activity,
            Span::raw(" │ "),
            Span::styled("F1-F4", theme::key_hint()),
            Span::raw(":views "),
            Span::styled("?", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 60.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let notification_area = Rect::new(x, 1, max_width, height).intersection(area);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {prefix} "),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }
}

fn map_help_input(event: &Event) -> Option<Action> {
    let Event::Key(KeyEvent {
        code,
        kind: KeyEventKind::Press,
        ..
    }) = event
    else {
        return None;
    };
    match code {
        KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
        _ => None,
    }
}

/// Global keybindings, consulted after the focused view declines a key.
fn map_input_to_action(event: &Event) -> Option<Action> {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        ..
    }) = event
    else {
        return None;
    };

    match (*modifiers, *code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
        (_, KeyCode::F(n)) => Focus::from_hotkey(n).map(Focus::to_action),
        (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('?') => Some(Action::ShowHelp),
            KeyCode::Tab => Some(Action::TabNext),
            KeyCode::BackTab => Some(Action::TabPrev),
            _ => None,
        },
        _ => None,
    }
}

const KEYBINDINGS: &[(&str, &str)] = &[
    ("Global:", ""),
    ("F1-F4", "Register / Results / Scoreboard / Gallery"),
    ("Tab / Shift+Tab", "Next / previous view"),
    ("?", "Toggle this help"),
    ("q / Ctrl+C", "Quit"),
    ("", ""),
    ("Register:", ""),
    ("Tab / ↑↓", "Move between fields"),
    ("←→ / Space", "Change gender or group"),
    ("Enter / Ctrl+N", "Next step"),
    ("Esc", "Previous step"),
    ("j/k Space", "Choose category, toggle events"),
    ("Ctrl+R", "Reload groups and categories"),
    ("", ""),
    ("Results:", ""),
    ("h/l", "Switch pane"),
    ("j/k", "Choose category / program / poster"),
    ("Enter", "Get results"),
    ("d", "Download poster"),
    ("", ""),
    ("Scoreboard:", ""),
    ("r", "Refresh now"),
    ("", ""),
    ("Gallery:", ""),
    ("h/l", "Previous / next year"),
    ("j/k", "Choose photo"),
    ("d", "Download photo"),
];

fn render_help_modal(frame: &mut Frame, area: Rect) {
    let modal = centered_rect(60, 80, area);
    let key_style = Style::default()
        .fg(theme::PRIMARY_LIGHT)
        .add_modifier(Modifier::BOLD);
    let section_style = Style::default()
        .fg(theme::ACCENT)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::raw(""),
        Line::from(Span::styled(" Keybindings", section_style)),
        Line::raw(""),
    ];

    for (key, desc) in KEYBINDINGS {
        if key.is_empty() {
            lines.push(Line::raw(""));
        } else if desc.is_empty() {
            lines.push(Line::from(Span::styled(format!("  {key}"), section_style)));
        } else {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{key:<18}"), key_style),
                Span::raw(*desc),
            ]));
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("  Press "),
        Span::styled("?", key_style),
        Span::raw(" or "),
        Span::styled("Esc", key_style),
        Span::raw(" to close"),
    ]));

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT));

    frame.render_widget(Clear, modal);
    frame.render_widget(Paragraph::new(lines).block(block), modal);
}
