//! Live team scoreboard, refreshed on a timer while the view is open.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use tokio::sync::mpsc;

use crate::core::api::TeamPoints;
use crate::core::scoreboard::{RefreshSchedule, Standings};
use crate::tui::services::Services;
use crate::tui::theme;

pub struct ScoreboardViewState {
    standings: Standings,
    schedule: RefreshSchedule,
    /// Whether at least one response (success or failure) arrived.
    received: bool,
    data_rx: mpsc::UnboundedReceiver<Result<Vec<TeamPoints>, String>>,
    data_tx: mpsc::UnboundedSender<Result<Vec<TeamPoints>, String>>,
}

impl ScoreboardViewState {
    pub fn new(services: &Services) -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            standings: Standings::default(),
            schedule: RefreshSchedule::new(services.scoreboard_refresh),
            received: false,
            data_rx,
            data_tx,
        }
    }

    /// Start a fetch if the refresh interval has elapsed.
    pub fn refresh_if_due(&mut self, services: &Services) {
        let now = Instant::now();
        if !self.schedule.is_due(now) {
            return;
        }
        self.schedule.started(now);

        let api = services.api.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let result = api.points().await.map_err(|e| e.to_string());
            let _ = tx.send(result);
        });
    }

    pub fn poll(&mut self) {
        while let Ok(result) = self.data_rx.try_recv() {
            self.standings.apply(result);
            self.schedule.finished();
            self.received = true;
        }
    }

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(KeyEvent {
            code: KeyCode::Char('r'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };
        self.schedule.force();
        self.refresh_if_due(services);
        true
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(" Team Score ", theme::title()),
            Span::styled(" LIVE ", theme::live_badge()),
            Span::raw(" "),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_focused())
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.standings.is_empty() {
            let msg = if self.received {
                "No points yet."
            } else {
                "Loading scores…"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, theme::dim())).alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let chunks = Layout::vertical([
            Constraint::Length(1), // "Current Status"
            Constraint::Length(4), // Podium
            Constraint::Length(1),
            Constraint::Min(1), // Rest
            Constraint::Length(1), // Next refresh
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(" Current Status", theme::heading())),
            chunks[0],
        );
        self.render_podium(frame, chunks[1]);
        self.render_rest(frame, chunks[3]);

        let remaining = self.schedule.remaining(Instant::now()).as_secs();
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" refresh in {remaining}s  "), theme::dim()),
                Span::styled("r", theme::key_hint()),
                Span::styled(":now", theme::muted()),
            ])),
            chunks[4],
        );
    }

    fn render_podium(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .standings
            .podium()
            .map(|r| {
                let color = theme::medal(r.rank).unwrap_or(theme::TEXT);
                Line::from(vec![
                    Span::styled(
                        format!("  #{} ", r.rank),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("{:<32}", r.team.group_name),
                        Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("{} pts", r.team.total_points),
                        Style::default().fg(color),
                    ),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_rest(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .standings
            .rest()
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.rank.to_string()),
                    Cell::from(r.team.group_name.as_str()),
                    Cell::from(r.team.total_points.to_string()),
                ])
            })
            .collect();
        if rows.is_empty() {
            return;
        }

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Min(20),
                Constraint::Length(12),
            ],
        )
        .header(Row::new(vec!["Rank", "Group Name", "Total Points"]).style(theme::muted()))
        .block(theme::block("Other Teams", false));
        frame.render_widget(table, area);
    }
}
