//! Results view: pick a category and programme, fetch its winners posters,
//! and save them to the downloads directory.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use tokio::sync::mpsc;

use crate::core::api::{Category, Event as FestEvent, Poster};
use crate::core::download::save_media;
use crate::core::results::{PosterBoard, PosterRequest, PosterState, ResultFilter};
use crate::tui::events::NotificationLevel;
use crate::tui::services::{notify, Services};
use crate::tui::theme;

#[derive(Debug)]
enum ResultsData {
    Catalog(Result<(Vec<Category>, Vec<FestEvent>), String>),
    Posters {
        request: PosterRequest,
        result: Result<Vec<Poster>, String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Category,
    Program,
    Posters,
}

impl Pane {
    fn next(self) -> Pane {
        match self {
            Pane::Category => Pane::Program,
            Pane::Program => Pane::Posters,
            Pane::Posters => Pane::Category,
        }
    }

    fn prev(self) -> Pane {
        match self {
            Pane::Category => Pane::Posters,
            Pane::Program => Pane::Category,
            Pane::Posters => Pane::Program,
        }
    }
}

pub struct ResultsViewState {
    filter: ResultFilter,
    board: PosterBoard,
    pane: Pane,
    /// Row in the category list; 0 is "All Categories".
    category_row: usize,
    /// Row in the programme list; 0 is "All Programs".
    program_row: usize,
    poster_row: usize,
    loading: bool,
    load_error: Option<String>,
    data_rx: mpsc::UnboundedReceiver<ResultsData>,
    data_tx: mpsc::UnboundedSender<ResultsData>,
}

impl ResultsViewState {
    pub fn new() -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            filter: ResultFilter::new(),
            board: PosterBoard::new(),
            pane: Pane::Category,
            category_row: 0,
            program_row: 0,
            poster_row: 0,
            loading: false,
            load_error: None,
            data_rx,
            data_tx,
        }
    }

    /// Fetch categories and the event catalog once.
    pub fn load(&mut self, services: &Services) {
        if self.loading || self.filter.is_loaded() {
            return;
        }
        self.loading = true;
        self.load_error = None;

        let api = services.api.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let result = tokio::try_join!(api.categories(), api.events()).map_err(|e| e.to_string());
            let _ = tx.send(ResultsData::Catalog(result));
        });
    }

    pub fn poll(&mut self) {
        while let Ok(data) = self.data_rx.try_recv() {
            match data {
                ResultsData::Catalog(Ok((categories, events))) => {
                    self.filter.apply_catalog(categories, events);
                    self.loading = false;
                }
                ResultsData::Catalog(Err(e)) => {
                    log::error!("Error fetching filter data: {e}");
                    self.load_error = Some(e);
                    self.loading = false;
                }
                ResultsData::Posters { request, result } => {
                    if self.board.apply(request, result) {
                        self.poster_row = 0;
                    }
                }
            }
        }
    }

    // ── Input ────────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('l') | KeyCode::Right) => {
                self.pane = self.pane.next();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('h') | KeyCode::Left) => {
                self.pane = self.pane.prev();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                self.move_cursor(1);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.move_cursor(-1);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('d')) => {
                self.download_selected(services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                if self.pane == Pane::Posters && !self.board.posters().is_empty() {
                    self.download_selected(services);
                } else {
                    self.search(services);
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                if self.load_error.is_some() {
                    self.load(services);
                }
                true
            }
            _ => false,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.pane {
            Pane::Category => {
                let rows = self.filter.categories().len() + 1;
                self.category_row = step(self.category_row, delta, rows);
                let category = self
                    .category_row
                    .checked_sub(1)
                    .and_then(|i| self.filter.categories().get(i))
                    .map(|c| c.id);
                self.filter.select_category(category);
                self.program_row = 0;
            }
            Pane::Program => {
                let visible = self.filter.visible_events();
                self.program_row = step(self.program_row, delta, visible.len() + 1);
                let event = self
                    .program_row
                    .checked_sub(1)
                    .and_then(|i| visible.get(i))
                    .map(|e| e.id);
                self.filter.select_event(event);
            }
            Pane::Posters => {
                self.poster_row = step(self.poster_row, delta, self.board.posters().len());
            }
        }
    }

    /// "Get Results": fetch posters for the chosen programme.
    fn search(&mut self, services: &Services) {
        let Some(request) = self.board.search(self.filter.query()) else {
            return;
        };
        self.poster_row = 0;

        let api = services.api.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let result = api
                .event_posters(request.event)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(ResultsData::Posters { request, result });
        });
    }

    fn download_selected(&self, services: &Services) {
        let Some(poster) = self.board.posters().get(self.poster_row).cloned() else {
            return;
        };

        let api = services.api.clone();
        let dir = services.downloads_dir.clone();
        let event_tx = services.event_tx.clone();
        tokio::spawn(async move {
            match save_media(api.as_ref(), &poster.url, &dir, &poster.file_name()).await {
                Ok(path) => notify(
                    &event_tx,
                    format!("Saved {}", path.display()),
                    NotificationLevel::Success,
                ),
                Err(e) => {
                    log::error!("Error downloading poster {}: {e}", poster.id);
                    notify(&event_tx, "Poster download failed", NotificationLevel::Error);
                }
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);
        let left = Layout::vertical([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(cols[0]);

        self.render_categories(frame, left[0]);
        self.render_programs(frame, left[1]);
        self.render_posters(frame, cols[1]);
    }

    fn render_categories(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block("Category", self.pane == Pane::Category);
        if let Some(ref e) = self.load_error {
            let lines = vec![
                Line::from(Span::styled("Error fetching filter data", theme::error())),
                Line::from(Span::styled(e.as_str(), theme::dim())),
                Line::from(vec![
                    Span::styled("r", theme::key_hint()),
                    Span::styled(":retry", theme::muted()),
                ]),
            ];
            frame.render_widget(Paragraph::new(lines).block(block), area);
            return;
        }

        let mut items = vec![ListItem::new(Span::styled("All Categories", theme::muted()))];
        items.extend(
            self.filter
                .categories()
                .iter()
                .map(|c| ListItem::new(c.name.as_str())),
        );
        render_list(frame, area, items, self.category_row, block);
    }

    fn render_programs(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block("Program", self.pane == Pane::Program);
        if self.loading {
            frame.render_widget(
                Paragraph::new(Span::styled("Loading…", theme::dim())).block(block),
                area,
            );
            return;
        }

        let mut items = vec![ListItem::new(Span::styled("All Programs", theme::muted()))];
        items.extend(
            self.filter
                .visible_events()
                .into_iter()
                .map(|e| ListItem::new(e.name.as_str())),
        );
        render_list(frame, area, items, self.program_row, block);
    }

    fn render_posters(&self, frame: &mut Frame, area: Rect) {
        let title = match self.board.state() {
            PosterState::Loading(id) | PosterState::Loaded(id, _) => {
                let name = self.filter.event_name(*id).unwrap_or("Programme");
                format!("Posters: {name}")
            }
            PosterState::Idle => "Posters".to_string(),
        };
        let block = theme::block(&title, self.pane == Pane::Posters);

        let message = match self.board.state() {
            PosterState::Idle => Some("Choose a program and press Enter to get results."),
            PosterState::Loading(_) => Some("Generating posters…"),
            PosterState::Loaded(_, posters) if posters.is_empty() => {
                Some("No winner posters to display for this program.")
            }
            PosterState::Loaded(..) => None,
        };
        if let Some(text) = message {
            frame.render_widget(
                Paragraph::new(Span::styled(text, theme::dim())).block(block),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = self
            .board
            .posters()
            .iter()
            .map(|p| {
                ListItem::new(vec![
                    Line::from(Span::styled(p.file_name(), theme::heading())),
                    Line::from(Span::styled(format!("  {}", p.url), theme::dim())),
                ])
            })
            .collect();
        let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
        render_list(frame, chunks[0], items, self.poster_row, block);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" d/Enter", theme::key_hint()),
                Span::styled(":download", theme::muted()),
            ])),
            chunks[1],
        );
    }
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected: usize,
    block: ratatui::widgets::Block,
) {
    let len = items.len();
    let list = List::new(items)
        .block(block)
        .highlight_style(theme::highlight())
        .highlight_symbol("▸ ");
    let mut state = ListState::default();
    if len > 0 {
        state.select(Some(selected.min(len - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Move `current` by `delta` within `0..len`, clamping at the ends.
fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}
