use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use tokio::sync::mpsc;

use crate::core::api::GalleryImage;
use crate::core::download::save_media;
use crate::core::gallery::Gallery;
use crate::tui::events::NotificationLevel;
use crate::tui::services::{notify, Services};
use crate::tui::theme;

pub struct GalleryViewState {
    gallery: Option<Gallery>,
    selected: usize,
    loading: bool,
    error: Option<String>,
    data_rx: mpsc::UnboundedReceiver<Result<Vec<GalleryImage>, String>>,
    data_tx: mpsc::UnboundedSender<Result<Vec<GalleryImage>, String>>,
}

impl GalleryViewState {
    pub fn new() -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            gallery: None,
            selected: 0,
            loading: false,
            error: None,
            data_rx,
            data_tx,
        }
    }

    /// Fetch all images once.
    pub fn load(&mut self, services: &Services) {
        if self.loading || self.gallery.is_some() {
            return;
        }
        self.loading = true;
        self.error = None;

        let api = services.api.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(api.gallery().await.map_err(|e| e.to_string()));
        });
    }

    pub fn poll(&mut self) {
        if let Ok(result) = self.data_rx.try_recv() {
            self.loading = false;
            match result {
                Ok(images) => {
                    self.gallery = Some(Gallery::new(images));
                    self.selected = 0;
                }
                Err(e) => {
                    log::error!("Error fetching gallery images: {e}");
                    self.error = Some(e);
                }
            }
        }
    }

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        let Some(gallery) = self.gallery.as_mut() else {
            if *code == KeyCode::Char('r') {
                self.load(services);
                return true;
            }
            return false;
        };

        match code {
            KeyCode::Left | KeyCode::Char('h') => {
                gallery.cycle_year(-1);
                self.selected = 0;
                true
            }
            KeyCode::Right | KeyCode::Char('l') => {
                gallery.cycle_year(1);
                self.selected = 0;
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let count = gallery.visible().len();
                if count > 0 {
                    self.selected = (self.selected + 1).min(count - 1);
                }
                true
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                true
            }
            KeyCode::Char('d') | KeyCode::Enter => {
                self.download_selected(services);
                true
            }
            _ => false,
        }
    }

    fn download_selected(&self, services: &Services) {
        let Some(image) = self
            .gallery
            .as_ref()
            .and_then(|g| g.visible().get(self.selected).map(|img| (*img).clone()))
        else {
            return;
        };
        let Some(url) = image.image.clone() else {
            services.notify("This photo has no image file", NotificationLevel::Warning);
            return;
        };

        let api = services.api.clone();
        let dir = services.downloads_dir.clone();
        let event_tx = services.event_tx.clone();
        tokio::spawn(async move {
            match save_media(api.as_ref(), &url, &dir, &image.file_name()).await {
                Ok(path) => notify(
                    &event_tx,
                    format!("Saved {}", path.display()),
                    NotificationLevel::Success,
                ),
                Err(e) => {
                    log::error!("Error downloading gallery image {}: {e}", image.id);
                    notify(&event_tx, "Download failed", NotificationLevel::Error);
                }
            }
        });
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block("Photo Gallery", true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(ref gallery) = self.gallery else {
            let line = match (&self.error, self.loading) {
                (Some(e), _) => Line::from(vec![
                    Span::styled("Error fetching gallery images: ", theme::error()),
                    Span::styled(e.as_str(), theme::dim()),
                    Span::styled("  r", theme::key_hint()),
                    Span::styled(":retry", theme::muted()),
                ]),
                (None, true) => Line::from(Span::styled("Loading…", theme::dim())),
                (None, false) => Line::raw(""),
            };
            frame.render_widget(Paragraph::new(line), inner);
            return;
        };

        let chunks = Layout::vertical([
            Constraint::Length(1), // Year selector
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

        let mut years = vec![Span::styled(" Year: ", theme::muted())];
        for year in gallery.years() {
            let style = if Some(*year) == gallery.year() {
                theme::highlight()
            } else {
                theme::dim()
            };
            years.push(Span::styled(format!(" {year} "), style));
        }
        frame.render_widget(Paragraph::new(Line::from(years)), chunks[0]);

        let visible = gallery.visible();
        if visible.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("No photos for this year.", theme::dim())),
                chunks[1],
            );
        } else {
            let items: Vec<ListItem> = visible
                .iter()
                .map(|img| {
                    let url = img.image.as_deref().unwrap_or("(no image)");
                    ListItem::new(vec![
                        Line::from(img.caption.as_str()),
                        Line::from(Span::styled(format!("  {url}"), theme::dim())),
                    ])
                })
                .collect();
            let list = List::new(items)
                .highlight_style(theme::highlight())
                .highlight_symbol("▸ ");
            let mut state = ListState::default();
            state.select(Some(self.selected.min(visible.len() - 1)));
            frame.render_stateful_widget(list, chunks[1], &mut state);
        }

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" ←→", theme::key_hint()),
                Span::styled(":year  ", theme::muted()),
                Span::styled("j/k", theme::key_hint()),
                Span::styled(":move  ", theme::muted()),
                Span::styled("d", theme::key_hint()),
                Span::styled(":download", theme::muted()),
            ])),
            chunks[2],
        );
    }
}
