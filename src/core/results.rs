//! Result lookup: narrow the event catalog by category, then fetch the
//! winners posters generated for one event.

use std::fmt;

use crate::core::api::{Category, CategoryId, Event, EventId, Poster};

// ============================================================================
// Filter
// ============================================================================

/// Category/event pickers of the results view.
#[derive(Debug, Clone, Default)]
pub struct ResultFilter {
    categories: Vec<Category>,
    catalog: Vec<Event>,
    category: Option<CategoryId>,
    event: Option<EventId>,
    loaded: bool,
}

impl ResultFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Install the categories and the full event catalog.
    pub fn apply_catalog(&mut self, categories: Vec<Category>, catalog: Vec<Event>) {
        log::debug!(
            "Result filter loaded: {} categories, {} events",
            categories.len(),
            catalog.len()
        );
        self.categories = categories;
        self.catalog = catalog;
        self.loaded = true;
        if self.category.is_some_and(|id| self.category_name(id).is_none()) {
            self.category = None;
        }
        if self.event.is_some_and(|id| !self.is_visible(id)) {
            self.event = None;
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self) -> Option<CategoryId> {
        self.category
    }

    pub fn event(&self) -> Option<EventId> {
        self.event
    }

    /// `None` selects "All Categories". Always clears the chosen event.
    pub fn select_category(&mut self, category: Option<CategoryId>) {
        self.category = category.filter(|id| self.category_name(*id).is_some());
        self.event = None;
    }

    /// `None` selects "All Programs". Events hidden by the category are ignored.
    pub fn select_event(&mut self, event: Option<EventId>) {
        match event {
            Some(id) if !self.is_visible(id) => {
                log::debug!("Event {id} is not in the current category; ignoring");
            }
            other => self.event = other,
        }
    }

    /// Events offered for the current category, in catalog order.
    pub fn visible_events(&self) -> Vec<&Event> {
        match self.category.and_then(|id| self.category_name(id)) {
            Some(name) => self.catalog.iter().filter(|e| e.belongs_to(name)).collect(),
            None => self.catalog.iter().collect(),
        }
    }

    /// Event to search results for. "All Programs" searches nothing.
    pub fn query(&self) -> Option<EventId> {
        self.event
    }

    pub fn event_name(&self, id: EventId) -> Option<&str> {
        self.catalog
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.as_str())
    }

    fn category_name(&self, id: CategoryId) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    fn is_visible(&self, id: EventId) -> bool {
        self.visible_events().iter().any(|e| e.id == id)
    }
}

// ============================================================================
// Posters
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PosterState {
    /// Nothing searched yet.
    #[default]
    Idle,
    Loading(EventId),
    /// Posters of the last searched event. Empty when it has none.
    Loaded(EventId, Vec<Poster>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosterRequest {
    pub generation: u64,
    pub event: EventId,
}

/// Posters for the searched event.
#[derive(Debug, Clone, Default)]
pub struct PosterBoard {
    state: PosterState,
    generation: u64,
}

impl PosterBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PosterState {
        &self.state
    }

    pub fn posters(&self) -> &[Poster] {
        match &self.state {
            PosterState::Loaded(_, posters) => posters,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PosterState::Loading(_))
    }

    /// Start a search. Old posters are cleared immediately. Searching with no
    /// event returns to the idle state without a request.
    pub fn search(&mut self, event: Option<EventId>) -> Option<PosterRequest> {
        self.generation += 1;
        match event {
            None => {
                self.state = PosterState::Idle;
                None
            }
            Some(event) => {
                self.state = PosterState::Loading(event);
                Some(PosterRequest {
                    generation: self.generation,
                    event,
                })
            }
        }
    }

    /// Feed back a poster response. Returns `false` for superseded requests.
    /// A failed fetch (including 404) shows no posters.
    pub fn apply<E: fmt::Display>(
        &mut self,
        request: PosterRequest,
        result: Result<Vec<Poster>, E>,
    ) -> bool {
        if request.generation != self.generation {
            log::debug!("Dropping stale posters for event {}", request.event);
            return false;
        }
        let posters = result.unwrap_or_else(|e| {
            log::warn!("Failed to fetch posters for event {}: {e}", request.event);
            Vec::new()
        });
        self.state = PosterState::Loaded(request.event, posters);
        true
    }
}
