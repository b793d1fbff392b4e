/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for polling, refresh timers and notification TTLs.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A resolved action to execute.
    Action(Action),
    /// Notification to display to the user.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusRegister,
    FocusResults,
    FocusScoreboard,
    FocusGallery,
    TabNext,
    TabPrev,

    // Modals
    ShowHelp,
    CloseHelp,

    // Application
    Quit,
}

/// Which top-level view has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Register,
    Results,
    Scoreboard,
    Gallery,
}

impl Focus {
    pub const ALL: [Focus; 4] = [
        Focus::Register,
        Focus::Results,
        Focus::Scoreboard,
        Focus::Gallery,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Focus::Register => "Register",
            Focus::Results => "Results",
            Focus::Scoreboard => "Scoreboard",
            Focus::Gallery => "Gallery",
        }
    }

    /// Function key that jumps to this view.
    pub fn hotkey(self) -> u8 {
        match self {
            Focus::Register => 1,
            Focus::Results => 2,
            Focus::Scoreboard => 3,
            Focus::Gallery => 4,
        }
    }

    pub fn from_hotkey(n: u8) -> Option<Focus> {
        Focus::ALL.into_iter().find(|f| f.hotkey() == n)
    }

    pub fn to_action(self) -> Action {
        match self {
            Focus::Register => Action::FocusRegister,
            Focus::Results => Action::FocusResults,
            Focus::Scoreboard => Action::FocusScoreboard,
            Focus::Gallery => Action::FocusGallery,
        }
    }

    pub fn next(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + Focus::ALL.len() - 1) % Focus::ALL.len()]
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

impl Notification {
    /// Build a notification for sending over the event channel. The id is
    /// assigned when it reaches the app.
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            id: 0,
            message: message.into(),
            level,
            ttl_ticks: 100,
        }
    }
}
