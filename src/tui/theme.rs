//! Festival color theme: indigo with saffron accents.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

// ── Primary palette ─────────────────────────────────────────────────────────

/// Indigo, focused borders and active tabs.
pub const PRIMARY: Color = Color::Rgb(0x3F, 0x51, 0xB5);
/// Light indigo, hints and secondary focus.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x79, 0x86, 0xCB);

// ── Accent ──────────────────────────────────────────────────────────────────

/// Saffron, selections and calls to action.
pub const ACCENT: Color = Color::Rgb(0xFF, 0x99, 0x33);

// ── Backgrounds ─────────────────────────────────────────────────────────────

pub const BG_BASE: Color = Color::Rgb(0x12, 0x14, 0x24);

// ── Text ────────────────────────────────────────────────────────────────────

pub const TEXT: Color = Color::Rgb(0xE8, 0xE8, 0xF0);
pub const TEXT_MUTED: Color = Color::Rgb(0x8A, 0x8C, 0xA0);
pub const TEXT_DIM: Color = Color::Rgb(0x55, 0x57, 0x6A);

// ── Semantic ────────────────────────────────────────────────────────────────

pub const ERROR: Color = Color::Rgb(0xEF, 0x53, 0x50);
pub const SUCCESS: Color = Color::Rgb(0x66, 0xBB, 0x6A);
pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);
pub const INFO: Color = Color::Rgb(0x42, 0xA5, 0xF5);

// ── Podium ──────────────────────────────────────────────────────────────────

pub const GOLD: Color = Color::Rgb(0xFF, 0xD7, 0x00);
pub const SILVER: Color = Color::Rgb(0xC0, 0xC0, 0xC0);
pub const BRONZE: Color = Color::Rgb(0xCD, 0x7F, 0x32);

/// Medal color for a 1-based rank, if it is on the podium.
pub fn medal(rank: usize) -> Option<Color> {
    match rank {
        1 => Some(GOLD),
        2 => Some(SILVER),
        3 => Some(BRONZE),
        _ => None,
    }
}

// ── Style helpers ───────────────────────────────────────────────────────────

/// Accent bold text (titles).
pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Section header style.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY_LIGHT).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ACCENT)
}

pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "[q]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(PRIMARY_LIGHT)
}

/// Inline error text under forms.
pub fn error() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::BOLD)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// "LIVE" badge on the scoreboard.
pub fn live_badge() -> Style {
    Style::default()
        .fg(TEXT)
        .bg(ERROR)
        .add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

/// A bordered block, accented when focused.
pub fn block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(if focused {
            border_focused()
        } else {
            border_default()
        })
}
