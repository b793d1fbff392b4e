//! Single-line text field with cursor management and rendering.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

/// Editable single-line text. The cursor is a byte offset on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    content: String,
    cursor: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Replace the content and put the cursor at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.cursor = self.content.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Apply an editing key. Returns `true` if the content changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.insert_char(c);
                true
            }
            (_, KeyCode::Backspace) => self.backspace(),
            (_, KeyCode::Delete) => self.delete(),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                let changed = !self.content.is_empty();
                self.clear();
                changed
            }
            (_, KeyCode::Left) => {
                self.move_left();
                false
            }
            (_, KeyCode::Right) => {
                self.move_right();
                false
            }
            (_, KeyCode::Home) => {
                self.cursor = 0;
                false
            }
            (_, KeyCode::End) => {
                self.cursor = self.content.len();
                false
            }
            _ => false,
        }
    }

    fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn backspace(&mut self) -> bool {
        match self.prev_boundary() {
            Some(prev) => {
                self.content.drain(prev..self.cursor);
                self.cursor = prev;
                true
            }
            None => false,
        }
    }

    fn delete(&mut self) -> bool {
        match self.next_boundary() {
            Some(next) => {
                self.content.drain(self.cursor..next);
                true
            }
            None => false,
        }
    }

    fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.content[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    /// Render `label: value` on one row. When focused, the terminal cursor
    /// is placed at the edit position.
    pub fn render(&self, frame: &mut Frame, area: Rect, label: &str, focused: bool) {
        let label_text = format!("{label:>16}: ");
        let label_width = label_text.chars().count() as u16;
        let style = if focused {
            theme::highlight()
        } else {
            theme::muted()
        };

        let line = Line::from(vec![
            Span::styled(label_text, style),
            Span::raw(self.content.as_str()),
        ]);
        frame.render_widget(Paragraph::new(line), area);

        if focused {
            let col = self.content[..self.cursor].chars().count() as u16;
            let x = (area.x + label_width + col).min(area.right().saturating_sub(1));
            frame.set_cursor_position(Position::new(x, area.y));
        }
    }
}
