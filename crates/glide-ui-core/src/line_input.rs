use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::render;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineInputAction {
    None,
    Changed,
    Submitted(String),
    Cancelled,
}

/// Single-line text editor used by search boxes and inline cell editors.
#[derive(Clone, Debug, Default)]
pub struct LineInput {
    text: String,
    cursor: usize, // char index
    scroll_x: usize,
    placeholder: String,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut input = Self::new();
        input.set_text(text);
        input
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replaces the text and moves the cursor to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = single_line(&text.into());
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.scroll_x = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn input(&mut self, event: InputEvent) -> LineInputAction {
        match event {
            InputEvent::Paste(s) => {
                let s = single_line(&s);
                if s.is_empty() {
                    return LineInputAction::None;
                }
                for ch in s.chars() {
                    self.insert_char(ch);
                }
                LineInputAction::Changed
            }
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(_) => LineInputAction::None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> LineInputAction {
        match key.code {
            KeyCode::Char('u') if key.modifiers.ctrl => {
                if self.text.is_empty() {
                    return LineInputAction::None;
                }
                self.clear();
                LineInputAction::Changed
            }
            KeyCode::Char(c) => {
                if key.modifiers.ctrl || key.modifiers.alt {
                    return LineInputAction::None;
                }
                self.insert_char(c);
                LineInputAction::Changed
            }
            KeyCode::Enter => LineInputAction::Submitted(self.text.clone()),
            KeyCode::Esc => LineInputAction::Cancelled,
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return LineInputAction::None;
                }
                self.cursor -= 1;
                self.remove_at_cursor();
                LineInputAction::Changed
            }
            KeyCode::Delete => {
                if self.cursor >= self.char_len() {
                    return LineInputAction::None;
                }
                self.remove_at_cursor();
                LineInputAction::Changed
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                LineInputAction::None
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                LineInputAction::None
            }
            KeyCode::Home => {
                self.cursor = 0;
                LineInputAction::None
            }
            KeyCode::End => {
                self.cursor = self.char_len();
                LineInputAction::None
            }
            _ => LineInputAction::None,
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, style: Style, placeholder_style: Style) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let row = Rect::new(area.x, area.y, area.width, 1);
        buf.set_style(row, style);
        if self.text.is_empty() {
            render::render_str_clipped(
                area.x,
                area.y,
                area.width,
                buf,
                &self.placeholder,
                style.patch(placeholder_style),
            );
            self.scroll_x = 0;
            return;
        }
        self.ensure_cursor_visible(area.width);
        let visible = render::slice_by_cols(&self.text, self.scroll_x as u32, area.width);
        render::render_str_clipped(area.x, area.y, area.width, buf, &visible, style);
    }

    /// Terminal cursor position for the last rendered `area`.
    pub fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let x = self.cursor_display_x().saturating_sub(self.scroll_x);
        if x >= area.width as usize {
            return None;
        }
        Some((area.x + x as u16, area.y))
    }

    fn ensure_cursor_visible(&mut self, width: u16) {
        let cx = self.cursor_display_x();
        let w = width as usize;
        if cx < self.scroll_x {
            self.scroll_x = cx;
        } else if cx >= self.scroll_x + w {
            self.scroll_x = cx + 1 - w;
        }
    }

    fn cursor_display_x(&self) -> usize {
        self.text
            .chars()
            .take(self.cursor)
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
            .sum()
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn insert_char(&mut self, ch: char) {
        let b = self.byte_index(self.cursor);
        self.text.insert(b, ch);
        self.cursor += 1;
    }

    fn remove_at_cursor(&mut self) {
        let b = self.byte_index(self.cursor);
        if b < self.text.len() {
            self.text.remove(b);
        }
    }
}

fn single_line(s: &str) -> String {
    s.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::key(code)
    }

    #[test]
    fn typing_and_editing() {
        let mut input = LineInput::new();
        for c in "helo".chars() {
            assert_eq!(input.input(key(KeyCode::Char(c))), LineInputAction::Changed);
        }
        input.input(key(KeyCode::Left));
        input.input(key(KeyCode::Char('l')));
        assert_eq!(input.text(), "hello");
        input.input(key(KeyCode::Home));
        input.input(key(KeyCode::Delete));
        assert_eq!(input.text(), "ello");
        assert_eq!(input.input(key(KeyCode::Backspace)), LineInputAction::None);
    }

    #[test]
    fn enter_submits_and_esc_cancels() {
        let mut input = LineInput::with_text("abc");
        assert_eq!(
            input.input(key(KeyCode::Enter)),
            LineInputAction::Submitted("abc".to_string())
        );
        assert_eq!(input.input(key(KeyCode::Esc)), LineInputAction::Cancelled);
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut input = LineInput::new();
        input.input(InputEvent::Paste("a\nb".to_string()));
        assert_eq!(input.text(), "a b");
    }

    #[test]
    fn ctrl_u_clears() {
        let mut input = LineInput::with_text("abc");
        assert_eq!(
            input.input(InputEvent::Key(keymap::key_ctrl('u'))),
            LineInputAction::Changed
        );
        assert!(input.is_empty());
    }

    #[test]
    fn render_scrolls_to_keep_cursor_visible() {
        let mut input = LineInput::with_text("abcdefgh");
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        input.render(area, &mut buf, Style::default(), Style::default());
        assert_eq!(render::buffer_lines(&buf), vec!["fgh".to_string()]);
        assert_eq!(input.cursor_pos(area), Some((3, 0)));
    }

    #[test]
    fn placeholder_when_empty() {
        let mut input = LineInput::new().placeholder("Search...");
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        input.render(area, &mut buf, Style::default(), Style::default());
        assert_eq!(render::buffer_lines(&buf), vec!["Search...".to_string()]);
    }
}
