//! # Edit Buffer
//!
//! The live text of a config being edited, with a byte-offset cursor that
//! always sits on a char boundary.

/// A single editing operation from the input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Insert(char),
    Newline,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    text: String,
    cursor: usize,
}

impl EditBuffer {
    /// Buffer holding `text` with the cursor at the start.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the whole text, keeping the cursor where it was when possible.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.cursor.min(self.text.len());
        while !self.text.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    /// Reset to `text` with the cursor at the start.
    pub fn reset(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.cursor = 0;
    }

    fn line_start(&self) -> usize {
        self.text[..self.cursor].rfind('\n').map_or(0, |i| i + 1)
    }

    fn line_end(&self) -> usize {
        self.text[self.cursor..]
            .find('\n')
            .map_or(self.text.len(), |i| self.cursor + i)
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor]
            .chars()
            .next_back()
            .map(|c| self.cursor - c.len_utf8())
    }

    fn next_boundary(&self) -> Option<usize> {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    /// Byte offset of column `col` (in chars) on the line starting at
    /// `start`, clamped to the line's end.
    fn offset_in_line(&self, start: usize, col: usize) -> usize {
        let line = &self.text[start..];
        let line = line.split('\n').next().unwrap_or_default();
        line.char_indices()
            .nth(col)
            .map_or(start + line.len(), |(i, _)| start + i)
    }

    /// Zero-based `(line, column)` of the cursor, column counted in chars.
    pub fn cursor_position(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor];
        let line = before.matches('\n').count();
        let col = self.text[self.line_start()..self.cursor].chars().count();
        (line, col)
    }

    /// Apply an operation. Returns `true` when the text changed.
    pub fn apply(&mut self, op: EditOp) -> bool {
        match op {
            EditOp::Insert(c) => {
                self.text.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                true
            }
            EditOp::Newline => self.apply(EditOp::Insert('\n')),
            EditOp::Backspace => match self.prev_boundary() {
                Some(prev) => {
                    self.text.replace_range(prev..self.cursor, "");
                    self.cursor = prev;
                    true
                }
                None => false,
            },
            EditOp::Delete => match self.next_boundary() {
                Some(next) => {
                    self.text.replace_range(self.cursor..next, "");
                    true
                }
                None => false,
            },
            EditOp::Left => {
                if let Some(prev) = self.prev_boundary() {
                    self.cursor = prev;
                }
                false
            }
            EditOp::Right => {
                if let Some(next) = self.next_boundary() {
                    self.cursor = next;
                }
                false
            }
            EditOp::Up => {
                let start = self.line_start();
                if start > 0 {
                    let (_, col) = self.cursor_position();
                    let prev_start = self.text[..start - 1].rfind('\n').map_or(0, |i| i + 1);
                    self.cursor = self.offset_in_line(prev_start, col);
                }
                false
            }
            EditOp::Down => {
                let end = self.line_end();
                if end < self.text.len() {
                    let (_, col) = self.cursor_position();
                    self.cursor = self.offset_in_line(end + 1, col);
                }
                false
            }
            EditOp::Home => {
                self.cursor = self.line_start();
                false
            }
            EditOp::End => {
                self.cursor = self.line_end();
                false
            }
        }
    }
}
