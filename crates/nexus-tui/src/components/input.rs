//! Text input buffer with a cursor
//!
//! Backs both the single-line fields (destination, rules, path) and the
//! multi-line payload/headers/body areas.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Position in the buffer (row, column in characters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone)]
pub struct TextInput {
    lines: Vec<String>,
    cursor: Cursor,
    multiline: bool,
}

impl TextInput {
    pub fn single_line() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Cursor::default(),
            multiline: false,
        }
    }

    pub fn multi_line() -> Self {
        Self {
            multiline: true,
            ..Self::single_line()
        }
    }

    /// Full content, lines joined with `\n`
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    /// Replace the content and move the cursor to the end
    pub fn set_content(&mut self, content: &str) {
        self.lines = if self.multiline {
            content.split('\n').map(String::from).collect()
        } else {
            vec![content.replace(['\n', '\r'], " ")]
        };
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        let row = self.lines.len() - 1;
        self.cursor = Cursor {
            row,
            col: char_len(&self.lines[row]),
        };
    }

    pub fn clear(&mut self) {
        self.set_content("");
    }

    /// Insert text at the cursor (used for bracketed paste)
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '\r' => {}
                '\n' => self.newline(),
                c => self.insert_char(c),
            }
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let line = &mut self.lines[self.cursor.row];
        let idx = byte_index(line, self.cursor.col);
        line.insert(idx, c);
        self.cursor.col += 1;
    }

    fn newline(&mut self) {
        if !self.multiline {
            self.insert_char(' ');
            return;
        }
        let line = &mut self.lines[self.cursor.row];
        let idx = byte_index(line, self.cursor.col);
        let rest = line.split_off(idx);
        self.lines.insert(self.cursor.row + 1, rest);
        self.cursor = Cursor {
            row: self.cursor.row + 1,
            col: 0,
        };
    }

    fn backspace(&mut self) {
        if self.cursor.col > 0 {
            let line = &mut self.lines[self.cursor.row];
            let idx = byte_index(line, self.cursor.col - 1);
            line.remove(idx);
            self.cursor.col -= 1;
        } else if self.cursor.row > 0 {
            let current = self.lines.remove(self.cursor.row);
            self.cursor.row -= 1;
            let prev = &mut self.lines[self.cursor.row];
            self.cursor.col = char_len(prev);
            prev.push_str(&current);
        }
    }

    fn delete(&mut self) {
        let len = char_len(&self.lines[self.cursor.row]);
        if self.cursor.col < len {
            let line = &mut self.lines[self.cursor.row];
            let idx = byte_index(line, self.cursor.col);
            line.remove(idx);
        } else if self.cursor.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor.row + 1);
            self.lines[self.cursor.row].push_str(&next);
        }
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.col = char_len(&self.lines[self.cursor.row]);
        }
    }

    fn move_right(&mut self) {
        if self.cursor.col < char_len(&self.lines[self.cursor.row]) {
            self.cursor.col += 1;
        } else if self.cursor.row + 1 < self.lines.len() {
            self.cursor.row += 1;
            self.cursor.col = 0;
        }
    }

    fn move_vertical(&mut self, down: bool) {
        let target = if down {
            (self.cursor.row + 1).min(self.lines.len() - 1)
        } else {
            self.cursor.row.saturating_sub(1)
        };
        self.cursor.row = target;
        self.cursor.col = self.cursor.col.min(char_len(&self.lines[target]));
    }

    /// Handle an editing key. Returns `false` when the key is not an
    /// editing key so the caller can treat it as a command.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Enter if self.multiline => self.newline(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Up if self.multiline => self.move_vertical(false),
            KeyCode::Down if self.multiline => self.move_vertical(true),
            KeyCode::Home => self.cursor.col = 0,
            KeyCode::End => self.cursor.col = char_len(&self.lines[self.cursor.row]),
            _ => return false,
        }
        true
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
