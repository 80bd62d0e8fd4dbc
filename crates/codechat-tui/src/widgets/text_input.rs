//! Editable input buffer with cursor and submission history.

/// State for a text input, managing content and cursor position.
///
/// The cursor counts characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    content: String,
    /// Cursor position (character index).
    pub cursor: usize,
    /// Submitted inputs, oldest first.
    history: Vec<String>,
    /// Position while browsing history (`None` = editing current input).
    history_index: Option<usize>,
    /// Current input saved while browsing history.
    saved_input: String,
}

impl TextInputState {
    /// Create a new empty text input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map_or(self.content.len(), |(i, _)| i)
    }

    /// Clear the content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_offset(self.cursor);
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Take the content into history and clear the input.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        if !content.trim().is_empty() {
            self.history.push(content.clone());
        }
        self.history_index = None;
        self.saved_input.clear();
        content
    }

    /// Navigate to previous history entry.
    pub fn history_prev(&mut self) {
        let next = match self.history_index {
            None if self.history.is_empty() => return,
            None => {
                self.saved_input = self.content.clone();
                self.history.len() - 1
            }
            Some(0) => return,
            Some(i) => i - 1,
        };
        self.history_index = Some(next);
        self.content = self.history[next].clone();
        self.move_end();
    }

    /// Navigate to next history entry, restoring the saved input at the end.
    pub fn history_next(&mut self) {
        let Some(i) = self.history_index else {
            return;
        };
        if i + 1 < self.history.len() {
            self.history_index = Some(i + 1);
            self.content = self.history[i + 1].clone();
        } else {
            self.history_index = None;
            self.content = std::mem::take(&mut self.saved_input);
        }
        self.move_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_state_basic() {
        let mut state = TextInputState::new();
        assert!(state.is_empty());

        state.insert('H');
        state.insert('i');
        assert_eq!(state.content(), "Hi");
        assert_eq!(state.cursor, 2);

        state.backspace();
        assert_eq!(state.content(), "H");

        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn test_text_input_state_cursor_movement() {
        let mut state = TextInputState::new();
        state.insert_str("Hello");

        state.move_left();
        state.move_left();
        assert_eq!(state.cursor, 3);

        state.insert('X');
        assert_eq!(state.content(), "HelXlo");

        state.move_home();
        state.delete();
        assert_eq!(state.content(), "elXlo");

        state.move_end();
        assert_eq!(state.cursor, 5);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut state = TextInputState::new();
        state.insert_str("héllo → ok");
        assert_eq!(state.cursor, 10);

        state.move_home();
        state.move_right();
        state.delete();
        assert_eq!(state.content(), "hllo → ok");

        state.move_end();
        state.move_left();
        state.move_left();
        state.move_left();
        state.backspace();
        assert_eq!(state.content(), "hllo  ok");
    }

    #[test]
    fn test_text_input_state_history() {
        let mut state = TextInputState::new();

        state.insert_str("first");
        state.submit();
        assert!(state.is_empty());

        state.insert_str("second");
        state.submit();

        state.insert_str("draft");
        state.history_prev();
        assert_eq!(state.content(), "second");

        state.history_prev();
        assert_eq!(state.content(), "first");

        state.history_prev();
        assert_eq!(state.content(), "first");

        state.history_next();
        assert_eq!(state.content(), "second");

        state.history_next();
        assert_eq!(state.content(), "draft");
    }

    #[test]
    fn test_blank_submit_not_in_history() {
        let mut state = TextInputState::new();
        state.insert_str("   ");
        assert_eq!(state.submit(), "   ");
        state.history_prev();
        assert!(state.is_empty());
    }
}
