//! Modal input sessions: keyboard text entry and list choice.
//!
//! Sessions are owned by the [`crate::InputController`] and dropped when the
//! mode resolves, whether by confirm or cancel.

use alloc::string::String;
use alloc::vec::Vec;

use crate::keyboard::{Cursor, Key, KeyboardLayout};

/// Text entry result: `None` means the user cancelled ("no value"),
/// which is distinct from confirming an empty string.
pub type TextResult = Option<String>;

/// Choice result: `None` means cancelled, otherwise the picked index.
pub type ChoiceResult = Option<usize>;

/// Characters the input box shows before truncating
pub const VISIBLE_CHARS: usize = 18;

const ELLIPSIS: &str = "...";

/// What pressing the highlighted key did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    /// The buffer changed (or a gap was pressed)
    Edited,
    /// The confirm key was pressed
    Confirm,
    /// The cancel key was pressed
    Cancel,
}

/// Keyboard text entry state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSession {
    layout: KeyboardLayout,
    buffer: String,
    cursor: Cursor,
}

impl InputSession {
    /// Start with an empty buffer and the cursor on the first cell.
    pub fn new(layout: KeyboardLayout) -> Self {
        Self {
            layout,
            buffer: String::new(),
            cursor: (0, 0),
        }
    }

    /// Entered text
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Keyboard grid
    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    /// Key under the cursor
    pub fn highlighted(&self) -> Key {
        self.layout.key(self.cursor)
    }

    /// Move the cursor up a row
    pub fn cursor_up(&mut self) {
        self.cursor = self.layout.up(self.cursor);
    }

    /// Move the cursor down a row
    pub fn cursor_down(&mut self) {
        self.cursor = self.layout.down(self.cursor);
    }

    /// Move the cursor left, wrapping
    pub fn cursor_left(&mut self) {
        self.cursor = self.layout.left(self.cursor);
    }

    /// Move the cursor right, wrapping
    pub fn cursor_right(&mut self) {
        self.cursor = self.layout.right(self.cursor);
    }

    /// Press the highlighted key.
    pub fn press(&mut self) -> KeyPress {
        match self.highlighted() {
            Key::Char(c) => self.buffer.push(c),
            Key::Space => self.buffer.push(' '),
            Key::Delete => self.backspace(),
            Key::Confirm => return KeyPress::Confirm,
            Key::Cancel => return KeyPress::Cancel,
            Key::Empty => {}
        }
        KeyPress::Edited
    }

    /// Remove the last character, wherever the cursor is.
    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Close the session and take the buffer. The session is consumed, so
    /// no press can reach it afterwards.
    pub fn finish(self) -> String {
        self.buffer
    }

    /// Buffer as shown in the input box: once it is longer than
    /// [`VISIBLE_CHARS`], a leading ellipsis and the tail that fits.
    pub fn display_text(&self) -> String {
        display_tail(&self.buffer, VISIBLE_CHARS)
    }
}

/// Keep the end of `text` within `width` characters, marking the cut with
/// a leading ellipsis.
pub fn display_tail(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return text.into();
    }
    let keep = width.saturating_sub(ELLIPSIS.len());
    let mut out = String::from(ELLIPSIS);
    out.extend(text.chars().skip(len.saturating_sub(keep)));
    out
}

/// List choice state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSession {
    title: String,
    candidates: Vec<String>,
    selected: usize,
}

impl ChoiceSession {
    /// Start on the first candidate.
    pub fn new(title: &str, candidates: Vec<String>) -> Self {
        Self {
            title: title.into(),
            candidates,
            selected: 0,
        }
    }

    /// Title bar text
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Candidates, in caller order
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Highlighted index
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move the highlight by `delta`, clamped to the list.
    pub fn move_by(&mut self, delta: isize) {
        let last = self.candidates.len().saturating_sub(1);
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }
}
