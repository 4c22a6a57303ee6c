//! Button → command bindings and the scoped hand-over between modes.
//!
//! Exactly one [`ButtonBinding`] is active at a time and it lives inside the
//! [`crate::InputController`]. A modal mode installs its own binding through
//! a [`ModalScope`], which holds the outgoing set and is the only way to put
//! it back. Bindings are swapped whole, never merged.

use platform::Button;

/// Zero-argument actions a button can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Highlight the previous menu item
    MoveUp,
    /// Highlight the next menu item
    MoveDown,
    /// Return to the parent menu
    Back,
    /// Activate the highlighted menu item
    Activate,
    /// Redraw the current screen
    Refresh,
    /// Keyboard cursor up
    CursorUp,
    /// Keyboard cursor down
    CursorDown,
    /// Keyboard cursor left
    CursorLeft,
    /// Keyboard cursor right
    CursorRight,
    /// Press the highlighted key
    PressKey,
    /// Accept the modal input
    Confirm,
    /// Abandon the modal input
    Cancel,
    /// Remove the last entered character
    Backspace,
    /// Highlight the previous choice
    ChoiceUp,
    /// Highlight the next choice
    ChoiceDown,
    /// Pick the highlighted choice
    Select,
    /// Do nothing
    Ignore,
}

/// Mapping from each of the eight buttons to a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonBinding {
    commands: [Command; 8],
}

impl ButtonBinding {
    /// Menu navigation. Key1/Key2/Key3 are confirm, back and refresh.
    pub const NAVIGATION: ButtonBinding = ButtonBinding {
        commands: [
            Command::MoveUp,   // Up
            Command::MoveDown, // Down
            Command::Back,     // Left
            Command::Activate, // Right
            Command::Activate, // Center
            Command::Activate, // Key1
            Command::Back,     // Key2
            Command::Refresh,  // Key3
        ],
    };

    /// Keyboard entry. Key1/Key2/Key3 are OK, cancel and delete.
    pub const TEXT_ENTRY: ButtonBinding = ButtonBinding {
        commands: [
            Command::CursorUp,
            Command::CursorDown,
            Command::CursorLeft,
            Command::CursorRight,
            Command::PressKey,
            Command::Confirm,
            Command::Cancel,
            Command::Backspace,
        ],
    };

    /// List choice.
    pub const CHOICE: ButtonBinding = ButtonBinding {
        commands: [
            Command::ChoiceUp,
            Command::ChoiceDown,
            Command::Cancel,
            Command::Select,
            Command::Select,
            Command::Select,
            Command::Cancel,
            Command::Ignore,
        ],
    };

    /// Build a binding from a full table in [`Button::ALL`] order.
    pub const fn from_table(commands: [Command; 8]) -> Self {
        Self { commands }
    }

    /// Command bound to `button`
    pub fn command(&self, button: Button) -> Command {
        self.commands
            .get(button.index())
            .copied()
            .unwrap_or(Command::Ignore)
    }
}

impl Default for ButtonBinding {
    fn default() -> Self {
        Self::NAVIGATION
    }
}

/// Proof that a modal binding is installed, carrying the binding it replaced.
///
/// Not `Clone`: there is exactly one way back per entry.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping the scope loses the binding to restore"]
pub struct ModalScope {
    saved: ButtonBinding,
}

impl ModalScope {
    /// Install `modal` into `active`, keeping the outgoing set.
    pub fn enter(active: &mut ButtonBinding, modal: ButtonBinding) -> Self {
        let saved = core::mem::replace(active, modal);
        Self { saved }
    }

    /// Put the saved binding back verbatim.
    pub fn exit(self, active: &mut ButtonBinding) {
        *active = self.saved;
    }

    /// The binding that will be restored
    pub fn saved(&self) -> &ButtonBinding {
        &self.saved
    }
}
