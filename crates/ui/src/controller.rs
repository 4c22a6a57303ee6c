//! Input mode controller: Navigation, TextEntry and Choice.
//!
//! ```text
//!              begin_text()                    begin_choice()
//!  TextEntry <────────────── Navigation ──────────────> Choice
//!      │      Confirm/Cancel     ▲    Select/Cancel        │
//!      └─────────────────────────┴─────────────────────────┘
//! ```
//!
//! The controller owns the single active [`ButtonBinding`]. Entering a
//! modal mode goes through a [`ModalScope`]; leaving it (by any path) hands
//! the scope back, which restores the previous binding verbatim and drops
//! the session.

use alloc::string::String;
use alloc::vec::Vec;

use platform::Button;

use crate::binding::{ButtonBinding, Command, ModalScope};
use crate::keyboard::KeyboardLayout;
use crate::session::{ChoiceResult, ChoiceSession, InputSession, KeyPress, TextResult};

/// Inclusive limits for a numeric request. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumericBounds {
    /// Smallest accepted value
    pub min: Option<i32>,
    /// Largest accepted value
    pub max: Option<i32>,
}

/// Why typed text was not accepted as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    /// Not a finite decimal number
    Invalid,
    /// Below [`NumericBounds::min`]
    BelowMin(i32),
    /// Above [`NumericBounds::max`]
    AboveMax(i32),
}

impl core::fmt::Display for NumberError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Invalid => write!(f, "Please enter a valid number"),
            Self::BelowMin(min) => write!(f, "Value must be >= {min}"),
            Self::AboveMax(max) => write!(f, "Value must be <= {max}"),
        }
    }
}

impl NumericBounds {
    /// Bounds with the given limits
    pub const fn new(min: Option<i32>, max: Option<i32>) -> Self {
        Self { min, max }
    }

    /// Parse `text` (surrounding whitespace ignored) and check the limits.
    pub fn parse(&self, text: &str) -> Result<f64, NumberError> {
        let value: f64 = text.trim().parse().map_err(|_| NumberError::Invalid)?;
        if !value.is_finite() {
            return Err(NumberError::Invalid);
        }
        if let Some(min) = self.min.filter(|min| value < f64::from(*min)) {
            return Err(NumberError::BelowMin(min));
        }
        if let Some(max) = self.max.filter(|max| value > f64::from(*max)) {
            return Err(NumberError::AboveMax(max));
        }
        Ok(value)
    }
}

/// A request for text, shown above the keyboard.
///
/// A numeric request still types on the same keyboard; the caller checks
/// the confirmed text against [`TextRequest::bounds`] and asks again when
/// it does not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRequest {
    title: String,
    prompt: String,
    numeric: Option<NumericBounds>,
}

impl TextRequest {
    /// Create a free-text request
    pub fn new(title: &str, prompt: &str) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
            numeric: None,
        }
    }

    /// Create a request for a number within `bounds`
    pub fn numeric(title: &str, prompt: &str, bounds: NumericBounds) -> Self {
        Self {
            numeric: Some(bounds),
            ..Self::new(title, prompt)
        }
    }

    /// Limits for a numeric request, `None` for free text
    pub fn bounds(&self) -> Option<NumericBounds> {
        self.numeric
    }

    /// Title bar text
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Line shown above the input box
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// The active mode, with its session state.
#[derive(Debug)]
pub enum Mode {
    /// Menu navigation
    Navigation,
    /// Keyboard text entry
    TextEntry {
        /// What was asked for
        request: TextRequest,
        /// Buffer and cursor
        session: InputSession,
        /// Binding to restore on exit
        scope: ModalScope,
    },
    /// List choice
    Choice {
        /// Candidates and highlight
        session: ChoiceSession,
        /// Binding to restore on exit
        scope: ModalScope,
    },
}

/// Navigation-level effect of a button press, for the caller to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    /// Move the menu highlight by this many rows
    Move(isize),
    /// Pop to the parent menu
    Back,
    /// Activate the highlighted item
    Activate,
    /// Redraw without changing state
    Refresh,
}

/// What a button press (or a mode request) produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Navigation mode: apply this to the navigator
    Nav(NavCommand),
    /// Modal state changed; redraw
    Redraw,
    /// Text entry resolved
    Text(TextResult),
    /// Choice resolved
    Choice(ChoiceResult),
    /// Nothing happened
    Ignored,
}

/// Mode requests that cannot be honoured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeError {
    /// A modal mode is already active
    Busy,
}

impl core::fmt::Display for ModeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Busy => write!(f, "modal input already active"),
        }
    }
}

/// The input mode state machine.
#[derive(Debug)]
pub struct InputController {
    binding: ButtonBinding,
    mode: Mode,
    layout: KeyboardLayout,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(KeyboardLayout::default())
    }
}

impl InputController {
    /// Start in Navigation mode with the navigation binding.
    pub fn new(layout: KeyboardLayout) -> Self {
        Self {
            binding: ButtonBinding::NAVIGATION,
            mode: Mode::Navigation,
            layout,
        }
    }

    /// The active binding
    pub fn binding(&self) -> &ButtonBinding {
        &self.binding
    }

    /// The active mode
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Whether a modal mode owns the buttons
    pub fn is_modal(&self) -> bool {
        !matches!(self.mode, Mode::Navigation)
    }

    /// Ask for text. With no display there is nobody to type, so the
    /// request resolves to "no value" at once and nothing is swapped.
    pub fn begin_text(
        &mut self,
        request: TextRequest,
        display_available: bool,
    ) -> Result<Outcome, ModeError> {
        if self.is_modal() {
            return Err(ModeError::Busy);
        }
        if !display_available {
            return Ok(Outcome::Text(None));
        }
        let scope = ModalScope::enter(&mut self.binding, ButtonBinding::TEXT_ENTRY);
        self.mode = Mode::TextEntry {
            request,
            session: InputSession::new(self.layout.clone()),
            scope,
        };
        Ok(Outcome::Redraw)
    }

    /// Ask the user to pick one of `candidates`. An empty list, or no
    /// display, resolves to "no value" at once.
    pub fn begin_choice(
        &mut self,
        title: &str,
        candidates: Vec<String>,
        display_available: bool,
    ) -> Result<Outcome, ModeError> {
        if self.is_modal() {
            return Err(ModeError::Busy);
        }
        if !display_available || candidates.is_empty() {
            return Ok(Outcome::Choice(None));
        }
        let scope = ModalScope::enter(&mut self.binding, ButtonBinding::CHOICE);
        self.mode = Mode::Choice {
            session: ChoiceSession::new(title, candidates),
            scope,
        };
        Ok(Outcome::Redraw)
    }

    /// Abandon any modal mode as if the user had cancelled.
    pub fn cancel(&mut self) -> Outcome {
        match self.mode {
            Mode::Navigation => Outcome::Ignored,
            Mode::TextEntry { .. } => Outcome::Text(self.leave_text(false)),
            Mode::Choice { .. } => Outcome::Choice(self.leave_choice(None)),
        }
    }

    /// Dispatch one press through the active binding.
    pub fn handle(&mut self, button: Button) -> Outcome {
        let command = self.binding.command(button);
        match &mut self.mode {
            Mode::Navigation => match command {
                Command::MoveUp => Outcome::Nav(NavCommand::Move(-1)),
                Command::MoveDown => Outcome::Nav(NavCommand::Move(1)),
                Command::Back => Outcome::Nav(NavCommand::Back),
                Command::Activate => Outcome::Nav(NavCommand::Activate),
                Command::Refresh => Outcome::Nav(NavCommand::Refresh),
                _ => Outcome::Ignored,
            },
            Mode::TextEntry { session, .. } => match command {
                Command::CursorUp => {
                    session.cursor_up();
                    Outcome::Redraw
                }
                Command::CursorDown => {
                    session.cursor_down();
                    Outcome::Redraw
                }
                Command::CursorLeft => {
                    session.cursor_left();
                    Outcome::Redraw
                }
                Command::CursorRight => {
                    session.cursor_right();
                    Outcome::Redraw
                }
                Command::Backspace => {
                    session.backspace();
                    Outcome::Redraw
                }
                Command::PressKey => match session.press() {
                    KeyPress::Edited => Outcome::Redraw,
                    KeyPress::Confirm => Outcome::Text(self.leave_text(true)),
                    KeyPress::Cancel => Outcome::Text(self.leave_text(false)),
                },
                Command::Confirm => Outcome::Text(self.leave_text(true)),
                Command::Cancel => Outcome::Text(self.leave_text(false)),
                _ => Outcome::Ignored,
            },
            Mode::Choice { session, .. } => match command {
                Command::ChoiceUp => {
                    session.move_by(-1);
                    Outcome::Redraw
                }
                Command::ChoiceDown => {
                    session.move_by(1);
                    Outcome::Redraw
                }
                Command::Select => {
                    let picked = session.selected();
                    Outcome::Choice(self.leave_choice(Some(picked)))
                }
                Command::Cancel => Outcome::Choice(self.leave_choice(None)),
                _ => Outcome::Ignored,
            },
        }
    }

    fn leave_text(&mut self, confirmed: bool) -> TextResult {
        match core::mem::replace(&mut self.mode, Mode::Navigation) {
            Mode::TextEntry { session, scope, .. } => {
                scope.exit(&mut self.binding);
                let text = session.finish();
                confirmed.then_some(text)
            }
            other => {
                self.mode = other;
                None
            }
        }
    }

    fn leave_choice(&mut self, picked: ChoiceResult) -> ChoiceResult {
        match core::mem::replace(&mut self.mode, Mode::Navigation) {
            Mode::Choice { scope, .. } => {
                scope.exit(&mut self.binding);
                picked
            }
            other => {
                self.mode = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::Key;

    fn typing() -> InputController {
        let mut c = InputController::default();
        let out = c.begin_text(TextRequest::new("Target", "Enter target IP/URL:"), true);
        assert_eq!(out, Ok(Outcome::Redraw));
        c
    }

    fn session(c: &InputController) -> &InputSession {
        match c.mode() {
            Mode::TextEntry { session, .. } => session,
            other => panic!("not in text entry: {other:?}"),
        }
    }

    #[test]
    fn test_navigation_maps_side_keys() {
        let mut c = InputController::default();
        assert_eq!(c.handle(Button::Key1), Outcome::Nav(NavCommand::Activate));
        assert_eq!(c.handle(Button::Key2), Outcome::Nav(NavCommand::Back));
        assert_eq!(c.handle(Button::Key3), Outcome::Nav(NavCommand::Refresh));
        assert_eq!(c.handle(Button::Left), Outcome::Nav(NavCommand::Back));
        assert_eq!(c.handle(Button::Down), Outcome::Nav(NavCommand::Move(1)));
    }

    #[test]
    fn test_text_entry_installs_its_binding() {
        let c = typing();
        assert_eq!(c.binding(), &ButtonBinding::TEXT_ENTRY);
        assert!(c.is_modal());
    }

    #[test]
    fn test_type_abc_and_confirm_with_ok_key() {
        let mut c = typing();
        c.handle(Button::Center); // a
        c.handle(Button::Right);
        c.handle(Button::Center); // b
        c.handle(Button::Right);
        c.handle(Button::Center); // c
        for _ in 0..4 {
            c.handle(Button::Down);
        }
        for _ in 0..5 {
            c.handle(Button::Right);
        }
        assert_eq!(session(&c).highlighted(), Key::Confirm);
        assert_eq!(c.handle(Button::Center), Outcome::Text(Some("abc".into())));
        assert_eq!(c.binding(), &ButtonBinding::NAVIGATION);
        assert!(matches!(c.mode(), Mode::Navigation));
    }

    #[test]
    fn test_key1_confirms_from_any_cursor() {
        let mut c = typing();
        c.handle(Button::Center);
        c.handle(Button::Down);
        assert_eq!(c.handle(Button::Key1), Outcome::Text(Some("a".into())));
    }

    #[test]
    fn test_confirm_empty_is_not_cancel() {
        let mut c = typing();
        assert_eq!(c.handle(Button::Key1), Outcome::Text(Some(String::new())));
    }

    #[test]
    fn test_cancel_restores_exact_binding_at_every_cursor() {
        let before = *InputController::default().binding();
        for downs in 0..5 {
            for rights in 0..10 {
                let mut c = typing();
                c.handle(Button::Center);
                for _ in 0..downs {
                    c.handle(Button::Down);
                }
                for _ in 0..rights {
                    c.handle(Button::Right);
                }
                assert_eq!(c.handle(Button::Key2), Outcome::Text(None));
                assert_eq!(c.binding(), &before);
                assert!(!c.is_modal());
            }
        }
    }

    #[test]
    fn test_cancel_key_on_grid_returns_no_value() {
        let mut c = typing();
        c.handle(Button::Center);
        for _ in 0..4 {
            c.handle(Button::Down);
        }
        for _ in 0..8 {
            c.handle(Button::Right);
        }
        assert_eq!(session(&c).highlighted(), Key::Cancel);
        assert_eq!(c.handle(Button::Center), Outcome::Text(None));
        assert_eq!(c.binding(), &ButtonBinding::NAVIGATION);
    }

    #[test]
    fn test_key3_backspace_ignores_cursor() {
        let mut c = typing();
        c.handle(Button::Center);
        c.handle(Button::Right);
        c.handle(Button::Center);
        c.handle(Button::Down);
        c.handle(Button::Key3);
        assert_eq!(session(&c).buffer(), "a");
    }

    #[test]
    fn test_headless_text_request_resolves_immediately() {
        let mut c = InputController::default();
        let out = c.begin_text(TextRequest::new("Target", "Enter:"), false);
        assert_eq!(out, Ok(Outcome::Text(None)));
        assert_eq!(c.binding(), &ButtonBinding::NAVIGATION);
        assert!(!c.is_modal());
    }

    #[test]
    fn test_second_modal_request_is_refused() {
        let mut c = typing();
        assert_eq!(
            c.begin_choice("Pick", vec!["x".into()], true),
            Err(ModeError::Busy)
        );
        assert_eq!(c.binding(), &ButtonBinding::TEXT_ENTRY);
    }

    #[test]
    fn test_choice_select_and_cancel() {
        let mut c = InputController::default();
        let options = vec!["home".into(), "office".into(), "lab".into()];
        assert_eq!(c.begin_choice("Saved", options.clone(), true), Ok(Outcome::Redraw));
        assert_eq!(c.binding(), &ButtonBinding::CHOICE);
        c.handle(Button::Down);
        c.handle(Button::Down);
        assert_eq!(c.handle(Button::Center), Outcome::Choice(Some(2)));
        assert_eq!(c.binding(), &ButtonBinding::NAVIGATION);

        assert_eq!(c.begin_choice("Saved", options, true), Ok(Outcome::Redraw));
        assert_eq!(c.handle(Button::Key2), Outcome::Choice(None));
        assert_eq!(c.binding(), &ButtonBinding::NAVIGATION);
    }

    #[test]
    fn test_empty_choice_resolves_to_no_value() {
        let mut c = InputController::default();
        assert_eq!(c.begin_choice("Saved", Vec::new(), true), Ok(Outcome::Choice(None)));
        assert!(!c.is_modal());
    }

    fn timeout_bounds() -> NumericBounds {
        NumericBounds::new(Some(1), Some(3600))
    }

    #[test]
    fn test_numeric_rejects_text_that_is_not_a_number() {
        let b = timeout_bounds();
        assert_eq!(b.parse("abc"), Err(NumberError::Invalid));
        assert_eq!(b.parse(""), Err(NumberError::Invalid));
        assert_eq!(b.parse("1.2.3"), Err(NumberError::Invalid));
        assert_eq!(b.parse("inf"), Err(NumberError::Invalid));
        assert_eq!(
            NumberError::Invalid.to_string(),
            "Please enter a valid number"
        );
    }

    #[test]
    fn test_numeric_checks_both_limits() {
        let b = timeout_bounds();
        assert_eq!(b.parse("0"), Err(NumberError::BelowMin(1)));
        assert_eq!(b.parse("3601"), Err(NumberError::AboveMax(3600)));
        assert_eq!(NumberError::BelowMin(1).to_string(), "Value must be >= 1");
        assert_eq!(NumberError::AboveMax(3600).to_string(), "Value must be <= 3600");
        assert_eq!(b.parse("1"), Ok(1.0));
        assert_eq!(b.parse(" 3600 "), Ok(3600.0));
        assert_eq!(b.parse("2.5"), Ok(2.5));
    }

    #[test]
    fn test_numeric_open_bounds_accept_any_number() {
        assert_eq!(NumericBounds::default().parse("-40"), Ok(-40.0));
    }

    #[test]
    fn test_numeric_request_cancel_is_no_value() {
        let mut c = InputController::default();
        let request = TextRequest::numeric("Scan Timeout", "Seconds:", timeout_bounds());
        assert_eq!(request.bounds(), Some(timeout_bounds()));
        assert_eq!(c.begin_text(request, true), Ok(Outcome::Redraw));
        c.handle(Button::Down);
        c.handle(Button::Down);
        c.handle(Button::Right);
        c.handle(Button::Right);
        c.handle(Button::Right);
        c.handle(Button::Center); // 'x'
        assert_eq!(c.handle(Button::Key2), Outcome::Text(None));
        assert_eq!(c.binding(), &ButtonBinding::NAVIGATION);
    }

    #[test]
    fn test_free_text_request_has_no_bounds() {
        assert_eq!(TextRequest::new("Target", "Enter:").bounds(), None);
    }

    #[test]
    fn test_external_cancel_unwinds_modal() {
        let mut c = typing();
        assert_eq!(c.cancel(), Outcome::Text(None));
        assert_eq!(c.binding(), &ButtonBinding::NAVIGATION);
        assert_eq!(c.cancel(), Outcome::Ignored);
    }
}
