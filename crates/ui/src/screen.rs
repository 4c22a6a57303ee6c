//! Screen identifier enum and transient result screen content.

use alloc::string::String;
use alloc::vec::Vec;

/// Every kind of screen the runtime can put on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Menu list (Navigation mode)
    Menu,
    /// Keyboard grid (TextEntry mode)
    TextEntry,
    /// Candidate list (Choice mode)
    Choice,
    /// Key/value result panel
    Status,
    /// Free-text result panel
    Text,
}

/// Dwell time for status results (ms)
pub const STATUS_DWELL_MS: u64 = 3_000;

/// Dwell time for text results (ms)
pub const TEXT_DWELL_MS: u64 = 5_000;

/// Content of a transient, non-interactive result screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    /// Title plus ordered key/value rows
    Status {
        /// Title bar text
        title: String,
        /// Rows, in display order
        pairs: Vec<(String, String)>,
    },
    /// Title plus free text, split on newlines
    Text {
        /// Title bar text
        title: String,
        /// Body text
        body: String,
    },
    /// A failed action, shown as text under an "Error" title
    Error {
        /// Body text, `Error: ` included
        body: String,
    },
}

/// Title bar text of every error panel
pub const ERROR_TITLE: &str = "Error";

impl ResultView {
    /// A key/value panel
    pub fn status(title: &str, pairs: Vec<(String, String)>) -> Self {
        Self::Status {
            title: title.into(),
            pairs,
        }
    }

    /// A free-text panel
    pub fn text(title: &str, body: &str) -> Self {
        Self::Text {
            title: title.into(),
            body: body.into(),
        }
    }

    /// An error panel for a failed leaf action
    pub fn error(message: &str) -> Self {
        let mut body = String::from("Error: ");
        body.push_str(message);
        Self::Error { body }
    }

    /// Which screen this is
    pub fn screen(&self) -> Screen {
        match self {
            Self::Status { .. } => Screen::Status,
            Self::Text { .. } | Self::Error { .. } => Screen::Text,
        }
    }

    /// How long the screen stays up before the menu returns
    pub fn dwell_ms(&self) -> u64 {
        match self {
            Self::Status { .. } | Self::Error { .. } => STATUS_DWELL_MS,
            Self::Text { .. } => TEXT_DWELL_MS,
        }
    }

    /// Title bar text
    pub fn title(&self) -> &str {
        match self {
            Self::Status { title, .. } | Self::Text { title, .. } => title,
            Self::Error { .. } => ERROR_TITLE,
        }
    }

    /// Whether this reports a failure
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_view_is_short_text() {
        let v = ResultView::error("nmap not found");
        assert_eq!(v.screen(), Screen::Text);
        assert_eq!(v.dwell_ms(), STATUS_DWELL_MS);
        assert_eq!(v.title(), ERROR_TITLE);
        assert!(v.is_error());
        assert_eq!(
            v,
            ResultView::Error {
                body: "Error: nmap not found".into()
            }
        );
    }

    #[test]
    fn test_text_titled_error_keeps_text_dwell() {
        let v = ResultView::text("Error", "Error: copied from a log");
        assert!(!v.is_error());
        assert_eq!(v.dwell_ms(), TEXT_DWELL_MS);
    }

    #[test]
    fn test_status_dwell() {
        let v = ResultView::status("Network", vec![("ssid".into(), "lab".into())]);
        assert_eq!(v.screen(), Screen::Status);
        assert_eq!(v.dwell_ms(), STATUS_DWELL_MS);
        assert_eq!(v.title(), "Network");
    }

    #[test]
    fn test_text_dwell() {
        assert_eq!(ResultView::text("Saved Networks", "home").dwell_ms(), TEXT_DWELL_MS);
    }
}
