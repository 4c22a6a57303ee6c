//! Application UI layer: menu tree, navigation stack, modal input modes.
//!
//! This crate is `no_std` by default; it only uses `core`, `alloc` and
//! `heapless`. Nothing here touches hardware or the clock: every type is a
//! plain state machine driven by button identifiers, which keeps the
//! runtime's behaviour testable on the host.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

extern crate alloc;

pub mod binding;
pub mod controller;
pub mod keyboard;
pub mod menu;
pub mod navigation;
pub mod screen;
pub mod session;

pub use binding::{ButtonBinding, Command, ModalScope};
pub use controller::{
    InputController, Mode, ModeError, NavCommand, NumberError, NumericBounds, Outcome, TextRequest,
};
pub use keyboard::{Key, KeyboardLayout, PEN_DECK};
pub use menu::{MenuDefinition, MenuSet, MenuTree, Target, ROOT_MENU};
pub use navigation::{Activation, NavError, NavigationFrame, Navigator, VISIBLE_ROWS};
pub use screen::{ResultView, Screen, ERROR_TITLE, STATUS_DWELL_MS, TEXT_DWELL_MS};
pub use session::{ChoiceResult, ChoiceSession, InputSession, KeyPress, TextResult};
