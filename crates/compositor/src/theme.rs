//! Colours, fonts and fixed layout metrics for the 128×128 panel.

use embedded_graphics::mono_font::ascii::{FONT_5X8, FONT_6X10, FONT_7X13_BOLD};
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

/// Screen background
pub const BACKGROUND: Rgb888 = Rgb888::BLACK;
/// Normal text
pub const FOREGROUND: Rgb888 = Rgb888::WHITE;
/// Title bar fill
pub const TITLE_BAR: Rgb888 = Rgb888::new(0, 100, 200);
/// Highlighted row fill
pub const HIGHLIGHT: Rgb888 = Rgb888::WHITE;
/// Text on a highlighted row
pub const HIGHLIGHT_TEXT: Rgb888 = Rgb888::BLACK;
/// Splash accent
pub const ACCENT: Rgb888 = Rgb888::new(0, 255, 0);
/// Splash status line
pub const NOTICE: Rgb888 = Rgb888::new(255, 255, 0);

/// Title bar text
pub const TITLE_FONT: &MonoFont<'static> = &FONT_7X13_BOLD;
/// Body text
pub const BODY_FONT: &MonoFont<'static> = &FONT_6X10;
/// Footer hints
pub const SMALL_FONT: &MonoFont<'static> = &FONT_5X8;

/// Title bar height (rows 0..=18)
pub const TITLE_BAR_HEIGHT: u32 = 19;
/// Title text origin
pub const TITLE_ORIGIN: (i32, i32) = (4, 3);
/// Characters of title shown
pub const TITLE_CHARS: usize = 15;

/// First menu row baseline-top
pub const LIST_TOP: i32 = 22;
/// Menu row pitch
pub const LIST_PITCH: i32 = 16;
/// Menu rows on screen
pub const LIST_ROWS: usize = 6;
/// Characters of an unselected item
pub const ITEM_CHARS: usize = 14;
/// Characters of a selected item after the `>` marker
pub const SELECTED_ITEM_CHARS: usize = 13;

/// Text screen line pitch
pub const LINE_PITCH: i32 = 12;
/// Text screen lines on screen
pub const TEXT_LINES: usize = 8;
/// Characters per text screen line
pub const TEXT_CHARS: usize = 20;
/// Characters per status row (`key: value`)
pub const STATUS_CHARS: usize = 18;
/// Status rows on screen
pub const STATUS_ROWS: usize = 8;

/// Keyboard grid top
pub const KEYS_TOP: i32 = 45;
/// Key cell width, right border included
pub const KEY_WIDTH: i32 = 11;
/// Horizontal distance between key origins; ten columns span 1..=120
pub const KEY_PITCH: i32 = KEY_WIDTH + 1;
/// Key cell height
pub const KEY_HEIGHT: i32 = 10;
/// Characters of prompt shown
pub const PROMPT_CHARS: usize = 18;
/// Footer hint line for text entry
pub const TEXT_ENTRY_HINT: &str = "K1:OK K2:Cancel K3:Del";
