//! Screen renderers.
//!
//! Layout (128×128):
//!
//! ```text
//!  0 ┌──────────────────────────┐
//!    │ Title (bar, 19 px)       │
//! 19 ├──────────────────────────┤
//! 22 │ row 0                    │  menu/choice: 6 rows × 16 px
//!    │ ...                      │  text/status: 8 lines × 12 px
//!    └──────────────────────────┘
//! ```

// Coordinates are small constants and bounded loop indices on a 128×128
// panel; none of the i32 arithmetic below can overflow.
#![allow(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::arithmetic_side_effects
)]

use alloc::format;

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use platform::config::{PANEL_HEIGHT, PANEL_WIDTH};
use platform::PixelBuffer;
use ui::keyboard::{Cursor, Key, KeyboardLayout, COLS};
use ui::navigation::scroll_for;
use ui::session::display_tail;
use ui::ResultView;

use crate::draw::{clip, clipped_text, fill_rect, outline_rect, text};
use crate::theme::*;

const RIGHT: i32 = PANEL_WIDTH as i32 - 1;
const BOTTOM: i32 = PANEL_HEIGHT as i32 - 1;

fn frame() -> PixelBuffer {
    PixelBuffer::new(PANEL_WIDTH, PANEL_HEIGHT, BACKGROUND)
}

fn done(result: Result<(), Infallible>) {
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

fn draw_title_bar<D>(display: &mut D, title: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    fill_rect(display, 0, 0, RIGHT, TITLE_BAR_HEIGHT as i32 - 1, TITLE_BAR)?;
    let (x, y) = TITLE_ORIGIN;
    clipped_text(display, title, TITLE_CHARS, x, y, TITLE_FONT, FOREGROUND)
}

fn draw_list<D, S>(display: &mut D, items: &[S], selected: usize, scroll: usize) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
    S: AsRef<str>,
{
    for (row, (index, item)) in items
        .iter()
        .enumerate()
        .skip(scroll)
        .take(LIST_ROWS)
        .enumerate()
    {
        let y = LIST_TOP + row as i32 * LIST_PITCH;
        if index == selected {
            fill_rect(display, 2, y - 1, RIGHT - 2, y + 14, HIGHLIGHT)?;
            let label = format!(">{}", clip(item.as_ref(), SELECTED_ITEM_CHARS));
            text(display, &label, 6, y + 2, BODY_FONT, HIGHLIGHT_TEXT)?;
        } else {
            clipped_text(display, item.as_ref(), ITEM_CHARS, 6, y + 2, BODY_FONT, FOREGROUND)?;
        }
    }
    Ok(())
}

/// Menu screen: title bar plus up to six items starting at `scroll`.
pub fn draw_menu<D, S>(
    display: &mut D,
    title: &str,
    items: &[S],
    selected: usize,
    scroll: usize,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
    S: AsRef<str>,
{
    display.clear(BACKGROUND)?;
    draw_title_bar(display, title)?;
    draw_list(display, items, selected, scroll)
}

/// Render a menu into a fresh frame.
pub fn render_menu<S: AsRef<str>>(title: &str, items: &[S], selected: usize, scroll: usize) -> PixelBuffer {
    let mut buf = frame();
    done(draw_menu(&mut buf, title, items, selected, scroll));
    buf
}

/// Choice screen: a menu-style list that scrolls just enough to keep the
/// highlight visible.
pub fn draw_choice<D, S>(display: &mut D, title: &str, items: &[S], selected: usize) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
    S: AsRef<str>,
{
    draw_menu(display, title, items, selected, scroll_for(selected, 0))
}

/// Render a choice list into a fresh frame.
pub fn render_choice<S: AsRef<str>>(title: &str, items: &[S], selected: usize) -> PixelBuffer {
    let mut buf = frame();
    done(draw_choice(&mut buf, title, items, selected));
    buf
}

fn key_label(key: Key, scratch: &mut [u8; 4]) -> &str {
    match key {
        Key::Char(c) => c.encode_utf8(scratch),
        other => other.special_label().unwrap_or(""),
    }
}

/// Text entry screen: compact title, prompt, input box, keyboard grid and
/// the side-key hint.
pub fn draw_text_entry<D>(
    display: &mut D,
    title: &str,
    prompt: &str,
    buffer: &str,
    cursor: Cursor,
    layout: &KeyboardLayout,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    display.clear(BACKGROUND)?;
    fill_rect(display, 0, 0, RIGHT, 12, TITLE_BAR)?;
    clipped_text(display, title, TITLE_CHARS, 2, 2, BODY_FONT, FOREGROUND)?;
    clipped_text(display, prompt, PROMPT_CHARS, 2, 15, BODY_FONT, FOREGROUND)?;

    outline_rect(display, 0, 28, RIGHT, 42, FOREGROUND)?;
    let shown = display_tail(buffer, ui::session::VISIBLE_CHARS);
    text(display, &shown, 2, 31, BODY_FONT, FOREGROUND)?;

    let mut scratch = [0u8; 4];
    for (row_idx, row) in layout.rows().iter().enumerate() {
        let y = KEYS_TOP + row_idx as i32 * (KEY_HEIGHT + 2);
        for (col_idx, key) in row.iter().take(COLS).enumerate() {
            if !key.is_selectable() {
                continue;
            }
            let x = 2 + col_idx as i32 * KEY_PITCH;
            let label = key_label(*key, &mut scratch);
            // two-letter labels only fit the cell in the small font
            let font = if label.len() > 1 { SMALL_FONT } else { BODY_FONT };
            if (row_idx, col_idx) == cursor {
                fill_rect(display, x - 1, y - 1, x + KEY_WIDTH - 1, y + KEY_HEIGHT - 1, HIGHLIGHT)?;
                text(display, label, x, y, font, HIGHLIGHT_TEXT)?;
            } else {
                outline_rect(display, x - 1, y - 1, x + KEY_WIDTH - 1, y + KEY_HEIGHT - 1, FOREGROUND)?;
                text(display, label, x, y, font, FOREGROUND)?;
            }
        }
    }

    text(display, TEXT_ENTRY_HINT, 2, BOTTOM - 12, SMALL_FONT, FOREGROUND)
}

/// Render the text entry screen into a fresh frame.
pub fn render_text_entry(
    title: &str,
    prompt: &str,
    buffer: &str,
    cursor: Cursor,
    layout: &KeyboardLayout,
) -> PixelBuffer {
    let mut buf = frame();
    done(draw_text_entry(&mut buf, title, prompt, buffer, cursor, layout));
    buf
}

/// Status screen: title bar plus up to eight `key: value` rows.
pub fn draw_status<D, K, V>(display: &mut D, title: &str, pairs: &[(K, V)]) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    display.clear(BACKGROUND)?;
    draw_title_bar(display, title)?;
    for (i, (key, value)) in pairs.iter().take(STATUS_ROWS).enumerate() {
        let row = format!("{}: {}", key.as_ref(), value.as_ref());
        let y = LIST_TOP + i as i32 * LINE_PITCH;
        clipped_text(display, &row, STATUS_CHARS, 4, y, BODY_FONT, FOREGROUND)?;
    }
    Ok(())
}

/// Render a status screen into a fresh frame.
pub fn render_status<K: AsRef<str>, V: AsRef<str>>(title: &str, pairs: &[(K, V)]) -> PixelBuffer {
    let mut buf = frame();
    done(draw_status(&mut buf, title, pairs));
    buf
}

/// Text screen: title bar plus the first eight lines of `body`, each cut
/// to twenty characters. No wrapping.
pub fn draw_text<D>(display: &mut D, title: &str, body: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    display.clear(BACKGROUND)?;
    draw_title_bar(display, title)?;
    for (i, line) in body.lines().take(TEXT_LINES).enumerate() {
        let y = LIST_TOP + i as i32 * LINE_PITCH;
        clipped_text(display, line, TEXT_CHARS, 4, y, BODY_FONT, FOREGROUND)?;
    }
    Ok(())
}

/// Render a text screen into a fresh frame.
pub fn render_text(title: &str, body: &str) -> PixelBuffer {
    let mut buf = frame();
    done(draw_text(&mut buf, title, body));
    buf
}

/// Render whichever result screen `view` describes.
pub fn render_result(view: &ResultView) -> PixelBuffer {
    match view {
        ResultView::Status { title, pairs } => render_status(title, pairs),
        ResultView::Text { title, body } => render_text(title, body),
        ResultView::Error { body } => render_text(view.title(), body),
    }
}

/// Boot splash.
pub fn draw_splash<D>(display: &mut D, version: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    display.clear(BACKGROUND)?;
    outline_rect(display, 0, 0, RIGHT, BOTTOM, TITLE_BAR)?;
    outline_rect(display, 1, 1, RIGHT - 1, BOTTOM - 1, TITLE_BAR)?;
    text(display, "PEN-DECK", 36, 32, TITLE_FONT, FOREGROUND)?;
    text(display, "Cybersecurity", 25, 55, BODY_FONT, ACCENT)?;
    text(display, "Companion", 37, 67, BODY_FONT, ACCENT)?;
    text(display, "Loading...", 34, 92, BODY_FONT, NOTICE)?;
    text(display, version, 4, BOTTOM - 11, SMALL_FONT, FOREGROUND)
}

/// Render the boot splash into a fresh frame.
pub fn render_splash(version: &str) -> PixelBuffer {
    let mut buf = frame();
    done(draw_splash(&mut buf, version));
    buf
}
