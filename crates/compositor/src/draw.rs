//! Primitive draw operations shared by every screen.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

/// Longest prefix of `s` with at most `max_chars` characters.
pub fn clip(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => s.get(..end).unwrap_or(s),
        None => s,
    }
}

/// Filled rectangle spanning the inclusive corners `(x0, y0)`..`(x1, y1)`.
pub fn fill_rect<D>(display: &mut D, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    Rectangle::with_corners(Point::new(x0, y0), Point::new(x1, y1))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
}

/// One-pixel outline spanning the inclusive corners `(x0, y0)`..`(x1, y1)`.
pub fn outline_rect<D>(display: &mut D, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    Rectangle::with_corners(Point::new(x0, y0), Point::new(x1, y1))
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(display)
}

/// Text with its top-left corner at `(x, y)`.
pub fn text<D>(display: &mut D, s: &str, x: i32, y: i32, font: &MonoFont<'_>, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let style = MonoTextStyle::new(font, color);
    Text::with_baseline(s, Point::new(x, y), style, Baseline::Top)
        .draw(display)
        .map(|_| ())
}

/// Text cut to `max_chars` characters.
pub fn clipped_text<D>(
    display: &mut D,
    s: &str,
    max_chars: usize,
    x: i32,
    y: i32,
    font: &MonoFont<'_>,
    color: Rgb888,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    text(display, clip(s, max_chars), x, y, font, color)
}
