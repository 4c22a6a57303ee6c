//! On-screen keyboard grid.
//!
//! Five rows of up to ten cells. Cells marked [`Key::Empty`] are never
//! selectable: the cursor skips them in every direction.

/// Rows in the grid
pub const ROWS: usize = 5;

/// Columns in the grid
pub const COLS: usize = 10;

/// One keyboard cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Appends its character
    Char(char),
    /// Appends a space
    Space,
    /// Removes the last character
    Delete,
    /// Confirms the entry
    Confirm,
    /// Abandons the entry
    Cancel,
    /// Unselectable gap
    Empty,
}

impl Key {
    /// Whether the cursor may land on this cell
    pub const fn is_selectable(self) -> bool {
        !matches!(self, Key::Empty)
    }

    /// Glyphs drawn for special keys; `None` for characters and gaps.
    pub const fn special_label(self) -> Option<&'static str> {
        match self {
            Key::Space => Some("SP"),
            Key::Delete => Some("<-"),
            Key::Confirm => Some("OK"),
            Key::Cancel => Some("X"),
            Key::Char(_) | Key::Empty => None,
        }
    }
}

/// Grid position `(row, col)`
pub type Cursor = (usize, usize);

/// A fixed keyboard grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardLayout {
    rows: [[Key; COLS]; ROWS],
}

#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // const-evaluated, bounded by COLS
const fn chars(s: [char; COLS]) -> [Key; COLS] {
    let mut out = [Key::Empty; COLS];
    let mut i = 0;
    while i < COLS {
        out[i] = Key::Char(s[i]);
        i += 1;
    }
    out
}

/// The Pen-Deck keyboard
pub const PEN_DECK: KeyboardLayout = KeyboardLayout {
    rows: [
        chars(['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j']),
        chars(['k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't']),
        chars(['u', 'v', 'w', 'x', 'y', 'z', '1', '2', '3', '4']),
        chars(['5', '6', '7', '8', '9', '0', '.', '-', '_', '&']),
        [
            Key::Char('@'),
            Key::Char('/'),
            Key::Char(':'),
            Key::Char('?'),
            Key::Char('='),
            Key::Space,
            Key::Delete,
            Key::Confirm,
            Key::Cancel,
            Key::Empty,
        ],
    ],
};

impl Default for KeyboardLayout {
    fn default() -> Self {
        PEN_DECK
    }
}

impl KeyboardLayout {
    /// Build a layout from explicit rows.
    pub const fn from_rows(rows: [[Key; COLS]; ROWS]) -> Self {
        Self { rows }
    }

    /// Cell at `(row, col)`; out-of-range positions read as empty.
    pub fn key(&self, (row, col): Cursor) -> Key {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(Key::Empty)
    }

    /// All rows, top to bottom
    pub fn rows(&self) -> &[[Key; COLS]; ROWS] {
        &self.rows
    }

    /// Nearest selectable cell strictly above, in the same column.
    pub fn up(&self, (row, col): Cursor) -> Cursor {
        (0..row)
            .rev()
            .find(|r| self.key((*r, col)).is_selectable())
            .map_or((row, col), |r| (r, col))
    }

    /// Nearest selectable cell strictly below, in the same column.
    pub fn down(&self, (row, col): Cursor) -> Cursor {
        (row.saturating_add(1)..ROWS)
            .find(|r| self.key((*r, col)).is_selectable())
            .map_or((row, col), |r| (r, col))
    }

    /// Previous selectable cell in the row, wrapping to the last one.
    pub fn left(&self, (row, col): Cursor) -> Cursor {
        (1..=COLS)
            .map(|step| (col.wrapping_add(COLS).wrapping_sub(step)) % COLS)
            .find(|c| self.key((row, *c)).is_selectable())
            .map_or((row, col), |c| (row, c))
    }

    /// Next selectable cell in the row, wrapping to the first one.
    pub fn right(&self, (row, col): Cursor) -> Cursor {
        (1..=COLS)
            .map(|step| col.wrapping_add(step) % COLS)
            .find(|c| self.key((row, *c)).is_selectable())
            .map_or((row, col), |c| (row, c))
    }

    /// Where `key` sits, scanning row by row.
    pub fn position_of(&self, key: Key) -> Option<Cursor> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.iter().position(|k| *k == key).map(|c| (r, c))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_wraps_to_first_cell() {
        assert_eq!(PEN_DECK.right((0, 9)), (0, 0));
        assert_eq!(PEN_DECK.right((0, 3)), (0, 4));
    }

    #[test]
    fn test_left_wraps_to_last_selectable_cell() {
        assert_eq!(PEN_DECK.left((0, 0)), (0, 9));
        // last cell of the bottom row is a gap
        assert_eq!(PEN_DECK.left((4, 0)), (4, 8));
    }

    #[test]
    fn test_right_skips_gap_and_wraps() {
        assert_eq!(PEN_DECK.right((4, 8)), (4, 0));
    }

    #[test]
    fn test_down_skips_gap_and_stays() {
        // column 9 has no selectable cell on the bottom row
        assert_eq!(PEN_DECK.down((3, 9)), (3, 9));
        assert_eq!(PEN_DECK.down((0, 2)), (1, 2));
    }

    #[test]
    fn test_up_stops_at_top_row() {
        assert_eq!(PEN_DECK.up((0, 5)), (0, 5));
        assert_eq!(PEN_DECK.up((4, 7)), (3, 7));
    }

    #[test]
    fn test_special_keys_are_on_bottom_row() {
        assert_eq!(PEN_DECK.position_of(Key::Confirm), Some((4, 7)));
        assert_eq!(PEN_DECK.position_of(Key::Cancel), Some((4, 8)));
        assert_eq!(PEN_DECK.key((4, 9)), Key::Empty);
    }

    #[test]
    fn test_out_of_range_reads_empty() {
        assert_eq!(PEN_DECK.key((5, 0)), Key::Empty);
        assert_eq!(PEN_DECK.key((0, 10)), Key::Empty);
    }
}
