//! Cell representation for the terminal surface.
//!
//! A [`Cell`] is one terminal character slot: the glyph shown in it, the
//! glyph's color and the color behind it. Double-width glyphs take two cells;
//! the second one is a [`Span::WideTail`] placeholder that is never printed.

/// How a cell participates in a (possibly double-width) glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Span {
    /// A normal single-width cell.
    #[default]
    Single,
    /// The left half of a double-width glyph. The glyph is printed from here.
    WideHead,
    /// The right half of a double-width glyph.
    WideTail,
}

/// A single terminal cell.
///
/// # Example
///
/// ```rust
/// use glyphrain::rendering::cell::Cell;
///
/// let cell = Cell::blank([0, 0, 0]).with_glyph('ﾊ', [0, 255, 0]);
/// assert_eq!(cell.c, 'ﾊ');
/// assert!(!cell.is_blank());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub c: char,
    pub color: [u8; 3],
    pub bg_color: [u8; 3],
    pub span: Span,
}

impl Cell {
    /// An empty cell painted with `bg_color`.
    pub fn blank(bg_color: [u8; 3]) -> Self {
        Self {
            c: ' ',
            color: bg_color,
            bg_color,
            span: Span::Single,
        }
    }

    /// Keeps the background, replaces glyph and glyph color.
    pub fn with_glyph(self, c: char, color: [u8; 3]) -> Self {
        Self {
            c,
            color,
            bg_color: self.bg_color,
            span: Span::Single,
        }
    }

    /// A cell is blank when it shows no glyph, or its glyph has faded into the background.
    pub fn is_blank(&self) -> bool {
        self.span != Span::WideTail && (self.c == ' ' || self.color == self.bg_color)
    }

    /// Drops the glyph, keeping the background.
    pub fn erase(&mut self) {
        *self = Cell::blank(self.bg_color);
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::blank([0, 0, 0])
    }
}
