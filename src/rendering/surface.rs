//! Drawing surfaces and the `Surface` trait.
//!
//! This module defines the canvas-like drawing abstraction the rain is painted on:
//!
//! *   [`Surface`] trait: a 2D surface in virtual pixels that supports filled
//!     rectangles with RGBA color and text drawn at a pixel coordinate.
//! *   [`TerminalSurface`] struct: a concrete implementation that maps virtual pixels
//!     onto terminal cells and writes to a sink using `crossterm`.
//!
//! **Key Functionality of `TerminalSurface`:**
//!
//! *   **Pixel mapping:** every cell is a `cell_size` x `cell_size` square of virtual pixels.
//!     Text is positioned by its baseline, so a glyph at `(x, y)` lands in cell
//!     `(floor(x / cell_size), ceil(y / cell_size) - 1)`.
//! *   **Blending:** a translucent fill blends both the glyph color and the background of
//!     every covered cell toward the fill color. Strokes are never erased, only dimmed, and a
//!     glyph whose color has converged to its background turns into a blank cell.
//! *   **Wide glyphs:** double-width glyphs occupy two cells; overwriting either half blanks the other.
//! *   **Diff flushing:** `present()` only writes cells that changed since the last present.

use crate::Viewport;
use crate::rendering::cell::{Cell, Span};
use crate::rendering::color::{Color, Font, lerp_color};
use crate::rendering::grid::Grid;
use crossterm::queue;
use std::io;
use std::io::Write;
use unicode_width::UnicodeWidthChar;

/// A canvas-like 2D drawing surface measured in virtual pixels.
///
/// Drawing state (font and fill color) is sticky, like on an HTML canvas: it applies to
/// every following `fill_rect`/`fill_text` until changed.
pub trait Surface {
    /// Current drawable size in virtual pixels.
    fn viewport(&self) -> Viewport;

    /// Resizes the backing store. Newly exposed area is undefined until painted.
    fn resize(&mut self, viewport: Viewport);

    fn set_font(&mut self, font: &Font);

    fn set_fill_color(&mut self, color: Color);

    /// Fills a rectangle with the current fill color, honoring its alpha.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Draws `glyph` with its baseline at `(x, y)` in the current font and fill color.
    fn fill_text(&mut self, glyph: char, x: f64, y: f64);

    /// Makes everything drawn so far visible.
    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// [`Surface`] implementation that renders to a terminal using `crossterm`.
pub struct TerminalSurface<W: Write> {
    cell_size: u32,
    /// The frame being drawn.
    grid: Grid<Cell>,
    /// What the terminal currently shows, used to only write changed cells.
    shown: Grid<Cell>,
    /// Set after creation and resizes; the next present writes every cell.
    full_redraw: bool,
    font: Option<Font>,
    fill_color: Color,
    sink: W,
}

impl<W: Write> TerminalSurface<W> {
    /// Creates a surface of `cols` x `rows` cells, each `cell_size` virtual pixels wide and tall.
    pub fn new(cols: usize, rows: usize, cell_size: u32, sink: W) -> Self {
        let cell_size = cell_size.max(1);
        Self {
            cell_size,
            grid: Grid::new(cols, rows, Cell::default()),
            shown: Grid::new(cols, rows, Cell::default()),
            full_redraw: true,
            font: None,
            fill_color: Color::default(),
            sink,
        }
    }

    pub fn cols(&self) -> usize {
        self.grid.width()
    }

    pub fn rows(&self) -> usize {
        self.grid.height()
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// The cell at `(col, row)` as currently drawn (not necessarily presented).
    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        self.grid.get(col, row)
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Maps a pixel x coordinate to a column. May be out of range.
    fn col_of(&self, x: f64) -> i64 {
        (x / self.cell_size as f64).floor() as i64
    }

    /// Maps a baseline pixel y coordinate to the row containing the glyph body. May be out of range.
    fn row_of(&self, y: f64) -> i64 {
        (y / self.cell_size as f64).ceil() as i64 - 1
    }

    /// Erases the cell at `(x, y)` and the other half of a wide glyph it belongs to.
    fn erase_at(&mut self, x: usize, y: usize) {
        let Some(cell) = self.grid.get_mut(x, y) else {
            return;
        };
        let span = cell.span;
        cell.erase();
        let partner = match span {
            Span::Single => None,
            Span::WideHead => Some(x + 1),
            Span::WideTail => x.checked_sub(1),
        };
        if let Some(partner) = partner.and_then(|px| self.grid.get_mut(px, y)) {
            partner.erase();
        }
    }

    /// Erases whatever currently covers `(x, y)` if it is part of a wide glyph.
    fn break_wide_at(&mut self, x: usize, y: usize) {
        if self
            .grid
            .get(x, y)
            .is_some_and(|cell| cell.span != Span::Single)
        {
            self.erase_at(x, y);
        }
    }

    fn blend_cell(&mut self, x: usize, y: usize, color: [u8; 3], alpha: f64) {
        let cell = &mut self.grid[(x, y)];
        if alpha >= 1.0 {
            *cell = Cell::blank(color);
            return;
        }
        cell.color = lerp_color(cell.color, color, alpha);
        cell.bg_color = lerp_color(cell.bg_color, color, alpha);
        if cell.color == cell.bg_color && cell.c != ' ' {
            self.erase_at(x, y);
        }
    }

    /// Writes every changed cell to the sink and flushes it.
    fn flush(&mut self) -> io::Result<()> {
        let mut cursor: Option<(usize, usize)> = None;
        let mut colors: Option<([u8; 3], [u8; 3])> = None;

        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                let cell = self.grid[(x, y)];
                if cell.span == Span::WideTail {
                    continue;
                }
                if !self.full_redraw && cell == self.shown[(x, y)] {
                    // a head is unchanged only if its tail is too
                    let tail_same = cell.span != Span::WideHead
                        || self.grid.get(x + 1, y) == self.shown.get(x + 1, y);
                    if tail_same {
                        continue;
                    }
                }
                if cursor != Some((x, y)) {
                    queue!(self.sink, crossterm::cursor::MoveTo(x as u16, y as u16))?;
                }
                if colors != Some((cell.color, cell.bg_color)) {
                    let [r, g, b] = cell.color;
                    let [br, bgc, bb] = cell.bg_color;
                    queue!(
                        self.sink,
                        crossterm::style::SetColors(crossterm::style::Colors {
                            foreground: Some(crossterm::style::Color::Rgb { r, g, b }),
                            background: Some(crossterm::style::Color::Rgb {
                                r: br,
                                g: bgc,
                                b: bb,
                            }),
                        })
                    )?;
                    colors = Some((cell.color, cell.bg_color));
                }
                queue!(self.sink, crossterm::style::Print(cell.c))?;
                let advance = if cell.span == Span::WideHead { 2 } else { 1 };
                cursor = Some((x + advance, y));
            }
        }

        self.sink.flush()?;
        self.shown.clone_from(&self.grid);
        self.full_redraw = false;
        Ok(())
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn viewport(&self) -> Viewport {
        Viewport::from_cells(self.cols(), self.rows(), self.cell_size)
    }

    fn resize(&mut self, viewport: Viewport) {
        let cols = (viewport.width / self.cell_size) as usize;
        let rows = (viewport.height / self.cell_size) as usize;
        self.grid.resize(cols, rows);
        self.shown.resize(cols, rows);
        // a wide glyph cut in half by the new right edge cannot be shown
        if let Some(last) = cols.checked_sub(1) {
            for y in 0..rows {
                if self.grid[(last, y)].span == Span::WideHead {
                    self.grid[(last, y)].erase();
                }
            }
        }
        self.full_redraw = true;
    }

    fn set_font(&mut self, font: &Font) {
        if self.font.as_ref() != Some(font) {
            // terminals have a single fixed font; the size only matters as cell size
            log::debug!("terminal surface font set to {font}");
            self.font = Some(font.clone());
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let cs = self.cell_size as f64;
        let clamp = |v: f64, max: usize| v.clamp(0.0, max as f64) as usize;
        let col_start = clamp((x / cs).floor(), self.cols());
        let col_end = clamp(((x + width) / cs).ceil(), self.cols());
        let row_start = clamp((y / cs).floor(), self.rows());
        let row_end = clamp(((y + height) / cs).ceil(), self.rows());

        let color = self.fill_color.channels();
        let alpha = self.fill_color.effective_alpha();
        for row in row_start..row_end {
            for col in col_start..col_end {
                self.blend_cell(col, row, color, alpha);
            }
        }
    }

    fn fill_text(&mut self, glyph: char, x: f64, y: f64) {
        let (col, row) = (self.col_of(x), self.row_of(y));
        if col < 0 || row < 0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        let width = glyph.width().unwrap_or(0);
        if width == 0 || row >= self.rows() || col + width > self.cols() {
            return;
        }

        for covered in col..col + width {
            self.break_wide_at(covered, row);
        }

        let fill = self.fill_color;
        let cell = &mut self.grid[(col, row)];
        let color = lerp_color(cell.bg_color, fill.channels(), fill.effective_alpha());
        *cell = cell.with_glyph(glyph, color);
        if width == 2 {
            cell.span = Span::WideHead;
            let head = *cell;
            self.grid[(col + 1, row)] = Cell {
                c: ' ',
                span: Span::WideTail,
                ..head
            };
        }
    }

    fn present(&mut self) -> io::Result<()> {
        self.flush()
    }
}
