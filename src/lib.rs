#![doc = include_str!("../README.md")]

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, execute};
use std::io;
use std::io::{Stdout, Write, stdout};

pub mod config;
pub mod driver;
pub mod error;
pub mod glyphs;
pub mod rendering;
pub mod seeds;
pub mod simulation;

pub use crate::config::Config;
pub use crate::driver::{AnimationDriver, SleepScheduler, TerminalScheduler};
pub use crate::error::{RainError, Result};

/// Size of the drawable area in virtual pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The viewport of `cols` x `rows` square cells of `cell_size` pixels.
    ///
    /// Saturates at `u32::MAX` instead of overflowing.
    pub fn from_cells(cols: usize, rows: usize, cell_size: u32) -> Self {
        let span = |cells: usize| u32::try_from(cells).unwrap_or(u32::MAX).saturating_mul(cell_size);
        Self {
            width: span(cols),
            height: span(rows),
        }
    }
}

/// The current terminal size as `(cols, rows)`.
pub fn terminal_size() -> io::Result<(usize, usize)> {
    let (cols, rows) = crossterm::terminal::size()?;
    Ok((cols as usize, rows as usize))
}

/// Sets up the terminal for the rain.
///
/// Enters the alternate screen, enables raw mode and hides the cursor.
/// Raw mode keeps key presses from being echoed over the animation.
///
/// It is recommended to call `install_panic_handler` after this function, and `terminal_cleanup` after the loop.
///
/// Note: If you are stuck in a bad terminal state, you can try running `reset` in the terminal.
pub fn terminal_setup() -> io::Result<()> {
    let mut stdout = stdout();

    execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    enable_raw_mode()?;
    execute!(stdout, cursor::Hide)?;

    Ok(())
}

/// Cleans up the terminal after the rain stopped.
///
/// Resets everything done by `terminal_setup`.
pub fn terminal_cleanup() -> io::Result<()> {
    let mut stdout = stdout();
    execute!(
        stdout,
        crossterm::style::ResetColor,
        cursor::Show,
        crossterm::terminal::Clear(crossterm::terminal::ClearType::All)
    )?;

    disable_raw_mode()?;

    execute!(stdout, crossterm::terminal::LeaveAlternateScreen)?;

    Ok(())
}

/// Installs a panic handler that cleans up the terminal before panicking.
///
/// Without this, the panic message would not be displayed properly because we're in a different
/// terminal mode and in the alternate screen.
pub fn install_panic_handler() {
    let old_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |pinfo| {
        if let Err(err) = terminal_cleanup() {
            eprintln!("failed to restore terminal: {err}");
        }
        eprintln!("{}", pinfo);
        old_hook(pinfo);
    }));
}

/// Buffered stdout writer that _only_ writes when explicitly flushed.
///
/// The terminal surface flushes once per presented frame, so a frame reaches the
/// terminal in one write instead of one write per escape sequence.
pub struct FrameWriter {
    buf: Vec<u8>,
    stdout: Stdout,
}

impl FrameWriter {
    pub fn new() -> Self {
        Self {
            buf: vec![],
            stdout: stdout(),
        }
    }
}

impl Default for FrameWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for FrameWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut lock = self.stdout.lock();
        lock.write_all(&self.buf)?;
        lock.flush()?;
        self.buf.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_from_cells() {
        assert_eq!(Viewport::from_cells(80, 24, 16), Viewport::new(1280, 384));
        assert_eq!(Viewport::from_cells(0, 0, 16), Viewport::new(0, 0));
    }

    #[test]
    fn huge_cells_saturate() {
        assert_eq!(
            Viewport::from_cells(80, 24, 60_000_000),
            Viewport::new(u32::MAX, u32::MAX)
        );
        assert_eq!(Viewport::from_cells(usize::MAX, 1, 1), Viewport::new(u32::MAX, 1));
    }
}
