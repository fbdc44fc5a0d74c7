//! Rendering the rain.
//!
//! **Sub-modules:**
//!
//! *   [`color`](crate::rendering::color): [`Color`](color::Color) and [`Font`](color::Font) values.
//! *   [`cell`](crate::rendering::cell): the [`Cell`](cell::Cell), one terminal character slot.
//! *   [`grid`](crate::rendering::grid): [`Grid`](grid::Grid), a 2D cell buffer.
//! *   [`surface`](crate::rendering::surface): the canvas-like [`Surface`](surface::Surface) trait and
//!     the [`TerminalSurface`](surface::TerminalSurface) implementation.
//! *   [`renderer`](crate::rendering::renderer): [`RainRenderer`](renderer::RainRenderer), which paints
//!     a pool of glyph positions onto a surface.
//!
//! **Rendering Process:**
//!
//! 1.  `RainRenderer::prepare()` sizes the surface and paints the opaque background once.
//! 2.  Every tick, `RainRenderer::render_frame()` washes the whole surface with the background at
//!     the fade alpha, then draws each glyph in the tick's color.
//! 3.  `Surface::present()` makes the frame visible; the terminal surface writes only changed cells.

pub mod cell;
pub mod color;
pub mod grid;
pub mod renderer;
pub mod surface;
