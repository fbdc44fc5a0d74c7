//! Draws the rain onto a [`Surface`].

use crate::Viewport;
use crate::config::Config;
use crate::rendering::color::{Color, Font};
use crate::rendering::surface::Surface;
use crate::simulation::Position;

/// Paints glyph positions on top of a translucent background wash.
///
/// The renderer never clears the surface. Each call dims everything already drawn
/// toward the background color, so older glyphs leave fading trails behind the
/// newest ones.
#[derive(Clone, Debug)]
pub struct RainRenderer {
    font: Font,
    background: Color,
    fade_alpha: f64,
}

impl RainRenderer {
    pub fn new(config: &Config) -> Self {
        Self {
            font: Font::new(config.symbol_font_size, config.symbol_font_family.clone()),
            background: config.canvas_background_color,
            fade_alpha: config.symbol_alpha_fade_rate,
        }
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// One-time setup: match the surface to the viewport and paint it with the opaque background.
    pub fn prepare(&self, surface: &mut dyn Surface, viewport: Viewport) {
        surface.resize(viewport);
        self.paint_background(surface);
    }

    /// Follows a viewport change. Falling columns are not touched; they drift into the new bounds.
    pub fn on_resize(&self, surface: &mut dyn Surface, viewport: Viewport) {
        log::debug!("resizing surface to {}x{}", viewport.width, viewport.height);
        self.prepare(surface, viewport);
    }

    /// Washes the surface with the translucent background, then draws every glyph in `glyph_color`.
    pub fn render_frame(
        &self,
        surface: &mut dyn Surface,
        positions: &[Position],
        glyph_color: Color,
    ) {
        let viewport = surface.viewport();
        surface.set_fill_color(self.background.with_alpha(self.fade_alpha));
        surface.fill_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);

        surface.set_font(&self.font);
        surface.set_fill_color(glyph_color);
        for position in positions {
            surface.fill_text(position.glyph, position.x as f64, position.y);
        }
    }

    fn paint_background(&self, surface: &mut dyn Surface) {
        let viewport = surface.viewport();
        surface.set_fill_color(self.background.with_alpha(1.0));
        surface.fill_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::surface::recording::{Op, RecordingSurface};
    use crate::rendering::surface::TerminalSurface;

    fn positions() -> Vec<Position> {
        vec![
            Position {
                glyph: 'ﾊ',
                x: 0,
                y: 16.0,
            },
            Position {
                glyph: '7',
                x: 32,
                y: 40.5,
            },
        ]
    }

    #[test]
    fn prepare_paints_opaque_background() {
        let renderer = RainRenderer::new(&Config::default());
        let mut surface = RecordingSurface::new(10, 10);
        renderer.prepare(&mut surface, Viewport::new(320, 160));

        let ops = surface.ops().cloned().collect::<Vec<_>>();
        assert_eq!(
            ops,
            vec![
                Op::Resize(Viewport::new(320, 160)),
                Op::FillColor(Color::rgb(0, 0, 0).with_alpha(1.0)),
                Op::FillRect {
                    x: 0.0,
                    y: 0.0,
                    width: 320.0,
                    height: 160.0
                },
            ]
        );
    }

    #[test]
    fn wash_comes_before_glyphs_every_call() {
        let renderer = RainRenderer::new(&Config::default());
        let mut surface = RecordingSurface::new(320, 160);
        let green = Color::rgb(0, 255, 0);
        let white = Color::rgb(255, 255, 255);

        for color in [white, green, white, green] {
            surface.ops.clear();
            renderer.render_frame(&mut surface, &positions(), color);
            let ops = surface.ops().cloned().collect::<Vec<_>>();
            assert_eq!(
                ops,
                vec![
                    Op::FillColor(Color::rgb(0, 0, 0).with_alpha(0.05)),
                    Op::FillRect {
                        x: 0.0,
                        y: 0.0,
                        width: 320.0,
                        height: 160.0
                    },
                    Op::Font(Font::new(16, "monospace")),
                    Op::FillColor(color),
                    Op::Text {
                        glyph: 'ﾊ',
                        x: 0.0,
                        y: 16.0
                    },
                    Op::Text {
                        glyph: '7',
                        x: 32.0,
                        y: 40.5
                    },
                ]
            );
        }
    }

    #[test]
    fn trails_fade_on_a_terminal() {
        let renderer = RainRenderer::new(&Config::default());
        let mut surface = TerminalSurface::new(4, 4, 16, Vec::new());
        renderer.prepare(&mut surface, Viewport::new(64, 64));

        let head = [Position {
            glyph: 'A',
            x: 16,
            y: 16.0,
        }];
        renderer.render_frame(&mut surface, &head, Color::rgb(0, 255, 0));
        assert_eq!(surface.cell(1, 0).unwrap().color, [0, 255, 0]);

        // the glyph is left behind when the column moves on, and fades
        renderer.render_frame(&mut surface, &[], Color::rgb(0, 255, 0));
        let faded = surface.cell(1, 0).unwrap();
        assert_eq!(faded.c, 'A');
        assert!(faded.color[1] < 255 && faded.color[1] > 200);
    }
}
