//! Falling-column simulation.
//!
//! Every pool slot holds one [`Position`]: a glyph at a pixel column and a continuous
//! baseline row. Each advance moves it down by somewhere between 0.75 and 1.5 font sizes
//! and draws a new glyph for it. Once it falls past the bottom edge, the slot respawns
//! near the top at a random column.
//!
//! All functions here are pure: they take the viewport and a random source explicitly
//! and return new values.

use crate::Viewport;
use crate::glyphs::GlyphSet;
use rand::Rng;

/// Offset divisor used when the pool is first filled: spread over the whole height.
pub const INITIAL_OFFSET_DIVISOR: f64 = 1.0;
/// Offset divisor used on respawn: start within the top eighth.
pub const RESPAWN_OFFSET_DIVISOR: f64 = 8.0;
/// Pixels every initialized position is shifted up by, so columns start above the edge.
pub const SPAWN_LIFT: f64 = 50.0;

/// A single glyph of a falling column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub glyph: char,
    /// Pixel column, always a multiple of the font size.
    pub x: i64,
    /// Baseline pixel row.
    pub y: f64,
}

/// Creates a fresh position at a random grid column.
///
/// `y` is drawn from `[0, height / offset_divisor)` and then lifted by [`SPAWN_LIFT`].
pub fn initialize_position(
    font_size: u32,
    viewport: Viewport,
    offset_divisor: f64,
    glyphs: &GlyphSet,
    rng: &mut impl Rng,
) -> Position {
    let font_size = font_size as f64;
    let glyph = glyphs.pick_random(rng);
    let column = (rng.gen_range(0.0..1.0) * viewport.width as f64 / font_size).floor();
    let y = rng.gen_range(0.0..1.0) * viewport.height as f64 / offset_divisor - SPAWN_LIFT;
    Position {
        glyph,
        x: (column * font_size) as i64,
        y,
    }
}

/// Samples how far a column falls in one advance: `[0.75, 1.5)` font sizes.
pub fn fall_distance(font_size: u32, rng: &mut impl Rng) -> f64 {
    let base = font_size as f64 * 3.0 / 4.0;
    base + rng.gen_range(0.0..1.0) * base
}

/// Advances one column by a freshly sampled fall distance.
pub fn advance(
    position: Position,
    font_size: u32,
    viewport: Viewport,
    glyphs: &GlyphSet,
    rng: &mut impl Rng,
) -> Position {
    let fall = fall_distance(font_size, rng);
    advance_by(position, fall, font_size, viewport, glyphs, rng)
}

/// Advances one column by `fall` pixels.
///
/// Past the bottom edge the column respawns near the top; otherwise it keeps its column
/// and shows a new glyph at the lower row.
pub fn advance_by(
    position: Position,
    fall: f64,
    font_size: u32,
    viewport: Viewport,
    glyphs: &GlyphSet,
    rng: &mut impl Rng,
) -> Position {
    let y = position.y + fall;
    if y > viewport.height as f64 {
        return initialize_position(font_size, viewport, RESPAWN_OFFSET_DIVISOR, glyphs, rng);
    }
    Position {
        glyph: glyphs.pick_random(rng),
        x: position.x,
        y,
    }
}

/// The fixed-size set of falling columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Pool {
    positions: Vec<Position>,
}

impl Pool {
    /// Fills a pool with `count` positions spread over the whole viewport.
    pub fn new(
        count: usize,
        font_size: u32,
        viewport: Viewport,
        glyphs: &GlyphSet,
        rng: &mut impl Rng,
    ) -> Self {
        let positions = (0..count)
            .map(|_| initialize_position(font_size, viewport, INITIAL_OFFSET_DIVISOR, glyphs, rng))
            .collect();
        Self { positions }
    }

    /// Advances every slot once, keeping size and slot order.
    pub fn advance_all(
        &self,
        font_size: u32,
        viewport: Viewport,
        glyphs: &GlyphSet,
        rng: &mut impl Rng,
    ) -> Pool {
        let positions = self
            .positions
            .iter()
            .map(|&position| advance(position, font_size, viewport, glyphs, rng))
            .collect();
        Pool { positions }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const FONT: u32 = 16;

    fn viewport() -> Viewport {
        Viewport::new(640, 480)
    }

    #[test]
    fn pool_of_sixty_on_the_column_grid() {
        let glyphs = GlyphSet::default();
        let mut rng = StdRng::seed_from_u64(60);
        let pool = Pool::new(60, FONT, viewport(), &glyphs, &mut rng);

        assert_eq!(pool.len(), 60);
        for position in pool.positions() {
            assert_eq!(position.x % FONT as i64, 0);
            assert!((0..640).contains(&position.x));
            assert!(position.y >= -SPAWN_LIFT && position.y < 480.0 - SPAWN_LIFT);
        }
    }

    #[test]
    fn pool_size_is_invariant() {
        let glyphs = GlyphSet::default();
        let mut rng = StdRng::seed_from_u64(1);
        for count in [1, 7, 60, 250] {
            let mut pool = Pool::new(count, FONT, viewport(), &glyphs, &mut rng);
            for _ in 0..200 {
                pool = pool.advance_all(FONT, viewport(), &glyphs, &mut rng);
                assert_eq!(pool.len(), count);
            }
        }
    }

    #[test]
    fn fall_distance_range() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..10_000 {
            let fall = fall_distance(FONT, &mut rng);
            assert!((12.0..24.0).contains(&fall), "{fall}");
        }
    }

    #[test]
    fn advanced_positions_fall_or_respawn() {
        let glyphs = GlyphSet::default();
        let mut rng = StdRng::seed_from_u64(3);
        let viewport = viewport();
        let height = viewport.height as f64;
        let mut pool = Pool::new(60, FONT, viewport, &glyphs, &mut rng);

        for _ in 0..500 {
            let next = pool.advance_all(FONT, viewport, &glyphs, &mut rng);
            for (before, after) in pool.positions().iter().zip(next.positions()) {
                let fell = after.y > before.y && after.y <= height && after.x == before.x;
                let respawned = after.y >= -SPAWN_LIFT && after.y < height / 8.0 - SPAWN_LIFT;
                assert!(fell || respawned, "{before:?} -> {after:?}");
                assert!(after.y <= height);
            }
            pool = next;
        }
    }

    #[test]
    fn normal_fall_keeps_column_and_redraws_glyph() {
        let glyphs = GlyphSet::new(vec!['a', 'b', 'z']).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let start = Position {
            glyph: 'z',
            x: 48,
            y: 10.0,
        };
        let next = advance_by(start, 20.0, FONT, viewport(), &glyphs, &mut rng);
        assert_eq!(next.x, 48);
        assert_eq!(next.y, 30.0);
        // 'z' is unreachable, so the glyph was necessarily redrawn
        assert_ne!(next.glyph, 'z');
    }

    #[test]
    fn forced_fall_past_bottom_respawns_near_top() {
        let glyphs = GlyphSet::default();
        let viewport = Viewport::new(160, 100);
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let start = Position {
                glyph: 'ﾊ',
                x: 32,
                y: 90.0,
            };
            let next = advance_by(start, 20.0, 16, viewport, &glyphs, &mut rng);
            assert!((-50.0..-37.5).contains(&next.y), "{next:?}");
            assert_eq!(next.x % 16, 0);
        }
    }

    #[test]
    fn landing_exactly_on_the_edge_is_not_a_respawn() {
        let glyphs = GlyphSet::default();
        let mut rng = StdRng::seed_from_u64(5);
        let start = Position {
            glyph: 'ﾊ',
            x: 0,
            y: 80.0,
        };
        let next = advance_by(start, 20.0, 16, Viewport::new(160, 100), &glyphs, &mut rng);
        assert_eq!(next.y, 100.0);
    }

    #[test]
    fn seeded_advance_is_reproducible() {
        let glyphs = GlyphSet::default();
        let pool = Pool::new(
            30,
            FONT,
            viewport(),
            &glyphs,
            &mut StdRng::seed_from_u64(6),
        );

        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let first = pool.advance_all(FONT, viewport(), &glyphs, &mut a);
        let second = pool.advance_all(FONT, viewport(), &glyphs, &mut b);
        assert_eq!(first, second);
        assert_ne!(first, pool);
    }
}
