//! The glyph catalog the rain is made of.

use crate::error::{RainError, Result};
use rand::Rng;

/// Half-width katakana, digits, "THEMATRIX" and some punctuation.
///
/// Order matters: [`GlyphSet::pick_random`] never selects the final entry.
pub const DEFAULT_GLYPHS: &[char] = &[
    '日', 'ﾊ', 'ﾐ', 'ﾋ', 'ｰ', 'ｳ', 'ｼ', 'ﾅ', 'ﾓ', 'ﾆ', 'ｻ', 'ﾜ', 'ﾂ', 'ｵ', 'ﾘ', 'ｱ', 'ﾎ', 'ﾃ', 'ﾏ',
    'ｹ', 'ﾒ', 'ｴ', 'ｶ', 'ｷ', 'ﾑ', 'ﾕ', 'ﾗ', 'ｾ', 'ﾈ', 'ｽ', 'ﾀ', 'ﾇ', 'ﾍ', '0', '1', '2', '3', '4',
    '5', '7', '8', '9', 'T', 'H', 'E', 'M', 'A', 'T', 'R', 'I', 'X', ':', '・', '.', '=', '*', '+',
    '-', '<', '>', '¦', '｜', 'ｸ', 'ç', 'ﾘ', 'Ɛ',
];

/// An immutable, ordered catalog of glyphs.
///
/// # Example
///
/// ```rust
/// use glyphrain::glyphs::GlyphSet;
/// use rand::SeedableRng;
///
/// let glyphs = GlyphSet::new(vec!['a', 'b', 'c']).unwrap();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// assert_ne!(glyphs.pick_random(&mut rng), 'c');
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphSet {
    glyphs: Vec<char>,
}

impl GlyphSet {
    /// Creates a catalog. At least two glyphs are required, since the last one is never picked.
    pub fn new(glyphs: Vec<char>) -> Result<Self> {
        if glyphs.len() < 2 {
            return Err(RainError::invalid(
                "glyphs",
                format!("need at least 2 glyphs, got {}", glyphs.len()),
            ));
        }
        Ok(Self { glyphs })
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn all(&self) -> &[char] {
        &self.glyphs
    }

    /// The glyphs [`pick_random`](Self::pick_random) can return: all but the last.
    pub fn reachable(&self) -> &[char] {
        &self.glyphs[..self.glyphs.len() - 1]
    }

    /// Picks a glyph uniformly from [`reachable`](Self::reachable).
    pub fn pick_random(&self, rng: &mut impl Rng) -> char {
        self.glyphs[self.pick_index(rng)]
    }

    fn pick_index(&self, rng: &mut impl Rng) -> usize {
        rng.gen_range(0..self.glyphs.len() - 1)
    }
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_GLYPHS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn default_catalog() {
        let glyphs = GlyphSet::default();
        assert_eq!(glyphs.len(), 66);
        assert_eq!(glyphs.all()[0], '日');
        assert_eq!(*glyphs.all().last().unwrap(), 'Ɛ');
    }

    #[test]
    fn rejects_tiny_catalogs() {
        assert!(GlyphSet::new(vec![]).is_err());
        assert!(GlyphSet::new(vec!['a']).is_err());
        assert!(GlyphSet::new(vec!['a', 'b']).is_ok());
    }

    #[test]
    fn last_index_is_never_picked() {
        let glyphs = GlyphSet::default();
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut counts = vec![0u32; glyphs.len()];
        for _ in 0..100_000 {
            counts[glyphs.pick_index(&mut rng)] += 1;
        }

        let (last, rest) = counts.split_last().unwrap();
        assert_eq!(*last, 0);
        assert!(rest.iter().all(|&count| count > 0), "{counts:?}");
    }

    #[test]
    fn picks_only_reachable_glyphs() {
        let glyphs = GlyphSet::new(vec!['a', 'b', 'z']).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1_000 {
            assert!(glyphs.reachable().contains(&glyphs.pick_random(&mut rng)));
        }
    }
}
