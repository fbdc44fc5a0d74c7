//! 2D buffer backing the terminal surface.
//!
//! A [`Grid`] is a row-major `width * height` vector of cells with a blank value
//! used for new area after a resize.

use std::ops::{Index, IndexMut};

#[derive(Clone, Debug)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    blank: T,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid where every cell is `blank`.
    pub fn new(width: usize, height: usize, blank: T) -> Self {
        Self {
            width,
            height,
            cells: vec![blank.clone(); width * height],
            blank,
        }
    }

    /// Resizes the grid, keeping the overlapping top-left region.
    pub fn resize(&mut self, width: usize, height: usize) {
        let mut cells = vec![self.blank.clone(); width * height];
        let keep_width = self.width.min(width);
        for y in 0..self.height.min(height) {
            let src = y * self.width;
            let dst = y * width;
            cells[dst..dst + keep_width].clone_from_slice(&self.cells[src..src + keep_width]);
        }
        self.cells = cells;
        self.width = width;
        self.height = height;
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the cell at `(x, y)`, or `None` if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        (x < self.width && y < self.height).then(|| &self.cells[y * self.width + x])
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x < self.width && y < self.height {
            self.cells.get_mut(y * self.width + x)
        } else {
            None
        }
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        &self.cells[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        &mut self.cells[y * self.width + x]
    }
}
