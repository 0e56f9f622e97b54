//! 2D grid of cells with clamped (non-wrapping) neighbor selection.

use crate::rng::RandomSource;
use eco_core::{Cell, Error, Result, MIN_EDGE};
use serde::{Deserialize, Serialize};

/// A fixed-size, row-major grid of cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-empty grid. Both edges must be at least three cells long.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width < MIN_EDGE || height < MIN_EDGE {
            return Err(Error::InvalidDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            cells: vec![Cell::empty(); width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    pub fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    /// Exchange the full contents of two cells
    pub fn swap(&mut self, a: usize, b: usize) {
        self.cells.swap(a, b);
    }

    pub fn index_of(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn coords_of(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Where the first plant (and later the first animal) is placed
    pub fn seed_index(&self) -> usize {
        self.width * (1 + self.height) / 2
    }

    /// Draw a random offset in {-1, 0, 1}² and clamp it at the edges.
    pub fn neighbor_candidate<R: RandomSource + ?Sized>(&self, index: usize, rng: &mut R) -> usize {
        let dx = rng.direction();
        let dy = rng.direction();
        self.offset(index, dx, dy)
    }

    /// Apply the edge rule to a drawn offset.
    ///
    /// On the first column/row a step outward is dropped. On the last
    /// column/row every draw is shifted back by one, so {-1, 0, 1} becomes
    /// {-2, -1, 0} there.
    pub fn offset(&self, index: usize, mut dx: i32, mut dy: i32) -> usize {
        let (x, y) = self.coords_of(index);

        if x == 0 && dx == -1 {
            dx += 1;
        }
        if x == self.width - 1 {
            dx -= 1;
        }
        if y == 0 && dy == -1 {
            dy += 1;
        }
        if y == self.height - 1 {
            dy -= 1;
        }

        let target = index as isize + dx as isize + dy as isize * self.width as isize;
        target as usize
    }

    /// Iterator over all cells with their indices, in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Cell)> + '_ {
        self.cells.iter().enumerate()
    }
}
