//! Headless renderer keeping one RGB value per cell.

use eco_core::{Cell, CellKind, Color};
use eco_world::Painter;

pub struct Framebuffer {
    width: usize,
    pixels: Vec<[u8; 3]>,
    frames_presented: u64,
    cells_painted: u64,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            pixels: vec![Color::BLACK.as_array(); width * height],
            frames_presented: 0,
            cells_painted: 0,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels[y * self.width + x]
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn cells_painted(&self) -> u64 {
        self.cells_painted
    }
}

impl Painter for Framebuffer {
    fn clear(&mut self) {
        self.pixels.fill(Color::BLACK.as_array());
    }

    fn paint(&mut self, index: usize, cell: &Cell) {
        self.pixels[index] = match cell.kind {
            CellKind::Empty => Color::BLACK.as_array(),
            CellKind::Plant | CellKind::Animal => cell.color.as_array(),
        };
        self.cells_painted += 1;
    }

    fn present(&mut self) {
        self.frames_presented += 1;
    }
}
