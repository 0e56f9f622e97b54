//! Seam between the engine and whatever draws the grid.

use crate::dirty::Redraw;
use crate::rng::RandomSource;
use crate::simulation::Simulation;
use eco_core::{Cell, CellKind};
use serde::{Deserialize, Serialize};

/// Receives cells to draw. Implemented by renderers.
pub trait Painter {
    /// Blank the whole surface before a full repaint
    fn clear(&mut self);
    fn paint(&mut self, index: usize, cell: &Cell);
    /// Called once at the end of every frame
    fn present(&mut self);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Skip plants and empty cells on full repaints
    pub animals_only: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameReport {
    pub full: bool,
    pub painted: usize,
}

impl<R: RandomSource> Simulation<R> {
    /// Paint the cells changed since the last frame, or everything if the
    /// dirty set overflowed.
    pub fn render_frame<P: Painter + ?Sized>(
        &mut self,
        painter: &mut P,
        options: RenderOptions,
    ) -> FrameReport {
        match self.dirty_mut().take_redraw() {
            Redraw::Full => self.render_full(painter, options),
            Redraw::Incremental(indices) => {
                for &index in &indices {
                    painter.paint(index, self.grid().get(index));
                }
                painter.present();
                FrameReport {
                    full: false,
                    painted: indices.len(),
                }
            }
        }
    }

    /// Repaint the whole grid and resynchronise the dirty set
    pub fn render_full<P: Painter + ?Sized>(
        &mut self,
        painter: &mut P,
        options: RenderOptions,
    ) -> FrameReport {
        painter.clear();
        let mut painted = 0;
        for (index, cell) in self.grid().iter() {
            if options.animals_only && cell.kind != CellKind::Animal {
                continue;
            }
            painter.paint(index, cell);
            painted += 1;
        }
        self.dirty_mut().force_full_scan();
        painter.present();

        FrameReport {
            full: true,
            painted,
        }
    }
}
