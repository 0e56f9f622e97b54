//! Cellular ecosystem engine.
//!
//! This crate implements the plant/animal grid, the per-step update rule and
//! the dirty-cell bookkeeping renderers use for incremental redraws.

pub mod dirty;
pub mod grid;
pub mod release;
pub mod render;
pub mod rng;
pub mod simulation;

pub use dirty::{DirtySet, Redraw};
pub use grid::Grid;
pub use release::ReleaseTrigger;
pub use render::{FrameReport, Painter, RenderOptions};
pub use rng::{EcoRng, RandomSource, ScriptedRng};
pub use simulation::{Census, Simulation};
