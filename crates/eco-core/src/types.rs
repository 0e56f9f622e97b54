//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation clock value. Signed so that energy ledgers may dip below zero.
pub type Step = i64;

/// What occupies a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Plant,
    Animal,
}

impl CellKind {
    pub fn is_living(&self) -> bool {
        !matches!(self, CellKind::Empty)
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKind::Empty => write!(f, "empty"),
            CellKind::Plant => write!(f, "plant"),
            CellKind::Animal => write!(f, "animal"),
        }
    }
}

/// 8-bit RGB color. Channel arithmetic wraps modulo 256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const GRAY: Color = Color::new(128, 128, 128);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Offset each channel, wrapping around on overflow/underflow
    pub fn mutated(&self, dr: i32, dg: i32, db: i32) -> Self {
        Self {
            r: wrap_channel(self.r, dr),
            g: wrap_channel(self.g, dg),
            b: wrap_channel(self.b, db),
        }
    }

    /// Sum of absolute per-channel differences (0..=765)
    pub fn manhattan_distance(&self, other: &Color) -> u32 {
        u32::from(self.r.abs_diff(other.r))
            + u32::from(self.g.abs_diff(other.g))
            + u32::from(self.b.abs_diff(other.b))
    }

    pub fn as_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::GRAY
    }
}

fn wrap_channel(channel: u8, delta: i32) -> u8 {
    (i32::from(channel) + delta).rem_euclid(256) as u8
}

/// State of one grid position.
///
/// `last_repro_step` and `hunger` are kept apart, but every threshold the
/// rules test reads their sum (see [`Cell::ledger`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    pub color: Color,
    /// Step of the last reproduction attempt
    pub last_repro_step: Step,
    /// Energy spent since `last_repro_step`; negative values are stored energy
    pub hunger: i64,
}

impl Cell {
    pub fn empty() -> Self {
        Self {
            kind: CellKind::Empty,
            color: Color::GRAY,
            last_repro_step: 0,
            hunger: 0,
        }
    }

    pub fn plant(color: Color, born: Step) -> Self {
        Self::born(CellKind::Plant, color, born)
    }

    pub fn animal(color: Color, born: Step) -> Self {
        Self::born(CellKind::Animal, color, born)
    }

    pub fn born(kind: CellKind, color: Color, step: Step) -> Self {
        Self {
            kind,
            color,
            last_repro_step: step,
            hunger: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind == CellKind::Empty
    }

    /// Combined cooldown baseline and energy debit
    pub fn ledger(&self) -> i64 {
        self.last_repro_step + self.hunger
    }

    /// Restart the reproduction cooldown. Clears the energy debit too.
    pub fn reset_cooldown(&mut self, step: Step) {
        self.last_repro_step = step;
        self.hunger = 0;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}
