//! Stateless spatial metrics for the playing field.
//!
//! A [`GridGeometry`] answers purely geometric questions (distance, adjacency,
//! validity, random placement) for fixed dimensions. It owns no cell or game
//! state, so the board and the engine work unmodified under any metric.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

pub use hex::*;
pub use square::*;

mod hex;
mod square;

/// In-bounds neighbors of a position, at most eight for any supported metric.
pub type Neighbors = SmallVec<[Position; 8]>;

pub trait GridGeometry: Debug + Send + Sync {
    fn dimensions(&self) -> Dimensions;

    /// Symmetric, non-negative, zero only when `a == b`.
    fn distance(&self, a: Position, b: Position) -> Distance;

    /// Valid positions adjacent to `pos`; empty when `pos` itself is outside the grid.
    fn adjacent_positions(&self, pos: Position) -> Neighbors;

    /// Largest distance between any two valid positions.
    fn max_distance(&self) -> Distance;

    fn is_valid_position(&self, pos: Position) -> bool {
        self.dimensions().contains(pos)
    }

    fn all_positions(&self) -> Vec<Position> {
        self.dimensions().iter_positions().collect()
    }

    /// Uniformly random valid position.
    ///
    /// Panics on a grid without cells, which [`GridLayout::build`] never produces.
    fn random_position(&self, rng: &mut dyn RngCore) -> Position {
        let dimensions = self.dimensions();
        debug_assert!(dimensions.total_cells() > 0, "empty grid has no positions");
        let index = rng.random_range(0..dimensions.total_cells()) as Coord;
        Position::new(index % dimensions.width, index / dimensions.width)
    }

    /// Uniform pick among the neighbors of `pos` and `pos` itself, staying put is a valid move.
    fn random_movement(&self, pos: Position, rng: &mut dyn RngCore) -> Position {
        let options = self.adjacent_positions(pos);
        let pick = rng.random_range(0..=options.len());
        options.get(pick).copied().unwrap_or(pos)
    }
}

/// Selects which metric a new game is played on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridLayout {
    Square,
    #[default]
    Hex,
}

impl GridLayout {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Hex => "hex",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [Self::Square, Self::Hex]
            .into_iter()
            .find(|layout| layout.name().eq_ignore_ascii_case(name))
    }

    /// Fails with [`GameError::InvalidDimensions`] unless `dimensions` is playable.
    pub fn build(self, dimensions: Dimensions) -> Result<Arc<dyn GridGeometry>> {
        if !dimensions.is_playable() {
            return Err(GameError::InvalidDimensions {
                width: dimensions.width,
                height: dimensions.height,
            });
        }
        Ok(match self {
            Self::Square => Arc::new(SquareGrid::new(dimensions)),
            Self::Hex => Arc::new(HexGrid::new(dimensions)),
        })
    }
}

/// Applies every delta to `center`, keeping the results that land inside `dimensions`.
fn collect_neighbors(
    center: Position,
    deltas: &[(Coord, Coord)],
    dimensions: Dimensions,
) -> Neighbors {
    if !dimensions.contains(center) {
        return Neighbors::new();
    }

    deltas
        .iter()
        .map(|&delta| center.offset(delta))
        .filter(|&pos| dimensions.contains(pos))
        .collect()
}
