use thiserror::Error;

use crate::{Coord, Distance, MAX_GRID_SIZE, Position};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Grid dimensions {width}x{height} must be between 1 and {max}", max = MAX_GRID_SIZE)]
    InvalidDimensions { width: Coord, height: Coord },
    #[error("Cell value cannot be negative: {0}")]
    NegativeValue(Distance),
    #[error("Invalid position: {0}")]
    InvalidPosition(Position),
    #[error("Coordinates not in grid: {0}")]
    OutOfBounds(Position),
}

pub type Result<T> = core::result::Result<T, GameError>;
