use core::fmt;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for grid width, height, and positions.
///
/// Signed so that neighbor deltas and client supplied coordinates can be
/// represented before they are validated against a grid.
pub type Coord = i32;

/// Metric distance between two positions, never negative when produced by a geometry.
pub type Distance = i32;

/// Largest accepted grid width or height.
pub const MAX_GRID_SIZE: Coord = 24;

/// Two-dimensional grid position `(x, y)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}

impl Position {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, (dx, dy): (Coord, Coord)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(Coord, Coord)> for Position {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: Coord,
    pub height: Coord,
}

impl Dimensions {
    pub const fn new(width: Coord, height: Coord) -> Self {
        Self { width, height }
    }

    pub const fn contains(self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub const fn total_cells(self) -> usize {
        if self.width <= 0 || self.height <= 0 {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }

    /// Whether both sides are within `[1, MAX_GRID_SIZE]`.
    pub const fn is_playable(self) -> bool {
        self.width >= 1
            && self.height >= 1
            && self.width <= MAX_GRID_SIZE
            && self.height <= MAX_GRID_SIZE
    }

    /// Row-major iterator over every position inside these dimensions.
    pub fn iter_positions(self) -> impl Iterator<Item = Position> {
        let (width, height) = (self.width.max(0), self.height.max(0));
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Position {
    type Output = Option<[usize; 2]>;

    fn to_nd_index(self) -> Self::Output {
        Some([self.x.try_into().ok()?, self.y.try_into().ok()?])
    }
}

impl ToNdIndex for Dimensions {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [
            self.width.max(0).unsigned_abs() as usize,
            self.height.max(0).unsigned_abs() as usize,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn iter_positions_is_row_major() {
        let positions: Vec<_> = Dimensions::new(2, 2).iter_positions().collect();

        assert_eq!(
            positions,
            [(0, 0), (1, 0), (0, 1), (1, 1)].map(Position::from).to_vec()
        );
    }

    #[test]
    fn playable_dimensions_are_capped() {
        assert!(Dimensions::new(1, 24).is_playable());
        assert!(!Dimensions::new(0, 5).is_playable());
        assert!(!Dimensions::new(25, 5).is_playable());
        assert!(!Dimensions::new(5, -1).is_playable());
    }

    #[test]
    fn negative_positions_have_no_nd_index() {
        assert_eq!(Position::new(-1, 0).to_nd_index(), None);
        assert_eq!(Position::new(3, 4).to_nd_index(), Some([3, 4]));
    }
}
