use super::*;

/// Moore neighborhood, diagonals included.
const DISPLACEMENTS: [(Coord, Coord); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Rectangular grid measured with the Euclidean distance, floored to whole cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SquareGrid {
    dimensions: Dimensions,
}

impl SquareGrid {
    pub const fn new(dimensions: Dimensions) -> Self {
        Self { dimensions }
    }
}

impl GridGeometry for SquareGrid {
    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn distance(&self, a: Position, b: Position) -> Distance {
        let dx = a.x.abs_diff(b.x);
        let dy = a.y.abs_diff(b.y);
        (dx * dx + dy * dy).isqrt() as Distance
    }

    fn adjacent_positions(&self, pos: Position) -> Neighbors {
        collect_neighbors(pos, &DISPLACEMENTS, self.dimensions)
    }

    fn max_distance(&self) -> Distance {
        let Dimensions { width, height } = self.dimensions;
        if width <= 0 || height <= 0 {
            return 0;
        }
        self.distance(Position::new(0, 0), Position::new(width - 1, height - 1))
    }
}
