use super::*;

const EVEN_Q_DELTAS: [(Coord, Coord); 6] = [(1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (0, 1)];

const ODD_Q_DELTAS: [(Coord, Coord); 6] = [(1, 1), (1, 0), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Hex grid in the "even-q" vertical offset layout (pointy-top cells in
/// straight columns, even columns shifted up by half a cell).
///
/// Positions stay in offset `(x, y)` form and are converted to axial
/// `(q, r)` coordinates only for distance math:
///
/// ```text
/// q = x
/// r = y - floor(x / 2)
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HexGrid {
    dimensions: Dimensions,
}

impl HexGrid {
    pub const fn new(dimensions: Dimensions) -> Self {
        Self { dimensions }
    }

    const fn to_axial(pos: Position) -> (Coord, Coord) {
        (pos.x, pos.y - pos.x.div_euclid(2))
    }
}

impl GridGeometry for HexGrid {
    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn distance(&self, a: Position, b: Position) -> Distance {
        let (aq, ar) = Self::to_axial(a);
        let (bq, br) = Self::to_axial(b);
        let dq = aq - bq;
        let dr = ar - br;
        dq.abs().max(dr.abs()).max((dq + dr).abs())
    }

    fn adjacent_positions(&self, pos: Position) -> Neighbors {
        let deltas = if pos.x.rem_euclid(2) == 0 {
            &EVEN_Q_DELTAS
        } else {
            &ODD_Q_DELTAS
        };
        collect_neighbors(pos, deltas, self.dimensions)
    }

    // O(n²) on the cell count, bounded by the grid size cap. Callers cache it.
    fn max_distance(&self) -> Distance {
        let positions = self.all_positions();
        let mut max = 0;
        for (i, &a) in positions.iter().enumerate() {
            for &b in &positions[i + 1..] {
                max = max.max(self.distance(a, b));
            }
        }
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: Coord, height: Coord) -> HexGrid {
        HexGrid::new(Dimensions::new(width, height))
    }

    #[test]
    fn max_distance_of_five_by_five() {
        let grid = grid(5, 5);

        assert_eq!(grid.max_distance(), 6);
        assert_eq!(grid.distance((0, 0).into(), (4, 4).into()), 6);
        assert_eq!(grid.distance((4, 0).into(), (0, 4).into()), 6);
    }

    #[test]
    fn single_cell_has_zero_diameter() {
        assert_eq!(grid(1, 1).max_distance(), 0);
    }

    #[test]
    fn every_neighbor_is_one_step_away() {
        let grid = grid(6, 6);
        for pos in grid.all_positions() {
            for neighbor in grid.adjacent_positions(pos) {
                assert_eq!(grid.distance(pos, neighbor), 1, "{pos} -> {neighbor}");
            }
        }
    }

    #[test]
    fn neighbor_deltas_depend_on_column_parity() {
        let grid = grid(5, 5);

        let even: Vec<_> = grid.adjacent_positions((2, 2).into()).into_iter().collect();
        assert_eq!(
            even,
            [(3, 2), (3, 1), (2, 1), (1, 1), (1, 2), (2, 3)]
                .map(Position::from)
                .to_vec()
        );

        let odd: Vec<_> = grid.adjacent_positions((1, 2).into()).into_iter().collect();
        assert_eq!(
            odd,
            [(2, 3), (2, 2), (1, 1), (0, 2), (0, 3), (1, 3)]
                .map(Position::from)
                .to_vec()
        );
    }

    #[test]
    fn corner_can_have_only_two_neighbors() {
        let grid = grid(5, 5);

        assert_eq!(grid.adjacent_positions((0, 0).into()).len(), 2);
        assert_eq!(grid.adjacent_positions((4, 4).into()).len(), 3);
    }
}
