use alloc::sync::Arc;
use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;

pub const DEFAULT_FADE_STEPS: u32 = 3;

/// Every cell of the grid plus the per-click reveal and per-turn fade rules.
///
/// Geometry is only consulted for validity, dimensions, and the diameter used
/// to color revealed distances.
#[derive(Clone, Debug)]
pub struct BoardState {
    geometry: Arc<dyn GridGeometry>,
    cells: Array2<Cell>,
    fade_steps: u32,
    max_distance: Distance,
}

impl BoardState {
    pub fn new(geometry: Arc<dyn GridGeometry>, fade_steps: u32) -> Result<Self> {
        let dimensions = geometry.dimensions();
        if !dimensions.is_playable() {
            return Err(GameError::InvalidDimensions {
                width: dimensions.width,
                height: dimensions.height,
            });
        }

        let cells = Array2::from_shape_fn(dimensions.to_nd_index(), |(x, y)| {
            Cell::new(Position::new(x as Coord, y as Coord))
        });
        let max_distance = geometry.max_distance();

        Ok(Self {
            geometry,
            cells,
            fade_steps,
            max_distance,
        })
    }

    pub fn geometry(&self) -> &Arc<dyn GridGeometry> {
        &self.geometry
    }

    pub fn dimensions(&self) -> Dimensions {
        self.geometry.dimensions()
    }

    pub fn fade_steps(&self) -> u32 {
        self.fade_steps
    }

    pub fn max_distance(&self) -> Distance {
        self.max_distance
    }

    /// `None` for positions outside the map.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(pos.to_nd_index()?)
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn clicked_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_clicked()).count()
    }

    /// Reveals `value` at `pos` with a fresh fade, leaving every other cell untouched.
    pub fn set_cell_clicked(&mut self, pos: Position, value: Distance) -> Result<()> {
        if value < 0 {
            return Err(GameError::NegativeValue(value));
        }
        if !self.geometry.is_valid_position(pos) {
            return Err(GameError::InvalidPosition(pos));
        }
        let index = pos.to_nd_index().ok_or(GameError::InvalidPosition(pos))?;
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(GameError::InvalidPosition(pos))?;

        let fade = Fade::new(
            severity_color(value, self.max_distance),
            NEUTRAL_COLOR,
            self.fade_steps,
        );
        cell.reveal(value, fade);
        Ok(())
    }

    /// Ages every revealed cell by one step, resetting the ones whose fade completed.
    pub fn fade_step(&mut self) {
        let cleared = self
            .cells
            .iter_mut()
            .map(Cell::fade_step)
            .filter(|&cleared| cleared)
            .count();
        if cleared > 0 {
            log::trace!("fade step cleared {cleared} cell(s)");
        }
    }

    /// Row-major copy (`y` outer, `x` inner), detached from later board mutation.
    pub fn cells_as_rows(&self) -> Vec<Vec<Cell>> {
        let Dimensions { width, height } = self.dimensions();
        (0..height)
            .map(|y| {
                (0..width)
                    .filter_map(|x| self.cell(Position::new(x, y)).copied())
                    .collect()
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(Cell::clear);
    }
}
