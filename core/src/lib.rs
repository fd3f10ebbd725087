#![no_std]

extern crate alloc;

use alloc::sync::Arc;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use fade::*;
pub use geometry::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod fade;
mod geometry;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub dimensions: Dimensions,
    pub fade_steps: u32,
    pub layout: GridLayout,
}

impl GameConfig {
    pub const fn new(dimensions: Dimensions, fade_steps: u32, layout: GridLayout) -> Self {
        Self {
            dimensions,
            fade_steps,
            layout,
        }
    }

    /// `size` by `size` grid.
    pub const fn square(size: Coord, fade_steps: u32, layout: GridLayout) -> Self {
        Self::new(Dimensions::new(size, size), fade_steps, layout)
    }

    /// Fails with [`GameError::InvalidDimensions`] for unplayable dimensions.
    pub fn geometry(&self) -> Result<Arc<dyn GridGeometry>> {
        self.layout.build(self.dimensions)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::square(5, DEFAULT_FADE_STEPS, GridLayout::default())
    }
}
