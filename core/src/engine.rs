use alloc::sync::Arc;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No click since construction or the last reset.
    #[default]
    Fresh,
    InProgress,
    /// The last recorded click landed on the target.
    Won,
}

/// Most recent click and how far it was from the click before it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastClick {
    pub position: Position,
    pub dist: Distance,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickOutcome {
    pub found: bool,
    /// Distance from the clicked cell to the target before it moved.
    pub distance: Distance,
}

/// Hidden target, click memory, and the board they drive.
///
/// The random source is seeded at construction, so a game is fully
/// reproducible from its geometry, fade steps, seed, and click sequence.
#[derive(Clone, Debug)]
pub struct GameEngine {
    geometry: Arc<dyn GridGeometry>,
    board: BoardState,
    target: Position,
    last_click: Option<LastClick>,
    click_count: u32,
    found: bool,
    rng: SmallRng,
}

impl GameEngine {
    pub fn new(geometry: Arc<dyn GridGeometry>, fade_steps: u32, seed: u64) -> Result<Self> {
        let board = BoardState::new(Arc::clone(&geometry), fade_steps)?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let target = geometry.random_position(&mut rng);
        log::debug!("target placed at {target}");

        Ok(Self {
            geometry,
            board,
            target,
            last_click: None,
            click_count: 0,
            found: false,
            rng,
        })
    }

    pub fn from_config(config: GameConfig, seed: u64) -> Result<Self> {
        Self::new(config.geometry()?, config.fade_steps, seed)
    }

    pub fn state(&self) -> EngineState {
        if self.found {
            EngineState::Won
        } else if self.click_count == 0 {
            EngineState::Fresh
        } else {
            EngineState::InProgress
        }
    }

    pub fn geometry(&self) -> &Arc<dyn GridGeometry> {
        &self.geometry
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn dimensions(&self) -> Dimensions {
        self.geometry.dimensions()
    }

    pub fn max_distance(&self) -> Distance {
        self.board.max_distance()
    }

    pub fn fade_steps(&self) -> u32 {
        self.board.fade_steps()
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.board.cell(pos)
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn last_click(&self) -> Option<LastClick> {
        self.last_click
    }

    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    pub fn is_found(&self) -> bool {
        self.found
    }

    /// Moves the target to a chosen position, for scripted setups.
    pub fn place_target(&mut self, pos: Position) -> Result<()> {
        if !self.geometry.is_valid_position(pos) {
            return Err(GameError::InvalidPosition(pos));
        }
        self.target = pos;
        Ok(())
    }

    /// Probes `pos`: reports the distance to the target, reveals it on the
    /// board, and lets the target wander by half the distance between this
    /// click and the previous one.
    pub fn set_clicked(&mut self, pos: Position) -> Result<ClickOutcome> {
        if !self.dimensions().contains(pos) {
            return Err(GameError::OutOfBounds(pos));
        }

        let distance = self.geometry.distance(self.target, pos);

        // the previous reveal starts fading before the new one lands at full intensity
        self.board.fade_step();
        self.board.set_cell_clicked(pos, distance)?;

        self.found = distance == 0;
        self.click_count += 1;

        match self.last_click {
            Some(last) if !self.found => {
                let move_distance = self.geometry.distance(last.position, pos);
                self.last_click = Some(LastClick {
                    position: pos,
                    dist: move_distance,
                });
                self.move_target(move_distance);
            }
            _ => {
                self.last_click = Some(LastClick {
                    position: pos,
                    dist: 0,
                });
            }
        }

        Ok(ClickOutcome {
            found: self.found,
            distance,
        })
    }

    /// Random walk of `floor(dist / 2)` steps, each of which may stay in place.
    pub fn move_target(&mut self, dist: Distance) {
        let moves = dist.max(0) / 2;
        for remaining in (1..=moves).rev() {
            let next = self.geometry.random_movement(self.target, &mut self.rng);
            log::debug!("-- {remaining}: target moving from {} to {next}", self.target);
            self.target = next;
        }
    }

    pub fn reset(&mut self) {
        self.board.reset();
        self.target = self.geometry.random_position(&mut self.rng);
        log::debug!("target placed at {}", self.target);
        self.last_click = None;
        self.click_count = 0;
        self.found = false;
    }
}
