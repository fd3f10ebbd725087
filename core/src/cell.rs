use serde::{Deserialize, Serialize};

use crate::*;

/// Reveal state of a single grid position, owned by [`BoardState`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    position: Position,
    value: Option<Distance>,
    clicked: bool,
    fade: Option<Fade>,
}

impl Cell {
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            value: None,
            clicked: false,
            fade: None,
        }
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    /// Distance revealed here, `None` when the cell is not showing anything.
    pub const fn value(&self) -> Option<Distance> {
        self.value
    }

    pub const fn is_clicked(&self) -> bool {
        self.clicked
    }

    pub const fn fade(&self) -> Option<&Fade> {
        self.fade.as_ref()
    }

    pub fn color(&self) -> Rgb {
        self.fade.map_or(NEUTRAL_COLOR, |fade| fade.color())
    }

    pub(crate) fn reveal(&mut self, value: Distance, fade: Fade) {
        self.value = Some(value);
        self.clicked = true;
        self.fade = Some(fade);
    }

    /// Ages the fade by one step, clearing the cell once it is done. Returns
    /// whether the cell went back to its default state.
    pub(crate) fn fade_step(&mut self) -> bool {
        if !self.clicked {
            return false;
        }
        let Some(fade) = self.fade.as_mut() else {
            return false;
        };

        fade.advance();
        if fade.is_complete() {
            self.clear();
            true
        } else {
            false
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::new(self.position);
    }
}
