use core::fmt;
use serde::{Deserialize, Serialize};

use crate::Distance;

/// Background color of a cell that shows nothing.
pub const NEUTRAL_COLOR: Rgb = Rgb::new(192, 192, 192);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear per-channel mix, `numerator / denominator` of the way from `self` to `other`.
    fn lerp(self, other: Self, numerator: u32, denominator: u32) -> Self {
        let channel = |from: u8, to: u8| {
            let from = i64::from(from);
            let to = i64::from(to);
            let den = i64::from(denominator);
            let value = from * den - (from - to) * i64::from(numerator);
            round_div(value, den) as u8
        };
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// `numerator / denominator` rounded half up, `denominator` must be positive.
const fn round_div(numerator: i64, denominator: i64) -> i64 {
    (2 * numerator + denominator).div_euclid(2 * denominator)
}

/// Heat color for a revealed distance: green when near, yellow at half the
/// diameter, red at the far end.
pub fn severity_color(distance: Distance, max_distance: Distance) -> Rgb {
    // 1x1 grids have a zero diameter, treat every distance as the nearest one
    if max_distance <= 0 {
        return Rgb::new(0, 255, 0);
    }
    let max = i64::from(max_distance);
    let distance = i64::from(distance).clamp(0, max);

    if 2 * distance < max {
        let red = round_div(510 * distance, max);
        Rgb::new(red as u8, 255, 0)
    } else {
        let green = round_div(510 * (max - distance), max);
        Rgb::new(255, green as u8, 0)
    }
}

/// Progress of a revealed cell from its severity color back to the background.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fade {
    start: Rgb,
    end: Rgb,
    steps: u32,
    current_step: u32,
}

impl Fade {
    pub const fn new(start: Rgb, end: Rgb, steps: u32) -> Self {
        Self {
            start,
            end,
            steps,
            current_step: 0,
        }
    }

    pub const fn steps(&self) -> u32 {
        self.steps
    }

    pub const fn current_step(&self) -> u32 {
        self.current_step
    }

    pub const fn is_complete(&self) -> bool {
        self.current_step >= self.steps
    }

    /// Color at `percent` of the way from start (0) to end (100), clamped to 100.
    pub fn color_at_progress(&self, percent: u8) -> Rgb {
        self.start.lerp(self.end, u32::from(percent.min(100)), 100)
    }

    /// Color for the current step, the start color while `steps` is zero.
    pub fn color(&self) -> Rgb {
        if self.steps == 0 {
            self.start
        } else {
            self.start.lerp(self.end, self.current_step, self.steps)
        }
    }

    /// Moves one step toward the end color, never past `steps`, and returns the new step.
    pub fn advance(&mut self) -> u32 {
        self.current_step = self.steps.min(self.current_step.saturating_add(1));
        self.current_step
    }
}
