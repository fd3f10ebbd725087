use serde::Deserialize;
use serde_json::{Map, Value};
use std::str::FromStr;
use thiserror::Error;

pub const START_GAME: &str = "start_game";
pub const CLICK_CELL: &str = "click_cell";
pub const RESET_GAME: &str = "reset_game";

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Unknown message type: {0}")]
    UnknownType(String),
}

/// Client requests, with parameters kept loose so the handler can tell a
/// missing field from an out-of-range one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientMessage {
    StartGame(StartGame),
    ClickCell(ClickCell),
    ResetGame,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StartGame {
    /// `None` when absent or not an integer.
    pub grid_size: Option<i64>,
    /// `None` when absent or not an integer.
    pub fade_steps: Option<i64>,
    pub layout: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickCell {
    /// `None` when absent or not an integer.
    pub x: Option<i64>,
    /// `None` when absent or not an integer.
    pub y: Option<i64>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Option<Map<String, Value>>,
}

impl ClientMessage {
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let Envelope { kind, payload } = serde_json::from_str(text)?;
        let payload = payload.unwrap_or_default();

        Ok(match kind.as_str() {
            START_GAME => Self::StartGame(StartGame {
                grid_size: integer_field(&payload, "gridSize"),
                fade_steps: integer_field(&payload, "fadeSteps"),
                layout: payload
                    .get("layout")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            }),
            CLICK_CELL => Self::ClickCell(ClickCell {
                x: integer_field(&payload, "x"),
                y: integer_field(&payload, "y"),
            }),
            RESET_GAME => Self::ResetGame,
            _ => return Err(DecodeError::UnknownType(kind)),
        })
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StartGame(_) => START_GAME,
            Self::ClickCell(_) => CLICK_CELL,
            Self::ResetGame => RESET_GAME,
        }
    }
}

impl FromStr for ClientMessage {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Integral JSON number under `key`; whole floats such as `3.0` are accepted.
///
/// Whole numbers outside the `i64` range saturate, so they still read as
/// numbers that are too large or too small rather than as missing ones.
fn integer_field(payload: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = payload.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_u64().map(|_| i64::MAX))
        .or_else(|| {
            // float to int casts saturate
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        })
}
