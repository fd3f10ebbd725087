use serde::{Deserialize, Serialize};

/// Display state of one grid cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    /// Revealed distance, empty when nothing is shown or the target is.
    pub value: String,
    /// CSS color of the cell's current fade.
    pub color: String,
    pub show_wumpus: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Row-major, `grid[y][x]`.
    pub grid: Vec<Vec<CellView>>,
    pub moves: u32,
    pub found: bool,
    /// Distance between the two most recent clicks, absent before the first one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<i32>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidParameters,
    InvalidGameId,
    InvalidCoordinates,
    InvalidMessage,
    GameError,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        use ErrorCode::*;
        match self {
            InvalidParameters => "INVALID_PARAMETERS",
            InvalidGameId => "INVALID_GAME_ID",
            InvalidCoordinates => "INVALID_COORDINATES",
            InvalidMessage => "INVALID_MESSAGE",
            GameError => "GAME_ERROR",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub error: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorInfo {
    pub fn new(error: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error,
            message: Some(message.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage {
    GameState {
        #[serde(rename = "gameState")]
        game_state: GameSnapshot,
    },
    /// Same payload as `GameState`, sent when the click found the target.
    GameOver {
        #[serde(rename = "gameState")]
        game_state: GameSnapshot,
    },
    GameError {
        #[serde(rename = "errorInfo")]
        error_info: ErrorInfo,
    },
}

impl ServerMessage {
    pub fn state(game_state: GameSnapshot) -> Self {
        if game_state.found {
            Self::GameOver { game_state }
        } else {
            Self::GameState { game_state }
        }
    }

    pub fn error(error_info: ErrorInfo) -> Self {
        Self::GameError { error_info }
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        match self {
            Self::GameState { game_state } | Self::GameOver { game_state } => Some(game_state),
            Self::GameError { .. } => None,
        }
    }

    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match self {
            Self::GameError { error_info } => Some(error_info),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
