//! Protocol handler: the connection-keyed registry of live games and the
//! three operations clients can invoke on it.
//!
//! Every operation is synchronous and returns either a snapshot or a typed
//! [`SessionError`]; [`SessionRegistry::handle_text`] turns both into the
//! wire reply, so nothing raised by the engine reaches the transport.

use std::collections::HashMap;
use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use wumpus_core::{Coord, GameConfig, GameEngine, GameError, GridLayout, Position};
use wumpus_protocol::{
    ClickCell, ClientMessage, ErrorCode, ErrorInfo, GameSnapshot, ServerMessage, StartGame,
};

use crate::snapshot::snapshot;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("Non-numeric coordinates")]
    NonNumeric,
    #[error("Out-of-bounds coordinates")]
    Negative,
    #[error("Coordinates not in grid: {x}, {y}")]
    NotInGrid { x: i64, y: i64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0}")]
    InvalidParameters(String),
    #[error("No active game found")]
    NoActiveGame,
    #[error(transparent)]
    InvalidCoordinates(#[from] CoordinateError),
    #[error(transparent)]
    Engine(#[from] GameError),
}

impl SessionError {
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidParameters(_) => ErrorCode::InvalidParameters,
            Self::NoActiveGame => ErrorCode::InvalidGameId,
            Self::InvalidCoordinates(_) => ErrorCode::InvalidCoordinates,
            Self::Engine(_) => ErrorCode::GameError,
        }
    }

    pub fn error_info(&self) -> ErrorInfo {
        ErrorInfo::new(self.code(), self.to_string())
    }
}

const MISSING_PARAMETERS: &str = "Missing required game parameters";

#[derive(Debug)]
pub struct SessionRegistry {
    games: HashMap<ConnectionId, GameEngine>,
    seeds: SmallRng,
}

impl SessionRegistry {
    /// With `seed` every game gets a reproducible random source, otherwise
    /// seeds come from the operating system.
    pub fn new(seed: Option<u64>) -> Self {
        let seeds = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self {
            games: HashMap::new(),
            seeds,
        }
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn game(&self, id: ConnectionId) -> Option<&GameEngine> {
        self.games.get(&id)
    }

    pub fn game_mut(&mut self, id: ConnectionId) -> Option<&mut GameEngine> {
        self.games.get_mut(&id)
    }

    /// Creates a `gridSize` square game for `id`, replacing any game it already had.
    pub fn start_game(
        &mut self,
        id: ConnectionId,
        params: &StartGame,
    ) -> Result<GameSnapshot, SessionError> {
        let config = game_config(params)?;
        let engine = GameEngine::from_config(config, self.seeds.random())
            .map_err(|err| SessionError::InvalidParameters(err.to_string()))?;
        log::info!(
            "connection {id} started a {}x{} {} game with {} fade steps",
            config.dimensions.width,
            config.dimensions.height,
            config.layout.name(),
            config.fade_steps,
        );

        let snapshot = snapshot(&engine);
        if self.games.insert(id, engine).is_some() {
            log::debug!("connection {id} replaced its running game");
        }
        Ok(snapshot)
    }

    pub fn click_cell(
        &mut self,
        id: ConnectionId,
        params: ClickCell,
    ) -> Result<GameSnapshot, SessionError> {
        let engine = self.games.get_mut(&id).ok_or(SessionError::NoActiveGame)?;
        let (Some(x), Some(y)) = (params.x, params.y) else {
            return Err(CoordinateError::NonNumeric.into());
        };
        if x < 0 || y < 0 {
            return Err(CoordinateError::Negative.into());
        }
        let not_in_grid = CoordinateError::NotInGrid { x, y };
        let pos = match (Coord::try_from(x), Coord::try_from(y)) {
            (Ok(x), Ok(y)) => Position::new(x, y),
            _ => return Err(not_in_grid.into()),
        };

        let outcome = engine.set_clicked(pos).map_err(|err| match err {
            GameError::OutOfBounds(_) => SessionError::from(not_in_grid),
            err => err.into(),
        })?;
        log::debug!(
            "connection {id} clicked {pos}: distance {}, found {}",
            outcome.distance,
            outcome.found
        );
        if outcome.found {
            log::info!(
                "connection {id} found the target in {} moves",
                engine.click_count()
            );
        }

        Ok(snapshot(engine))
    }

    /// Resets the game and drops it from the registry, a new `start_game` is
    /// needed to keep playing.
    pub fn reset_game(&mut self, id: ConnectionId) -> Result<GameSnapshot, SessionError> {
        let mut engine = self.games.remove(&id).ok_or(SessionError::NoActiveGame)?;
        engine.reset();
        log::info!("connection {id} reset its game");
        Ok(snapshot(&engine))
    }

    /// Forgets the game of a closed connection, returns whether there was one.
    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        self.games.remove(&id).is_some()
    }

    pub fn handle(&mut self, id: ConnectionId, message: ClientMessage) -> ServerMessage {
        let result = match &message {
            ClientMessage::StartGame(params) => self.start_game(id, params),
            ClientMessage::ClickCell(params) => self.click_cell(id, *params),
            ClientMessage::ResetGame => self.reset_game(id),
        };

        match result {
            Ok(snapshot) => ServerMessage::state(snapshot),
            Err(err @ SessionError::Engine(_)) => {
                log::error!("connection {id} {} failed: {err:?}", message.kind());
                ServerMessage::error(err.error_info())
            }
            Err(err) => {
                log::warn!("connection {id} {} rejected: {err}", message.kind());
                ServerMessage::error(err.error_info())
            }
        }
    }

    /// Decodes one text frame and produces the reply to send back.
    pub fn handle_text(&mut self, id: ConnectionId, text: &str) -> ServerMessage {
        match ClientMessage::decode(text) {
            Ok(message) => self.handle(id, message),
            Err(err) => {
                log::warn!("connection {id} sent an invalid message: {err}");
                ServerMessage::error(ErrorInfo::new(ErrorCode::InvalidMessage, err.to_string()))
            }
        }
    }
}

fn game_config(params: &StartGame) -> Result<GameConfig, SessionError> {
    let (Some(grid_size), Some(fade_steps)) = (params.grid_size, params.fade_steps) else {
        return Err(SessionError::InvalidParameters(MISSING_PARAMETERS.into()));
    };
    let layout = match params.layout.as_deref() {
        None => GridLayout::default(),
        Some(name) => GridLayout::from_name(name).ok_or_else(|| {
            SessionError::InvalidParameters(format!("Unknown grid layout: {name}"))
        })?,
    };
    let grid_size = Coord::try_from(grid_size)
        .map_err(|_| SessionError::InvalidParameters(format!("Invalid grid size: {grid_size}")))?;
    let fade_steps = u32::try_from(fade_steps).map_err(|_| {
        SessionError::InvalidParameters(format!("Invalid fade steps: {fade_steps}"))
    })?;

    Ok(GameConfig::square(grid_size, fade_steps, layout))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: ConnectionId = ConnectionId(1);

    fn start(size: i64, layout: &str) -> StartGame {
        StartGame {
            grid_size: Some(size),
            fade_steps: Some(4),
            layout: Some(layout.into()),
        }
    }

    fn click(x: i64, y: i64) -> ClickCell {
        ClickCell {
            x: Some(x),
            y: Some(y),
        }
    }

    fn registry_with_target(target: Position) -> SessionRegistry {
        let mut registry = SessionRegistry::new(Some(11));
        registry.start_game(ID, &start(5, "square")).unwrap();
        registry.game_mut(ID).unwrap().place_target(target).unwrap();
        registry
    }

    #[test]
    fn start_game_registers_a_fresh_engine() {
        let mut registry = SessionRegistry::new(Some(1));

        let snapshot = registry.start_game(ID, &start(3, "hex")).unwrap();

        assert_eq!(registry.len(), 1);
        let engine = registry.game(ID).unwrap();
        assert_eq!(engine.dimensions(), wumpus_core::Dimensions::new(3, 3));
        assert_eq!(engine.fade_steps(), 4);
        assert_eq!(snapshot.grid.len(), 3);
        assert_eq!(snapshot.moves, 0);
        assert_eq!(snapshot.distance, None);
    }

    #[test]
    fn start_game_defaults_to_hex() {
        let mut registry = SessionRegistry::new(Some(1));
        let params = StartGame {
            layout: None,
            ..start(5, "")
        };

        registry.start_game(ID, &params).unwrap();

        assert_eq!(registry.game(ID).unwrap().max_distance(), 6);
    }

    #[test]
    fn start_game_requires_both_parameters() {
        let mut registry = SessionRegistry::new(Some(1));

        for params in [
            StartGame {
                fade_steps: None,
                ..start(5, "hex")
            },
            StartGame {
                grid_size: None,
                ..start(5, "hex")
            },
        ] {
            assert_eq!(
                registry.start_game(ID, &params),
                Err(SessionError::InvalidParameters(MISSING_PARAMETERS.into()))
            );
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn start_game_rejects_bad_values() {
        let mut registry = SessionRegistry::new(Some(1));

        for params in [
            start(25, "hex"),
            start(0, "square"),
            start(5, "triangle"),
            StartGame {
                fade_steps: Some(-1),
                ..start(5, "hex")
            },
        ] {
            let err = registry.start_game(ID, &params).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidParameters, "{params:?}");
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn click_without_game_is_rejected() {
        let mut registry = SessionRegistry::new(None);

        assert_eq!(
            registry.click_cell(ID, click(2, 3)),
            Err(SessionError::NoActiveGame)
        );
        assert_eq!(
            SessionError::NoActiveGame.error_info(),
            ErrorInfo::new(ErrorCode::InvalidGameId, "No active game found")
        );
    }

    #[test]
    fn click_reports_distance_on_the_board() {
        let mut registry = registry_with_target(Position::new(4, 4));

        let snapshot = registry.click_cell(ID, click(4, 3)).unwrap();

        assert_eq!(snapshot.moves, 1);
        assert!(!snapshot.found);
        assert_eq!(snapshot.grid[3][4].value, "1");
    }

    #[test]
    fn click_coordinates_are_classified() {
        let mut registry = registry_with_target(Position::new(4, 4));

        let cases = [
            (ClickCell { x: None, y: Some(3) }, "Non-numeric coordinates"),
            (ClickCell { x: Some(2), y: None }, "Non-numeric coordinates"),
            (click(-1, 2), "Out-of-bounds coordinates"),
            (click(10, 10), "Coordinates not in grid: 10, 10"),
            (click(1, 5), "Coordinates not in grid: 1, 5"),
            (click(i64::MAX, 0), "Coordinates not in grid: 9223372036854775807, 0"),
        ];
        for (params, message) in cases {
            let err = registry.click_cell(ID, params).unwrap_err();
            assert_eq!(
                err.error_info(),
                ErrorInfo::new(ErrorCode::InvalidCoordinates, message)
            );
        }
        assert_eq!(registry.game(ID).unwrap().click_count(), 0);
    }

    #[test]
    fn reset_deregisters_the_game() {
        let mut registry = registry_with_target(Position::new(4, 4));
        registry.click_cell(ID, click(2, 3)).unwrap();

        let snapshot = registry.reset_game(ID).unwrap();

        assert_eq!(snapshot.moves, 0);
        assert!(snapshot.grid.iter().flatten().all(|view| view.value.is_empty()));
        assert!(registry.game(ID).is_none());
        assert_eq!(registry.reset_game(ID), Err(SessionError::NoActiveGame));
    }

    #[test]
    fn games_are_isolated_per_connection() {
        let mut registry = registry_with_target(Position::new(4, 4));
        let other = ConnectionId(2);
        registry.start_game(other, &start(4, "hex")).unwrap();

        registry.click_cell(ID, click(0, 0)).unwrap();

        assert_eq!(registry.game(other).unwrap().click_count(), 0);
        assert!(registry.disconnect(other));
        assert!(!registry.disconnect(other));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn handle_maps_found_to_game_over() {
        let mut registry = registry_with_target(Position::new(1, 1));

        let reply = registry.handle(ID, ClientMessage::ClickCell(click(1, 1)));

        assert!(matches!(reply, ServerMessage::GameOver { ref game_state } if game_state.found));
        assert!(reply.snapshot().unwrap().grid[1][1].show_wumpus);
    }

    #[test]
    fn handle_text_reports_invalid_messages() {
        let mut registry = SessionRegistry::new(Some(1));

        for text in ["{", r#"{"type":"dance"}"#] {
            let reply = registry.handle_text(ID, text);
            assert_eq!(
                reply.error_info().map(|info| info.error),
                Some(ErrorCode::InvalidMessage)
            );
        }
    }

    #[test]
    fn seeded_registries_place_targets_identically() {
        let mut a = SessionRegistry::new(Some(5));
        let mut b = SessionRegistry::new(Some(5));

        a.start_game(ID, &start(24, "hex")).unwrap();
        b.start_game(ID, &start(24, "hex")).unwrap();

        assert_eq!(a.game(ID).unwrap().target(), b.game(ID).unwrap().target());
    }
}
