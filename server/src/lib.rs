//! Server side of the game: the per-connection session registry and the
//! WebSocket transport that feeds it.

pub use config::*;
pub use session::*;
pub use snapshot::*;
pub use ws::*;

mod config;
mod session;
mod snapshot;
mod ws;
