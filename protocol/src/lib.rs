//! Messages exchanged between the game client and server over a WebSocket.
//!
//! Every message is a JSON object `{"type": ..., "payload": {...}}`. Client
//! requests are decoded leniently into [`ClientMessage`] so that a missing
//! or ill-typed parameter can be reported precisely; server replies are
//! strictly typed [`ServerMessage`] values.

pub use client::*;
pub use server::*;

mod client;
mod server;
