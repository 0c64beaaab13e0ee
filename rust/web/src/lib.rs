//! # skirmish-web: Real-time sync server for the grid skirmish game
//!
//! Bridges the [`skirmish_engine`] rule engine to WebSocket clients: one
//! shared game per process, every connection a viewer, moves applied one at
//! a time and full-state snapshots fanned out to all subscribers.
//!
//! - [`server`] - Config, routes, and the serve/shutdown lifecycle
//! - [`hub`] - Connected-client registry and message fan-out
//! - [`room`] - The shared game state and the single-writer move path
//! - [`protocol`] - JSON messages (`init` / `update` / `error` / `gameOver`)
//! - [`handlers`] - Health, WebSocket upgrade, and connection loop
//! - [`assets`] - The bundled browser client
//! - [`logging`] - Tracing setup

pub mod assets;
pub mod handlers;
pub mod hub;
pub mod logging;
pub mod protocol;
pub mod room;
pub mod server;

pub use assets::{AssetError, AssetServer};
pub use hub::{ClientConnection, ClientHub, ClientId};
pub use logging::init_logging;
pub use protocol::{ClientMessage, ServerMessage};
pub use room::{GameRoom, RoomError};
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
