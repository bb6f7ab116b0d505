//! Store service: HTTP API and WebSocket change feed over a `GameStateStore`.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, build_router};
