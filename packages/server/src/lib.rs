//! Sanmoku: shared-lobby Tic Tac Toe.
//!
//! - `domain`: board, win/draw rules, the lobby row and the store interface
//! - `usecase`: join / leave / move / restart against any `GameStateStore`
//! - `infrastructure`: in-memory store, change feed, wire DTOs
//! - `ui`: the store service (HTTP API and WebSocket change feed)

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
