//! Request handlers.

mod error;
mod http;
mod websocket;

pub use http::{get_lobby, health_check, insert_lobby, update_lobby};
pub use websocket::websocket_handler;
