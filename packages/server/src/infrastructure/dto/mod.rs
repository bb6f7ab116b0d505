//! Data Transfer Objects (DTOs) for the store service.
//!
//! DTOs are organized by protocol:
//! - `row`: row and patch bodies shared by HTTP and WebSocket
//! - `http`: HTTP API response DTOs
//! - `websocket`: change-feed messages

pub mod conversion;
pub mod http;
pub mod row;
pub mod websocket;
