//! Infrastructure layer: store and change-feed implementations, wire DTOs.

pub mod change_feed;
pub mod dto;
pub mod store;
