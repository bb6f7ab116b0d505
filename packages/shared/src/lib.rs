//! Utilities shared by the Sanmoku store server and the terminal client.

pub mod logger;
pub mod time;
