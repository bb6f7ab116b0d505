//! Terminal client for Sanmoku.
//!
//! Every client runs the game rules locally against a remote lobby store and
//! redraws the screen from the rows the store pushes back.

pub mod command;
pub mod error;
pub mod formatter;
pub mod remote_store;
pub mod runner;
pub mod session;
pub mod view;

pub use runner::{ClientConfig, run_client};
