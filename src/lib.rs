//! Pantry: a grocery-list manager.
//!
//! The list is a flat, ordered collection of items keyed by name. Every
//! mutation flows through one validation engine and then into one of three
//! interchangeable storage backends (memory, file, remote table). The same
//! facade drives both the HTTP surface and the interactive console.

pub mod app;
pub mod config;
pub mod console;
pub mod core;
pub mod error;
pub mod server;
pub mod storage;

pub use app::GroceryApp;
pub use config::Config;
pub use error::{PantryError, Result};
