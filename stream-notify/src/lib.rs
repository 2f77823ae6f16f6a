//! stream-notify library crate.
//!
//! Watches Twitch and YouTube channels and posts a chat notification when a
//! watched channel goes live. The binary in `main.rs` wires these modules
//! together; they are exposed here for integration testing.

pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod notification;
pub mod services;

pub use error::{Error, Result};
