//! Thin clients for the platform APIs used to detect live broadcasts.
//!
//! Each platform module exposes a client that resolves configured channel
//! names to platform channels and looks up which of those channels are live.
//! Nothing here keeps state between calls; callers own credentials and
//! decide what to do with the results.

pub mod client;
pub mod error;
pub mod twitch;
pub mod youtube;

pub use client::{DEFAULT_UA, create_client_builder, default_client, install_rustls_provider};
pub use error::{PlatformError, Result};
