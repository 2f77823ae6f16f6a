//! Shared HTTP client construction.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tracing::debug;

use crate::Result;

pub const DEFAULT_UA: &str = concat!("stream-notify/", env!("CARGO_PKG_VERSION"));

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Install the process-wide rustls crypto provider.
///
/// reqwest is built without a bundled provider, so this must run before the
/// first client is built. Calling it more than once is harmless.
pub fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}

/// Client builder preconfigured with the user agent and request timeout.
pub fn create_client_builder() -> ClientBuilder {
    install_rustls_provider();
    Client::builder()
        .user_agent(DEFAULT_UA)
        .timeout(DEFAULT_TIMEOUT)
}

pub fn default_client() -> Result<Client> {
    Ok(create_client_builder().build()?)
}
