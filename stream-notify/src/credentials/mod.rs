//! Bearer credential management.
//!
//! - [`BearerToken`] / [`StoredToken`]: a token and its expiry
//! - [`TokenStore`]: where refreshed tokens are persisted
//! - [`CredentialProvider`]: hands out valid tokens, refreshing on demand
//! - [`TwitchCredentialProvider`]: client-credentials grant against Twitch

mod error;
mod provider;
mod store;
mod types;

pub use error::CredentialError;
pub use provider::{CredentialProvider, TwitchCredentialProvider};
pub use store::TokenStore;
pub use types::{BearerToken, ClientCredentials, EXPIRY_MARGIN, StoredToken};
