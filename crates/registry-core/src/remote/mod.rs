//! Remote Service
//!
//! Bindings to the hosted backend: REST tables, auth and the realtime
//! websocket frame format.

mod client;
mod config;
pub mod realtime;

pub use client::{PurchaseUpdate, SupabaseClient, TokenResponse};
pub use config::{ConfigError, SupabaseConfig};
pub use realtime::ChangeEvent;

use thiserror::Error;

/// Errors raised while talking to the backend
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),

    #[error("backend returned no rows")]
    EmptyResponse,
}

impl RemoteError {
    /// 401/403, or an auth endpoint rejecting the credentials
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, RemoteError::Api { status, .. } if matches!(status, 400 | 401 | 403))
    }
}
