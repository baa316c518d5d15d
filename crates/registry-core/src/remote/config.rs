//! Backend Endpoint Configuration

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("backend URL is not configured")]
    MissingUrl,

    #[error("backend anon key is not configured")]
    MissingAnonKey,

    #[error("invalid backend URL {0:?}: {1}")]
    InvalidUrl(String, String),

    #[error("backend URL must use http or https, got {0}")]
    UnsupportedScheme(String),
}

/// Project URL and public anon key
#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseConfig {
    base: Url,
    anon_key: String,
}

impl SupabaseConfig {
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        let anon_key = anon_key.trim();
        if anon_key.is_empty() {
            return Err(ConfigError::MissingAnonKey);
        }

        let mut base =
            Url::parse(url).map_err(|e| ConfigError::InvalidUrl(url.to_string(), e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base.scheme().to_string()));
        }
        // Relative joins below need a directory-style path
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);

        Ok(Self {
            base,
            anon_key: anon_key.to_string(),
        })
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `/rest/v1/<table>`
    pub fn rest_url(&self, table: &str) -> Result<Url, url::ParseError> {
        self.base.join(&format!("rest/v1/{}", table))
    }

    /// `/auth/v1/<path>`
    pub fn auth_url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base.join(&format!("auth/v1/{}", path))
    }

    /// `ws(s)://…/realtime/v1/websocket?apikey=…&vsn=1.0.0`
    pub fn realtime_url(&self) -> Result<Url, url::ParseError> {
        let mut url = self.base.join("realtime/v1/websocket")?;
        let scheme = if self.base.scheme() == "https" { "wss" } else { "ws" };
        // Switching between special schemes cannot fail
        let _ = url.set_scheme(scheme);
        url.query_pairs_mut()
            .append_pair("apikey", &self.anon_key)
            .append_pair("vsn", "1.0.0");
        Ok(url)
    }
}
