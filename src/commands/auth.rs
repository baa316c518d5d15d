//! Auth Commands
//!
//! Sign-in/out wrappers plus the per-tab session kept in sessionStorage.

use chrono::Utc;
use registry_core::form::Credentials;
use registry_core::AuthState;

use super::Api;
use crate::models::Session;

const SESSION_KEY: &str = "wedding-registry.session";

impl Api {
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthState, String> {
        let credentials = Credentials::new(email, password).map_err(|e| e.to_string())?;
        self.sync.login(&credentials).await.map_err(|e| e.to_string())
    }

    pub async fn restore(&self, session: Session) -> Result<AuthState, String> {
        self.sync
            .restore(session, Utc::now())
            .await
            .map_err(|e| e.to_string())
    }

    /// `Some(new session)` when `session` had to be renewed
    pub async fn refresh_if_expired(&self, session: &Session) -> Result<Option<Session>, String> {
        self.sync
            .refresh_if_expired(session, Utc::now())
            .await
            .map_err(|e| e.to_string())
    }

    pub async fn logout(&self, session: &Session) {
        self.sync.logout(session).await;
    }
}

fn session_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.session_storage().ok().flatten()
}

/// Session saved earlier in this tab, if any
pub fn load_stored_session() -> Option<Session> {
    let raw = session_storage()?.get_item(SESSION_KEY).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("discarding unreadable stored session: {}", e);
            clear_stored_session();
            None
        }
    }
}

pub fn store_session(session: &Session) {
    let Some(storage) = session_storage() else {
        return;
    };
    match serde_json::to_string(session) {
        Ok(raw) => {
            if storage.set_item(SESSION_KEY, &raw).is_err() {
                log::warn!("sessionStorage rejected the session");
            }
        }
        Err(e) => log::warn!("could not serialize session: {}", e),
    }
}

pub fn clear_stored_session() {
    if let Some(storage) = session_storage() {
        let _ = storage.remove_item(SESSION_KEY);
    }
}
