//! Remote Service Wrappers
//!
//! Frontend bindings to the hosted backend, organized by domain.
//! Errors are flattened to display strings for toasts.

mod auth;
mod gift;
mod info;
pub mod realtime;

use registry_core::{DataSync, SupabaseClient, SupabaseConfig};

pub use auth::{clear_stored_session, load_stored_session, store_session};

/// Handle to the backend shared by the whole page
pub struct Api {
    sync: DataSync<SupabaseClient>,
}

impl Api {
    pub fn connect(config: SupabaseConfig) -> Self {
        log::info!("using backend at {}", config.base_url());
        Self {
            sync: DataSync::new(SupabaseClient::new(config)),
        }
    }

    pub fn config(&self) -> &SupabaseConfig {
        self.sync.backend().config()
    }

    pub fn sync(&self) -> &DataSync<SupabaseClient> {
        &self.sync
    }
}
