//! Wedding Info Commands
//!
//! Frontend bindings for the `wedding_info` singleton.

use registry_core::form::InfoDraft;
use registry_core::WeddingInfoRecord;

use super::Api;
use crate::models::{Session, WeddingInfo};

impl Api {
    pub async fn load_info(&self, session: Option<&Session>) -> Result<Option<WeddingInfoRecord>, String> {
        self.sync.load_info(session).await.map_err(|e| e.to_string())
    }

    pub async fn save_info(
        &self,
        session: Option<&Session>,
        is_admin: bool,
        current: Option<&WeddingInfoRecord>,
        draft: &InfoDraft,
    ) -> Result<WeddingInfo, String> {
        self.sync
            .update_info(session, is_admin, current, draft)
            .await
            .map_err(|e| e.to_string())
    }
}
