//! Gift Commands
//!
//! Frontend bindings for the `gifts` table.

use registry_core::form::GiftDraft;

use super::Api;
use crate::models::{GiftItem, Session};

impl Api {
    pub async fn list_gifts(&self, session: Option<&Session>) -> Result<Vec<GiftItem>, String> {
        self.sync.load_gifts(session).await.map_err(|e| e.to_string())
    }

    pub async fn create_gift(
        &self,
        session: Option<&Session>,
        is_admin: bool,
        draft: &GiftDraft,
    ) -> Result<GiftItem, String> {
        self.sync
            .add_gift(session, is_admin, draft)
            .await
            .map_err(|e| e.to_string())
    }

    pub async fn delete_gift(&self, session: Option<&Session>, is_admin: bool, id: &str) -> Result<(), String> {
        self.sync
            .remove_gift(session, is_admin, id)
            .await
            .map_err(|e| e.to_string())
    }

    /// Buyer name is ignored when undoing a purchase
    pub async fn toggle_gift(
        &self,
        session: Option<&Session>,
        gift: &GiftItem,
        buyer: &str,
    ) -> Result<GiftItem, String> {
        self.sync
            .toggle_purchased(session, gift, buyer)
            .await
            .map_err(|e| e.to_string())
    }
}
