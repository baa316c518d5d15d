//! Backend Seam
//!
//! Abstract interface over the remote tables and auth calls the registry
//! needs. Browser futures are not `Send`, hence `?Send`.

use async_trait::async_trait;

use crate::domain::{GiftItem, NewGift, Role, Session, WeddingInfoPatch, WeddingInfoRecord};
use crate::form::Credentials;
use crate::remote::{PurchaseUpdate, RemoteError, SupabaseClient};

#[async_trait(?Send)]
pub trait RegistryBackend {
    /// Every gift, oldest first
    async fn list_gifts(&self, session: Option<&Session>) -> Result<Vec<GiftItem>, RemoteError>;

    async fn insert_gift(&self, session: &Session, gift: &NewGift) -> Result<GiftItem, RemoteError>;

    async fn set_purchase(
        &self,
        session: Option<&Session>,
        id: &str,
        update: &PurchaseUpdate,
    ) -> Result<GiftItem, RemoteError>;

    async fn delete_gift(&self, session: &Session, id: &str) -> Result<(), RemoteError>;

    /// The singleton info row, if one exists
    async fn load_info(&self, session: Option<&Session>) -> Result<Option<WeddingInfoRecord>, RemoteError>;

    async fn update_info(
        &self,
        session: &Session,
        id: &str,
        patch: &WeddingInfoPatch,
    ) -> Result<WeddingInfoRecord, RemoteError>;

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, RemoteError>;

    async fn refresh(&self, session: &Session) -> Result<Session, RemoteError>;

    async fn sign_out(&self, session: &Session) -> Result<(), RemoteError>;

    async fn has_role(&self, session: &Session, role: Role) -> Result<bool, RemoteError>;
}

#[async_trait(?Send)]
impl RegistryBackend for SupabaseClient {
    async fn list_gifts(&self, session: Option<&Session>) -> Result<Vec<GiftItem>, RemoteError> {
        self.fetch(self.list_gifts_request(session)?).await
    }

    async fn insert_gift(&self, session: &Session, gift: &NewGift) -> Result<GiftItem, RemoteError> {
        self.fetch_first(self.insert_gift_request(session, gift)?).await
    }

    async fn set_purchase(
        &self,
        session: Option<&Session>,
        id: &str,
        update: &PurchaseUpdate,
    ) -> Result<GiftItem, RemoteError> {
        self.fetch_first(self.set_purchase_request(session, id, update)?)
            .await
    }

    async fn delete_gift(&self, session: &Session, id: &str) -> Result<(), RemoteError> {
        self.execute(self.delete_gift_request(session, id)?).await
    }

    async fn load_info(&self, session: Option<&Session>) -> Result<Option<WeddingInfoRecord>, RemoteError> {
        let rows: Vec<WeddingInfoRecord> = self.fetch(self.load_info_request(session)?).await?;
        Ok(rows.into_iter().next())
    }

    async fn update_info(
        &self,
        session: &Session,
        id: &str,
        patch: &WeddingInfoPatch,
    ) -> Result<WeddingInfoRecord, RemoteError> {
        self.fetch_first(self.update_info_request(session, id, patch)?)
            .await
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, RemoteError> {
        self.fetch_session(self.sign_in_request(credentials)?).await
    }

    async fn refresh(&self, session: &Session) -> Result<Session, RemoteError> {
        self.fetch_session(self.refresh_request(session)?).await
    }

    async fn sign_out(&self, session: &Session) -> Result<(), RemoteError> {
        self.execute(self.sign_out_request(session)?).await
    }

    async fn has_role(&self, session: &Session, role: Role) -> Result<bool, RemoteError> {
        self.fetch_has_role(self.role_request(session, role)?, role)
            .await
    }
}
