//! Data Synchronization
//!
//! Loads gifts and wedding info, mirrors the admin role of the current
//! session, and decides what to refetch when the realtime channel reports
//! a change. The browser hook owns the reactive state and calls into this.

mod backend;
#[cfg(test)]
mod tests;

pub use backend::RegistryBackend;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{DomainError, GiftItem, Role, Session, WeddingInfo, WeddingInfoRecord};
use crate::form::{Credentials, GiftDraft, InfoDraft, ValidationError};
use crate::remote::{ChangeEvent, PurchaseUpdate, RemoteError};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("E-mail ou senha incorretos!")]
    InvalidCredentials,

    #[error("Esta conta não tem acesso administrativo.")]
    NotAdmin,

    #[error("Apenas administradores podem fazer isso.")]
    Forbidden,

    #[error("Informações do casamento ainda não cadastradas.")]
    MissingInfoRow,

    #[error("Sua sessão expirou. Entre novamente.")]
    SessionExpired,
}

pub type SyncResult<T> = Result<T, SyncError>;

/// What to reload after a change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefetchPlan {
    pub gifts: bool,
    pub info: bool,
}

impl RefetchPlan {
    pub fn for_change(change: ChangeEvent) -> Self {
        match change {
            ChangeEvent::Gifts => Self { gifts: true, info: false },
            ChangeEvent::Info => Self { gifts: false, info: true },
            ChangeEvent::Resync => Self { gifts: true, info: true },
        }
    }
}

/// Orders overlapping loads of one resource so a slow, older response
/// cannot overwrite a newer one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadGeneration {
    latest: u32,
}

impl LoadGeneration {
    /// Start a load; returns its ticket
    pub fn begin(&mut self) -> u32 {
        self.latest = self.latest.wrapping_add(1);
        self.latest
    }

    /// Whether a load with `ticket` is still the newest one
    pub fn accepts(&self, ticket: u32) -> bool {
        self.latest == ticket
    }
}

/// Result of resolving a session: the (possibly refreshed) session and
/// whether it carries the admin role
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub session: Session,
    pub is_admin: bool,
}

pub struct DataSync<B> {
    backend: B,
}

impl<B: RegistryBackend> DataSync<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ========================
    // Loading
    // ========================

    pub async fn load_gifts(&self, session: Option<&Session>) -> SyncResult<Vec<GiftItem>> {
        let gifts = self.backend.list_gifts(session).await?;
        log::debug!("loaded {} gifts", gifts.len());
        Ok(gifts.into_iter().map(GiftItem::normalized).collect())
    }

    /// The info row, or `None` when the table is still empty
    pub async fn load_info(&self, session: Option<&Session>) -> SyncResult<Option<WeddingInfoRecord>> {
        let record = self.backend.load_info(session).await?;
        if record.is_none() {
            log::warn!("wedding_info has no rows, showing placeholder");
        }
        Ok(record)
    }

    pub fn plan(&self, change: ChangeEvent) -> RefetchPlan {
        RefetchPlan::for_change(change)
    }

    // ========================
    // Auth
    // ========================

    /// Role lookup; lookup failures count as "not admin"
    pub async fn resolve_admin(&self, session: &Session) -> bool {
        match self.backend.has_role(session, Role::Admin).await {
            Ok(is_admin) => is_admin,
            Err(e) => {
                log::warn!("role lookup failed for {}: {}", session.user.id, e);
                false
            }
        }
    }

    /// Sign in and require the admin role. Non-admin accounts are signed
    /// out again right away.
    pub async fn login(&self, credentials: &Credentials) -> SyncResult<AuthState> {
        let session = self.backend.sign_in(credentials).await.map_err(|e| {
            if e.is_auth_failure() {
                SyncError::InvalidCredentials
            } else {
                SyncError::Remote(e)
            }
        })?;

        if !self.resolve_admin(&session).await {
            log::info!("{} signed in without admin role", credentials.email);
            if let Err(e) = self.backend.sign_out(&session).await {
                log::warn!("sign-out after rejected login failed: {}", e);
            }
            return Err(SyncError::NotAdmin);
        }

        log::info!("admin session started for {}", credentials.email);
        Ok(AuthState {
            session,
            is_admin: true,
        })
    }

    /// Revive a session kept from earlier in this tab, refreshing it when
    /// the access token has expired
    pub async fn restore(&self, session: Session, now: DateTime<Utc>) -> SyncResult<AuthState> {
        let session = match self.refresh_if_expired(&session, now).await? {
            Some(fresh) => fresh,
            None => session,
        };
        let is_admin = self.resolve_admin(&session).await;
        Ok(AuthState { session, is_admin })
    }

    /// Renew `session` once it is about to expire. `None` means it is still
    /// good to use; `Some` carries the replacement the caller must store.
    pub async fn refresh_if_expired(&self, session: &Session, now: DateTime<Utc>) -> SyncResult<Option<Session>> {
        if !session.is_expired(now) {
            return Ok(None);
        }
        match self.backend.refresh(session).await {
            Ok(fresh) => {
                log::info!("session for {} refreshed", session.user.id);
                Ok(Some(fresh))
            }
            Err(e) if e.is_auth_failure() => {
                log::warn!("session refresh rejected: {}", e);
                Err(SyncError::SessionExpired)
            }
            Err(e) => Err(SyncError::Remote(e)),
        }
    }

    /// End the session. Local state is cleared by the caller regardless of
    /// the remote outcome, so failures are only logged.
    pub async fn logout(&self, session: &Session) {
        match self.backend.sign_out(session).await {
            Ok(()) => log::info!("signed out"),
            Err(e) => log::warn!("remote sign-out failed: {}", e),
        }
    }

    // ========================
    // Mutations
    // ========================

    fn require_admin<'a>(&self, session: Option<&'a Session>, is_admin: bool) -> SyncResult<&'a Session> {
        match session {
            Some(session) if is_admin => Ok(session),
            _ => Err(SyncError::Forbidden),
        }
    }

    pub async fn add_gift(
        &self,
        session: Option<&Session>,
        is_admin: bool,
        draft: &GiftDraft,
    ) -> SyncResult<GiftItem> {
        let session = self.require_admin(session, is_admin)?;
        let gift = draft.validate()?;
        let created = self.backend.insert_gift(session, &gift).await?;
        log::info!("added gift {} ({})", created.name, created.id);
        Ok(created.normalized())
    }

    pub async fn remove_gift(&self, session: Option<&Session>, is_admin: bool, id: &str) -> SyncResult<()> {
        let session = self.require_admin(session, is_admin)?;
        self.backend.delete_gift(session, id).await?;
        log::info!("removed gift {}", id);
        Ok(())
    }

    /// Mark a gift purchased by `buyer`, or undo a purchase. Open to visitors.
    pub async fn toggle_purchased(
        &self,
        session: Option<&Session>,
        gift: &GiftItem,
        buyer: &str,
    ) -> SyncResult<GiftItem> {
        let next = gift.toggled(buyer).map_err(|e| match e {
            DomainError::MissingBuyer => SyncError::Validation(ValidationError::MissingBuyerName),
            other => SyncError::Domain(other),
        })?;
        let update = PurchaseUpdate::from(&next);
        let saved = self
            .backend
            .set_purchase(session, &gift.id, &update)
            .await
            .map_err(|e| match e {
                RemoteError::EmptyResponse => SyncError::Domain(DomainError::GiftNotFound(gift.id.clone())),
                other => SyncError::Remote(other),
            })?;
        log::info!(
            "gift {} is now {}",
            saved.id,
            if saved.purchased { "purchased" } else { "available" }
        );
        Ok(saved.normalized())
    }

    /// Apply the edited fields; returns the stored info. An unchanged form
    /// makes no remote call.
    pub async fn update_info(
        &self,
        session: Option<&Session>,
        is_admin: bool,
        current: Option<&WeddingInfoRecord>,
        draft: &InfoDraft,
    ) -> SyncResult<WeddingInfo> {
        let session = self.require_admin(session, is_admin)?;
        let current = current.ok_or(SyncError::MissingInfoRow)?;
        let patch = draft.validate(&current.info)?;
        if patch.is_empty() {
            return Ok(current.info.clone());
        }
        let saved = self.backend.update_info(session, &current.id, &patch).await?;
        log::info!("wedding info updated");
        Ok(saved.info)
    }
}
