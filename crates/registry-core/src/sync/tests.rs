//! DataSync Integration Tests
//!
//! Drives the synchronization logic against an in-memory backend.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::*;
use crate::domain::{NewGift, SessionUser, WeddingInfoPatch};
use crate::form::{Credentials, GiftDraft, InfoDraft, ValidationError};

const ADMIN_EMAIL: &str = "noivos@example.com";
const GUEST_EMAIL: &str = "convidado@example.com";
const PASSWORD: &str = "casamento2026";

#[derive(Default)]
struct MemoryBackend {
    gifts: RefCell<Vec<GiftItem>>,
    info: RefCell<Option<WeddingInfoRecord>>,
    next_id: Cell<u32>,
    sign_outs: Cell<u32>,
    refreshes: Cell<u32>,
    info_updates: Cell<u32>,
    fail_sign_out: Cell<bool>,
    fail_refresh: Cell<bool>,
    /// Bearer token of the last admin write
    last_token: RefCell<Option<String>>,
}

impl MemoryBackend {
    fn session_for(email: &str, expires_at: i64) -> Session {
        Session {
            access_token: format!("token-{}", email),
            refresh_token: format!("refresh-{}", email),
            expires_at,
            user: SessionUser {
                id: email.to_string(),
                email: Some(email.to_string()),
            },
        }
    }

    fn seed_gift(&self, name: &str) -> GiftItem {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let gift = GiftItem::new(
            id.to_string(),
            NewGift {
                name: name.to_string(),
                ..Default::default()
            },
        );
        self.gifts.borrow_mut().push(gift.clone());
        gift
    }

    fn seed_info(&self) {
        *self.info.borrow_mut() = Some(WeddingInfoRecord {
            id: "1".to_string(),
            info: WeddingInfo::default(),
        });
    }
}

fn api_error(status: u16, message: &str) -> RemoteError {
    RemoteError::Api {
        status,
        message: message.to_string(),
    }
}

#[async_trait(?Send)]
impl RegistryBackend for MemoryBackend {
    async fn list_gifts(&self, _session: Option<&Session>) -> Result<Vec<GiftItem>, RemoteError> {
        Ok(self.gifts.borrow().clone())
    }

    async fn insert_gift(&self, session: &Session, gift: &NewGift) -> Result<GiftItem, RemoteError> {
        *self.last_token.borrow_mut() = Some(session.access_token.clone());
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let created = GiftItem::new(id.to_string(), gift.clone());
        self.gifts.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn set_purchase(
        &self,
        _session: Option<&Session>,
        id: &str,
        update: &PurchaseUpdate,
    ) -> Result<GiftItem, RemoteError> {
        let mut gifts = self.gifts.borrow_mut();
        let gift = gifts
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(RemoteError::EmptyResponse)?;
        gift.purchased = update.purchased;
        gift.purchased_by = update.purchased_by.clone();
        Ok(gift.clone())
    }

    async fn delete_gift(&self, session: &Session, id: &str) -> Result<(), RemoteError> {
        *self.last_token.borrow_mut() = Some(session.access_token.clone());
        self.gifts.borrow_mut().retain(|g| g.id != id);
        Ok(())
    }

    async fn load_info(&self, _session: Option<&Session>) -> Result<Option<WeddingInfoRecord>, RemoteError> {
        Ok(self.info.borrow().clone())
    }

    async fn update_info(
        &self,
        _session: &Session,
        id: &str,
        patch: &WeddingInfoPatch,
    ) -> Result<WeddingInfoRecord, RemoteError> {
        self.info_updates.set(self.info_updates.get() + 1);
        let mut info = self.info.borrow_mut();
        let record = info
            .as_mut()
            .filter(|r| r.id == id)
            .ok_or(RemoteError::EmptyResponse)?;
        record.info = patch.apply(&record.info);
        Ok(record.clone())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, RemoteError> {
        let known = [ADMIN_EMAIL, GUEST_EMAIL].contains(&credentials.email.as_str());
        if !known || credentials.password != PASSWORD {
            return Err(api_error(400, "Invalid login credentials"));
        }
        Ok(Self::session_for(&credentials.email, Utc::now().timestamp() + 3600))
    }

    async fn refresh(&self, session: &Session) -> Result<Session, RemoteError> {
        let count = self.refreshes.get() + 1;
        self.refreshes.set(count);
        if self.fail_refresh.get() {
            return Err(api_error(400, "Invalid Refresh Token: Already Used"));
        }
        let email = session.user.email.clone().unwrap_or_default();
        let mut fresh = Self::session_for(&email, Utc::now().timestamp() + 3600);
        fresh.access_token = format!("{}-r{}", fresh.access_token, count);
        Ok(fresh)
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), RemoteError> {
        self.sign_outs.set(self.sign_outs.get() + 1);
        if self.fail_sign_out.get() {
            return Err(api_error(500, "boom"));
        }
        Ok(())
    }

    async fn has_role(&self, session: &Session, role: Role) -> Result<bool, RemoteError> {
        Ok(role == Role::Admin && session.user.id == ADMIN_EMAIL)
    }
}

fn setup() -> DataSync<MemoryBackend> {
    let backend = MemoryBackend::default();
    backend.seed_gift("Jogo de Panelas");
    backend.seed_gift("Air Fryer");
    backend.seed_info();
    DataSync::new(backend)
}

async fn admin(sync: &DataSync<MemoryBackend>) -> Session {
    let creds = Credentials::new(ADMIN_EMAIL, PASSWORD).unwrap();
    sync.login(&creds).await.expect("admin login").session
}

#[tokio::test]
async fn test_load_gifts_normalizes_rows() {
    let sync = setup();
    sync.backend().gifts.borrow_mut()[0].purchased_by = Some("stray".to_string());

    let gifts = sync.load_gifts(None).await.unwrap();
    assert_eq!(gifts.len(), 2);
    assert!(gifts[0].purchased_by.is_none());
}

#[tokio::test]
async fn test_load_info_missing_row() {
    let sync = DataSync::new(MemoryBackend::default());
    assert!(sync.load_info(None).await.unwrap().is_none());
}

#[tokio::test]
async fn test_admin_login() {
    let sync = setup();
    let creds = Credentials::new(ADMIN_EMAIL, PASSWORD).unwrap();
    let state = sync.login(&creds).await.unwrap();
    assert!(state.is_admin);
    assert_eq!(state.session.user.id, ADMIN_EMAIL);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let sync = setup();
    let creds = Credentials::new(ADMIN_EMAIL, "nope").unwrap();
    let err = sync.login(&creds).await.unwrap_err();
    assert!(matches!(err, SyncError::InvalidCredentials));
    assert_eq!(err.to_string(), "E-mail ou senha incorretos!");
}

#[tokio::test]
async fn test_non_admin_login_is_signed_out() {
    let sync = setup();
    let creds = Credentials::new(GUEST_EMAIL, PASSWORD).unwrap();
    let err = sync.login(&creds).await.unwrap_err();
    assert!(matches!(err, SyncError::NotAdmin));
    assert_eq!(sync.backend().sign_outs.get(), 1);
}

#[tokio::test]
async fn test_restore_refreshes_expired_session() {
    let sync = setup();
    let now = Utc::now();
    let stale = MemoryBackend::session_for(ADMIN_EMAIL, (now - Duration::minutes(5)).timestamp());

    let state = sync.restore(stale, now).await.unwrap();
    assert_eq!(sync.backend().refreshes.get(), 1);
    assert!(!state.session.is_expired(now));
    assert!(state.is_admin);
}

#[tokio::test]
async fn test_restore_keeps_valid_session() {
    let sync = setup();
    let now = Utc::now();
    let fresh = MemoryBackend::session_for(GUEST_EMAIL, (now + Duration::hours(1)).timestamp());

    let state = sync.restore(fresh.clone(), now).await.unwrap();
    assert_eq!(sync.backend().refreshes.get(), 0);
    assert_eq!(state.session, fresh);
    assert!(!state.is_admin);
}

#[tokio::test]
async fn test_expired_session_refreshed_once_before_write() {
    let sync = setup();
    let now = Utc::now();
    let stale = MemoryBackend::session_for(ADMIN_EMAIL, (now - Duration::minutes(1)).timestamp());

    let fresh = sync
        .refresh_if_expired(&stale, now)
        .await
        .unwrap()
        .expect("expired session should be replaced");
    let draft = GiftDraft {
        name: "Cafeteira".to_string(),
        ..Default::default()
    };
    sync.add_gift(Some(&fresh), true, &draft).await.unwrap();

    assert_eq!(sync.backend().refreshes.get(), 1);
    let sent = sync.backend().last_token.borrow().clone();
    assert_eq!(sent.as_deref(), Some(fresh.access_token.as_str()));
    assert_ne!(fresh.access_token, stale.access_token);

    // The replacement is good for the next call
    assert!(sync.refresh_if_expired(&fresh, now).await.unwrap().is_none());
    assert_eq!(sync.backend().refreshes.get(), 1);
}

#[tokio::test]
async fn test_valid_session_is_not_refreshed() {
    let sync = setup();
    let now = Utc::now();
    let session = MemoryBackend::session_for(ADMIN_EMAIL, (now + Duration::hours(1)).timestamp());
    assert!(sync.refresh_if_expired(&session, now).await.unwrap().is_none());
    assert_eq!(sync.backend().refreshes.get(), 0);
}

#[tokio::test]
async fn test_rejected_refresh_reports_expired_session() {
    let sync = setup();
    sync.backend().fail_refresh.set(true);
    let now = Utc::now();
    let stale = MemoryBackend::session_for(ADMIN_EMAIL, (now - Duration::minutes(1)).timestamp());

    let err = sync.refresh_if_expired(&stale, now).await.unwrap_err();
    assert!(matches!(err, SyncError::SessionExpired));
    assert!(matches!(sync.restore(stale, now).await, Err(SyncError::SessionExpired)));
}

#[test]
fn test_load_generation_keeps_newest() {
    let mut generation = LoadGeneration::default();
    let first = generation.begin();
    let second = generation.begin();
    assert!(!generation.accepts(first));
    assert!(generation.accepts(second));

    let third = generation.begin();
    assert!(!generation.accepts(second));
    assert!(generation.accepts(third));
}

#[tokio::test]
async fn test_logout_tolerates_remote_failure() {
    let sync = setup();
    let session = admin(&sync).await;
    sync.backend().fail_sign_out.set(true);
    sync.logout(&session).await;
    assert_eq!(sync.backend().sign_outs.get(), 1);
}

#[tokio::test]
async fn test_add_gift_requires_admin() {
    let sync = setup();
    let draft = GiftDraft {
        name: "Aspirador Robô".to_string(),
        price: "1200".to_string(),
        ..Default::default()
    };

    let err = sync.add_gift(None, false, &draft).await.unwrap_err();
    assert!(matches!(err, SyncError::Forbidden));

    let session = admin(&sync).await;
    let created = sync.add_gift(Some(&session), true, &draft).await.unwrap();
    assert_eq!(created.name, "Aspirador Robô");
    assert_eq!(created.price, Some(1200.0));
    assert!(!created.purchased);
    assert_eq!(sync.load_gifts(None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_add_gift_validates_draft() {
    let sync = setup();
    let session = admin(&sync).await;
    let err = sync
        .add_gift(Some(&session), true, &GiftDraft::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Validation(ValidationError::MissingGiftName)));
}

#[tokio::test]
async fn test_remove_gift() {
    let sync = setup();
    let session = admin(&sync).await;
    let gifts = sync.load_gifts(None).await.unwrap();

    assert!(matches!(
        sync.remove_gift(Some(&session), false, &gifts[0].id).await,
        Err(SyncError::Forbidden)
    ));

    sync.remove_gift(Some(&session), true, &gifts[0].id).await.unwrap();
    let remaining = sync.load_gifts(None).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Air Fryer");
}

#[tokio::test]
async fn test_visitor_toggles_purchase() {
    let sync = setup();
    let gift = sync.load_gifts(None).await.unwrap().remove(1);

    let bought = sync.toggle_purchased(None, &gift, " Tia Rosa ").await.unwrap();
    assert!(bought.purchased);
    assert_eq!(bought.purchased_by.as_deref(), Some("Tia Rosa"));

    let undone = sync.toggle_purchased(None, &bought, "").await.unwrap();
    assert!(!undone.purchased);
    assert!(undone.purchased_by.is_none());
}

#[tokio::test]
async fn test_purchase_needs_buyer_name() {
    let sync = setup();
    let gift = sync.load_gifts(None).await.unwrap().remove(0);
    let err = sync.toggle_purchased(None, &gift, "  ").await.unwrap_err();
    assert_eq!(err.to_string(), "Por favor, informe seu nome!");
}

#[tokio::test]
async fn test_toggle_on_deleted_gift() {
    let sync = setup();
    let gift = sync.load_gifts(None).await.unwrap().remove(0);
    sync.backend().gifts.borrow_mut().clear();

    let err = sync.toggle_purchased(None, &gift, "Maria").await.unwrap_err();
    assert!(matches!(err, SyncError::Domain(DomainError::GiftNotFound(_))));
}

#[tokio::test]
async fn test_update_info() {
    let sync = setup();
    let session = admin(&sync).await;
    let current = sync.load_info(None).await.unwrap();

    let mut draft = InfoDraft::from(&current.as_ref().unwrap().info);
    draft.address = "Rua Nova, 42".to_string();

    let saved = sync
        .update_info(Some(&session), true, current.as_ref(), &draft)
        .await
        .unwrap();
    assert_eq!(saved.address, "Rua Nova, 42");
    assert_eq!(sync.backend().info_updates.get(), 1);
}

#[tokio::test]
async fn test_unchanged_info_skips_remote_call() {
    let sync = setup();
    let session = admin(&sync).await;
    let current = sync.load_info(None).await.unwrap();
    let draft = InfoDraft::from(&current.as_ref().unwrap().info);

    sync.update_info(Some(&session), true, current.as_ref(), &draft)
        .await
        .unwrap();
    assert_eq!(sync.backend().info_updates.get(), 0);
}

#[tokio::test]
async fn test_update_info_without_row() {
    let sync = setup();
    let session = admin(&sync).await;
    let draft = InfoDraft::from(&WeddingInfo::default());
    let err = sync
        .update_info(Some(&session), true, None, &draft)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::MissingInfoRow));
}

#[test]
fn test_refetch_plan() {
    let sync = DataSync::new(MemoryBackend::default());
    assert_eq!(sync.plan(ChangeEvent::Gifts), RefetchPlan { gifts: true, info: false });
    assert_eq!(sync.plan(ChangeEvent::Info), RefetchPlan { gifts: false, info: true });
    assert_eq!(sync.plan(ChangeEvent::Resync), RefetchPlan { gifts: true, info: true });
}
