//! Wedding Data Hook
//!
//! Loads gifts and wedding info into the store, mirrors the tab's auth
//! session and admin role, and refetches whenever the realtime channel
//! reports a change.

use std::rc::Rc;

use chrono::Utc;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use registry_core::form::{GiftDraft, InfoDraft};
use registry_core::{AuthState, ChangeEvent, LoadGeneration, RefetchPlan, SupabaseConfig};

use crate::commands::realtime::RealtimeSocket;
use crate::commands::{self, Api};
use crate::context::AppContext;
use crate::models::{GiftItem, Session};
use crate::store::{
    store_add_gift, store_info_record, store_remove_gift, store_update_gift, RegistryState, RegistryStateStoreFields,
    RegistryStore,
};

/// Handle returned by [`use_wedding_data`]; cheap to copy into closures
#[derive(Clone, Copy)]
pub struct WeddingData {
    pub store: RegistryStore,
    api: StoredValue<Rc<Api>, LocalStorage>,
    socket: StoredValue<Option<RealtimeSocket>, LocalStorage>,
    /// Renews the session shortly before it expires
    refresh_timer: StoredValue<Option<Timeout>, LocalStorage>,
    gifts_generation: StoredValue<LoadGeneration>,
    info_generation: StoredValue<LoadGeneration>,
    ctx: AppContext,
}

/// Create the registry state, start loading and subscribe to changes.
/// The handle is also provided as context for the page components.
pub fn use_wedding_data(config: SupabaseConfig, ctx: AppContext) -> WeddingData {
    let data = WeddingData {
        store: Store::new(RegistryState::new()),
        api: StoredValue::new_local(Rc::new(Api::connect(config))),
        socket: StoredValue::new_local(None),
        refresh_timer: StoredValue::new_local(None),
        gifts_generation: StoredValue::new(LoadGeneration::default()),
        info_generation: StoredValue::new(LoadGeneration::default()),
        ctx,
    };
    provide_context(data);

    data.refetch(RefetchPlan { gifts: true, info: true });
    data.restore_session();
    data.subscribe();

    on_cleanup(move || {
        data.refresh_timer.set_value(None);
        data.socket.with_value(|socket| {
            if let Some(socket) = socket {
                socket.close();
            }
        });
    });

    data
}

/// Get the registry handle from context
pub fn use_registry() -> WeddingData {
    expect_context::<WeddingData>()
}

impl WeddingData {
    fn api(&self) -> Rc<Api> {
        self.api.get_value()
    }

    fn session(&self) -> Option<Session> {
        self.store.session().get_untracked()
    }

    fn is_admin_untracked(&self) -> bool {
        self.store.is_admin().get_untracked()
    }

    pub fn is_admin(&self) -> bool {
        self.store.is_admin().get()
    }

    // ========================
    // Loading
    // ========================

    /// Ticket for a new load; older tickets stop being accepted
    fn begin_load(generation: StoredValue<LoadGeneration>) -> u32 {
        let mut current = generation.get_value();
        let ticket = current.begin();
        generation.set_value(current);
        ticket
    }

    pub fn refetch(self, plan: RefetchPlan) {
        if plan.gifts {
            let ticket = Self::begin_load(self.gifts_generation);
            spawn_local(async move {
                // Reads work anonymously when the session cannot be renewed
                let session = self.current_session().await.unwrap_or(None);
                let result = self.api().list_gifts(session.as_ref()).await;
                if !self.gifts_generation.get_value().accepts(ticket) {
                    log::debug!("dropping superseded gift list");
                    return;
                }
                match result {
                    Ok(gifts) => self.store.gifts().set(gifts),
                    Err(e) => {
                        log::error!("loading gifts failed: {}", e);
                        self.ctx.error("Não foi possível carregar a lista de presentes.");
                    }
                }
                self.store.loading().set(false);
            });
        }
        if plan.info {
            let ticket = Self::begin_load(self.info_generation);
            spawn_local(async move {
                let session = self.current_session().await.unwrap_or(None);
                let result = self.api().load_info(session.as_ref()).await;
                if !self.info_generation.get_value().accepts(ticket) {
                    log::debug!("dropping superseded wedding info");
                    return;
                }
                match result {
                    Ok(Some(record)) => {
                        self.store.info_id().set(Some(record.id));
                        self.store.info().set(record.info);
                    }
                    Ok(None) => self.store.info_id().set(None),
                    Err(e) => log::error!("loading wedding info failed: {}", e),
                }
            });
        }
    }

    fn on_change(self, change: ChangeEvent) {
        let plan = self.api().sync().plan(change);
        self.refetch(plan);
    }

    fn subscribe(self) {
        let url = match self.api().config().realtime_url() {
            Ok(url) => url.to_string(),
            Err(e) => {
                log::error!("realtime disabled, bad endpoint: {}", e);
                return;
            }
        };
        let token = self.session().map(|s| s.access_token);
        let socket = RealtimeSocket::connect(
            url,
            token,
            move |change| self.on_change(change),
            move |live| self.store.live().set(live),
        );
        self.socket.set_value(Some(socket));
    }

    // ========================
    // Session
    // ========================

    fn apply_auth(&self, auth: Option<AuthState>) {
        match auth {
            Some(AuthState { session, is_admin }) => {
                commands::store_session(&session);
                self.schedule_refresh(&session);
                let token = session.access_token.clone();
                self.store.session().set(Some(session));
                self.store.is_admin().set(is_admin);
                self.socket.with_value(|socket| {
                    if let Some(socket) = socket {
                        socket.set_access_token(Some(token));
                    }
                });
            }
            None => {
                commands::clear_stored_session();
                self.refresh_timer.set_value(None);
                self.store.session().set(None);
                self.store.is_admin().set(false);
                self.ctx.set_editing_info(false);
                self.socket.with_value(|socket| {
                    if let Some(socket) = socket {
                        socket.set_access_token(None);
                    }
                });
            }
        }
    }

    /// Session for the next remote call. An expired one is renewed and
    /// stored again; when renewal fails the tab is signed out.
    async fn current_session(self) -> Result<Option<Session>, String> {
        let Some(session) = self.session() else {
            return Ok(None);
        };
        match self.api().refresh_if_expired(&session).await {
            Ok(None) => Ok(Some(session)),
            // A concurrent renewal or logout landed first; use its outcome
            _ if self.session().as_ref() != Some(&session) => Ok(self.session()),
            Ok(Some(fresh)) => {
                self.apply_auth(Some(AuthState {
                    session: fresh.clone(),
                    is_admin: self.is_admin_untracked(),
                }));
                Ok(Some(fresh))
            }
            Err(e) => {
                log::warn!("session renewal failed: {}", e);
                self.apply_auth(None);
                self.ctx.info("Sua sessão expirou. Entre novamente.");
                Err(e)
            }
        }
    }

    fn schedule_refresh(self, session: &Session) {
        let delay = session.refresh_in(Utc::now());
        let delay_ms = u32::try_from(delay.num_milliseconds()).unwrap_or(u32::MAX);
        log::debug!("session renewal in {} s", delay.num_seconds());
        let timer = Timeout::new(delay_ms, move || {
            spawn_local(async move {
                let _ = self.current_session().await;
            });
        });
        self.refresh_timer.set_value(Some(timer));
    }

    fn restore_session(self) {
        let Some(stored) = commands::load_stored_session() else {
            return;
        };
        spawn_local(async move {
            match self.api().restore(stored).await {
                Ok(auth) => {
                    log::info!("restored session (admin: {})", auth.is_admin);
                    self.apply_auth(Some(auth));
                }
                Err(e) => {
                    log::warn!("stored session rejected: {}", e);
                    self.apply_auth(None);
                }
            }
        });
    }

    pub async fn login(self, email: String, password: String) -> Result<(), String> {
        let auth = self.api().login(&email, &password).await?;
        self.apply_auth(Some(auth));
        Ok(())
    }

    pub fn logout(self) {
        let session = self.session();
        self.apply_auth(None);
        if let Some(session) = session {
            spawn_local(async move {
                self.api().logout(&session).await;
            });
        }
    }

    // ========================
    // Mutations
    // ========================

    pub async fn add_gift(self, draft: GiftDraft) -> Result<GiftItem, String> {
        let session = self.current_session().await?;
        let created = self
            .api()
            .create_gift(session.as_ref(), self.is_admin_untracked(), &draft)
            .await?;
        store_add_gift(&self.store, created.clone());
        Ok(created)
    }

    pub async fn remove_gift(self, id: String) -> Result<(), String> {
        let session = self.current_session().await?;
        self.api()
            .delete_gift(session.as_ref(), self.is_admin_untracked(), &id)
            .await?;
        store_remove_gift(&self.store, &id);
        Ok(())
    }

    pub async fn toggle_purchased(self, gift: GiftItem, buyer: String) -> Result<GiftItem, String> {
        let session = self.current_session().await?;
        let saved = self.api().toggle_gift(session.as_ref(), &gift, &buyer).await?;
        store_update_gift(&self.store, saved.clone());
        Ok(saved)
    }

    pub async fn update_info(self, draft: InfoDraft) -> Result<(), String> {
        let session = self.current_session().await?;
        let current = store_info_record(&self.store);
        let info = self
            .api()
            .save_info(session.as_ref(), self.is_admin_untracked(), current.as_ref(), &draft)
            .await?;
        self.store.info().set(info);
        Ok(())
    }
}
