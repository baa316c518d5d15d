//! Global Registry State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use registry_core::{Entity, WeddingInfoRecord};
use crate::models::{GiftItem, Session, WeddingInfo};

/// Everything the page renders, mirrored from the backend
#[derive(Clone, Debug, Default, Store)]
pub struct RegistryState {
    /// Gifts, oldest first
    pub gifts: Vec<GiftItem>,
    /// Wedding info (placeholder until loaded)
    pub info: WeddingInfo,
    /// Row id of the info record; None while missing
    pub info_id: Option<String>,
    /// Signed-in session for this tab
    pub session: Option<Session>,
    /// Session carries the admin role
    pub is_admin: bool,
    /// Initial gift load still running
    pub loading: bool,
    /// Realtime channel joined
    pub live: bool,
}

impl RegistryState {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type RegistryStore = Store<RegistryState>;

// ========================
// Store Helper Functions
// ========================

/// Replace a gift in the store by ID
pub fn store_update_gift(store: &RegistryStore, updated: GiftItem) {
    let id = updated.id();
    if let Some(gift) = store.gifts().write().iter_mut().find(|g| g.id() == id) {
        *gift = updated;
    }
}

/// Append a gift unless a refetch already brought it in
pub fn store_add_gift(store: &RegistryStore, gift: GiftItem) {
    let gifts_field = store.gifts();
    let mut gifts = gifts_field.write();
    let id = gift.id();
    if !gifts.iter().any(|g| g.id() == id) {
        gifts.push(gift);
    }
}

/// Remove a gift from the store by ID
pub fn store_remove_gift(store: &RegistryStore, gift_id: &str) {
    store.gifts().write().retain(|g| g.id != gift_id);
}

/// Current info as a row, if the row exists
pub fn store_info_record(store: &RegistryStore) -> Option<WeddingInfoRecord> {
    store.info_id().get_untracked().map(|id| WeddingInfoRecord {
        id,
        info: store.info().get_untracked(),
    })
}
