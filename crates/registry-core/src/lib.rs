//! Wedding Registry Core
//!
//! Domain entities, form validation, catalog statistics and the Supabase
//! client used by the registry front end. Everything here builds natively,
//! so the data-synchronization logic is tested without a browser.

pub mod catalog;
pub mod domain;
pub mod form;
pub mod remote;
pub mod sync;

pub use catalog::{format_price, GiftFilter, Progress};
pub use domain::{
    DomainError, DomainResult, Entity, GiftItem, NewGift, Role, Session, SessionUser, WeddingInfo,
    WeddingInfoPatch, WeddingInfoRecord,
};
pub use form::{Credentials, GiftDraft, InfoDraft, ValidationError};
pub use remote::{ChangeEvent, RemoteError, SupabaseClient, SupabaseConfig};
pub use sync::{AuthState, DataSync, LoadGeneration, RefetchPlan, RegistryBackend, SyncError};
