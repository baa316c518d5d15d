//! Frontend Models
//!
//! Registry entities come from `registry-core`; this module adds the
//! UI-only types.

pub use registry_core::{GiftItem, Session, WeddingInfo};
use registry_core::Entity;

/// Toast flavour, mapped to a CSS modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
            ToastKind::Info => "toast toast-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

/// `For` key that changes whenever a card must re-render
pub fn gift_key(gift: &GiftItem) -> (String, bool, Option<String>) {
    (gift.id(), gift.purchased, gift.purchased_by.clone())
}
