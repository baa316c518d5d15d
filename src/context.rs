//! Application Context
//!
//! Shared UI state provided via Leptos Context API.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use crate::models::{Toast, ToastKind};

/// How long a toast stays on screen
const TOAST_MS: u32 = 4_000;

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Visible toasts - read
    pub toasts: ReadSignal<Vec<Toast>>,
    /// Visible toasts - write
    set_toasts: WriteSignal<Vec<Toast>>,
    /// Next toast id
    next_toast: StoredValue<u32>,
    /// Admin info editor open - read
    pub editing_info: ReadSignal<bool>,
    /// Admin info editor open - write
    set_editing_info: WriteSignal<bool>,
}

impl AppContext {
    pub fn new(
        toasts: (ReadSignal<Vec<Toast>>, WriteSignal<Vec<Toast>>),
        editing_info: (ReadSignal<bool>, WriteSignal<bool>),
    ) -> Self {
        Self {
            toasts: toasts.0,
            set_toasts: toasts.1,
            next_toast: StoredValue::new(0),
            editing_info: editing_info.0,
            set_editing_info: editing_info.1,
        }
    }

    /// Show a toast and schedule its removal
    pub fn notify(&self, kind: ToastKind, message: impl Into<String>) {
        let id = self.next_toast.get_value() + 1;
        self.next_toast.set_value(id);
        self.set_toasts.update(|toasts| {
            toasts.push(Toast {
                id,
                kind,
                message: message.into(),
            })
        });

        let ctx = *self;
        Timeout::new(TOAST_MS, move || ctx.dismiss(id)).forget();
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(ToastKind::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(ToastKind::Info, message);
    }

    pub fn dismiss(&self, id: u32) {
        self.set_toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }

    pub fn set_editing_info(&self, open: bool) {
        self.set_editing_info.set(open);
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
