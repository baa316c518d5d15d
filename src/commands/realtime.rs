//! Realtime Socket
//!
//! Browser websocket to the backend's realtime endpoint. Joins the registry
//! channel, keeps it alive with heartbeats, reconnects with backoff and
//! reports table changes through a callback.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use registry_core::remote::realtime::{
    self, access_token_frame, heartbeat_frame, join_frame, leave_frame, Backoff, Frame, Incoming, RefCounter,
};
use registry_core::ChangeEvent;

type ChangeHandler = Rc<dyn Fn(ChangeEvent)>;
type StatusHandler = Rc<dyn Fn(bool)>;

/// JS callbacks attached to the current socket
struct Handlers {
    _open: Closure<dyn FnMut()>,
    _message: Closure<dyn FnMut(MessageEvent)>,
    _close: Closure<dyn FnMut(CloseEvent)>,
}

struct SocketState {
    url: String,
    ws: Option<WebSocket>,
    handlers: Option<Handlers>,
    refs: RefCounter,
    access_token: Option<String>,
    backoff: Backoff,
    joined_before: bool,
    closed_by_us: bool,
    heartbeat: Option<Interval>,
    reconnect: Option<Timeout>,
    on_change: ChangeHandler,
    on_status: StatusHandler,
}

impl SocketState {
    fn send(&mut self, frame: Frame) {
        let Some(ws) = &self.ws else {
            return;
        };
        if ws.ready_state() != WebSocket::OPEN {
            return;
        }
        if let Err(e) = ws.send_with_str(&frame.to_text()) {
            log::warn!("realtime send of {} failed: {:?}", frame.event, e);
        }
    }
}

/// Handle to the realtime connection; dropping it does not close the socket,
/// call [`RealtimeSocket::close`]
#[derive(Clone)]
pub struct RealtimeSocket {
    inner: Rc<RefCell<SocketState>>,
}

impl RealtimeSocket {
    pub fn connect(
        url: String,
        access_token: Option<String>,
        on_change: impl Fn(ChangeEvent) + 'static,
        on_status: impl Fn(bool) + 'static,
    ) -> Self {
        let inner = Rc::new(RefCell::new(SocketState {
            url,
            ws: None,
            handlers: None,
            refs: RefCounter::default(),
            access_token,
            backoff: Backoff::default(),
            joined_before: false,
            closed_by_us: false,
            heartbeat: None,
            reconnect: None,
            on_change: Rc::new(on_change),
            on_status: Rc::new(on_status),
        }));
        open(&inner);
        Self { inner }
    }

    /// Pass a new token to the joined channel (None = back to anonymous)
    pub fn set_access_token(&self, token: Option<String>) {
        let stale = {
            let mut state = self.inner.borrow_mut();
            if state.access_token == token {
                return;
            }
            state.access_token = token.clone();
            match token {
                Some(token) => {
                    let frame = access_token_frame(&mut state.refs, &token);
                    state.send(frame);
                    None
                }
                // Anonymous rejoin needs a fresh channel
                None => state.ws.clone(),
            }
        };
        if let Some(ws) = stale {
            let _ = ws.close();
        }
    }

    pub fn close(&self) {
        let mut state = self.inner.borrow_mut();
        state.closed_by_us = true;
        state.reconnect = None;
        state.heartbeat = None;
        let frame = leave_frame(&mut state.refs);
        state.send(frame);
        if let Some(ws) = state.ws.take() {
            let _ = ws.close();
        }
    }
}

fn open(inner: &Rc<RefCell<SocketState>>) {
    let url = {
        let mut state = inner.borrow_mut();
        if let Some(old) = state.ws.take() {
            old.set_onopen(None);
            old.set_onmessage(None);
            old.set_onclose(None);
        }
        state.handlers = None;
        state.url.clone()
    };

    let ws = match WebSocket::new(&url) {
        Ok(ws) => ws,
        Err(e) => {
            log::error!("realtime socket could not be created: {:?}", e);
            schedule_reconnect(inner);
            return;
        }
    };

    let weak = Rc::downgrade(inner);
    let on_open = Closure::<dyn FnMut()>::new({
        let weak = weak.clone();
        move || {
            if let Some(inner) = weak.upgrade() {
                handle_open(&inner);
            }
        }
    });
    let on_message = Closure::<dyn FnMut(MessageEvent)>::new({
        let weak = weak.clone();
        move |ev: MessageEvent| {
            if let (Some(inner), Some(text)) = (weak.upgrade(), ev.data().as_string()) {
                handle_message(&inner, &text);
            }
        }
    });
    let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
        if let Some(inner) = weak.upgrade() {
            handle_close(&inner, ev.code());
        }
    });

    ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

    let mut state = inner.borrow_mut();
    state.ws = Some(ws);
    state.handlers = Some(Handlers {
        _open: on_open,
        _message: on_message,
        _close: on_close,
    });
}

fn handle_open(inner: &Rc<RefCell<SocketState>>) {
    let weak = Rc::downgrade(inner);
    let state = &mut *inner.borrow_mut();
    state.refs.reset();
    let frame = join_frame(&mut state.refs, state.access_token.as_deref());
    state.send(frame);
    state.heartbeat = Some(Interval::new(realtime::HEARTBEAT_INTERVAL_MS, move || {
        if let Some(inner) = weak.upgrade() {
            let mut state = inner.borrow_mut();
            let frame = heartbeat_frame(&mut state.refs);
            state.send(frame);
        }
    }));
    log::debug!("realtime socket open, joining {}", realtime::CHANNEL_TOPIC);
}

fn handle_message(inner: &Rc<RefCell<SocketState>>, text: &str) {
    let incoming = match realtime::decode(text) {
        Ok(incoming) => incoming,
        Err(e) => {
            log::warn!("unreadable realtime frame: {}", e);
            return;
        }
    };

    if incoming.loses_channel() {
        drop_channel(inner, &incoming);
        return;
    }

    match incoming {
        Incoming::Change(change) => {
            log::debug!("realtime change: {:?}", change);
            let on_change = inner.borrow().on_change.clone();
            on_change(change);
        }
        Incoming::Joined => {
            let (rejoined, on_change, on_status) = {
                let mut state = inner.borrow_mut();
                let rejoined = state.joined_before;
                state.joined_before = true;
                state.backoff.reset();
                (rejoined, state.on_change.clone(), state.on_status.clone())
            };
            log::info!("realtime channel joined");
            on_status(true);
            if rejoined {
                on_change(ChangeEvent::Resync);
            }
        }
        Incoming::Rejected(reason) => log::warn!("realtime push rejected: {}", reason),
        Incoming::JoinFailed(_) | Incoming::Closed(_) | Incoming::HeartbeatAck | Incoming::Ignored => {}
    }
}

/// The server dropped the channel. Close the socket without marking it
/// closed by us so `handle_close` schedules a reconnect and a fresh join.
fn drop_channel(inner: &Rc<RefCell<SocketState>>, incoming: &Incoming) {
    match incoming {
        Incoming::JoinFailed(reason) => log::error!("realtime join failed: {}", reason),
        other => log::warn!("realtime channel lost: {:?}", other),
    }
    let (ws, on_status) = {
        let mut state = inner.borrow_mut();
        state.heartbeat = None;
        (state.ws.clone(), state.on_status.clone())
    };
    on_status(false);
    if let Some(ws) = ws {
        let _ = ws.close();
    }
}

fn handle_close(inner: &Rc<RefCell<SocketState>>, code: u16) {
    let (closed_by_us, on_status) = {
        let mut state = inner.borrow_mut();
        state.heartbeat = None;
        (state.closed_by_us, state.on_status.clone())
    };
    on_status(false);
    if closed_by_us {
        log::debug!("realtime socket closed");
    } else {
        log::warn!("realtime socket dropped (code {})", code);
        schedule_reconnect(inner);
    }
}

fn schedule_reconnect(inner: &Rc<RefCell<SocketState>>) {
    let weak: Weak<RefCell<SocketState>> = Rc::downgrade(inner);
    let mut state = inner.borrow_mut();
    let delay = state.backoff.next_delay_ms();
    log::info!("realtime reconnect #{} in {} ms", state.backoff.attempt(), delay);
    state.reconnect = Some(Timeout::new(delay, move || {
        if let Some(inner) = weak.upgrade() {
            if !inner.borrow().closed_by_us {
                open(&inner);
            }
        }
    }));
}
