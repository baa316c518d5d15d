//! Realtime Channel Frames
//!
//! JSON envelopes exchanged over the realtime websocket (Phoenix channel
//! framing). The socket itself lives in the browser crate; this module only
//! builds outgoing frames and classifies incoming ones.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Channel joined by the registry page
pub const CHANNEL_TOPIC: &str = "realtime:wedding-registry";

/// Tables whose changes trigger a refetch
pub const WATCHED_TABLES: [&str; 2] = ["gifts", "wedding_info"];

pub const HEARTBEAT_INTERVAL_MS: u32 = 25_000;

const RECONNECT_STEPS_MS: [u32; 4] = [1_000, 2_000, 5_000, 10_000];

/// Delay before reconnect attempt `attempt` (0-based)
pub fn reconnect_delay_ms(attempt: u32) -> u32 {
    let idx = (attempt as usize).min(RECONNECT_STEPS_MS.len() - 1);
    RECONNECT_STEPS_MS[idx]
}

/// Reconnect delays for one socket. Grows with every failed connection
/// or join and starts over once a join succeeds.
#[derive(Debug, Default)]
pub struct Backoff {
    attempt: u32,
}

impl Backoff {
    pub fn next_delay_ms(&mut self) -> u32 {
        let delay = reconnect_delay_ms(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        delay
    }

    /// Attempts made since the last successful join
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

/// Which data went stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    Gifts,
    Info,
    /// Socket reconnected; anything may have changed meanwhile
    Resync,
}

impl ChangeEvent {
    pub fn for_table(table: &str) -> Option<Self> {
        match table {
            "gifts" => Some(ChangeEvent::Gifts),
            "wedding_info" => Some(ChangeEvent::Info),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_ref: Option<String>,
}

impl Frame {
    pub fn to_text(&self) -> String {
        // A struct of strings and a Value cannot fail to serialize
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Monotonic message refs for one socket connection
#[derive(Debug, Default)]
pub struct RefCounter {
    last: u64,
    join_ref: Option<String>,
}

impl RefCounter {
    pub fn next(&mut self) -> String {
        self.last += 1;
        self.last.to_string()
    }

    pub fn join_ref(&self) -> Option<String> {
        self.join_ref.clone()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Subscribe to every change in the watched tables
pub fn join_frame(refs: &mut RefCounter, access_token: Option<&str>) -> Frame {
    let reference = refs.next();
    refs.join_ref = Some(reference.clone());

    let changes: Vec<Value> = WATCHED_TABLES
        .iter()
        .map(|table| json!({ "event": "*", "schema": "public", "table": table }))
        .collect();
    let mut payload = json!({
        "config": {
            "broadcast": { "ack": false, "self": false },
            "presence": { "key": "" },
            "postgres_changes": changes,
        }
    });
    if let Some(token) = access_token {
        payload["access_token"] = Value::String(token.to_string());
    }

    Frame {
        topic: CHANNEL_TOPIC.to_string(),
        event: "phx_join".to_string(),
        payload,
        reference: Some(reference.clone()),
        join_ref: Some(reference),
    }
}

pub fn heartbeat_frame(refs: &mut RefCounter) -> Frame {
    Frame {
        topic: "phoenix".to_string(),
        event: "heartbeat".to_string(),
        payload: json!({}),
        reference: Some(refs.next()),
        join_ref: None,
    }
}

/// Hand the channel a new token after sign-in, refresh or sign-out
pub fn access_token_frame(refs: &mut RefCounter, access_token: &str) -> Frame {
    Frame {
        topic: CHANNEL_TOPIC.to_string(),
        event: "access_token".to_string(),
        payload: json!({ "access_token": access_token }),
        reference: Some(refs.next()),
        join_ref: refs.join_ref(),
    }
}

pub fn leave_frame(refs: &mut RefCounter) -> Frame {
    Frame {
        topic: CHANNEL_TOPIC.to_string(),
        event: "phx_leave".to_string(),
        payload: json!({}),
        reference: Some(refs.next()),
        join_ref: refs.join_ref(),
    }
}

/// Classified incoming frame
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Change(ChangeEvent),
    Joined,
    JoinFailed(String),
    /// Error reply to a push other than the join, e.g. a token update
    Rejected(String),
    HeartbeatAck,
    Closed(String),
    Ignored,
}

impl Incoming {
    /// The channel is gone and the socket must reconnect to rejoin it
    pub fn loses_channel(&self) -> bool {
        matches!(self, Incoming::JoinFailed(_) | Incoming::Closed(_))
    }
}

pub fn decode(text: &str) -> Result<Incoming, serde_json::Error> {
    let frame: Frame = serde_json::from_str(text)?;
    Ok(classify(&frame))
}

fn classify(frame: &Frame) -> Incoming {
    match frame.event.as_str() {
        "postgres_changes" => {
            let data = &frame.payload["data"];
            data["table"]
                .as_str()
                .and_then(ChangeEvent::for_table)
                .map(Incoming::Change)
                .unwrap_or(Incoming::Ignored)
        }
        "phx_reply" if frame.topic == "phoenix" => Incoming::HeartbeatAck,
        "phx_reply" if frame.topic == CHANNEL_TOPIC => {
            let is_join_reply = frame.reference.is_some() && frame.reference == frame.join_ref;
            match frame.payload["status"].as_str() {
                Some("ok") if is_join_reply => Incoming::Joined,
                Some("ok") => Incoming::Ignored,
                _ if is_join_reply => Incoming::JoinFailed(reason(&frame.payload["response"])),
                _ => Incoming::Rejected(reason(&frame.payload["response"])),
            }
        }
        "system" if frame.payload["status"].as_str() == Some("error") => {
            Incoming::JoinFailed(reason(&frame.payload))
        }
        "phx_close" | "phx_error" if frame.topic == CHANNEL_TOPIC => {
            Incoming::Closed(frame.event.clone())
        }
        _ => Incoming::Ignored,
    }
}

fn reason(value: &Value) -> String {
    value["reason"]
        .as_str()
        .or_else(|| value["message"].as_str())
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_frame_watches_both_tables() {
        let mut refs = RefCounter::default();
        let frame = join_frame(&mut refs, Some("jwt"));
        assert_eq!(frame.event, "phx_join");
        assert_eq!(frame.reference.as_deref(), Some("1"));
        assert_eq!(frame.join_ref.as_deref(), Some("1"));
        assert_eq!(frame.payload["access_token"], "jwt");

        let tables: Vec<_> = frame.payload["config"]["postgres_changes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["table"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(tables, vec!["gifts", "wedding_info"]);
    }

    #[test]
    fn test_refs_increase_and_reset() {
        let mut refs = RefCounter::default();
        let join = join_frame(&mut refs, None);
        let beat = heartbeat_frame(&mut refs);
        assert_eq!(join.reference.as_deref(), Some("1"));
        assert_eq!(beat.reference.as_deref(), Some("2"));
        assert!(join.payload.get("access_token").is_none());

        let token = access_token_frame(&mut refs, "new");
        assert_eq!(token.join_ref.as_deref(), Some("1"));

        refs.reset();
        assert_eq!(refs.next(), "1");
        assert!(refs.join_ref().is_none());
    }

    #[test]
    fn test_frame_wire_format() {
        let mut refs = RefCounter::default();
        let text = heartbeat_frame(&mut refs).to_text();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({ "topic": "phoenix", "event": "heartbeat", "payload": {}, "ref": "1" })
        );
    }

    #[test]
    fn test_decode_postgres_change() {
        let text = r#"{
            "topic": "realtime:wedding-registry",
            "event": "postgres_changes",
            "payload": {
                "data": { "schema": "public", "table": "gifts", "type": "UPDATE",
                          "record": { "id": "1" }, "old_record": { "id": "1" } },
                "ids": [4815]
            },
            "ref": null
        }"#;
        assert_eq!(decode(text).unwrap(), Incoming::Change(ChangeEvent::Gifts));

        let info = text.replace("\"gifts\"", "\"wedding_info\"");
        assert_eq!(decode(&info).unwrap(), Incoming::Change(ChangeEvent::Info));

        let other = text.replace("\"gifts\"", "\"guests\"");
        assert_eq!(decode(&other).unwrap(), Incoming::Ignored);
    }

    #[test]
    fn test_decode_replies() {
        let joined = r#"{"topic":"realtime:wedding-registry","event":"phx_reply",
            "payload":{"status":"ok","response":{"postgres_changes":[]}},"ref":"1","join_ref":"1"}"#;
        assert_eq!(decode(joined).unwrap(), Incoming::Joined);

        let failed = r#"{"topic":"realtime:wedding-registry","event":"phx_reply",
            "payload":{"status":"error","response":{"reason":"unauthorized"}},"ref":"1","join_ref":"1"}"#;
        assert_eq!(decode(failed).unwrap(), Incoming::JoinFailed("unauthorized".to_string()));

        let token_rejected = r#"{"topic":"realtime:wedding-registry","event":"phx_reply",
            "payload":{"status":"error","response":{"reason":"Token has expired"}},"ref":"7","join_ref":"1"}"#;
        assert_eq!(
            decode(token_rejected).unwrap(),
            Incoming::Rejected("Token has expired".to_string())
        );

        let beat = r#"{"topic":"phoenix","event":"phx_reply","payload":{"status":"ok","response":{}},"ref":"2"}"#;
        assert_eq!(decode(beat).unwrap(), Incoming::HeartbeatAck);

        let closed = r#"{"topic":"realtime:wedding-registry","event":"phx_close","payload":{},"ref":null}"#;
        assert_eq!(decode(closed).unwrap(), Incoming::Closed("phx_close".to_string()));

        let errored = r#"{"topic":"realtime:wedding-registry","event":"phx_error","payload":{},"ref":"1","join_ref":"1"}"#;
        assert_eq!(decode(errored).unwrap(), Incoming::Closed("phx_error".to_string()));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode("not json").is_err());
    }

    #[test]
    fn test_lost_channel_backs_off_until_joined() {
        let failed = r#"{"topic":"realtime:wedding-registry","event":"phx_reply",
            "payload":{"status":"error","response":{"reason":"unauthorized"}},"ref":"1","join_ref":"1"}"#;
        let errored = r#"{"topic":"realtime:wedding-registry","event":"phx_error","payload":{},"ref":"1"}"#;
        let joined = r#"{"topic":"realtime:wedding-registry","event":"phx_reply",
            "payload":{"status":"ok","response":{}},"ref":"1","join_ref":"1"}"#;

        let mut backoff = Backoff::default();
        let mut delays = Vec::new();
        for text in [failed, errored, failed] {
            let incoming = decode(text).unwrap();
            assert!(incoming.loses_channel());
            delays.push(backoff.next_delay_ms());
        }
        assert_eq!(delays, vec![1_000, 2_000, 5_000]);

        assert!(!decode(joined).unwrap().loses_channel());
        backoff.reset();
        assert_eq!(backoff.attempt(), 0);
        assert_eq!(backoff.next_delay_ms(), 1_000);

        let rejected = Incoming::Rejected("Token has expired".to_string());
        assert!(!rejected.loses_channel());
    }

    #[test]
    fn test_reconnect_backoff() {
        let delays: Vec<_> = (0..6).map(reconnect_delay_ms).collect();
        assert_eq!(delays, vec![1_000, 2_000, 5_000, 10_000, 10_000, 10_000]);
    }
}
