//! Auth Session
//!
//! Session issued by the external auth service plus the role attached to it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Seconds before expiry at which a session counts as expired
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Authenticated user as reported by the auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens for one signed-in tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds)
    pub expires_at: i64,
    pub user: SessionUser,
}

impl Session {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }

    /// True once the token is within the refresh margin of its expiry
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(at) => now + Duration::seconds(EXPIRY_MARGIN_SECS) >= at,
            None => true,
        }
    }

    /// Time left until [`Session::is_expired`] turns true; zero once it has
    pub fn refresh_in(&self, now: DateTime<Utc>) -> Duration {
        match self.expires_at() {
            Some(at) => (at - Duration::seconds(EXPIRY_MARGIN_SECS) - now).max(Duration::zero()),
            None => Duration::zero(),
        }
    }
}

/// Role stored in the `user_roles` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: i64) -> Session {
        Session {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_at,
            user: SessionUser {
                id: "u1".to_string(),
                email: Some("noivos@example.com".to_string()),
            },
        }
    }

    #[test]
    fn test_session_expiry_margin() {
        let now = Utc::now();
        let ts = now.timestamp();
        assert!(!session(ts + 3600).is_expired(now));
        assert!(session(ts + 30).is_expired(now));
        assert!(session(ts - 1).is_expired(now));
    }

    #[test]
    fn test_refresh_in_counts_down_to_margin() {
        let ts = 1_790_000_000;
        let now = DateTime::from_timestamp(ts, 0).unwrap();
        let fresh = session(ts + 3600);
        assert_eq!(fresh.refresh_in(now).num_seconds(), 3600 - EXPIRY_MARGIN_SECS);
        assert!(fresh.is_expired(now + fresh.refresh_in(now)));
        assert_eq!(session(ts + 30).refresh_in(now), Duration::zero());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert!(!role.is_admin());
        assert_eq!(Role::Admin.as_str(), "admin");
    }
}
