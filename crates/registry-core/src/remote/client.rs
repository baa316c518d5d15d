//! Supabase REST + Auth Client
//!
//! Request builders are kept separate from execution so the exact wire
//! shape of every call can be checked without a network.

use chrono::Utc;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{RemoteError, SupabaseConfig};
use crate::domain::{GiftItem, NewGift, Role, Session, SessionUser, WeddingInfoPatch};
use crate::form::Credentials;

const GIFTS: &str = "gifts";
const WEDDING_INFO: &str = "wedding_info";
const USER_ROLES: &str = "user_roles";

/// Body of a purchase toggle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseUpdate {
    pub purchased: bool,
    pub purchased_by: Option<String>,
}

impl From<&GiftItem> for PurchaseUpdate {
    fn from(gift: &GiftItem) -> Self {
        Self {
            purchased: gift.purchased,
            purchased_by: gift.purchased_by.clone(),
        }
    }
}

/// Auth token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: SessionUser,
}

impl TokenResponse {
    pub fn into_session(self, now: i64) -> Session {
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| now + self.expires_in.unwrap_or(3600));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

#[derive(Deserialize)]
struct RoleRow {
    role: String,
}

/// Error body shapes used by the REST and auth endpoints
#[derive(Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }
}

#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    config: SupabaseConfig,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    fn bearer<'a>(&'a self, session: Option<&'a Session>) -> &'a str {
        session
            .map(|s| s.access_token.as_str())
            .unwrap_or_else(|| self.config.anon_key())
    }

    fn rest(&self, method: Method, table: &str, session: Option<&Session>) -> Result<RequestBuilder, RemoteError> {
        let url = self.config.rest_url(table)?;
        Ok(self
            .http
            .request(method, url)
            .header("apikey", self.config.anon_key())
            .header(AUTHORIZATION, format!("Bearer {}", self.bearer(session))))
    }

    fn auth(&self, path: &str) -> Result<RequestBuilder, RemoteError> {
        let url = self.config.auth_url(path)?;
        Ok(self
            .http
            .post(url)
            .header("apikey", self.config.anon_key())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json")))
    }

    // ========================
    // Request Builders
    // ========================

    pub fn list_gifts_request(&self, session: Option<&Session>) -> Result<Request, RemoteError> {
        Ok(self
            .rest(Method::GET, GIFTS, session)?
            .query(&[("select", "*"), ("order", "created_at.asc")])
            .build()?)
    }

    pub fn insert_gift_request(&self, session: &Session, gift: &NewGift) -> Result<Request, RemoteError> {
        Ok(self
            .rest(Method::POST, GIFTS, Some(session))?
            .header("Prefer", "return=representation")
            .json(gift)
            .build()?)
    }

    pub fn set_purchase_request(
        &self,
        session: Option<&Session>,
        id: &str,
        update: &PurchaseUpdate,
    ) -> Result<Request, RemoteError> {
        Ok(self
            .rest(Method::PATCH, GIFTS, session)?
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(update)
            .build()?)
    }

    pub fn delete_gift_request(&self, session: &Session, id: &str) -> Result<Request, RemoteError> {
        Ok(self
            .rest(Method::DELETE, GIFTS, Some(session))?
            .query(&[("id", format!("eq.{}", id))])
            .build()?)
    }

    pub fn load_info_request(&self, session: Option<&Session>) -> Result<Request, RemoteError> {
        Ok(self
            .rest(Method::GET, WEDDING_INFO, session)?
            .query(&[("select", "*"), ("limit", "1")])
            .build()?)
    }

    pub fn update_info_request(
        &self,
        session: &Session,
        id: &str,
        patch: &WeddingInfoPatch,
    ) -> Result<Request, RemoteError> {
        Ok(self
            .rest(Method::PATCH, WEDDING_INFO, Some(session))?
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(patch)
            .build()?)
    }

    pub fn role_request(&self, session: &Session, role: Role) -> Result<Request, RemoteError> {
        Ok(self
            .rest(Method::GET, USER_ROLES, Some(session))?
            .query(&[
                ("select", "role".to_string()),
                ("user_id", format!("eq.{}", session.user.id)),
                ("role", format!("eq.{}", role.as_str())),
            ])
            .build()?)
    }

    pub fn sign_in_request(&self, credentials: &Credentials) -> Result<Request, RemoteError> {
        Ok(self
            .auth("token")?
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .build()?)
    }

    pub fn refresh_request(&self, session: &Session) -> Result<Request, RemoteError> {
        Ok(self
            .auth("token")?
            .query(&[("grant_type", "refresh_token")])
            .json(&serde_json::json!({ "refresh_token": session.refresh_token }))
            .build()?)
    }

    pub fn sign_out_request(&self, session: &Session) -> Result<Request, RemoteError> {
        Ok(self
            .auth("logout")?
            .header(AUTHORIZATION, format!("Bearer {}", session.access_token))
            .build()?)
    }

    // ========================
    // Execution
    // ========================

    async fn send(&self, request: Request) -> Result<Response, RemoteError> {
        let method = request.method().clone();
        let path = request.url().path().to_string();
        let response = self.http.execute(request).await?;
        let status = response.status();
        log::debug!("{} {} -> {}", method, path, status);
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        log::warn!("{} {} failed with {}: {}", method, path, status, message);
        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T, RemoteError> {
        let response = self.send(request).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub(crate) async fn fetch_first<T: DeserializeOwned>(&self, request: Request) -> Result<T, RemoteError> {
        let rows: Vec<T> = self.fetch(request).await?;
        rows.into_iter().next().ok_or(RemoteError::EmptyResponse)
    }

    pub(crate) async fn execute(&self, request: Request) -> Result<(), RemoteError> {
        self.send(request).await.map(|_| ())
    }

    pub(crate) async fn fetch_session(&self, request: Request) -> Result<Session, RemoteError> {
        let token: TokenResponse = self.fetch(request).await?;
        Ok(token.into_session(Utc::now().timestamp()))
    }

    pub(crate) async fn fetch_has_role(&self, request: Request, role: Role) -> Result<bool, RemoteError> {
        let rows: Vec<RoleRow> = self.fetch(request).await?;
        Ok(rows.iter().any(|row| row.role == role.as_str()))
    }
}
