//! HTTP resource client for the bolbhidu backend.
//! Every operation funnels through one shared request/classify path:
//! build the request, attach the session token when one is supplied,
//! perform the single (non-retried) call and map the outcome onto the
//! typed error model. Callers own all session state; nothing here reads
//! or writes the session store.

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::models::{Message, Post, PostDraft};
use crate::session::Session;

const LOGIN_PATH: &str = "/api/auth/login/";
const POSTS_PATH: &str = "/api/admin/posts/";
const MESSAGES_PATH: &str = "/api/messages/";

#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base: &str) -> ApiResult<Self> {
        let base = Url::parse(base)
            .map_err(|e| ApiError::validation(format!("invalid base URL '{}': {}", base, e)))?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::network(e.to_string()))?;
        Ok(Self { base, client })
    }

    pub fn base(&self) -> &Url { &self.base }

    // -- shared request path --------------------------------------------

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> ApiResult<reqwest::Response> {
        let url = self
            .base
            .join(path)
            .map_err(|e| ApiError::validation(format!("invalid request path '{}': {}", path, e)))?;
        let mut req = self.client.request(method.clone(), url);
        if let Some(b) = body {
            req = req.json(b);
        }
        if let Some(t) = token {
            req = req.header(AUTHORIZATION, format!("Token {}", t));
        }
        debug!(%method, path, authed = token.is_some(), "issuing request");
        // sole suspension point; transport failures never reach classify
        let resp = req.send().await?;
        Ok(resp)
    }

    /// Drive one request through the shared path and decode the payload.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> ApiResult<T> {
        let authed = token.is_some();
        let resp = self.send(method, path, body, token).await?;
        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<T>()
                .await
                .map_err(|e| ApiError::request_failed(status.as_u16(), format!("invalid response body: {}", e)));
        }
        Err(classify_failure(status, resp.text().await.ok(), authed))
    }

    // -- operations -----------------------------------------------------

    /// POST /api/auth/login/. On success returns the session triple; the
    /// caller decides whether to persist it.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<Session> {
        if username.trim().is_empty() {
            return Err(ApiError::validation("Username cannot be empty."));
        }
        if password.is_empty() {
            return Err(ApiError::validation("Password cannot be empty."));
        }
        let body = serde_json::json!({ "username": username, "password": password });
        self.request(Method::POST, LOGIN_PATH, Some(&body), None).await
    }

    /// GET /api/admin/posts/. The listing is publicly readable; when a
    /// session is supplied its token is attached so a stale token surfaces
    /// as `AuthExpired` rather than being silently ignored.
    pub async fn list_posts(&self, session: Option<&Session>) -> ApiResult<Vec<Post>> {
        self.request(Method::GET, POSTS_PATH, None, session.map(|s| s.token.as_str()))
            .await
    }

    /// POST /api/admin/posts/. The backend assigns id, author and
    /// timestamps; callers should re-list rather than splice the returned
    /// post into an existing view.
    pub async fn create_post(&self, session: &Session, draft: &PostDraft) -> ApiResult<Post> {
        validate_draft(draft)?;
        let body = draft_body(draft)?;
        self.request(Method::POST, POSTS_PATH, Some(&body), Some(&session.token)).await
    }

    /// GET /api/admin/posts/{id}/ — publicly readable, 404 when absent.
    pub async fn fetch_post(&self, id: i64) -> ApiResult<Post> {
        self.request(Method::GET, &format!("{}{}/", POSTS_PATH, id), None, None).await
    }

    /// PUT /api/admin/posts/{id}/.
    pub async fn update_post(&self, session: &Session, id: i64, draft: &PostDraft) -> ApiResult<Post> {
        validate_draft(draft)?;
        let body = draft_body(draft)?;
        self.request(Method::PUT, &format!("{}{}/", POSTS_PATH, id), Some(&body), Some(&session.token))
            .await
    }

    /// DELETE /api/admin/posts/{id}/ — 204 with an empty body on success.
    pub async fn delete_post(&self, session: &Session, id: i64) -> ApiResult<()> {
        let resp = self
            .send(Method::DELETE, &format!("{}{}/", POSTS_PATH, id), None, Some(&session.token))
            .await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(classify_failure(status, resp.text().await.ok(), true))
    }

    /// GET /api/messages/. Server order is not trusted; entries come back
    /// newest first.
    pub async fn list_messages(&self) -> ApiResult<Vec<Message>> {
        let mut messages: Vec<Message> =
            self.request(Method::GET, MESSAGES_PATH, None, None).await?;
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(messages)
    }

    /// POST /api/messages/.
    pub async fn create_message(&self, content: &str) -> ApiResult<Message> {
        if content.trim().is_empty() {
            return Err(ApiError::validation("Message cannot be empty."));
        }
        let body = serde_json::json!({ "content": content });
        self.request(Method::POST, MESSAGES_PATH, Some(&body), None).await
    }
}

fn validate_draft(draft: &PostDraft) -> ApiResult<()> {
    if draft.headline.trim().is_empty() {
        return Err(ApiError::validation("Headline cannot be empty."));
    }
    Ok(())
}

fn draft_body(draft: &PostDraft) -> ApiResult<Value> {
    serde_json::to_value(draft).map_err(|e| ApiError::validation(format!("cannot encode post body: {}", e)))
}

fn classify_failure(status: StatusCode, body: Option<String>, authed: bool) -> ApiError {
    let detail = body.as_deref().and_then(detail_field);
    let err = ApiError::from_status(status.as_u16(), detail, authed);
    debug!(status = status.as_u16(), kind = err.kind_str(), "request failed");
    err
}

/// Pull the `detail` field out of a DRF error body, tolerating non-JSON
/// and differently-shaped bodies.
fn detail_field(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    v.get("detail").and_then(|d| d.as_str()).map(|s| s.to_string())
}
