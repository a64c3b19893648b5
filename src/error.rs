//! Unified client error model and mapping helpers.
//! This module provides a common error enum used across the resource client,
//! the session store and the console, along with the HTTP status classifier.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApiError {
    /// The call never reached the server (DNS, connect, TLS, timeout).
    Network { message: String },
    /// 401 on a call that carried a session token. The caller must clear the
    /// session and send the user back to login.
    AuthExpired { message: String },
    /// A client-side precondition failed; no request was issued.
    Validation { message: String },
    /// Any other non-success status, carrying the server's `detail` text
    /// when the body had one.
    RequestFailed { status: u16, message: String },
    /// The session file could not be written or removed.
    Storage { message: String },
}

impl ApiError {
    pub fn kind_str(&self) -> &'static str {
        match self {
            ApiError::Network { .. } => "network",
            ApiError::AuthExpired { .. } => "auth_expired",
            ApiError::Validation { .. } => "validation",
            ApiError::RequestFailed { .. } => "request_failed",
            ApiError::Storage { .. } => "storage",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Network { message }
            | ApiError::AuthExpired { message }
            | ApiError::Validation { message }
            | ApiError::RequestFailed { message, .. }
            | ApiError::Storage { message } => message.as_str(),
        }
    }

    pub fn network<S: Into<String>>(msg: S) -> Self { ApiError::Network { message: msg.into() } }
    pub fn auth_expired<S: Into<String>>(msg: S) -> Self { ApiError::AuthExpired { message: msg.into() } }
    pub fn validation<S: Into<String>>(msg: S) -> Self { ApiError::Validation { message: msg.into() } }
    pub fn request_failed<S: Into<String>>(status: u16, msg: S) -> Self { ApiError::RequestFailed { status, message: msg.into() } }
    pub fn storage<S: Into<String>>(msg: S) -> Self { ApiError::Storage { message: msg.into() } }

    pub fn is_auth_expired(&self) -> bool { matches!(self, ApiError::AuthExpired { .. }) }

    /// Classify a non-success HTTP status. `detail` is the server-supplied
    /// message when the body carried one; `authed` says whether the request
    /// was sent with a session token. Only 401-while-authenticated gets
    /// special treatment; everything else falls through to `RequestFailed`.
    /// The expiry message is fixed — the user is sent back to login either
    /// way, so the server's wording is not surfaced.
    pub fn from_status(status: u16, detail: Option<String>, authed: bool) -> Self {
        if status == 401 && authed {
            return ApiError::auth_expired("Authentication expired. Please log in again.");
        }
        let message = detail.unwrap_or_else(|| format!("request failed with status {}", status));
        ApiError::RequestFailed { status, message }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind_str(), self.message())
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // Transport-level failures only; status classification happens in
        // the client once a response exists.
        ApiError::Network { message: err.to_string() }
    }
}
