//! Wire data model for the bolbhidu backend.
//! Field names match the backend's JSON exactly; ids, authorship and
//! timestamps are server-assigned and never written by the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published news post as returned by `/api/admin/posts/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: i64,
    pub headline: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub author: Option<i64>,
    #[serde(default)]
    pub author_username: Option<String>,
    pub published_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl Post {
    /// Split the comma-separated tag string into trimmed, non-empty tags.
    pub fn tag_list(&self) -> Vec<&str> {
        match &self.tags {
            Some(t) => t.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()).collect(),
            None => Vec::new(),
        }
    }
}

/// Body for creating or updating a post. Only the writable fields exist;
/// the backend infers the author from the session token.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PostDraft {
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl PostDraft {
    pub fn new<S: Into<String>>(headline: S) -> Self {
        Self { headline: headline.into(), content: None, tags: None }
    }
}

/// A message-board entry as returned by `/api/messages/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: i64,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}
