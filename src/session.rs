//! File-backed session store: the client-local record of who is logged in.
//! One JSON document holds token, user id and username so the three fields
//! are always persisted and removed together, never partially.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::tprintln;

/// The persisted session triple. Also the wire shape of a successful
/// login response (`{token, user_id, username}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub username: String,
}

/// Explicit, injectable session store. There is no global session state;
/// callers hand the store to whatever needs it.
///
/// Two states exist: `load()` returning `Some` (authenticated) or `None`
/// (unauthenticated). The only way in is `save()` after a successful login;
/// the only ways out are `clear()` on logout or on a 401 from an
/// authenticated call.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Read the persisted session. Missing, unreadable or malformed files
    /// all read as unauthenticated.
    pub fn load(&self) -> Option<Session> {
        let bytes = fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn is_authenticated(&self) -> bool { self.load().is_some() }

    /// Persist a session. Written to a sibling temp file and renamed into
    /// place so a crash can never leave a partial triple behind.
    pub fn save(&self, session: &Session) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| ApiError::storage(format!("cannot create session directory {}: {}", parent.display(), e)))?;
            }
        }
        let body = serde_json::to_vec_pretty(session)
            .map_err(|e| ApiError::storage(format!("cannot encode session: {}", e)))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &body)
            .map_err(|e| ApiError::storage(format!("cannot write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| ApiError::storage(format!("cannot move session into place at {}: {}", self.path.display(), e)))?;
        tprintln!("session.save user={} path={}", session.username, self.path.display());
        Ok(())
    }

    /// Remove the persisted session. Idempotent: clearing an absent
    /// session succeeds.
    pub fn clear(&self) -> ApiResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tprintln!("session.clear path={}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::storage(format!("cannot remove {}: {}", self.path.display(), e))),
        }
    }

    /// Gate for authenticated operations: returns the session or the error
    /// the console maps to its log-in prompt. No network traffic happens
    /// on the error path.
    pub fn require(&self) -> ApiResult<Session> {
        self.load()
            .ok_or_else(|| ApiError::auth_expired("Not authenticated. Please log in."))
    }
}
