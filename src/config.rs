//! Environment-driven configuration with sensible defaults.
//! Flags on the console override these; nothing here reads config files.

use std::path::PathBuf;

/// Default backend base URL (the development server).
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Backend base URL: `BOLBHIDU_API_URL` or the development default.
pub fn api_url() -> String {
    std::env::var("BOLBHIDU_API_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Session file location: `BOLBHIDU_SESSION_FILE`, else
/// `~/.bolbhidu/session.json`, else `.bolbhidu/session.json` under the
/// current directory when no home is known.
pub fn session_file() -> PathBuf {
    if let Ok(p) = std::env::var("BOLBHIDU_SESSION_FILE") {
        if !p.trim().is_empty() {
            return PathBuf::from(p);
        }
    }
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from);
    match home {
        Some(h) => h.join(".bolbhidu").join("session.json"),
        None => PathBuf::from(".bolbhidu").join("session.json"),
    }
}
