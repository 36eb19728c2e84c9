//! Configuration management for the Spotify listening statistics client.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Every value has a default that works against the
//! public Spotify endpoints, so a fresh install only needs a client id, which is
//! user input kept by [`crate::management::ClientConfigStore`] rather than an
//! environment value.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, time::Duration};

use reqwest::Url;

const DEFAULT_APP_URL: &str = "http://127.0.0.1:8888/";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SCOPE: &str =
    "user-read-email user-top-read user-read-recently-played playlist-read-private";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 120;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives under `spotstats/.env` in the platform-specific local data
/// directory:
/// - Linux: `~/.local/share/spotstats/.env`
/// - macOS: `~/Library/Application Support/spotstats/.env`
/// - Windows: `%LOCALAPPDATA%/spotstats/.env`
///
/// A missing file is fine; every key has a default. Variables already present
/// in the process environment are not overwritten.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Root of everything the application writes durably.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotstats");
    path
}

/// Directory backing the durable key-value tier.
pub fn durable_store_dir() -> PathBuf {
    data_dir().join("store")
}

/// Directory backing the session-only key-value tier.
///
/// Lives in the temp dir so it disappears whenever the OS clears it, the
/// command-line counterpart of a browser's session storage.
pub fn session_store_dir() -> PathBuf {
    env::temp_dir().join("spotstats-session")
}

/// URL of the app page the browser returns to.
///
/// The redirect URI is derived from this value, see
/// [`crate::spotify::redirect::redirect_uri_for`].
pub fn app_url() -> String {
    env::var("SPOTSTATS_APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string())
}

/// Address the local redirect server binds to.
///
/// Uses `SERVER_ADDRESS` when set, otherwise the host and port of
/// [`app_url`].
pub fn server_addr() -> String {
    if let Ok(addr) = env::var("SERVER_ADDRESS") {
        return addr;
    }

    Url::parse(&app_url())
        .ok()
        .and_then(|url| {
            let host = url.host_str()?.to_string();
            let port = url.port_or_known_default()?;
            Some(format!("{host}:{port}"))
        })
        .unwrap_or_else(|| "127.0.0.1:8888".to_string())
}

/// Spotify's authorization endpoint, e.g. `https://accounts.spotify.com/authorize`.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string())
}

/// Spotify's token endpoint, e.g. `https://accounts.spotify.com/api/token`.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string())
}

/// Base URL of the Web API, e.g. `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Requested scopes, read from the space separated `SPOTIFY_API_AUTH_SCOPE`.
pub fn spotify_scopes() -> Vec<String> {
    env::var("SPOTIFY_API_AUTH_SCOPE")
        .unwrap_or_else(|_| DEFAULT_SCOPE.to_string())
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Timeout applied to every outbound HTTP request.
pub fn http_timeout() -> Duration {
    Duration::from_secs(env_u64("SPOTSTATS_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS))
}

/// How long `spotstats login` waits for the browser to come back.
pub fn login_timeout() -> Duration {
    Duration::from_secs(env_u64(
        "SPOTSTATS_LOGIN_TIMEOUT_SECS",
        DEFAULT_LOGIN_TIMEOUT_SECS,
    ))
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
