use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Token set as persisted under the token storage key.
///
/// Field names follow the provider's token response so the stored blob stays
/// readable. `expires_at` is derived locally, never sent by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub expires_in: u64,
    /// Absolute expiry in epoch milliseconds, already shortened by the skew.
    /// Blobs written without it deserialize to 0, which forces a refresh.
    #[serde(default)]
    pub expires_at: i64,
}

/// Raw token endpoint response for both grant types.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// The one pending PKCE verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceSession {
    pub verifier: String,
}

/// Named states of the authorization lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    AwaitingCallback,
    Exchanging,
    Authenticated,
    Refreshing,
}

impl std::fmt::Display for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AuthState::Unauthenticated => "unauthenticated",
            AuthState::AwaitingCallback => "awaiting callback",
            AuthState::Exchanging => "exchanging code",
            AuthState::Authenticated => "authenticated",
            AuthState::Refreshing => "refreshing",
        };
        f.write_str(s)
    }
}

/// Outcome of parsing the URL the provider redirected back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackParams {
    Code { code: String, state: Option<String> },
    Error(String),
    None,
}

/// What `handle_callback` did with the current URL.
#[derive(Debug, Clone)]
pub enum CallbackOutcome {
    /// A code was exchanged; `clean_url` is the URL with `code` and `state` removed.
    Authenticated { tokens: TokenSet, clean_url: String },
    /// No callback parameters; any existing session went through a silent refresh.
    Idle { tokens: Option<TokenSet> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TopKind {
    Artists,
    Tracks,
}

impl TopKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopKind::Artists => "artists",
            TopKind::Tracks => "tracks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimeRange {
    #[default]
    #[value(name = "short_term")]
    ShortTerm,
    #[value(name = "medium_term")]
    MediumTerm,
    #[value(name = "long_term")]
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub followers: Option<Followers>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Followers {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistory {
    #[serde(default)]
    pub track: Option<Track>,
    #[serde(default)]
    pub played_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentlyPlayedResponse {
    #[serde(default)]
    pub items: Vec<PlayHistory>,
}

/// One entry of an exported streaming history file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingHistoryEntry {
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub ms_played: Option<u64>,
}

/// A single play fed into the aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRecord {
    pub track_id: Option<String>,
    pub track_name: String,
    pub artists: Vec<ArtistRef>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackStat {
    pub key: String,
    pub name: String,
    pub artists: String,
    pub plays: u64,
    pub ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistStat {
    pub key: String,
    pub name: String,
    pub plays: u64,
    pub ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rollup {
    pub tracks: Vec<TrackStat>,
    pub artists: Vec<ArtistStat>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub rank: usize,
    pub name: String,
    pub artists: String,
    pub plays: u64,
    pub hours: String,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub rank: usize,
    pub name: String,
    pub plays: u64,
    pub hours: String,
}

#[derive(Tabled)]
pub struct TopTableRow {
    pub rank: usize,
    pub name: String,
    pub detail: String,
}
