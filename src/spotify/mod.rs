//! # Spotify Integration Module
//!
//! This module signs the user in to the Spotify Web API and reads their listening
//! statistics. It is the integration layer between the command-line surface and
//! Spotify's accounts and Web API services.
//!
//! ## Architecture
//!
//! ```text
//! CLI / local redirect server
//!          ↓
//! Spotify Integration Layer
//!     ├── Redirect (authorization URL, callback parsing, URL cleanup)
//!     ├── Authentication (PKCE exchange, proactive refresh, sign-out)
//!     └── Stats (profile, top items, recently played)
//!          ↓
//! Storage (client id, pending verifier, token set)
//! ```
//!
//! ## Core Modules
//!
//! ### Redirect Module
//!
//! [`redirect`] - Pure URL handling:
//! - **Redirect URI**: directory URL of the app page, trailing slash included
//! - **Authorization URL**: `response_type=code` with an S256 challenge
//! - **Callback Parsing**: extracts `code` or `error` from the landing URL
//! - **URL Cleanup**: drops `code` and `state` once the code is used
//!
//! ### Authentication Module
//!
//! [`auth`] - The token lifecycle state machine:
//! - **Login**: stores a one-time verifier and opens the authorization page
//! - **Exchange**: trades code + verifier for tokens, then forgets the verifier
//! - **Proactive Refresh**: renews the access token 60 seconds before expiry
//! - **Single-Flight**: concurrent refreshes collapse into one request
//! - **Request Helper**: builds the `Authorization: Bearer` header
//!
//! ### Stats Module
//!
//! [`stats`] - Authenticated Web API reads:
//! - `GET /me` - profile
//! - `GET /me/top/{artists,tracks}` - top items per time range
//! - `GET /me/player/recently-played` - last 50 plays
//!
//! ## Error Handling
//!
//! All functions return [`crate::error::AuthResult`]. A failed refresh is not an
//! error: the stale token set stays in place and the next API call reports
//! `NotAuthenticated` once the provider rejects it.
//!
//! ## Concurrency
//!
//! Operations are async and cooperative. Storage is re-read after every await,
//! so nothing depends on in-memory copies of the token set.

pub mod auth;
pub mod redirect;
pub mod stats;
