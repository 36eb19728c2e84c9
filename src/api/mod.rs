//! # API Module
//!
//! HTTP endpoints served by the local redirect server while a login is in
//! progress.
//!
//! ## Endpoints
//!
//! - [`callback`] - the redirect URI registered with Spotify (`/` by default). Exchanges
//!   the authorization code, then redirects to the same URL without `code` and
//!   `state`. Without callback parameters it performs a silent refresh and shows
//!   whether a session exists.
//! - [`health`] - `GET /health`, returns status, version and the current
//!   authentication state.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use spotstats::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/health", get(health))
//!     .fallback(callback)
//!     .layer(Extension(authenticator));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
