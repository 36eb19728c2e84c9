//! # CLI Module
//!
//! Command-line layer for spotstats. Each command wires user input to the
//! authorization engine, the Web API client and the aggregation, and turns
//! their results into colored status lines and tables.
//!
//! ## Command Categories
//!
//! ### Setup
//!
//! - [`client_set`] - Stores the Spotify client id, durably or for the session
//! - [`client_show`] - Prints the client id and the redirect URI to register
//! - [`client_clear`] - Forgets the client id
//!
//! ### Authentication
//!
//! - [`login`] - Runs the PKCE login through the system browser
//! - [`logout`] - Drops the token set, keeping the client id
//! - [`status`] - Shows the session state and token expiry
//!
//! ### Statistics
//!
//! - [`profile`] - Shows the signed-in user's profile
//! - [`top`] - Lists top artists or tracks for a time range
//! - [`recent`] - Ranks the last 50 plays by play count and listening time
//! - [`history`] - Ranks an exported streaming history by listening time
//!
//! ## Error Handling
//!
//! Missing setup or a missing session ends the command with a hint on how to
//! fix it. A failed refresh keeps the old session and lets the API call decide.
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotstats client set <CLIENT_ID>   # once
//! spotstats login                    # opens the browser
//! spotstats top --kind tracks --time-range long_term
//! spotstats recent
//! spotstats history StreamingHistory0.json StreamingHistory1.json
//! ```

mod auth;
mod client;
mod history;
mod stats;

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{error, spotify::auth::Authenticator};

pub use auth::login;
pub use auth::logout;
pub use auth::status;
pub use client::client_clear;
pub use client::client_set;
pub use client::client_show;
pub use history::history;
pub use stats::profile;
pub use stats::recent;
pub use stats::top;

fn authenticator() -> Arc<Authenticator> {
    match Authenticator::from_env() {
        Ok(auth) => Arc::new(auth),
        Err(e) => error!("Cannot initialize authentication. Err: {}", e),
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
