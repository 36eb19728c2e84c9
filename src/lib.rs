//! Spotify Listening Statistics Library
//!
//! This library signs a user in to the Spotify Web API with the OAuth 2.0
//! Authorization Code flow with PKCE, keeps the resulting token set fresh, and
//! folds the user's listening history into per-track and per-artist rankings.
//!
//! # Modules
//!
//! - `aggregate` - Play-count and duration rollups for tracks and artists
//! - `api` - HTTP endpoints for the local redirect target
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by the auth flow and API calls
//! - `management` - Key-value storage, client id and token persistence
//! - `server` - Local HTTP server receiving the OAuth redirect
//! - `spotify` - Authorization flow, token lifecycle and Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE helpers and formatting
//!
//! # Example
//!
//! ```
//! use spotstats::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> spotstats::Res<()> {
//!     config::load_env().await?;
//!     cli::status().await;
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the command-line glue where any error ends up printed to the user.
/// The authorization flow itself returns [`error::AuthError`].
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Waiting for the browser redirect...");
/// info!("Found {} plays", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the command-line layer uses this macro. Library code returns
/// [`error::AuthError`] instead.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for degraded but recoverable situations, such as a failed token
/// refresh that leaves the stale token set in place.
///
/// # Example
///
/// ```
/// warning!("Refresh failed: {}", status);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
