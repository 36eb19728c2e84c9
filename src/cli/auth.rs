use std::sync::Arc;

use chrono::{DateTime, Local, Utc};

use super::authenticator;
use crate::{
    config, error,
    error::AuthError,
    info,
    server::start_api_server,
    spotify::auth::BrowserNavigator,
    success,
    types::AuthState,
    warning,
};

/// Runs the PKCE login.
///
/// Starts the local redirect server, sends the browser to Spotify and waits
/// until the redirect has been handled or the login timeout passes.
pub async fn login() {
    let auth = authenticator();

    let server_auth = Arc::clone(&auth);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_auth).await {
            warning!("Redirect server stopped. Err: {}", e);
        }
    });

    match auth.start_login(&BrowserNavigator) {
        Ok(_) => info!("Waiting for Spotify to redirect back..."),
        Err(AuthError::MissingConfig) => error!(
            "No client ID configured. Run `spotstats client set <CLIENT_ID>` and register {} as redirect URI.",
            auth.redirect_uri()
        ),
        Err(e) => error!("Cannot start login. Err: {}", e),
    }

    match tokio::time::timeout(config::login_timeout(), auth.wait_for_login()).await {
        Ok(AuthState::Authenticated) => success!("Logged in."),
        Ok(state) => error!("Login did not complete (state: {}).", state),
        Err(_) => error!("Authentication failed or timed out."),
    }
}

/// Signs out. The client id stays configured.
pub async fn logout() {
    let auth = authenticator();
    if let Err(e) = auth.sign_out() {
        error!("Failed to sign out. Err: {}", e);
    }
    success!("Signed out. Run `spotstats login` to sign in again.");
}

pub async fn status() {
    let auth = authenticator();

    match auth.clients().get() {
        Ok(Some(id)) => info!("Client ID: {}", id),
        Ok(None) => warning!("No client ID configured."),
        Err(e) => warning!("Cannot read client id. Err: {}", e),
    }
    info!("Redirect URI: {}", auth.redirect_uri());

    let tokens = match auth.current_tokens() {
        Ok(Some(tokens)) => tokens,
        Ok(None) => {
            info!("Session: {}", AuthState::Unauthenticated);
            return;
        }
        Err(e) => error!("Cannot read session. Err: {}", e),
    };

    info!("Session: {}", auth.state());
    match DateTime::<Utc>::from_timestamp_millis(tokens.expires_at) {
        Some(at) => info!(
            "Access token refreshes after: {}",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        ),
        None => warning!("Access token has no known expiry and will be refreshed on next use."),
    }
    info!("Scopes: {}", tokens.scope);
    if tokens.refresh_token.is_none() {
        warning!("No refresh token stored; you will need to log in again once it expires.");
    }
}
