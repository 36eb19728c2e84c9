use super::authenticator;
use crate::{error, info, success, warning};

/// Saves the client id. `session_only` keeps it out of the durable store.
pub async fn client_set(client_id: String, session_only: bool) {
    let auth = authenticator();
    match auth.clients().set(&client_id, !session_only) {
        Ok(true) if session_only => success!("Client ID saved for this session."),
        Ok(true) => success!("Client ID saved. Run `spotstats login` next."),
        Ok(false) => warning!("Client ID must not be empty."),
        Err(e) => error!("Failed to save client id. Err: {}", e),
    }
}

pub async fn client_show() {
    let auth = authenticator();
    match auth.clients().get() {
        Ok(Some(id)) => info!("Client ID: {}", id),
        Ok(None) => warning!("No client ID configured. Run `spotstats client set <CLIENT_ID>`."),
        Err(e) => error!("Failed to read client id. Err: {}", e),
    }
    info!(
        "Redirect URI to register with Spotify: {}",
        auth.redirect_uri()
    );
}

pub async fn client_clear() {
    let auth = authenticator();
    if let Err(e) = auth.clients().clear() {
        error!("Failed to clear client id. Err: {}", e);
    }
    success!("Client ID removed.");
}
