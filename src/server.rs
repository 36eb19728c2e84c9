use axum::{Extension, Router, routing::get};
use std::sync::Arc;

use crate::{Res, api, config, spotify::auth::Authenticator};

/// Routes for the loopback server.
///
/// The callback lives at the path of the redirect URI, which is `/` by
/// default but follows the app URL's directory (e.g. `/stats/`). Every path
/// other than `/health` is handed to the callback, which answers 404 for
/// anything but that path.
pub fn router(auth: Arc<Authenticator>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .fallback(api::callback)
        .layer(Extension(auth))
}

/// Serves the redirect target until the process exits.
///
/// The address comes from [`config::server_addr`] and may be a host name such
/// as `localhost:8888`.
pub async fn start_api_server(auth: Arc<Authenticator>) -> Res<()> {
    let addr = config::server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;
    axum::serve(listener, router(auth)).await?;
    Ok(())
}
