use std::sync::Arc;

use axum::{
    Extension,
    extract::OriginalUri,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use reqwest::Url;

use crate::{spotify::auth::Authenticator, success, types::CallbackOutcome, warning};

/// Landing page for the OAuth redirect.
///
/// After a code was exchanged the browser is sent on to the same URL without
/// `code` and `state`, so a reload cannot replay the used code.
pub async fn callback(
    OriginalUri(uri): OriginalUri,
    Extension(auth): Extension<Arc<Authenticator>>,
) -> Response {
    let Some(current_url) = current_url(auth.redirect_uri(), &uri) else {
        return (StatusCode::NOT_FOUND, Html("<h4>Not found.</h4>")).into_response();
    };

    match auth.handle_callback(&current_url).await {
        Ok(CallbackOutcome::Authenticated { clean_url, .. }) => {
            success!("Authentication successful!");
            Redirect::to(&clean_url).into_response()
        }
        Ok(CallbackOutcome::Idle { tokens: Some(_) }) => {
            Html("<h2>Authenticated.</h2><p>You can close this window.</p>").into_response()
        }
        Ok(CallbackOutcome::Idle { tokens: None }) => {
            Html("<h4>Not signed in.</h4><p>Run <code>spotstats login</code>.</p>").into_response()
        }
        Err(e) => {
            warning!("Login failed: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Html(format!("<h4>Login failed.</h4><p>{}</p>", escape_html(&e.to_string()))),
            )
                .into_response()
        }
    }
}

/// Rebuilds the absolute URL the browser requested, based on the redirect
/// URI's origin. `None` unless the request path is the redirect URI's path.
fn current_url(redirect_uri: &str, uri: &Uri) -> Option<String> {
    let base = Url::parse(redirect_uri).ok()?;
    if uri.path() != base.path() {
        return None;
    }
    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
    base.join(path).ok().map(|url| url.to_string())
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
