//! Authorization URL construction and redirect handling.
//!
//! The redirect URI must be byte-for-byte identical in the authorization
//! request, the token exchange and the provider's app registration. It is the
//! directory URL of the app page (trailing slash, no file name), so the same
//! registration keeps working when the page is renamed.

use reqwest::Url;

use crate::{
    error::{AuthError, AuthResult},
    types::CallbackParams,
};

/// Query parameters stripped from the URL after a successful exchange.
const CALLBACK_PARAMS: [&str; 2] = ["code", "state"];

fn parse_url(url: &str) -> AuthResult<Url> {
    Url::parse(url).map_err(|e| AuthError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Directory URL of `page_url` with a trailing slash.
///
/// `https://me.github.io/stats/index.html?x=1` becomes
/// `https://me.github.io/stats/`.
pub fn redirect_uri_for(page_url: &str) -> AuthResult<String> {
    let page = parse_url(page_url)?;
    let dir = page.join("./").map_err(|e| AuthError::InvalidUrl {
        url: page_url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(dir.to_string())
}

/// Builds the provider authorization URL for the S256 PKCE flow.
pub fn build_authorization_url(
    authorize_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scopes: &[String],
    challenge: &str,
) -> AuthResult<String> {
    let mut url = parse_url(authorize_url)?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", &scopes.join(" "))
        .append_pair("code_challenge_method", "S256")
        .append_pair("code_challenge", challenge);
    Ok(url.to_string())
}

/// Extracts the authorization code or error from the current URL.
///
/// An `error` parameter wins over a `code`, since the provider never sends a
/// usable code alongside an error.
pub fn parse_callback(current_url: &str) -> AuthResult<CallbackParams> {
    let url = parse_url(current_url)?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    Ok(match (error, code) {
        (Some(error), _) => CallbackParams::Error(error),
        (None, Some(code)) if !code.is_empty() => CallbackParams::Code { code, state },
        _ => CallbackParams::None,
    })
}

/// Returns `current_url` without the `code` and `state` query parameters.
///
/// Everything else, including other query parameters and the fragment, is
/// left as is.
pub fn strip_callback_params(current_url: &str) -> AuthResult<String> {
    let mut url = parse_url(current_url)?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !CALLBACK_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    Ok(url.to_string())
}
