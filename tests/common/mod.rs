//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use serde_json::{Value, json};
use spotstats::{
    management::{ClientConfigStore, KeyValueStore, MemoryStore, TokenManager},
    spotify::auth::{Authenticator, Navigator, OAuthSettings},
    types::TokenSet,
    utils,
};
use wiremock::MockServer;

pub const REDIRECT_URI: &str = "http://127.0.0.1:8888/";
pub const CLIENT_ID: &str = "test-client-id";
/// RFC 7636 appendix B verifier; only `-` and `_` besides alphanumerics.
pub const VERIFIER: &str = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
pub const CHALLENGE: &str = "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM";

pub struct Harness {
    pub server: MockServer,
    pub auth: Arc<Authenticator>,
    pub durable: Arc<MemoryStore>,
    pub session: Arc<MemoryStore>,
}

impl Harness {
    pub fn tokens(&self) -> TokenManager {
        TokenManager::new(self.durable.clone())
    }

    pub fn with_client_id(self) -> Self {
        self.auth.clients().set(CLIENT_ID, true).unwrap();
        self
    }

    pub fn store_tokens(&self, tokens: &TokenSet) {
        self.tokens().persist(tokens).unwrap();
    }

    pub fn stored_tokens(&self) -> Option<TokenSet> {
        self.tokens().load().unwrap()
    }

    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.server.uri())
    }
}

pub async fn harness() -> Harness {
    harness_with_redirect(REDIRECT_URI).await
}

pub async fn harness_with_redirect(redirect_uri: &str) -> Harness {
    let server = MockServer::start().await;
    let durable = Arc::new(MemoryStore::new());
    let session = Arc::new(MemoryStore::new());

    let settings = OAuthSettings {
        authorize_url: format!("{}/authorize", server.uri()),
        token_url: format!("{}/api/token", server.uri()),
        redirect_uri: redirect_uri.to_string(),
        scopes: vec![
            "user-top-read".to_string(),
            "user-read-recently-played".to_string(),
        ],
        timeout: Duration::from_secs(5),
    };
    let clients = ClientConfigStore::new(
        durable.clone() as Arc<dyn KeyValueStore>,
        session.clone() as Arc<dyn KeyValueStore>,
    );
    let tokens = TokenManager::new(durable.clone());
    let auth = Arc::new(Authenticator::new(settings, clients, tokens).unwrap());

    Harness {
        server,
        auth,
        durable,
        session,
    }
}

pub fn token_set(access: &str, refresh: Option<&str>, expires_at: i64) -> TokenSet {
    TokenSet {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        token_type: "Bearer".to_string(),
        scope: "user-top-read".to_string(),
        expires_in: 3600,
        expires_at,
    }
}

pub fn fresh(access: &str, refresh: Option<&str>) -> TokenSet {
    token_set(access, refresh, utils::now_ms() + 3_600_000)
}

pub fn expired(access: &str, refresh: Option<&str>) -> TokenSet {
    token_set(access, refresh, utils::now_ms() - 1_000)
}

pub fn token_response(access: &str, refresh: Option<&str>) -> Value {
    let mut body = json!({
        "access_token": access,
        "token_type": "Bearer",
        "scope": "user-top-read user-read-recently-played",
        "expires_in": 3600,
    });
    if let Some(refresh) = refresh {
        body["refresh_token"] = json!(refresh);
    }
    body
}

/// Records every URL instead of opening a browser.
#[derive(Default)]
pub struct RecordingNavigator {
    pub visited: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) -> std::io::Result<()> {
        self.visited.lock().unwrap().push(url.to_string());
        Ok(())
    }
}
