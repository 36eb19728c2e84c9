use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use tokio::sync::watch;

use crate::{
    config,
    error::{AuthError, AuthResult},
    management::{ClientConfigStore, FileStore, KeyValueStore, TokenManager},
    spotify::redirect,
    types::{AuthState, CallbackOutcome, CallbackParams, PkceSession, TokenResponse, TokenSet},
    utils, warning,
};

/// Tokens are considered expired this long before the provider says so, so a
/// request started just before expiry does not race it.
pub const EXPIRY_SKEW_MS: i64 = 60_000;

/// Endpoints and redirect settings for one provider registration.
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub authorize_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub timeout: Duration,
}

impl OAuthSettings {
    pub fn from_env() -> AuthResult<Self> {
        Ok(Self {
            authorize_url: config::spotify_apiauth_url(),
            token_url: config::spotify_apitoken_url(),
            redirect_uri: redirect::redirect_uri_for(&config::app_url())?,
            scopes: config::spotify_scopes(),
            timeout: config::http_timeout(),
        })
    }
}

/// Sends the user agent to the authorization page.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str) -> std::io::Result<()>;
}

/// Opens URLs in the system browser.
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) -> std::io::Result<()> {
        webbrowser::open(url)
    }
}

/// Builds a token set from a fresh token response.
pub fn token_set_from(response: TokenResponse, now_ms: i64) -> TokenSet {
    TokenSet {
        expires_at: expires_at(now_ms, response.expires_in),
        access_token: response.access_token,
        refresh_token: response.refresh_token,
        token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
        scope: response.scope.unwrap_or_default(),
        expires_in: response.expires_in,
    }
}

/// Applies a refresh response on top of the stored token set.
///
/// The access token, expiry and token type always come from the response. A
/// rotated refresh token replaces the old one; when the provider omits it the
/// old one is kept. Scope is only replaced when the response carries one.
pub fn merge_refresh(old: &TokenSet, response: TokenResponse, now_ms: i64) -> TokenSet {
    TokenSet {
        expires_at: expires_at(now_ms, response.expires_in),
        access_token: response.access_token,
        refresh_token: response.refresh_token.or_else(|| old.refresh_token.clone()),
        token_type: response
            .token_type
            .unwrap_or_else(|| old.token_type.clone()),
        scope: response.scope.unwrap_or_else(|| old.scope.clone()),
        expires_in: response.expires_in,
    }
}

fn expires_at(now_ms: i64, expires_in_secs: u64) -> i64 {
    let lifetime_ms = i64::try_from(expires_in_secs)
        .unwrap_or(i64::MAX)
        .saturating_mul(1000);
    now_ms
        .saturating_add(lifetime_ms)
        .saturating_sub(EXPIRY_SKEW_MS)
}

pub fn needs_refresh(tokens: &TokenSet, now_ms: i64) -> bool {
    now_ms >= tokens.expires_at
}

/// The PKCE login and token lifecycle.
///
/// ```text
/// Unauthenticated -> AwaitingCallback -> Exchanging -> Authenticated
///                                                        |      ^
///                                                        v      |
///                                                      Refreshing
/// ```
///
/// A denied or failed attempt and `sign_out` go back to `Unauthenticated`.
/// Storage is the source of truth: every operation re-reads the token set
/// instead of keeping it in memory across awaits.
pub struct Authenticator {
    http: Client,
    settings: OAuthSettings,
    clients: ClientConfigStore,
    tokens: TokenManager,
    state: watch::Sender<AuthState>,
    in_flight: Mutex<Option<RefreshWatch>>,
}

/// Result of one refresh, `None` while it is still running.
type RefreshWatch = watch::Receiver<Option<Option<TokenSet>>>;

enum RefreshRole {
    Leader(watch::Sender<Option<Option<TokenSet>>>),
    Follower(RefreshWatch),
}

/// Empties the in-flight slot when the leading refresh finishes or is dropped.
struct InFlightReset<'a>(&'a Mutex<Option<RefreshWatch>>);

impl Drop for InFlightReset<'_> {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Authenticator {
    pub fn new(
        settings: OAuthSettings,
        clients: ClientConfigStore,
        tokens: TokenManager,
    ) -> AuthResult<Self> {
        let http = Client::builder().timeout(settings.timeout).build()?;
        let initial = if tokens.load()?.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        let (state, _) = watch::channel(initial);

        Ok(Self {
            http,
            settings,
            clients,
            tokens,
            state,
            in_flight: Mutex::new(None),
        })
    }

    /// Authenticator backed by the on-disk durable and session stores.
    pub fn from_env() -> AuthResult<Self> {
        let durable: Arc<dyn KeyValueStore> = Arc::new(FileStore::durable());
        let session: Arc<dyn KeyValueStore> = Arc::new(FileStore::session());
        Self::new(
            OAuthSettings::from_env()?,
            ClientConfigStore::new(Arc::clone(&durable), session),
            TokenManager::new(durable),
        )
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn settings(&self) -> &OAuthSettings {
        &self.settings
    }

    pub fn redirect_uri(&self) -> &str {
        &self.settings.redirect_uri
    }

    pub fn clients(&self) -> &ClientConfigStore {
        &self.clients
    }

    pub fn state(&self) -> AuthState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Currently stored token set, without refreshing it.
    pub fn current_tokens(&self) -> AuthResult<Option<TokenSet>> {
        Ok(self.tokens.load()?)
    }

    fn transition(&self, next: AuthState) {
        self.state.send_replace(next);
    }

    /// Refresh transitions never interrupt an in-progress login.
    fn refresh_transition(&self, next: AuthState) {
        self.state.send_if_modified(|current| match current {
            AuthState::AwaitingCallback | AuthState::Exchanging => false,
            _ => {
                let changed = *current != next;
                *current = next;
                changed
            }
        });
    }

    /// Starts a login: stores a fresh verifier and sends the browser to the
    /// authorization page.
    ///
    /// Any previously pending verifier is overwritten, which invalidates an
    /// older login still waiting for its redirect. Returns the URL so it can be
    /// shown when the browser cannot be opened.
    pub fn start_login(&self, navigator: &dyn Navigator) -> AuthResult<String> {
        let client_id = self.clients.get()?.ok_or(AuthError::MissingConfig)?;

        let verifier = utils::generate_code_verifier(utils::DEFAULT_VERIFIER_LEN)?;
        let challenge = utils::generate_code_challenge(&verifier);
        let auth_url = redirect::build_authorization_url(
            &self.settings.authorize_url,
            &client_id,
            &self.settings.redirect_uri,
            &self.settings.scopes,
            &challenge,
        )?;

        // store the verifier before leaving
        self.tokens.begin_session(&PkceSession { verifier })?;
        self.transition(AuthState::AwaitingCallback);

        if let Err(e) = navigator.navigate(&auth_url) {
            warning!(
                "Failed to open browser ({}). Please navigate to the following URL manually:\n{}",
                e,
                auth_url
            );
        }
        Ok(auth_url)
    }

    /// Exchanges an authorization code for a token set.
    ///
    /// Consumes the pending verifier: once the exchange succeeds the verifier
    /// is deleted, and a second exchange fails with `MissingPrerequisite`.
    pub async fn exchange(&self, code: &str) -> AuthResult<TokenSet> {
        match self.exchange_pending(code).await {
            Ok(tokens) => {
                self.transition(AuthState::Authenticated);
                Ok(tokens)
            }
            Err(e) => {
                self.transition(AuthState::Unauthenticated);
                Err(e)
            }
        }
    }

    async fn exchange_pending(&self, code: &str) -> AuthResult<TokenSet> {
        let session = self
            .tokens
            .pending_session()?
            .ok_or(AuthError::MissingPrerequisite("PKCE verifier"))?;
        let client_id = self
            .clients
            .get()?
            .ok_or(AuthError::MissingPrerequisite("client id"))?;

        self.transition(AuthState::Exchanging);
        self.exchange_inner(code, &client_id, &session).await
    }

    async fn exchange_inner(
        &self,
        code: &str,
        client_id: &str,
        session: &PkceSession,
    ) -> AuthResult<TokenSet> {
        let res = self
            .http
            .post(&self.settings.token_url)
            .form(&[
                ("client_id", client_id),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
                ("code_verifier", session.verifier.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchangeFailed {
                status: status.as_u16(),
                body,
            });
        }

        let response: TokenResponse = res.json().await?;
        let tokens = token_set_from(response, utils::now_ms());
        self.tokens.persist(&tokens)?;
        self.tokens.end_session()?;
        Ok(tokens)
    }

    /// Returns a usable token set, refreshing it first when it has expired.
    ///
    /// - no stored token set: `None`, no request
    /// - not yet expired: the stored set, no request
    /// - expired without refresh token: the stale set as is
    /// - refresh fails: a warning is printed and the stale set is returned
    ///
    /// Concurrent callers share one refresh. The first caller runs it and
    /// publishes the outcome; everyone arriving while it runs waits for that
    /// outcome instead of sending a request of their own, failures included.
    pub async fn refresh_if_needed(&self) -> AuthResult<Option<TokenSet>> {
        let Some(current) = self.tokens.load()? else {
            return Ok(None);
        };
        if !needs_refresh(&current, utils::now_ms()) || current.refresh_token.is_none() {
            return Ok(Some(current));
        }

        match self.join_refresh() {
            RefreshRole::Follower(mut rx) => {
                let shared = rx
                    .wait_for(Option::is_some)
                    .await
                    .map(|outcome| outcome.clone().flatten());
                match shared {
                    Ok(tokens) => Ok(tokens),
                    // the leader was dropped before finishing
                    Err(_) => Ok(self.tokens.load()?),
                }
            }
            RefreshRole::Leader(tx) => {
                let _reset = InFlightReset(&self.in_flight);
                let outcome = self.lead_refresh().await;
                let shared = match &outcome {
                    Ok(tokens) => tokens.clone(),
                    Err(_) => self.tokens.load().ok().flatten(),
                };
                tx.send_replace(Some(shared));
                outcome
            }
        }
    }

    fn join_refresh(&self) -> RefreshRole {
        let mut slot = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(rx) = slot.as_ref() {
            return RefreshRole::Follower(rx.clone());
        }
        let (tx, rx) = watch::channel(None);
        *slot = Some(rx);
        RefreshRole::Leader(tx)
    }

    async fn lead_refresh(&self) -> AuthResult<Option<TokenSet>> {
        // a refresh that finished just before this one started may have
        // already stored a fresh set
        let Some(current) = self.tokens.load()? else {
            return Ok(None);
        };
        if !needs_refresh(&current, utils::now_ms()) {
            return Ok(Some(current));
        }
        let Some(refresh_token) = current.refresh_token.clone() else {
            return Ok(Some(current));
        };

        self.refresh_transition(AuthState::Refreshing);
        let refreshed = self.request_refresh(&refresh_token).await;
        self.refresh_transition(AuthState::Authenticated);

        match refreshed {
            Ok(response) => {
                let merged = merge_refresh(&current, response, utils::now_ms());
                self.tokens.persist(&merged)?;
                Ok(Some(merged))
            }
            Err(e) => {
                warning!("{}. Keeping the current session.", e);
                Ok(Some(current))
            }
        }
    }

    /// Alias used by callers about to make an authenticated request.
    pub async fn ensure_fresh_token(&self) -> AuthResult<Option<TokenSet>> {
        self.refresh_if_needed().await
    }

    async fn request_refresh(&self, refresh_token: &str) -> AuthResult<TokenResponse> {
        let client_id = self.clients.get()?.ok_or(AuthError::MissingConfig)?;

        let res = self
            .http
            .post(&self.settings.token_url)
            .form(&[
                ("client_id", client_id.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(AuthError::RefreshFailed {
                status: status.as_u16(),
            });
        }
        Ok(res.json().await?)
    }

    /// Handles the URL the browser landed on.
    ///
    /// - `error=...`: the attempt is over, `AuthorizationDenied` is returned
    /// - `code=...`: the code is exchanged and the cleaned URL returned
    /// - neither: an existing session gets a silent refresh
    pub async fn handle_callback(&self, current_url: &str) -> AuthResult<CallbackOutcome> {
        match redirect::parse_callback(current_url)? {
            CallbackParams::Error(error) => {
                self.transition(AuthState::Unauthenticated);
                Err(AuthError::AuthorizationDenied(error))
            }
            CallbackParams::Code { code, .. } => {
                let tokens = self.exchange(&code).await?;
                let clean_url = redirect::strip_callback_params(current_url)?;
                Ok(CallbackOutcome::Authenticated { tokens, clean_url })
            }
            CallbackParams::None => Ok(CallbackOutcome::Idle {
                tokens: self.refresh_if_needed().await?,
            }),
        }
    }

    /// `Authorization: Bearer <token>` for the stored token set.
    ///
    /// Never refreshes; call [`Self::ensure_fresh_token`] first.
    pub fn auth_header(&self) -> AuthResult<HeaderMap> {
        let tokens = self.tokens.load()?.ok_or(AuthError::NotAuthenticated)?;
        let value = HeaderValue::from_str(&format!("Bearer {}", tokens.access_token))
            .map_err(|_| AuthError::MalformedToken)?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// Deletes the token set. The client id is kept.
    pub fn sign_out(&self) -> AuthResult<()> {
        self.tokens.clear()?;
        self.transition(AuthState::Unauthenticated);
        Ok(())
    }

    /// Waits until a login started with [`Self::start_login`] has finished
    /// and returns the state it ended in.
    pub async fn wait_for_login(&self) -> AuthState {
        let mut rx = self.state.subscribe();
        match rx
            .wait_for(|s| !matches!(s, AuthState::AwaitingCallback | AuthState::Exchanging))
            .await
        {
            Ok(state) => *state,
            Err(_) => self.state(),
        }
    }
}
