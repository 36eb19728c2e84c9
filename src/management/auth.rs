use std::{io, sync::Arc};

use super::storage::{CODE_VERIFIER_KEY, KeyValueStore, TOKENS_KEY};
use crate::{
    types::{PkceSession, TokenSet},
    warning,
};

/// Persists the current token set and the pending PKCE verifier.
///
/// Storage holds at most one of each; saving replaces whatever was there.
#[derive(Clone)]
pub struct TokenManager {
    store: Arc<dyn KeyValueStore>,
}

impl TokenManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        TokenManager { store }
    }

    /// Loads the stored token set.
    ///
    /// A blob that no longer parses is treated as absent, which sends the user
    /// through a fresh login instead of failing every call.
    pub fn load(&self) -> io::Result<Option<TokenSet>> {
        let Some(raw) = self.store.get(TOKENS_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(tokens) => Ok(Some(tokens)),
            Err(e) => {
                warning!("Ignoring unreadable token set, please log in again. Err: {}", e);
                Ok(None)
            }
        }
    }

    pub fn persist(&self, tokens: &TokenSet) -> io::Result<()> {
        let json = serde_json::to_string(tokens).map_err(io::Error::other)?;
        self.store.set(TOKENS_KEY, &json)
    }

    pub fn clear(&self) -> io::Result<()> {
        self.store.delete(TOKENS_KEY)
    }

    pub fn pending_session(&self) -> io::Result<Option<PkceSession>> {
        Ok(self
            .store
            .get(CODE_VERIFIER_KEY)?
            .map(|verifier| PkceSession { verifier }))
    }

    /// Saves a new pending verifier, silently replacing a stale one.
    pub fn begin_session(&self, session: &PkceSession) -> io::Result<()> {
        self.store.set(CODE_VERIFIER_KEY, &session.verifier)
    }

    pub fn end_session(&self) -> io::Result<()> {
        self.store.delete(CODE_VERIFIER_KEY)
    }
}
