use std::{io, sync::Arc};

use super::storage::{CLIENT_ID_KEY, KeyValueStore};

/// Holds the application's public client id in one of two tiers.
///
/// The durable and session tiers are mutually exclusive: writing one removes
/// the other, so `get` never has to reconcile two copies.
#[derive(Clone)]
pub struct ClientConfigStore {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl ClientConfigStore {
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    pub fn get(&self) -> io::Result<Option<String>> {
        if let Some(id) = self.durable.get(CLIENT_ID_KEY)? {
            return Ok(Some(id));
        }
        self.session.get(CLIENT_ID_KEY)
    }

    /// Stores a trimmed client id. Blank input is ignored and returns `false`.
    pub fn set(&self, id: &str, persist: bool) -> io::Result<bool> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(false);
        }

        if persist {
            self.durable.set(CLIENT_ID_KEY, id)?;
            self.session.delete(CLIENT_ID_KEY)?;
        } else {
            self.session.set(CLIENT_ID_KEY, id)?;
            self.durable.delete(CLIENT_ID_KEY)?;
        }
        Ok(true)
    }

    pub fn clear(&self) -> io::Result<()> {
        self.durable.delete(CLIENT_ID_KEY)?;
        self.session.delete(CLIENT_ID_KEY)
    }
}
