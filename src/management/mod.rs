mod auth;
mod client;
mod storage;

pub use auth::TokenManager;
pub use client::ClientConfigStore;
pub use storage::CLIENT_ID_KEY;
pub use storage::CODE_VERIFIER_KEY;
pub use storage::FileStore;
pub use storage::KeyValueStore;
pub use storage::MemoryStore;
pub use storage::TOKENS_KEY;
