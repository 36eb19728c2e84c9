use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::spotify::auth::Authenticator;

pub async fn health(Extension(auth): Extension<Arc<Authenticator>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "auth": auth.state().to_string(),
    }))
}
