use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{
    aggregate,
    config,
    error::{AuthError, AuthResult},
    spotify::auth::Authenticator,
    types::{Artist, Paging, PlayRecord, Profile, RecentlyPlayedResponse, TimeRange, TopKind, Track},
};

/// Upper bound the Web API accepts for `limit` on the endpoints used here.
pub const MAX_PAGE_LIMIT: u32 = 50;

/// Authenticated calls to the listening-statistics endpoints.
///
/// Every call makes sure the token is fresh before building the
/// `Authorization` header.
#[derive(Clone)]
pub struct StatsApi {
    auth: Arc<Authenticator>,
    base_url: String,
}

impl StatsApi {
    pub fn new(auth: Arc<Authenticator>, base_url: impl Into<String>) -> Self {
        Self {
            auth,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env(auth: Arc<Authenticator>) -> Self {
        Self::new(auth, config::spotify_apiurl())
    }

    /// `GET /me`
    pub async fn me(&self) -> AuthResult<Profile> {
        self.get("/me", &[]).await
    }

    /// `GET /me/top/artists`
    pub async fn top_artists(&self, time_range: TimeRange, limit: u32) -> AuthResult<Vec<Artist>> {
        let page: Paging<Artist> = self.top(TopKind::Artists, time_range, limit).await?;
        Ok(page.items)
    }

    /// `GET /me/top/tracks`
    pub async fn top_tracks(&self, time_range: TimeRange, limit: u32) -> AuthResult<Vec<Track>> {
        let page: Paging<Track> = self.top(TopKind::Tracks, time_range, limit).await?;
        Ok(page.items)
    }

    async fn top<T: DeserializeOwned>(
        &self,
        kind: TopKind,
        time_range: TimeRange,
        limit: u32,
    ) -> AuthResult<Paging<T>> {
        let limit = limit.clamp(1, MAX_PAGE_LIMIT).to_string();
        self.get(
            &format!("/me/top/{}", kind.as_str()),
            &[("time_range", time_range.as_str()), ("limit", limit.as_str())],
        )
        .await
    }

    /// `GET /me/player/recently-played`, at most 50 plays.
    pub async fn recently_played(&self, limit: u32) -> AuthResult<Vec<PlayRecord>> {
        let limit = limit.clamp(1, MAX_PAGE_LIMIT).to_string();
        let res: RecentlyPlayedResponse = self
            .get("/me/player/recently-played", &[("limit", limit.as_str())])
            .await?;
        Ok(aggregate::records_from_recent(&res))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> AuthResult<T> {
        self.auth.ensure_fresh_token().await?;
        let headers = self.auth.auth_header()?;

        let res = self
            .auth
            .http()
            .get(format!("{}{}", self.base_url, path))
            .headers(headers)
            .query(query)
            .send()
            .await?;

        match res.status() {
            status if status.is_success() => Ok(res.json::<T>().await?),
            StatusCode::UNAUTHORIZED => Err(AuthError::NotAuthenticated),
            status => Err(AuthError::Api {
                endpoint: path.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}
