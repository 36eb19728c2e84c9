use tabled::Table;

use super::{authenticator, spinner};
use crate::{
    aggregate::{self, RankBy},
    error,
    error::AuthError,
    info,
    spotify::stats::{MAX_PAGE_LIMIT, StatsApi},
    types::{ArtistTableRow, Rollup, TimeRange, TopKind, TopTableRow, TrackTableRow},
    utils, warning,
};

fn fail(what: &str, e: AuthError) -> ! {
    match e {
        AuthError::NotAuthenticated => error!(
            "{} unavailable: session missing or expired. Run `spotstats login`.",
            what
        ),
        other => error!("{} unavailable. Err: {}", what, other),
    }
}

pub async fn profile() {
    let api = StatsApi::from_env(authenticator());

    let pb = spinner("Fetching profile...");
    let me = api.me().await;
    pb.finish_and_clear();

    match me {
        Ok(me) => {
            info!("Name: {}", me.display_name.as_deref().unwrap_or("—"));
            info!("Email: {}", me.email.as_deref().unwrap_or(""));
            info!("Country: {}", me.country.as_deref().unwrap_or("—"));
            if let Some(product) = me.product {
                info!("Plan: {}", product);
            }
            if let Some(followers) = me.followers {
                info!("Followers: {}", followers.total);
            }
        }
        Err(e) => fail("Profile", e),
    }
}

pub async fn top(kind: TopKind, time_range: TimeRange, limit: u32) {
    let api = StatsApi::from_env(authenticator());

    let pb = spinner("Fetching top items...");
    let rows: Result<Vec<TopTableRow>, AuthError> = match kind {
        TopKind::Artists => api.top_artists(time_range, limit).await.map(|artists| {
            artists
                .into_iter()
                .enumerate()
                .map(|(i, a)| TopTableRow {
                    rank: i + 1,
                    name: a.name,
                    detail: a.genres.into_iter().take(3).collect::<Vec<_>>().join(","),
                })
                .collect()
        }),
        TopKind::Tracks => api.top_tracks(time_range, limit).await.map(|tracks| {
            tracks
                .into_iter()
                .enumerate()
                .map(|(i, t)| TopTableRow {
                    rank: i + 1,
                    name: t.name,
                    detail: t
                        .artists
                        .into_iter()
                        .map(|a| a.name)
                        .collect::<Vec<_>>()
                        .join(", "),
                })
                .collect()
        }),
    };
    pb.finish_and_clear();

    match rows {
        Ok(rows) if rows.is_empty() => warning!("No top {} yet.", kind.as_str()),
        Ok(rows) => println!("{}", Table::new(rows)),
        Err(e) => fail("Top items", e),
    }
}

pub async fn recent() {
    let api = StatsApi::from_env(authenticator());

    let pb = spinner("Fetching recently played tracks...");
    let records = api.recently_played(MAX_PAGE_LIMIT).await;
    pb.finish_and_clear();

    match records {
        Ok(records) if records.is_empty() => warning!("No recent plays."),
        Ok(records) => {
            info!("Last {} plays", records.len());
            print_rollup(&aggregate::aggregate(&records, RankBy::Plays, aggregate::TOP_N));
        }
        Err(e) => fail("Recent plays", e),
    }
}

pub(super) fn print_rollup(rollup: &Rollup) {
    let tracks: Vec<TrackTableRow> = rollup
        .tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            rank: i + 1,
            name: t.name.clone(),
            artists: t.artists.clone(),
            plays: t.plays,
            hours: utils::hours(t.ms),
        })
        .collect();

    let artists: Vec<ArtistTableRow> = rollup
        .artists
        .iter()
        .enumerate()
        .map(|(i, a)| ArtistTableRow {
            rank: i + 1,
            name: a.name.clone(),
            plays: a.plays,
            hours: utils::hours(a.ms),
        })
        .collect();

    info!("Top tracks");
    println!("{}", Table::new(tracks));
    info!("Top artists");
    println!("{}", Table::new(artists));
}
