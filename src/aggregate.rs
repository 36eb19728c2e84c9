//! Play-count and listening-time rollups.
//!
//! Entities are keyed by provider id when one is present and by name
//! otherwise. The name fallback merges distinct tracks or artists that share a
//! name; that is accepted for plays without ids.

use std::{cmp::Ordering, collections::HashMap, path::Path};

use serde_json::Value;

use crate::{
    Res,
    types::{
        ArtistRef, ArtistStat, PlayRecord, RecentlyPlayedResponse, Rollup, StreamingHistoryEntry,
        TrackStat,
    },
    warning,
};

/// Number of entries kept per ranking.
pub const TOP_N: usize = 10;

const UNKNOWN: &str = "Unknown";

/// How rankings are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankBy {
    /// Play count descending, then total duration descending.
    #[default]
    Plays,
    /// Total duration descending, then play count descending.
    Duration,
}

impl RankBy {
    fn compare(&self, a: (u64, u64), b: (u64, u64)) -> Ordering {
        let (a_plays, a_ms) = a;
        let (b_plays, b_ms) = b;
        match self {
            RankBy::Plays => b_plays.cmp(&a_plays).then(b_ms.cmp(&a_ms)),
            RankBy::Duration => b_ms.cmp(&a_ms).then(b_plays.cmp(&a_plays)),
        }
    }
}

/// Insertion-ordered accumulator, so equal entries keep first-seen order.
struct Tally<T> {
    index: HashMap<String, usize>,
    entries: Vec<T>,
}

impl<T> Tally<T> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: &str, init: impl FnOnce() -> T) -> &mut T {
        let idx = match self.index.get(key).copied() {
            Some(idx) => idx,
            None => {
                self.entries.push(init());
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx]
    }
}

fn rank<T>(mut items: Vec<T>, by: RankBy, top_n: usize, score: impl Fn(&T) -> (u64, u64)) -> Vec<T> {
    items.sort_by(|a, b| by.compare(score(a), score(b)));
    items.truncate(top_n);
    items
}

/// Folds plays into track and artist rankings.
pub fn aggregate(records: &[PlayRecord], by: RankBy, top_n: usize) -> Rollup {
    let mut tracks: Tally<TrackStat> = Tally::new();
    let mut artists: Tally<ArtistStat> = Tally::new();

    for record in records {
        let ms = record.duration_ms.unwrap_or(0);

        let track_key = record
            .track_id
            .clone()
            .unwrap_or_else(|| record.track_name.clone());
        let track = tracks.entry(&track_key, || TrackStat {
            key: track_key.clone(),
            name: record.track_name.clone(),
            artists: artist_names(&record.artists),
            plays: 0,
            ms: 0,
        });
        track.plays += 1;
        track.ms += ms;

        for artist in &record.artists {
            let artist_key = artist.id.clone().unwrap_or_else(|| artist.name.clone());
            let stat = artists.entry(&artist_key, || ArtistStat {
                key: artist_key.clone(),
                name: artist.name.clone(),
                plays: 0,
                ms: 0,
            });
            stat.plays += 1;
            stat.ms += ms;
        }
    }

    Rollup {
        tracks: rank(tracks.entries, by, top_n, |t| (t.plays, t.ms)),
        artists: rank(artists.entries, by, top_n, |a| (a.plays, a.ms)),
    }
}

fn artist_names(artists: &[ArtistRef]) -> String {
    if artists.is_empty() {
        return "—".to_string();
    }
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Converts a recently-played page into play records, skipping entries
/// without a track.
pub fn records_from_recent(res: &RecentlyPlayedResponse) -> Vec<PlayRecord> {
    res.items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .map(|track| PlayRecord {
            track_id: track.id.clone().filter(|id| !id.is_empty()),
            track_name: track.name.clone(),
            artists: track
                .artists
                .iter()
                .map(|a| ArtistRef {
                    id: a.id.clone().filter(|id| !id.is_empty()),
                    name: a.name.clone(),
                })
                .collect(),
            duration_ms: track.duration_ms,
        })
        .collect()
}

/// Converts exported streaming-history entries into play records.
///
/// History files carry no ids: tracks are keyed by `"{artist} — {track}"` and
/// artists by name.
pub fn records_from_history(entries: &[StreamingHistoryEntry]) -> Vec<PlayRecord> {
    entries
        .iter()
        .map(|entry| {
            let track = name_or_unknown(entry.track_name.as_deref());
            let artist = name_or_unknown(entry.artist_name.as_deref());
            PlayRecord {
                track_id: Some(format!("{artist} — {track}")),
                track_name: track,
                artists: vec![ArtistRef {
                    id: None,
                    name: artist,
                }],
                duration_ms: entry.ms_played,
            }
        })
        .collect()
}

fn name_or_unknown(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Reads one exported history entry, field by field.
///
/// Missing or mistyped fields fall back to their defaults instead of failing
/// the whole file. `msPlayed` may be an integer, a float or a numeric string.
/// Elements that are not objects yield `None`.
pub fn history_entry(value: &Value) -> Option<StreamingHistoryEntry> {
    let obj = value.as_object()?;
    let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
    let ms_played = obj.get("msPlayed").and_then(|ms| match ms {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });

    Some(StreamingHistoryEntry {
        end_time: text("endTime"),
        artist_name: text("artistName"),
        track_name: text("trackName"),
        ms_played,
    })
}

/// Reads streaming-history JSON files and ranks them by listening time.
///
/// Files that cannot be read or do not contain a JSON array are skipped with
/// a warning. Inside an array, non-object elements are skipped and bad fields
/// take their defaults. Fails when no file yielded any entry.
pub async fn import_history<P: AsRef<Path>>(files: &[P]) -> Res<Rollup> {
    let mut entries: Vec<StreamingHistoryEntry> = Vec::new();

    for file in files {
        let path = file.as_ref();
        let content = match async_fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => {
                warning!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        match serde_json::from_str::<Vec<Value>>(&content) {
            Ok(parsed) => entries.extend(parsed.iter().filter_map(history_entry)),
            Err(e) => warning!("Skipping {}: {}", path.display(), e),
        }
    }

    if entries.is_empty() {
        return Err("No valid JSON data found.".into());
    }

    Ok(aggregate(
        &records_from_history(&entries),
        RankBy::Duration,
        TOP_N,
    ))
}
