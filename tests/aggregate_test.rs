use std::io::Write;

use spotstats::{
    aggregate::{RankBy, TOP_N, aggregate, import_history, records_from_history, records_from_recent},
    types::{ArtistRef, PlayRecord, RecentlyPlayedResponse, StreamingHistoryEntry},
};
use tempfile::NamedTempFile;

// Helper function to create a play with one artist
fn play(id: Option<&str>, name: &str, artist: &str, ms: Option<u64>) -> PlayRecord {
    PlayRecord {
        track_id: id.map(str::to_string),
        track_name: name.to_string(),
        artists: vec![ArtistRef {
            id: None,
            name: artist.to_string(),
        }],
        duration_ms: ms,
    }
}

fn history_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_aggregate_counts_plays_and_duration() {
    let records = vec![
        play(Some("a"), "Song1", "Art1", Some(200_000)),
        play(Some("a"), "Song1", "Art1", Some(200_000)),
        play(Some("b"), "Song2", "Art2", Some(100_000)),
    ];

    let rollup = aggregate(&records, RankBy::Plays, TOP_N);

    assert_eq!(rollup.tracks.len(), 2);
    assert_eq!(rollup.tracks[0].key, "a");
    assert_eq!(rollup.tracks[0].plays, 2);
    assert_eq!(rollup.tracks[0].ms, 400_000);
    assert_eq!(rollup.tracks[1].key, "b");
    assert_eq!(rollup.tracks[1].plays, 1);
    assert_eq!(rollup.tracks[1].ms, 100_000);

    assert_eq!(rollup.artists[0].name, "Art1");
    assert_eq!(rollup.artists[0].plays, 2);
    assert_eq!(rollup.artists[1].name, "Art2");
}

#[test]
fn test_aggregate_breaks_ties_by_duration() {
    let records = vec![
        play(Some("short"), "Short", "Art", Some(60_000)),
        play(Some("long"), "Long", "Art", Some(300_000)),
    ];

    let rollup = aggregate(&records, RankBy::Plays, TOP_N);

    assert_eq!(rollup.tracks[0].key, "long");
    assert_eq!(rollup.tracks[1].key, "short");
}

#[test]
fn test_aggregate_rank_by_duration() {
    let records = vec![
        play(Some("a"), "Often", "Art1", Some(10_000)),
        play(Some("a"), "Often", "Art1", Some(10_000)),
        play(Some("b"), "Long", "Art2", Some(600_000)),
    ];

    let rollup = aggregate(&records, RankBy::Duration, TOP_N);

    assert_eq!(rollup.tracks[0].key, "b");
    assert_eq!(rollup.artists[0].name, "Art2");
}

#[test]
fn test_aggregate_missing_duration_and_id() {
    let records = vec![
        play(None, "Same Name", "Art1", None),
        // different track with the same name merges into the same entry
        play(None, "Same Name", "Art2", Some(1_000)),
    ];

    let rollup = aggregate(&records, RankBy::Plays, TOP_N);

    assert_eq!(rollup.tracks.len(), 1);
    assert_eq!(rollup.tracks[0].key, "Same Name");
    assert_eq!(rollup.tracks[0].plays, 2);
    assert_eq!(rollup.tracks[0].ms, 1_000);
    assert_eq!(rollup.tracks[0].artists, "Art1");
}

#[test]
fn test_aggregate_truncates_to_top_n() {
    let records: Vec<PlayRecord> = (0..15)
        .map(|i| play(Some(&format!("t{i}")), &format!("Song{i}"), &format!("Art{i}"), Some(i)))
        .collect();

    let rollup = aggregate(&records, RankBy::Plays, TOP_N);

    assert_eq!(rollup.tracks.len(), 10);
    assert_eq!(rollup.artists.len(), 10);
    // one play each, so the longest come first
    assert_eq!(rollup.tracks[0].key, "t14");
    assert_eq!(rollup.tracks[9].key, "t5");
}

#[test]
fn test_aggregate_empty() {
    let rollup = aggregate(&[], RankBy::Plays, TOP_N);

    assert!(rollup.tracks.is_empty());
    assert!(rollup.artists.is_empty());
}

#[test]
fn test_records_from_recent_joins_artists() {
    let res: RecentlyPlayedResponse = serde_json::from_value(serde_json::json!({
        "items": [
            {
                "track": {
                    "id": "t1",
                    "name": "Duet",
                    "duration_ms": 180000,
                    "artists": [{"id": "a1", "name": "One"}, {"id": "a2", "name": "Two"}]
                },
                "played_at": "2024-05-01T10:00:00Z"
            },
            { "track": null },
            {
                "track": { "id": "", "name": "Lonely", "artists": [] }
            }
        ]
    }))
    .unwrap();

    let records = records_from_recent(&res);
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].track_id, None);

    let rollup = aggregate(&records, RankBy::Plays, TOP_N);
    assert_eq!(rollup.tracks[0].artists, "One, Two");
    assert_eq!(rollup.tracks[1].artists, "—");
    assert_eq!(rollup.artists.len(), 2);
}

#[test]
fn test_records_from_history_keys() {
    let entries: Vec<StreamingHistoryEntry> = serde_json::from_value(serde_json::json!([
        {"endTime": "2024-01-01 10:00", "artistName": "Art", "trackName": "Song", "msPlayed": 1000},
        {"endTime": "2024-01-01 10:05", "msPlayed": 500}
    ]))
    .unwrap();

    let records = records_from_history(&entries);

    assert_eq!(records[0].track_id.as_deref(), Some("Art — Song"));
    assert_eq!(records[1].track_id.as_deref(), Some("Unknown — Unknown"));
    assert_eq!(records[1].artists[0].name, "Unknown");
}

#[tokio::test]
async fn test_import_history_ranks_by_listening_time() {
    let first = history_file(
        r#"[
            {"artistName": "Art1", "trackName": "Often", "msPlayed": 10000},
            {"artistName": "Art1", "trackName": "Often", "msPlayed": 10000}
        ]"#,
    );
    let second = history_file(r#"[{"artistName": "Art2", "trackName": "Long", "msPlayed": 900000}]"#);
    let broken = history_file("not json");

    let rollup = import_history(&[first.path(), broken.path(), second.path()])
        .await
        .unwrap();

    assert_eq!(rollup.tracks[0].key, "Art2 — Long");
    assert_eq!(rollup.tracks[1].key, "Art1 — Often");
    assert_eq!(rollup.tracks[1].plays, 2);
    assert_eq!(rollup.artists[0].name, "Art2");
}

#[tokio::test]
async fn test_import_history_tolerates_bad_elements() {
    let file = history_file(
        r#"[
            null,
            {"artistName": "Art", "trackName": "Song", "msPlayed": 1500.7},
            {"artistName": "Art", "trackName": "Song", "msPlayed": "2000"},
            {"artistName": "Art", "trackName": "Song", "msPlayed": "n/a"},
            {"artistName": 42, "trackName": "Other", "msPlayed": 10}
        ]"#,
    );

    let rollup = import_history(&[file.path()]).await.unwrap();

    assert_eq!(rollup.tracks[0].key, "Art — Song");
    assert_eq!(rollup.tracks[0].plays, 3);
    assert_eq!(rollup.tracks[0].ms, 3_500);
    assert_eq!(rollup.tracks[1].key, "Unknown — Other");
    assert_eq!(rollup.artists[0].name, "Art");
    assert_eq!(rollup.artists[1].name, "Unknown");
}

#[tokio::test]
async fn test_import_history_without_valid_data_fails() {
    let broken = history_file("{}");
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");

    let err = import_history(&[broken.path(), missing.as_path()])
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "No valid JSON data found.");
}
