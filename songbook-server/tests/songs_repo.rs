//! Repository tests against a live PostgreSQL
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p songbook-server -- --ignored
//!
//! Each test works on rows tagged with its own unique marker, so tests can
//! share one database and run in parallel.

use std::sync::atomic::{AtomicU32, Ordering};

use songbook_core::models::{
    Pagination, ReleaseDate, Song, SongFilter, SongKey, SongLyrics, SongUpdate,
};
use songbook_core::DatabaseConfig;
use songbook_server::db::create_pool;
use songbook_server::{SongRepo, SongStore, StoreError};
use sqlx::PgPool;
use tokio::sync::OnceCell;

static COUNTER: AtomicU32 = AtomicU32::new(0);

// Concurrent CREATE TABLE IF NOT EXISTS can still collide in the catalog
static SCHEMA: OnceCell<()> = OnceCell::const_new();

async fn setup() -> (PgPool, SongRepo) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let config = DatabaseConfig {
        url: Some(url),
        ..Default::default()
    };
    let pool = create_pool(&config).await.expect("pool creation failed");
    SCHEMA
        .get_or_init(|| async {
            sqlx::raw_sql(include_str!("../schema.sql"))
                .execute(&pool)
                .await
                .expect("schema setup failed");
        })
        .await;

    let repo = SongRepo::new(pool.clone(), config.operation_timeout());
    (pool, repo)
}

/// Marker unique to this process and call.
fn tag(name: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{name}-{}-{nanos}-{n}", std::process::id())
}

fn song(band: &str, title: &str) -> Song {
    Song::new(SongKey::new(band, title).unwrap())
}

fn date(s: &str) -> ReleaseDate {
    ReleaseDate::parse(s).unwrap()
}

fn titles(songs: &[Song]) -> Vec<&str> {
    songs.iter().map(|s| s.song_title.as_str()).collect()
}

#[tokio::test]
#[ignore = "requires database"]
async fn insert_twice_yields_song_exists() {
    let (_pool, repo) = setup().await;
    let band = tag("dup");

    let id = repo.insert(&song(&band, "Once")).await.unwrap();
    assert!(id > 0);

    let err = repo.insert(&song(&band, "Once")).await.unwrap_err();
    assert!(matches!(err, StoreError::SongExists { op: "songs.insert" }));
}

#[tokio::test]
#[ignore = "requires database"]
async fn search_honours_only_title_when_title_present() {
    let (_pool, repo) = setup().await;
    let marker = tag("prec");
    let band = format!("band {marker}");
    let other = format!("other {marker}");

    repo.insert(&song(&band, &format!("title {marker} one"))).await.unwrap();
    repo.insert(&song(&band, "unrelated")).await.unwrap();
    repo.insert(&song(&other, &format!("title {marker} two"))).await.unwrap();

    let filter = SongFilter {
        band_name: Some(band.clone()),
        song_title: Some(format!("title {marker}")),
        release_date: Some(date("01.01.1900")),
        ..Default::default()
    };
    let found = repo.search(&filter).await.unwrap();
    let expected_one = format!("title {marker} one");
    let expected_two = format!("title {marker} two");
    assert_eq!(titles(&found), vec![expected_one.as_str(), expected_two.as_str()]);

    // band wins when the title is absent
    let filter = SongFilter {
        song_title: None,
        ..filter
    };
    let found = repo.search(&filter).await.unwrap();
    assert_eq!(titles(&found), vec![expected_one.as_str(), "unrelated"]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn search_escapes_percent() {
    let (_pool, repo) = setup().await;
    let band = tag("pct");
    let literal = format!("100% {band}");

    repo.insert(&song(&band, &literal)).await.unwrap();
    repo.insert(&song(&band, &format!("1000 {band}"))).await.unwrap();

    let filter = SongFilter {
        song_title: Some(literal.clone()),
        ..Default::default()
    };
    let found = repo.search(&filter).await.unwrap();
    assert_eq!(titles(&found), vec![literal.as_str()]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn search_escapes_underscore() {
    let (_pool, repo) = setup().await;
    let band = tag("underscore");
    let literal = format!("a_c {band}");

    repo.insert(&song(&band, &literal)).await.unwrap();
    repo.insert(&song(&band, &format!("abc {band}"))).await.unwrap();

    let filter = SongFilter {
        song_title: Some(literal.clone()),
        ..Default::default()
    };
    let found = repo.search(&filter).await.unwrap();
    assert_eq!(titles(&found), vec![literal.as_str()]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn empty_search_is_not_an_error() {
    let (_pool, repo) = setup().await;
    let filter = SongFilter {
        band_name: Some(tag("nobody")),
        ..Default::default()
    };
    assert!(repo.search(&filter).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn second_page_is_rows_eleven_to_twenty() {
    let (_pool, repo) = setup().await;
    let band = tag("page");
    for i in 1..=25 {
        repo.insert(&song(&band, &format!("song {i:02}"))).await.unwrap();
    }

    let filter = SongFilter {
        band_name: Some(band),
        pagination: Pagination::new(2, 10).unwrap(),
        ..Default::default()
    };
    let found = repo.search(&filter).await.unwrap();
    let expected: Vec<String> = (11..=20).map(|i| format!("song {i:02}")).collect();
    assert_eq!(titles(&found), expected);
}

#[tokio::test]
#[ignore = "requires database"]
async fn release_date_round_trips_in_wire_format() {
    let (_pool, repo) = setup().await;
    let band = tag("date");
    let mut record = song(&band, &format!("dated {band}"));
    record.release_date = Some(date("06.08.1965"));
    repo.insert(&record).await.unwrap();

    let filter = SongFilter {
        song_title: Some(record.song_title.clone()),
        ..Default::default()
    };
    let found = repo.search(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].release_date.unwrap().to_string(), "06.08.1965");
    assert!(found[0].lyrics.is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_writes_only_link_when_all_fields_present() {
    let (_pool, repo) = setup().await;
    let band = tag("upd");
    let id = repo.insert(&song(&band, "Target")).await.unwrap();
    let key = SongKey::new(&band, "Target").unwrap();

    let changes = SongUpdate {
        link: Some("https://example.com/target".into()),
        lyrics: Some("never written".into()),
        release_date: Some(date("01.01.2001")),
    };
    assert_eq!(repo.update(&key, &changes).await.unwrap(), id);

    let filter = SongFilter {
        band_name: Some(band),
        ..Default::default()
    };
    let stored = repo.search(&filter).await.unwrap().remove(0);
    assert_eq!(stored.link.as_deref(), Some("https://example.com/target"));
    assert!(stored.lyrics.is_none());
    assert!(stored.release_date.is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_without_changes_leaves_row_untouched() {
    let (pool, repo) = setup().await;
    let band = tag("noop");
    repo.insert(&song(&band, "Still")).await.unwrap();
    let key = SongKey::new(&band, "Still").unwrap();

    let before: (chrono::DateTime<chrono::Utc>,) =
        sqlx::query_as("SELECT updated FROM songs WHERE band = $1")
            .bind(&band)
            .fetch_one(&pool)
            .await
            .unwrap();

    let err = repo.update(&key, &SongUpdate::default()).await.unwrap_err();
    assert!(matches!(err, StoreError::NoChanges { .. }));

    let after: (chrono::DateTime<chrono::Utc>,) =
        sqlx::query_as("SELECT updated FROM songs WHERE band = $1")
            .bind(&band)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
#[ignore = "requires database"]
async fn missing_pair_is_not_found() {
    let (_pool, repo) = setup().await;
    let key = SongKey::new(&tag("ghost"), "Nothing").unwrap();

    let err = repo.delete(&key).await.unwrap_err();
    assert!(matches!(err, StoreError::SongNotFound { op: "songs.delete" }));

    let changes = SongUpdate {
        lyrics: Some("boo".into()),
        ..Default::default()
    };
    let err = repo.update(&key, &changes).await.unwrap_err();
    assert!(matches!(err, StoreError::SongNotFound { op: "songs.update" }));
}

#[tokio::test]
#[ignore = "requires database"]
async fn delete_returns_id_and_removes_row() {
    let (_pool, repo) = setup().await;
    let band = tag("del");
    let id = repo.insert(&song(&band, "Gone")).await.unwrap();
    let key = SongKey::new(&band, "Gone").unwrap();

    assert_eq!(repo.delete(&key).await.unwrap(), id);
    assert!(matches!(
        repo.delete(&key).await,
        Err(StoreError::SongNotFound { .. })
    ));
}

#[tokio::test]
#[ignore = "requires database"]
async fn verse_lookup_follows_blank_lines() {
    let (_pool, repo) = setup().await;
    let band = tag("verse");
    let mut record = song(&band, "Rhapsody");
    record.lyrics = Some("first line\nstill first\n\nsecond\n  \nthird".into());
    repo.insert(&record).await.unwrap();
    let key = SongKey::new(&band, "Rhapsody").unwrap();

    let verse = repo
        .fetch_verse(&SongLyrics::new(key.clone(), 1).unwrap())
        .await
        .unwrap();
    assert_eq!(verse.text, "first line\nstill first");

    let verse = repo
        .fetch_verse(&SongLyrics::new(key.clone(), 3).unwrap())
        .await
        .unwrap();
    assert_eq!(verse.verse, 3);
    assert_eq!(verse.text, "third");

    let err = repo
        .fetch_verse(&SongLyrics::new(key, 4).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::SongNotFound { op: "songs.fetch_verse" }));
}

#[tokio::test]
#[ignore = "requires database"]
async fn verse_of_song_without_lyrics_is_not_found() {
    let (_pool, repo) = setup().await;
    let band = tag("mute");
    repo.insert(&song(&band, "Silence")).await.unwrap();

    let key = SongKey::new(&band, "Silence").unwrap();
    let err = repo
        .fetch_verse(&SongLyrics::new(key, 1).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::SongNotFound { .. }));
}

#[tokio::test]
#[ignore = "requires database"]
async fn trailing_blank_line_adds_no_verse() {
    let (_pool, repo) = setup().await;
    let band = tag("trail");
    let mut record = song(&band, "Fade");
    record.lyrics = Some("\n\nfirst\n\nsecond\n\n".into());
    repo.insert(&record).await.unwrap();
    let key = SongKey::new(&band, "Fade").unwrap();

    let verse = repo
        .fetch_verse(&SongLyrics::new(key.clone(), 1).unwrap())
        .await
        .unwrap();
    assert_eq!(verse.text, "first");

    let verse = repo
        .fetch_verse(&SongLyrics::new(key.clone(), 2).unwrap())
        .await
        .unwrap();
    assert_eq!(verse.text, "second");

    let err = repo
        .fetch_verse(&SongLyrics::new(key, 3).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::SongNotFound { .. }));
}
