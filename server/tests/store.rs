//! Document stores.

mod common;

use std::sync::Arc;

use chrono::Duration;
use common::{engine_over, reserve, t0, text_proof, world_with_players, ReadOnlyStore};
use conquest_server::{
    db::{seed, JsonFileStore, MemoryStore, Store},
    error::GameError,
    game::{
        lifecycle::{self, Submission},
        types::ChallengeEntry,
        world::World,
    },
};

fn world_with_a_pending_challenge() -> World {
    let mut w = world_with_players(3);
    reserve(&mut w, "O3", 4);
    lifecycle::submit(
        &mut w,
        Submission {
            territory_id: "O3".into(),
            player_id: 2,
            template_id: 4,
            proof: text_proof(),
        },
        t0(),
        Duration::hours(24),
    )
    .unwrap();
    w
}

#[tokio::test]
async fn file_store_is_seeded_on_first_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");

    let store = JsonFileStore::open(&path, seed::default_world()).await.unwrap();

    assert!(path.exists());
    assert_eq!(store.load().await.unwrap(), seed::default_world());
}

#[tokio::test]
async fn file_store_keeps_templates_and_submissions_apart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");
    let world = world_with_a_pending_challenge();

    let store = JsonFileStore::open(&path, World::default()).await.unwrap();
    store.commit(&world).await.unwrap();

    let reopened = JsonFileStore::open(&path, World::default()).await.unwrap();
    let loaded = reopened.load().await.unwrap();
    assert_eq!(loaded, world);
    assert_eq!(loaded.submissions().count(), 1);
    assert_eq!(loaded.templates().count(), 10);
    assert!(matches!(loaded.challenges.last(), Some(ChallengeEntry::Submitted(_))));

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"activeChallengeId\""));
    assert!(!dir.path().join("db.json.tmp").exists());
}

#[tokio::test]
async fn corrupt_file_is_reported_at_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFileStore::open(&path, World::default()).await.unwrap_err();
    assert!(format!("{err:#}").contains("parsing"));
}

#[tokio::test]
async fn seed_file_overrides_the_default_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seed.json");
    let custom = world_with_players(6);
    std::fs::write(&path, serde_json::to_string(&custom).unwrap()).unwrap();

    let loaded = seed::load(Some(&path)).await.unwrap();
    assert_eq!(loaded.players.len(), 6);
    assert_eq!(seed::load(None).await.unwrap(), seed::default_world());
}

#[tokio::test]
async fn memory_store_round_trips() {
    let store = MemoryStore::new(World::default());
    let world = world_with_a_pending_challenge();

    store.commit(&world).await.unwrap();

    assert_eq!(store.load().await.unwrap(), world);
    store.ping().await.unwrap();
}

#[tokio::test]
async fn failed_commit_is_an_error_and_keeps_the_document() {
    let store = Arc::new(ReadOnlyStore(MemoryStore::new(world_with_players(3))));
    let engine = engine_over(store.clone());
    let before = store.load().await.unwrap();

    let err = engine.challenge_template("C1").await.unwrap_err();
    assert!(matches!(err, GameError::Store(_)));

    assert_eq!(store.load().await.unwrap(), before);
    assert_eq!(engine.game_state().await.unwrap().players.len(), 3);
}
