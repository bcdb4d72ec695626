//! Template allocation and reservation.

mod common;

use common::{own, world_with_players, Harness};
use conquest_server::{
    error::GameError,
    game::{
        allocator::{allocate, target_level},
        types::{ChallengeEntry, TemplateStatus},
    },
};

#[tokio::test]
async fn unowned_territory_targets_level_one_and_reserves() {
    let h = Harness::new(world_with_players(3));

    let tpl = h.engine.challenge_template("C1").await.unwrap();

    assert_eq!(tpl.level, 1);
    let w = h.world().await;
    assert_eq!(
        w.template(tpl.id).unwrap().assigned_to_territory_id.as_deref(),
        Some("C1")
    );
}

#[tokio::test]
async fn repeated_requests_return_the_same_template() {
    let h = Harness::new(world_with_players(3));

    let first = h.engine.challenge_template("O2").await.unwrap();
    for _ in 0..5 {
        let again = h.engine.challenge_template("O2").await.unwrap();
        assert_eq!(again.id, first.id);
    }
}

#[tokio::test]
async fn owned_territory_targets_next_level() {
    let mut w = world_with_players(3);
    own(&mut w, "E1", 2, 2);
    let h = Harness::new(w);

    let tpl = h.engine.challenge_template("E1").await.unwrap();
    assert_eq!(tpl.level, 3);
}

#[tokio::test]
async fn max_level_is_refused() {
    let mut w = world_with_players(3);
    own(&mut w, "E1", 2, 3);
    let h = Harness::new(w);

    let err = h.engine.challenge_template("E1").await.unwrap_err();
    assert!(matches!(err, GameError::MaxLevelReached));
}

#[tokio::test]
async fn unknown_territory_is_not_found() {
    let h = Harness::new(world_with_players(3));
    let err = h.engine.challenge_template("Z9").await.unwrap_err();
    assert!(matches!(err, GameError::TerritoryNotFound(id) if id == "Z9"));
}

#[tokio::test]
async fn two_territories_never_share_a_template() {
    let h = Harness::new(world_with_players(3));

    let a = h.engine.challenge_template("C1").await.unwrap();
    let b = h.engine.challenge_template("C2").await.unwrap();

    assert_eq!(a.level, b.level);
    assert_ne!(a.id, b.id);
}

#[test]
fn exhausted_pool_reports_the_level() {
    let mut w = world_with_players(3);
    for entry in &mut w.challenges {
        if let ChallengeEntry::Template(t) = entry {
            if t.level == 1 {
                t.status = TemplateStatus::Retired;
            }
        }
    }

    let err = allocate(&mut w, "C1", &mut rand::rng()).unwrap_err();
    assert!(matches!(err, GameError::NoTemplateAvailable { level: 1 }));
}

#[test]
fn stale_reservation_is_released_when_level_changes() {
    let mut w = world_with_players(3);
    let first = allocate(&mut w, "C1", &mut rand::rng()).unwrap();
    assert_eq!(first.level, 1);

    // The territory was captured through some other template meanwhile.
    own(&mut w, "C1", 1, 1);
    let next = allocate(&mut w, "C1", &mut rand::rng()).unwrap();

    assert_eq!(next.level, 2);
    assert_eq!(w.template(first.id).unwrap().assigned_to_territory_id, None);
    assert_eq!(
        target_level(w.territory("C1").unwrap()).unwrap(),
        2,
        "owner at level 1 upgrades to 2"
    );
}
