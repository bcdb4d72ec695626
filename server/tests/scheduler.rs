//! Expired-vote sweep and hourly scoring through the engine.

mod common;

use chrono::Duration;
use common::{own, reserve, t0, text_proof, world_with_players, Harness};
use conquest_server::{
    game::{
        lifecycle::{self, Submission},
        types::{Challenge, Decision, Outcome, PlayerId},
        voting::resolve_expired,
        world::World,
    },
    scheduler,
};

#[tokio::test]
async fn expired_vote_with_a_lone_approval_is_approved() {
    let h = Harness::new(world_with_players(5));
    let c = h.challenge("C1", 1).await;
    h.engine.cast_vote(c.id, 2, Decision::For).await.unwrap();

    h.clock.advance(Duration::hours(24) + Duration::minutes(1));
    let sweep = h.engine.process_expired_votes().await.unwrap();

    assert_eq!(sweep.resolved.len(), 1);
    let r = &sweep.resolved[0];
    assert_eq!(r.outcome, Outcome::Approved);
    // 24h01 rounds up to 25 paid hours at level 1
    assert_eq!(r.points_awarded, 25);
    let w = h.world().await;
    assert_eq!(w.territory("C1").unwrap().owner_id, Some(1));
    assert!(w.votes.is_empty());
}

#[tokio::test]
async fn expired_vote_without_ballots_is_rejected() {
    let h = Harness::new(world_with_players(4));
    let c = h.challenge("E2", 3).await;

    h.clock.advance(Duration::hours(25));
    let sweep = h.engine.process_expired_votes().await.unwrap();

    assert_eq!(sweep.resolved[0].outcome, Outcome::Rejected);
    let w = h.world().await;
    assert_eq!(w.territory("E2").unwrap().owner_id, None);
    assert!(w.vote(c.id).is_none());
}

#[tokio::test]
async fn open_votes_are_left_alone() {
    let h = Harness::new(world_with_players(4));
    let c = h.challenge("E2", 3).await;
    h.clock.advance(Duration::hours(23));
    let before = h.world().await;

    let sweep = h.engine.process_expired_votes().await.unwrap();

    assert!(sweep.resolved.is_empty());
    assert_eq!(h.world().await, before);
    assert!(before.vote(c.id).is_some());
}

#[tokio::test]
async fn sweep_after_a_majority_resolution_is_a_no_op() {
    let h = Harness::new(world_with_players(3));
    let c = h.challenge("C1", 1).await;
    h.engine.cast_vote(c.id, 2, Decision::For).await.unwrap();
    h.engine.cast_vote(c.id, 3, Decision::For).await.unwrap();
    let score = h.world().await.player(1).unwrap().score;

    h.clock.advance(Duration::hours(48));
    let sweep = h.engine.process_expired_votes().await.unwrap();

    assert!(sweep.resolved.is_empty());
    assert_eq!(h.world().await.player(1).unwrap().score, score);
}

fn submit_at(w: &mut World, territory: &str, player: PlayerId, template_id: u32) -> Challenge {
    reserve(w, territory, template_id);
    lifecycle::submit(
        w,
        Submission {
            territory_id: territory.into(),
            player_id: player,
            template_id,
            proof: text_proof(),
        },
        t0(),
        Duration::hours(24),
    )
    .unwrap()
}

#[test]
fn one_broken_vote_does_not_block_the_sweep() {
    let mut w = world_with_players(4);
    let broken = submit_at(&mut w, "O1", 4, 2);
    let healthy = submit_at(&mut w, "O2", 1, 3);
    w.players.retain(|p| p.id != 4);
    w.vote_mut(healthy.id).unwrap().votes_for = 1;
    w.vote_mut(healthy.id).unwrap().voters.push(2);

    let sweep = resolve_expired(&mut w, t0() + Duration::hours(30));

    assert_eq!(sweep.failed, vec![broken.id]);
    assert_eq!(sweep.resolved.len(), 1);
    assert_eq!(sweep.resolved[0].challenge_id, healthy.id);
    assert_eq!(w.territory("O2").unwrap().owner_id, Some(1));
    assert!(w.territory("O1").unwrap().is_locked(), "broken vote stays pending");
}

#[tokio::test]
async fn hourly_sweep_credits_owners_in_one_batch() {
    let mut w = world_with_players(3);
    own(&mut w, "C1", 1, 3);
    own(&mut w, "C2", 1, 1);
    own(&mut w, "E1", 2, 2);
    let h = Harness::new(w);

    let report = h.engine.apply_hourly_points().await.unwrap();

    assert_eq!(report.gains.len(), 2);
    let w = h.world().await;
    assert_eq!(w.player(1).unwrap().score, 4 + 1 + 3);
    assert_eq!(w.player(2).unwrap().score, 2);
    assert_eq!(w.player(3).unwrap().score, 0);
}

#[tokio::test]
async fn hourly_sweep_with_nothing_owned_writes_nothing() {
    let h = Harness::new(world_with_players(3));
    let before = h.world().await;

    let report = h.engine.apply_hourly_points().await.unwrap();

    assert!(report.gains.is_empty());
    assert_eq!(h.world().await, before);
}

#[tokio::test]
async fn ticks_drive_the_engine() {
    let mut w = world_with_players(3);
    own(&mut w, "O4", 3, 2);
    let h = Harness::new(w);
    let c = h.challenge("C1", 1).await;
    h.clock.advance(Duration::hours(30));

    scheduler::expiry_tick(&h.engine).await;
    scheduler::scoring_tick(&h.engine).await;

    let w = h.world().await;
    assert!(w.vote(c.id).is_none());
    assert_eq!(w.player(3).unwrap().score, 2);
}

#[tokio::test]
async fn ballot_racing_the_sweep_resolves_once() {
    // At the deadline the ballot still counts; one second later only the
    // sweep can resolve.
    for late in [Duration::zero(), Duration::seconds(1)] {
        let h = Harness::new(world_with_players(3));
        let c = h.challenge("C1", 1).await;
        h.engine.cast_vote(c.id, 2, Decision::For).await.unwrap();
        h.clock.advance(Duration::hours(24) + late);

        let (ballot, sweep) = tokio::join!(
            h.engine.cast_vote(c.id, 3, Decision::For),
            h.engine.process_expired_votes(),
        );

        let mut awarded: Vec<u64> = sweep
            .unwrap()
            .resolved
            .iter()
            .map(|r| r.points_awarded)
            .collect();
        awarded.extend(ballot.ok().and_then(|r| r.resolution).map(|r| r.points_awarded));
        assert_eq!(awarded.len(), 1, "resolved exactly once ({late})");

        let w = h.world().await;
        assert_eq!(w.player(1).unwrap().score, awarded[0]);
        assert_eq!(w.territory("C1").unwrap().owner_id, Some(1));
        assert!(w.vote(c.id).is_none());
        let captures = w
            .events
            .iter()
            .filter(|e| e.message == "P1 captured territory Citadelle!")
            .count();
        assert_eq!(captures, 1);
    }
}
