//! Transactional front door to the game.
//!
//! Every mutation loads the document, applies the change and commits it
//! while holding one writer lock, so two mutations never interleave. A
//! failed operation is never committed.

use chrono::Duration;
use serde::Serialize;
use std::{collections::VecDeque, sync::Arc};
use tokio::sync::Mutex;

use crate::{
    db::Store,
    error::{GameError, GameResult},
    game::{
        allocator,
        clock::Clock,
        lifecycle::{self, Submission},
        scoring::{self, SweepReport},
        types::{Challenge, ChallengeId, ChallengeTemplate, Decision, Event, PlayerId},
        voting::{self, ExpirySweep, VoteReceipt},
        world::{GameState, World},
    },
    metrics,
};

/// Scores after an attack.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttackOutcome {
    pub attacker_new_score: u64,
    pub target_new_score: u64,
}

pub struct Engine {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    vote_window: Duration,
    writer: Mutex<()>,
}

impl Engine {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, vote_window: Duration) -> Self {
        Self {
            store,
            clock,
            vote_window,
            writer: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Run `f` as one read-modify-write transaction. Commits only on
    /// success, and only if the document actually changed.
    async fn transact<T>(
        &self,
        f: impl FnOnce(&mut World, chrono::DateTime<chrono::Utc>) -> GameResult<T>,
    ) -> GameResult<T> {
        let _guard = self.writer.lock().await;
        let mut world = self.store.load().await?;
        let before = world.clone();
        let out = f(&mut world, self.clock.now())?;
        if world != before {
            self.store.commit(&world).await?;
        }
        Ok(out)
    }

    pub async fn game_state(&self) -> GameResult<GameState> {
        Ok(self.store.load().await?.into())
    }

    pub async fn events(&self) -> GameResult<VecDeque<Event>> {
        Ok(self.store.load().await?.events)
    }

    pub async fn challenge_template(&self, territory_id: &str) -> GameResult<ChallengeTemplate> {
        self.transact(|w, _| allocator::allocate(w, territory_id, &mut rand::rng()))
            .await
    }

    pub async fn submit_challenge(&self, sub: Submission) -> GameResult<Challenge> {
        let window = self.vote_window;
        self.transact(|w, now| lifecycle::submit(w, sub, now, window))
            .await
    }

    pub async fn cast_vote(
        &self,
        challenge_id: ChallengeId,
        player_id: PlayerId,
        decision: Decision,
    ) -> GameResult<VoteReceipt> {
        let receipt = self
            .transact(|w, now| voting::cast_vote(w, challenge_id, player_id, decision, now))
            .await?;
        if let Some(r) = &receipt.resolution {
            metrics::record_resolution(r.outcome);
        }
        Ok(receipt)
    }

    /// Direct score transfer: the attacker pays `points`, the target loses
    /// `points` floored at zero.
    pub async fn attack(
        &self,
        attacker_id: PlayerId,
        target_id: PlayerId,
        points: u64,
    ) -> GameResult<AttackOutcome> {
        if points == 0 {
            return Err(GameError::InvalidPoints);
        }
        self.transact(|w, now| {
            let attacker = w
                .player(attacker_id)
                .ok_or(GameError::PlayerNotFound(attacker_id))?;
            let target = w
                .player(target_id)
                .ok_or(GameError::PlayerNotFound(target_id))?;
            if attacker.score < points {
                return Err(GameError::InsufficientPoints);
            }
            let message = format!(
                "{} attacked {} for {points} points of damage!",
                attacker.name, target.name
            );

            if let Some(a) = w.player_mut(attacker_id) {
                a.score -= points;
            }
            let target_new_score = match w.player_mut(target_id) {
                Some(t) => {
                    t.score = t.score.saturating_sub(points);
                    t.score
                }
                None => 0,
            };
            let attacker_new_score = w.player(attacker_id).map_or(0, |a| a.score);
            w.log_event(message, now);

            Ok(AttackOutcome {
                attacker_new_score,
                target_new_score,
            })
        })
        .await
    }

    /// Resolve every expired vote by plurality.
    pub async fn process_expired_votes(&self) -> GameResult<ExpirySweep> {
        let sweep = self
            .transact(|w, now| Ok(voting::resolve_expired(w, now)))
            .await?;
        for r in &sweep.resolved {
            metrics::record_resolution(r.outcome);
        }
        if !sweep.failed.is_empty() {
            metrics::record_failure("expired_votes", sweep.failed.len());
        }
        Ok(sweep)
    }

    /// Credit hourly territory income and regional bonuses.
    pub async fn apply_hourly_points(&self) -> GameResult<SweepReport> {
        let report = self
            .transact(|w, now| Ok(scoring::apply_hourly(w, now)))
            .await?;
        metrics::HOURLY_POINTS.inc_by(report.gains.values().sum());
        if report.skipped > 0 {
            metrics::record_failure("hourly_points", report.skipped);
        }
        Ok(report)
    }
}
