//! Vote tally and challenge resolution.
//!
//! Everything here mutates a [`World`] in place and expects to run inside a
//! single store transaction. `resolve` is idempotent: once a challenge is
//! resolved, further calls are no-ops.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::{GameError, GameResult},
    game::{
        scoring::{duration_hours, points_per_hour},
        types::{
            ChallengeId, ChallengeStatus, Decision, Outcome, PlayerId, Vote, VoteStatus, MAX_LEVEL,
        },
        world::World,
    },
};

/// Votes needed for an outright majority among `eligible` voters.
pub fn majority_threshold(eligible: usize) -> usize {
    eligible / 2 + 1
}

/// Decide a vote if it can be decided now: an outright majority either way,
/// or plurality once every eligible player has voted.
pub fn tally_outcome(vote: &Vote, eligible: usize) -> Option<Outcome> {
    let threshold = majority_threshold(eligible);
    if vote.votes_for as usize >= threshold {
        Some(Outcome::Approved)
    } else if vote.votes_against as usize >= threshold {
        Some(Outcome::Rejected)
    } else if vote.voters.len() >= eligible {
        Some(vote.plurality())
    } else {
        None
    }
}

/// What a resolution changed.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub challenge_id: ChallengeId,
    pub outcome: Outcome,
    pub winner_id: Option<PlayerId>,
    pub new_level: Option<u8>,
    pub points_awarded: u64,
    /// The vote as it stood when resolved (already removed from the world).
    pub vote: Vote,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub vote: Vote,
    pub vote_resolved: bool,
    pub outcome: Option<Outcome>,
    #[serde(skip)]
    pub resolution: Option<Resolution>,
}

pub fn cast_vote(
    world: &mut World,
    challenge_id: ChallengeId,
    player_id: PlayerId,
    decision: Decision,
    now: DateTime<Utc>,
) -> GameResult<VoteReceipt> {
    let (Some(challenge), Some(vote)) = (world.challenge(challenge_id), world.vote(challenge_id))
    else {
        return Err(GameError::ChallengeNotFound);
    };
    // The scheduler may have resolved it before this write got the lock.
    if vote.status != VoteStatus::Pending || challenge.status != ChallengeStatus::Pending {
        return Err(GameError::ChallengeNotFound);
    }
    if challenge.player_id == player_id {
        return Err(GameError::SelfVoteForbidden);
    }
    if world.player(player_id).is_none() {
        return Err(GameError::PlayerNotFound(player_id));
    }
    if vote.voters.contains(&player_id) {
        return Err(GameError::AlreadyVoted);
    }
    if vote.is_expired(now) {
        return Err(GameError::VoteExpired);
    }

    let eligible = world.players.len().saturating_sub(1);
    let vote = world
        .vote_mut(challenge_id)
        .ok_or(GameError::ChallengeNotFound)?;
    vote.voters.push(player_id);
    match decision {
        Decision::For => vote.votes_for += 1,
        Decision::Against => vote.votes_against += 1,
    }
    let snapshot = vote.clone();

    let Some(outcome) = tally_outcome(&snapshot, eligible) else {
        return Ok(VoteReceipt {
            vote: snapshot,
            vote_resolved: false,
            outcome: None,
            resolution: None,
        });
    };

    let resolution = resolve(world, challenge_id, outcome, now)?;
    let vote = resolution
        .as_ref()
        .map_or(snapshot, |r| r.vote.clone());
    Ok(VoteReceipt {
        vote,
        vote_resolved: true,
        outcome: Some(outcome),
        resolution,
    })
}

/// Apply `outcome` to the challenge's territory and players.
///
/// Returns `Ok(None)` if the challenge is unknown or already resolved.
/// Fails without touching state if the territory or challenger is missing.
pub fn resolve(
    world: &mut World,
    challenge_id: ChallengeId,
    outcome: Outcome,
    now: DateTime<Utc>,
) -> GameResult<Option<Resolution>> {
    let Some(challenge) = world.challenge(challenge_id) else {
        return Ok(None);
    };
    if challenge.status == ChallengeStatus::Resolved {
        return Ok(None);
    }
    let Some(vote) = world.vote(challenge_id) else {
        log::warn!("challenge {challenge_id} is pending without a vote; left untouched");
        return Ok(None);
    };

    let territory_id = challenge.territory_id.clone();
    let challenger_id = challenge.player_id;
    let template_id = challenge.challenge_template_id;
    let vote_created = vote.created_at;
    let mut final_vote = vote.clone();
    final_vote.status = VoteStatus::Resolved;

    let territory = world
        .territory(&territory_id)
        .ok_or_else(|| GameError::TerritoryNotFound(territory_id.clone()))?;
    let challenger = world
        .player(challenger_id)
        .ok_or(GameError::PlayerNotFound(challenger_id))?;
    let challenger_name = challenger.name.clone();
    let territory_name = territory.name.clone();
    let old_owner = territory.owner_id;
    let old_level = territory.level;
    let old_owner_name = old_owner.and_then(|id| world.player(id)).map(|p| p.name.clone());

    if let Some(c) = world.challenge_mut(challenge_id) {
        c.status = ChallengeStatus::Resolved;
    }
    if let Some(t) = world.territory_mut(&territory_id) {
        t.active_challenge_id = None;
    }

    let mut resolution = Resolution {
        challenge_id,
        outcome,
        winner_id: None,
        new_level: None,
        points_awarded: 0,
        vote: final_vote,
    };

    match outcome {
        Outcome::Approved => {
            let (new_level, message) = if old_owner != Some(challenger_id) {
                let msg = match &old_owner_name {
                    Some(victim) => format!(
                        "{challenger_name} stole territory {territory_name} from {victim}!"
                    ),
                    None => format!("{challenger_name} captured territory {territory_name}!"),
                };
                (1, Some(msg))
            } else if old_level < MAX_LEVEL {
                let lvl = old_level + 1;
                (
                    lvl,
                    Some(format!(
                        "{challenger_name} upgraded territory {territory_name} to level {lvl}."
                    )),
                )
            } else {
                (old_level, None)
            };

            let hours = duration_hours(vote_created, now);
            let points = points_per_hour(new_level) * hours;
            if let Some(p) = world.player_mut(challenger_id) {
                p.score += points;
            }
            if let Some(t) = world.territory_mut(&territory_id) {
                t.owner_id = Some(challenger_id);
                t.level = new_level;
            }
            if let Some(msg) = message {
                world.log_event(msg, now);
            }

            resolution.winner_id = Some(challenger_id);
            resolution.new_level = Some(new_level);
            resolution.points_awarded = points;
        }
        Outcome::Rejected => {
            world.log_event(
                format!(
                    "{challenger_name}'s challenge on territory {territory_name} was rejected by the other players."
                ),
                now,
            );
        }
    }

    if let Some(tpl) = world
        .template_mut(template_id)
        .filter(|t| t.assigned_to_territory_id.as_deref() == Some(territory_id.as_str()))
    {
        tpl.assigned_to_territory_id = None;
    }
    world.votes.retain(|v| v.challenge_id != challenge_id);

    log::info!(
        "challenge {challenge_id} on {territory_id} resolved {outcome:?} ({} points)",
        resolution.points_awarded
    );
    Ok(Some(resolution))
}

/// Resolve every pending vote whose window has closed, by plurality.
/// A failure on one vote is logged and does not stop the others.
pub fn resolve_expired(world: &mut World, now: DateTime<Utc>) -> ExpirySweep {
    let due: Vec<(ChallengeId, Outcome)> = world
        .votes
        .iter()
        .filter(|v| v.status == VoteStatus::Pending && v.expires_at < now)
        .map(|v| (v.challenge_id, v.plurality()))
        .collect();

    let mut sweep = ExpirySweep::default();
    for (challenge_id, outcome) in due {
        log::info!("vote on challenge {challenge_id} expired");
        match resolve(world, challenge_id, outcome, now) {
            Ok(Some(r)) => sweep.resolved.push(r),
            Ok(None) => {}
            Err(e) => {
                log::error!("could not resolve expired challenge {challenge_id}: {e}");
                sweep.failed.push(challenge_id);
            }
        }
    }
    sweep
}

#[derive(Debug, Default, Clone)]
pub struct ExpirySweep {
    pub resolved: Vec<Resolution>,
    pub failed: Vec<ChallengeId>,
}
