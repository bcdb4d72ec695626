//! Challenge submission: creates the challenge and its vote, and locks the
//! territory until resolution.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{GameError, GameResult},
    game::{
        allocator::target_level,
        types::{
            Challenge, ChallengeEntry, ChallengeStatus, PlayerId, Proof, ProofKind, TemplateId,
            TemplateStatus, Vote, VoteStatus,
        },
        world::World,
    },
};

/// Proof as clients send it: the `{text, file}` object, or a bare string
/// from older clients.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum RawProof {
    Legacy(String),
    Structured {
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        file: Option<String>,
    },
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

impl From<RawProof> for Proof {
    fn from(raw: RawProof) -> Self {
        match raw {
            RawProof::Legacy(s) if s.starts_with("/uploads/") => Proof {
                text: None,
                file: Some(s),
            },
            RawProof::Legacy(s) => Proof {
                text: non_empty(Some(s)),
                file: None,
            },
            RawProof::Structured { text, file } => Proof {
                text: non_empty(text),
                file: non_empty(file),
            },
        }
    }
}

/// Everything a submission needs besides the current state.
#[derive(Debug, Clone)]
pub struct Submission {
    pub territory_id: String,
    pub player_id: PlayerId,
    pub template_id: TemplateId,
    pub proof: Proof,
}

pub fn submit(
    world: &mut World,
    sub: Submission,
    now: DateTime<Utc>,
    vote_window: Duration,
) -> GameResult<Challenge> {
    let (Some(territory), Some(player)) =
        (world.territory(&sub.territory_id), world.player(sub.player_id))
    else {
        return Err(GameError::TerritoryOrPlayerNotFound);
    };
    if territory.is_locked() {
        return Err(GameError::TerritoryLocked);
    }
    let template = world
        .template(sub.template_id)
        .ok_or(GameError::TemplateNotFound(sub.template_id))?;
    // Only the template handed out for this territory, at its next level.
    if template.status != TemplateStatus::Available
        || template.assigned_to_territory_id.as_deref() != Some(sub.territory_id.as_str())
        || template.level != target_level(territory)?
    {
        return Err(GameError::TemplateMismatch(template.id));
    }
    if template.proof_kind != ProofKind::None && sub.proof.is_empty() {
        return Err(GameError::ProofRequired);
    }

    let message = format!(
        "{} launched a challenge on territory {}.",
        player.name, territory.name
    );
    let challenge = Challenge {
        id: Uuid::new_v4(),
        territory_id: sub.territory_id.clone(),
        player_id: sub.player_id,
        proof: sub.proof,
        status: ChallengeStatus::Pending,
        created_at: now,
        challenge_template_id: template.id,
        title: template.title.clone(),
        description: template.description.clone(),
        proof_kind: template.proof_kind,
        level: template.level,
    };
    let vote = Vote {
        challenge_id: challenge.id,
        voters: Vec::new(),
        votes_for: 0,
        votes_against: 0,
        created_at: now,
        expires_at: now + vote_window,
        status: VoteStatus::Pending,
    };

    if let Some(t) = world.territory_mut(&sub.territory_id) {
        t.active_challenge_id = Some(challenge.id);
    }
    world
        .challenges
        .push(ChallengeEntry::Submitted(challenge.clone()));
    world.votes.push(vote);
    world.log_event(message, now);

    log::info!(
        "challenge {} submitted on {} by player {}",
        challenge.id,
        challenge.territory_id,
        challenge.player_id
    );
    Ok(challenge)
}
