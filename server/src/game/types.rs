use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PlayerId = u32;
pub type TerritoryId = String;
pub type TemplateId = u32;
pub type ChallengeId = Uuid;

/// Highest level a territory can reach.
pub const MAX_LEVEL: u8 = 3;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
    pub score: u64,
}

/// Fixed map regions. Holding every territory of one grants a bonus each sweep.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    #[serde(rename = "Cœur")]
    Coeur,
    Ouest,
    Est,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Coeur, Region::Ouest, Region::Est];

    /// Points per sweep for full control of the region.
    pub fn bonus(self) -> u64 {
        match self {
            Region::Coeur => 3,
            Region::Ouest => 2,
            Region::Est => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Region::Coeur => "Cœur",
            Region::Ouest => "Ouest",
            Region::Est => "Est",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Territory {
    pub id: TerritoryId,
    pub name: String,
    pub region: Region,
    /// 0 = unowned, up to [`MAX_LEVEL`].
    pub level: u8,
    pub owner_id: Option<PlayerId>,
    /// Set while a challenge is pending; acts as the territory lock.
    pub active_challenge_id: Option<ChallengeId>,
}

impl Territory {
    pub fn is_locked(&self) -> bool {
        self.active_challenge_id.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProofKind {
    None,
    Text,
    Link,
    Image,
    Video,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStatus {
    Available,
    Retired,
}

/// A reusable challenge definition for one target level.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeTemplate {
    pub id: TemplateId,
    pub title: String,
    pub description: String,
    pub proof_kind: ProofKind,
    pub level: u8,
    pub status: TemplateStatus,
    #[serde(default)]
    pub assigned_to_territory_id: Option<TerritoryId>,
}

/// Proof attached to a submission. The file is an opaque blob reference.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Proof {
    pub text: Option<String>,
    pub file: Option<String>,
}

impl Proof {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.file.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Pending,
    Resolved,
}

/// A player's submitted attempt, with the template fields copied in.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: ChallengeId,
    pub territory_id: TerritoryId,
    pub player_id: PlayerId,
    pub proof: Proof,
    pub status: ChallengeStatus,
    pub created_at: DateTime<Utc>,
    pub challenge_template_id: TemplateId,
    pub title: String,
    pub description: String,
    pub proof_kind: ProofKind,
    pub level: u8,
}

/// Templates and submissions share the `challenges` collection; a
/// submission is recognised by its `playerId`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ChallengeEntry {
    Submitted(Challenge),
    Template(ChallengeTemplate),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    For,
    Against,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Approved,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VoteStatus {
    Pending,
    Resolved,
}

/// In-flight tally paired 1:1 with a pending challenge.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub challenge_id: ChallengeId,
    pub voters: Vec<PlayerId>,
    pub votes_for: u32,
    pub votes_against: u32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: VoteStatus,
}

impl Vote {
    /// Plurality outcome; a tie is a rejection.
    pub fn plurality(&self) -> Outcome {
        if self.votes_for > self.votes_against {
            Outcome::Approved
        } else {
            Outcome::Rejected
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: Uuid,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
