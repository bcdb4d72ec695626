//! The persisted game document and its lookup helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::game::types::*;

/// Whole-game state, read and written as one document.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct World {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub territories: Vec<Territory>,
    #[serde(default)]
    pub challenges: Vec<ChallengeEntry>,
    #[serde(default)]
    pub votes: Vec<Vote>,
    /// Most recent first.
    #[serde(default)]
    pub events: VecDeque<Event>,
}

/// Read view returned by `GET /game`.
#[derive(Debug, Serialize, Clone)]
pub struct GameState {
    pub players: Vec<Player>,
    pub territories: Vec<Territory>,
    pub challenges: Vec<ChallengeEntry>,
    pub votes: Vec<Vote>,
}

impl From<World> for GameState {
    fn from(w: World) -> Self {
        GameState {
            players: w.players,
            territories: w.territories,
            challenges: w.challenges,
            votes: w.votes,
        }
    }
}

impl World {
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn territory(&self, id: &str) -> Option<&Territory> {
        self.territories.iter().find(|t| t.id == id)
    }

    pub fn territory_mut(&mut self, id: &str) -> Option<&mut Territory> {
        self.territories.iter_mut().find(|t| t.id == id)
    }

    pub fn templates(&self) -> impl Iterator<Item = &ChallengeTemplate> {
        self.challenges.iter().filter_map(|c| match c {
            ChallengeEntry::Template(t) => Some(t),
            ChallengeEntry::Submitted(_) => None,
        })
    }

    pub fn template(&self, id: TemplateId) -> Option<&ChallengeTemplate> {
        self.templates().find(|t| t.id == id)
    }

    pub fn template_mut(&mut self, id: TemplateId) -> Option<&mut ChallengeTemplate> {
        self.challenges.iter_mut().find_map(|c| match c {
            ChallengeEntry::Template(t) if t.id == id => Some(t),
            _ => None,
        })
    }

    pub fn submissions(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.iter().filter_map(|c| match c {
            ChallengeEntry::Submitted(s) => Some(s),
            ChallengeEntry::Template(_) => None,
        })
    }

    pub fn challenge(&self, id: ChallengeId) -> Option<&Challenge> {
        self.submissions().find(|c| c.id == id)
    }

    pub fn challenge_mut(&mut self, id: ChallengeId) -> Option<&mut Challenge> {
        self.challenges.iter_mut().find_map(|c| match c {
            ChallengeEntry::Submitted(s) if s.id == id => Some(s),
            _ => None,
        })
    }

    pub fn vote(&self, challenge_id: ChallengeId) -> Option<&Vote> {
        self.votes.iter().find(|v| v.challenge_id == challenge_id)
    }

    pub fn vote_mut(&mut self, challenge_id: ChallengeId) -> Option<&mut Vote> {
        self.votes.iter_mut().find(|v| v.challenge_id == challenge_id)
    }

    /// Append to the event log (newest at the front).
    pub fn log_event(&mut self, message: impl Into<String>, at: DateTime<Utc>) {
        self.events.push_front(Event {
            id: Uuid::new_v4(),
            message: message.into(),
            timestamp: at,
        });
    }
}
