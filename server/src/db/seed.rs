//! Initial game document for an empty store.

use anyhow::Context;
use std::path::Path;

use crate::game::{
    types::{
        ChallengeEntry, ChallengeTemplate, Player, ProofKind, Region, TemplateStatus, Territory,
    },
    world::World,
};

/// Load a seed document from `path`, or fall back to [`default_world`].
pub async fn load(path: Option<&Path>) -> anyhow::Result<World> {
    match path {
        Some(p) => {
            let raw = tokio::fs::read_to_string(p)
                .await
                .with_context(|| format!("reading seed {}", p.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing seed {}", p.display()))
        }
        None => Ok(default_world()),
    }
}

fn territory(id: &str, name: &str, region: Region) -> Territory {
    Territory {
        id: id.to_owned(),
        name: name.to_owned(),
        region,
        level: 0,
        owner_id: None,
        active_challenge_id: None,
    }
}

fn template(id: u32, level: u8, proof_kind: ProofKind, title: &str, description: &str) -> ChallengeEntry {
    ChallengeEntry::Template(ChallengeTemplate {
        id,
        title: title.to_owned(),
        description: description.to_owned(),
        proof_kind,
        level,
        status: TemplateStatus::Available,
        assigned_to_territory_id: None,
    })
}

/// Ten unowned territories over the three regions, four players and a
/// small pool of templates per level.
pub fn default_world() -> World {
    let players = [
        (1, "Alice", "#e6194b"),
        (2, "Bastien", "#3cb44b"),
        (3, "Chloé", "#4363d8"),
        (4, "Dylan", "#f58231"),
    ]
    .into_iter()
    .map(|(id, name, color)| Player {
        id,
        name: name.to_owned(),
        color: color.to_owned(),
        score: 0,
    })
    .collect();

    let territories = vec![
        territory("C1", "Citadelle", Region::Coeur),
        territory("C2", "Forum", Region::Coeur),
        territory("O1", "Falaises", Region::Ouest),
        territory("O2", "Port", Region::Ouest),
        territory("O3", "Landes", Region::Ouest),
        territory("O4", "Phare", Region::Ouest),
        territory("E1", "Vignes", Region::Est),
        territory("E2", "Mines", Region::Est),
        territory("E3", "Col", Region::Est),
        territory("E4", "Forêt", Region::Est),
    ];

    let challenges = vec![
        template(1, 1, ProofKind::None, "Early bird", "Be up before 7am tomorrow."),
        template(2, 1, ProofKind::Text, "Recipe", "Cook something you have never cooked."),
        template(3, 1, ProofKind::Image, "Skyline", "Photograph a sunset."),
        template(4, 1, ProofKind::Link, "Playlist", "Share a ten-song playlist."),
        template(5, 2, ProofKind::Video, "Juggle", "Juggle three objects for ten seconds."),
        template(6, 2, ProofKind::Image, "Ten thousand", "Walk 10,000 steps in a day."),
        template(7, 2, ProofKind::Text, "Poem", "Write a four-line poem about the map."),
        template(8, 3, ProofKind::Video, "Handstand", "Hold a handstand for five seconds."),
        template(9, 3, ProofKind::Image, "Summit", "Reach a summit above 1,000m."),
        template(10, 3, ProofKind::Text, "Marathon week", "Run 42km over one week."),
    ];

    World {
        players,
        territories,
        challenges,
        votes: Vec::new(),
        events: Default::default(),
    }
}
