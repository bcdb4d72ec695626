#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use conquest_server::{
    db::{seed, MemoryStore, Store},
    game::{
        clock::ManualClock,
        lifecycle::Submission,
        types::{Challenge, Player, PlayerId, Proof, TemplateId},
        world::World,
        Engine,
    },
};
use std::sync::Arc;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
}

/// The default map and templates with `n` fresh players named P1..Pn.
pub fn world_with_players(n: u32) -> World {
    let mut w = seed::default_world();
    w.players = (1..=n)
        .map(|id| Player {
            id,
            name: format!("P{id}"),
            color: "#000000".into(),
            score: 0,
        })
        .collect();
    w
}

pub fn own(world: &mut World, territory: &str, owner: PlayerId, level: u8) {
    let t = world.territory_mut(territory).expect("territory in fixture");
    t.owner_id = Some(owner);
    t.level = level;
}

/// Hand `template_id` to `territory` as the allocator would.
pub fn reserve(world: &mut World, territory: &str, template_id: TemplateId) {
    let tpl = world.template_mut(template_id).expect("template in fixture");
    tpl.assigned_to_territory_id = Some(territory.into());
}

pub fn text_proof() -> Proof {
    Proof {
        text: Some("done it".into()),
        file: None,
    }
}

pub struct Harness {
    pub engine: Arc<Engine>,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
}

impl Harness {
    pub fn new(world: World) -> Self {
        let clock = Arc::new(ManualClock::new(t0()));
        let store = Arc::new(MemoryStore::new(world));
        let engine = Arc::new(Engine::new(
            store.clone(),
            clock.clone(),
            Duration::hours(24),
        ));
        Self {
            engine,
            clock,
            store,
        }
    }

    pub async fn world(&self) -> World {
        self.store.load().await.unwrap()
    }

    /// Allocate a template for `territory` and submit it as `player`.
    pub async fn challenge(&self, territory: &str, player: PlayerId) -> Challenge {
        let tpl = self.engine.challenge_template(territory).await.unwrap();
        self.engine
            .submit_challenge(Submission {
                territory_id: territory.into(),
                player_id: player,
                template_id: tpl.id,
                proof: text_proof(),
            })
            .await
            .unwrap()
    }
}

/// Reads from memory but refuses every write.
pub struct ReadOnlyStore(pub MemoryStore);

#[async_trait]
impl Store for ReadOnlyStore {
    async fn load(&self) -> anyhow::Result<World> {
        self.0.load().await
    }

    async fn commit(&self, _world: &World) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }
}

/// An engine over `store` with the fixture clock.
pub fn engine_over(store: Arc<dyn Store>) -> Arc<Engine> {
    Arc::new(Engine::new(
        store,
        Arc::new(ManualClock::new(t0())),
        Duration::hours(24),
    ))
}
