use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{db::store::Store, game::world::World};

/// Volatile store for tests and throwaway games.
#[derive(Debug, Default)]
pub struct MemoryStore {
    world: RwLock<World>,
}

impl MemoryStore {
    pub fn new(world: World) -> Self {
        Self {
            world: RwLock::new(world),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load(&self) -> anyhow::Result<World> {
        Ok(self.world.read().await.clone())
    }

    async fn commit(&self, world: &World) -> anyhow::Result<()> {
        *self.world.write().await = world.clone();
        Ok(())
    }
}
