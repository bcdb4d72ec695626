//! Whole-document persistence behind the engine.

use async_trait::async_trait;

use crate::game::world::World;

/// A transactional document store holding one [`World`].
///
/// The engine serialises writers, so implementations only need each
/// `commit` to replace the stored document atomically.
#[async_trait]
pub trait Store: Send + Sync {
    async fn load(&self) -> anyhow::Result<World>;

    async fn commit(&self, world: &World) -> anyhow::Result<()>;

    /// Liveness probe used by `/healthz`.
    async fn ping(&self) -> anyhow::Result<()> {
        self.load().await.map(|_| ())
    }
}
