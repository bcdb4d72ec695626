//! `db.json`-style store: the whole game in one pretty-printed JSON file.

use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

use crate::{db::store::Store, game::world::World};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open `path`, writing `seed` there first if the file does not exist.
    pub async fn open(path: impl Into<PathBuf>, seed: World) -> anyhow::Result<Self> {
        let store = Self { path: path.into() };
        if fs::try_exists(&store.path)
            .await
            .with_context(|| format!("checking {}", store.path.display()))?
        {
            // Fail fast on a corrupt document rather than on the first request.
            store.load().await?;
        } else {
            log::info!("initialising {} from seed", store.path.display());
            store.commit(&seed).await?;
        }
        Ok(store)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn load(&self) -> anyhow::Result<World> {
        let raw = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", self.path.display()))
    }

    async fn commit(&self, world: &World) -> anyhow::Result<()> {
        let body = serde_json::to_vec_pretty(world).context("serialising world")?;
        let tmp = self.tmp_path();
        fs::write(&tmp, body)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        // rename is atomic, so readers see either the old or the new document
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}
