//! Postgres-backed store: the game document lives in one JSONB row.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};

use crate::{db::store::Store, game::world::World};

const DOC_ID: &str = "game";

#[derive(Debug, Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    /// Connect, create the table if needed and insert `seed` when no
    /// document exists yet.
    pub async fn connect(database_url: &str, seed: World) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("connecting to Postgres")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS game_documents (
                id         TEXT PRIMARY KEY,
                body       JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&db)
        .await
        .context("creating game_documents")?;

        sqlx::query(
            r#"INSERT INTO game_documents (id, body)
               VALUES ($1, $2)
               ON CONFLICT (id) DO NOTHING"#,
        )
        .bind(DOC_ID)
        .bind(Json(&seed))
        .execute(&db)
        .await
        .context("seeding game document")?;

        Ok(Self { db })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn load(&self) -> anyhow::Result<World> {
        let Json(world) = sqlx::query_scalar::<_, Json<World>>(
            "SELECT body FROM game_documents WHERE id = $1",
        )
        .bind(DOC_ID)
        .fetch_one(&self.db)
        .await
        .context("loading game document")?;
        Ok(world)
    }

    async fn commit(&self, world: &World) -> anyhow::Result<()> {
        let mut tx = self.db.begin().await.context("opening transaction")?;
        sqlx::query("UPDATE game_documents SET body = $2, updated_at = now() WHERE id = $1")
            .bind(DOC_ID)
            .bind(Json(world))
            .execute(&mut *tx)
            .await
            .context("writing game document")?;
        tx.commit().await.context("committing game document")?;
        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.db)
            .await
            .context("pinging Postgres")?;
        Ok(())
    }
}
