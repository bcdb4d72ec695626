use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use chrono::Duration as ChronoDuration;
use conquest_server::{
    config::{settings, StoreBackend},
    db::{seed, JsonFileStore, MemoryStore, PgStore, Store},
    game::{clock::SystemClock, Engine},
    http, metrics, scheduler,
};
use std::{sync::Arc, time::Duration};

async fn open_store() -> anyhow::Result<Arc<dyn Store>> {
    let cfg = settings();
    let seed = seed::load(cfg.seed_path.as_deref()).await?;
    let store: Arc<dyn Store> = match cfg.store_backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new(seed)),
        StoreBackend::File => Arc::new(JsonFileStore::open(&cfg.db_path, seed).await?),
        StoreBackend::Postgres => {
            let url = cfg
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the postgres backend")?;
            Arc::new(PgStore::connect(url, seed).await?)
        }
    };
    Ok(store)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cfg = settings();
    log::info!(
        "starting on {} with the {:?} store",
        cfg.server_addr,
        cfg.store_backend
    );

    let store = open_store().await?;
    let engine = Arc::new(Engine::new(
        store,
        Arc::new(SystemClock),
        ChronoDuration::hours(cfg.vote_window_hours),
    ));

    // Start the background expiry & scoring loop
    scheduler::start(
        engine.clone(),
        Duration::from_secs(cfg.expiry_tick_secs),
        Duration::from_secs(cfg.scoring_tick_secs),
    );

    let data = web::Data::from(engine);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .app_data(data.clone())
            .configure(http::routes::init_routes)
    })
    .bind(&cfg.server_addr)?
    .run()
    .await?;
    Ok(())
}
