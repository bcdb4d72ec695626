//! Runtime configuration for the conquest server.

use once_cell::sync::Lazy;
use std::{env, path::PathBuf, str::FromStr};

/// Where the game document is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    File,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "file" => Ok(StoreBackend::File),
            "postgres" | "pg" => Ok(StoreBackend::Postgres),
            other => Err(format!("unknown store backend {other:?}")),
        }
    }
}

#[derive(Debug)]
pub struct Settings {
    pub server_addr: String,
    pub store_backend: StoreBackend,
    /// JSON document path for the file backend.
    pub db_path: PathBuf,
    pub database_url: Option<String>,
    /// Seed document used when the store is empty.
    pub seed_path: Option<PathBuf>,
    /// How long a vote stays open.
    pub vote_window_hours: i64,
    /// Seconds between expired-vote sweeps.
    pub expiry_tick_secs: u64,
    /// Seconds between point/bonus sweeps.
    pub scoring_tick_secs: u64,
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Settings {
    fn from_env() -> Self {
        Settings {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:3001".into()),
            store_backend: parsed("STORE_BACKEND", StoreBackend::File),
            db_path: env::var("DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| "db.json".into()),
            database_url: env::var("DATABASE_URL").ok(),
            seed_path: env::var("SEED_PATH").ok().map(PathBuf::from),
            vote_window_hours: parsed("VOTE_WINDOW_HOURS", 24),
            expiry_tick_secs: parsed("EXPIRY_TICK_SECS", 60).max(1),
            scoring_tick_secs: parsed("SCORING_TICK_SECS", 3600).max(1),
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
