//! Territory-control game server: challenges resolved by peer vote,
//! retroactive payouts and periodic scoring.

pub mod config;
pub mod db;
pub mod error;
pub mod game;
pub mod http;
pub mod metrics;
pub mod scheduler;
