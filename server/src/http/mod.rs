pub mod challenges;
pub mod game;
pub mod health;
pub mod players;
pub mod routes;
pub mod votes;
