//! Read endpoints: full game state and the event log.

use actix_web::{get, web, HttpResponse};

use crate::{error::GameError, game::Engine};

/// GET /api/game
#[get("/game")]
pub async fn game_state(engine: web::Data<Engine>) -> Result<HttpResponse, GameError> {
    Ok(HttpResponse::Ok().json(engine.game_state().await?))
}

/// GET /api/events (most recent first)
#[get("/events")]
pub async fn events(engine: web::Data<Engine>) -> Result<HttpResponse, GameError> {
    Ok(HttpResponse::Ok().json(engine.events().await?))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(game_state).service(events);
}
