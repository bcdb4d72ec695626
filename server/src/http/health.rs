//! Liveness probe and game counters.

use actix_web::{get, web, HttpResponse, Responder};

use crate::{game::Engine, metrics};

#[get("/healthz")]
pub async fn healthz(engine: web::Data<Engine>) -> impl Responder {
    if let Err(e) = engine.store().ping().await {
        log::warn!("health check failed: {e:#}");
        return HttpResponse::ServiceUnavailable().body("store");
    }
    HttpResponse::Ok().body("ok")
}

#[get("/metrics")]
pub async fn game_metrics() -> impl Responder {
    match metrics::render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            log::error!("rendering metrics failed: {e:#}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz).service(game_metrics);
}
