use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::GameError,
    game::{types::PlayerId, Engine},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackReq {
    pub attacker_id: PlayerId,
    pub points: u64,
}

/// POST /api/players/{target_id}/attack
#[post("/players/{target_id}/attack")]
pub async fn attack(
    path: web::Path<PlayerId>,
    info: web::Json<AttackReq>,
    engine: web::Data<Engine>,
) -> Result<HttpResponse, GameError> {
    let out = engine
        .attack(info.attacker_id, path.into_inner(), info.points)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "attack succeeded",
        "attackerNewScore": out.attacker_new_score,
        "targetNewScore": out.target_new_score,
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(attack);
}
