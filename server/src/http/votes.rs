use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::GameError,
    game::{
        types::{Decision, Outcome, PlayerId, Vote},
        Engine,
    },
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReq {
    pub player_id: PlayerId,
    pub decision: Decision,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoteResp {
    message: &'static str,
    vote: Vote,
    vote_resolved: bool,
    outcome: Option<Outcome>,
}

/// POST /api/votes/{challenge_id}/vote
#[post("/votes/{challenge_id}/vote")]
pub async fn cast(
    path: web::Path<Uuid>,
    info: web::Json<VoteReq>,
    engine: web::Data<Engine>,
) -> Result<HttpResponse, GameError> {
    let receipt = engine
        .cast_vote(path.into_inner(), info.player_id, info.decision)
        .await?;
    Ok(HttpResponse::Ok().json(VoteResp {
        message: "vote recorded",
        vote: receipt.vote,
        vote_resolved: receipt.vote_resolved,
        outcome: receipt.outcome,
    }))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(cast);
}
