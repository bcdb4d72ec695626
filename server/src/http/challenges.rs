//! Challenge endpoints: template allocation and proof submission.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::GameError,
    game::{
        lifecycle::{RawProof, Submission},
        types::{PlayerId, TemplateId},
        Engine,
    },
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReq {
    pub territory_id: String,
    pub player_id: PlayerId,
    pub challenge_template_id: TemplateId,
    #[serde(default)]
    pub proof: Option<RawProof>,
    /// Flat form used by older clients.
    #[serde(default)]
    pub proof_text: Option<String>,
    #[serde(default)]
    pub proof_file: Option<String>,
}

impl From<SubmitReq> for Submission {
    fn from(req: SubmitReq) -> Self {
        let raw = req.proof.unwrap_or(RawProof::Structured {
            text: req.proof_text,
            file: req.proof_file,
        });
        Submission {
            territory_id: req.territory_id,
            player_id: req.player_id,
            template_id: req.challenge_template_id,
            proof: raw.into(),
        }
    }
}

/// GET /api/territories/{id}/challenge-template
#[get("/territories/{territory_id}/challenge-template")]
pub async fn challenge_template(
    path: web::Path<String>,
    engine: web::Data<Engine>,
) -> Result<HttpResponse, GameError> {
    let territory_id = path.into_inner();
    let template = engine.challenge_template(&territory_id).await?;
    Ok(HttpResponse::Ok().json(template))
}

/// POST /api/challenges
#[post("/challenges")]
pub async fn submit(
    info: web::Json<SubmitReq>,
    engine: web::Data<Engine>,
) -> Result<HttpResponse, GameError> {
    let challenge = engine.submit_challenge(info.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "challenge submitted and vote opened",
        "challenge": challenge,
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(challenge_template).service(submit);
}
