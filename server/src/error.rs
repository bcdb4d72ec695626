//! Error type shared by the engine and the HTTP layer.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::game::types::{PlayerId, TemplateId};

#[derive(Error, Debug)]
pub enum GameError {
    #[error("territory not found: {0}")]
    TerritoryNotFound(String),

    #[error("player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("challenge template not found: {0}")]
    TemplateNotFound(TemplateId),

    #[error("vote or challenge not found")]
    ChallengeNotFound,

    #[error("territory or player not found")]
    TerritoryOrPlayerNotFound,

    #[error("territory is already at the maximum level")]
    MaxLevelReached,

    #[error("no level {level} challenge is available")]
    NoTemplateAvailable { level: u8 },

    #[error("a vote is already in progress on this territory")]
    TerritoryLocked,

    #[error("challenge template {0} was not offered for this territory")]
    TemplateMismatch(TemplateId),

    #[error("this challenge requires a proof (text and/or file)")]
    ProofRequired,

    #[error("you cannot vote on your own challenge")]
    SelfVoteForbidden,

    #[error("you have already voted")]
    AlreadyVoted,

    #[error("this vote has ended")]
    VoteExpired,

    #[error("attack points must be positive")]
    InvalidPoints,

    #[error("not enough points for this attack")]
    InsufficientPoints,

    #[error("store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

pub type GameResult<T> = Result<T, GameError>;

impl ResponseError for GameError {
    fn status_code(&self) -> StatusCode {
        match self {
            GameError::TerritoryNotFound(_)
            | GameError::PlayerNotFound(_)
            | GameError::TemplateNotFound(_)
            | GameError::ChallengeNotFound
            | GameError::TerritoryOrPlayerNotFound
            | GameError::MaxLevelReached
            | GameError::NoTemplateAvailable { .. } => StatusCode::NOT_FOUND,
            GameError::TerritoryLocked => StatusCode::CONFLICT,
            GameError::SelfVoteForbidden | GameError::AlreadyVoted | GameError::VoteExpired => {
                StatusCode::FORBIDDEN
            }
            GameError::TemplateMismatch(_)
            | GameError::ProofRequired
            | GameError::InvalidPoints
            | GameError::InsufficientPoints => StatusCode::BAD_REQUEST,
            GameError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // Don't leak store internals to clients.
            GameError::Store(_) => "internal server error".to_owned(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}
