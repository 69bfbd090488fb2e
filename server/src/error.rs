use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use holdem_engine::EngineError;

/// Transport-level failures that never come out of the engine, kept
/// separate from `EngineError` per the propagation policy: the server
/// maps engine errors onto status codes, it never invents new engine
/// variants.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no table with that id")]
    TableNotFound,
    #[error("missing or incorrect X-Admin-Token header")]
    Unauthorized,
    #[error("subscription closed before a snapshot arrived")]
    SubscriptionClosed,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl IntoResponse for TransportError {
    fn into_response(self) -> Response {
        let status = match &self {
            TransportError::TableNotFound => StatusCode::NOT_FOUND,
            TransportError::Unauthorized => StatusCode::UNAUTHORIZED,
            TransportError::SubscriptionClosed => StatusCode::SERVICE_UNAVAILABLE,
            TransportError::Engine(EngineError::UnknownSeat) => StatusCode::NOT_FOUND,
            TransportError::Engine(EngineError::NotYourTurn)
            | TransportError::Engine(EngineError::WrongPhase)
            | TransportError::Engine(EngineError::IllegalAction(_))
            | TransportError::Engine(EngineError::TableFull)
            | TransportError::Engine(EngineError::InsufficientPlayers)
            | TransportError::Engine(EngineError::DeckExhausted) => StatusCode::BAD_REQUEST,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
