use amity_ledger::{ErrorKind, LedgerError};
use amity_shared::IdentityError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The ledger rejected the call.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Authentication failed: {0}")]
    Unauthorized(#[from] IdentityError),

    #[error("Call timestamp is outside the accepted window")]
    StaleCall,

    #[error("Call was already submitted")]
    ReplayedCall,

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl ServerError {
    /// Machine-readable error kind, reported alongside the reason string.
    pub fn kind(&self) -> serde_json::Value {
        match self {
            ServerError::Ledger(e) => serde_json::json!(e.kind()),
            ServerError::Unauthorized(_) => "unauthorized".into(),
            ServerError::StaleCall => "stale_call".into(),
            ServerError::ReplayedCall => "replayed_call".into(),
            ServerError::BadRequest(_) => "bad_request".into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ServerError::Ledger(e) => match e.kind() {
                ErrorKind::AlreadyRegistered | ErrorKind::AlreadyFriends => StatusCode::CONFLICT,
                ErrorKind::InvalidName | ErrorKind::InvalidMessage | ErrorKind::SelfFriendship => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ErrorKind::UnknownUser | ErrorKind::UnknownFriend => StatusCode::NOT_FOUND,
                ErrorKind::NotFriends => StatusCode::FORBIDDEN,
            },
            ServerError::Unauthorized(_) | ServerError::StaleCall => StatusCode::UNAUTHORIZED,
            ServerError::ReplayedCall => StatusCode::CONFLICT,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });

        (self.status(), axum::Json(body)).into_response()
    }
}
