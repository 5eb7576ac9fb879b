use actix_web::{HttpResponse, ResponseError};
use goodwatch_core::GoodWatchError;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] GoodWatchError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        EngineError::Internal(err.to_string())
    }
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Core(err) => err.code(),
            EngineError::InvalidRequest(_) => "invalid_request",
            EngineError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for EngineError {
    fn error_response(&self) -> HttpResponse {
        let body = serde_json::json!({
            "error": self.code(),
            "error_description": self.to_string()
        });

        match self {
            EngineError::InvalidRequest(_) | EngineError::Core(GoodWatchError::ValidationError { .. }) => {
                HttpResponse::BadRequest().json(body)
            }
            EngineError::Core(GoodWatchError::CollaboratorError { .. }) => {
                HttpResponse::BadGateway().json(body)
            }
            EngineError::Core(GoodWatchError::InvariantViolation { .. })
            | EngineError::Core(GoodWatchError::ConfigurationError { .. })
            | EngineError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": self.code(),
                "error_description": "An internal error occurred"
            })),
        }
    }
}
