use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use crate::database::StoreError;

#[derive(Debug)]
pub enum ApiError {
    /// Banco inacessível (conexão, seleção de servidor, DNS)
    Connection(String),
    NotFound(String),
    /// A operação chegou ao banco mas falhou
    StoreIo(String),
    MalformedInput(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Connection(msg) => write!(f, "Connection error: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::StoreIo(msg) => write!(f, "Store error: {}", msg),
            ApiError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Connection(msg) => ApiError::Connection(msg),
            StoreError::Io(msg) => ApiError::StoreIo(msg),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Connection(_) | ApiError::StoreIo(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Nunca expõe detalhes internos para o cliente
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::NotFound(_) => "User not found".to_string(),
            ApiError::MalformedInput(msg) => msg.clone(),
            ApiError::Connection(_) | ApiError::StoreIo(_) => "Internal Server Error".to_string(),
        };

        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(body)
    }
}
