use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

/// Domain-specific error types for the desk service.
/// Callers must be able to tell a rejected input apart from a price:
/// - Validation and InvalidOptionType are user mistakes (400)
/// - Provider/Network/Parse come from the calendar provider (502)
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid option type: {0}")]
    InvalidOptionType(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("calendar provider error: {status} {body}")]
    Provider { status: u16, body: String },

    #[error("export error: {0}")]
    Export(String),

    #[error("config error: {0}")]
    Config(String),
}

impl DeskError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InvalidOptionType(_) => "invalid_option_type",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Provider { .. } => "provider",
            Self::Export(_) => "export",
            Self::Config(_) => "config",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidOptionType(_) => StatusCode::BAD_REQUEST,
            Self::Network(_) | Self::Parse(_) | Self::Provider { .. } => StatusCode::BAD_GATEWAY,
            Self::Export(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[inline]
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidOptionType(_))
    }
}

impl From<reqwest::Error> for DeskError {
    fn from(e: reqwest::Error) -> Self {
        DeskError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(e: serde_json::Error) -> Self {
        DeskError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for DeskError {
    fn from(e: std::io::Error) -> Self {
        DeskError::Export(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for DeskError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        DeskError::Export(format!("xlsx: {e}"))
    }
}

impl From<csv::Error> for DeskError {
    fn from(e: csv::Error) -> Self {
        DeskError::Export(format!("csv: {e}"))
    }
}

impl IntoResponse for DeskError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
