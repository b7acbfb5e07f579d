// Route exports
pub mod jobs;
pub mod matches;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};

use crate::models::ErrorResponse;
use crate::services::MatchError;

pub use matches::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(matches::configure).configure(jobs::configure);
}

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(ErrorResponse {
                error: self.error.clone(),
                message: self.message.clone(),
                status_code: self.status_code,
            })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Map a service error onto the HTTP error body
pub(crate) fn match_error_response(err: &MatchError) -> HttpResponse {
    let (status, error) = match err {
        MatchError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
        MatchError::UpstreamUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "upstream_unavailable"),
        MatchError::SourceNotConfigured => (StatusCode::SERVICE_UNAVAILABLE, "source_not_configured"),
        MatchError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "persistence_error"),
    };

    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    } else {
        tracing::info!("Rejected request: {}", err);
    }

    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code: status.as_u16(),
    })
}
