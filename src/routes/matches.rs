use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::models::{HealthResponse, MatchRequest, MatchResponse, RootResponse};
use crate::routes::match_error_response;
use crate::services::MatchService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MatchService>,
}

/// Configure the banner, health and match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(root))
        .route("/health", web::get().to(health_check))
        .route("/match", web::post().to(find_matches));
}

async fn root(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(RootResponse {
        message: "Job matching API".to_string(),
        status: "running".to_string(),
        jobs_loaded: state.service.jobs_loaded().await,
        adzuna_ready: state.service.adzuna_ready(),
    })
}

/// Health check endpoint
///
/// Degraded when a configured database does not answer.
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let database = state.service.database_healthy().await;

    let status = match database {
        Some(false) => "degraded",
        _ => "healthy",
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        jobs_loaded: state.service.jobs_loaded().await,
        database: database.map(|ok| if ok { "up" } else { "down" }.to_string()),
    })
}

/// Find matches endpoint
///
/// POST /match
///
/// Request body:
/// ```json
/// {
///   "skills": ["Python", "SQL"],
///   "desiredRoles": ["Data Scientist"],
///   "location": "Johannesburg",
///   "yearsExperience": 3,
///   "top_k": 10,
///   "filters": { "remoteOnly": false, "minMatch": 40 }
/// }
/// ```
async fn find_matches(state: web::Data<AppState>, req: web::Json<MatchRequest>) -> impl Responder {
    tracing::debug!(
        "Match request: {} skills, location={:?}, years={:?}, top_k={:?}",
        req.skills.len(),
        req.location,
        req.years_experience,
        req.top_k
    );

    match state.service.find_matches(&req).await {
        Ok(results) => HttpResponse::Ok().json(MatchResponse { results }),
        Err(e) => match_error_response(&e),
    }
}
