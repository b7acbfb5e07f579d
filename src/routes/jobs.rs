use actix_web::{web, HttpResponse, Responder};

use crate::models::{
    AdzunaSearchRequest, AdzunaSearchResponse, CorpusFilter, IngestResponse, JobPosting, JobsQuery,
    JobsResponse,
};
use crate::routes::{match_error_response, AppState};

/// Configure corpus routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/ingest", web::post().to(ingest_jobs))
        .route("/jobs", web::get().to(list_jobs))
        .route("/search/adzuna", web::post().to(search_adzuna));
}

/// Ingest postings
///
/// POST /ingest
///
/// Body is a JSON array of postings. Ids already in the corpus are skipped.
async fn ingest_jobs(state: web::Data<AppState>, jobs: web::Json<Vec<JobPosting>>) -> impl Responder {
    match state.service.ingest(jobs.into_inner()).await {
        Ok(ingested) => HttpResponse::Ok().json(IngestResponse { ingested }),
        Err(e) => match_error_response(&e),
    }
}

/// GET /jobs?location=...&remoteOnly=true
async fn list_jobs(state: web::Data<AppState>, query: web::Query<JobsQuery>) -> impl Responder {
    let query = query.into_inner();
    let filter = CorpusFilter {
        location: query.location,
        remote_only: query.remote_only,
    };

    let jobs = state.service.list_jobs(&filter).await;
    let total = jobs.len();

    HttpResponse::Ok().json(JobsResponse { jobs, total })
}

/// Fetch postings from Adzuna into the corpus
///
/// POST /search/adzuna
///
/// Request body:
/// ```json
/// { "query": "data scientist", "location": "johannesburg", "max_results": 20 }
/// ```
async fn search_adzuna(
    state: web::Data<AppState>,
    req: web::Json<AdzunaSearchRequest>,
) -> impl Responder {
    match state.service.search_adzuna(&req).await {
        Ok(outcome) => HttpResponse::Ok().json(AdzunaSearchResponse {
            message: format!("Found {} jobs, ingested {} new", outcome.found, outcome.ingested),
            jobs_found: outcome.found,
            jobs_ingested: outcome.ingested,
        }),
        Err(e) => match_error_response(&e),
    }
}
