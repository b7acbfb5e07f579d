use serde::{Deserialize, Serialize};
use crate::models::domain::{Breakdown, JobPosting, MatchResult};

/// One ranked job in a match response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedJob {
    pub job: JobPosting,
    #[serde(rename = "matchPercent")]
    pub match_percent: f64,
    pub breakdown: Breakdown,
    #[serde(rename = "matchedSkills")]
    pub matched_skills: Vec<String>,
}

impl From<MatchResult<'_>> for RankedJob {
    fn from(result: MatchResult<'_>) -> Self {
        Self {
            job: result.job.clone(),
            match_percent: result.match_percent,
            breakdown: result.breakdown,
            matched_skills: result.matched_skills,
        }
    }
}

/// Response for the match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub results: Vec<RankedJob>,
}

/// Service banner for `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub jobs_loaded: usize,
    pub adzuna_ready: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub jobs_loaded: usize,
    pub database: Option<String>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub ingested: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobPosting>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdzunaSearchResponse {
    pub message: String,
    pub jobs_found: usize,
    pub jobs_ingested: usize,
}
