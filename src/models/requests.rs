use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for `POST /match`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchRequest {
    #[validate(length(min = 1, message = "at least one skill is required"))]
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "desiredRoles", alias = "desired_roles", default)]
    pub desired_roles: Option<Vec<String>>,
    #[serde(default)]
    pub location: Option<String>,
    #[validate(range(min = 0, message = "yearsExperience must not be negative"))]
    #[serde(rename = "yearsExperience", alias = "years_experience", default)]
    pub years_experience: Option<i64>,
    #[validate(range(min = 1, message = "top_k must be positive"))]
    #[serde(rename = "top_k", alias = "topK", default)]
    pub top_k: Option<i64>,
    #[serde(default)]
    pub filters: Option<MatchFilters>,
}

/// Optional narrowing applied on top of scoring, mirroring the jobs panel filters
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MatchFilters {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "remoteOnly", alias = "remote_only", default)]
    pub remote_only: bool,
    #[validate(range(min = 0.0, max = 100.0, message = "minMatch must be within [0, 100]"))]
    #[serde(rename = "minMatch", alias = "min_match", default)]
    pub min_match: Option<f64>,
}

/// Request body for `POST /search/adzuna`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdzunaSearchRequest {
    #[validate(length(min = 1))]
    #[serde(default = "default_query")]
    pub query: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[validate(range(min = 1, max = 50))]
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_query() -> String {
    "data scientist".to_string()
}

fn default_location() -> String {
    "johannesburg".to_string()
}

fn default_max_results() -> u32 {
    20
}

/// Query string for `GET /jobs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobsQuery {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "remoteOnly", alias = "remote_only", default)]
    pub remote_only: bool,
}
