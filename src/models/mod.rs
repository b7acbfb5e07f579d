// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    parse_posted_date, Breakdown, CorpusFilter, ExperiencePolicy, JobPosting, LocationPolicy,
    MatchResult, RecencyPolicy, ScoringPolicy, ScoringWeights, UserProfile,
};
pub use requests::{AdzunaSearchRequest, JobsQuery, MatchFilters, MatchRequest};
pub use responses::{
    AdzunaSearchResponse, ErrorResponse, HealthResponse, IngestResponse, JobsResponse,
    MatchResponse, RankedJob, RootResponse,
};
