//! Jobmatch - job matching and ranking service
//!
//! Scores job postings against a candidate profile on skills, experience,
//! location and recency, and serves the ranked list over HTTP.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{normalize, skills_overlap, Ranker, SkillNormalizer};
pub use crate::models::{JobPosting, MatchRequest, MatchResponse, RankedJob, ScoringPolicy, ScoringWeights, UserProfile};
pub use crate::services::{JobCorpus, MatchService};
