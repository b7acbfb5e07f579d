// Core algorithm exports
pub mod filters;
pub mod normalizer;
pub mod ranker;
pub mod scoring;

pub use filters::{filter_jobs, matches_filter};
pub use normalizer::{normalize, skills_overlap, CanonicalSkill, SkillNormalizer};
pub use ranker::Ranker;
pub use scoring::{experience_score, location_score, recency_score, skill_score, ProfileSkills};
