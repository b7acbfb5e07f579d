use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::core::normalizer::SkillNormalizer;
use crate::core::scoring::{
    clamp_score, experience_score, location_score, recency_score, skill_score, ProfileSkills,
};
use crate::models::{Breakdown, JobPosting, MatchResult, ScoringPolicy, UserProfile};

/// Composite ranker - scores every job and orders the results
///
/// # Pipeline Stages
/// 1. Canonicalize the profile skills once
/// 2. Score skill, experience, location and recency per job
/// 3. Combine with the policy weights into `matchPercent`
/// 4. Drop results under the floor, stable-sort descending, truncate
#[derive(Debug, Clone)]
pub struct Ranker {
    policy: ScoringPolicy,
    normalizer: Arc<SkillNormalizer>,
}

impl Ranker {
    pub fn new(policy: ScoringPolicy, normalizer: SkillNormalizer) -> Self {
        Self {
            policy,
            normalizer: Arc::new(normalizer),
        }
    }

    pub fn with_default_policy() -> Self {
        Self::new(ScoringPolicy::default(), SkillNormalizer::default())
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn normalizer(&self) -> &SkillNormalizer {
        &self.normalizer
    }

    /// Score a single job against a profile
    pub fn score_job<'a>(
        &self,
        profile: &UserProfile,
        profile_skills: &ProfileSkills,
        job: &'a JobPosting,
        now: DateTime<Utc>,
    ) -> MatchResult<'a> {
        let (skill, matched_skills) = skill_score(&self.normalizer, profile_skills, job);

        let breakdown = Breakdown {
            skill,
            experience: experience_score(profile, job, &self.policy.experience),
            location: location_score(profile, job, &self.policy.location),
            recency: recency_score(job, now, &self.policy.recency),
        };

        MatchResult {
            job,
            match_percent: self.composite(&breakdown),
            breakdown,
            matched_skills,
        }
    }

    /// Weighted combination of the breakdown, clamped to [0, 100]
    pub fn composite(&self, breakdown: &Breakdown) -> f64 {
        let weights = &self.policy.weights;

        clamp_score(
            breakdown.skill * weights.skill
                + breakdown.experience * weights.experience
                + breakdown.location * weights.location
                + breakdown.recency * weights.recency,
        )
    }

    /// Rank jobs for a profile against the current time
    pub fn rank<'a, I>(&self, profile: &UserProfile, jobs: I, top_k: usize) -> Vec<MatchResult<'a>>
    where
        I: IntoIterator<Item = &'a JobPosting>,
    {
        self.rank_at(profile, jobs, top_k, None, Utc::now())
    }

    /// Rank jobs for a profile at a fixed instant
    ///
    /// # Arguments
    /// * `profile` - The validated user profile
    /// * `jobs` - Candidate postings in corpus order
    /// * `top_k` - Maximum number of results
    /// * `min_match` - Results below this `matchPercent` are dropped before truncation
    /// * `now` - Reference time for recency
    ///
    /// # Returns
    /// Results sorted by `matchPercent` descending; equal scores keep corpus order
    pub fn rank_at<'a, I>(
        &self,
        profile: &UserProfile,
        jobs: I,
        top_k: usize,
        min_match: Option<f64>,
        now: DateTime<Utc>,
    ) -> Vec<MatchResult<'a>>
    where
        I: IntoIterator<Item = &'a JobPosting>,
    {
        let profile_skills = ProfileSkills::new(&self.normalizer, &profile.skills);
        let floor = min_match.unwrap_or(0.0);

        let mut results: Vec<MatchResult<'a>> = jobs
            .into_iter()
            .map(|job| self.score_job(profile, &profile_skills, job, now))
            .filter(|result| result.match_percent >= floor)
            .collect();

        // sort_by is stable, so ties keep their corpus order
        results.sort_by(|a, b| b.match_percent.total_cmp(&a.match_percent));
        results.truncate(top_k);

        results
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_default_policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_job(id: &str, skills: &[&str], remote: bool, posted: Option<DateTime<Utc>>) -> JobPosting {
        let mut job = JobPosting::new(id, format!("Job {}", id));
        job.required_skills = skills.iter().map(|s| s.to_string()).collect();
        job.remote = remote;
        job.posted_date = posted;
        job
    }

    fn create_profile() -> UserProfile {
        let mut profile = UserProfile::with_skills(["Python", "SQL", "Machine Learning"]);
        profile.years_experience = Some(0);
        profile.top_k = 20;
        profile
    }

    #[test]
    fn test_composite_with_default_weights() {
        let ranker = Ranker::with_default_policy();
        let now = Utc::now();
        let jobs = vec![create_job(
            "1",
            &["Python", "Machine Learning", "SQL", "Data Analysis"],
            true,
            Some(now),
        )];

        let results = ranker.rank_at(&create_profile(), &jobs, 20, None, now);

        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.breakdown.skill, 75.0);
        assert_eq!(result.breakdown.experience, 50.0);
        assert_eq!(result.breakdown.location, 100.0);
        assert_eq!(result.breakdown.recency, 100.0);
        assert!((result.match_percent - 77.5).abs() < 1e-9);
    }

    #[test]
    fn test_sorted_descending() {
        let ranker = Ranker::with_default_policy();
        let now = Utc::now();
        let jobs = vec![
            create_job("low", &["Java", "Spring"], false, Some(now - Duration::days(60))),
            create_job("high", &["Python", "SQL"], true, Some(now)),
            create_job("mid", &["Python", "Go"], true, Some(now - Duration::days(10))),
        ];

        let results = ranker.rank_at(&create_profile(), &jobs, 10, None, now);
        let ids: Vec<&str> = results.iter().map(|r| r.job.id.as_str()).collect();

        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let ranker = Ranker::with_default_policy();
        let now = Utc::now();
        let jobs: Vec<JobPosting> = ["c", "a", "b"]
            .iter()
            .map(|id| create_job(id, &["Python"], true, Some(now)))
            .collect();

        let results = ranker.rank_at(&create_profile(), &jobs, 10, None, now);
        let ids: Vec<&str> = results.iter().map(|r| r.job.id.as_str()).collect();

        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_respects_top_k_and_floor() {
        let ranker = Ranker::with_default_policy();
        let now = Utc::now();
        let jobs: Vec<JobPosting> = (0..20)
            .map(|i| create_job(&i.to_string(), &["Python", "Rust"], i % 2 == 0, Some(now)))
            .collect();

        assert_eq!(ranker.rank_at(&create_profile(), &jobs, 5, None, now).len(), 5);

        let mut profile = create_profile();
        profile.location = Some("Nowhere".to_string());
        let remote_only = ranker.rank_at(&profile, &jobs, 50, Some(60.0), now);
        assert_eq!(remote_only.len(), 10);
        assert!(remote_only.iter().all(|r| r.job.remote));
    }

    #[test]
    fn test_does_not_mutate_input() {
        let ranker = Ranker::with_default_policy();
        let now = Utc::now();
        let jobs = vec![
            create_job("1", &["Rust"], false, None),
            create_job("2", &["Python"], true, Some(now)),
        ];
        let before = jobs.clone();

        let _ = ranker.rank_at(&create_profile(), &jobs, 1, None, now);

        assert_eq!(jobs, before);
    }
}
