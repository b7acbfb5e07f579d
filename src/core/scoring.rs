use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::core::normalizer::{CanonicalSkill, SkillNormalizer};
use crate::models::{ExperiencePolicy, JobPosting, LocationPolicy, RecencyPolicy, UserProfile};

const MAX_SCORE: f64 = 100.0;

/// Profile skills canonicalized once per request
#[derive(Debug, Clone)]
pub struct ProfileSkills {
    entries: Vec<(String, CanonicalSkill)>,
}

impl ProfileSkills {
    /// Blank skills are dropped and skills sharing a canonical token are
    /// collapsed to the first spelling given.
    pub fn new(normalizer: &SkillNormalizer, skills: &[String]) -> Self {
        let mut seen = HashSet::new();
        let entries = skills
            .iter()
            .map(|skill| (skill.clone(), normalizer.normalize(skill)))
            .filter(|(_, canonical)| !canonical.is_empty() && seen.insert(canonical.clone()))
            .collect();

        Self { entries }
    }

    fn any_overlap(&self, required: &CanonicalSkill) -> bool {
        self.entries.iter().any(|(_, canonical)| canonical.overlaps(required))
    }
}

/// Skill score (0-100) and the profile skills that matched
///
/// score = matched required skills / required skills * 100
///
/// Required skills are canonicalized, blank entries dropped and duplicates
/// collapsed before counting. No requirement scores 100.
pub fn skill_score(
    normalizer: &SkillNormalizer,
    profile_skills: &ProfileSkills,
    job: &JobPosting,
) -> (f64, Vec<String>) {
    let mut seen = HashSet::new();
    let required: Vec<CanonicalSkill> = job
        .required_skills
        .iter()
        .map(|skill| normalizer.normalize(skill))
        .filter(|canonical| !canonical.is_empty() && seen.insert(canonical.clone()))
        .collect();

    let matched_skills: Vec<String> = profile_skills
        .entries
        .iter()
        .filter(|(_, canonical)| required.iter().any(|r| canonical.overlaps(r)))
        .map(|(original, _)| original.clone())
        .collect();

    if required.is_empty() {
        return (MAX_SCORE, matched_skills);
    }

    let matched = required
        .iter()
        .filter(|r| profile_skills.any_overlap(r))
        .count();

    let score = matched as f64 / required.len() as f64 * MAX_SCORE;
    (clamp_score(score), matched_skills)
}

/// Experience score (0-100)
///
/// The ceiling is the job's stated minimum, or the configured saturation
/// point when the job states none. Scores rise linearly from the neutral
/// value at zero years to 100 at the ceiling. Absent data scores neutral.
#[inline]
pub fn experience_score(profile: &UserProfile, job: &JobPosting, policy: &ExperiencePolicy) -> f64 {
    let neutral = clamp_score(policy.neutral);

    let Some(years) = profile.years_experience else {
        return neutral;
    };

    let ceiling = job
        .min_years_experience
        .filter(|min| *min > 0)
        .unwrap_or(policy.saturation_years);

    if ceiling == 0 {
        return MAX_SCORE;
    }

    let ratio = (years as f64 / ceiling as f64).min(1.0);
    clamp_score(neutral + (MAX_SCORE - neutral) * ratio)
}

/// Location score (0-100)
///
/// Remote jobs and profiles without a location preference score 100. An
/// on-site job scores 100 when either location string contains the other
/// (case-insensitive), `policy.unknown` when the job has no location, and
/// `policy.mismatch` otherwise. No geodistance is involved.
#[inline]
pub fn location_score(profile: &UserProfile, job: &JobPosting, policy: &LocationPolicy) -> f64 {
    if job.remote {
        return MAX_SCORE;
    }

    let Some(wanted) = profile.location() else {
        return MAX_SCORE;
    };

    let job_location = job
        .location
        .as_deref()
        .map(str::trim)
        .filter(|loc| !loc.is_empty());

    let Some(job_location) = job_location else {
        return clamp_score(policy.unknown);
    };

    let wanted = wanted.to_lowercase();
    let job_location = job_location.to_lowercase();

    if job_location.contains(&wanted) || wanted.contains(&job_location) {
        MAX_SCORE
    } else {
        clamp_score(policy.mismatch)
    }
}

/// Recency score (0-100)
///
/// score = 100 * e^(-days / decay_days), with days counted in whole days
/// since posting. Future dates count as today; missing dates score neutral.
#[inline]
pub fn recency_score(job: &JobPosting, now: DateTime<Utc>, policy: &RecencyPolicy) -> f64 {
    let Some(posted) = job.posted_date else {
        return clamp_score(policy.neutral);
    };

    let days = (now - posted).num_days().max(0) as f64;
    let decay_days = policy.decay_days.max(f64::EPSILON);

    clamp_score(MAX_SCORE * (-days / decay_days).exp())
}

#[inline]
pub(crate) fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, MAX_SCORE)
}
