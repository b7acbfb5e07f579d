// Unit tests for the scoring functions

use chrono::{Duration, TimeZone, Utc};
use jobmatch::core::{
    experience_score, location_score, matches_filter, normalize, recency_score, skill_score,
    skills_overlap, ProfileSkills, SkillNormalizer,
};
use jobmatch::models::{
    parse_posted_date, CorpusFilter, ExperiencePolicy, JobPosting, LocationPolicy, RecencyPolicy,
    UserProfile,
};

fn create_job(skills: &[&str]) -> JobPosting {
    let mut job = JobPosting::new("job-1", "Data Scientist");
    job.required_skills = skills.iter().map(|s| s.to_string()).collect();
    job
}

fn score_skills(profile: &[&str], required: &[&str]) -> (f64, Vec<String>) {
    let normalizer = SkillNormalizer::default();
    let profile: Vec<String> = profile.iter().map(|s| s.to_string()).collect();
    let profile_skills = ProfileSkills::new(&normalizer, &profile);
    skill_score(&normalizer, &profile_skills, &create_job(required))
}

#[test]
fn test_normalize_collapses_case_and_whitespace() {
    assert_eq!(normalize("  Machine   LEARNING ").as_str(), "machine learning");
    assert_eq!(normalize("ML"), normalize("machine learning"));
    assert_eq!(normalize("k8s").as_str(), "kubernetes");
    assert!(normalize("   ").is_empty());
}

#[test]
fn test_skills_overlap_is_bidirectional() {
    assert!(skills_overlap("SQL", "PostgreSQL"));
    assert!(skills_overlap("PostgreSQL", "sql"));
    assert!(skills_overlap("js", "JavaScript"));
    assert!(!skills_overlap("Python", "Java"));
    assert!(!skills_overlap("", "Python"));
}

#[test]
fn test_custom_synonyms_override() {
    let normalizer = SkillNormalizer::with_synonyms([("sklearn", "machine learning")]);
    assert_eq!(normalizer.normalize("sklearn").as_str(), "machine learning");
    assert!(normalizer.synonym_count() > 0);
}

#[test]
fn test_skill_score_partial_match() {
    let (score, matched) = score_skills(
        &["Python", "SQL", "Machine Learning"],
        &["Python", "Machine Learning", "SQL", "Data Analysis"],
    );

    assert_eq!(score, 75.0);
    assert_eq!(matched, vec!["Python", "SQL", "Machine Learning"]);
}

#[test]
fn test_skill_score_synonyms_and_duplicates() {
    // "ML" and "machine learning" are the same requirement
    let (score, matched) = score_skills(&["ml"], &["Machine Learning", "ML", "Rust"]);

    assert_eq!(score, 50.0);
    assert_eq!(matched, vec!["ml"]);
}

#[test]
fn test_skill_score_no_requirements() {
    let (score, matched) = score_skills(&["Python"], &[]);
    assert_eq!(score, 100.0);
    assert!(matched.is_empty());

    let (blank_only, _) = score_skills(&["Python"], &["", "  "]);
    assert_eq!(blank_only, 100.0);
}

#[test]
fn test_skill_score_no_overlap() {
    let (score, matched) = score_skills(&["Excel"], &["Rust", "Go"]);
    assert_eq!(score, 0.0);
    assert!(matched.is_empty());
}

#[test]
fn test_experience_neutral_when_missing() {
    let policy = ExperiencePolicy::default();
    let profile = UserProfile::with_skills(["Python"]);
    let job = create_job(&["Python"]);

    assert_eq!(experience_score(&profile, &job, &policy), 50.0);
}

#[test]
fn test_experience_saturates() {
    let policy = ExperiencePolicy::default();
    let mut profile = UserProfile::with_skills(["Python"]);
    let job = create_job(&["Python"]);

    profile.years_experience = Some(0);
    assert_eq!(experience_score(&profile, &job, &policy), 50.0);

    profile.years_experience = Some(5);
    assert_eq!(experience_score(&profile, &job, &policy), 100.0);

    profile.years_experience = Some(25);
    assert_eq!(experience_score(&profile, &job, &policy), 100.0);
}

#[test]
fn test_experience_uses_job_minimum() {
    let policy = ExperiencePolicy::default();
    let mut profile = UserProfile::with_skills(["Python"]);
    let mut job = create_job(&["Python"]);
    job.min_years_experience = Some(2);

    profile.years_experience = Some(1);
    assert_eq!(experience_score(&profile, &job, &policy), 75.0);

    profile.years_experience = Some(2);
    assert_eq!(experience_score(&profile, &job, &policy), 100.0);
}

#[test]
fn test_experience_monotonic() {
    let policy = ExperiencePolicy::default();
    let job = create_job(&["Python"]);
    let mut profile = UserProfile::with_skills(["Python"]);

    let mut previous = 0.0;
    for years in 0..12 {
        profile.years_experience = Some(years);
        let score = experience_score(&profile, &job, &policy);
        assert!(score >= previous, "score dropped at {} years", years);
        previous = score;
    }
}

#[test]
fn test_location_remote_and_unset() {
    let policy = LocationPolicy::default();
    let mut job = create_job(&[]);
    job.location = Some("Durban".to_string());
    job.remote = true;

    let mut profile = UserProfile::with_skills(["Python"]);
    profile.location = Some("Cape Town".to_string());
    assert_eq!(location_score(&profile, &job, &policy), 100.0);

    job.remote = false;
    profile.location = Some("   ".to_string());
    assert_eq!(location_score(&profile, &job, &policy), 100.0);
}

#[test]
fn test_location_substring_match() {
    let policy = LocationPolicy::default();
    let mut job = create_job(&[]);
    job.location = Some("Sandton, Johannesburg".to_string());

    let mut profile = UserProfile::with_skills(["Python"]);
    profile.location = Some("johannesburg".to_string());
    assert_eq!(location_score(&profile, &job, &policy), 100.0);

    profile.location = Some("Cape Town".to_string());
    assert_eq!(location_score(&profile, &job, &policy), 0.0);

    job.location = None;
    assert_eq!(location_score(&profile, &job, &policy), 50.0);
}

#[test]
fn test_recency_decay() {
    let policy = RecencyPolicy::default();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let mut job = create_job(&[]);

    job.posted_date = Some(now);
    assert_eq!(recency_score(&job, now, &policy), 100.0);

    job.posted_date = Some(now - Duration::days(30));
    let month_old = recency_score(&job, now, &policy);
    assert!((month_old - 100.0 * (-1.0f64).exp()).abs() < 1e-9);

    job.posted_date = Some(now + Duration::days(3));
    assert_eq!(recency_score(&job, now, &policy), 100.0);

    job.posted_date = None;
    assert_eq!(recency_score(&job, now, &policy), 50.0);
}

#[test]
fn test_recency_older_never_scores_higher() {
    let policy = RecencyPolicy::default();
    let now = Utc::now();
    let mut job = create_job(&[]);

    let mut previous = f64::MAX;
    for days in [0, 1, 7, 30, 90, 365] {
        job.posted_date = Some(now - Duration::days(days));
        let score = recency_score(&job, now, &policy);
        assert!(score <= previous);
        previous = score;
    }
}

#[test]
fn test_parse_posted_date_formats() {
    assert!(parse_posted_date("2024-05-01T10:00:00Z").is_some());
    assert!(parse_posted_date("2024-05-01T10:00:00").is_some());
    assert!(parse_posted_date("2024-05-01").is_some());
    assert!(parse_posted_date("1714557600").is_some());
    assert!(parse_posted_date("last tuesday").is_none());
    assert!(parse_posted_date("").is_none());
}

#[test]
fn test_filter_location_and_remote() {
    let mut job = create_job(&[]);
    job.location = Some("Cape Town".to_string());

    let by_city = CorpusFilter { location: Some("cape".to_string()), remote_only: false };
    assert!(matches_filter(&job, &by_city));

    let remote_only = CorpusFilter { location: None, remote_only: true };
    assert!(!matches_filter(&job, &remote_only));
}
