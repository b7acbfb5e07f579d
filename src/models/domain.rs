use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Job posting held in the matching corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "requiredSkills", alias = "required_skills", default)]
    pub required_skills: Vec<String>,
    #[serde(
        rename = "minYearsExperience",
        alias = "min_years_experience",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub min_years_experience: Option<u32>,
    #[serde(
        rename = "postedDate",
        alias = "posted_date",
        default,
        deserialize_with = "deserialize_posted_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub posted_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub remote: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl JobPosting {
    /// Minimal posting with only the required fields set
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company: None,
            location: None,
            job_type: None,
            salary: None,
            description: None,
            required_skills: Vec::new(),
            min_years_experience: None,
            posted_date: None,
            remote: false,
            url: None,
        }
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD`, naive `YYYY-MM-DDTHH:MM:SS`, or Unix seconds.
/// Anything else becomes `None` so one malformed posting never fails a batch.
fn deserialize_posted_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(serde_json::Value::String(raw)) => parse_posted_date(&raw),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    })
}

/// Parse a posting date in any of the formats job sources send
pub fn parse_posted_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }

    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// Profile of the job seeker for a single match request
///
/// Built from a validated request; `skills` is already deduplicated by
/// canonical token and free of blank entries.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub skills: Vec<String>,
    pub desired_roles: Vec<String>,
    pub location: Option<String>,
    pub years_experience: Option<u32>,
    pub top_k: usize,
}

impl UserProfile {
    pub fn with_skills<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skills: skills.into_iter().map(Into::into).collect(),
            desired_roles: Vec::new(),
            location: None,
            years_experience: None,
            top_k: 10,
        }
    }

    /// Location preference, `None` when absent or blank
    pub fn location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|loc| !loc.is_empty())
    }
}

/// Per-dimension scores, each in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub skill: f64,
    pub experience: f64,
    pub location: f64,
    pub recency: f64,
}

/// Scored job, borrowing the posting from the corpus snapshot
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult<'a> {
    pub job: &'a JobPosting,
    #[serde(rename = "matchPercent")]
    pub match_percent: f64,
    pub breakdown: Breakdown,
    #[serde(rename = "matchedSkills")]
    pub matched_skills: Vec<String>,
}

/// Corpus query parameters
#[derive(Debug, Clone, Default)]
pub struct CorpusFilter {
    pub location: Option<String>,
    pub remote_only: bool,
}

/// Scoring weights, non-negative and summing to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub skill: f64,
    pub experience: f64,
    pub location: f64,
    pub recency: f64,
}

impl ScoringWeights {
    const SUM_TOLERANCE: f64 = 1e-6;

    pub fn sum(&self) -> f64 {
        self.skill + self.experience + self.location + self.recency
    }

    pub fn is_valid(&self) -> bool {
        let all_non_negative = [self.skill, self.experience, self.location, self.recency]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0);

        all_non_negative && (self.sum() - 1.0).abs() <= Self::SUM_TOLERANCE
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill: 0.50,
            experience: 0.20,
            location: 0.15,
            recency: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperiencePolicy {
    /// Years at which experience saturates when the job states no minimum
    pub saturation_years: u32,
    /// Score for a profile with no (or zero) experience
    pub neutral: f64,
}

impl Default for ExperiencePolicy {
    fn default() -> Self {
        Self { saturation_years: 5, neutral: 50.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationPolicy {
    /// On-site job whose location does not match the profile
    pub mismatch: f64,
    /// On-site job with no stated location
    pub unknown: f64,
}

impl Default for LocationPolicy {
    fn default() -> Self {
        Self { mismatch: 0.0, unknown: 50.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecencyPolicy {
    /// e-folding time of the exponential decay, in days
    pub decay_days: f64,
    /// Score for postings without a date
    pub neutral: f64,
}

impl Default for RecencyPolicy {
    fn default() -> Self {
        Self { decay_days: 30.0, neutral: 50.0 }
    }
}

/// All tunable constants of the scoring pipeline
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoringPolicy {
    pub weights: ScoringWeights,
    pub experience: ExperiencePolicy,
    pub location: LocationPolicy,
    pub recency: RecencyPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!(ScoringWeights::default().is_valid());
    }

    #[test]
    fn test_invalid_weights() {
        let weights = ScoringWeights { skill: 0.9, ..ScoringWeights::default() };
        assert!(!weights.is_valid());

        let negative = ScoringWeights {
            skill: 0.7,
            experience: -0.2,
            location: 0.25,
            recency: 0.25,
        };
        assert!(!negative.is_valid());
    }

    #[test]
    fn test_parse_posted_date_formats() {
        let date = parse_posted_date("2024-01-15").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-01-15T00:00:00+00:00");

        let rfc = parse_posted_date("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2024-01-15T10:30:00+00:00");

        let naive = parse_posted_date("2024-01-15T10:30:00").unwrap();
        assert_eq!(naive, rfc);

        let unix = parse_posted_date("1705314600").unwrap();
        assert_eq!(unix, rfc);

        assert!(parse_posted_date("").is_none());
        assert!(parse_posted_date("last tuesday").is_none());
    }

    #[test]
    fn test_job_posting_wire_format() {
        let json = r#"{
            "id": "42",
            "title": "Data Engineer",
            "type": "Full-time",
            "requiredSkills": ["Python", "SQL"],
            "postedDate": 1705314600,
            "remote": true
        }"#;

        let job: JobPosting = serde_json::from_str(json).unwrap();
        assert_eq!(job.job_type.as_deref(), Some("Full-time"));
        assert_eq!(job.required_skills, vec!["Python", "SQL"]);
        assert!(job.posted_date.is_some());

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["postedDate"], "2024-01-15T10:30:00Z");
        assert!(value.get("url").is_none());
        assert!(value.get("company").is_none());
    }

    #[test]
    fn test_unparseable_posted_date_is_missing() {
        let json = r#"{"id": "1", "title": "Analyst", "postedDate": "soon"}"#;
        let job: JobPosting = serde_json::from_str(json).unwrap();
        assert!(job.posted_date.is_none());
        assert!(!job.remote);
        assert!(job.required_skills.is_empty());
    }

    #[test]
    fn test_profile_location_blank_is_none() {
        let mut profile = UserProfile::with_skills(["Python"]);
        profile.location = Some("   ".to_string());
        assert!(profile.location().is_none());

        profile.location = Some(" Cape Town ".to_string());
        assert_eq!(profile.location(), Some("Cape Town"));
    }
}
