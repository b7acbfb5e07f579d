use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{parse_posted_date, JobPosting};

/// Keyword table used to pull skills out of posting text: keyword -> display name
const SKILL_KEYWORDS: &[(&str, &str)] = &[
    ("python", "Python"),
    ("javascript", "JavaScript"),
    ("java", "Java"),
    ("sql", "SQL"),
    ("machine learning", "Machine Learning"),
    ("data analysis", "Data Analysis"),
    ("react", "React"),
    ("node.js", "Node.js"),
    ("aws", "AWS"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("mongodb", "MongoDB"),
    ("postgresql", "PostgreSQL"),
    ("mysql", "MySQL"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("typescript", "TypeScript"),
    ("angular", "Angular"),
    ("vue", "Vue.js"),
    ("php", "PHP"),
    ("c#", "C#"),
    ("c++", "C++"),
    ("ruby", "Ruby"),
    ("go", "Go"),
    ("rust", "Rust"),
    ("scala", "Scala"),
    ("r language", "R"),
    ("tensorflow", "TensorFlow"),
    ("pytorch", "PyTorch"),
    ("pandas", "Pandas"),
    ("numpy", "NumPy"),
    ("tableau", "Tableau"),
    ("power bi", "Power BI"),
    ("excel", "Excel"),
    ("git", "Git"),
    ("jenkins", "Jenkins"),
    ("linux", "Linux"),
];

const MAX_EXTRACTED_SKILLS: usize = 8;
const MAX_DESCRIPTION_CHARS: usize = 500;

/// Word-bounded keyword patterns, so "go" does not fire on "good"
static SKILL_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    SKILL_KEYWORDS
        .iter()
        .filter_map(|(keyword, name)| {
            let pattern = format!(r"(?:^|[^a-z0-9+#.]){}(?:$|[^a-z0-9+#])", regex::escape(keyword));
            Regex::new(&pattern).ok().map(|re| (re, *name))
        })
        .collect()
});

static EXPERIENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\d+)\+?\s*years?\s+(?:of\s+)?experience",
        r"experience.*?(\d+)\+?\s*years?",
        r"minimum.*?(\d+)\+?\s*years?",
        r"(\d+)\+?\s*years?\s+in",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Errors that can occur when talking to Adzuna
#[derive(Debug, Error)]
pub enum AdzunaError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid Adzuna app id or key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Connection options for the Adzuna client
#[derive(Debug, Clone)]
pub struct AdzunaOptions {
    pub country: String,
    pub currency_symbol: String,
    pub timeout_secs: u64,
}

impl Default for AdzunaOptions {
    fn default() -> Self {
        Self {
            country: "za".to_string(),
            currency_symbol: "R".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<AdzunaJob>,
}

#[derive(Debug, Deserialize)]
struct AdzunaJob {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    company: Option<DisplayName>,
    #[serde(default)]
    location: Option<DisplayName>,
    #[serde(default)]
    redirect_url: Option<String>,
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    contract_time: Option<String>,
    #[serde(default)]
    salary_min: Option<f64>,
    #[serde(default)]
    salary_max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DisplayName {
    #[serde(default)]
    display_name: Option<String>,
}

/// Adzuna job-search API client
///
/// Fetches postings and converts them into corpus `JobPosting`s:
/// - skills extracted by keyword table from title and description
/// - minimum experience extracted from phrases like "3+ years experience"
/// - remote detected from "remote" / "work from home"
pub struct AdzunaClient {
    base_url: String,
    app_id: String,
    app_key: String,
    options: AdzunaOptions,
    client: Client,
}

impl AdzunaClient {
    /// Create a new Adzuna client
    pub fn new(
        base_url: String,
        app_id: String,
        app_key: String,
        options: AdzunaOptions,
    ) -> Result<Self, AdzunaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            app_id,
            app_key,
            options,
            client,
        })
    }

    pub fn country(&self) -> &str {
        &self.options.country
    }

    /// Search Adzuna and convert the results
    pub async fn search_jobs(
        &self,
        what: &str,
        where_: &str,
        results_per_page: u32,
        page: u32,
    ) -> Result<Vec<JobPosting>, AdzunaError> {
        let url = format!(
            "{}/{}/search/{}?app_id={}&app_key={}&results_per_page={}&what={}&where={}&content-type=application/json",
            self.base_url.trim_end_matches('/'),
            self.options.country,
            page,
            urlencoding::encode(&self.app_id),
            urlencoding::encode(&self.app_key),
            results_per_page,
            urlencoding::encode(what),
            urlencoding::encode(where_),
        );

        tracing::info!("Fetching jobs from Adzuna: {} in {}", what, where_);

        let response = self.client.get(&url).send().await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(AdzunaError::Unauthorized),
            status => {
                return Err(AdzunaError::ApiError(format!(
                    "Failed to search jobs: {}",
                    status
                )))
            }
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AdzunaError::InvalidResponse(e.to_string()))?;

        let jobs: Vec<JobPosting> = body
            .results
            .into_iter()
            .map(|job| self.transform(job))
            .filter(|job| !job.id.is_empty())
            .collect();

        tracing::info!("Fetched {} jobs from Adzuna", jobs.len());

        Ok(jobs)
    }

    fn transform(&self, job: AdzunaJob) -> JobPosting {
        let text = format!("{} {}", job.title, job.description).to_lowercase();

        let id = match job.id {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };


        JobPosting {
            id,
            title: job.title,
            company: display_opt(job.company),
            location: display_opt(job.location),
            job_type: job.contract_time.map(|t| contract_label(&t)),
            salary: Some(format_salary(job.salary_min, job.salary_max, &self.options.currency_symbol)),
            description: Some(job.description.chars().take(MAX_DESCRIPTION_CHARS).collect()),
            required_skills: extract_skills(&text),
            min_years_experience: extract_experience(&text),
            posted_date: job.created.as_deref().and_then(parse_posted_date),
            remote: text.contains("remote") || text.contains("work from home"),
            url: job.redirect_url.filter(|url| !url.trim().is_empty()),
        }
    }
}

/// Absent or blank display names stay unknown so scoring treats them as missing
fn display_opt(name: Option<DisplayName>) -> Option<String> {
    name.and_then(|n| n.display_name)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

fn contract_label(contract_time: &str) -> String {
    match contract_time {
        "full_time" => "Full-time".to_string(),
        "part_time" => "Part-time".to_string(),
        other => other.replace('_', " "),
    }
}

/// Skills mentioned in lowercase posting text, in keyword-table order
pub fn extract_skills(text: &str) -> Vec<String> {
    SKILL_PATTERNS
        .iter()
        .filter(|(pattern, _)| pattern.is_match(text))
        .map(|(_, name)| name.to_string())
        .take(MAX_EXTRACTED_SKILLS)
        .collect()
}

/// Minimum years of experience stated in lowercase posting text
pub fn extract_experience(text: &str) -> Option<u32> {
    EXPERIENCE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|years| years.as_str().parse::<u32>().ok())
        .filter(|years| *years > 0)
}

/// Human-readable salary range, e.g. "R12,000 - R20,000"
pub fn format_salary(min: Option<f64>, max: Option<f64>, symbol: &str) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{}{} - {}{}", symbol, group_thousands(min), symbol, group_thousands(max)),
        (Some(min), None) => format!("From {}{}", symbol, group_thousands(min)),
        (None, Some(max)) => format!("Up to {}{}", symbol, group_thousands(max)),
        (None, None) => "Salary not specified".to_string(),
    }
}

fn group_thousands(value: f64) -> String {
    let digits = (value.round() as i64).unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if value < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}
