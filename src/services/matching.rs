use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use validator::Validate;

use crate::core::{filter_jobs, Ranker};
use crate::models::{
    AdzunaSearchRequest, CorpusFilter, JobPosting, MatchFilters, MatchRequest, RankedJob,
    UserProfile,
};
use crate::services::adzuna::{AdzunaClient, AdzunaError};
use crate::services::cache::{CacheKey, SearchCache};
use crate::services::corpus::JobCorpus;
use crate::services::postgres::{JobRepository, JobRepositoryError};

/// Errors surfaced by the match service
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Job source unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("No external job source is configured")]
    SourceNotConfigured,

    #[error("Persistence error: {0}")]
    Persistence(#[from] JobRepositoryError),
}

impl From<AdzunaError> for MatchError {
    fn from(err: AdzunaError) -> Self {
        MatchError::UpstreamUnavailable(err.to_string())
    }
}

/// Request size limits
#[derive(Debug, Clone, Copy)]
pub struct MatchLimits {
    pub default_top_k: usize,
    pub max_top_k: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            default_top_k: 10,
            max_top_k: 100,
        }
    }
}

/// How an empty corpus is filled from Adzuna before matching
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    pub enabled: bool,
    pub default_query: String,
    pub default_location: String,
    pub results_per_page: u32,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            default_query: "software".to_string(),
            default_location: "south africa".to_string(),
            results_per_page: 20,
        }
    }
}

/// Outcome of an external search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub found: usize,
    pub ingested: usize,
}

/// Orchestrates validation, corpus access, ranking and ingestion
///
/// Holds no per-request state; every call works on its own corpus snapshot.
pub struct MatchService {
    corpus: Arc<JobCorpus>,
    ranker: Ranker,
    limits: MatchLimits,
    repository: Option<Arc<JobRepository>>,
    adzuna: Option<Arc<AdzunaClient>>,
    search_cache: Option<SearchCache>,
    bootstrap: BootstrapOptions,
}

impl MatchService {
    pub fn new(corpus: Arc<JobCorpus>, ranker: Ranker, limits: MatchLimits) -> Self {
        Self {
            corpus,
            ranker,
            limits,
            repository: None,
            adzuna: None,
            search_cache: None,
            bootstrap: BootstrapOptions::default(),
        }
    }

    pub fn with_repository(mut self, repository: Arc<JobRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn with_adzuna(
        mut self,
        client: Arc<AdzunaClient>,
        cache: SearchCache,
        bootstrap: BootstrapOptions,
    ) -> Self {
        self.adzuna = Some(client);
        self.search_cache = Some(cache);
        self.bootstrap = bootstrap;
        self
    }

    pub fn corpus(&self) -> &Arc<JobCorpus> {
        &self.corpus
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    pub fn adzuna_ready(&self) -> bool {
        self.adzuna.is_some()
    }

    pub async fn jobs_loaded(&self) -> usize {
        self.corpus.len().await
    }

    /// `None` when no database is configured
    pub async fn database_healthy(&self) -> Option<bool> {
        match &self.repository {
            Some(repository) => Some(repository.health_check().await.unwrap_or(false)),
            None => None,
        }
    }

    /// Validate a match request and turn it into a profile
    ///
    /// Fails fast on empty or blank skills, negative experience,
    /// non-positive `top_k` and an out-of-range `minMatch`.
    pub fn build_profile(&self, request: &MatchRequest) -> Result<UserProfile, MatchError> {
        request
            .validate()
            .map_err(|errors| MatchError::InvalidRequest(errors.to_string()))?;

        if let Some(filters) = &request.filters {
            filters
                .validate()
                .map_err(|errors| MatchError::InvalidRequest(errors.to_string()))?;
        }

        let normalizer = self.ranker.normalizer();
        let mut seen = HashSet::new();
        let skills: Vec<String> = request
            .skills
            .iter()
            .map(|skill| skill.trim())
            .filter(|skill| !skill.is_empty())
            .filter(|skill| seen.insert(normalizer.normalize(skill)))
            .map(str::to_string)
            .collect();

        if skills.is_empty() {
            return Err(MatchError::InvalidRequest(
                "skills must contain at least one non-blank entry".to_string(),
            ));
        }

        let years_experience = request
            .years_experience
            .map(|years| u32::try_from(years).unwrap_or(u32::MAX));

        let top_k = request
            .top_k
            .map(|k| usize::try_from(k).unwrap_or(self.limits.max_top_k))
            .unwrap_or(self.limits.default_top_k)
            .min(self.limits.max_top_k);

        let desired_roles = request
            .desired_roles
            .iter()
            .flatten()
            .map(|role| role.trim())
            .filter(|role| !role.is_empty())
            .map(str::to_string)
            .collect();

        Ok(UserProfile {
            skills,
            desired_roles,
            location: request.location.clone(),
            years_experience,
            top_k,
        })
    }

    /// Rank the corpus for a match request
    pub async fn find_matches(&self, request: &MatchRequest) -> Result<Vec<RankedJob>, MatchError> {
        self.find_matches_at(request, Utc::now()).await
    }

    /// Rank the corpus for a match request at a fixed instant
    pub async fn find_matches_at(
        &self,
        request: &MatchRequest,
        now: DateTime<Utc>,
    ) -> Result<Vec<RankedJob>, MatchError> {
        let profile = self.build_profile(request)?;
        let filters = request.filters.clone().unwrap_or_default();

        if self.bootstrap.enabled && self.corpus.is_empty().await {
            self.bootstrap_corpus(&profile).await;
        }

        let snapshot = self.corpus.snapshot().await;
        let filter = corpus_filter(&filters);
        let candidates = filter_jobs(&snapshot, &filter);

        let results: Vec<RankedJob> = self
            .ranker
            .rank_at(&profile, candidates, profile.top_k, filters.min_match, now)
            .into_iter()
            .map(RankedJob::from)
            .collect();

        tracing::info!(
            "Returning {} matches (from {} jobs, {} skills, top_k {})",
            results.len(),
            snapshot.len(),
            profile.skills.len(),
            profile.top_k
        );

        Ok(results)
    }

    /// Add postings to the corpus, persisting them first when a database is configured
    pub async fn ingest(&self, jobs: Vec<JobPosting>) -> Result<usize, MatchError> {
        if let Some(invalid) = jobs.iter().find(|job| job.id.trim().is_empty()) {
            return Err(MatchError::InvalidRequest(format!(
                "job '{}' has an empty id",
                invalid.title
            )));
        }

        if let Some(repository) = &self.repository {
            repository.save_jobs(&jobs).await?;
        }

        let added = self.corpus.ingest(jobs).await;

        tracing::info!("Ingested {} new jobs", added.len());

        Ok(added.len())
    }

    /// Postings passing the filter, in corpus order
    pub async fn list_jobs(&self, filter: &CorpusFilter) -> Vec<JobPosting> {
        self.corpus.query(filter).await
    }

    /// Fetch postings from Adzuna and ingest them
    pub async fn search_adzuna(&self, request: &AdzunaSearchRequest) -> Result<SearchOutcome, MatchError> {
        request
            .validate()
            .map_err(|errors| MatchError::InvalidRequest(errors.to_string()))?;

        let client = self.adzuna.as_ref().ok_or(MatchError::SourceNotConfigured)?;

        let key = CacheKey::adzuna_search(&request.query, &request.location, request.max_results, 1);
        let cached = match &self.search_cache {
            Some(cache) => cache.get(&key).await,
            None => None,
        };

        let jobs = match cached {
            Some(jobs) => jobs,
            None => {
                let fetched = Arc::new(
                    client
                        .search_jobs(&request.query, &request.location, request.max_results, 1)
                        .await?,
                );
                if let Some(cache) = &self.search_cache {
                    cache.insert(&key, Arc::clone(&fetched)).await;
                }
                fetched
            }
        };

        let found = jobs.len();
        let ingested = self.ingest((*jobs).clone()).await?;

        Ok(SearchOutcome { found, ingested })
    }

    /// Best effort: a failed fetch leaves the corpus empty and matching proceeds
    async fn bootstrap_corpus(&self, profile: &UserProfile) {
        let query = if profile.desired_roles.is_empty() {
            self.bootstrap.default_query.clone()
        } else {
            profile.desired_roles.join(" ")
        };
        let location = profile
            .location()
            .map(str::to_string)
            .unwrap_or_else(|| self.bootstrap.default_location.clone());

        tracing::info!("Corpus is empty, bootstrapping from Adzuna: {} in {}", query, location);

        let request = AdzunaSearchRequest {
            query,
            location,
            max_results: self.bootstrap.results_per_page,
        };

        if let Err(e) = self.search_adzuna(&request).await {
            tracing::warn!("Corpus bootstrap failed, matching against empty corpus: {}", e);
        }
    }
}

fn corpus_filter(filters: &MatchFilters) -> CorpusFilter {
    CorpusFilter {
        location: filters.location.clone(),
        remote_only: filters.remote_only,
    }
}
