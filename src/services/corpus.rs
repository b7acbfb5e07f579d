use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::core::filters::filter_jobs;
use crate::models::{CorpusFilter, JobPosting};

/// Errors that can occur when loading a corpus seed file
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seed file: {0}")]
    Json(#[from] serde_json::Error),
}

/// In-memory job corpus
///
/// Readers get an immutable `Arc` snapshot; writers build a new vector and
/// swap it in, so a request never observes a partially applied ingest.
#[derive(Debug, Default)]
pub struct JobCorpus {
    jobs: RwLock<Arc<Vec<JobPosting>>>,
}

impl JobCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from postings, keeping the first posting for each id
    pub fn from_jobs(jobs: Vec<JobPosting>) -> Self {
        let mut seen = HashSet::new();
        let jobs: Vec<JobPosting> = jobs
            .into_iter()
            .filter(|job| seen.insert(job.id.clone()))
            .collect();

        Self {
            jobs: RwLock::new(Arc::new(jobs)),
        }
    }

    /// Read postings from a JSON array file
    pub fn load_seed_file<P: AsRef<Path>>(path: P) -> Result<Vec<JobPosting>, CorpusError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let jobs: Vec<JobPosting> = serde_json::from_str(&raw)?;
        Ok(jobs)
    }

    /// Consistent view of the whole corpus
    pub async fn snapshot(&self) -> Arc<Vec<JobPosting>> {
        Arc::clone(&*self.jobs.read().await)
    }

    /// Postings passing `filter`, in corpus order
    pub async fn query(&self, filter: &CorpusFilter) -> Vec<JobPosting> {
        let snapshot = self.snapshot().await;
        filter_jobs(&snapshot, filter).cloned().collect()
    }

    pub async fn get(&self, id: &str) -> Option<JobPosting> {
        let snapshot = self.snapshot().await;
        snapshot.iter().find(|job| job.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Append postings whose id is not yet present
    ///
    /// Duplicates within the batch are collapsed as well. Returns the
    /// postings that were actually added.
    pub async fn ingest(&self, jobs: Vec<JobPosting>) -> Vec<JobPosting> {
        let mut guard = self.jobs.write().await;

        let mut seen: HashSet<String> = guard.iter().map(|job| job.id.clone()).collect();
        let added: Vec<JobPosting> = jobs
            .into_iter()
            .filter(|job| seen.insert(job.id.clone()))
            .collect();

        if added.is_empty() {
            return added;
        }

        let mut next = Vec::with_capacity(guard.len() + added.len());
        next.extend(guard.iter().cloned());
        next.extend(added.iter().cloned());
        *guard = Arc::new(next);

        tracing::debug!("Ingested {} jobs (corpus size: {})", added.len(), guard.len());

        added
    }
}
