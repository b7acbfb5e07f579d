use crate::models::{CorpusFilter, JobPosting};

/// Check if a job passes the corpus filter
///
/// Location is a case-insensitive substring test against the job location;
/// a job without a location never passes a location filter.
#[inline]
pub fn matches_filter(job: &JobPosting, filter: &CorpusFilter) -> bool {
    if filter.remote_only && !job.remote {
        return false;
    }

    let wanted = filter
        .location
        .as_deref()
        .map(str::trim)
        .filter(|loc| !loc.is_empty());

    match wanted {
        Some(wanted) => job
            .location
            .as_deref()
            .map(|loc| loc.to_lowercase().contains(&wanted.to_lowercase()))
            .unwrap_or(false),
        None => true,
    }
}

/// Apply a filter to a snapshot, preserving corpus order
pub fn filter_jobs<'a>(
    jobs: &'a [JobPosting],
    filter: &'a CorpusFilter,
) -> impl Iterator<Item = &'a JobPosting> + 'a {
    jobs.iter().filter(move |job| matches_filter(job, filter))
}
