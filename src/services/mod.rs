// Service exports
pub mod adzuna;
pub mod cache;
pub mod corpus;
pub mod matching;
pub mod postgres;

pub use adzuna::{AdzunaClient, AdzunaError, AdzunaOptions};
pub use cache::{CacheKey, SearchCache};
pub use corpus::{CorpusError, JobCorpus};
pub use matching::{BootstrapOptions, MatchError, MatchLimits, MatchService, SearchOutcome};
pub use postgres::{JobRepository, JobRepositoryError};
