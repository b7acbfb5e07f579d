use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use jobmatch::config::{LoggingSettings, Settings};
use jobmatch::core::{Ranker, SkillNormalizer};
use jobmatch::models::JobPosting;
use jobmatch::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use jobmatch::services::{
    AdzunaClient, AdzunaOptions, BootstrapOptions, JobCorpus, JobRepository, MatchLimits,
    MatchService, SearchCache,
};

/// LOG_LEVEL / LOG_FORMAT win over the config file
fn init_tracing(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_tracing(&settings.logging);

    info!("Starting job matching service...");

    // Initialize PostgreSQL repository (optional)
    let repository = match &settings.database {
        Some(db) => {
            let max_conn = db.max_connections.unwrap_or(10);
            let min_conn = db.min_connections.unwrap_or(1);
            let timeout = db.acquire_timeout_secs.unwrap_or(30);

            match JobRepository::new(&db.url, max_conn, min_conn, timeout).await {
                Ok(repository) => {
                    info!("PostgreSQL repository initialized (max: {} connections)", max_conn);
                    Some(Arc::new(repository))
                }
                Err(e) => {
                    error!("Failed to connect to PostgreSQL: {}", e);
                    return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
                }
            }
        }
        None => {
            info!("No database configured, corpus is in-memory only");
            None
        }
    };

    // Build the corpus: persisted postings first, then the seed file
    let mut jobs: Vec<JobPosting> = Vec::new();

    if let Some(repository) = &repository {
        match repository.load_jobs().await {
            Ok(stored) => jobs.extend(stored),
            Err(e) => warn!("Failed to load persisted jobs: {}", e),
        }
    }

    if let Some(seed_file) = &settings.corpus.seed_file {
        match JobCorpus::load_seed_file(seed_file) {
            Ok(seeded) => {
                info!("Loaded {} jobs from {}", seeded.len(), seed_file);
                jobs.extend(seeded);
            }
            Err(e) => warn!("Skipping seed file {}: {}", seed_file, e),
        }
    }

    let corpus = Arc::new(JobCorpus::from_jobs(jobs));
    info!("Corpus ready with {} jobs", corpus.len().await);

    // Initialize ranker with configured policy
    let policy = settings.scoring.to_policy();
    let normalizer = SkillNormalizer::with_synonyms(&settings.skills.synonyms);
    info!(
        "Ranker initialized with weights: {:?} ({} skill synonyms)",
        policy.weights,
        normalizer.synonym_count()
    );
    let ranker = Ranker::new(policy, normalizer);

    let limits = MatchLimits {
        default_top_k: settings.matching.default_top_k,
        max_top_k: settings.matching.max_top_k,
    };

    let mut service = MatchService::new(corpus, ranker, limits);

    if let Some(repository) = repository {
        service = service.with_repository(repository);
    }

    // Initialize Adzuna client (optional)
    match &settings.adzuna {
        Some(adzuna) if adzuna.has_credentials() => {
            let options = AdzunaOptions {
                country: adzuna.country.clone(),
                currency_symbol: adzuna.currency_symbol.clone(),
                timeout_secs: adzuna.timeout_secs,
            };

            match AdzunaClient::new(
                adzuna.base_url.clone(),
                adzuna.app_id.clone(),
                adzuna.app_key.clone(),
                options,
            ) {
                Ok(client) => {
                    let cache = SearchCache::new(settings.cache.capacity, settings.cache.ttl_secs);
                    let bootstrap = BootstrapOptions {
                        enabled: adzuna.bootstrap_on_empty,
                        default_location: adzuna.default_location.clone(),
                        results_per_page: adzuna.results_per_page,
                        ..BootstrapOptions::default()
                    };
                    info!("Adzuna client initialized (country: {})", client.country());
                    service = service.with_adzuna(Arc::new(client), cache, bootstrap);
                }
                Err(e) => warn!("Adzuna client unavailable: {}", e),
            }
        }
        Some(_) => warn!("Adzuna configured without app id/key, external search disabled"),
        None => info!("Adzuna not configured, external search disabled"),
    }

    // Build application state
    let app_state = AppState {
        service: Arc::new(service),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let allowed_origins = settings.server.allowed_origins.clone();

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = if allowed_origins.is_empty() {
            Cors::permissive()
        } else {
            allowed_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
                .allow_any_method()
                .allow_any_header()
                .max_age(3600)
        };

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
