use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::models::{ExperiencePolicy, LocationPolicy, RecencyPolicy, ScoringPolicy, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub skills: SkillSettings,
    #[serde(default)]
    pub corpus: CorpusSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub adzuna: Option<AdzunaSettings>,
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// Empty means any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
        }
    }
}

fn default_top_k() -> usize { 10 }
fn default_max_top_k() -> usize { 100 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub experience: ExperienceConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub recency: RecencyConfig,
}

impl ScoringSettings {
    pub fn to_policy(&self) -> ScoringPolicy {
        ScoringPolicy {
            weights: ScoringWeights {
                skill: self.weights.skill,
                experience: self.weights.experience,
                location: self.weights.location,
                recency: self.weights.recency,
            },
            experience: ExperiencePolicy {
                saturation_years: self.experience.saturation_years,
                neutral: self.experience.neutral,
            },
            location: LocationPolicy {
                mismatch: self.location.mismatch,
                unknown: self.location.unknown,
            },
            recency: RecencyPolicy {
                decay_days: self.recency.decay_days,
                neutral: self.recency.neutral,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skill_weight")]
    pub skill: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
    #[serde(default = "default_recency_weight")]
    pub recency: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skill: default_skill_weight(),
            experience: default_experience_weight(),
            location: default_location_weight(),
            recency: default_recency_weight(),
        }
    }
}

fn default_skill_weight() -> f64 { 0.50 }
fn default_experience_weight() -> f64 { 0.20 }
fn default_location_weight() -> f64 { 0.15 }
fn default_recency_weight() -> f64 { 0.15 }

#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceConfig {
    #[serde(default = "default_saturation_years")]
    pub saturation_years: u32,
    #[serde(default = "default_neutral")]
    pub neutral: f64,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            saturation_years: default_saturation_years(),
            neutral: default_neutral(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub mismatch: f64,
    #[serde(default = "default_neutral")]
    pub unknown: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            mismatch: 0.0,
            unknown: default_neutral(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecencyConfig {
    #[serde(default = "default_decay_days")]
    pub decay_days: f64,
    #[serde(default = "default_neutral")]
    pub neutral: f64,
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            decay_days: default_decay_days(),
            neutral: default_neutral(),
        }
    }
}

fn default_saturation_years() -> u32 { 5 }
fn default_neutral() -> f64 { 50.0 }
fn default_decay_days() -> f64 { 30.0 }

/// Extra skill synonyms: alias -> canonical
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillSettings {
    #[serde(default)]
    pub synonyms: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorpusSettings {
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_ttl() -> u64 { 600 }
fn default_cache_capacity() -> u64 { 256 }

#[derive(Debug, Clone, Deserialize)]
pub struct AdzunaSettings {
    #[serde(default = "default_adzuna_url")]
    pub base_url: String,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_key: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_results_per_page")]
    pub results_per_page: u32,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_adzuna_location")]
    pub default_location: String,
    #[serde(default)]
    pub bootstrap_on_empty: bool,
    #[serde(default = "default_adzuna_timeout")]
    pub timeout_secs: u64,
}

fn default_adzuna_url() -> String { "https://api.adzuna.com/v1/api/jobs".to_string() }
fn default_country() -> String { "za".to_string() }
fn default_results_per_page() -> u32 { 20 }
fn default_currency_symbol() -> String { "R".to_string() }
fn default_adzuna_location() -> String { "south africa".to_string() }
fn default_adzuna_timeout() -> u64 { 10 }

impl AdzunaSettings {
    /// Both credentials present
    pub fn has_credentials(&self) -> bool {
        !self.app_id.trim().is_empty() && !self.app_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with JOBMATCH__)
    /// 5. ADZUNA_APP_ID, ADZUNA_APP_KEY and DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., JOBMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("JOBMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_secret_overrides(settings, env_var)?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_from_with(path, env_var)
    }

    fn load_from_with<P, F>(path: P, lookup: F) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("JOBMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_secret_overrides(settings, lookup)?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject scoring policies the ranker cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        let policy = self.scoring.to_policy();

        if !policy.weights.is_valid() {
            return Err(ConfigError::Message(format!(
                "scoring weights must be non-negative and sum to 1.0 (got {:.4})",
                policy.weights.sum()
            )));
        }

        let bounded = [
            ("scoring.experience.neutral", policy.experience.neutral),
            ("scoring.location.mismatch", policy.location.mismatch),
            ("scoring.location.unknown", policy.location.unknown),
            ("scoring.recency.neutral", policy.recency.neutral),
        ];
        for (name, value) in bounded {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::Message(format!("{} must be within [0, 100], got {}", name, value)));
            }
        }

        if policy.experience.saturation_years == 0 {
            return Err(ConfigError::Message("scoring.experience.saturation_years must be positive".to_string()));
        }

        if policy.recency.decay_days.is_nan() || policy.recency.decay_days <= 0.0 {
            return Err(ConfigError::Message("scoring.recency.decay_days must be positive".to_string()));
        }

        if self.matching.default_top_k == 0 || self.matching.max_top_k == 0 {
            return Err(ConfigError::Message("matching top_k limits must be positive".to_string()));
        }

        Ok(())
    }
}

/// Secrets may come from well-known environment variables instead of JOBMATCH__*
fn apply_secret_overrides<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let adzuna_app_id = lookup("ADZUNA_APP_ID");
    let adzuna_app_key = lookup("ADZUNA_APP_KEY");
    let database_url = lookup("DATABASE_URL");

    let mut builder = Config::builder().add_source(settings);

    if let Some(app_id) = adzuna_app_id {
        builder = builder.set_override("adzuna.app_id", app_id)?;
    }
    if let Some(app_key) = adzuna_app_key {
        builder = builder.set_override("adzuna.app_key", app_key)?;
    }
    if let Some(url) = database_url {
        builder = builder.set_override("database.url", url)?;
    }

    builder.build()
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.skill, 0.50);
        assert_eq!(weights.experience, 0.20);
        assert_eq!(weights.location, 0.15);
        assert_eq!(weights.recency, 0.15);
    }

    #[test]
    fn test_default_policy_matches_domain_default() {
        assert_eq!(ScoringSettings::default().to_policy(), ScoringPolicy::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let settings = Settings::load_from_with("config/default.toml", |_| None).expect("default config loads");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.matching.max_top_k, 100);
        assert!(settings.adzuna.is_none());
        assert!(settings.database.is_none());
    }

    #[test]
    fn test_rejects_bad_weights() {
        let raw = r#"
            [scoring.weights]
            skill = 0.9
            experience = 0.2
            location = 0.15
            recency = 0.15
        "#;
        let config = Config::builder()
            .add_source(File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap();
        let settings: Settings = config.try_deserialize().unwrap();

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_applies_secret_overrides() {
        let lookup = |name: &str| match name {
            "ADZUNA_APP_ID" => Some("id-from-env".to_string()),
            "ADZUNA_APP_KEY" => Some("key-from-env".to_string()),
            "DATABASE_URL" => Some("postgres://env@localhost/jobs".to_string()),
            _ => None,
        };

        let settings = Settings::load_from_with("config/default.toml", lookup).expect("config loads");

        let adzuna = settings.adzuna.expect("adzuna section from env");
        assert_eq!(adzuna.app_id, "id-from-env");
        assert!(adzuna.has_credentials());
        assert_eq!(adzuna.country, "za");
        assert_eq!(
            settings.database.map(|db| db.url),
            Some("postgres://env@localhost/jobs".to_string())
        );
    }

    #[test]
    fn test_rejects_zero_saturation() {
        let raw = r#"
            [scoring.experience]
            saturation_years = 0
        "#;
        let config = Config::builder()
            .add_source(File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap();
        let settings: Settings = config.try_deserialize().unwrap();

        assert!(settings.validate().is_err());
    }
}
