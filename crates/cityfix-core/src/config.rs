//! Configuration management for `CityFix`

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    /// API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Complaint triage configuration
    #[serde(default)]
    #[validate(nested)]
    pub triage: TriageConfig,

    /// Dashboard demo simulation configuration
    #[serde(default)]
    #[validate(nested)]
    pub simulation: SimulationConfig,

    /// Map view configuration
    #[serde(default)]
    pub map: MapConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// CORS allowed origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// What the classifier does when no department keyword matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Pick a department uniformly at random
    #[default]
    Random,
    /// Report the complaint as unclassified
    Unclassified,
}

/// Complaint triage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_confidence_bounds"))]
pub struct TriageConfig {
    /// Simulated analysis delay in milliseconds
    #[serde(default = "default_analysis_delay_ms")]
    pub analysis_delay_ms: u64,

    /// How long the success banner stays visible, in milliseconds
    #[serde(default = "default_banner_ms")]
    pub banner_ms: u64,

    /// Lowest confidence percentage handed out
    #[serde(default = "default_confidence_min")]
    #[validate(range(max = 100))]
    pub confidence_min: u8,

    /// Highest confidence percentage handed out
    #[serde(default = "default_confidence_max")]
    #[validate(range(max = 100))]
    pub confidence_max: u8,

    /// Maximum description length in characters
    #[serde(default = "default_max_description_len")]
    #[validate(range(min = 1))]
    pub max_description_len: usize,

    /// Behaviour when no department keyword matches
    #[serde(default)]
    pub fallback: FallbackPolicy,

    /// Attempts at drawing an unused complaint id before giving up
    #[serde(default = "default_id_attempts")]
    #[validate(range(min = 1))]
    pub id_attempts: u32,
}

/// Dashboard demo simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SimulationConfig {
    /// Progress increment per step
    #[serde(default = "default_step_percent")]
    #[validate(range(min = 1, max = 100))]
    pub step_percent: u8,

    /// Delay before each step, in milliseconds
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,

    /// Runs kept in the registry; starting one more evicts the oldest,
    /// finished runs first
    #[serde(default = "default_max_runs")]
    #[validate(range(min = 1))]
    pub max_runs: usize,
}

/// Map view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// URL of the embedded map widget
    #[serde(default = "default_embed_url")]
    pub embed_url: String,
}

fn validate_confidence_bounds(triage: &TriageConfig) -> Result<(), validator::ValidationError> {
    if triage.confidence_min > triage.confidence_max {
        return Err(validator::ValidationError::new("confidence_min_exceeds_max"));
    }
    Ok(())
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_enable_cors() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

const fn default_analysis_delay_ms() -> u64 {
    2500
}

const fn default_banner_ms() -> u64 {
    3000
}

const fn default_confidence_min() -> u8 {
    88
}

const fn default_confidence_max() -> u8 {
    97
}

const fn default_max_description_len() -> usize {
    400
}

const fn default_id_attempts() -> u32 {
    32
}

const fn default_step_percent() -> u8 {
    5
}

const fn default_step_delay_ms() -> u64 {
    80
}

const fn default_max_runs() -> usize {
    64
}

fn default_embed_url() -> String {
    "https://www.google.com/maps/embed?pb=!1m18!1m12!1m3!1d3559.8955929859843!2d80.94378887532748!3d26.8466799767027!2m3!1f0!2f0!3f0!3m2!1i1024!2i768!4f13.1!3m3!1m2!1s0x399bfd991f32b16b%3A0x93ccba8909978be7!2sLucknow%2C%20Uttar%20Pradesh!5e0!3m2!1sen!2sin!4v1699999999999!5m2!1sen!2sin".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: default_enable_cors(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            analysis_delay_ms: default_analysis_delay_ms(),
            banner_ms: default_banner_ms(),
            confidence_min: default_confidence_min(),
            confidence_max: default_confidence_max(),
            max_description_len: default_max_description_len(),
            fallback: FallbackPolicy::default(),
            id_attempts: default_id_attempts(),
        }
    }
}

impl TriageConfig {
    /// Simulated analysis delay
    #[must_use]
    pub const fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    /// Success banner lifetime
    #[must_use]
    pub const fn banner_duration(&self) -> Duration {
        Duration::from_millis(self.banner_ms)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_percent: default_step_percent(),
            step_delay_ms: default_step_delay_ms(),
            max_runs: default_max_runs(),
        }
    }
}

impl SimulationConfig {
    /// Delay before each progress step
    #[must_use]
    pub const fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            embed_url: default_embed_url(),
        }
    }
}

impl Config {
    /// Load configuration from an optional `config` file and `CITYFIX__*`
    /// environment variables, then validate it
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load() -> crate::Result<Self> {
        let loaded: Self = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("CITYFIX")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        loaded.check()?;
        Ok(loaded)
    }

    /// Validate field ranges and cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing every violated constraint.
    pub fn check(&self) -> crate::Result<()> {
        self.validate().map_err(|e| crate::Error::Configuration {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::field_reassign_with_default)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);

        assert!(config.api.enable_cors);
        assert_eq!(config.api.cors_origins, vec!["*"]);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");

        assert_eq!(config.triage.analysis_delay_ms, 2500);
        assert_eq!(config.triage.banner_ms, 3000);
        assert_eq!(config.triage.confidence_min, 88);
        assert_eq!(config.triage.confidence_max, 97);
        assert_eq!(config.triage.max_description_len, 400);
        assert_eq!(config.triage.fallback, FallbackPolicy::Random);

        assert_eq!(config.simulation.step_percent, 5);
        assert_eq!(config.simulation.step_delay_ms, 80);
        assert_eq!(config.simulation.max_runs, 64);

        assert!(config.map.embed_url.starts_with("https://www.google.com/maps/embed"));
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_duration_helpers() {
        let config = Config::default();

        assert_eq!(config.triage.analysis_delay(), Duration::from_millis(2500));
        assert_eq!(config.triage.banner_duration(), Duration::from_secs(3));
        assert_eq!(config.simulation.step_delay(), Duration::from_millis(80));
    }

    #[test]
    fn test_partial_config_deserialization() {
        let json_str = r#"{
            "server": {"host": "localhost"},
            "triage": {"fallback": "unclassified", "analysis_delay_ms": 0}
        }"#;

        let config: Config = serde_json::from_str(json_str).unwrap();

        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.triage.fallback, FallbackPolicy::Unclassified);
        assert_eq!(config.triage.analysis_delay_ms, 0);
        assert_eq!(config.triage.banner_ms, 3000);
        assert_eq!(config.simulation.step_percent, 5);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_inverted_confidence_bounds_rejected() {
        let mut config = Config::default();
        config.triage.confidence_min = 97;
        config.triage.confidence_max = 88;

        let err = config.check().unwrap_err();
        assert!(format!("{err}").contains("Configuration error"));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut config = Config::default();
        config.simulation.step_percent = 0;
        assert!(config.check().is_err());

        let mut config = Config::default();
        config.triage.confidence_max = 120;
        assert!(config.check().is_err());

        let mut config = Config::default();
        config.triage.id_attempts = 0;
        assert!(config.check().is_err());

        let mut config = Config::default();
        config.simulation.max_runs = 0;
        assert!(config.check().is_err());
    }

    #[test]
    fn test_fallback_policy_serialization() {
        assert_eq!(
            serde_json::to_string(&FallbackPolicy::Unclassified).unwrap(),
            "\"unclassified\""
        );
        let parsed: FallbackPolicy = serde_json::from_str("\"random\"").unwrap();
        assert_eq!(parsed, FallbackPolicy::Random);
        assert_eq!(FallbackPolicy::default(), FallbackPolicy::Random);
    }

    #[test]
    fn test_config_serialization_roundtrip_keeps_sections() {
        let mut config = Config::default();
        config.map.embed_url = "https://maps.example.com/embed".to_string();

        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.map.embed_url, "https://maps.example.com/embed");
        assert_eq!(deserialized.triage.id_attempts, config.triage.id_attempts);
    }
}
