//! Configuration loader — merges env vars, .env file, and config.toml.

use common::config::LaunchmapConfig;
use common::Error;
use std::path::Path;

fn parse_bool(raw: &str) -> bool {
    let lowered = raw.trim().to_ascii_lowercase();
    lowered != "0" && lowered != "false" && lowered != "no" && lowered != "off"
}

fn validate_config(config: &LaunchmapConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if !config.sources.calendar && !config.sources.launchlib {
        issues.push("at least one source must be enabled".into());
    }
    if config.sources.calendar && config.geocode_api_key.trim().is_empty() {
        issues.push(
            "GEOCODE_API_KEY is required while the calendar source is enabled \
             (its records need coordinate resolution)"
                .into(),
        );
    }
    if config.calendar_url.trim().is_empty() {
        issues.push("calendar_url must not be empty".into());
    }
    if config.launchlib_url.trim().is_empty() {
        issues.push("launchlib_url must not be empty".into());
    }
    if config.places_path.trim().is_empty() {
        issues.push("places_path must not be empty".into());
    }
    if config.http_timeout_secs == 0 {
        issues.push("http_timeout_secs must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load pipeline configuration from environment and optional config file.
pub fn load_config() -> Result<LaunchmapConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = LaunchmapConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(key) = std::env::var("GEOCODE_API_KEY") {
        config.geocode_api_key = key;
    }
    if let Ok(url) = std::env::var("LAUNCHMAP_CALENDAR_URL") {
        config.calendar_url = url;
    }
    if let Ok(url) = std::env::var("LAUNCHMAP_LAUNCHLIB_URL") {
        config.launchlib_url = url;
    }
    if let Ok(path) = std::env::var("LAUNCHMAP_PLACES_PATH") {
        config.places_path = path;
    }
    if let Ok(raw) = std::env::var("LAUNCHMAP_TIMEOUT_SECS") {
        let parsed = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::Config("LAUNCHMAP_TIMEOUT_SECS must be an integer > 0".into()))?;
        if parsed == 0 {
            return Err(Error::Config(
                "LAUNCHMAP_TIMEOUT_SECS must be an integer > 0".into(),
            ));
        }
        config.http_timeout_secs = parsed;
    }
    if let Ok(raw) = std::env::var("LAUNCHMAP_SOURCE_CALENDAR") {
        config.sources.calendar = parse_bool(&raw);
    }
    if let Ok(raw) = std::env::var("LAUNCHMAP_SOURCE_LAUNCHLIB") {
        config.sources.launchlib = parse_bool(&raw);
    }

    // 5. Validate.
    validate_config(&config)?;

    Ok(config)
}
