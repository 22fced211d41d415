//! Pipeline configuration types.

use serde::{Deserialize, Serialize};

/// Top-level launchmap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchmapConfig {
    /// Geocoding API key. Required only when the calendar source is
    /// enabled — its records carry no coordinates and need resolution.
    #[serde(default)]
    pub geocode_api_key: String,

    /// HTML launch-schedule page.
    #[serde(default = "default_calendar_url")]
    pub calendar_url: String,

    /// JSON launch-listing API base (the `launch` resource).
    #[serde(default = "default_launchlib_url")]
    pub launchlib_url: String,

    /// Durable place cache file (JSON map: place name → {lat, lng}).
    #[serde(default = "default_places_path")]
    pub places_path: String,

    /// Bounded timeout applied to every outbound HTTP call.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Which providers to fetch from.
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Per-provider enable flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_true")]
    pub calendar: bool,
    #[serde(default = "default_true")]
    pub launchlib: bool,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            calendar: true,
            launchlib: true,
        }
    }
}

impl Default for LaunchmapConfig {
    fn default() -> Self {
        Self {
            geocode_api_key: String::new(),
            calendar_url: default_calendar_url(),
            launchlib_url: default_launchlib_url(),
            places_path: default_places_path(),
            http_timeout_secs: default_http_timeout(),
            sources: SourcesConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_calendar_url() -> String {
    "https://www.spaceflightinsider.com/launch-schedule/".into()
}

fn default_launchlib_url() -> String {
    "https://ll.thespacedevs.com/2.2.0/launch".into()
}

fn default_places_path() -> String {
    "data/places.json".into()
}

fn default_http_timeout() -> u64 {
    30
}
