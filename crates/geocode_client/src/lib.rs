//! Geocoding API client.
//!
//! Resolves a free-text place name to coordinates via the Google Maps
//! Geocoding API. Only invoked on a place-cache miss; callers strip any
//! trailing pad/site code first — an un-stripped address usually yields
//! NotFound or an imprecise hit.

use common::{Coordinates, Error, Result};
use serde::Deserialize;
use tracing::debug;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Geocoding client.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: reqwest::Client,
    api_key: String,
}

// ── Geocoding response types ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: Location,
}

#[derive(Debug, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

// ── Implementation ────────────────────────────────────────────────────

impl GeocodeClient {
    pub fn new(api_key: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("launchmap/0.1 (launch schedule aggregator)")
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build geocoding HTTP client");

        Self { client, api_key }
    }

    /// Resolve an address to coordinates, rounded to 7 decimal places.
    ///
    /// Spaces become the URL-safe `+` separator; no other normalization
    /// is applied. An empty results array is the NotFound condition,
    /// surfaced to the caller without retry.
    pub async fn geocode(&self, address: &str) -> Result<Coordinates> {
        let query = normalize_address(address);
        debug!("Geocoding address: {:?}", query);

        // Built by hand: the `+` separators must stay literal, a query
        // encoder would turn them into %2B.
        let url = format!("{}?key={}&address={}", GEOCODE_URL, self.api_key, query);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("geocode fetch failed: {e}")))?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http(format!(
                "geocode returned {}: {}",
                status,
                truncate(&body, 500)
            )));
        }

        let body: GeocodeResponse = resp
            .json()
            .await
            .map_err(|e| Error::Http(format!("geocode JSON error: {e}")))?;

        let first = body
            .results
            .first()
            .ok_or_else(|| Error::NotFound(address.to_string()))?;

        Ok(Coordinates::rounded(
            first.geometry.location.lat,
            first.geometry.location.lng,
        ))
    }
}

/// Spaces → `+`, the sole address transformation.
fn normalize_address(address: &str) -> String {
    address.replace(' ', "+")
}

/// Truncate an error body at a char boundary at or below `max` bytes.
fn truncate(body: &str, max: usize) -> &str {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_spaces_become_plus() {
        assert_eq!(normalize_address("Cape Canaveral"), "Cape+Canaveral");
        assert_eq!(normalize_address("Vandenberg"), "Vandenberg");
    }

    #[test]
    fn response_coordinates_round_trip() {
        let raw = r#"{
            "results": [
                {"geometry": {"location": {"lat": 28.562302399, "lng": -80.577356099}}}
            ]
        }"#;
        let resp: GeocodeResponse = serde_json::from_str(raw).unwrap();
        let loc = &resp.results[0].geometry.location;
        let c = Coordinates::rounded(loc.lat, loc.lng);
        assert_eq!(c.lat, 28.5623024);
        assert_eq!(c.lng, -80.5773561);
    }

    #[test]
    fn error_body_truncation_respects_char_boundaries() {
        // 'é' is two bytes; a cut at 4 would land mid-character.
        let body = "ablé".repeat(200);
        let cut = truncate(&body, 4);
        assert_eq!(cut, "abl");
        assert_eq!(truncate("short", 500), "short");
    }

    #[test]
    fn empty_results_is_not_found() {
        let resp: GeocodeResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(resp.results.first().is_none());
    }
}
