//! Launch Library listing-API client.
//!
//! Fetches the paginated `launch/upcoming` / `launch/previous` endpoints
//! and maps each result's nested fields into a `LaunchRecord`. Pad
//! coordinates arrive inline, so these records bypass the geocoding path.

use common::{Error, LaunchRecord, Result, TBD};
use serde::Deserialize;
use tracing::{debug, warn};

/// Pages to follow at most per fetch; each page carries up to `PAGE_LIMIT`
/// results.
const MAX_PAGES: usize = 10;
const PAGE_LIMIT: u32 = 100;

/// JSON launch-listing API client.
#[derive(Debug, Clone)]
pub struct LaunchLibClient {
    client: reqwest::Client,
    base_url: String,
}

// ── Listing response types ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LaunchListResponse {
    #[serde(default)]
    pub results: Vec<ApiLaunch>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiLaunch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub window_start: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub mission: Option<ApiMission>,
    #[serde(default)]
    pub rocket: Option<ApiRocket>,
    #[serde(default)]
    pub pad: Option<ApiPad>,
}

#[derive(Debug, Deserialize)]
pub struct ApiMission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiRocket {
    #[serde(default)]
    pub configuration: Option<ApiRocketConfiguration>,
}

#[derive(Debug, Deserialize)]
pub struct ApiRocketConfiguration {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiPad {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub location: Option<ApiPadLocation>,
}

#[derive(Debug, Deserialize)]
pub struct ApiPadLocation {
    #[serde(default)]
    pub name: Option<String>,
}

// ── Implementation ────────────────────────────────────────────────────

impl LaunchLibClient {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("launchmap/0.1 (launch schedule aggregator)")
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build launch listing HTTP client");

        Self { client, base_url }
    }

    /// Fetch the launch listing, following pagination.
    ///
    /// A non-success status is non-fatal: the source is treated as
    /// unavailable and an empty sequence is returned so the run can
    /// continue with other providers.
    pub async fn fetch_launches(&self, past: bool) -> Result<Vec<LaunchRecord>> {
        let endpoint = if past { "previous" } else { "upcoming" };
        let mut url = format!(
            "{}/{}/?limit={}",
            self.base_url.trim_end_matches('/'),
            endpoint,
            PAGE_LIMIT
        );

        let mut launches = Vec::new();

        for _ in 0..MAX_PAGES {
            debug!("Fetching launch listing: {}", url);

            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| Error::Http(format!("launch listing fetch failed: {e}")))?;

            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .map_err(|e| Error::Http(format!("launch listing read failed: {e}")))?;

            match fold_page(status, &body, &mut launches)? {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(launches)
    }
}

/// Fold one fetched page into the accumulator.
///
/// Returns the next page URL to follow, or `None` when pagination
/// stops. A non-success status logs a warning and stops with whatever
/// has accumulated so far; only a malformed body on a success status is
/// an error.
fn fold_page(status: u16, body: &str, launches: &mut Vec<LaunchRecord>) -> Result<Option<String>> {
    if !(200..300).contains(&status) {
        warn!(
            "Launch listing unavailable (status={}); returning {} records fetched so far",
            status,
            launches.len()
        );
        return Ok(None);
    }

    let page: LaunchListResponse = serde_json::from_str(body)
        .map_err(|e| Error::Http(format!("launch listing JSON error: {e}")))?;

    let count = page.results.len();
    launches.extend(page.results.iter().filter_map(map_launch));
    debug!("Mapped page of {} results (total: {})", count, launches.len());

    match page.next {
        Some(next) if !next.is_empty() => Ok(Some(next)),
        _ => Ok(None),
    }
}

/// Map one listing result into the common record shape.
///
/// A result missing its required nested fields is a provider contract
/// violation: logged, skipped, never fatal for the page.
pub fn map_launch(raw: &ApiLaunch) -> Option<LaunchRecord> {
    let pad = raw.pad.as_ref().or_else(|| {
        warn!("Launch result without pad; skipped");
        None
    })?;

    let location = match pad.location.as_ref().and_then(|l| l.name.clone()) {
        Some(name) => name,
        None => {
            warn!("Launch result without pad location name; skipped");
            return None;
        }
    };

    let mission = match raw
        .mission
        .as_ref()
        .and_then(|m| m.name.clone())
        .or_else(|| raw.name.clone())
    {
        Some(name) => name,
        None => {
            warn!("Launch result without mission name; skipped");
            return None;
        }
    };

    let vehicle = match raw
        .rocket
        .as_ref()
        .and_then(|r| r.configuration.as_ref())
        .and_then(|c| c.name.clone())
    {
        Some(name) => name,
        None => {
            warn!("Launch result without rocket configuration; skipped");
            return None;
        }
    };

    let description = raw
        .mission
        .as_ref()
        .and_then(|m| m.description.clone())
        .unwrap_or_default();

    // No window start means the provider has not scheduled it yet.
    let time = raw.window_start.clone().unwrap_or_else(|| TBD.to_string());

    let lat = pad.latitude.as_deref().and_then(|v| v.parse::<f64>().ok());
    let long = pad.longitude.as_deref().and_then(|v| v.parse::<f64>().ok());

    Some(LaunchRecord {
        mission,
        description,
        image: raw.image.clone(),
        vehicle,
        time,
        location,
        pad: pad.name.clone().unwrap_or_default(),
        lat,
        long,
    })
}
