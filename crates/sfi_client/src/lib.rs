//! Spaceflight Insider launch-calendar client.
//!
//! Scrapes the HTML launch-schedule page and normalizes each
//! `table.launchcalendar` entry into a `LaunchRecord`. Records carry no
//! coordinates — the pipeline's resolution pass fills those in.

pub mod html;

use common::{Error, LaunchRecord, LaunchTime, Result, TBD};
use tracing::{debug, warn};

/// HTML launch-schedule client.
#[derive(Debug, Clone)]
pub struct CalendarClient {
    client: reqwest::Client,
    base_url: String,
}

impl CalendarClient {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("launchmap/0.1 (launch schedule aggregator)")
            .pool_max_idle_per_host(4)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build calendar HTTP client");

        Self { client, base_url }
    }

    /// Fetch and parse the schedule page.
    ///
    /// * `past` — request the past-launches view instead of the upcoming one.
    ///
    /// Fetch failures and a non-success status are fatal for this source
    /// (no retry); individual malformed entries are logged and skipped.
    pub async fn fetch_launches(&self, past: bool) -> Result<Vec<LaunchRecord>> {
        let url = if past {
            format!("{}?past=1", self.base_url)
        } else {
            self.base_url.clone()
        };

        debug!("Fetching launch calendar: {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("calendar fetch failed: {e}")))?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(Error::SourceUnavailable {
                status,
                message: format!("launch calendar at {url}"),
            });
        }

        let page = resp
            .text()
            .await
            .map_err(|e| Error::Http(format!("calendar body read failed: {e}")))?;

        let launches = parse_calendar(&page);
        debug!("Parsed {} calendar launches (past={})", launches.len(), past);
        Ok(launches)
    }
}

/// Parse every `table.launchcalendar` block on the page.
///
/// An entry missing required fields is a provider contract violation:
/// logged and skipped, never fatal for the rest of the page.
pub fn parse_calendar(page: &str) -> Vec<LaunchRecord> {
    // Calendar tables nest a plain <table> inside, so closing-tag matching
    // would truncate an entry. Each entry runs from its opening tag to the
    // next entry's opening tag (or end of page).
    const OPEN: &str = "<table class=\"launchcalendar";

    let starts: Vec<usize> = {
        let mut v = Vec::new();
        let mut from = 0;
        while let Some(at) = page[from..].find(OPEN) {
            v.push(from + at);
            from += at + OPEN.len();
        }
        v
    };

    let mut launches = Vec::new();
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(page.len());
        match parse_entry(&page[start..end]) {
            Ok(rec) => launches.push(rec),
            Err(e) => warn!("Skipping malformed calendar entry: {}", e),
        }
    }

    launches
}

fn parse_entry(block: &str) -> Result<LaunchRecord> {
    let details = html::class_section(block, "launchdetails")
        .ok_or_else(|| Error::MalformedPayload("no launchdetails section".into()))?;

    let mut vehicle = None;
    let mut time = None;
    let mut location = None;

    // The details section is <tr><th>Label</th><td>value</td></tr> rows.
    let mut from = 0;
    while let Some((start, end)) = html::next_block(details, "<tr", "</tr>", from) {
        from = end;
        let row = &details[start..end];
        let label = html::next_block(row, "<th", "</th>", 0)
            .map(|(s, e)| html::text_of(&row[s..e]).to_ascii_lowercase());
        let value = html::next_block(row, "<td", "</td>", 0)
            .map(|(s, e)| html::text_of(&row[s..e]));

        if let (Some(label), Some(value)) = (label, value) {
            match label.as_str() {
                "vehicle" => vehicle = Some(value),
                "time" => time = Some(value),
                "location" => location = Some(value),
                _ => {}
            }
        }
    }

    let vehicle = vehicle.ok_or_else(|| Error::MalformedPayload("no vehicle row".into()))?;
    let raw_time = time.ok_or_else(|| Error::MalformedPayload("no time row".into()))?;
    let combined = location.ok_or_else(|| Error::MalformedPayload("no location row".into()))?;

    let mission = html::section_with_attr(block, "colspan=\"2\"")
        .map(|s| html::text_of(s))
        .ok_or_else(|| Error::MalformedPayload("no mission cell".into()))?;

    let description = html::class_section(block, "description")
        .map(html::text_of)
        .unwrap_or_default();

    // Vehicle image URL is embedded in a style attribute of the vehicle div.
    let image = html::class_section(block, "vehicle").and_then(html::style_url);

    let (location, pad) = split_location(&combined)?;
    let time = normalize_time(&raw_time)?;

    Ok(LaunchRecord {
        mission,
        description,
        image,
        vehicle,
        time,
        location,
        pad,
        lat: None,
        long: None,
    })
}

/// Split the combined "place name + pad code" string: the last token is
/// the pad, everything before it the location.
fn split_location(combined: &str) -> Result<(String, String)> {
    let tokens: Vec<&str> = combined.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(Error::MalformedPayload(format!(
            "location {combined:?} has no pad code"
        )));
    }
    let pad = tokens[tokens.len() - 1].to_string();
    let location = tokens[..tokens.len() - 1].join(" ");
    Ok((location, pad))
}

/// Canonicalize the calendar's display time into the record invariant:
/// a plain ISO-8601 string, or exactly `"TBD"`.
fn normalize_time(raw: &str) -> Result<String> {
    if raw.contains(TBD) {
        return Ok(TBD.to_string());
    }
    match LaunchTime::parse(raw)? {
        LaunchTime::Tbd => Ok(TBD.to_string()),
        LaunchTime::At(t) => Ok(t.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
    }
}
