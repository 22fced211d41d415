//! Domain types shared across the pipeline.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Sentinel the providers use for a launch whose time is not yet committed.
pub const TBD: &str = "TBD";

// ── Coordinates ───────────────────────────────────────────────────────

/// Geographic coordinates, always rounded to 7 decimal places.
///
/// Serialized as `{"lat": .., "lng": ..}` — the shape of the durable
/// place cache file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Construct with both components rounded to 7 decimals.
    pub fn rounded(lat: f64, lng: f64) -> Self {
        Self {
            lat: round7(lat),
            lng: round7(lng),
        }
    }
}

fn round7(v: f64) -> f64 {
    (v * 1e7).round() / 1e7
}

// ── Launch time ───────────────────────────────────────────────────────

/// A launch time as published by a provider: either a concrete UTC
/// timestamp or the explicit "to be determined" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchTime {
    /// The provider has not committed to a time yet. Always treated as
    /// in-range by the temporal filter.
    Tbd,
    At(NaiveDateTime),
}

impl LaunchTime {
    /// Parse a raw provider time string.
    ///
    /// Accepts exactly the sentinel `"TBD"`, an RFC 3339 timestamp, or the
    /// bare `YYYY-MM-DDTHH:MM:SS` shape. Calendar pages embed the ISO stamp
    /// in a longer display string wrapped in parentheses — that trailing
    /// parenthesized stamp is accepted as well. Anything else is a contract
    /// violation of the source adapter.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed == TBD {
            return Ok(Self::Tbd);
        }
        if let Some(t) = parse_iso(trimmed) {
            return Ok(Self::At(t));
        }
        // "Sat Jan 01 2023 (2023-01-01T00:00:00Z)" → inner stamp.
        if let Some(inner) = trimmed
            .strip_suffix(')')
            .and_then(|s| s.rsplit('(').next())
        {
            if let Some(t) = parse_iso(inner) {
                return Ok(Self::At(t));
            }
        }
        Err(Error::MalformedPayload(format!(
            "unparseable launch time {trimmed:?}"
        )))
    }

    /// Day-granularity range check. `Tbd` is always in range, even for a
    /// degenerate `start > end`.
    pub fn in_range(&self, start: NaiveDate, end: NaiveDate) -> bool {
        match self {
            Self::Tbd => true,
            Self::At(t) => {
                let day = t.date();
                start <= day && day <= end
            }
        }
    }
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.naive_utc());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok()
}

// ── Launch records ────────────────────────────────────────────────────

/// One external launch event, as normalized by a source adapter.
///
/// `lat`/`long` stay `None` until the resolution pass fills them in
/// (or the provider supplied pad coordinates inline).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub mission: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub vehicle: String,
    /// Raw provider time: a valid ISO-8601 timestamp or exactly `"TBD"`.
    pub time: String,
    /// Place name with the trailing site/pad code already stripped.
    pub location: String,
    pub pad: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub long: Option<f64>,
}

impl LaunchRecord {
    /// Parse the raw `time` field into its typed form.
    pub fn launch_time(&self) -> Result<LaunchTime> {
        LaunchTime::parse(&self.time)
    }
}

/// A launch that survived aggregation: coordinates resolved, density
/// annotated.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedLaunch {
    pub mission: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub vehicle: String,
    pub time: String,
    pub location: String,
    pub pad: String,
    pub lat: f64,
    pub long: f64,
    /// Count of records in the dataset sharing this exact `lat` value.
    pub density: usize,
}

impl AggregatedLaunch {
    pub fn launch_time(&self) -> Result<LaunchTime> {
        LaunchTime::parse(&self.time)
    }
}

/// One pipeline run's full result set, ordered past-first then upcoming,
/// provider order preserved inside each half.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LaunchDataset {
    pub records: Vec<AggregatedLaunch>,
}

impl LaunchDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Map-display view: the first record for each distinct `lat` value —
    /// the same exact-latitude grouping the density annotation uses. The
    /// underlying dataset keeps every record; only the marker list is
    /// deduplicated.
    pub fn markers(&self) -> Vec<&AggregatedLaunch> {
        let mut seen: Vec<u64> = Vec::new();
        let mut out = Vec::new();
        for rec in &self.records {
            let key = rec.lat.to_bits();
            if !seen.contains(&key) {
                seen.push(key);
                out.push(rec);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_tbd_sentinel() {
        assert_eq!(LaunchTime::parse("TBD").unwrap(), LaunchTime::Tbd);
        assert_eq!(LaunchTime::parse("  TBD ").unwrap(), LaunchTime::Tbd);
    }

    #[test]
    fn parses_rfc3339_and_bare_shapes() {
        let expected = day(2024, 6, 15).and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(
            LaunchTime::parse("2024-06-15T12:00:00Z").unwrap(),
            LaunchTime::At(expected)
        );
        assert_eq!(
            LaunchTime::parse("2024-06-15T12:00:00").unwrap(),
            LaunchTime::At(expected)
        );
    }

    #[test]
    fn parses_trailing_parenthesized_stamp() {
        let expected = day(2023, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(
            LaunchTime::parse("Sun Jan 01, 2023 (2023-01-01T00:00:00Z)").unwrap(),
            LaunchTime::At(expected)
        );
    }

    #[test]
    fn rejects_garbage_time() {
        assert!(matches!(
            LaunchTime::parse("sometime next year"),
            Err(Error::MalformedPayload(_))
        ));
        // Lowercase sentinel is not the sentinel.
        assert!(LaunchTime::parse("tbd").is_err());
    }

    #[test]
    fn tbd_is_in_every_range() {
        let t = LaunchTime::Tbd;
        assert!(t.in_range(day(2024, 1, 1), day(2024, 12, 31)));
        // Degenerate range still includes TBD.
        assert!(t.in_range(day(2024, 12, 31), day(2024, 1, 1)));
    }

    #[test]
    fn range_check_is_day_granular() {
        let t = LaunchTime::parse("2024-12-31T23:59:59Z").unwrap();
        // Time-of-day is ignored; the day itself is inclusive on both ends.
        assert!(t.in_range(day(2024, 12, 31), day(2024, 12, 31)));
        assert!(!t.in_range(day(2024, 1, 1), day(2024, 12, 30)));
    }

    #[test]
    fn coordinates_round_to_seven_decimals() {
        let c = Coordinates::rounded(28.56230123456, -80.57735987654);
        assert_eq!(c.lat, 28.5623012);
        assert_eq!(c.lng, -80.5773599);
    }

    #[test]
    fn markers_dedup_by_exact_latitude() {
        let mk = |lat: f64, long: f64| AggregatedLaunch {
            mission: "M".into(),
            description: String::new(),
            image: None,
            vehicle: "V".into(),
            time: TBD.into(),
            location: "L".into(),
            pad: "1".into(),
            lat,
            long,
            density: 2,
        };
        // Shared lat with different long still collapses to one marker.
        let ds = LaunchDataset {
            records: vec![mk(28.5, -80.6), mk(28.5, -81.0), mk(34.7, -120.5)],
        };
        assert_eq!(ds.markers().len(), 2);
        assert_eq!(ds.len(), 3);
    }
}
