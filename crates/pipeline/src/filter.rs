//! Dataset views: date-range and map-marker selection.
//!
//! Non-mutating subsequence selection over an aggregated dataset. A
//! record whose time is still `"TBD"` is never filtered out by a date
//! range — an undetermined launch is always a candidate.

use chrono::NaiveDate;
use common::{AggregatedLaunch, LaunchDataset};
use tracing::warn;

/// Records whose launch day falls inside `[start, end]` (inclusive, day
/// granularity — time-of-day on both bounds and records is ignored),
/// plus every `"TBD"` record. Idempotent.
pub fn filter_by_range(dataset: &LaunchDataset, start: NaiveDate, end: NaiveDate) -> LaunchDataset {
    LaunchDataset {
        records: dataset
            .records
            .iter()
            .filter(|rec| time_in_range(rec, start, end))
            .cloned()
            .collect(),
    }
}

/// Records at a user-selected map marker: exact `lat` equality, the same
/// grouping the density annotation uses.
pub fn select_by_coordinate(dataset: &LaunchDataset, lat: f64) -> LaunchDataset {
    LaunchDataset {
        records: dataset
            .records
            .iter()
            .filter(|rec| rec.lat == lat)
            .cloned()
            .collect(),
    }
}

/// Marker selection AND date range, for a map click with an active
/// date picker.
pub fn select_in_range_at(
    dataset: &LaunchDataset,
    start: NaiveDate,
    end: NaiveDate,
    lat: f64,
) -> LaunchDataset {
    LaunchDataset {
        records: dataset
            .records
            .iter()
            .filter(|rec| rec.lat == lat && time_in_range(rec, start, end))
            .cloned()
            .collect(),
    }
}

fn time_in_range(rec: &AggregatedLaunch, start: NaiveDate, end: NaiveDate) -> bool {
    match rec.launch_time() {
        Ok(t) => t.in_range(start, end),
        Err(e) => {
            // Adapter contract violation; the row is unusable for a
            // time-based view.
            warn!("Record {:?} has invalid time: {}", rec.mission, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::TBD;

    fn launch(mission: &str, time: &str, lat: f64) -> AggregatedLaunch {
        AggregatedLaunch {
            mission: mission.into(),
            description: String::new(),
            image: None,
            vehicle: "V".into(),
            time: time.into(),
            location: "L".into(),
            pad: "1".into(),
            lat,
            long: -80.6,
            density: 1,
        }
    }

    fn dataset() -> LaunchDataset {
        LaunchDataset {
            records: vec![
                launch("in", "2024-06-15T12:00:00Z", 28.5),
                launch("out", "2025-03-01T00:00:00Z", 28.5),
                launch("tbd", TBD, 34.7),
            ],
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_includes_and_excludes_by_day() {
        let ds = filter_by_range(&dataset(), day(2024, 1, 1), day(2024, 12, 31));
        let missions: Vec<&str> = ds.records.iter().map(|r| r.mission.as_str()).collect();
        assert_eq!(missions, ["in", "tbd"]);
    }

    #[test]
    fn tbd_survives_degenerate_range() {
        let ds = filter_by_range(&dataset(), day(2024, 12, 31), day(2024, 1, 1));
        let missions: Vec<&str> = ds.records.iter().map(|r| r.mission.as_str()).collect();
        assert_eq!(missions, ["tbd"]);
    }

    #[test]
    fn filtering_twice_equals_filtering_once() {
        let start = day(2024, 1, 1);
        let end = day(2024, 12, 31);
        let once = filter_by_range(&dataset(), start, end);
        let twice = filter_by_range(&once, start, end);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.records.iter().zip(&twice.records) {
            assert_eq!(a.mission, b.mission);
        }
    }

    #[test]
    fn coordinate_selection_uses_exact_lat() {
        let ds = select_by_coordinate(&dataset(), 28.5);
        assert_eq!(ds.len(), 2);
        assert!(select_by_coordinate(&dataset(), 28.50001).is_empty());
    }

    #[test]
    fn combined_selection_is_logical_and() {
        let ds = select_in_range_at(&dataset(), day(2024, 1, 1), day(2024, 12, 31), 28.5);
        let missions: Vec<&str> = ds.records.iter().map(|r| r.mission.as_str()).collect();
        assert_eq!(missions, ["in"]);
    }
}
