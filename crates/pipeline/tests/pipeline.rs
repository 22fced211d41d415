//! End-to-end pipeline scenarios: adapter-shaped records through
//! resolution, cache persistence, aggregation, and filtering.

use std::cell::RefCell;

use chrono::NaiveDate;
use common::{Coordinates, Error, LaunchRecord, Result, TBD};
use pipeline::{aggregate, filter_by_range, resolve_coordinates, Geocoder, PlaceCache};

struct FixedGeocoder {
    known: Vec<(&'static str, Coordinates)>,
    calls: RefCell<Vec<String>>,
}

impl FixedGeocoder {
    fn new(known: Vec<(&'static str, Coordinates)>) -> Self {
        Self {
            known,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl Geocoder for FixedGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates> {
        self.calls.borrow_mut().push(address.to_string());
        self.known
            .iter()
            .find(|(name, _)| *name == address)
            .map(|(_, c)| *c)
            .ok_or_else(|| Error::NotFound(address.to_string()))
    }
}

fn calendar_record(mission: &str, location: &str, pad: &str, time: &str) -> LaunchRecord {
    LaunchRecord {
        mission: mission.into(),
        description: "d".into(),
        image: None,
        vehicle: "Falcon 9".into(),
        time: time.into(),
        location: location.into(),
        pad: pad.into(),
        lat: None,
        long: None,
    }
}

#[tokio::test]
async fn cold_cache_resolution_scenario() {
    // One past calendar record, empty cache: the resolver is consulted for
    // the stripped place name, the result lands in the cache and on the
    // record, and the aggregate carries density 1.
    let mut past = vec![calendar_record(
        "USSF-44",
        "Cape Canaveral AFB",
        "40",
        "2023-01-01T00:00:00Z",
    )];
    let mut future = Vec::new();

    let geocoder = FixedGeocoder::new(vec![(
        "Cape Canaveral",
        Coordinates::rounded(28.5, -80.6),
    )]);
    let mut cache = PlaceCache::default();

    resolve_coordinates(
        past.iter_mut().chain(future.iter_mut()),
        &mut cache,
        &geocoder,
    )
    .await;

    assert_eq!(geocoder.calls.borrow().as_slice(), ["Cape Canaveral"]);
    assert_eq!(cache.resolve("Cape Canaveral").unwrap().lat, 28.5);

    let dataset = aggregate(past, future);
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.records[0].lat, 28.5);
    assert_eq!(dataset.records[0].long, -80.6);
    assert_eq!(dataset.records[0].density, 1);
}

#[tokio::test]
async fn warm_cache_survives_a_second_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("places.json");

    // First run: miss, geocode, flush.
    {
        let mut records = vec![calendar_record("A", "Cape Canaveral AFB", "40", TBD)];
        let geocoder =
            FixedGeocoder::new(vec![("Cape Canaveral", Coordinates::rounded(28.5, -80.6))]);
        let mut cache = PlaceCache::load(&path).unwrap();
        resolve_coordinates(&mut records, &mut cache, &geocoder).await;
        assert!(cache.is_dirty());
        cache.flush(&path).unwrap();
    }

    // Second run: pure cache hit, geocoder never consulted.
    {
        let mut records = vec![calendar_record("B", "Cape Canaveral SFS", "41", TBD)];
        let geocoder = FixedGeocoder::new(vec![]);
        let mut cache = PlaceCache::load(&path).unwrap();
        resolve_coordinates(&mut records, &mut cache, &geocoder).await;

        assert!(geocoder.calls.borrow().is_empty());
        assert_eq!(records[0].lat, Some(28.5));
        assert!(!cache.is_dirty());
    }
}

#[tokio::test]
async fn unresolvable_place_in_both_sets_is_looked_up_once() {
    // The same unknown place appears in a past and an upcoming record.
    // A full run makes exactly one external lookup for it.
    let mut past = vec![calendar_record(
        "old",
        "Sea Launch Platform",
        "1",
        "2023-05-01T00:00:00Z",
    )];
    let mut future = vec![calendar_record("new", "Sea Launch Platform", "1", TBD)];

    let geocoder = FixedGeocoder::new(vec![]);
    let mut cache = PlaceCache::default();
    resolve_coordinates(
        past.iter_mut().chain(future.iter_mut()),
        &mut cache,
        &geocoder,
    )
    .await;

    assert_eq!(geocoder.calls.borrow().as_slice(), ["Sea Launch"]);
    let dataset = aggregate(past, future);
    assert!(dataset.is_empty());
}

#[tokio::test]
async fn unresolvable_records_degrade_to_a_smaller_dataset() {
    let mut past = vec![
        calendar_record("known", "Cape Canaveral AFB", "40", "2024-06-15T12:00:00Z"),
        calendar_record("unknown", "Sea Launch Platform", "1", "2024-07-01T00:00:00Z"),
    ];
    let geocoder = FixedGeocoder::new(vec![(
        "Cape Canaveral",
        Coordinates::rounded(28.5, -80.6),
    )]);
    let mut cache = PlaceCache::default();
    resolve_coordinates(&mut past, &mut cache, &geocoder).await;

    let dataset = aggregate(past, Vec::new());
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.records[0].mission, "known");
}

#[tokio::test]
async fn filtered_view_of_mixed_sources() {
    // The JSON listing supplies coordinates inline; the calendar record
    // goes through resolution. Both end up range-filterable.
    let mut listing_rec = calendar_record("inline", "Vandenberg SFB, CA, USA", "4E", "2024-06-15T12:00:00Z");
    listing_rec.lat = Some(34.7420145);
    listing_rec.long = Some(-120.5724064);

    let mut future = vec![
        calendar_record("resolved", "Cape Canaveral AFB", "40", "2025-03-01T00:00:00Z"),
        listing_rec,
        calendar_record("undecided", "Cape Canaveral AFB", "41", TBD),
    ];

    let geocoder = FixedGeocoder::new(vec![(
        "Cape Canaveral",
        Coordinates::rounded(28.5, -80.6),
    )]);
    let mut cache = PlaceCache::default();
    resolve_coordinates(&mut future, &mut cache, &geocoder).await;

    // One geocoder call despite two calendar records at the same place.
    assert_eq!(geocoder.calls.borrow().len(), 1);

    let dataset = aggregate(Vec::new(), future);
    assert_eq!(dataset.len(), 3);

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let view = filter_by_range(&dataset, start, end);

    let missions: Vec<&str> = view.records.iter().map(|r| r.mission.as_str()).collect();
    assert_eq!(missions, ["inline", "undecided"]);
}
