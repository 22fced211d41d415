//! Coordinate resolution pass.
//!
//! Fills in `lat`/`long` for records the source adapters could not place:
//! cache hit first, the external geocoder only on a miss. At most one
//! geocoding call is made per distinct normalized place name per run —
//! failed names are remembered so a later record cannot trigger a second
//! call.

use std::collections::HashSet;

use common::{Coordinates, Error, LaunchRecord, Result};
use tracing::{debug, warn};

use crate::cache::PlaceCache;

/// External geocoding hook. The production implementation is
/// `geocode_client::GeocodeClient`; tests substitute counting stubs.
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates>;
}

impl Geocoder for geocode_client::GeocodeClient {
    async fn geocode(&self, address: &str) -> Result<Coordinates> {
        geocode_client::GeocodeClient::geocode(self, address).await
    }
}

/// Cache key for a record's location: the trailing site code token is
/// dropped ("Cape Canaveral AFB" → "Cape Canaveral"). A single-token
/// place is used as-is.
pub fn place_key(location: &str) -> String {
    let tokens: Vec<&str> = location.split_whitespace().collect();
    if tokens.len() > 1 {
        tokens[..tokens.len() - 1].join(" ")
    } else {
        location.trim().to_string()
    }
}

/// Resolve coordinates for every record still lacking them.
///
/// Accepts any iterable of mutable records so the driver can feed both
/// record sets through one pass (the failed-name set must span the whole
/// run, not one set). A NotFound from the geocoder leaves the record
/// unresolved (the aggregator drops it later); the run continues. New
/// resolutions are recorded in the cache but not flushed — the driver
/// flushes once after the full pass.
pub async fn resolve_coordinates<'a, G, I>(records: I, cache: &mut PlaceCache, geocoder: &G)
where
    G: Geocoder,
    I: IntoIterator<Item = &'a mut LaunchRecord>,
{
    let mut failed: HashSet<String> = HashSet::new();

    for rec in records.into_iter().filter(|r| r.lat.is_none()) {
        let key = place_key(&rec.location);
        if failed.contains(&key) {
            continue;
        }

        let coords = match cache.resolve(&key) {
            Some(c) => Some(c),
            None => match geocoder.geocode(&key).await {
                Ok(c) => {
                    debug!("Resolved {:?} -> ({}, {})", key, c.lat, c.lng);
                    cache.record(&key, c);
                    Some(c)
                }
                Err(Error::NotFound(addr)) => {
                    warn!("No geocoding result for {:?}; record stays unplaced", addr);
                    failed.insert(key);
                    None
                }
                Err(e) => {
                    warn!("Geocoding {:?} failed: {}; record stays unplaced", key, e);
                    failed.insert(key);
                    None
                }
            },
        };

        if let Some(c) = coords {
            rec.lat = Some(c.lat);
            rec.long = Some(c.lng);
        }
    }
}
