//! Launch aggregation: merge past and upcoming record sets, drop
//! unplaceable rows, annotate per-location density.

use std::collections::HashMap;

use common::{AggregatedLaunch, LaunchDataset, LaunchRecord};
use tracing::debug;

/// Merge past then future records into one dataset.
///
/// Order is preserved (past first, provider order inside each half).
/// Records with no resolved coordinates cannot be placed on a map and are
/// dropped from every downstream view. `density` is the count of records
/// sharing the same exact `lat` value — deliberately lat-only, matching
/// the historical grouping; see DESIGN.md before "fixing" this to the
/// full coordinate pair.
pub fn aggregate(past: Vec<LaunchRecord>, future: Vec<LaunchRecord>) -> LaunchDataset {
    let total = past.len() + future.len();

    let placed: Vec<(LaunchRecord, f64, f64)> = past
        .into_iter()
        .chain(future)
        .filter_map(|rec| match (rec.lat, rec.long) {
            (Some(lat), Some(long)) => Some((rec, lat, long)),
            _ => None,
        })
        .collect();

    let mut density: HashMap<u64, usize> = HashMap::new();
    for (_, lat, _) in &placed {
        *density.entry(lat.to_bits()).or_default() += 1;
    }

    let records = placed
        .into_iter()
        .map(|(rec, lat, long)| AggregatedLaunch {
            mission: rec.mission,
            description: rec.description,
            image: rec.image,
            vehicle: rec.vehicle,
            time: rec.time,
            location: rec.location,
            pad: rec.pad,
            lat,
            long,
            density: density[&lat.to_bits()],
        })
        .collect::<Vec<_>>();

    debug!(
        "Aggregated {} of {} records ({} dropped as unplaceable)",
        records.len(),
        total,
        total - records.len()
    );

    LaunchDataset { records }
}
