//! Core launch pipeline: durable place cache, coordinate resolution,
//! aggregation, and temporal/coordinate filtering.

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod resolve;

pub use aggregate::aggregate;
pub use cache::PlaceCache;
pub use filter::{filter_by_range, select_by_coordinate, select_in_range_at};
pub use resolve::{place_key, resolve_coordinates, Geocoder};
