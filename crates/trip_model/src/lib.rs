//! Domain side of the trip board: the points collection, the active filter,
//! read-only reference catalogs and the derivation of the visible list.

pub mod catalog;
pub mod clock;
pub mod filter;
pub mod observable;
pub mod points;
pub mod sort;

use chrono::{DateTime, Utc};
use shared::{
    domain::TripPoint,
    protocol::{FilterType, SortType},
};

pub use catalog::{Catalog, DestinationsModel, OffersModel};
pub use clock::{Clock, FixedClock, SystemClock};
pub use filter::FilterModel;
pub use observable::{Observable, SubscriptionId};
pub use points::PointsModel;

/// Filters `points` and orders the result; the input slice is never reordered.
pub fn visible_points(
    points: &[TripPoint],
    filter: FilterType,
    sort: SortType,
    now: DateTime<Utc>,
) -> Vec<TripPoint> {
    sort::sort_points(sort, filter::filter_points(filter, points, now))
}

#[cfg(test)]
#[path = "tests/visible_tests.rs"]
mod tests;
