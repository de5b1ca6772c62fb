use std::cmp::Ordering;

use shared::{domain::TripPoint, protocol::SortType};

pub fn compare(sort: SortType, a: &TripPoint, b: &TripPoint) -> Ordering {
    match sort {
        SortType::Day => a.date_from.cmp(&b.date_from),
        SortType::Time => b.duration().cmp(&a.duration()),
        SortType::Price => b.base_price.cmp(&a.base_price),
    }
}

/// Stable: points that compare equal keep their incoming order.
pub fn sort_points(sort: SortType, mut points: Vec<TripPoint>) -> Vec<TripPoint> {
    points.sort_by(|a, b| compare(sort, a, b));
    points
}

/// Whether an edit moves the point's position under `sort`.
pub fn sort_key_changed(sort: SortType, before: &TripPoint, after: &TripPoint) -> bool {
    match sort {
        SortType::Day => before.date_from != after.date_from,
        SortType::Time => before.duration() != after.duration(),
        SortType::Price => before.base_price != after.base_price,
    }
}
