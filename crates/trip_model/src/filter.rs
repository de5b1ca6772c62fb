use std::cell::Cell;

use chrono::{DateTime, Utc};
use shared::{
    domain::TripPoint,
    protocol::{FilterType, UpdateType},
};
use tracing::debug;

use crate::observable::{Observable, SubscriptionId};

pub fn matches(filter: FilterType, point: &TripPoint, now: DateTime<Utc>) -> bool {
    match filter {
        FilterType::Everything => true,
        FilterType::Future => point.date_from > now,
        FilterType::Present => point.date_from <= now && point.date_to >= now,
        FilterType::Past => point.date_to < now,
    }
}

/// Returns the matching points in their original relative order.
pub fn filter_points(filter: FilterType, points: &[TripPoint], now: DateTime<Utc>) -> Vec<TripPoint> {
    points
        .iter()
        .filter(|point| matches(filter, point, now))
        .cloned()
        .collect()
}

/// Holds the active filter; every change is broadcast to subscribers.
#[derive(Debug, Default)]
pub struct FilterModel {
    filter: Cell<FilterType>,
    observable: Observable<FilterType>,
}

impl FilterModel {
    pub fn new(filter: FilterType) -> Self {
        Self {
            filter: Cell::new(filter),
            observable: Observable::new(),
        }
    }

    pub fn filter(&self) -> FilterType {
        self.filter.get()
    }

    /// Always notifies, even when `filter` is already active.
    pub fn set_filter(&self, update_type: UpdateType, filter: FilterType) {
        debug!(%filter, %update_type, "filter changed");
        self.filter.set(filter);
        self.observable.notify(update_type, &filter);
    }

    pub fn subscribe(&self, observer: impl Fn(UpdateType, &FilterType) + 'static) -> SubscriptionId {
        self.observable.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observable.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

    use chrono::{Duration, TimeZone};
    use shared::domain::{DestinationId, PointId, PointType};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn point(id: i64, from_hours: i64, to_hours: i64) -> TripPoint {
        TripPoint {
            id: PointId(id),
            point_type: PointType::Bus,
            destination: DestinationId(1),
            date_from: now() + Duration::hours(from_hours),
            date_to: now() + Duration::hours(to_hours),
            base_price: 10,
            offers: BTreeSet::new(),
            is_favorite: false,
        }
    }

    #[test]
    fn predicates_split_points_around_now() {
        let past = point(1, -5, -1);
        let present = point(2, -1, 1);
        let future = point(3, 1, 5);

        assert!(matches(FilterType::Past, &past, now()));
        assert!(!matches(FilterType::Past, &present, now()));
        assert!(matches(FilterType::Present, &present, now()));
        assert!(!matches(FilterType::Present, &future, now()));
        assert!(matches(FilterType::Future, &future, now()));
        assert!(!matches(FilterType::Future, &present, now()));
        for p in [&past, &present, &future] {
            assert!(matches(FilterType::Everything, p, now()));
        }
    }

    #[test]
    fn point_starting_exactly_now_is_present_not_future() {
        let starts_now = point(1, 0, 2);
        assert!(matches(FilterType::Present, &starts_now, now()));
        assert!(!matches(FilterType::Future, &starts_now, now()));
    }

    #[test]
    fn filter_points_keeps_relative_order() {
        let points = vec![point(5, 2, 3), point(1, -3, -2), point(4, 1, 9)];
        let ids: Vec<_> = filter_points(FilterType::Future, &points, now())
            .into_iter()
            .map(|p| p.id.0)
            .collect();
        assert_eq!(ids, vec![5, 4]);
    }

    #[test]
    fn set_filter_notifies_even_when_unchanged() {
        let model = FilterModel::new(FilterType::Everything);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        model.subscribe(move |update_type, filter| log.borrow_mut().push((update_type, *filter)));

        model.set_filter(UpdateType::Major, FilterType::Past);
        model.set_filter(UpdateType::Major, FilterType::Past);

        assert_eq!(model.filter(), FilterType::Past);
        assert_eq!(
            *seen.borrow(),
            vec![
                (UpdateType::Major, FilterType::Past),
                (UpdateType::Major, FilterType::Past)
            ]
        );
    }
}
