use super::*;

use std::collections::BTreeSet;

use chrono::{Duration, TimeZone};
use shared::domain::{DestinationId, PointId, PointType};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap()
}

fn point(id: i64, starts_in_hours: i64, hours: i64, price: u32) -> TripPoint {
    let date_from = now() + Duration::hours(starts_in_hours);
    TripPoint {
        id: PointId(id),
        point_type: PointType::Flight,
        destination: DestinationId(1),
        date_from,
        date_to: date_from + Duration::hours(hours),
        base_price: price,
        offers: BTreeSet::new(),
        is_favorite: false,
    }
}

fn ids(points: &[TripPoint]) -> Vec<i64> {
    points.iter().map(|point| point.id.0).collect()
}

#[test]
fn day_sort_orders_by_start_time() {
    let points = vec![point(1, 20, 1, 10), point(2, 10, 1, 10)];
    let visible = visible_points(&points, FilterType::Everything, SortType::Day, now());
    assert_eq!(ids(&visible), vec![2, 1]);
}

#[test]
fn time_sort_puts_longest_first() {
    let points = vec![point(1, 1, 2, 10), point(2, 2, 8, 10), point(3, 3, 5, 10)];
    let visible = visible_points(&points, FilterType::Everything, SortType::Time, now());
    assert_eq!(ids(&visible), vec![2, 3, 1]);
}

#[test]
fn price_sort_puts_most_expensive_first() {
    let points = vec![point(1, 1, 1, 50), point(2, 2, 1, 300), point(3, 3, 1, 120)];
    let visible = visible_points(&points, FilterType::Everything, SortType::Price, now());
    assert_eq!(ids(&visible), vec![2, 3, 1]);
}

#[test]
fn equal_keys_keep_filtered_order() {
    let points = vec![
        point(4, 5, 1, 100),
        point(1, 2, 3, 100),
        point(3, 9, 2, 70),
        point(2, 1, 3, 100),
    ];

    let by_price = visible_points(&points, FilterType::Everything, SortType::Price, now());
    assert_eq!(ids(&by_price), vec![4, 1, 2, 3]);

    let by_time = visible_points(&points, FilterType::Everything, SortType::Time, now());
    assert_eq!(ids(&by_time), vec![1, 2, 3, 4]);
}

#[test]
fn filter_applies_before_sort() {
    let points = vec![
        point(1, 30, 1, 10),
        point(2, -10, 2, 500),
        point(3, 5, 1, 90),
    ];
    let visible = visible_points(&points, FilterType::Future, SortType::Price, now());
    assert_eq!(ids(&visible), vec![3, 1]);
}

#[test]
fn derivation_leaves_input_untouched() {
    let points = vec![point(1, 20, 1, 10), point(2, 10, 1, 99)];
    let before = points.clone();
    let _ = visible_points(&points, FilterType::Everything, SortType::Price, now());
    assert_eq!(points, before);
}

#[test]
fn sort_key_change_detection_follows_active_sort() {
    let before = point(1, 1, 2, 100);
    let mut pricier = before.clone();
    pricier.base_price = 150;

    assert!(sort::sort_key_changed(SortType::Price, &before, &pricier));
    assert!(!sort::sort_key_changed(SortType::Day, &before, &pricier));
    assert!(!sort::sort_key_changed(SortType::Time, &before, &pricier));

    let mut shifted = before.clone();
    shifted.date_from += Duration::hours(1);
    shifted.date_to += Duration::hours(1);
    assert!(sort::sort_key_changed(SortType::Day, &before, &shifted));
    assert!(!sort::sort_key_changed(SortType::Time, &before, &shifted));
}
