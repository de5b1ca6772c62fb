use std::{
    cell::{Cell, RefCell},
    collections::BTreeSet,
    rc::Rc,
};

use shared::{
    domain::{PointDraft, PointId, TripPoint},
    error::TripError,
    protocol::UpdateType,
};
use tracing::{info, warn};

use crate::{
    catalog::Catalog,
    observable::{Observable, SubscriptionId},
};

/// Owns the trip points. Mutations are applied in full before any observer
/// runs, so observers reading the model see the post-mutation state.
#[derive(Debug)]
pub struct PointsModel {
    points: RefCell<Vec<TripPoint>>,
    next_id: Cell<i64>,
    catalog: Rc<Catalog>,
    observable: Observable<TripPoint>,
}

impl PointsModel {
    /// Loads an initial collection. Every point must pass the same checks as
    /// `add`, and ids must be unique.
    pub fn new(points: Vec<TripPoint>, catalog: Rc<Catalog>) -> Result<Self, TripError> {
        let next_id = points.iter().map(|point| point.id.0).max().unwrap_or(0) + 1;
        let model = Self {
            points: RefCell::new(Vec::with_capacity(points.len())),
            next_id: Cell::new(next_id),
            catalog,
            observable: Observable::new(),
        };

        let mut seen = BTreeSet::new();
        for point in &points {
            if !seen.insert(point.id) {
                return Err(TripError::InvalidPoint(format!(
                    "duplicate point id {}",
                    point.id
                )));
            }
            model.validate(point)?;
        }
        *model.points.borrow_mut() = points;
        Ok(model)
    }

    pub fn points(&self) -> Vec<TripPoint> {
        self.points.borrow().clone()
    }

    pub fn get(&self, id: PointId) -> Option<TripPoint> {
        self.points.borrow().iter().find(|point| point.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.points.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.borrow().is_empty()
    }

    pub fn add(&self, update_type: UpdateType, draft: PointDraft) -> Result<TripPoint, TripError> {
        let id = PointId(self.next_id.get());
        let point = draft.into_point(id)?;
        self.validate(&point)?;

        self.next_id.set(id.0 + 1);
        self.points.borrow_mut().push(point.clone());
        info!(point_id = %id, %update_type, "point added");

        self.observable.notify(update_type, &point);
        Ok(point)
    }

    pub fn update(&self, update_type: UpdateType, point: TripPoint) -> Result<(), TripError> {
        let Some(index) = self.position(point.id) else {
            warn!(point_id = %point.id, "can't update unexisting point");
            return Err(TripError::not_found(point.id));
        };
        self.validate(&point)?;
        self.points.borrow_mut()[index] = point.clone();
        info!(point_id = %point.id, %update_type, "point updated");

        self.observable.notify(update_type, &point);
        Ok(())
    }

    /// Removes the point sharing `point`'s id and returns the stored copy.
    pub fn delete(&self, update_type: UpdateType, point: &TripPoint) -> Result<TripPoint, TripError> {
        let Some(index) = self.position(point.id) else {
            warn!(point_id = %point.id, "can't delete unexisting point");
            return Err(TripError::not_found(point.id));
        };
        let removed = self.points.borrow_mut().remove(index);
        info!(point_id = %removed.id, %update_type, "point deleted");

        self.observable.notify(update_type, &removed);
        Ok(removed)
    }

    pub fn subscribe(&self, observer: impl Fn(UpdateType, &TripPoint) + 'static) -> SubscriptionId {
        self.observable.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observable.unsubscribe(id)
    }

    fn position(&self, id: PointId) -> Option<usize> {
        self.points.borrow().iter().position(|existing| existing.id == id)
    }

    fn validate(&self, point: &TripPoint) -> Result<(), TripError> {
        point.check_schedule()?;
        if self.catalog.destinations.by_id(point.destination).is_none() {
            return Err(TripError::UnknownDestination(point.destination.to_string()));
        }
        self.catalog
            .offers
            .check_selection(point.point_type, &point.offers)
    }
}

#[cfg(test)]
#[path = "tests/points_tests.rs"]
mod tests;
