//! Editable state behind the edit and creation forms.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use shared::{
    domain::{DestinationId, OfferId, PointDraft, PointId, PointType, TripPoint},
    error::TripError,
};
use trip_model::Catalog;

use crate::render::{FormCard, FormKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    Type(PointType),
    /// Destination typed by name; an unknown name clears the field.
    Destination(String),
    BasePrice(u32),
    DateFrom(DateTime<Utc>),
    DateTo(DateTime<Utc>),
    ToggleOffer(OfferId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointForm {
    point_id: Option<PointId>,
    point_type: PointType,
    destination: Option<DestinationId>,
    date_from: Option<DateTime<Utc>>,
    date_to: Option<DateTime<Utc>>,
    base_price: u32,
    offers: BTreeSet<OfferId>,
    is_favorite: bool,
}

impl PointForm {
    pub fn for_point(point: &TripPoint) -> Self {
        Self {
            point_id: Some(point.id),
            point_type: point.point_type,
            destination: Some(point.destination),
            date_from: Some(point.date_from),
            date_to: Some(point.date_to),
            base_price: point.base_price,
            offers: point.offers.clone(),
            is_favorite: point.is_favorite,
        }
    }

    pub fn blank(point_type: PointType) -> Self {
        Self {
            point_id: None,
            point_type,
            destination: None,
            date_from: None,
            date_to: None,
            base_price: 0,
            offers: BTreeSet::new(),
            is_favorite: false,
        }
    }

    pub fn point_type(&self) -> PointType {
        self.point_type
    }

    pub fn destination(&self) -> Option<DestinationId> {
        self.destination
    }

    pub fn offers(&self) -> &BTreeSet<OfferId> {
        &self.offers
    }

    /// Applies one input. Returns whether the form has to be re-rendered.
    pub fn apply(&mut self, input: FormInput, catalog: &Catalog) -> Result<bool, TripError> {
        match input {
            FormInput::Type(point_type) => {
                self.point_type = point_type;
                self.offers
                    .retain(|id| catalog.offers.offer(point_type, *id).is_some());
                Ok(true)
            }
            FormInput::Destination(name) => {
                self.destination = catalog.destinations.by_name(&name).map(|d| d.id);
                Ok(true)
            }
            FormInput::BasePrice(price) => {
                self.base_price = price;
                Ok(false)
            }
            FormInput::DateFrom(date) => {
                if self.date_to.is_some_and(|to| date > to) {
                    return Err(TripError::InvalidPoint(
                        "start date must not be after the end date".into(),
                    ));
                }
                self.date_from = Some(date);
                Ok(false)
            }
            FormInput::DateTo(date) => {
                if self.date_from.is_some_and(|from| date < from) {
                    return Err(TripError::InvalidPoint(
                        "end date must not be before the start date".into(),
                    ));
                }
                self.date_to = Some(date);
                Ok(false)
            }
            FormInput::ToggleOffer(id) => {
                if catalog.offers.offer(self.point_type, id).is_none() {
                    return Err(TripError::UnknownOffer {
                        point_type: self.point_type,
                        offer_id: id,
                    });
                }
                if !self.offers.remove(&id) {
                    self.offers.insert(id);
                }
                Ok(false)
            }
        }
    }

    pub fn to_draft(&self, catalog: &Catalog) -> Result<PointDraft, TripError> {
        let (Some(date_from), Some(date_to)) = (self.date_from, self.date_to) else {
            return Err(TripError::InvalidPoint(
                "start and end dates are required".into(),
            ));
        };
        if self.destination.is_none() {
            return Err(TripError::InvalidPoint("destination is required".into()));
        }
        if date_from > date_to {
            return Err(TripError::InvalidPoint(
                "start date must not be after the end date".into(),
            ));
        }
        catalog.offers.check_selection(self.point_type, &self.offers)?;

        Ok(PointDraft {
            point_type: self.point_type,
            destination: self.destination,
            date_from,
            date_to,
            base_price: self.base_price,
            offers: self.offers.clone(),
            is_favorite: self.is_favorite,
        })
    }

    /// Submitted record for an edit form; blank forms have no id.
    pub fn to_point(&self, catalog: &Catalog) -> Result<TripPoint, TripError> {
        let id = self
            .point_id
            .ok_or_else(|| TripError::InvalidPoint("form is not bound to a point".into()))?;
        self.to_draft(catalog)?.into_point(id)
    }

    pub fn card(&self, kind: FormKind, catalog: &Catalog) -> FormCard {
        FormCard {
            kind,
            point_id: self.point_id,
            point_type: self.point_type,
            destination: self
                .destination
                .and_then(|id| catalog.destinations.by_id(id))
                .cloned(),
            date_from: self.date_from,
            date_to: self.date_to,
            base_price: self.base_price,
            available_offers: catalog.offers.by_type(self.point_type).to_vec(),
            selected_offers: self.offers.clone(),
            destination_names: catalog
                .destinations
                .all()
                .iter()
                .map(|d| d.name.clone())
                .collect(),
        }
    }
}
