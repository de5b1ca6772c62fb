use std::collections::BTreeSet;

use shared::{
    domain::{Destination, DestinationId, Offer, OfferGroup, OfferId, PointType},
    error::TripError,
};

#[derive(Debug, Clone, Default)]
pub struct DestinationsModel {
    destinations: Vec<Destination>,
}

impl DestinationsModel {
    pub fn new(destinations: Vec<Destination>) -> Self {
        Self { destinations }
    }

    pub fn all(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn by_id(&self, id: DestinationId) -> Option<&Destination> {
        self.destinations.iter().find(|destination| destination.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Destination> {
        let name = name.trim();
        self.destinations
            .iter()
            .find(|destination| destination.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Default)]
pub struct OffersModel {
    groups: Vec<OfferGroup>,
}

impl OffersModel {
    pub fn new(groups: Vec<OfferGroup>) -> Self {
        Self { groups }
    }

    pub fn all(&self) -> &[OfferGroup] {
        &self.groups
    }

    /// Extras offered for `point_type`; empty when the type has none.
    pub fn by_type(&self, point_type: PointType) -> &[Offer] {
        self.groups
            .iter()
            .find(|group| group.point_type == point_type)
            .map(|group| group.offers.as_slice())
            .unwrap_or_default()
    }

    pub fn offer(&self, point_type: PointType, id: OfferId) -> Option<&Offer> {
        self.by_type(point_type).iter().find(|offer| offer.id == id)
    }

    pub fn check_selection(
        &self,
        point_type: PointType,
        selected: &BTreeSet<OfferId>,
    ) -> Result<(), TripError> {
        match selected
            .iter()
            .find(|id| self.offer(point_type, **id).is_none())
        {
            Some(offer_id) => Err(TripError::UnknownOffer {
                point_type,
                offer_id: *offer_id,
            }),
            None => Ok(()),
        }
    }
}

/// Reference data the presenters and the points model look things up in.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub destinations: DestinationsModel,
    pub offers: OffersModel,
}

impl Catalog {
    pub fn new(destinations: DestinationsModel, offers: OffersModel) -> Self {
        Self {
            destinations,
            offers,
        }
    }
}
