use thiserror::Error;

use crate::domain::{OfferId, PointId, PointType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripError {
    #[error("point {id} not found")]
    NotFound { id: PointId },
    #[error("unknown action type '{0}'")]
    InvalidAction(String),
    #[error("unknown update type '{0}'")]
    InvalidUpdateType(String),
    #[error("unknown filter '{0}'")]
    InvalidFilter(String),
    #[error("unknown sort type '{0}'")]
    InvalidSort(String),
    #[error("invalid point: {0}")]
    InvalidPoint(String),
    #[error("unknown destination '{0}'")]
    UnknownDestination(String),
    #[error("offer {offer_id} is not available for {point_type}")]
    UnknownOffer {
        point_type: PointType,
        offer_id: OfferId,
    },
}

impl TripError {
    pub fn not_found(id: PointId) -> Self {
        Self::NotFound { id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
