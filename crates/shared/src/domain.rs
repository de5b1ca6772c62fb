use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TripError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(PointId);
id_newtype!(DestinationId);
id_newtype!(OfferId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PointType {
    Taxi,
    Bus,
    Train,
    Ship,
    Drive,
    #[default]
    Flight,
    CheckIn,
    Sightseeing,
    Restaurant,
}

impl PointType {
    pub const ALL: [PointType; 9] = [
        PointType::Taxi,
        PointType::Bus,
        PointType::Train,
        PointType::Ship,
        PointType::Drive,
        PointType::Flight,
        PointType::CheckIn,
        PointType::Sightseeing,
        PointType::Restaurant,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PointType::Taxi => "taxi",
            PointType::Bus => "bus",
            PointType::Train => "train",
            PointType::Ship => "ship",
            PointType::Drive => "drive",
            PointType::Flight => "flight",
            PointType::CheckIn => "check-in",
            PointType::Sightseeing => "sightseeing",
            PointType::Restaurant => "restaurant",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PointType::Taxi => "Taxi",
            PointType::Bus => "Bus",
            PointType::Train => "Train",
            PointType::Ship => "Ship",
            PointType::Drive => "Drive",
            PointType::Flight => "Flight",
            PointType::CheckIn => "Check-in",
            PointType::Sightseeing => "Sightseeing",
            PointType::Restaurant => "Restaurant",
        }
    }
}

impl fmt::Display for PointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointType {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        PointType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| TripError::InvalidPoint(format!("unknown point type '{s}'")))
    }
}

/// A point that has not been stored yet; the model assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointDraft {
    #[serde(rename = "type")]
    pub point_type: PointType,
    pub destination: Option<DestinationId>,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub base_price: u32,
    #[serde(default)]
    pub offers: BTreeSet<OfferId>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl PointDraft {
    pub fn into_point(self, id: PointId) -> Result<TripPoint, TripError> {
        let destination = self
            .destination
            .ok_or_else(|| TripError::InvalidPoint("destination is required".into()))?;
        let point = TripPoint {
            id,
            point_type: self.point_type,
            destination,
            date_from: self.date_from,
            date_to: self.date_to,
            base_price: self.base_price,
            offers: self.offers,
            is_favorite: self.is_favorite,
        };
        point.check_schedule()?;
        Ok(point)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripPoint {
    pub id: PointId,
    #[serde(rename = "type")]
    pub point_type: PointType,
    pub destination: DestinationId,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub base_price: u32,
    #[serde(default)]
    pub offers: BTreeSet<OfferId>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl TripPoint {
    pub fn duration(&self) -> Duration {
        self.date_to - self.date_from
    }

    pub fn check_schedule(&self) -> Result<(), TripError> {
        if self.date_from > self.date_to {
            return Err(TripError::InvalidPoint(format!(
                "point {} ends before it starts",
                self.id
            )));
        }
        Ok(())
    }

    pub fn to_draft(&self) -> PointDraft {
        PointDraft {
            point_type: self.point_type,
            destination: Some(self.destination),
            date_from: self.date_from,
            date_to: self.date_to,
            base_price: self.base_price,
            offers: self.offers.clone(),
            is_favorite: self.is_favorite,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub src: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pictures: Vec<Picture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub price: u32,
}

/// Extras available for one point type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferGroup {
    #[serde(rename = "type")]
    pub point_type: PointType,
    pub offers: Vec<Offer>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 18, hour, 0, 0).unwrap()
    }

    #[test]
    fn point_type_parses_kebab_case() {
        assert_eq!("check-in".parse::<PointType>().unwrap(), PointType::CheckIn);
        assert_eq!("Flight".parse::<PointType>().unwrap(), PointType::Flight);
        assert!("hovercraft".parse::<PointType>().is_err());
    }

    fn draft() -> PointDraft {
        PointDraft {
            point_type: PointType::Bus,
            destination: None,
            date_from: at(10),
            date_to: at(10),
            base_price: 0,
            offers: BTreeSet::new(),
            is_favorite: false,
        }
    }

    #[test]
    fn draft_without_destination_is_rejected() {
        let draft = draft();
        let err = draft.into_point(PointId(1)).expect_err("no destination");
        assert!(matches!(err, TripError::InvalidPoint(_)));
    }

    #[test]
    fn draft_ending_before_start_is_rejected() {
        let mut draft = draft();
        draft.destination = Some(DestinationId(1));
        draft.date_to = at(9);
        assert!(draft.into_point(PointId(1)).is_err());
    }

    #[test]
    fn point_json_uses_type_field() {
        let raw = r#"{
            "id": 4,
            "type": "sightseeing",
            "destination": 2,
            "date_from": "2026-03-18T10:00:00Z",
            "date_to": "2026-03-18T12:30:00Z",
            "base_price": 120,
            "offers": [7, 3]
        }"#;
        let point: TripPoint = serde_json::from_str(raw).expect("parse");
        assert_eq!(point.point_type, PointType::Sightseeing);
        assert_eq!(point.duration(), Duration::minutes(150));
        assert_eq!(point.offers.iter().copied().collect::<Vec<_>>(), vec![OfferId(3), OfferId(7)]);
        assert!(!point.is_favorite);
    }
}
