//! Enums exchanged between presenters and models: update scope, user actions,
//! filter and sort selection.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{PointDraft, TripPoint},
    error::TripError,
};

/// How much of the board a change notification invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    /// One point changed in place; visible set and order are unaffected.
    Patch,
    /// Visible set or order may change; sort and filter are kept.
    Minor,
    /// Full reset, sort returns to its default.
    Major,
}

impl UpdateType {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateType::Patch => "patch",
            UpdateType::Minor => "minor",
            UpdateType::Major => "major",
        }
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateType {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patch" => Ok(UpdateType::Patch),
            "minor" => Ok(UpdateType::Minor),
            "major" => Ok(UpdateType::Major),
            _ => Err(TripError::InvalidUpdateType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    CreatePoint,
    UpdatePoint,
    DeletePoint,
}

impl UserAction {
    pub fn as_str(self) -> &'static str {
        match self {
            UserAction::CreatePoint => "create_point",
            UserAction::UpdatePoint => "update_point",
            UserAction::DeletePoint => "delete_point",
        }
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserAction {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" | "create_point" => Ok(UserAction::CreatePoint),
            "update" | "update_point" => Ok(UserAction::UpdatePoint),
            "delete" | "delete_point" => Ok(UserAction::DeletePoint),
            _ => Err(TripError::InvalidAction(s.to_string())),
        }
    }
}

/// A request raised by a presenter and routed by the board to the points model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    CreatePoint(PointDraft),
    UpdatePoint(TripPoint),
    DeletePoint(TripPoint),
}

impl ViewAction {
    pub fn kind(&self) -> UserAction {
        match self {
            ViewAction::CreatePoint(_) => UserAction::CreatePoint,
            ViewAction::UpdatePoint(_) => UserAction::UpdatePoint,
            ViewAction::DeletePoint(_) => UserAction::DeletePoint,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    #[default]
    Everything,
    Future,
    Present,
    Past,
}

impl FilterType {
    pub const ALL: [FilterType; 4] = [
        FilterType::Everything,
        FilterType::Future,
        FilterType::Present,
        FilterType::Past,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterType::Everything => "everything",
            FilterType::Future => "future",
            FilterType::Present => "present",
            FilterType::Past => "past",
        }
    }

    /// Text shown on an empty board.
    pub fn empty_message(self) -> &'static str {
        match self {
            FilterType::Everything => "Click New Event to create your first point",
            FilterType::Future => "There are no future events now",
            FilterType::Present => "There are no present events now",
            FilterType::Past => "There are no past events now",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        FilterType::ALL
            .into_iter()
            .find(|filter| filter.as_str() == lower)
            .ok_or_else(|| TripError::InvalidFilter(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortType {
    /// Start time, earliest first.
    #[default]
    Day,
    /// Duration, longest first.
    Time,
    /// Base price, most expensive first.
    Price,
}

impl SortType {
    pub const ALL: [SortType; 3] = [SortType::Day, SortType::Time, SortType::Price];

    pub fn as_str(self) -> &'static str {
        match self {
            SortType::Day => "day",
            SortType::Time => "time",
            SortType::Price => "price",
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortType {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        SortType::ALL
            .into_iter()
            .find(|sort| sort.as_str() == lower)
            .ok_or_else(|| TripError::InvalidSort(s.to_string()))
    }
}
