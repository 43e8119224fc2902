use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use validator::Validate;

use crate::constants::geo::{MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE};
use crate::services::distance::GeoPoint;

/// Availability of a slot relative to the current time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Upcoming,
    Unavailable,
    Passed,
}

impl SlotStatus {
    /// Precedence when aggregating a building. Passed slots carry none.
    fn rank(self) -> Option<u8> {
        match self {
            SlotStatus::Available => Some(2),
            SlotStatus::Upcoming => Some(1),
            SlotStatus::Unavailable => Some(0),
            SlotStatus::Passed => None,
        }
    }

    /// Fold another slot status into a running building status
    pub fn combine(self, other: SlotStatus) -> SlotStatus {
        match (self.rank(), other.rank()) {
            (Some(current), Some(next)) if next > current => other,
            (None, Some(_)) => other,
            _ => self,
        }
    }

    /// Most open status among `statuses`, `Unavailable` when none qualify
    pub fn aggregate<I>(statuses: I) -> SlotStatus
    where
        I: IntoIterator<Item = SlotStatus>,
    {
        statuses
            .into_iter()
            .fold(SlotStatus::Unavailable, SlotStatus::combine)
    }

    pub fn is_passed(self) -> bool {
        self == SlotStatus::Passed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::Upcoming => "upcoming",
            SlotStatus::Unavailable => "unavailable",
            SlotStatus::Passed => "passed",
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A retained slot tagged with its status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoomSlot {
    #[serde(rename = "StartTime")]
    #[schema(example = "09:00:00")]
    pub start_time: String,
    #[serde(rename = "EndTime")]
    #[schema(example = "17:00:00")]
    pub end_time: String,
    #[serde(rename = "Status")]
    pub status: SlotStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BuildingRoom {
    pub slots: Vec<RoomSlot>,
}

/// One building in the open-classrooms response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BuildingResult {
    #[schema(example = "College of Arts and Sciences")]
    pub building: String,
    #[schema(example = "CAS")]
    pub building_code: String,
    pub building_status: SlotStatus,
    /// Room number to its non-passed slots
    pub rooms: BTreeMap<String, BuildingRoom>,
    /// `[lng, lat]` as stored in the dataset
    #[schema(example = json!([-71.1043, 42.3503]))]
    pub coords: Vec<f64>,
    /// Kilometers from the caller, 0 when no location was given
    pub distance: f64,
}

/// Caller position for distance sorting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserLocation {
    #[validate(range(min = MIN_LATITUDE, max = MAX_LATITUDE))]
    #[schema(example = 42.3505)]
    pub lat: f64,
    #[validate(range(min = MIN_LONGITUDE, max = MAX_LONGITUDE))]
    #[schema(example = json!(-71.1054))]
    pub lng: f64,
}

impl UserLocation {
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<UserLocation> for GeoPoint {
    fn from(location: UserLocation) -> Self {
        GeoPoint::new(location.lat, location.lng)
    }
}
