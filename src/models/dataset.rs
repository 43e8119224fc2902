use serde::{Deserialize, Serialize};

use crate::services::distance::GeoPoint;

/// A campus building as loaded from the dataset file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    pub code: String,
    /// Stored `[lng, lat]`, echoed back verbatim. Empty when the file had none.
    pub coordinates: Vec<f64>,
    pub rooms: Vec<Room>,
}

impl Building {
    /// Building position, only when the stored pair is complete
    pub fn location(&self) -> Option<GeoPoint> {
        match self.coordinates.as_slice() {
            &[lng, lat] => Some(GeoPoint::from_lng_lat([lng, lat])),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub room_number: String,
    pub schedule: Vec<ScheduleEntry>,
}

impl Room {
    /// All slots across schedule entries, in file order
    pub fn slots(&self) -> impl Iterator<Item = &SlotTimes> {
        self.schedule.iter().flat_map(|entry| entry.slots.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub slots: Vec<SlotTimes>,
}

/// Raw slot bounds. Parsed at request time so a bad value fails the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTimes {
    pub start: String,
    pub end: String,
}

impl SlotTimes {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}
