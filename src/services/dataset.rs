//! Study-space dataset loading.
//!
//! The file is a JSON array of buildings. Entries that do not have the
//! expected shape are skipped one by one instead of failing the whole load.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Building, Room, ScheduleEntry, SlotTimes};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dataset top level must be an array of buildings")]
    NotAnArray,
}

/// Immutable snapshot of every building known to the service
#[derive(Debug, Clone, Default)]
pub struct SpaceDataset {
    buildings: Vec<Building>,
}

impl SpaceDataset {
    pub fn from_buildings(buildings: Vec<Building>) -> Self {
        Self { buildings }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            buildings = dataset.len(),
            "Study space dataset loaded"
        );
        Ok(dataset)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, DatasetError> {
        let entries = value.as_array().ok_or(DatasetError::NotAnArray)?;

        let buildings: Vec<Building> = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let building = parse_building(entry);
                if building.is_none() {
                    debug!(index, "Skipping building without name or code");
                }
                building
            })
            .collect();

        Ok(Self { buildings })
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }
}

fn parse_building(value: &Value) -> Option<Building> {
    let object = value.as_object()?;
    let name = non_empty_str(object, "name")?;
    let code = non_empty_str(object, "code")?;

    let rooms = match object.get("rooms") {
        Some(Value::Array(rooms)) => rooms
            .iter()
            .filter_map(|room| {
                let parsed = parse_room(room);
                if parsed.is_none() {
                    debug!(building = %code, "Skipping room without roomNumber");
                }
                parsed
            })
            .collect(),
        _ => Vec::new(),
    };

    Some(Building {
        name,
        code,
        coordinates: parse_coordinates(object.get("coordinates")),
        rooms,
    })
}

/// Keep coordinates only when every element is a number
fn parse_coordinates(value: Option<&Value>) -> Vec<f64> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(Value::as_f64)
            .collect::<Option<Vec<f64>>>()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn parse_room(value: &Value) -> Option<Room> {
    let object = value.as_object()?;
    let room_number = match object.get("roomNumber")? {
        Value::String(number) if !number.is_empty() => number.clone(),
        Value::Number(number) if number.as_f64() != Some(0.0) => number.to_string(),
        _ => return None,
    };

    let schedule = match object.get("schedule") {
        Some(Value::Array(entries)) => entries.iter().filter_map(parse_schedule_entry).collect(),
        _ => {
            debug!(room = %room_number, "Room schedule is not an array");
            Vec::new()
        }
    };

    Some(Room {
        room_number,
        schedule,
    })
}

fn parse_schedule_entry(value: &Value) -> Option<ScheduleEntry> {
    let object = value.as_object()?;
    let slots = match object.get("Slots") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(slots)) => slots.iter().filter_map(parse_slot).collect(),
        Some(_) => return None,
    };
    Some(ScheduleEntry { slots })
}

fn parse_slot(value: &Value) -> Option<SlotTimes> {
    let object = value.as_object()?;
    let start = slot_time_text(object.get("StartTime")?)?;
    let end = slot_time_text(object.get("EndTime")?)?;
    Some(SlotTimes { start, end })
}

/// Non-empty values become slot text. Anything but a string will fail to
/// parse when the slot is classified.
fn slot_time_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::String(_) | Value::Null | Value::Bool(false) => None,
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(fields) if fields.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn non_empty_str(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
