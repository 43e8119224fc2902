use chrono::NaiveTime;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::ApiError;
use crate::models::{Building, BuildingResult, BuildingRoom, RoomSlot, SlotStatus};
use crate::services::availability::get_slot_status;
use crate::services::dataset::SpaceDataset;
use crate::services::distance::GeoPoint;

/// Buildings with at least one room that is still usable today.
///
/// Passed slots are dropped, then empty rooms and empty buildings. With a
/// location the result is ordered nearest first; without one it keeps the
/// dataset order and every distance is 0.
pub fn find_open_classrooms(
    dataset: &SpaceDataset,
    now: NaiveTime,
    location: Option<GeoPoint>,
) -> Result<Vec<BuildingResult>, ApiError> {
    let mut results = Vec::with_capacity(dataset.len());

    for building in dataset.buildings() {
        if let Some(result) = summarize_building(building, now, location)? {
            results.push(result);
        }
    }

    if location.is_some() {
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    }

    metrics::counter!("open_classrooms_requests_total",
        "located" => if location.is_some() { "true" } else { "false" })
    .increment(1);
    metrics::histogram!("open_classrooms_buildings_returned").record(results.len() as f64);

    debug!(
        buildings = results.len(),
        located = location.is_some(),
        "Open classrooms computed"
    );

    Ok(results)
}

fn summarize_building(
    building: &Building,
    now: NaiveTime,
    location: Option<GeoPoint>,
) -> Result<Option<BuildingResult>, ApiError> {
    let mut statuses = Vec::new();
    let mut rooms = BTreeMap::new();

    for room in &building.rooms {
        let mut slots = Vec::new();

        for slot in room.slots() {
            let status = get_slot_status(now, &slot.start, &slot.end)?;
            statuses.push(status);

            if !status.is_passed() {
                slots.push(RoomSlot {
                    start_time: slot.start.clone(),
                    end_time: slot.end.clone(),
                    status,
                });
            }
        }

        if !slots.is_empty() {
            rooms.insert(room.room_number.clone(), BuildingRoom { slots });
        }
    }

    if rooms.is_empty() {
        return Ok(None);
    }

    let building_status = SlotStatus::aggregate(statuses);
    let distance = match (location, building.location()) {
        (Some(user), Some(site)) => user.distance_to(&site),
        _ => 0.0,
    };

    Ok(Some(BuildingResult {
        building: building.name.clone(),
        building_code: building.code.clone(),
        building_status,
        rooms,
        coords: building.coordinates.clone(),
        distance,
    }))
}
