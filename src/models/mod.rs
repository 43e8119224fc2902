// Data models and DTOs
// Dataset entities, API request/response models

pub mod classroom;
pub mod dataset;

pub use classroom::{BuildingResult, BuildingRoom, RoomSlot, SlotStatus, UserLocation};
pub use dataset::{Building, Room, ScheduleEntry, SlotTimes};
