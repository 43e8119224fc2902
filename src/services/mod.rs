// Domain services
// Slot classification, distance, dataset loading and the open-classrooms query

pub mod availability;
pub mod dataset;
pub mod distance;
pub mod open_classrooms;

pub use dataset::{DatasetError, SpaceDataset};
pub use distance::GeoPoint;
pub use open_classrooms::find_open_classrooms;
