use crate::model::{Floor, HousingArea, Partition, Pose};

/// Where an entry came from during a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Present in the saved layout (bound or not).
    Saved,
    /// Seen in the scene with no saved counterpart.
    LiveOnly,
}

/// Partition an entry belongs to.
///
/// Saved entries follow the scene they were reconciled in; live-only
/// entries always land in `Unused`.
pub fn classify(origin: Origin, area: HousingArea) -> Partition {
    match origin {
        Origin::LiveOnly => Partition::Unused,
        Origin::Saved => area_partition(area),
    }
}

/// The saved-item partition that tracks furniture for `area`.
pub fn area_partition(area: HousingArea) -> Partition {
    match area {
        HousingArea::Indoors => Partition::Interior,
        HousingArea::Outdoors | HousingArea::Island => Partition::Exterior,
    }
}

/// Height at and above which an interior item sits on the upper floor.
pub const UPPER_FLOOR_MIN_Y: f32 = 6.5;

/// Height below which an interior item sits in the basement.
pub const BASEMENT_MAX_Y: f32 = -3.5;

/// Interior storey of a saved pose, by height band.
pub fn floor_of(pose: &Pose) -> Floor {
    if pose.y >= UPPER_FLOOR_MIN_Y {
        Floor::Upper
    } else if pose.y < BASEMENT_MAX_Y {
        Floor::Basement
    } else {
        Floor::Ground
    }
}
