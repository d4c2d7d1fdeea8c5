use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pose + dye
// ---------------------------------------------------------------------------

/// Position and yaw of a piece of furniture. `rotate` is in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotate: f32,
}

impl Pose {
    pub fn new(x: f32, y: f32, z: f32, rotate: f32) -> Self {
        Self { x, y, z, rotate }
    }

    pub fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Euclidean distance between the two positions (rotation ignored).
    pub fn distance(&self, other: &Pose) -> f32 {
        distance(self.position(), other.position())
    }

    /// Absolute yaw difference, wrapped into `[0, PI]`.
    pub fn rotation_delta(&self, other: &Pose) -> f32 {
        let tau = std::f32::consts::TAU;
        let d = (self.rotate - other.rotate).rem_euclid(tau);
        d.min(tau - d)
    }
}

pub fn distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Stain id and material item id. Zero means "none" for both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dye {
    #[serde(default)]
    pub stain: u32,
    #[serde(default)]
    pub material_item_key: u32,
}

impl Dye {
    pub fn is_none(&self) -> bool {
        self.stain == 0 && self.material_item_key == 0
    }
}

// ---------------------------------------------------------------------------
// Live scene
// ---------------------------------------------------------------------------

/// Generation-checked reference into a live scene table.
///
/// The slot index alone is not enough: when the host removes an object and
/// reuses the slot, the generation changes and old handles stop resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LiveHandle {
    pub index: u32,
    pub generation: u32,
}

impl std::fmt::Display for LiveHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.index, self.generation)
    }
}

/// One piece of furniture as enumerated by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveObject {
    pub handle: LiveHandle,
    pub item_key: u32,
    pub name: String,
    pub pose: Pose,
    pub dye: Dye,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingArea {
    Indoors,
    Outdoors,
    /// Island sanctuary. Furniture there is tracked with the exterior list.
    Island,
}

impl std::fmt::Display for HousingArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Indoors => write!(f, "indoors"),
            Self::Outdoors => write!(f, "outdoors"),
            Self::Island => write!(f, "island"),
        }
    }
}

/// Storey of a house interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Floor {
    Basement,
    Ground,
    Upper,
}

impl std::fmt::Display for Floor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basement => write!(f, "basement"),
            Self::Ground => write!(f, "ground floor"),
            Self::Upper => write!(f, "upper floor"),
        }
    }
}

/// Editing capabilities currently granted by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditMode {
    pub housing_mode: bool,
    pub can_edit_item: bool,
    pub can_dye_item: bool,
}

// ---------------------------------------------------------------------------
// Saved layout
// ---------------------------------------------------------------------------

/// One placed furniture entry.
///
/// The saved fields round-trip through save files; the live binding and
/// the three flags are recomputed by every reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingItem {
    pub item_key: u32,
    pub name: String,
    #[serde(default)]
    pub material_item_key: u32,
    #[serde(default)]
    pub stain: u32,
    #[serde(flatten)]
    pub pose: Pose,

    #[serde(skip)]
    pub live: Option<LiveHandle>,
    #[serde(skip)]
    pub correct_location: bool,
    #[serde(skip)]
    pub correct_rotation: bool,
    #[serde(skip)]
    pub dye_match: bool,
}

impl HousingItem {
    pub fn new(item_key: u32, name: impl Into<String>, pose: Pose) -> Self {
        Self {
            item_key,
            name: name.into(),
            material_item_key: 0,
            stain: 0,
            pose,
            live: None,
            correct_location: false,
            correct_rotation: false,
            dye_match: false,
        }
    }

    pub fn with_dye(mut self, dye: Dye) -> Self {
        self.stain = dye.stain;
        self.material_item_key = dye.material_item_key;
        self
    }

    /// Saved copy of a live object, bound to it.
    pub fn from_live(object: &LiveObject) -> Self {
        let mut item = Self::new(object.item_key, object.name.clone(), object.pose).with_dye(object.dye);
        item.live = Some(object.handle);
        item
    }

    pub fn dye(&self) -> Dye {
        Dye {
            stain: self.stain,
            material_item_key: self.material_item_key,
        }
    }

    /// No live counterpart; flags must not be trusted.
    pub fn is_missing(&self) -> bool {
        self.live.is_none()
    }

    /// Bound and sitting exactly where the save says.
    pub fn is_in_place(&self) -> bool {
        !self.is_missing() && self.correct_location && self.correct_rotation
    }

    /// Drop the live binding and reset every flag.
    pub fn unbind(&mut self) {
        self.live = None;
        self.correct_location = false;
        self.correct_rotation = false;
        self.dye_match = false;
    }
}

/// Static housing fixture (walls, flooring, roof, ...). Never live-matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub level: String,
    #[serde(rename = "type")]
    pub fixture_type: String,
    pub item_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub interior_fixtures: Vec<Fixture>,
    #[serde(default)]
    pub exterior_fixtures: Vec<Fixture>,
}

/// Everything a save source provides or accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedLayout {
    #[serde(default)]
    pub interior_items: Vec<HousingItem>,
    #[serde(default)]
    pub exterior_items: Vec<HousingItem>,
    #[serde(default, flatten)]
    pub layout: Layout,
}

// ---------------------------------------------------------------------------
// Partitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Interior,
    Exterior,
    Unused,
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interior => write!(f, "interior"),
            Self::Exterior => write!(f, "exterior"),
            Self::Unused => write!(f, "unused"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partitions {
    pub interior: Vec<HousingItem>,
    pub exterior: Vec<HousingItem>,
    pub unused: Vec<HousingItem>,
}

impl Partitions {
    pub fn get(&self, partition: Partition) -> &[HousingItem] {
        match partition {
            Partition::Interior => &self.interior,
            Partition::Exterior => &self.exterior,
            Partition::Unused => &self.unused,
        }
    }

    pub fn get_mut(&mut self, partition: Partition) -> &mut Vec<HousingItem> {
        match partition {
            Partition::Interior => &mut self.interior,
            Partition::Exterior => &mut self.exterior,
            Partition::Unused => &mut self.unused,
        }
    }

    pub fn total(&self) -> usize {
        self.interior.len() + self.exterior.len() + self.unused.len()
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub area: Option<HousingArea>,
    pub matched: usize,
    pub missing: usize,
    pub unused: usize,
    pub misplaced: usize,
    pub misrotated: usize,
    pub dye_mismatches: usize,
}

/// Outcome of a bulk apply (layout or dyes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub written: usize,
    pub already_correct: usize,
    pub missing: usize,
    /// Left alone because their floor is disabled in `[apply.floors]`.
    pub skipped_floor: usize,
}
