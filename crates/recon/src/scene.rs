//! Live-scene collaborator.
//!
//! The host owns the furniture actually placed in the game. The engine only
//! sees it through [`LiveScene`]: an enumeration, capability flags, and
//! pose/dye writes keyed by [`LiveHandle`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::{Dye, EditMode, HousingArea, LiveHandle, LiveObject, Pose};

pub trait LiveScene {
    fn mode(&self) -> EditMode;

    fn area(&self) -> HousingArea;

    /// Every object in the active scene, in the host's enumeration order.
    fn objects(&self) -> Vec<LiveObject>;

    fn resolve(&self, handle: LiveHandle) -> Option<LiveObject>;

    fn write_pose(&mut self, handle: LiveHandle, pose: Pose) -> Result<(), ReconError>;

    fn write_dye(&mut self, handle: LiveHandle, dye: Dye) -> Result<(), ReconError>;

    /// Called between consecutive writes of a bulk apply.
    fn settle(&mut self, _interval: Duration) {}
}

// ---------------------------------------------------------------------------
// In-memory table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    object: Option<SceneObject>,
}

/// Host-independent payload of a live object (no handle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub item_key: u32,
    pub name: String,
    #[serde(flatten)]
    pub pose: Pose,
    #[serde(flatten)]
    pub dye: Dye,
}

/// Slot table with generation-checked handles.
#[derive(Debug, Clone)]
pub struct SceneTable {
    mode: EditMode,
    area: HousingArea,
    slots: Vec<Slot>,
    free: Vec<u32>,
    pose_writes: usize,
    dye_writes: usize,
}

impl SceneTable {
    pub fn new(area: HousingArea, mode: EditMode) -> Self {
        Self {
            mode,
            area,
            slots: Vec::new(),
            free: Vec::new(),
            pose_writes: 0,
            dye_writes: 0,
        }
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
    }

    pub fn set_area(&mut self, area: HousingArea) {
        self.area = area;
    }

    pub fn insert(&mut self, object: SceneObject) -> LiveHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.object = Some(object);
            LiveHandle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                object: Some(object),
            });
            LiveHandle { index, generation: 0 }
        }
    }

    /// Remove an object; any outstanding handle to it goes stale.
    pub fn remove(&mut self, handle: LiveHandle) -> Option<SceneObject> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let object = slot.object.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Some(object)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.object.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pose writes accepted so far.
    pub fn pose_writes(&self) -> usize {
        self.pose_writes
    }

    pub fn dye_writes(&self) -> usize {
        self.dye_writes
    }

    fn slot_mut(&mut self, handle: LiveHandle) -> Result<&mut SceneObject, ReconError> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.object.as_mut())
            .ok_or(ReconError::StaleHandle {
                index: handle.index,
                generation: handle.generation,
            })
    }

    // -- snapshots -----------------------------------------------------------

    pub fn from_snapshot(snapshot: SceneSnapshot) -> Self {
        let mut table = Self::new(snapshot.area, snapshot.mode);
        for object in snapshot.objects {
            table.insert(object);
        }
        table
    }

    /// Live objects in enumeration order. Handles are not preserved.
    pub fn to_snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            area: self.area,
            mode: self.mode,
            objects: self
                .slots
                .iter()
                .filter_map(|s| s.object.clone())
                .collect(),
        }
    }

    pub fn from_json(input: &str) -> Result<Self, ReconError> {
        let snapshot: SceneSnapshot =
            serde_json::from_str(input).map_err(|e| ReconError::Import(e.to_string()))?;
        Ok(Self::from_snapshot(snapshot))
    }
}

impl LiveScene for SceneTable {
    fn mode(&self) -> EditMode {
        self.mode
    }

    fn area(&self) -> HousingArea {
        self.area
    }

    fn objects(&self) -> Vec<LiveObject> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                slot.object.as_ref().map(|o| LiveObject {
                    handle: LiveHandle {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    item_key: o.item_key,
                    name: o.name.clone(),
                    pose: o.pose,
                    dye: o.dye,
                })
            })
            .collect()
    }

    fn resolve(&self, handle: LiveHandle) -> Option<LiveObject> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.object.as_ref().map(|o| LiveObject {
            handle,
            item_key: o.item_key,
            name: o.name.clone(),
            pose: o.pose,
            dye: o.dye,
        })
    }

    fn write_pose(&mut self, handle: LiveHandle, pose: Pose) -> Result<(), ReconError> {
        self.slot_mut(handle)?.pose = pose;
        self.pose_writes += 1;
        Ok(())
    }

    fn write_dye(&mut self, handle: LiveHandle, dye: Dye) -> Result<(), ReconError> {
        self.slot_mut(handle)?.dye = dye;
        self.dye_writes += 1;
        Ok(())
    }
}

/// Serializable dump of a scene: what the host reported at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub area: HousingArea,
    #[serde(default)]
    pub mode: EditMode,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}
