//! Session state: the three item partitions, the fixtures, and every user
//! action that reads or rewrites them.
//!
//! All mutation goes through `&mut self`, so one owner serialises sort,
//! clear and reconciliation. Reconciliation builds the new partitions aside
//! and swaps them in with a single assignment.

use std::collections::{BTreeMap, BTreeSet};

use crate::aggregate::count_items;
use crate::classify::{area_partition, floor_of};
use crate::config::ReconConfig;
use crate::engine::{reconcile, require, set_item_dye, set_item_position};
use crate::error::{Capability, ReconError};
use crate::model::{
    ApplyReport, HousingArea, HousingItem, Layout, Partition, Partitions, ReconSummary, SavedLayout,
};
use crate::overlay::{overlay_targets, OverlayTarget};
use crate::scene::LiveScene;
use crate::sort::sort_items;
use crate::source::LayoutSource;
use crate::summary::compute_summary;

#[derive(Debug, Clone, Default)]
pub struct Session {
    partitions: Partitions,
    layout: Layout,
    /// Overlay rows already handled by the user, per list.
    hidden: BTreeSet<(Partition, usize)>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_saved(saved: SavedLayout) -> Self {
        let mut session = Self::new();
        session.replace(saved);
        session
    }

    pub fn partitions(&self) -> &Partitions {
        &self.partitions
    }

    pub fn items(&self, partition: Partition) -> &[HousingItem] {
        self.partitions.get(partition)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn hidden(&self) -> &BTreeSet<(Partition, usize)> {
        &self.hidden
    }

    // -- load / save ---------------------------------------------------------

    /// Replace items and fixtures from `source`. On error nothing changes.
    pub fn load(&mut self, source: &dyn LayoutSource) -> Result<usize, ReconError> {
        let saved = source.load()?;
        self.replace(saved);
        let count = self.partitions.interior.len() + self.partitions.exterior.len();
        log::info!("imported {count} items");
        Ok(count)
    }

    fn replace(&mut self, saved: SavedLayout) {
        let mut partitions = Partitions {
            interior: saved.interior_items,
            exterior: saved.exterior_items,
            unused: Vec::new(),
        };
        partitions.interior.iter_mut().for_each(HousingItem::unbind);
        partitions.exterior.iter_mut().for_each(HousingItem::unbind);
        self.partitions = partitions;
        self.layout = saved.layout;
        self.hidden.clear();
    }

    /// Snapshot for a save sink. `unused` is not part of a save.
    pub fn saved_layout(&self) -> SavedLayout {
        SavedLayout {
            interior_items: self.partitions.interior.clone(),
            exterior_items: self.partitions.exterior.clone(),
            layout: self.layout.clone(),
        }
    }

    /// Replace the active area's items with what is placed right now.
    pub fn capture(&mut self, scene: &dyn LiveScene) -> Result<usize, ReconError> {
        require(scene.mode(), Capability::HousingMode, "save layout")?;
        let active = area_partition(scene.area());
        let captured: Vec<HousingItem> = scene.objects().iter().map(HousingItem::from_live).collect();
        let count = captured.len();

        let mut next = self.partitions.clone();
        *next.get_mut(active) = captured;
        next.unused.clear();
        self.partitions = next;
        self.hidden.retain(|(p, _)| *p != active);

        log::info!("captured {count} items from {}", scene.area());
        Ok(count)
    }

    // -- reconciliation ------------------------------------------------------

    /// Match the active area's saved items against the scene.
    ///
    /// The other area's items are kept but unbound, since none of their
    /// furniture is visible from here.
    pub fn reconcile(&mut self, scene: &dyn LiveScene, config: &ReconConfig) -> Result<ReconSummary, ReconError> {
        require(scene.mode(), Capability::HousingMode, "match layout")?;

        let area = scene.area();
        let active = area_partition(area);
        let live = scene.objects();

        let mut next = reconcile(self.partitions.get(active), &live, area, &config.tolerance);
        for partition in [Partition::Interior, Partition::Exterior] {
            if partition != active {
                let mut carried = self.partitions.get(partition).to_vec();
                carried.iter_mut().for_each(HousingItem::unbind);
                *next.get_mut(partition) = carried;
            }
        }

        let summary = compute_summary(area, next.get(active), &next.unused);
        self.partitions = next;

        log::info!(
            "{area}: {} matched, {} missing, {} unused",
            summary.matched,
            summary.missing,
            summary.unused
        );
        Ok(summary)
    }

    // -- live writes ---------------------------------------------------------

    fn item(&self, partition: Partition, index: usize) -> Result<&HousingItem, ReconError> {
        self.partitions
            .get(partition)
            .get(index)
            .ok_or(ReconError::NoSuchItem { partition, index })
    }

    pub fn set_item_position(
        &self,
        partition: Partition,
        index: usize,
        scene: &mut dyn LiveScene,
    ) -> Result<(), ReconError> {
        set_item_position(self.item(partition, index)?, scene)
    }

    pub fn set_item_dye(
        &self,
        partition: Partition,
        index: usize,
        scene: &mut dyn LiveScene,
    ) -> Result<(), ReconError> {
        set_item_dye(self.item(partition, index)?, scene)
    }

    /// Reconcile, then move every bound item that is out of place.
    pub fn apply_layout(&mut self, scene: &mut dyn LiveScene, config: &ReconConfig) -> Result<ApplyReport, ReconError> {
        require(scene.mode(), Capability::EditItem, "apply layout")?;
        self.reconcile(&*scene, config)?;

        let area = scene.area();
        let active = area_partition(area);
        let floors = &config.apply.floors;
        let mut report = ApplyReport::default();
        let mut first = true;

        for item in self.partitions.get(active) {
            if area == HousingArea::Indoors && !floors.enabled(floor_of(&item.pose)) {
                report.skipped_floor += 1;
                continue;
            }
            if item.is_missing() {
                report.missing += 1;
                continue;
            }
            if item.is_in_place() {
                report.already_correct += 1;
                continue;
            }
            if !first {
                scene.settle(config.apply.interval());
            }
            first = false;
            match set_item_position(item, scene) {
                Ok(()) => report.written += 1,
                Err(e @ ReconError::StaleHandle { .. }) => {
                    log::warn!("skipping {}: {e}", item.name);
                    report.missing += 1;
                }
                Err(e) => return Err(e),
            }
        }

        log::info!(
            "applied layout: {} moved, {} already in place, {} missing, {} on disabled floors",
            report.written,
            report.already_correct,
            report.missing,
            report.skipped_floor
        );
        Ok(report)
    }

    /// Reconcile, then dye every bound item whose dye differs from the save.
    pub fn apply_dyes(&mut self, scene: &mut dyn LiveScene, config: &ReconConfig) -> Result<ApplyReport, ReconError> {
        require(scene.mode(), Capability::DyeItem, "apply dyes")?;
        self.reconcile(&*scene, config)?;

        let active = area_partition(scene.area());
        let mut report = ApplyReport::default();

        for item in self.partitions.get(active) {
            if item.is_missing() {
                report.missing += 1;
                continue;
            }
            if item.dye_match || item.dye().is_none() {
                report.already_correct += 1;
                continue;
            }
            match set_item_dye(item, scene) {
                Ok(()) => report.written += 1,
                Err(e @ ReconError::StaleHandle { .. }) => {
                    log::warn!("skipping {}: {e}", item.name);
                    report.missing += 1;
                }
                Err(e) => return Err(e),
            }
        }

        log::info!("applied dyes: {} dyed, {} missing", report.written, report.missing);
        Ok(report)
    }

    // -- list actions --------------------------------------------------------

    pub fn sort(&mut self, partition: Partition) {
        sort_items(self.partitions.get_mut(partition));
        self.hidden.retain(|(p, _)| *p != partition);
    }

    pub fn clear(&mut self, partition: Partition) {
        self.partitions.get_mut(partition).clear();
        self.hidden.retain(|(p, _)| *p != partition);
    }

    pub fn clear_fixtures(&mut self, area: HousingArea) {
        match area_partition(area) {
            Partition::Interior => self.layout.interior_fixtures.clear(),
            _ => self.layout.exterior_fixtures.clear(),
        }
    }

    /// Catalog id counts over interior + exterior, for the shopping list.
    pub fn item_counts(&self) -> BTreeMap<u32, usize> {
        count_items(&[self.partitions.interior.as_slice(), self.partitions.exterior.as_slice()])
    }

    // -- overlay -------------------------------------------------------------

    pub fn overlay_targets(&self, scene: &dyn LiveScene, player: [f32; 3], config: &ReconConfig) -> Vec<OverlayTarget> {
        let active = area_partition(scene.area());
        let hidden: BTreeSet<usize> = self
            .hidden
            .iter()
            .filter(|(p, _)| *p == active)
            .map(|&(_, i)| i)
            .collect();
        overlay_targets(self.partitions.get(active), scene, player, &config.overlay, &hidden)
    }

    /// "Set" pressed on an overlay label: move the item and stop labelling it.
    pub fn set_position_from_overlay(&mut self, index: usize, scene: &mut dyn LiveScene) -> Result<(), ReconError> {
        let active = area_partition(scene.area());
        self.set_item_position(active, index, scene)?;
        self.hidden.insert((active, index));
        Ok(())
    }
}
