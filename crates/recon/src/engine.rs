use crate::classify::{classify, Origin};
use crate::config::ToleranceConfig;
use crate::error::{Capability, ReconError};
use crate::matcher::{assess, match_nearest};
use crate::model::{EditMode, HousingArea, HousingItem, LiveObject, Partitions};
use crate::scene::LiveScene;

/// Reconcile saved items against the live objects of the scene in `area`.
///
/// Returns fresh partitions: saved items (bound or missing) in the area's
/// partition, live objects nobody claimed in `unused`. The partition of the
/// other area is left empty; merging it back is the caller's business.
pub fn reconcile(
    saved: &[HousingItem],
    live: &[LiveObject],
    area: HousingArea,
    tolerance: &ToleranceConfig,
) -> Partitions {
    let out = match_nearest(saved, live, tolerance);
    let mut partitions = Partitions::default();

    for (item, binding) in saved.iter().zip(&out.bindings) {
        let mut item = item.clone();
        item.unbind();
        if let Some(li) = binding {
            assess(&mut item, &live[*li], tolerance);
        }
        partitions.get_mut(classify(Origin::Saved, area)).push(item);
    }

    for &li in &out.live_only {
        partitions
            .get_mut(classify(Origin::LiveOnly, area))
            .push(HousingItem::from_live(&live[li]));
    }

    log::debug!(
        "reconciled {} saved / {} live in {area}: {} bound, {} unused",
        saved.len(),
        live.len(),
        out.matched(),
        out.live_only.len()
    );

    partitions
}

/// Fail with a mode error unless `mode` grants `required`.
pub fn require(mode: EditMode, required: Capability, action: &'static str) -> Result<(), ReconError> {
    let granted = mode.housing_mode
        && match required {
            Capability::HousingMode => true,
            Capability::EditItem => mode.can_edit_item,
            Capability::DyeItem => mode.can_dye_item,
            Capability::EditOrDye => mode.can_edit_item || mode.can_dye_item,
        };
    if granted {
        Ok(())
    } else {
        Err(ReconError::Mode { action, required })
    }
}

/// Move an item's live counterpart to its saved pose.
///
/// One pose write, no read-back: the flags stay as they are until the next
/// reconciliation.
pub fn set_item_position(item: &HousingItem, scene: &mut dyn LiveScene) -> Result<(), ReconError> {
    require(scene.mode(), Capability::EditItem, "set position")?;
    let handle = item.live.ok_or_else(|| ReconError::UnboundItem {
        name: item.name.clone(),
    })?;
    log::debug!("set position of {} via {handle}", item.name);
    scene.write_pose(handle, item.pose)
}

/// Dye an item's live counterpart with its saved stain/material.
pub fn set_item_dye(item: &HousingItem, scene: &mut dyn LiveScene) -> Result<(), ReconError> {
    require(scene.mode(), Capability::DyeItem, "apply dye")?;
    let handle = item.live.ok_or_else(|| ReconError::UnboundItem {
        name: item.name.clone(),
    })?;
    log::debug!("dye {} via {handle}", item.name);
    scene.write_dye(handle, item.dye())
}
