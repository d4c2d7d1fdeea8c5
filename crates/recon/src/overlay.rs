use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::OverlayConfig;
use crate::model::{distance, HousingItem};
use crate::scene::LiveScene;

/// A label the presentation layer should draw over a piece of furniture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayTarget {
    /// Index into the active partition.
    pub index: usize,
    pub name: String,
    /// Current live position (not the saved one).
    pub position: [f32; 3],
}

/// Pick the items worth labelling on screen.
///
/// Skips unbound items, items whose live object has vanished, indices the
/// user already handled, and anything beyond `draw_distance` from the
/// player when that limit is non-zero.
pub fn overlay_targets(
    items: &[HousingItem],
    scene: &dyn LiveScene,
    player: [f32; 3],
    config: &OverlayConfig,
    hidden: &BTreeSet<usize>,
) -> Vec<OverlayTarget> {
    if !config.enabled {
        return Vec::new();
    }

    items
        .iter()
        .enumerate()
        .filter(|(i, _)| !hidden.contains(i))
        .filter_map(|(i, item)| {
            let handle = item.live?;
            let object = scene.resolve(handle)?;
            let position = object.pose.position();
            if config.draw_distance > 0.0 && distance(player, position) > config.draw_distance {
                return None;
            }
            Some(OverlayTarget {
                index: i,
                name: item.name.clone(),
                position,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dye, EditMode, HousingArea, Pose};
    use crate::scene::{SceneObject, SceneTable};

    fn scene_with(positions: &[f32]) -> (SceneTable, Vec<HousingItem>) {
        let mut scene = SceneTable::new(HousingArea::Indoors, EditMode::default());
        let mut items = Vec::new();
        for (i, x) in positions.iter().enumerate() {
            let handle = scene.insert(SceneObject {
                item_key: i as u32,
                name: format!("item {i}"),
                pose: Pose::new(*x, 0.0, 0.0, 0.0),
                dye: Dye::default(),
            });
            let mut item = HousingItem::new(i as u32, format!("item {i}"), Pose::default());
            item.live = Some(handle);
            items.push(item);
        }
        (scene, items)
    }

    fn enabled(draw_distance: f32) -> OverlayConfig {
        OverlayConfig {
            enabled: true,
            draw_distance,
        }
    }

    #[test]
    fn disabled_overlay_draws_nothing() {
        let (scene, items) = scene_with(&[0.0]);
        let targets = overlay_targets(&items, &scene, [0.0; 3], &OverlayConfig::default(), &BTreeSet::new());
        assert!(targets.is_empty());
    }

    #[test]
    fn uses_live_position() {
        let (scene, items) = scene_with(&[4.0]);
        let targets = overlay_targets(&items, &scene, [0.0; 3], &enabled(0.0), &BTreeSet::new());
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].position, [4.0, 0.0, 0.0]);
    }

    #[test]
    fn skips_hidden_unbound_and_far() {
        let (mut scene, mut items) = scene_with(&[1.0, 2.0, 50.0, 3.0]);
        items[1].unbind();
        let gone = items[3].live.unwrap();
        scene.remove(gone);

        let hidden = BTreeSet::from([0]);
        let targets = overlay_targets(&items, &scene, [0.0; 3], &enabled(10.0), &hidden);
        assert!(targets.is_empty());

        let targets = overlay_targets(&items, &scene, [0.0; 3], &enabled(0.0), &hidden);
        let indices: Vec<usize> = targets.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![2]);
    }
}
