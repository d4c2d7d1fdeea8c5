use crate::config::ToleranceConfig;
use crate::model::{HousingItem, LiveObject};

/// Result of pairing saved items with live objects.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutput {
    /// Per saved item (same order as input): index into the live slice.
    pub bindings: Vec<Option<usize>>,
    /// Live indices nobody claimed, in enumeration order.
    pub live_only: Vec<usize>,
}

impl MatchOutput {
    pub fn matched(&self) -> usize {
        self.bindings.iter().filter(|b| b.is_some()).count()
    }
}

/// Pair saved items with live objects of the same catalog id.
///
/// Candidate pairs are claimed in ascending distance order, so every saved
/// item ends up with the nearest live object still available. Equal
/// distances fall back to live enumeration order, then saved order. Each
/// side is claimed at most once.
pub fn match_nearest(
    saved: &[HousingItem],
    live: &[LiveObject],
    tolerance: &ToleranceConfig,
) -> MatchOutput {
    let mut candidates: Vec<(f32, usize, usize)> = Vec::new();
    for (si, item) in saved.iter().enumerate() {
        for (li, object) in live.iter().enumerate() {
            if object.item_key != item.item_key {
                continue;
            }
            let d = item.pose.distance(&object.pose);
            if let Some(max) = tolerance.max_match_distance {
                if d > max {
                    continue;
                }
            }
            candidates.push((d, li, si));
        }
    }

    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    let mut bindings = vec![None; saved.len()];
    let mut live_used = vec![false; live.len()];

    for (d, li, si) in candidates {
        if bindings[si].is_some() || live_used[li] {
            continue;
        }
        log::trace!("bind saved #{si} ({}) -> live {} at {d:.4}", saved[si].name, live[li].handle);
        bindings[si] = Some(li);
        live_used[li] = true;
    }

    let live_only = live_used
        .iter()
        .enumerate()
        .filter(|(_, used)| !**used)
        .map(|(i, _)| i)
        .collect();

    MatchOutput { bindings, live_only }
}

/// Recompute the three correctness flags of a bound item.
pub fn assess(item: &mut HousingItem, object: &LiveObject, tolerance: &ToleranceConfig) {
    item.live = Some(object.handle);
    item.correct_location = item.pose.distance(&object.pose) <= tolerance.position;
    item.correct_rotation = item.pose.rotation_delta(&object.pose) <= tolerance.rotation;
    item.dye_match = item.dye() == object.dye;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dye, LiveHandle, Pose};

    fn saved(key: u32, x: f32) -> HousingItem {
        HousingItem::new(key, format!("item {key}"), Pose::new(x, 0.0, 0.0, 0.0))
    }

    fn live(index: u32, key: u32, x: f32) -> LiveObject {
        LiveObject {
            handle: LiveHandle { index, generation: 0 },
            item_key: key,
            name: format!("item {key}"),
            pose: Pose::new(x, 0.0, 0.0, 0.0),
            dye: Dye::default(),
        }
    }

    #[test]
    fn exact_key_required() {
        let out = match_nearest(&[saved(1, 0.0)], &[live(0, 2, 0.0)], &ToleranceConfig::default());
        assert_eq!(out.bindings, vec![None]);
        assert_eq!(out.live_only, vec![0]);
    }

    #[test]
    fn nearest_candidate_wins() {
        let objects = vec![live(0, 1, 2.0), live(1, 1, 0.5)];
        let out = match_nearest(&[saved(1, 0.0)], &objects, &ToleranceConfig::default());
        assert_eq!(out.bindings, vec![Some(1)]);
        assert_eq!(out.live_only, vec![0]);
    }

    #[test]
    fn equal_distance_keeps_first_enumerated() {
        let objects = vec![live(0, 1, 1.0), live(1, 1, -1.0)];
        let out = match_nearest(&[saved(1, 0.0)], &objects, &ToleranceConfig::default());
        assert_eq!(out.bindings, vec![Some(0)]);
    }

    #[test]
    fn exact_match_is_not_stolen_by_earlier_item() {
        // First saved item is closer to the second live object than to its own
        // exact twin would be; global ordering still gives each its nearest.
        let items = vec![saved(1, 0.0), saved(1, 10.0)];
        let objects = vec![live(0, 1, 10.0), live(1, 1, 0.0)];
        let out = match_nearest(&items, &objects, &ToleranceConfig::default());
        assert_eq!(out.bindings, vec![Some(1), Some(0)]);
        assert!(out.live_only.is_empty());
    }

    #[test]
    fn max_match_distance_limits_candidates() {
        let tol = ToleranceConfig {
            max_match_distance: Some(1.0),
            ..ToleranceConfig::default()
        };
        let out = match_nearest(&[saved(1, 0.0)], &[live(0, 1, 5.0)], &tol);
        assert_eq!(out.matched(), 0);
        assert_eq!(out.live_only, vec![0]);
    }

    #[test]
    fn assess_flags() {
        let tol = ToleranceConfig {
            position: 0.01,
            rotation: 0.01,
            max_match_distance: None,
        };
        let mut item = saved(1, 0.0).with_dye(Dye { stain: 3, material_item_key: 0 });
        let mut object = live(0, 1, 0.005);
        object.pose.rotate = 0.5;
        object.dye.stain = 3;

        assess(&mut item, &object, &tol);
        assert_eq!(item.live, Some(object.handle));
        assert!(item.correct_location);
        assert!(!item.correct_rotation);
        assert!(item.dye_match);
    }
}
