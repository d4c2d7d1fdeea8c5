use std::collections::BTreeMap;

use crate::model::HousingItem;

/// Count occurrences per catalog id across every given list.
///
/// Used for the shopping-list export; duplicates across lists add up.
pub fn count_items(lists: &[&[HousingItem]]) -> BTreeMap<u32, usize> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();

    for list in lists {
        for item in *list {
            *counts.entry(item.item_key).or_insert(0) += 1;
        }
    }

    counts
}
