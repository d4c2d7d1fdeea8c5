use std::cmp::Ordering;

use crate::model::HousingItem;

/// Total order used by the "sort" action: name, then x, y, z, rotate.
pub fn compare_items(a: &HousingItem, b: &HousingItem) -> Ordering {
    a.name
        .cmp(&b.name)
        .then_with(|| a.pose.x.total_cmp(&b.pose.x))
        .then_with(|| a.pose.y.total_cmp(&b.pose.y))
        .then_with(|| a.pose.z.total_cmp(&b.pose.z))
        .then_with(|| a.pose.rotate.total_cmp(&b.pose.rotate))
}

/// Stable in-place sort; full ties keep their relative order.
pub fn sort_items(items: &mut [HousingItem]) {
    items.sort_by(compare_items);
}
