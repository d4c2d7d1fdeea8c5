use crate::model::{HousingArea, HousingItem, ReconSummary};

/// Count outcomes of a reconciliation pass over the active partition.
pub fn compute_summary(area: HousingArea, active: &[HousingItem], unused: &[HousingItem]) -> ReconSummary {
    let mut summary = ReconSummary {
        area: Some(area),
        unused: unused.len(),
        ..ReconSummary::default()
    };

    for item in active {
        if item.is_missing() {
            summary.missing += 1;
            continue;
        }
        summary.matched += 1;
        if !item.correct_location {
            summary.misplaced += 1;
        }
        if !item.correct_rotation {
            summary.misrotated += 1;
        }
        if !item.dye_match {
            summary.dye_mismatches += 1;
        }
    }

    summary
}
